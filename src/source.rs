use crate::cli::{LocationInformation, PrintableMessage};
use graphql_parser::Pos;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct SourceFile {
    path: PathBuf,
    /// 1-based line in the concatenated text where this file starts
    first_line: usize,
}

#[derive(Debug)]
pub struct Source {
    files: Vec<SourceFile>,
    text: String,
}

impl Source {
    pub fn from_text(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Source::from_files(vec![(path.into(), contents.into())])
    }

    pub fn from_files(files: Vec<(PathBuf, String)>) -> Self {
        let mut text = String::new();
        let mut source_files = Vec::with_capacity(files.len());
        for (path, contents) in files {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            source_files.push(SourceFile {
                path,
                first_line: text.matches('\n').count() + 1,
            });
            text.push_str(&contents);
        }
        Source {
            files: source_files,
            text,
        }
    }

    pub fn read_globs(base_dir: &Path, patterns: &[String]) -> Result<Self, PrintableMessage> {
        if patterns.is_empty() {
            return Ok(Source::from_files(Vec::new()));
        }
        let walker = globwalk::GlobWalkerBuilder::from_patterns(base_dir, patterns)
            .file_type(globwalk::FileType::FILE)
            .build()
            .map_err(|glob_error| {
                PrintableMessage::new_simple_program_error(&format!(
                    "invalid glob pattern `{}`: {glob_error}",
                    patterns.join("`, `"),
                ))
            })?;
        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|walk_error| {
                PrintableMessage::new_simple_program_error(&format!(
                    "could not search `{}`: {walk_error}",
                    base_dir.display(),
                ))
            })?;
            paths.push(entry.into_path());
        }
        paths.sort();
        debug!("patterns `{}` matched {} file(s)", patterns.join("`, `"), paths.len());

        let files = paths
            .into_iter()
            .map(|path| match fs::read_to_string(&path) {
                Ok(contents) => Ok((path, contents)),
                Err(io_error) => Err(PrintableMessage::new_compile_error_from_read_io_error(
                    &io_error, &path,
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Source::from_files(files))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn primary_path(&self) -> &Path {
        self.files
            .first()
            .map(|file| file.path.as_path())
            .unwrap_or_else(|| Path::new("<empty>"))
    }

    pub fn locate(&self, position: &Pos) -> (&Path, LocationInformation) {
        let file = self
            .files
            .iter()
            .rev()
            .find(|file| file.first_line <= position.line);
        let (path, first_line) = match file {
            Some(file) => (file.path.as_path(), file.first_line),
            None => (self.primary_path(), 1),
        };
        let line = self
            .text
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or("");
        let location = LocationInformation::new_from_line_and_column(
            (position.line + 1).saturating_sub(first_line),
            line,
            position.column,
        );
        (path, location)
    }

    pub fn definition_text(&self, start: &Pos) -> &str {
        let start_offset = byte_offset(&self.text, start);
        let rest = &self.text[start_offset..];
        let end = closing_brace_offset(rest).map(|end| end + 1).unwrap_or(rest.len());
        rest[..end].trim_end()
    }
}

fn byte_offset(text: &str, position: &Pos) -> usize {
    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        if index + 1 == position.line {
            let column_offset = line
                .char_indices()
                .nth(position.column.saturating_sub(1))
                .map(|(byte_index, _)| byte_index)
                .unwrap_or(line.len());
            return offset + column_offset;
        }
        offset += line.len();
    }
    text.len()
}

/// Finds the brace that closes the first top level `{`, skipping strings, comments and
/// anything nested inside variable definitions.
fn closing_brace_offset(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'#' => {
                while index < bytes.len() && bytes[index] != b'\n' {
                    index += 1;
                }
            }
            b'"' if bytes[index..].starts_with(b"\"\"\"") => {
                index += 3;
                while index < bytes.len() && !bytes[index..].starts_with(b"\"\"\"") {
                    index += if bytes[index..].starts_with(b"\\\"\"\"") { 4 } else { 1 };
                }
                index += 2;
            }
            b'"' => {
                index += 1;
                while index < bytes.len() && bytes[index] != b'"' && bytes[index] != b'\n' {
                    index += if bytes[index] == b'\\' { 2 } else { 1 };
                }
            }
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && parens == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
        index += 1;
    }
    None
}
