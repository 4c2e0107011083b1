use crate::source::Source;
use colored::Colorize;
use graphql_parser::Pos;
use std::fmt;
use std::path::{Path, PathBuf};

const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Builds a ` Did you mean...?` sentence out of the candidates close to `name`.
pub fn similar_help_suggestions(
    name: &str,
    candidates: impl Iterator<Item = String>,
) -> Option<String> {
    let mut similar: Vec<(f64, String)> = candidates
        .map(|candidate| (strsim::jaro_winkler(name, &candidate), candidate))
        .filter(|(score, _)| *score >= SIMILARITY_THRESHOLD)
        .collect();
    similar.sort_by(|(a_score, a), (b_score, b)| {
        b_score.total_cmp(a_score).then_with(|| a.cmp(b))
    });
    match similar.len() {
        0 => None,
        1 => Some(format!(" Did you mean `{}`?", similar[0].1)),
        _ => Some(format!(
            " Did you mean one of `{}`?",
            similar
                .iter()
                .take(3)
                .map(|(_, candidate)| candidate.as_str())
                .collect::<Vec<_>>()
                .join("`, `"),
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    CompileError,
    CompileWarning,
    ProgramError,
}

#[derive(Debug)]
pub struct LocationInformation {
    line_number: usize,
    line: String,
    /// 1-based
    column: usize,
    help_text: Option<String>,
}

impl LocationInformation {
    pub fn new_from_line_and_column(line_number: usize, line: &str, column: usize) -> Self {
        LocationInformation {
            line_number,
            line: line.to_string(),
            column,
            help_text: None,
        }
    }

    pub fn new_from_contents_and_position(contents: &str, position: &Pos) -> Self {
        let line = contents
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or("");
        Self::new_from_line_and_column(position.line, line, position.column)
    }

    pub fn with_help_text(&mut self, help_text: &str) {
        self.help_text = Some(help_text.to_string());
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// A rustc-like diagnostic for the user.
#[derive(Debug)]
pub struct PrintableMessage {
    level: Level,
    title: String,
    file_path: Option<PathBuf>,
    location: Option<LocationInformation>,
}

impl PrintableMessage {
    fn new(level: Level, title: &str) -> Self {
        PrintableMessage {
            level,
            title: title.to_string(),
            file_path: None,
            location: None,
        }
    }

    fn new_with_position(
        level: Level,
        title: &str,
        source: &Source,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        let (file_path, mut location) = source.locate(position);
        if let Some(help) = help {
            location.with_help_text(help);
        }
        let mut message = Self::new(level, title);
        message.with_source_information(file_path, Some(location));
        message
    }

    pub fn new_simple_compile_error(title: &str) -> Self {
        Self::new(Level::CompileError, title)
    }

    pub fn new_simple_program_error(title: &str) -> Self {
        Self::new(Level::ProgramError, title)
    }

    pub fn new_compile_error(
        title: &str,
        source: &Source,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        Self::new_with_position(Level::CompileError, title, source, position, help)
    }

    pub fn new_compile_warning(
        title: &str,
        source: &Source,
        position: &Pos,
        help: Option<&str>,
    ) -> Self {
        Self::new_with_position(Level::CompileWarning, title, source, position, help)
    }

    pub fn new_compile_error_from_read_io_error(io_error: &std::io::Error, path: &Path) -> Self {
        Self::new_simple_compile_error(&format!("could not read `{}`: {io_error}", path.display()))
    }

    pub fn new_compile_error_from_write_io_error(io_error: &std::io::Error, path: &Path) -> Self {
        Self::new_simple_compile_error(&format!("could not write `{}`: {io_error}", path.display()))
    }

    pub fn with_source_information(
        &mut self,
        file_path: &Path,
        location: Option<LocationInformation>,
    ) {
        self.file_path = Some(file_path.to_path_buf());
        self.location = location;
    }

    pub fn is_error(&self) -> bool {
        !matches!(self.level, Level::CompileWarning)
    }
}

impl fmt::Display for PrintableMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            Level::CompileError => "error".red().bold(),
            Level::CompileWarning => "warning".yellow().bold(),
            Level::ProgramError => "program error".red().bold(),
        };
        write!(f, "{label}{} {}", ":".bold(), self.title.bold())?;

        let file_path = match &self.file_path {
            Some(file_path) => file_path,
            None => return Ok(()),
        };
        let location = match &self.location {
            Some(location) => location,
            None => return write!(f, "\n{} {}", "-->".blue().bold(), file_path.display()),
        };

        let gutter_width = location.line_number.to_string().len();
        let padding = " ".repeat(gutter_width);
        let bar = "|".blue().bold();
        write!(
            f,
            "\n{padding}{} {}:{}:{}",
            "-->".blue().bold(),
            file_path.display(),
            location.line_number,
            location.column,
        )?;
        write!(f, "\n{padding} {bar}")?;
        write!(
            f,
            "\n{} {bar} {}",
            location.line_number.to_string().blue().bold(),
            location.line,
        )?;
        write!(
            f,
            "\n{padding} {bar} {}{}",
            " ".repeat(location.column.saturating_sub(1)),
            "^".red().bold(),
        )?;
        if let Some(help_text) = &location.help_text {
            write!(f, "\n{padding} {} {}: {help_text}", "=".blue().bold(), "help".bold())?;
        }
        Ok(())
    }
}
