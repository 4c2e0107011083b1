use crate::cli::PrintableMessage;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE_NAME: &str = ".gqltypesrc.json";

/// One glob or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Globs {
    One(String),
    Many(Vec<String>),
}

impl From<Globs> for Vec<String> {
    fn from(globs: Globs) -> Self {
        match globs {
            Globs::One(glob) => vec![glob],
            Globs::Many(globs) => globs,
        }
    }
}

/// Contents of the JSON rc file. Every key is optional; CLI flags take priority.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub schema: Option<Globs>,
    pub operations: Option<Globs>,
    pub output_directory: Option<PathBuf>,
    pub display: Option<String>,
    pub remove_description: Option<bool>,
    pub operations_wrap: Option<bool>,
    pub show_deprecation_warnings: Option<bool>,
    pub scalars: Option<IndexMap<String, serde_json::Value>>,
}

fn config_file_error(path: &Path, detail: &str) -> PrintableMessage {
    let mut message = PrintableMessage::new_simple_program_error(&format!(
        "error in config file `{}`: {detail}",
        path.display(),
    ));
    message.with_source_information(path, None);
    message
}

impl ConfigFile {
    /// An explicitly requested file must exist; the default one may be absent.
    pub fn read(path: &Path, is_explicit: bool) -> Result<Self, PrintableMessage> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(io_error) if io_error.kind() == ErrorKind::NotFound && !is_explicit => {
                return Ok(ConfigFile::default())
            }
            Err(io_error) => return Err(config_file_error(path, &io_error.to_string())),
        };
        serde_json::from_str(&contents)
            .map_err(|parse_error| config_file_error(path, &parse_error.to_string()))
    }
}
