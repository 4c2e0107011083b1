use crate::graphql::schema::ordering::DisplayMode;
use crate::typescript::ScalarOverrides;
use crate::CompileOptions;
use clap::Parser;
use config::{ConfigFile, DEFAULT_CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

pub use printer::{similar_help_suggestions, LocationInformation, PrintableMessage};

mod config;
mod printer;

const DEFAULT_SCHEMA_GLOB: &str = "schema.graphql";
const DEFAULT_OUTPUT_DIRECTORY: &str = "__generated__";

#[derive(Debug, Parser)]
#[command(
    version,
    about = "\nCompiles TypeScript declarations from a GraphQL schema and its operations."
)]
struct CliArgs {
    /// Directory that globs, the config file and the output directory are relative to
    #[arg(value_name = "DIR", default_value = ".")]
    root_dir: PathBuf,

    /// Path of the JSON config file (defaults to DIR/.gqltypesrc.json)
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    config_file: Option<PathBuf>,

    /// Glob of schema SDL files (defaults to schema.graphql)
    #[arg(short = 's', long = "schema", value_name = "GLOB")]
    schema: Vec<String>,

    /// Glob of operation files
    #[arg(short = 'o', long = "operations", value_name = "GLOB")]
    operations: Vec<String>,

    /// Directory to write generated files into (defaults to DIR/__generated__)
    #[arg(long = "output-directory", value_name = "DIR")]
    output_directory: Option<PathBuf>,

    /// Order of schema declarations: `default` (grouped by kind) or `as-is`
    #[arg(long = "display", value_name = "MODE")]
    display: Option<String>,

    /// Omit descriptions from generated doc comments
    #[arg(long = "remove-description")]
    remove_description: bool,

    /// Wrap operation sources with graphql-tag
    #[arg(long = "operations-wrap")]
    operations_wrap: bool,

    /// Warn when an operation selects a deprecated field
    #[arg(long = "show-deprecation-warnings")]
    show_deprecation_warnings: bool,

    /// TypeScript type for a scalar, ie `DateTime=string`
    #[arg(long = "scalar", value_name = "NAME=TYPE")]
    scalars: Vec<String>,

    /// Sets the number of threads (defaults to number of CPU cores)
    #[arg(long = "num-threads", value_name = "NUMBER")]
    number_threads: Option<u8>,
}

/// User configured runtime configuration
#[derive(Debug)]
pub struct RuntimeConfig {
    root_dir: PathBuf,
    schema_globs: Vec<String>,
    operation_globs: Vec<String>,
    output_directory: PathBuf,
    display: DisplayMode,
    remove_description: bool,
    operations_wrap: bool,
    show_deprecation_warnings: bool,
    scalars: ScalarOverrides,
    number_threads: u8,
}

fn parse_cli_scalar(raw: &str) -> Result<(String, serde_json::Value), PrintableMessage> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() && !value.is_empty() => {
            Ok((name.to_string(), serde_json::Value::String(value.to_string())))
        }
        _ => Err(PrintableMessage::new_simple_program_error(&format!(
            "invalid scalar override `{raw}`, expected `NAME=TYPE`"
        ))),
    }
}

impl RuntimeConfig {
    pub fn from_cli() -> Result<Self, PrintableMessage> {
        Self::from_args(CliArgs::parse())
    }

    fn from_args(args: CliArgs) -> Result<Self, PrintableMessage> {
        let root_dir = args.root_dir;
        let config_file = match &args.config_file {
            Some(path) => ConfigFile::read(path, true)?,
            None => ConfigFile::read(&root_dir.join(DEFAULT_CONFIG_FILE_NAME), false)?,
        };

        let display = match args.display.or(config_file.display) {
            Some(value) => value
                .parse()
                .map_err(|error: String| PrintableMessage::new_simple_program_error(&error))?,
            None => DisplayMode::default(),
        };

        let mut scalar_values = config_file.scalars.unwrap_or_default();
        for raw in &args.scalars {
            let (name, value) = parse_cli_scalar(raw)?;
            scalar_values.insert(name, value);
        }
        let scalars = ScalarOverrides::try_from_values(scalar_values)?;

        let schema_globs = if args.schema.is_empty() {
            config_file
                .schema
                .map(Vec::from)
                .unwrap_or_else(|| vec![DEFAULT_SCHEMA_GLOB.to_string()])
        } else {
            args.schema
        };
        let operation_globs = if args.operations.is_empty() {
            config_file.operations.map(Vec::from).unwrap_or_default()
        } else {
            args.operations
        };
        let output_directory = root_dir.join(
            args.output_directory
                .or(config_file.output_directory)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY)),
        );

        Ok(RuntimeConfig {
            schema_globs,
            operation_globs,
            output_directory,
            display,
            scalars,
            remove_description: args.remove_description
                || config_file.remove_description.unwrap_or(false),
            operations_wrap: args.operations_wrap || config_file.operations_wrap.unwrap_or(false),
            show_deprecation_warnings: args.show_deprecation_warnings
                || config_file.show_deprecation_warnings.unwrap_or(false),
            number_threads: args
                .number_threads
                .or_else(|| u8::try_from(num_cpus::get()).ok())
                .unwrap_or(4),
            root_dir,
        })
    }

    pub fn root_dir_path(&self) -> &Path {
        &self.root_dir
    }

    pub fn schema_globs(&self) -> &[String] {
        &self.schema_globs
    }

    /// `None` when no operations were asked for
    pub fn operation_globs(&self) -> Option<&[String]> {
        if self.operation_globs.is_empty() {
            None
        } else {
            Some(&self.operation_globs)
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn thread_count(&self) -> u8 {
        self.number_threads
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            display: self.display,
            remove_description: self.remove_description,
            operations_wrap: self.operations_wrap,
            show_deprecation_warnings: self.show_deprecation_warnings,
            scalars: self.scalars.clone(),
            thread_count: usize::from(self.number_threads),
        }
    }
}

/// Prints the result of the program to the screen.
pub fn print_work_result(result: Result<Vec<PrintableMessage>, Vec<PrintableMessage>>) {
    let (messages, code) = match result {
        Ok(messages) => (messages, 0),
        Err(messages) => (messages, 1),
    };
    for message in messages {
        println!("{message}\n");
    }
    if code != 0 {
        std::process::exit(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("gql-types-generator").chain(raw.iter().copied()))
    }

    #[test]
    fn defaults_are_relative_to_root_dir() {
        let config = RuntimeConfig::from_args(args(&["/does/not/exist", "--num-threads=3"]))
            .expect("missing default config file is not an error");
        assert_eq!(config.schema_globs(), &["schema.graphql".to_string()]);
        assert!(config.operation_globs().is_none());
        assert_eq!(
            config.output_directory(),
            Path::new("/does/not/exist/__generated__")
        );
        assert_eq!(config.thread_count(), 3);
        assert_eq!(config.compile_options().display, DisplayMode::Default);
    }

    #[test]
    fn cli_flags_are_collected() {
        let config = RuntimeConfig::from_args(args(&[
            "/does/not/exist",
            "-s",
            "schema/*.graphql",
            "-o",
            "operations/*.graphql",
            "--display=as-is",
            "--operations-wrap",
            "--scalar",
            "DateTime=string",
        ]))
        .unwrap();
        assert_eq!(config.schema_globs(), &["schema/*.graphql".to_string()]);
        assert_eq!(
            config.operation_globs(),
            Some(&["operations/*.graphql".to_string()][..])
        );
        let options = config.compile_options();
        assert_eq!(options.display, DisplayMode::AsIs);
        assert!(options.operations_wrap);
        assert!(!options.remove_description);
        assert_eq!(options.scalars.resolve("DateTime"), "string");
    }

    #[test]
    fn rejects_bad_display_and_scalar_flags() {
        assert!(RuntimeConfig::from_args(args(&["/does/not/exist", "--display=sorted"])).is_err());
        assert!(RuntimeConfig::from_args(args(&["/does/not/exist", "--scalar=DateTime"])).is_err());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        assert!(RuntimeConfig::from_args(args(&["-c", "/does/not/exist/.gqltypesrc.json"])).is_err());
    }
}
