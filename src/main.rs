use gql_types_generator::cli::{print_work_result, PrintableMessage, RuntimeConfig};
use gql_types_generator::source::Source;
use gql_types_generator::{compile, emit};
use log::info;

fn run() -> Result<Vec<PrintableMessage>, Vec<PrintableMessage>> {
    let config = RuntimeConfig::from_cli().map_err(|message| vec![message])?;
    let root_dir = config.root_dir_path();
    let schema_source =
        Source::read_globs(root_dir, config.schema_globs()).map_err(|message| vec![message])?;
    let operations_source = match config.operation_globs() {
        Some(globs) => Some(Source::read_globs(root_dir, globs).map_err(|message| vec![message])?),
        None => None,
    };

    let compilation = compile(&schema_source, operations_source.as_ref(), &config.compile_options())?;
    let files = emit::assemble(&compilation);
    let mut messages = compilation.warnings;
    match emit::write_files(config.output_directory(), &files) {
        Ok(written) => {
            info!(
                "wrote {} files to `{}`",
                written.len(),
                config.output_directory().display()
            );
            Ok(messages)
        }
        Err(message) => {
            messages.push(message);
            Err(messages)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    print_work_result(run());
}
