//! Compiles a GraphQL schema and its operations into TypeScript declarations.
use cli::PrintableMessage;
use graphql::schema::ordering::{sort_named_types, DisplayMode};
use log::{debug, info};
use source::Source;
use std::collections::HashMap;
use typescript::operation::{compile_operation, CompiledOperation};
use typescript::{named, CompileContext, Declaration, ScalarOverrides};
use worker_pool::WorkerPool;

pub mod cli;
pub mod emit;
pub mod graphql;
pub mod source;
pub mod typescript;
mod worker_pool;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub display: DisplayMode,
    pub remove_description: bool,
    pub operations_wrap: bool,
    pub show_deprecation_warnings: bool,
    pub scalars: ScalarOverrides,
    pub thread_count: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            display: DisplayMode::default(),
            remove_description: false,
            operations_wrap: false,
            show_deprecation_warnings: false,
            scalars: ScalarOverrides::default(),
            thread_count: 1,
        }
    }
}

/// Everything a successful run produces, ready to be laid out into files
#[derive(Debug)]
pub struct Compilation {
    pub declarations: Vec<Declaration>,
    pub schema_sdl: String,
    pub operations: Vec<CompiledOperation>,
    pub operations_wrap: bool,
    pub warnings: Vec<PrintableMessage>,
}

fn check_unique_compiled_names(
    source: &Source,
    operations: &[graphql::ir::Operation],
) -> Result<(), Vec<PrintableMessage>> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(operations.len());
    let mut errors = Vec::new();
    for operation in operations {
        let compiled_name = operation.compiled_name();
        match seen.get(&compiled_name) {
            Some(first_name) => errors.push(PrintableMessage::new_compile_error(
                &format!("the compiled name `{compiled_name}` is used by more than one operation"),
                source,
                &operation.position,
                Some(&format!(
                    "`{}` collides with `{first_name}`. Rename one of the operations.",
                    operation.original_name,
                )),
            )),
            None => {
                seen.insert(compiled_name, &operation.original_name);
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Compiles the schema and, when asked for, the operations. Nothing is produced unless every
/// part succeeds.
pub fn compile(
    schema_source: &Source,
    operations_source: Option<&Source>,
    options: &CompileOptions,
) -> Result<Compilation, Vec<PrintableMessage>> {
    if schema_source.is_blank() {
        return Err(vec![PrintableMessage::new_simple_compile_error(
            "no schema definition was found",
        )]);
    }
    let schema = graphql::parse_schema(schema_source)?;
    let context = CompileContext {
        schema: &schema,
        scalars: &options.scalars,
        include_descriptions: !options.remove_description,
        operations_wrap: options.operations_wrap,
    };
    let pool = WorkerPool::new(options.thread_count);

    let named_types = sort_named_types(schema.declared_types(), options.display);
    debug!("compiling {} declared types", named_types.len());
    let declarations = pool.map(named_types, |named| named::compile_named_type(&context, named));

    let (operations, warnings) = match operations_source {
        Some(operations_source) => {
            if operations_source.is_blank() {
                return Err(vec![PrintableMessage::new_simple_compile_error(
                    "unable to find operations",
                )]);
            }
            let parsed = graphql::parse_operations(
                operations_source,
                &schema,
                options.show_deprecation_warnings,
            )?;
            if let Err(mut errors) =
                check_unique_compiled_names(operations_source, &parsed.operations)
            {
                errors.extend(parsed.warnings);
                return Err(errors);
            }
            let operations = pool.map(parsed.operations.iter().collect(), |operation| {
                compile_operation(&context, operation)
            });
            (operations, parsed.warnings)
        }
        None => (Vec::new(), Vec::new()),
    };
    info!(
        "compiled {} declarations and {} operations",
        declarations.len(),
        operations.len()
    );

    Ok(Compilation {
        declarations,
        schema_sdl: schema_source.text().to_string(),
        operations,
        operations_wrap: options.operations_wrap,
        warnings,
    })
}
