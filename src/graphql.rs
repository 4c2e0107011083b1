use crate::cli::PrintableMessage;
use crate::source::Source;
use graphql_parser::query::{Definition, OperationDefinition};
use schema::Schema;

pub mod ir;
pub mod schema;
pub mod variable;

pub type ParsedTextType = String;

/// Operations of a document, in source order, with the warnings raised while resolving them
#[derive(Debug)]
pub struct ParsedOperations {
    pub operations: Vec<ir::Operation>,
    pub warnings: Vec<PrintableMessage>,
}

pub fn parse_schema(source: &Source) -> Result<Schema, Vec<PrintableMessage>> {
    Schema::from_sdl(source.text()).map_err(|errors| {
        errors
            .into_iter()
            .map(|error| PrintableMessage::from((source, error)))
            .collect()
    })
}

/// Resolves every operation of `source` against `schema`. Errors of all operations are
/// collected before failing.
pub fn parse_operations(
    source: &Source,
    schema: &Schema,
    show_deprecation_warnings: bool,
) -> Result<ParsedOperations, Vec<PrintableMessage>> {
    let document = graphql_parser::parse_query::<ParsedTextType>(source.text()).map_err(|parse_error| {
        let mut message = PrintableMessage::new_simple_compile_error(&format!("{parse_error}"));
        message.with_source_information(source.primary_path(), None);
        vec![message]
    })?;

    let mut operations = Vec::with_capacity(document.definitions.len());
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for definition in &document.definitions {
        let operation_definition: &OperationDefinition<'_, ParsedTextType> = match definition {
            Definition::Operation(operation_definition) => operation_definition,
            Definition::Fragment(fragment) => {
                errors.push(PrintableMessage::from((
                    source,
                    ir::Error::FragmentDefinitionUnsupported(fragment.name.clone(), fragment.position),
                )));
                continue;
            }
        };
        let (result, operation_warnings) =
            match ir::Operation::compile(operation_definition, schema, source, show_deprecation_warnings) {
                Ok((operation, operation_warnings)) => (Ok(operation), operation_warnings),
                Err((operation_errors, operation_warnings)) => (Err(operation_errors), operation_warnings),
            };
        warnings.extend(
            operation_warnings
                .into_iter()
                .map(|warning| PrintableMessage::from((source, warning))),
        );
        match result {
            Ok(operation) => operations.push(operation),
            Err(operation_errors) => errors.extend(
                operation_errors
                    .into_iter()
                    .map(|error| PrintableMessage::from((source, error))),
            ),
        }
    }

    if errors.is_empty() {
        Ok(ParsedOperations { operations, warnings })
    } else {
        errors.extend(warnings);
        Err(errors)
    }
}
