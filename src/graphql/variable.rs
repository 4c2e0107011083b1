use crate::cli::{similar_help_suggestions, PrintableMessage};
use crate::graphql::schema::field::TypeReference;
use crate::graphql::schema::{Schema, TypeDefinition};
use crate::graphql::ParsedTextType;
use crate::source::Source;
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use std::collections::HashSet;

#[derive(Debug)]
pub enum Error {
    UnknownType {
        variable_name: String,
        type_name: String,
        position: Pos,
        possible_type_names: Vec<String>,
    },
    OutputTypeAsVariable {
        variable_name: String,
        type_name: String,
        position: Pos,
    },
    DuplicateVariable {
        variable_name: String,
        position: Pos,
    },
}

impl From<(&Source, Error)> for PrintableMessage {
    fn from((source, error): (&Source, Error)) -> Self {
        match error {
            Error::UnknownType { variable_name, type_name, position, possible_type_names } => {
                let extra = similar_help_suggestions(&type_name, possible_type_names.into_iter())
                    .unwrap_or_default();
                PrintableMessage::new_compile_error(
                    &format!("unknown type `{type_name}` for variable `${variable_name}`"),
                    source,
                    &position,
                    Some(&format!("This type is not defined in the schema.{extra}")),
                )
            }
            Error::OutputTypeAsVariable { variable_name, type_name, position } => PrintableMessage::new_compile_error(
                &format!("variable `${variable_name}` cannot be of output type `{type_name}`"),
                source,
                &position,
                Some("Variables must be scalars, enums or input objects."),
            ),
            Error::DuplicateVariable { variable_name, position } => PrintableMessage::new_compile_error(
                &format!("the variable `${variable_name}` is defined more than once"),
                source,
                &position,
                None,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub prop_name: String,
    pub type_ref: TypeReference,
}

fn check_variable_type(schema: &Schema, name: &str, type_ref: &TypeReference, position: Pos) -> Result<(), Error> {
    let type_name = type_ref.named_type();
    match schema.get_type_for_name(type_name).map(|named| &named.definition) {
        Some(TypeDefinition::Scalar)
        | Some(TypeDefinition::Enum(_))
        | Some(TypeDefinition::InputObject(_)) => Ok(()),
        Some(_) => Err(Error::OutputTypeAsVariable {
            variable_name: name.to_string(),
            type_name: type_name.to_string(),
            position,
        }),
        None => Err(Error::UnknownType {
            variable_name: name.to_string(),
            type_name: type_name.to_string(),
            position,
            possible_type_names: schema.type_names().cloned().collect(),
        }),
    }
}

/// Variables keep their syntactic type; the schema is only consulted to check that the
/// named type exists and is an input type.
pub fn build_variables(
    schema: &Schema,
    definitions: &[parsed_query::VariableDefinition<'_, ParsedTextType>],
) -> Result<Vec<Variable>, Vec<Error>> {
    let mut seen = HashSet::with_capacity(definitions.len());
    let mut variables = Vec::with_capacity(definitions.len());
    let mut errors = Vec::new();
    for definition in definitions {
        if !seen.insert(definition.name.as_str()) {
            errors.push(Error::DuplicateVariable {
                variable_name: definition.name.clone(),
                position: definition.position,
            });
            continue;
        }
        let type_ref = TypeReference::from(&definition.var_type);
        match check_variable_type(schema, &definition.name, &type_ref, definition.position) {
            Ok(()) => variables.push(Variable {
                prop_name: definition.name.clone(),
                type_ref,
            }),
            Err(error) => errors.push(error),
        }
    }
    if errors.is_empty() {
        Ok(variables)
    } else {
        Err(errors)
    }
}
