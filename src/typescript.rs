use crate::cli::PrintableMessage;
use crate::graphql::schema::field::{ScalarType, TypeReference};
use crate::graphql::schema::Schema;
use heck::ToUpperCamelCase;
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};

pub mod named;
pub mod operation;
pub mod reference;

pub use reference::ReferencedTypes;

pub const HEADER: &str = "/* eslint-disable */
// This file was automatically generated and should not be edited.

";

pub type Typescript = String;

pub type RequiredTypes = IndexSet<String>;

pub type LocalNames = HashSet<String>;

#[derive(Debug)]
pub struct Declaration {
    pub name: String,
    pub contents: Typescript,
    pub required_types: RequiredTypes,
    pub shadowed_types: RequiredTypes,
}

/// Module level alias for a type hidden by a namespace member of the same name
pub fn shadowed_type_name(type_name: &str) -> String {
    format!("__{type_name}")
}

pub fn compile_shadowed_type_aliases<'a>(
    shadowed_types: impl IntoIterator<Item = &'a String>,
) -> Vec<Typescript> {
    shadowed_types
        .into_iter()
        .map(|type_name| format!("type {} = {type_name};", shadowed_type_name(type_name)))
        .collect()
}

/// Namespace member names for a list of fields, in the same order. Names that collide once
/// cased (`userId` and `user_id`) get a numeric suffix after their first use.
pub fn unique_alias_names<'a>(field_names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let bases: Vec<String> = field_names
        .into_iter()
        .map(|name| match name.to_upper_camel_case() {
            cased if cased.is_empty() => String::from("Field"),
            cased => cased,
        })
        .collect();
    let mut taken: HashSet<String> = bases.iter().cloned().collect();
    let mut used = HashSet::with_capacity(bases.len());
    bases
        .into_iter()
        .map(|base| {
            if used.insert(base.clone()) {
                return base;
            }
            let mut suffix = 2;
            let mut alias = format!("{base}{suffix}");
            while taken.contains(&alias) {
                suffix += 1;
                alias = format!("{base}{suffix}");
            }
            taken.insert(alias.clone());
            alias
        })
        .collect()
}

#[derive(Debug)]
pub enum ScalarOverrideError {
    InvalidValue {
        scalar_name: String,
        value: serde_json::Value,
    },
}

impl From<ScalarOverrideError> for PrintableMessage {
    fn from(error: ScalarOverrideError) -> Self {
        match error {
            ScalarOverrideError::InvalidValue { scalar_name, value } => {
                PrintableMessage::new_simple_program_error(&format!(
                    "invalid override for scalar `{scalar_name}`: expected a string or a number, found `{value}`"
                ))
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScalarOverrides {
    overrides: HashMap<String, Typescript>,
}

impl ScalarOverrides {
    pub fn try_from_values(
        values: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Result<Self, ScalarOverrideError> {
        let overrides = values
            .into_iter()
            .map(|(scalar_name, value)| match value {
                serde_json::Value::String(literal) => Ok((scalar_name, literal)),
                serde_json::Value::Number(number) => Ok((scalar_name, number.to_string())),
                value => Err(ScalarOverrideError::InvalidValue { scalar_name, value }),
            })
            .collect::<Result<_, _>>()?;
        Ok(ScalarOverrides { overrides })
    }

    pub fn get(&self, scalar_name: &str) -> Option<&str> {
        self.overrides.get(scalar_name).map(String::as_str)
    }

    pub fn resolve(&self, scalar_name: &str) -> Typescript {
        if let Some(literal) = self.get(scalar_name) {
            return literal.to_string();
        }
        let built_in = match ScalarType::from_name(scalar_name) {
            Some(ScalarType::Boolean) => "boolean",
            Some(ScalarType::Int) | Some(ScalarType::Float) => "number",
            Some(ScalarType::String) => "string",
            Some(ScalarType::ID) | None => "any",
        };
        built_in.to_string()
    }
}

#[derive(Debug)]
pub struct CompileContext<'a> {
    pub schema: &'a Schema,
    pub scalars: &'a ScalarOverrides,
    pub include_descriptions: bool,
    pub operations_wrap: bool,
}

impl<'a> CompileContext<'a> {
    fn documentation(&self, documentation: Option<&str>, tab_width: usize) -> String {
        if !self.include_descriptions {
            return String::new();
        }
        compile_documentation(documentation, tab_width)
    }

    fn compile_input_member(
        &self,
        name: &str,
        type_ref: &TypeReference,
        documentation: Option<&str>,
        tab_width: usize,
        local_names: &LocalNames,
        referenced: &mut ReferencedTypes,
    ) -> Typescript {
        let resolved = reference::resolve(self, type_ref, local_names);
        referenced.extend(resolved.referenced);
        let optional = if type_ref.is_non_null() { "" } else { "?" };
        format!(
            "{}{}{name}{optional}: {};",
            " ".repeat(tab_width),
            self.documentation(documentation, tab_width),
            resolved.text,
        )
    }
}

pub fn compile_documentation(documentation: Option<&str>, tab_width: usize) -> String {
    match documentation {
        Some(documentation) => {
            let tab = " ".repeat(tab_width);
            let processed = documentation
                .lines()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<&str>>()
                .join(&format!("\n{tab} * "))
                .replace("*/", "");
            if processed.is_empty() {
                return String::new();
            }
            format!("/**\n{tab} * {processed}\n{tab} */\n{tab}")
        }
        None => String::new(),
    }
}

pub fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn built_in_scalars_are_total() {
        let scalars = ScalarOverrides::default();
        let resolved: Vec<String> = ScalarType::ALL
            .iter()
            .map(|scalar| scalars.resolve(scalar.name()))
            .collect();
        assert_eq!(resolved, vec!["boolean", "string", "number", "number", "any"]);
        assert_eq!(scalars.resolve("DateTime"), "any");
    }

    #[test]
    fn overrides_accept_strings_and_numbers() {
        let scalars = ScalarOverrides::try_from_values(vec![
            ("DateTime".to_string(), json!("string")),
            ("Port".to_string(), json!(8080)),
            ("ID".to_string(), json!("string")),
        ])
        .unwrap();
        assert_eq!(scalars.resolve("DateTime"), "string");
        assert_eq!(scalars.resolve("Port"), "8080");
        assert_eq!(scalars.resolve("ID"), "string");
    }

    #[test]
    fn overrides_reject_other_values() {
        for value in [json!(true), json!(null), json!(["string"]), json!({ "type": "string" })] {
            let result = ScalarOverrides::try_from_values(vec![("DateTime".to_string(), value)]);
            assert!(matches!(
                result,
                Err(ScalarOverrideError::InvalidValue { ref scalar_name, .. }) if scalar_name == "DateTime"
            ));
        }
    }

    #[test]
    fn documentation_is_indented_and_sanitized() {
        assert_eq!(
            compile_documentation(Some("  First line\n\n  second */ line  "), 2),
            "/**\n   * First line\n   * second  line\n   */\n  ",
        );
        assert_eq!(compile_documentation(Some("Top"), 0), "/**\n * Top\n */\n");
        assert_eq!(compile_documentation(None, 4), "");
    }

    #[test]
    fn shadowed_types_get_module_aliases() {
        let shadowed: RequiredTypes = ["Author".to_string()].into_iter().collect();
        assert_eq!(
            compile_shadowed_type_aliases(&shadowed),
            vec!["type __Author = Author;"]
        );
    }

    #[test]
    fn alias_names_are_unique_within_a_namespace() {
        assert_eq!(
            unique_alias_names(["userId", "user_id", "UserId2", "_id", "id", "__typename"]),
            vec!["UserId", "UserId3", "UserId2", "Id", "Id2", "Typename"]
        );
        assert_eq!(unique_alias_names(["_"]), vec!["Field"]);
    }

    #[test]
    fn template_literals_are_escaped() {
        assert_eq!(
            escape_template_literal("a `b` ${c} \\d"),
            "a \\`b\\` \\${c} \\\\d"
        );
    }
}
