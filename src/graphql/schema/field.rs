use crate::graphql::ParsedTextType;
use graphql_parser::query as parsed_query;
use graphql_parser::schema as parsed_schema;
use graphql_parser::Pos;

pub type Documentation = Option<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Boolean,
    String,
    Float,
    Int,
    ID,
}

impl ScalarType {
    pub const ALL: [ScalarType; 5] = [
        ScalarType::Boolean,
        ScalarType::String,
        ScalarType::Float,
        ScalarType::Int,
        ScalarType::ID,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(ScalarType::Boolean),
            "String" => Some(ScalarType::String),
            "Float" => Some(ScalarType::Float),
            "Int" => Some(ScalarType::Int),
            "ID" => Some(ScalarType::ID),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Boolean => "Boolean",
            ScalarType::String => "String",
            ScalarType::Float => "Float",
            ScalarType::Int => "Int",
            ScalarType::ID => "ID",
        }
    }
}

/// A field or argument type as written in GraphQL, ie `[Post!]!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference {
    Named(String),
    List(Box<TypeReference>),
    NonNull(Box<TypeReference>),
}

impl TypeReference {
    /// The single named type at the bottom of the wrappers.
    pub fn named_type(&self) -> &str {
        match self {
            TypeReference::Named(name) => name,
            TypeReference::List(inner) | TypeReference::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeReference::NonNull(_))
    }
}

impl<'a> From<&parsed_query::Type<'a, ParsedTextType>> for TypeReference {
    fn from(parsed: &parsed_query::Type<'a, ParsedTextType>) -> Self {
        match parsed {
            parsed_query::Type::NamedType(name) => TypeReference::Named(name.clone()),
            parsed_query::Type::ListType(inner) => {
                TypeReference::List(Box::new(inner.as_ref().into()))
            }
            parsed_query::Type::NonNullType(inner) => {
                TypeReference::NonNull(Box::new(inner.as_ref().into()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deprecation {
    Current,
    Deprecated(Option<String>),
}

impl Deprecation {
    pub fn from_directives(directives: &[parsed_schema::Directive<'_, ParsedTextType>]) -> Self {
        let deprecated = match directives.iter().find(|d| d.name == "deprecated") {
            Some(directive) => directive,
            None => return Deprecation::Current,
        };
        let reason = deprecated
            .arguments
            .iter()
            .find(|(name, _)| name == "reason")
            .and_then(|(_, value)| match value {
                parsed_schema::Value::String(reason) => Some(reason.clone()),
                _ => None,
            });
        Deprecation::Deprecated(reason)
    }

    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Deprecation::Deprecated(reason) => reason.as_deref(),
            Deprecation::Current => None,
        }
    }
}

/// Combines a description with a trailing `@deprecated` tag for doc comments.
pub fn documentation_with_deprecation(
    description: &Documentation,
    deprecation: &Deprecation,
) -> Documentation {
    let tag = match deprecation {
        Deprecation::Current => return description.clone(),
        Deprecation::Deprecated(Some(reason)) => format!("@deprecated {reason}"),
        Deprecation::Deprecated(None) => String::from("@deprecated"),
    };
    Some(match description {
        Some(description) => format!("{description}\n{tag}"),
        None => tag,
    })
}

/// Output field of an object/interface, or an input value (argument or input object field).
/// Input values never have arguments of their own.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub position: Pos,
    pub description: Documentation,
    pub type_ref: TypeReference,
    pub arguments: Vec<Field>,
    pub deprecation: Deprecation,
}

impl Field {
    pub fn documentation(&self) -> Documentation {
        documentation_with_deprecation(&self.description, &self.deprecation)
    }
}

impl<'a> From<parsed_schema::Field<'a, ParsedTextType>> for Field {
    fn from(field: parsed_schema::Field<'a, ParsedTextType>) -> Self {
        Field {
            type_ref: (&field.field_type).into(),
            deprecation: Deprecation::from_directives(&field.directives),
            arguments: field.arguments.into_iter().map(Field::from).collect(),
            name: field.name,
            position: field.position,
            description: field.description,
        }
    }
}

impl<'a> From<parsed_schema::InputValue<'a, ParsedTextType>> for Field {
    fn from(value: parsed_schema::InputValue<'a, ParsedTextType>) -> Self {
        Field {
            type_ref: (&value.value_type).into(),
            deprecation: Deprecation::from_directives(&value.directives),
            arguments: Vec::new(),
            name: value.name,
            position: value.position,
            description: value.description,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub description: Documentation,
    pub deprecation: Deprecation,
}

impl EnumValue {
    pub fn documentation(&self) -> Documentation {
        documentation_with_deprecation(&self.description, &self.deprecation)
    }
}

impl<'a> From<parsed_schema::EnumValue<'a, ParsedTextType>> for EnumValue {
    fn from(value: parsed_schema::EnumValue<'a, ParsedTextType>) -> Self {
        EnumValue {
            deprecation: Deprecation::from_directives(&value.directives),
            name: value.name,
            description: value.description,
        }
    }
}
