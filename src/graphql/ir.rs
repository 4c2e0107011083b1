//! Operations resolved against the schema: the shape comes from the selection set, every
//! type comes from the schema field it selects.
use super::ParsedTextType;
use crate::cli::{similar_help_suggestions, PrintableMessage};
use crate::graphql::schema::field::{Documentation, TypeReference};
use crate::graphql::schema::{NamedType, OperationKind, Schema, TypeDefinition};
use crate::graphql::variable::{self, Variable};
use crate::source::Source;
use graphql_parser::query as parsed_query;
use graphql_parser::Pos;
use heck::ToUpperCamelCase;

const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug)]
pub enum Warning {
    DeprecatedFieldUse {
        position: Pos,
        field_name: String,
        parent_type_name: String,
        reason: Option<String>,
    },
}

impl From<(&Source, Warning)> for PrintableMessage {
    fn from((source, warning): (&Source, Warning)) -> Self {
        match warning {
            Warning::DeprecatedFieldUse { position, field_name, parent_type_name, reason } => {
                PrintableMessage::new_compile_warning(
                    &format!("use of deprecated field `{field_name}` on type `{parent_type_name}`"),
                    source,
                    &position,
                    reason.as_deref(),
                )
            }
        }
    }
}

#[derive(Debug)]
pub enum Error {
    SelectionSetAsOperationUnsupported(Pos),
    AnonymousOperationUnsupported(OperationKind, Pos),
    FragmentDefinitionUnsupported(String, Pos),
    FragmentSpreadUnsupported(String, Pos),
    InlineFragmentUnsupported(Pos),
    MissingRootType(OperationKind, Pos),
    SelectionSetOnWrongType(String, Pos),
    MissingSelectionSetOnType(String, Pos),
    UnknownField {
        parent_type_name: String,
        field_name: String,
        position: Pos,
        possible_field_names: Vec<String>,
    },
    ConflictingSelection {
        prop_name: String,
        position: Pos,
    },
    MissingType(String),
    Variable(variable::Error),
}

impl From<(&Source, Error)> for PrintableMessage {
    fn from((source, error): (&Source, Error)) -> Self {
        match error {
            Error::SelectionSetAsOperationUnsupported(position) => PrintableMessage::new_compile_error(
                "unsupported selection set as operation",
                source,
                &position,
                Some("Operations must be named, ie `query getPost { ... }`."),
            ),
            Error::AnonymousOperationUnsupported(kind, position) => PrintableMessage::new_compile_error(
                &format!("unsupported anonymous {}", kind.as_str()),
                source,
                &position,
                Some("The operation name is used to name the generated types and file."),
            ),
            Error::FragmentDefinitionUnsupported(name, position) => PrintableMessage::new_compile_error(
                &format!("unsupported fragment definition `{name}`"),
                source,
                &position,
                Some("Fragments are not supported, select the fields directly instead."),
            ),
            Error::FragmentSpreadUnsupported(name, position) => PrintableMessage::new_compile_error(
                &format!("unsupported fragment spread `...{name}`"),
                source,
                &position,
                Some("Fragments are not supported, select the fields directly instead."),
            ),
            Error::InlineFragmentUnsupported(position) => PrintableMessage::new_compile_error(
                "unsupported inline fragment",
                source,
                &position,
                Some("Fragments are not supported, select the fields directly instead."),
            ),
            Error::MissingRootType(kind, position) => PrintableMessage::new_compile_error(
                &format!("the schema has no {} type", kind.as_str()),
                source,
                &position,
                None,
            ),
            Error::SelectionSetOnWrongType(name, position) => PrintableMessage::new_compile_error(
                &format!("unexpected selection on field of type `{name}`"),
                source,
                &position,
                Some("This field is not a complex type with selections. Did you accidentally place the curlies on this field?"),
            ),
            Error::MissingSelectionSetOnType(name, position) => PrintableMessage::new_compile_error(
                &format!("expected selection on field of type `{name}`"),
                source,
                &position,
                Some("This is a complex type, and it is improper GraphQL to not have at least one sub field selection."),
            ),
            Error::UnknownField {
                parent_type_name,
                field_name,
                position,
                possible_field_names,
            } => {
                let extra = similar_help_suggestions(&field_name, possible_field_names.into_iter())
                    .unwrap_or_default();
                PrintableMessage::new_compile_error(
                    &format!("unknown field `{field_name}`"),
                    source,
                    &position,
                    Some(&format!("Check the fields of `{parent_type_name}`.{extra}")),
                )
            }
            Error::ConflictingSelection { prop_name, position } => PrintableMessage::new_compile_error(
                &format!("conflicting selections for `{prop_name}`"),
                source,
                &position,
                Some("Another selection in this set uses the same name for a different field. Use an alias to tell them apart."),
            ),
            Error::MissingType(type_name) => PrintableMessage::new_simple_program_error(
                &format!("failed lookup of type `{type_name}`"),
            ),
            Error::Variable(variable_error) => PrintableMessage::from((source, variable_error)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionKind {
    /// `__typename`, with the object type name when it is known statically
    Typename(Option<String>),
    Leaf(TypeReference),
    Composite {
        type_ref: TypeReference,
        fields: Vec<SelectionField>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionField {
    /// Alias, or the field name when there is none
    pub prop_name: String,
    pub field_name: String,
    pub position: Pos,
    pub documentation: Documentation,
    pub kind: SelectionKind,
}

#[derive(Debug)]
pub struct Operation {
    pub original_name: String,
    pub kind: OperationKind,
    pub position: Pos,
    pub fields: Vec<SelectionField>,
    pub variables: Vec<Variable>,
    pub source_text: String,
}

impl Operation {
    /// `getPost` + `query` = `GetPostQuery`
    pub fn compiled_name(&self) -> String {
        format!(
            "{}{}",
            self.original_name.to_upper_camel_case(),
            self.kind.as_str().to_upper_camel_case(),
        )
    }

    /// Name of the source constant and of the generated file. The operation name is kept
    /// as written, so `GETPOST` gives `GETPOSTQuery`.
    pub fn constant_name(&self) -> String {
        format!(
            "{}{}",
            self.original_name,
            self.kind.as_str().to_upper_camel_case(),
        )
    }
}

pub type OperationResult =
    std::result::Result<(Operation, Vec<Warning>), (Vec<Error>, Vec<Warning>)>;

struct Builder<'a> {
    schema: &'a Schema,
    show_deprecation_warnings: bool,
    warnings: Vec<Warning>,
}

impl<'a> Builder<'a> {
    fn build_selection_set(
        &mut self,
        parent: &'a NamedType,
        selection_set: &parsed_query::SelectionSet<'_, ParsedTextType>,
    ) -> Result<Vec<SelectionField>, Vec<Error>> {
        let mut fields: Vec<SelectionField> = Vec::with_capacity(selection_set.items.len());
        let mut errors = Vec::new();
        for selection in &selection_set.items {
            let built = match selection {
                parsed_query::Selection::Field(field) => self.build_field(parent, field),
                parsed_query::Selection::FragmentSpread(spread) => Err(vec![
                    Error::FragmentSpreadUnsupported(spread.fragment_name.clone(), spread.position),
                ]),
                parsed_query::Selection::InlineFragment(inline) => {
                    Err(vec![Error::InlineFragmentUnsupported(inline.position)])
                }
            };
            match built {
                Ok(field) => {
                    if let Err(error) = merge_field(&mut fields, field) {
                        errors.push(error);
                    }
                }
                Err(field_errors) => errors.extend(field_errors),
            }
        }
        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(errors)
        }
    }

    fn build_field(
        &mut self,
        parent: &'a NamedType,
        field: &parsed_query::Field<'_, ParsedTextType>,
    ) -> Result<SelectionField, Vec<Error>> {
        let prop_name = field.alias.as_ref().unwrap_or(&field.name).clone();
        let has_selections = !field.selection_set.items.is_empty();

        if field.name == TYPENAME_FIELD {
            if has_selections {
                return Err(vec![Error::SelectionSetOnWrongType(
                    "String".to_string(),
                    field.position,
                )]);
            }
            let object_name = match parent.definition {
                TypeDefinition::Object(_) => Some(parent.name.clone()),
                _ => None,
            };
            return Ok(SelectionField {
                prop_name,
                field_name: field.name.clone(),
                position: field.position,
                documentation: None,
                kind: SelectionKind::Typename(object_name),
            });
        }

        let schema_field = parent
            .definition
            .get_fields_lookup()
            .and_then(|lookup| lookup.get(&field.name))
            .ok_or_else(|| {
                let possible_field_names = parent
                    .definition
                    .get_fields_lookup()
                    .into_iter()
                    .flat_map(|lookup| lookup.keys().cloned())
                    .chain(std::iter::once(TYPENAME_FIELD.to_string()))
                    .collect();
                vec![Error::UnknownField {
                    parent_type_name: parent.name.clone(),
                    field_name: field.name.clone(),
                    position: field.position,
                    possible_field_names,
                }]
            })?;

        if self.show_deprecation_warnings && schema_field.deprecation.is_deprecated() {
            self.warnings.push(Warning::DeprecatedFieldUse {
                position: field.position,
                field_name: field.name.clone(),
                parent_type_name: parent.name.clone(),
                reason: schema_field.deprecation.reason().map(str::to_string),
            });
        }

        let type_name = schema_field.type_ref.named_type();
        let target = self
            .schema
            .get_type_for_name(type_name)
            .ok_or_else(|| vec![Error::MissingType(type_name.to_string())])?;
        let kind = match (&target.definition, has_selections) {
            (TypeDefinition::Object(_) | TypeDefinition::Interface(_), false) => {
                return Err(vec![Error::MissingSelectionSetOnType(
                    type_name.to_string(),
                    field.position,
                )])
            }
            (TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_), true) => {
                SelectionKind::Composite {
                    type_ref: schema_field.type_ref.clone(),
                    fields: self.build_selection_set(target, &field.selection_set)?,
                }
            }
            (_, true) => {
                return Err(vec![Error::SelectionSetOnWrongType(
                    type_name.to_string(),
                    field.position,
                )])
            }
            (_, false) => SelectionKind::Leaf(schema_field.type_ref.clone()),
        };
        Ok(SelectionField {
            prop_name,
            field_name: field.name.clone(),
            position: field.position,
            documentation: schema_field.documentation(),
            kind,
        })
    }
}

/// Adds `field` to the selection set, merging repeated selections of the same field.
fn merge_field(fields: &mut Vec<SelectionField>, field: SelectionField) -> Result<(), Error> {
    let existing = match fields.iter().position(|existing| existing.prop_name == field.prop_name) {
        Some(index) => &mut fields[index],
        None => {
            fields.push(field);
            return Ok(());
        }
    };
    let conflict = || Error::ConflictingSelection {
        prop_name: field.prop_name.clone(),
        position: field.position,
    };
    if existing.field_name != field.field_name {
        return Err(conflict());
    }
    match (&mut existing.kind, &field.kind) {
        (SelectionKind::Typename(_), SelectionKind::Typename(_))
        | (SelectionKind::Leaf(_), SelectionKind::Leaf(_)) => Ok(()),
        (SelectionKind::Composite { fields: existing_fields, .. }, SelectionKind::Composite { fields: new_fields, .. }) => {
            for new_field in new_fields.iter().cloned() {
                merge_field(existing_fields, new_field)?;
            }
            Ok(())
        }
        _ => Err(conflict()),
    }
}

impl Operation {
    pub fn compile(
        definition: &parsed_query::OperationDefinition<'_, ParsedTextType>,
        schema: &Schema,
        source: &Source,
        show_deprecation_warnings: bool,
    ) -> OperationResult {
        let (kind, position, name, variable_definitions, selection_set) = match definition {
            parsed_query::OperationDefinition::SelectionSet(selection_set) => {
                return Err((
                    vec![Error::SelectionSetAsOperationUnsupported(selection_set.span.0)],
                    Vec::new(),
                ))
            }
            parsed_query::OperationDefinition::Query(query) => (
                OperationKind::Query,
                query.position,
                &query.name,
                &query.variable_definitions,
                &query.selection_set,
            ),
            parsed_query::OperationDefinition::Mutation(mutation) => (
                OperationKind::Mutation,
                mutation.position,
                &mutation.name,
                &mutation.variable_definitions,
                &mutation.selection_set,
            ),
            parsed_query::OperationDefinition::Subscription(subscription) => (
                OperationKind::Subscription,
                subscription.position,
                &subscription.name,
                &subscription.variable_definitions,
                &subscription.selection_set,
            ),
        };
        let name = match name {
            Some(name) => name,
            None => {
                return Err((
                    vec![Error::AnonymousOperationUnsupported(kind, position)],
                    Vec::new(),
                ))
            }
        };
        let root = match schema.root_type(kind) {
            Some(root) => root,
            None => return Err((vec![Error::MissingRootType(kind, position)], Vec::new())),
        };

        let mut builder = Builder {
            schema,
            show_deprecation_warnings,
            warnings: Vec::new(),
        };
        let mut errors = Vec::new();
        let variables = variable::build_variables(schema, variable_definitions)
            .unwrap_or_else(|variable_errors| {
                errors.extend(variable_errors.into_iter().map(Error::Variable));
                Vec::new()
            });
        let fields = builder
            .build_selection_set(root, selection_set)
            .unwrap_or_else(|field_errors| {
                errors.extend(field_errors);
                Vec::new()
            });
        if !errors.is_empty() {
            return Err((errors, builder.warnings));
        }

        let operation = Operation {
            original_name: name.clone(),
            kind,
            position,
            fields,
            variables,
            source_text: source.definition_text(&position).to_string(),
        };
        Ok((operation, builder.warnings))
    }
}
