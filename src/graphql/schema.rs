//! Navigable type graph built from GraphQL SDL
use crate::cli::{similar_help_suggestions, PrintableMessage};
use crate::graphql::ParsedTextType;
use crate::source::Source;
use field::{Documentation, EnumValue, Field, ScalarType};
use graphql_parser::schema as parsed_schema;
use graphql_parser::Pos;
use indexmap::map::Entry;
use indexmap::IndexMap;

pub mod field;
pub mod ordering;

pub type FieldsLookup = IndexMap<String, Field>;

#[derive(Debug)]
pub enum Error {
    Parse(parsed_schema::ParseError),
    DuplicateType {
        name: String,
        position: Pos,
    },
    DuplicateField {
        type_name: String,
        field_name: String,
        position: Pos,
    },
    DuplicateSchemaDefinition(Pos),
    ExtensionOfUnknownType {
        name: String,
        position: Pos,
        possible_type_names: Vec<String>,
    },
    MismatchedExtension {
        name: String,
        kind: TypeKind,
        position: Pos,
    },
    UnknownType {
        name: String,
        position: Pos,
        possible_type_names: Vec<String>,
    },
    UnknownRootType {
        name: String,
        kind: OperationKind,
        position: Pos,
    },
    InputTypeInOutput {
        type_name: String,
        field_name: String,
        position: Pos,
    },
    OutputTypeInInput {
        type_name: String,
        field_name: String,
        position: Pos,
    },
    NonObjectUnionMember {
        union_name: String,
        member_name: String,
        position: Pos,
    },
}

impl From<(&Source, Error)> for PrintableMessage {
    fn from((source, error): (&Source, Error)) -> Self {
        match error {
            Error::Parse(parse_error) => {
                let mut message = PrintableMessage::new_simple_compile_error(&format!("{parse_error}"));
                message.with_source_information(source.primary_path(), None);
                message
            }
            Error::DuplicateType { name, position } => PrintableMessage::new_compile_error(
                &format!("the type `{name}` is defined more than once"),
                source,
                &position,
                Some("Use `extend type` to add fields to an existing type."),
            ),
            Error::DuplicateField { type_name, field_name, position } => PrintableMessage::new_compile_error(
                &format!("the field `{field_name}` is defined more than once on type `{type_name}`"),
                source,
                &position,
                None,
            ),
            Error::DuplicateSchemaDefinition(position) => PrintableMessage::new_compile_error(
                "the schema definition is defined more than once",
                source,
                &position,
                None,
            ),
            Error::ExtensionOfUnknownType { name, position, possible_type_names } => {
                let extra = similar_help_suggestions(&name, possible_type_names.into_iter())
                    .unwrap_or_default();
                PrintableMessage::new_compile_error(
                    &format!("cannot extend unknown type `{name}`"),
                    source,
                    &position,
                    Some(&format!("Extensions must refer to a type defined in the schema.{extra}")),
                )
            }
            Error::MismatchedExtension { name, kind, position } => PrintableMessage::new_compile_error(
                &format!("extension of `{name}` does not match its kind `{}`", kind.as_str()),
                source,
                &position,
                None,
            ),
            Error::UnknownType { name, position, possible_type_names } => {
                let extra = similar_help_suggestions(&name, possible_type_names.into_iter())
                    .unwrap_or_default();
                PrintableMessage::new_compile_error(
                    &format!("unknown type `{name}`"),
                    source,
                    &position,
                    Some(&format!("This type is not defined in the schema.{extra}")),
                )
            }
            Error::UnknownRootType { name, kind, position } => PrintableMessage::new_compile_error(
                &format!("unknown {} root type `{name}`", kind.as_str()),
                source,
                &position,
                Some("Root operation types must be object types defined in the schema."),
            ),
            Error::InputTypeInOutput { type_name, field_name, position } => PrintableMessage::new_compile_error(
                &format!("input type `{type_name}` used as the output of field `{field_name}`"),
                source,
                &position,
                None,
            ),
            Error::OutputTypeInInput { type_name, field_name, position } => PrintableMessage::new_compile_error(
                &format!("output type `{type_name}` used as the input value `{field_name}`"),
                source,
                &position,
                Some("Only scalars, enums and input objects can be used as inputs."),
            ),
            Error::NonObjectUnionMember { union_name, member_name, position } => PrintableMessage::new_compile_error(
                &format!("union `{union_name}` includes `{member_name}`, which is not an object type"),
                source,
                &position,
                None,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    fn default_root_type_name(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

/// Kind of a named type, in default display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeKind {
    Scalar,
    Enum,
    Interface,
    InputObject,
    Union,
    Object,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
            TypeKind::Interface => "interface",
            TypeKind::InputObject => "input",
            TypeKind::Union => "union",
            TypeKind::Object => "type",
        }
    }
}

#[derive(Debug)]
pub struct ObjectType {
    pub fields: FieldsLookup,
    pub interfaces: Vec<String>,
}

#[derive(Debug)]
pub struct InterfaceType {
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct InputObjectType {
    pub fields: FieldsLookup,
}

#[derive(Debug)]
pub struct UnionType {
    pub possible_types: Vec<String>,
}

#[derive(Debug)]
pub struct EnumType {
    pub values: Vec<EnumValue>,
}

#[derive(Debug)]
pub enum TypeDefinition {
    Scalar,
    Enum(EnumType),
    Object(ObjectType),
    Interface(InterfaceType),
    InputObject(InputObjectType),
    Union(UnionType),
}

impl TypeDefinition {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Scalar => TypeKind::Scalar,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
            TypeDefinition::Union(_) => TypeKind::Union,
        }
    }

    /// Fields that can be selected on, if any
    pub fn get_fields_lookup(&self) -> Option<&FieldsLookup> {
        match self {
            TypeDefinition::Object(ObjectType { fields, .. })
            | TypeDefinition::Interface(InterfaceType { fields }) => Some(fields),
            _ => None,
        }
    }

    /// Types that have a shape of their own and require a selection set in operations.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Object(_) | TypeDefinition::Interface(_) | TypeDefinition::Union(_)
        )
    }

    fn is_input(&self) -> bool {
        matches!(
            self,
            TypeDefinition::Scalar | TypeDefinition::Enum(_) | TypeDefinition::InputObject(_)
        )
    }
}

/// Where a named type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    BuiltIn,
    Declared(Pos),
}

#[derive(Debug)]
pub struct NamedType {
    pub name: String,
    pub documentation: Documentation,
    pub origin: Origin,
    pub definition: TypeDefinition,
}

impl NamedType {
    pub fn is_declared(&self) -> bool {
        matches!(self.origin, Origin::Declared(_))
    }

    pub fn kind(&self) -> TypeKind {
        self.definition.kind()
    }

    fn built_in_scalar(scalar: ScalarType) -> Self {
        NamedType {
            name: scalar.name().to_string(),
            documentation: None,
            origin: Origin::BuiltIn,
            definition: TypeDefinition::Scalar,
        }
    }
}

fn fields_lookup<F: Into<Field>>(
    type_name: &str,
    fields: Vec<F>,
) -> Result<FieldsLookup, Error> {
    let mut lookup = FieldsLookup::with_capacity(fields.len());
    extend_fields_lookup(type_name, &mut lookup, fields)?;
    Ok(lookup)
}

fn extend_fields_lookup<F: Into<Field>>(
    type_name: &str,
    lookup: &mut FieldsLookup,
    fields: Vec<F>,
) -> Result<(), Error> {
    for field in fields {
        let field: Field = field.into();
        match lookup.entry(field.name.clone()) {
            Entry::Occupied(_) => {
                return Err(Error::DuplicateField {
                    type_name: type_name.to_string(),
                    field_name: field.name,
                    position: field.position,
                })
            }
            Entry::Vacant(vacancy) => {
                vacancy.insert(field);
            }
        }
    }
    Ok(())
}

impl<'a> TryFrom<parsed_schema::TypeDefinition<'a, ParsedTextType>> for NamedType {
    type Error = Error;

    fn try_from(definition: parsed_schema::TypeDefinition<'a, ParsedTextType>) -> Result<Self, Error> {
        let named = match definition {
            parsed_schema::TypeDefinition::Scalar(scalar) => NamedType {
                origin: Origin::Declared(scalar.position),
                definition: TypeDefinition::Scalar,
                name: scalar.name,
                documentation: scalar.description,
            },
            parsed_schema::TypeDefinition::Object(object) => NamedType {
                origin: Origin::Declared(object.position),
                definition: TypeDefinition::Object(ObjectType {
                    fields: fields_lookup(&object.name, object.fields)?,
                    interfaces: object.implements_interfaces,
                }),
                name: object.name,
                documentation: object.description,
            },
            parsed_schema::TypeDefinition::Interface(interface) => NamedType {
                origin: Origin::Declared(interface.position),
                definition: TypeDefinition::Interface(InterfaceType {
                    fields: fields_lookup(&interface.name, interface.fields)?,
                }),
                name: interface.name,
                documentation: interface.description,
            },
            parsed_schema::TypeDefinition::Union(union) => NamedType {
                origin: Origin::Declared(union.position),
                definition: TypeDefinition::Union(UnionType {
                    possible_types: union.types,
                }),
                name: union.name,
                documentation: union.description,
            },
            parsed_schema::TypeDefinition::Enum(enumeration) => NamedType {
                origin: Origin::Declared(enumeration.position),
                definition: TypeDefinition::Enum(EnumType {
                    values: enumeration.values.into_iter().map(EnumValue::from).collect(),
                }),
                name: enumeration.name,
                documentation: enumeration.description,
            },
            parsed_schema::TypeDefinition::InputObject(input) => NamedType {
                origin: Origin::Declared(input.position),
                definition: TypeDefinition::InputObject(InputObjectType {
                    fields: fields_lookup(&input.name, input.fields)?,
                }),
                name: input.name,
                documentation: input.description,
            },
        };
        Ok(named)
    }
}

#[derive(Debug, Default)]
struct RootTypeNames {
    query: Option<(String, Pos)>,
    mutation: Option<(String, Pos)>,
    subscription: Option<(String, Pos)>,
}

#[derive(Debug)]
pub struct Schema {
    types: IndexMap<String, NamedType>,
    query_type: Option<String>,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    /// Builds the graph in two phases: every named type (plus extensions) is collected first,
    /// then root operation types and type references are resolved against the full set.
    pub fn from_sdl(contents: &str) -> Result<Self, Vec<Error>> {
        let document = graphql_parser::parse_schema::<ParsedTextType>(contents)
            .map_err(|parse_error| vec![Error::Parse(parse_error)])?;

        let mut types: IndexMap<String, NamedType> = ScalarType::ALL
            .iter()
            .map(|scalar| (scalar.name().to_string(), NamedType::built_in_scalar(*scalar)))
            .collect();
        let mut roots: Option<RootTypeNames> = None;
        let mut extensions = Vec::new();
        let mut errors = Vec::new();

        for definition in document.definitions {
            match definition {
                parsed_schema::Definition::SchemaDefinition(schema_definition) => {
                    if roots.is_some() {
                        errors.push(Error::DuplicateSchemaDefinition(schema_definition.position));
                        continue;
                    }
                    let position = schema_definition.position;
                    roots = Some(RootTypeNames {
                        query: schema_definition.query.map(|name| (name, position)),
                        mutation: schema_definition.mutation.map(|name| (name, position)),
                        subscription: schema_definition.subscription.map(|name| (name, position)),
                    });
                }
                parsed_schema::Definition::TypeDefinition(type_definition) => {
                    if let Err(error) = insert_type(&mut types, type_definition) {
                        errors.push(error);
                    }
                }
                parsed_schema::Definition::TypeExtension(extension) => extensions.push(extension),
                parsed_schema::Definition::DirectiveDefinition(_) => {}
            }
        }

        for extension in extensions {
            if let Err(error) = apply_extension(&mut types, extension) {
                errors.push(error);
            }
        }

        let roots = roots.unwrap_or_default();
        let mut schema = Schema {
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            types,
        };
        for (kind, explicit) in [
            (OperationKind::Query, roots.query),
            (OperationKind::Mutation, roots.mutation),
            (OperationKind::Subscription, roots.subscription),
        ] {
            match schema.resolve_root_type(kind, explicit) {
                Ok(name) => schema.set_root_type_name(kind, name),
                Err(error) => errors.push(error),
            }
        }
        errors.extend(schema.check_references());

        if errors.is_empty() {
            Ok(schema)
        } else {
            Err(errors)
        }
    }

    pub fn get_type_for_name(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// Every type in the graph, built-in scalars first, then declaration order.
    pub fn named_types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn declared_types(&self) -> impl Iterator<Item = &NamedType> {
        self.named_types().filter(|named| named.is_declared())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &String> {
        self.types.keys()
    }

    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query_type.as_deref(),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub fn root_type(&self, kind: OperationKind) -> Option<&NamedType> {
        self.root_type_name(kind)
            .and_then(|name| self.get_type_for_name(name))
    }

    fn set_root_type_name(&mut self, kind: OperationKind, name: Option<String>) {
        match kind {
            OperationKind::Query => self.query_type = name,
            OperationKind::Mutation => self.mutation_type = name,
            OperationKind::Subscription => self.subscription_type = name,
        }
    }

    fn resolve_root_type(
        &self,
        kind: OperationKind,
        explicit: Option<(String, Pos)>,
    ) -> Result<Option<String>, Error> {
        let (name, position) = match explicit {
            Some(explicit) => explicit,
            None => {
                let default_name = kind.default_root_type_name();
                return Ok(self
                    .types
                    .get(default_name)
                    .filter(|named| matches!(named.definition, TypeDefinition::Object(_)))
                    .map(|_| default_name.to_string()));
            }
        };
        match self.types.get(&name).map(|named| &named.definition) {
            Some(TypeDefinition::Object(_)) => Ok(Some(name)),
            _ => Err(Error::UnknownRootType {
                name,
                kind,
                position,
            }),
        }
    }

    fn unknown_type(&self, name: &str, position: Pos) -> Error {
        Error::UnknownType {
            name: name.to_string(),
            position,
            possible_type_names: self.types.keys().cloned().collect(),
        }
    }

    fn check_input_value(&self, value: &Field) -> Option<Error> {
        let type_name = value.type_ref.named_type();
        match self.types.get(type_name) {
            None => Some(self.unknown_type(type_name, value.position)),
            Some(named) if !named.definition.is_input() => Some(Error::OutputTypeInInput {
                type_name: type_name.to_string(),
                field_name: value.name.clone(),
                position: value.position,
            }),
            Some(_) => None,
        }
    }

    fn check_output_fields(&self, fields: &FieldsLookup) -> Vec<Error> {
        let mut errors = Vec::new();
        for field in fields.values() {
            let type_name = field.type_ref.named_type();
            match self.types.get(type_name) {
                None => errors.push(self.unknown_type(type_name, field.position)),
                Some(named) if matches!(named.definition, TypeDefinition::InputObject(_)) => {
                    errors.push(Error::InputTypeInOutput {
                        type_name: type_name.to_string(),
                        field_name: field.name.clone(),
                        position: field.position,
                    })
                }
                Some(_) => {}
            }
            errors.extend(
                field
                    .arguments
                    .iter()
                    .filter_map(|argument| self.check_input_value(argument)),
            );
        }
        errors
    }

    /// Every name referenced by a field, argument, union or interface list must resolve.
    fn check_references(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        for named in self.declared_types() {
            let position = match named.origin {
                Origin::Declared(position) => position,
                Origin::BuiltIn => continue,
            };
            match &named.definition {
                TypeDefinition::Object(object) => {
                    errors.extend(self.check_output_fields(&object.fields));
                    for interface_name in &object.interfaces {
                        let is_interface = matches!(
                            self.types.get(interface_name).map(|t| &t.definition),
                            Some(TypeDefinition::Interface(_))
                        );
                        if !is_interface {
                            errors.push(self.unknown_type(interface_name, position));
                        }
                    }
                }
                TypeDefinition::Interface(interface) => {
                    errors.extend(self.check_output_fields(&interface.fields));
                }
                TypeDefinition::InputObject(input) => {
                    errors.extend(
                        input
                            .fields
                            .values()
                            .filter_map(|value| self.check_input_value(value)),
                    );
                }
                TypeDefinition::Union(union) => {
                    for member_name in &union.possible_types {
                        match self.types.get(member_name).map(|t| &t.definition) {
                            None => errors.push(self.unknown_type(member_name, position)),
                            Some(TypeDefinition::Object(_)) => {}
                            Some(_) => errors.push(Error::NonObjectUnionMember {
                                union_name: named.name.clone(),
                                member_name: member_name.clone(),
                                position,
                            }),
                        }
                    }
                }
                TypeDefinition::Scalar | TypeDefinition::Enum(_) => {}
            }
        }
        errors
    }
}

fn insert_type(
    types: &mut IndexMap<String, NamedType>,
    definition: parsed_schema::TypeDefinition<'_, ParsedTextType>,
) -> Result<(), Error> {
    let named = NamedType::try_from(definition)?;
    let position = match named.origin {
        Origin::Declared(position) => position,
        Origin::BuiltIn => Pos::default(),
    };
    match types.get_mut(&named.name) {
        // Redeclaring a built-in scalar takes over its declaration
        Some(existing)
            if !existing.is_declared() && matches!(named.definition, TypeDefinition::Scalar) =>
        {
            existing.origin = named.origin;
            existing.documentation = named.documentation;
            Ok(())
        }
        Some(_) => Err(Error::DuplicateType {
            name: named.name,
            position,
        }),
        None => {
            types.insert(named.name.clone(), named);
            Ok(())
        }
    }
}

fn apply_extension(
    types: &mut IndexMap<String, NamedType>,
    extension: parsed_schema::TypeExtension<'_, ParsedTextType>,
) -> Result<(), Error> {
    let (name, position) = match &extension {
        parsed_schema::TypeExtension::Scalar(ext) => (ext.name.clone(), ext.position),
        parsed_schema::TypeExtension::Object(ext) => (ext.name.clone(), ext.position),
        parsed_schema::TypeExtension::Interface(ext) => (ext.name.clone(), ext.position),
        parsed_schema::TypeExtension::Union(ext) => (ext.name.clone(), ext.position),
        parsed_schema::TypeExtension::Enum(ext) => (ext.name.clone(), ext.position),
        parsed_schema::TypeExtension::InputObject(ext) => (ext.name.clone(), ext.position),
    };
    let possible_type_names = types.keys().cloned().collect();
    let existing = match types.get_mut(&name).filter(|named| named.is_declared()) {
        Some(existing) => existing,
        None => {
            return Err(Error::ExtensionOfUnknownType {
                name,
                position,
                possible_type_names,
            })
        }
    };
    let kind = existing.kind();
    match (&mut existing.definition, extension) {
        (TypeDefinition::Scalar, parsed_schema::TypeExtension::Scalar(_)) => {}
        (TypeDefinition::Object(object), parsed_schema::TypeExtension::Object(ext)) => {
            extend_fields_lookup(&name, &mut object.fields, ext.fields)?;
            object.interfaces.extend(ext.implements_interfaces);
        }
        (TypeDefinition::Interface(interface), parsed_schema::TypeExtension::Interface(ext)) => {
            extend_fields_lookup(&name, &mut interface.fields, ext.fields)?;
        }
        (TypeDefinition::Union(union), parsed_schema::TypeExtension::Union(ext)) => {
            union.possible_types.extend(ext.types);
        }
        (TypeDefinition::Enum(enumeration), parsed_schema::TypeExtension::Enum(ext)) => {
            enumeration
                .values
                .extend(ext.values.into_iter().map(EnumValue::from));
        }
        (TypeDefinition::InputObject(input), parsed_schema::TypeExtension::InputObject(ext)) => {
            extend_fields_lookup(&name, &mut input.fields, ext.fields)?;
        }
        _ => {
            return Err(Error::MismatchedExtension {
                name,
                kind,
                position,
            })
        }
    }
    Ok(())
}
