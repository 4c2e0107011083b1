use super::{
    reference, unique_alias_names, CompileContext, Declaration, LocalNames, ReferencedTypes,
    RequiredTypes, Typescript,
};
use crate::graphql::schema::{EnumType, FieldsLookup, NamedType, TypeDefinition, UnionType};

fn compile_scalar(context: &CompileContext<'_>, named: &NamedType) -> Typescript {
    format!(
        "{}export type {} = {};",
        context.documentation(named.documentation.as_deref(), 0),
        named.name,
        context.scalars.get(&named.name).unwrap_or("any"),
    )
}

fn compile_enum(context: &CompileContext<'_>, named: &NamedType, enum_type: &EnumType) -> Typescript {
    let values = enum_type
        .values
        .iter()
        .map(|value| {
            format!(
                "  {}{} = \"{}\",",
                context.documentation(value.documentation().as_deref(), 2),
                value.name,
                value.name,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}export enum {} {{\n{values}\n}}",
        context.documentation(named.documentation.as_deref(), 0),
        named.name,
    )
}

fn compile_union(
    context: &CompileContext<'_>,
    named: &NamedType,
    union_type: &UnionType,
) -> (Typescript, RequiredTypes) {
    let required_types: RequiredTypes = union_type.possible_types.iter().cloned().collect();
    let members = required_types
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ");
    let contents = format!(
        "{}export type {} = {members};",
        context.documentation(named.documentation.as_deref(), 0),
        named.name,
    );
    (contents, required_types)
}

fn compile_record(
    context: &CompileContext<'_>,
    named: &NamedType,
    fields: &FieldsLookup,
    is_input: bool,
) -> (Typescript, ReferencedTypes) {
    let name = &named.name;
    let aliases_in_order = unique_alias_names(fields.values().map(|field| field.name.as_str()));
    let alias_names: LocalNames = aliases_in_order.iter().cloned().collect();
    let mut argument_names = alias_names.clone();
    argument_names.insert("Arguments".to_string());

    let mut referenced = ReferencedTypes::default();
    let mut aliases = Vec::with_capacity(fields.len());
    let mut members = Vec::with_capacity(fields.len());
    for (field, alias) in fields.values().zip(&aliases_in_order) {
        let resolved = reference::resolve(context, &field.type_ref, &alias_names);
        referenced.extend(resolved.referenced);
        aliases.push(format!(
            "  {}export type {alias} = {};",
            context.documentation(field.documentation().as_deref(), 2),
            resolved.text,
        ));
        if !field.arguments.is_empty() {
            let arguments = field
                .arguments
                .iter()
                .map(|argument| {
                    context.compile_input_member(
                        &argument.name,
                        &argument.type_ref,
                        argument.documentation().as_deref(),
                        6,
                        &argument_names,
                        &mut referenced,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            aliases.push(format!(
                "  export namespace {alias} {{\n    export interface Arguments {{\n{arguments}\n    }}\n  }}"
            ));
        }
        let optional = if is_input && !field.type_ref.is_non_null() { "?" } else { "" };
        members.push(format!("  {}{optional}: {name}.{alias};", field.name));
    }

    let documentation = context.documentation(named.documentation.as_deref(), 0);
    let contents = if members.is_empty() {
        format!("{documentation}export interface {name} {{\n}}")
    } else {
        format!(
            "{documentation}export namespace {name} {{\n{}\n}}\nexport interface {name} {{\n{}\n}}",
            aliases.join("\n"),
            members.join("\n"),
        )
    };
    (contents, referenced)
}

pub fn compile_named_type(context: &CompileContext<'_>, named: &NamedType) -> Declaration {
    let (contents, referenced) = match &named.definition {
        TypeDefinition::Scalar => (compile_scalar(context, named), ReferencedTypes::default()),
        TypeDefinition::Enum(enum_type) => (
            compile_enum(context, named, enum_type),
            ReferencedTypes::default(),
        ),
        TypeDefinition::Union(union_type) => {
            let (contents, required) = compile_union(context, named, union_type);
            (
                contents,
                ReferencedTypes {
                    required,
                    shadowed: RequiredTypes::new(),
                },
            )
        }
        TypeDefinition::Object(object) => compile_record(context, named, &object.fields, false),
        TypeDefinition::Interface(interface) => {
            compile_record(context, named, &interface.fields, false)
        }
        TypeDefinition::InputObject(input) => compile_record(context, named, &input.fields, true),
    };
    Declaration {
        name: named.name.clone(),
        contents,
        required_types: referenced.required,
        shadowed_types: referenced.shadowed,
    }
}
