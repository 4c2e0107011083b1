use super::{
    escape_template_literal, reference, unique_alias_names, CompileContext, LocalNames,
    ReferencedTypes, RequiredTypes, Typescript,
};
use crate::graphql::ir::{Operation, SelectionField, SelectionKind};

#[derive(Debug)]
pub struct CompiledOperation {
    pub compiled_name: String,
    pub constant_name: String,
    pub namespace: Typescript,
    pub result_interface: Typescript,
    pub variables_interface: Option<Typescript>,
    pub source: Typescript,
    pub required_types: RequiredTypes,
    pub shadowed_types: RequiredTypes,
}

struct Level {
    members: Vec<Typescript>,
    declarations: Vec<Typescript>,
}

fn alias_names(fields: &[SelectionField]) -> Vec<String> {
    unique_alias_names(fields.iter().map(|field| field.prop_name.as_str()))
}

fn compile_level(
    context: &CompileContext<'_>,
    fields: &[SelectionField],
    owner: &str,
    tab_width: usize,
    local_names: &LocalNames,
    referenced: &mut ReferencedTypes,
) -> Level {
    let tab = " ".repeat(tab_width);
    let mut level = Level {
        members: Vec::with_capacity(fields.len()),
        declarations: Vec::with_capacity(fields.len()),
    };
    for (field, alias) in fields.iter().zip(alias_names(fields)) {
        let documentation = context.documentation(field.documentation.as_deref(), tab_width);
        let member_type = match &field.kind {
            SelectionKind::Typename(object_name) => {
                let literal = match object_name {
                    Some(object_name) => format!("\"{object_name}\""),
                    None => String::from("string"),
                };
                level
                    .declarations
                    .push(format!("{tab}export type {alias} = {literal};"));
                format!("{owner}.{alias}")
            }
            SelectionKind::Leaf(type_ref) => {
                let resolved = reference::resolve(context, type_ref, local_names);
                referenced.extend(resolved.referenced);
                level.declarations.push(format!(
                    "{tab}{documentation}export type {alias} = {};",
                    resolved.text
                ));
                format!("{owner}.{alias}")
            }
            SelectionKind::Composite { type_ref, fields } => {
                let mut nested_names = local_names.clone();
                nested_names.extend(alias_names(fields));
                let nested = compile_level(
                    context,
                    fields,
                    &alias,
                    tab_width + 2,
                    &nested_names,
                    referenced,
                );
                level.declarations.push(format!(
                    "{tab}{documentation}export interface {alias} {{\n{}\n{tab}}}\n{tab}export namespace {alias} {{\n{}\n{tab}}}",
                    nested.members.join("\n"),
                    nested.declarations.join("\n"),
                ));
                reference::wrap(type_ref, &format!("{owner}.{alias}"))
            }
        };
        level
            .members
            .push(format!("{tab}{}: {member_type};", field.prop_name));
    }
    level
}

fn compile_source(context: &CompileContext<'_>, constant_name: &str, source_text: &str) -> Typescript {
    let escaped = escape_template_literal(source_text);
    let constant = if context.operations_wrap {
        format!("export const {constant_name}: DocumentNode = gql(`{escaped}`);")
    } else {
        format!("export const {constant_name}: string = `{escaped}`;")
    };
    format!("{constant}\nexport default {constant_name};")
}

pub fn compile_operation(context: &CompileContext<'_>, operation: &Operation) -> CompiledOperation {
    let compiled_name = operation.compiled_name();
    let constant_name = operation.constant_name();
    let mut referenced = ReferencedTypes::default();

    let local_names: LocalNames = alias_names(&operation.fields).into_iter().collect();
    let level = compile_level(
        context,
        &operation.fields,
        &compiled_name,
        2,
        &local_names,
        &mut referenced,
    );
    let namespace = format!(
        "export namespace {compiled_name} {{\n{}\n}}",
        level.declarations.join("\n")
    );
    let result_interface = format!(
        "export interface {compiled_name} {{\n{}\n}}",
        level.members.join("\n")
    );

    let variables_interface = if operation.variables.is_empty() {
        None
    } else {
        let module_names = LocalNames::new();
        let members = operation
            .variables
            .iter()
            .map(|variable| {
                context.compile_input_member(
                    &variable.prop_name,
                    &variable.type_ref,
                    None,
                    2,
                    &module_names,
                    &mut referenced,
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!("export interface {compiled_name}Variables {{\n{members}\n}}"))
    };

    CompiledOperation {
        source: compile_source(context, &constant_name, &operation.source_text),
        compiled_name,
        constant_name,
        namespace,
        result_interface,
        variables_interface,
        required_types: referenced.required,
        shadowed_types: referenced.shadowed,
    }
}
