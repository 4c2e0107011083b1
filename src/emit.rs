//! Lays compiled blocks out into files and writes them.
use crate::cli::PrintableMessage;
use crate::typescript::operation::CompiledOperation;
use crate::typescript::{
    compile_shadowed_type_aliases, escape_template_literal, RequiredTypes, Typescript, HEADER,
};
use crate::Compilation;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const SCHEMA_FILE_STEM: &str = "schema";
const INDEX_FILE_STEM: &str = "index";
const GRAPHQL_TAG_IMPORTS: &str = "import gql from 'graphql-tag';\nimport { DocumentNode } from 'graphql';";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub contents: String,
}

fn file_contents(blocks: Vec<Typescript>) -> String {
    format!("{HEADER}{}\n", blocks.join("\n\n"))
}

fn typescript_file(stem: &str, blocks: Vec<Typescript>) -> OutputFile {
    OutputFile {
        file_name: format!("{stem}.ts"),
        contents: file_contents(blocks),
    }
}

fn schema_file(compilation: &Compilation) -> OutputFile {
    let mut shadowed_types = RequiredTypes::new();
    for declaration in &compilation.declarations {
        shadowed_types.extend(declaration.shadowed_types.iter().cloned());
    }
    let mut blocks = Vec::with_capacity(compilation.declarations.len() + 2);
    if !shadowed_types.is_empty() {
        blocks.push(compile_shadowed_type_aliases(&shadowed_types).join("\n"));
    }
    blocks.extend(
        compilation
            .declarations
            .iter()
            .map(|declaration| declaration.contents.clone()),
    );
    blocks.push(format!(
        "const schema: string = `{}`;\nexport default schema;",
        escape_template_literal(compilation.schema_sdl.trim()),
    ));
    typescript_file(SCHEMA_FILE_STEM, blocks)
}

fn operation_file(operation: &CompiledOperation, operations_wrap: bool) -> OutputFile {
    let mut blocks = Vec::new();
    if operations_wrap {
        blocks.push(GRAPHQL_TAG_IMPORTS.to_string());
    }
    if !operation.required_types.is_empty() {
        let names = operation
            .required_types
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        blocks.push(format!("import {{ {names} }} from './{SCHEMA_FILE_STEM}';"));
    }
    if !operation.shadowed_types.is_empty() {
        blocks.push(compile_shadowed_type_aliases(&operation.shadowed_types).join("\n"));
    }
    blocks.push(operation.namespace.clone());
    blocks.push(operation.result_interface.clone());
    if let Some(variables_interface) = &operation.variables_interface {
        blocks.push(variables_interface.clone());
    }
    blocks.push(operation.source.clone());
    typescript_file(&operation.constant_name, blocks)
}

fn index_file(compilation: &Compilation) -> OutputFile {
    let exports = std::iter::once(SCHEMA_FILE_STEM)
        .chain(
            compilation
                .operations
                .iter()
                .map(|operation| operation.constant_name.as_str()),
        )
        .map(|stem| {
            format!("export * from './{stem}';\nexport {{ default as {stem} }} from './{stem}';")
        })
        .collect::<Vec<_>>();
    typescript_file(INDEX_FILE_STEM, vec![exports.join("\n")])
}

/// `schema.ts`, one file per operation, then `index.ts`
pub fn assemble(compilation: &Compilation) -> Vec<OutputFile> {
    let mut files = Vec::with_capacity(compilation.operations.len() + 2);
    files.push(schema_file(compilation));
    files.extend(
        compilation
            .operations
            .iter()
            .map(|operation| operation_file(operation, compilation.operations_wrap)),
    );
    files.push(index_file(compilation));
    files
}

/// Creates `output_directory` if needed and writes every file into it.
pub fn write_files(output_directory: &Path, files: &[OutputFile]) -> Result<Vec<PathBuf>, PrintableMessage> {
    fs::create_dir_all(output_directory).map_err(|io_error| {
        PrintableMessage::new_compile_error_from_write_io_error(&io_error, output_directory)
    })?;
    files
        .iter()
        .map(|file| {
            let path = output_directory.join(&file.file_name);
            debug!("writing `{}`", path.display());
            fs::write(&path, &file.contents)
                .map(|_| path.clone())
                .map_err(|io_error| {
                    PrintableMessage::new_compile_error_from_write_io_error(&io_error, &path)
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use crate::{compile, CompileOptions};

    const SCHEMA: &str = r#"
type Author { name: String! }
type Post { id: ID! author: Author }
enum Status { DRAFT }
type Query { post: Post status: Status }
"#;

    fn assemble_with(operations: &str, operations_wrap: bool) -> Vec<OutputFile> {
        let schema = Source::from_text("schema.graphql", SCHEMA);
        let operations = Source::from_text("operations.graphql", operations);
        let options = CompileOptions {
            operations_wrap,
            ..CompileOptions::default()
        };
        assemble(&compile(&schema, Some(&operations), &options).unwrap())
    }

    #[test]
    fn lays_out_schema_operations_and_index() {
        let files = assemble_with("query getStatus { status }", false);
        let names: Vec<&str> = files.iter().map(|file| file.file_name.as_str()).collect();
        assert_eq!(names, vec!["schema.ts", "getStatusQuery.ts", "index.ts"]);

        assert_eq!(
            files[1].contents,
            format!(
                "{HEADER}import {{ Status }} from './schema';\n\ntype __Status = Status;\n\nexport namespace GetStatusQuery {{\n  export type Status = __Status | null;\n}}\n\nexport interface GetStatusQuery {{\n  status: GetStatusQuery.Status;\n}}\n\nexport const getStatusQuery: string = `query getStatus {{ status }}`;\nexport default getStatusQuery;\n"
            )
        );
        assert_eq!(
            files[2].contents,
            format!(
                "{HEADER}export * from './schema';\nexport {{ default as schema }} from './schema';\nexport * from './getStatusQuery';\nexport {{ default as getStatusQuery }} from './getStatusQuery';\n"
            )
        );
    }

    #[test]
    fn schema_file_aliases_shadowed_types_and_embeds_sdl() {
        let files = assemble_with("query getStatus { status }", false);
        let schema = &files[0].contents;
        assert!(schema.starts_with(&format!(
            "{HEADER}type __Author = Author;\ntype __Post = Post;\ntype __Status = Status;\n\nexport enum Status {{"
        )));
        assert!(schema.contains("export type Author = __Author | null;"));
        assert!(schema.ends_with(&format!(
            "const schema: string = `{}`;\nexport default schema;\n",
            SCHEMA.trim()
        )));
    }

    #[test]
    fn wrapped_operations_import_graphql_tag() {
        let files = assemble_with("query getPost { post { id } }", true);
        assert!(files[1].contents.starts_with(&format!("{HEADER}{GRAPHQL_TAG_IMPORTS}\n\nexport namespace")));
    }

    #[test]
    fn writes_into_a_new_directory() {
        let directory = assert_fs::TempDir::new().unwrap();
        let output = directory.path().join("nested");
        let files = vec![OutputFile {
            file_name: "index.ts".to_string(),
            contents: "export {};\n".to_string(),
        }];
        let written = write_files(&output, &files).unwrap();
        assert_eq!(written, vec![output.join("index.ts")]);
        assert_eq!(fs::read_to_string(&written[0]).unwrap(), "export {};\n");
    }
}
