use crate::helpers::cmd::TestCommandHarness;
use std::fs;

const SMALL_SCHEMA: &str = r#"type Query {
  "Find one post"
  post(id: ID!): Post
}

"A single post"
type Post {
  id: ID!
  category: CATEGORY!
  postedAt: DateTime
}

enum CATEGORY {
  NEWS
  SPORT
}

scalar DateTime"#;

fn generated_schema(harness: &TestCommandHarness) -> String {
    fs::read_to_string(harness.directory_path().join("__generated__/schema.ts"))
        .expect("read schema.ts failure")
}

fn offset_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` missing from:\n{haystack}"))
}

#[test]
fn compile_small_schema() {
    let mut harness = TestCommandHarness::new();
    harness.with_schema_contents(SMALL_SCHEMA).run_for_success();
    harness.assert_generated(
        "schema.ts",
        &format!(
            r#"
type __Post = Post;

export type DateTime = any;

export enum CATEGORY {{
  NEWS = "NEWS",
  SPORT = "SPORT",
}}

export namespace Query {{
  /**
   * Find one post
   */
  export type Post = __Post | null;
  export namespace Post {{
    export interface Arguments {{
      id: any;
    }}
  }}
}}
export interface Query {{
  post: Query.Post;
}}

/**
 * A single post
 */
export namespace Post {{
  export type Id = any;
  export type Category = CATEGORY;
  export type PostedAt = any | null;
}}
export interface Post {{
  id: Post.Id;
  category: Post.Category;
  postedAt: Post.PostedAt;
}}

const schema: string = `{SMALL_SCHEMA}`;
export default schema;
"#
        ),
    );
}

#[test]
fn compile_with_as_is_display() {
    let mut harness = TestCommandHarness::new();
    harness
        .with_schema_contents(SMALL_SCHEMA)
        .with_arg("--display=as-is")
        .run_for_success();
    let schema = generated_schema(&harness);
    let query = offset_of(&schema, "export namespace Query {");
    let post = offset_of(&schema, "export namespace Post {");
    let category = offset_of(&schema, "export enum CATEGORY {");
    let date_time = offset_of(&schema, "export type DateTime = any;");
    assert!(query < post && post < category && category < date_time);
}

#[test]
fn compile_with_default_display_groups_by_kind() {
    let mut harness = TestCommandHarness::default();
    harness.run_for_success();
    let schema = generated_schema(&harness);
    let scalar = offset_of(&schema, "export type DateTime = any;");
    let enumeration = offset_of(&schema, "export enum CATEGORY {");
    let interface = offset_of(&schema, "export namespace Node {");
    let input = offset_of(&schema, "export namespace PostInput {");
    let union = offset_of(&schema, "export type SearchResult = Post | Author;");
    let object = offset_of(&schema, "export namespace Post {");
    assert!(scalar < enumeration);
    assert!(enumeration < interface);
    assert!(interface < input);
    assert!(input < union);
    assert!(union < object);
}

#[test]
fn compile_with_remove_description() {
    let mut harness = TestCommandHarness::new();
    harness
        .with_schema_contents(SMALL_SCHEMA)
        .with_arg("--remove-description")
        .run_for_success();
    let schema = generated_schema(&harness);
    assert!(!schema.contains("/**"));
    // The embedded SDL keeps its descriptions
    assert!(schema.contains("\"A single post\""));
}

#[test]
fn compile_with_scalar_override() {
    let mut harness = TestCommandHarness::new();
    harness
        .with_schema_contents(SMALL_SCHEMA)
        .with_arg("--scalar")
        .with_arg("DateTime=string")
        .with_arg("--scalar")
        .with_arg("ID=number")
        .run_for_success();
    let schema = generated_schema(&harness);
    assert!(schema.contains("export type DateTime = string;"));
    assert!(schema.contains("export type PostedAt = string | null;"));
    assert!(schema.contains("export type Id = number;"));
    assert!(schema.contains("      id: number;"));
}

#[test]
fn compile_input_objects_and_unions() {
    let mut harness = TestCommandHarness::default();
    harness.run_for_success();
    harness.assert_generated_contains(
        "schema.ts",
        "export namespace PostInput {\n  export type Text = string;\n  export type Category = CATEGORY | null;\n}\nexport interface PostInput {\n  text: PostInput.Text;\n  category?: PostInput.Category;\n}",
    );
    harness.assert_generated_contains(
        "schema.ts",
        "  /**\n   * @deprecated Use id\n   */\n  export type LegacyId = number | null;",
    );
}

#[test]
fn compile_schema_with_template_literal_characters() {
    let mut harness = TestCommandHarness::new();
    harness
        .with_schema_contents("\"Costs `$` ${amount}\"\ntype Query {\n  price: Float\n}\n")
        .run_for_success();
    harness.assert_generated_contains(
        "schema.ts",
        "const schema: string = `\"Costs \\`$\\` \\${amount}\"\ntype Query {\n  price: Float\n}`;",
    );
}

#[test]
fn compile_fields_with_the_same_alias() {
    let mut harness = TestCommandHarness::new();
    harness
        .with_schema_contents("type User {\n  userId: ID\n  user_id: ID!\n}\n\ntype Query {\n  user: User\n}\n")
        .with_operations_file("getUser.graphql", "query getUser {\n  user {\n    userId\n    user_id\n  }\n}\n")
        .run_for_success();
    harness.assert_generated_contains(
        "schema.ts",
        "export namespace User {\n  export type UserId = any | null;\n  export type UserId2 = any;\n}\nexport interface User {\n  userId: User.UserId;\n  user_id: User.UserId2;\n}",
    );
    harness.assert_generated_contains(
        "getUserQuery.ts",
        "  export interface User {\n    userId: User.UserId;\n    user_id: User.UserId2;\n  }\n  export namespace User {\n    export type UserId = any | null;\n    export type UserId2 = any;\n  }",
    );
}
