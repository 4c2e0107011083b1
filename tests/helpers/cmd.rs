use assert_cmd::assert::Assert;
use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::str as p_str;
use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

const DEFAULT_CONFIG_FILE_NAME: &str = ".gqltypesrc.json";
const DEFAULT_SCHEMA_FILE_NAME: &str = "schema.graphql";
const OPERATIONS_DIRECTORY: &str = "operations";
const GENERATED_DIRECTORY: &str = "__generated__";
const TS_FILE_HEADER: &str = "/* eslint-disable */
// This file was automatically generated and should not be edited.

";

pub const DEFAULT_SCHEMA: &str = r#""An instant in time"
scalar DateTime

enum CATEGORY {
  NEWS
  SPORT
}

interface Node {
  id: ID!
}

"A single post"
type Post implements Node {
  id: ID!
  text: String
  category: CATEGORY!
  "Who wrote it"
  author: Author
  tags: [String!]
  postedAt: DateTime
  legacyId: Int @deprecated(reason: "Use id")
}

type Author implements Node {
  id: ID!
  name: String!
}

input PostInput {
  text: String!
  category: CATEGORY
}

union SearchResult = Post | Author

type Query {
  post(id: ID!): Post
  posts(category: CATEGORY): [Post]!
  search(text: String!): [SearchResult!]!
  node(id: ID!): Node
}

type Mutation {
  createPost(input: PostInput!): Post!
}
"#;

/// Represents an instance of the gql-types-generator command
#[derive(Debug)]
pub struct TestCommandHarness {
    proc_cmd: Command,
    temp_dir: assert_fs::TempDir,
    has_operations_arg: bool,
}

impl Default for TestCommandHarness {
    fn default() -> Self {
        Self::new_with_default_schema()
    }
}

impl TestCommandHarness {
    pub fn new() -> Self {
        // If user adds `KEEP_TEST_TEMPDIRS` arg to `cargo test`, we can keep temp_dir
        let temp_dir = assert_fs::TempDir::new()
            .expect("temp directory creation failure")
            .into_persistent_if(env::var_os("KEEP_TEST_TEMPDIRS").is_some());

        let mut proc_cmd =
            Command::cargo_bin("gql-types-generator").expect("gql-types-generator bin failure");
        proc_cmd
            .env("NO_COLOR", "1")
            .arg("--num-threads=2")
            .arg(temp_dir.path());

        // If user adds `--nocapture` arg to `cargo test`, we can show output
        if env::args().any(|arg| arg == "--nocapture") {
            proc_cmd.stdin(Stdio::inherit());
            proc_cmd.stderr(Stdio::inherit());
        }

        Self {
            proc_cmd,
            temp_dir,
            has_operations_arg: false,
        }
    }

    pub fn new_with_default_schema() -> Self {
        let mut harness = Self::new();
        harness.with_schema_contents(DEFAULT_SCHEMA);
        harness
    }

    pub fn directory_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn operations_path(&self, file_name: &str) -> std::path::PathBuf {
        self.directory_path().join(OPERATIONS_DIRECTORY).join(file_name)
    }

    pub fn with_file(&mut self, child_path: impl AsRef<Path>, contents: &str) -> &mut Self {
        self.temp_dir
            .child(child_path)
            .write_str(contents)
            .expect("write file failure");
        self
    }

    pub fn with_schema_contents(&mut self, contents: &str) -> &mut Self {
        self.with_file(DEFAULT_SCHEMA_FILE_NAME, contents)
    }

    /// Writes an operations file and points the command at the operations directory.
    pub fn with_operations_file(&mut self, file_name: &str, contents: &str) -> &mut Self {
        self.with_file(Path::new(OPERATIONS_DIRECTORY).join(file_name), contents);
        if !self.has_operations_arg {
            self.has_operations_arg = true;
            self.proc_cmd
                .arg("-o")
                .arg(format!("{OPERATIONS_DIRECTORY}/*.graphql"));
        }
        self
    }

    pub fn with_default_rc_file_contents(&mut self, contents: &str) -> &mut Self {
        self.with_file(DEFAULT_CONFIG_FILE_NAME, contents)
    }

    pub fn with_arg(&mut self, arg: impl AsRef<std::ffi::OsStr>) -> &mut Self {
        self.proc_cmd.arg(arg);
        self
    }

    pub fn run_for_failure(&mut self) -> Assert {
        self.proc_cmd.assert().failure().stderr(p_str::is_empty())
    }

    pub fn run_for_success(&mut self) -> Assert {
        self.proc_cmd.assert().success().stderr(p_str::is_empty())
    }

    /// Compares a generated file against `expected_content`, header excluded.
    pub fn assert_generated(&self, file_name: &str, expected_content: &str) {
        self.assert_generated_in(GENERATED_DIRECTORY, file_name, expected_content);
    }

    pub fn assert_generated_in(
        &self,
        directory: impl AsRef<Path>,
        file_name: &str,
        expected_content: &str,
    ) {
        let expected = format!("{TS_FILE_HEADER}{}\n", expected_content.trim());
        self.temp_dir
            .child(directory)
            .child(file_name)
            .assert(p_str::diff(expected));
    }

    pub fn assert_generated_contains(&self, file_name: &str, expected_fragment: &str) {
        self.temp_dir
            .child(GENERATED_DIRECTORY)
            .child(file_name)
            .assert(p_str::contains(expected_fragment));
    }

    pub fn assert_nothing_generated(&self) {
        self.temp_dir
            .child(GENERATED_DIRECTORY)
            .assert(predicates::path::missing());
    }
}
