use super::{NamedType, Origin};
use graphql_parser::Pos;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Group by kind: scalars, enums, interfaces, inputs, unions, then objects
    #[default]
    Default,
    /// Keep the order types were declared in
    AsIs,
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "default" => Ok(DisplayMode::Default),
            "as-is" => Ok(DisplayMode::AsIs),
            other => Err(format!(
                "unknown display mode `{other}`, expected `default` or `as-is`"
            )),
        }
    }
}

fn position_key(position: &Pos) -> (usize, usize) {
    (position.line, position.column)
}

/// Total order over named types. Built-in types come first in either mode.
pub fn compare(a: &NamedType, b: &NamedType, mode: DisplayMode) -> Ordering {
    match (&a.origin, &b.origin) {
        (Origin::BuiltIn, Origin::BuiltIn) => Ordering::Equal,
        (Origin::BuiltIn, Origin::Declared(_)) => Ordering::Less,
        (Origin::Declared(_), Origin::BuiltIn) => Ordering::Greater,
        (Origin::Declared(a_position), Origin::Declared(b_position)) => {
            let by_position = position_key(a_position).cmp(&position_key(b_position));
            match mode {
                DisplayMode::AsIs => by_position,
                DisplayMode::Default => a.kind().cmp(&b.kind()).then(by_position),
            }
        }
    }
}

pub fn sort_named_types<'a>(
    types: impl IntoIterator<Item = &'a NamedType>,
    mode: DisplayMode,
) -> Vec<&'a NamedType> {
    let mut sorted: Vec<&NamedType> = types.into_iter().collect();
    sorted.sort_by(|a, b| compare(a, b, mode));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::schema::Schema;

    const MIXED_SCHEMA: &str = "
type Post { id: ID! category: Category }
union Anything = Post | Author
input PostFilter { text: String }
scalar DateTime
type Author { name: String }
interface Node { id: ID! }
enum Category { NEWS }
";

    fn names(types: &[&NamedType]) -> Vec<String> {
        types.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn default_mode_groups_by_kind_then_position() {
        let schema = Schema::from_sdl(MIXED_SCHEMA).unwrap();
        let sorted = sort_named_types(schema.declared_types(), DisplayMode::Default);
        assert_eq!(
            names(&sorted),
            vec!["DateTime", "Category", "Node", "PostFilter", "Anything", "Post", "Author"],
        );
    }

    #[test]
    fn as_is_mode_keeps_declaration_order() {
        let schema = Schema::from_sdl(MIXED_SCHEMA).unwrap();
        let sorted = sort_named_types(schema.declared_types(), DisplayMode::AsIs);
        assert_eq!(
            names(&sorted),
            vec!["Post", "Anything", "PostFilter", "DateTime", "Author", "Node", "Category"],
        );
    }

    #[test]
    fn built_in_types_sort_first_and_order_is_stable() {
        let schema = Schema::from_sdl(MIXED_SCHEMA).unwrap();
        for mode in [DisplayMode::Default, DisplayMode::AsIs] {
            let sorted = sort_named_types(schema.named_types(), mode);
            assert_eq!(
                names(&sorted[..5]),
                vec!["Boolean", "String", "Float", "Int", "ID"],
            );
            let resorted = sort_named_types(sorted.iter().rev().copied(), mode);
            assert_eq!(names(&resorted[5..]), names(&sorted[5..]));
        }
    }

    #[test]
    fn parses_display_modes() {
        assert_eq!("as-is".parse::<DisplayMode>(), Ok(DisplayMode::AsIs));
        assert_eq!("default".parse::<DisplayMode>(), Ok(DisplayMode::Default));
        assert!("alphabetical".parse::<DisplayMode>().is_err());
    }
}
