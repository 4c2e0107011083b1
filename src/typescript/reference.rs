use super::{shadowed_type_name, CompileContext, LocalNames, RequiredTypes, Typescript};
use crate::graphql::schema::field::TypeReference;
use crate::graphql::schema::TypeDefinition;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReferencedTypes {
    pub required: RequiredTypes,
    pub shadowed: RequiredTypes,
}

impl ReferencedTypes {
    pub fn extend(&mut self, other: ReferencedTypes) {
        self.required.extend(other.required);
        self.shadowed.extend(other.shadowed);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Resolved {
    pub text: Typescript,
    pub referenced: ReferencedTypes,
}

pub fn resolve(
    context: &CompileContext<'_>,
    type_ref: &TypeReference,
    local_names: &LocalNames,
) -> Resolved {
    let type_name = type_ref.named_type();
    let mut referenced = ReferencedTypes::default();
    let bottom = match context
        .schema
        .get_type_for_name(type_name)
        .map(|named| &named.definition)
    {
        Some(TypeDefinition::Scalar) => context.scalars.resolve(type_name),
        _ => {
            referenced.required.insert(type_name.to_string());
            if local_names.contains(type_name) {
                referenced.shadowed.insert(type_name.to_string());
                shadowed_type_name(type_name)
            } else {
                type_name.to_string()
            }
        }
    };
    Resolved {
        text: wrap(type_ref, &bottom),
        referenced,
    }
}

pub fn wrap(type_ref: &TypeReference, bottom: &str) -> Typescript {
    wrap_level(type_ref, bottom, true)
}

fn wrap_level(type_ref: &TypeReference, bottom: &str, nullable: bool) -> Typescript {
    let output = match type_ref {
        TypeReference::NonNull(inner) => return wrap_level(inner, bottom, false),
        TypeReference::List(inner) => {
            let item = wrap_level(inner, bottom, true);
            if has_top_level_union(&item) {
                format!("({item})[]")
            } else {
                format!("{item}[]")
            }
        }
        TypeReference::Named(_) => bottom.to_string(),
    };
    if nullable {
        format!("{output} | null")
    } else {
        output
    }
}

fn has_top_level_union(text: &str) -> bool {
    let mut depth = 0usize;
    for character in text.chars() {
        match character {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::schema::Schema;
    use crate::typescript::{LocalNames, ScalarOverrides};

    fn named(name: &str) -> TypeReference {
        TypeReference::Named(name.to_string())
    }

    fn non_null(inner: TypeReference) -> TypeReference {
        TypeReference::NonNull(Box::new(inner))
    }

    fn list(inner: TypeReference) -> TypeReference {
        TypeReference::List(Box::new(inner))
    }

    /// Reads wrapped output back into a reference, so wrapping can be checked for loss.
    fn unwrap_text(text: &str) -> TypeReference {
        let (text, nullable) = match text.strip_suffix(" | null") {
            Some(inner) => (inner, true),
            None => (text, false),
        };
        let parsed = match text.strip_suffix("[]") {
            Some(item) => {
                let item = item
                    .strip_prefix('(')
                    .and_then(|item| item.strip_suffix(')'))
                    .unwrap_or(item);
                list(unwrap_text(item))
            }
            None => named(text),
        };
        if nullable {
            parsed
        } else {
            non_null(parsed)
        }
    }

    fn with_context<T>(sdl: &str, callback: impl FnOnce(&CompileContext<'_>) -> T) -> T {
        let schema = Schema::from_sdl(sdl).unwrap();
        let scalars = ScalarOverrides::default();
        let context = CompileContext {
            schema: &schema,
            scalars: &scalars,
            include_descriptions: true,
            operations_wrap: false,
        };
        callback(&context)
    }

    #[test]
    fn list_and_item_nullability_render_distinctly() {
        let cases = [
            (non_null(list(non_null(named("Post")))), "Post[]"),
            (non_null(list(named("Post"))), "(Post | null)[]"),
            (list(non_null(named("Post"))), "Post[] | null"),
            (list(named("Post")), "(Post | null)[] | null"),
        ];
        for (type_ref, expected) in cases {
            let text = wrap(&type_ref, "Post");
            assert_eq!(text, expected);
            assert_eq!(unwrap_text(&text), type_ref);
        }
    }

    #[test]
    fn nested_lists_round_trip() {
        let type_ref = list(non_null(list(named("Post"))));
        let text = wrap(&type_ref, "Post");
        assert_eq!(text, "(Post | null)[][] | null");
        assert_eq!(unwrap_text(&text), type_ref);
    }

    #[test]
    fn scalars_are_never_required() {
        with_context("scalar DateTime\ntype Query { a: Int }", |context| {
            let resolved = resolve(context, &non_null(named("DateTime")), &LocalNames::new());
            assert_eq!(resolved.text, "any");
            assert!(resolved.referenced.required.is_empty());
            let resolved = resolve(context, &list(named("Int")), &LocalNames::new());
            assert_eq!(resolved.text, "(number | null)[] | null");
            assert!(resolved.referenced.required.is_empty());
        });
    }

    #[test]
    fn other_types_are_required_by_name() {
        with_context(
            "enum Category { NEWS }\ntype Post { id: ID }\ntype Query { post: Post }",
            |context| {
                let resolved = resolve(context, &non_null(named("Category")), &LocalNames::new());
                assert_eq!(resolved.text, "Category");
                assert_eq!(
                    resolved.referenced.required.into_iter().collect::<Vec<_>>(),
                    vec!["Category"]
                );
                let resolved = resolve(context, &list(non_null(named("Post"))), &LocalNames::new());
                assert_eq!(resolved.text, "Post[] | null");
                assert!(resolved.referenced.required.contains("Post"));
                assert!(resolved.referenced.shadowed.is_empty());
            },
        );
    }

    #[test]
    fn locally_hidden_types_use_their_alias() {
        with_context("type Post { id: ID }\ntype Query { post: Post }", |context| {
            let local_names: LocalNames = ["Post".to_string()].into_iter().collect();
            let resolved = resolve(context, &named("Post"), &local_names);
            assert_eq!(resolved.text, "__Post | null");
            assert!(resolved.referenced.required.contains("Post"));
            assert!(resolved.referenced.shadowed.contains("Post"));
        });
    }
}
