//! Named token trait and the ready-made [`Tag`] token.

use std::cmp::Ordering;
use uuid::Uuid;

/// Identifier of a named token. The nil UUID counts as "empty".
pub type TokenId = Uuid;

/// An immutable `(id, name)` pair that a [`TokenPool`](super::TokenPool)
/// deduplicates.
///
/// Implementations must keep `id` and `name` fixed for the lifetime of the
/// value. The name keeps the casing it was created with; the pool compares
/// names trimmed and case-insensitively.
pub trait NamedToken: Send + Sync + 'static {
    fn id(&self) -> TokenId;

    fn name(&self) -> &str;

    /// Order by name, ignoring case.
    fn cmp_by_name(&self, other: &dyn NamedToken) -> Ordering {
        compare_names(self.name(), other.name())
    }
}

/// Case-insensitive name ordering.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Defines a token struct with id-based equality and hashing.
macro_rules! named_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            id: $crate::token::TokenId,
            name: String,
        }

        impl $name {
            pub fn new(id: $crate::token::TokenId, name: impl Into<String>) -> Self {
                Self {
                    id,
                    name: name.into(),
                }
            }
        }

        impl $crate::token::NamedToken for $name {
            fn id(&self) -> $crate::token::TokenId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name {}

        impl std::hash::Hash for $name {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.name)
            }
        }
    };
}

pub(crate) use named_token;

named_token!(
    /// A general-purpose named token, e.g. a user-assigned label.
    ///
    /// Two tags are equal when their ids are equal.
    Tag
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tag_equality_by_id() {
        let id = Uuid::new_v4();
        let a = Tag::new(id, "Alpha");
        let b = Tag::new(id, "Renamed");
        let c = Tag::new(Uuid::new_v4(), "Alpha");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Tag> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_cmp_by_name_ignores_case() {
        let a = Tag::new(Uuid::new_v4(), "apple");
        let b = Tag::new(Uuid::new_v4(), "Banana");
        let c = Tag::new(Uuid::new_v4(), "APPLE");

        assert_eq!(a.cmp_by_name(&b), Ordering::Less);
        assert_eq!(b.cmp_by_name(&a), Ordering::Greater);
        assert_eq!(a.cmp_by_name(&c), Ordering::Equal);
    }

    #[test]
    fn test_tag_accessors_and_display() {
        let id = Uuid::new_v4();
        let tag = Tag::new(id, "Important");
        assert_eq!(tag.id(), id);
        assert_eq!(tag.name(), "Important");
        assert_eq!(tag.to_string(), "Important");
    }

    #[test]
    fn test_tag_serde() {
        let tag = Tag::new(Uuid::new_v4(), "Important");
        let json = serde_json::to_string(&tag).unwrap();
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag);
        assert_eq!(back.name(), "Important");
    }
}
