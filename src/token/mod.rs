//! Deduplicated named tokens.
//!
//! A [`TokenPool`] hands out one shared instance per normalized name, so
//! labels such as tags or field names can be compared by pointer or id
//! instead of by string. Lookups are lock-free reads on concurrent maps;
//! writes serialize per name and per id through striped locks.

mod locks;
pub mod pool;
pub mod types;

pub use pool::{TokenFactory, TokenPool};
pub use types::{compare_names, NamedToken, Tag, TokenId};

pub(crate) use types::named_token;
