//! Name/value fields built from pooled tokens.
//!
//! Field names and field values are each deduplicated through their own
//! [`TokenPool`], and a [`StringFieldPool`] keeps one shared
//! [`StringField`] per (name, value) pair on top of them.

use crate::config::PoolConfig;
use crate::error::Result;
use crate::token::{named_token, NamedToken, TokenId, TokenPool};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

named_token!(
    /// The name half of a [`StringField`], e.g. `"author"`.
    FieldName
);

named_token!(
    /// The value half of a [`StringField`].
    FieldValue
);

/// A pooled `(name, value)` pair. Equal when both token ids are equal.
#[derive(Debug, Clone)]
pub struct StringField {
    name: Arc<FieldName>,
    value: Arc<FieldValue>,
}

impl StringField {
    pub fn new(name: impl Into<Arc<FieldName>>, value: impl Into<Arc<FieldValue>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &Arc<FieldName> {
        &self.name
    }

    pub fn value(&self) -> &Arc<FieldValue> {
        &self.value
    }

    /// The `(name id, value id)` pair identifying this field.
    pub fn key(&self) -> (TokenId, TokenId) {
        (self.name.id(), self.value.id())
    }
}

impl PartialEq for StringField {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for StringField {}

impl std::hash::Hash for StringField {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for StringField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name.name(), self.value.name())
    }
}

/// Deduplicating store of [`StringField`]s.
///
/// # Examples
///
/// ```rust
/// use phrase_funnel::metadata::StringFieldPool;
///
/// let pool = StringFieldPool::new();
/// let a = pool.get_string_field("Author", "Ada")?;
/// let b = pool.get_string_field("author ", "ADA")?;
///
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// assert_eq!(pool.len(), 1);
/// # Ok::<(), phrase_funnel::FunnelError>(())
/// ```
pub struct StringFieldPool {
    names: TokenPool<FieldName>,
    values: TokenPool<FieldValue>,
    fields: DashMap<(TokenId, TokenId), Arc<StringField>>,
}

impl StringFieldPool {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            names: TokenPool::with_config(|id, name| FieldName::new(id, name), config.clone()),
            values: TokenPool::with_config(|id, name| FieldValue::new(id, name), config),
            fields: DashMap::new(),
        }
    }

    pub fn names(&self) -> &TokenPool<FieldName> {
        &self.names
    }

    pub fn values(&self) -> &TokenPool<FieldValue> {
        &self.values
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The shared field for `name` and `value`, creating tokens and field
    /// as needed.
    ///
    /// # Errors
    /// `InvalidArgument` if either part is blank.
    pub fn get_string_field(&self, name: &str, value: &str) -> Result<Arc<StringField>> {
        let name = self.names.get_or_create_token(name)?;
        let value = self.values.get_or_create_token(value)?;
        let key = (name.id(), value.id());

        let field = self
            .fields
            .entry(key)
            .or_insert_with(|| Arc::new(StringField { name, value }));
        Ok(Arc::clone(field.value()))
    }

    /// Insert an existing field, registering its tokens.
    ///
    /// # Errors
    /// Any token pool error for the name or value; see
    /// [`TokenPool::insert_token`]. On error the pool is left unchanged.
    pub fn insert_string_field(&self, field: impl Into<Arc<StringField>>) -> Result<()> {
        let field: Arc<StringField> = field.into();
        self.insert_string_fields([field])
    }

    /// Insert many fields, all or nothing.
    ///
    /// Names are inserted as one batch, then values as one batch. If the
    /// values are rejected, names added by this call are removed again
    /// before the error is returned, and no field is stored.
    pub fn insert_string_fields<I>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Arc<StringField>>,
    {
        let fields: Vec<Arc<StringField>> = fields.into_iter().map(Into::into).collect();

        let new_names = self
            .names
            .insert_new_tokens(fields.iter().map(|f| Arc::clone(f.name())))?;
        if let Err(err) = self
            .values
            .insert_tokens(fields.iter().map(|f| Arc::clone(f.value())))
        {
            for name in &new_names {
                self.names.remove_token(name);
            }
            debug!(rolled_back = new_names.len(), "string field names rolled back");
            return Err(err);
        }

        let count = fields.len();
        for field in fields {
            self.fields.entry(field.key()).or_insert(field);
        }
        debug!(count, total = self.fields.len(), "string fields inserted");
        Ok(())
    }
}

impl Default for StringFieldPool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringFieldPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringFieldPool")
            .field("names", &self.names.len())
            .field("values", &self.values.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FunnelError;
    use uuid::Uuid;

    #[test]
    fn test_get_string_field_dedups() {
        let pool = StringFieldPool::new();
        let a = pool.get_string_field("Author", "Ada").unwrap();
        let b = pool.get_string_field(" AUTHOR", "ada").unwrap();
        let c = pool.get_string_field("Author", "Grace").unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(a.name(), c.name()));
        assert_ne!(a, c);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.names().len(), 1);
        assert_eq!(pool.values().len(), 2);
        assert_eq!(a.to_string(), "Author=Ada");
    }

    #[test]
    fn test_blank_parts_rejected() {
        let pool = StringFieldPool::new();
        assert!(matches!(
            pool.get_string_field("", "x"),
            Err(FunnelError::InvalidArgument(_))
        ));
        assert!(pool.get_string_field("name", "  ").is_err());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_insert_string_field() {
        let pool = StringFieldPool::new();
        let field = StringField::new(
            FieldName::new(Uuid::new_v4(), "Genre"),
            FieldValue::new(Uuid::new_v4(), "Jazz"),
        );
        pool.insert_string_field(field.clone()).unwrap();
        pool.insert_string_field(field.clone()).unwrap();

        let found = pool.get_string_field("genre", "jazz").unwrap();
        assert_eq!(*found, field);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_insert_string_fields_conflict_leaves_fields_untouched() {
        let pool = StringFieldPool::new();
        pool.get_string_field("Genre", "Jazz").unwrap();

        let clash = StringField::new(
            FieldName::new(Uuid::new_v4(), "genre"),
            FieldValue::new(Uuid::new_v4(), "Blues"),
        );
        let fresh = StringField::new(
            FieldName::new(Uuid::new_v4(), "Mood"),
            FieldValue::new(Uuid::new_v4(), "Calm"),
        );

        let err = pool.insert_string_fields(vec![fresh, clash]).unwrap_err();
        assert!(matches!(err, FunnelError::StateConflict(_)));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.names().len(), 1);
    }

    #[test]
    fn test_value_conflict_rolls_back_names() {
        let pool = StringFieldPool::new();
        pool.get_string_field("Genre", "Jazz").unwrap();

        let clash = StringField::new(
            FieldName::new(Uuid::new_v4(), "Mood"),
            FieldValue::new(Uuid::new_v4(), "jazz"),
        );
        let err = pool.insert_string_fields(vec![clash.clone()]).unwrap_err();
        assert!(matches!(err, FunnelError::StateConflict(_)));
        assert_eq!(pool.names().len(), 1);
        assert_eq!(pool.values().len(), 1);
        assert_eq!(pool.len(), 1);
        assert!(pool.names().find_by_name("mood").is_none());

        assert!(pool.insert_string_field(clash).is_err());
        assert_eq!(pool.names().len(), 1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_value_conflict_keeps_names_that_were_already_present() {
        let pool = StringFieldPool::new();
        let existing = pool.get_string_field("Genre", "Jazz").unwrap();

        let clash = StringField::new(
            Arc::clone(existing.name()),
            FieldValue::new(Uuid::new_v4(), "JAZZ"),
        );
        assert!(pool.insert_string_field(clash).is_err());

        let name = pool.names().find_by_name("genre").unwrap();
        assert!(Arc::ptr_eq(&name, existing.name()));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_insert_string_fields() {
        let pool = StringFieldPool::new();
        let name = Arc::new(FieldName::new(Uuid::new_v4(), "Tag"));
        let fields = ["red", "green", "blue"].map(|value| {
            StringField::new(Arc::clone(&name), FieldValue::new(Uuid::new_v4(), value))
        });

        pool.insert_string_fields(fields).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.names().len(), 1);
        assert!(Arc::ptr_eq(
            pool.get_string_field("tag", "GREEN").unwrap().name(),
            &name
        ));
    }
}
