//! Concurrent, deduplicating pool of named tokens.

use super::locks::StripedLocks;
use super::types::{NamedToken, TokenId};
use crate::config::PoolConfig;
use crate::error::{FunnelError, Result};
use dashmap::DashMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Builds a token from a freshly generated id and a trimmed name.
pub type TokenFactory<T> = Arc<dyn Fn(TokenId, &str) -> T + Send + Sync>;

/// Lookup key for a name: trimmed and lower-cased.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A thread-safe pool that keeps exactly one token per normalized name and
/// per id.
///
/// Two indexes (name and id) are kept consistent with each other: a token
/// is either in both or in neither, and no two tokens share a normalized
/// name or an id. Names are trimmed and compared case-insensitively; the
/// stored token keeps the casing it was first created or inserted with.
///
/// Reads go straight to the concurrent maps. Writes take striped locks
/// keyed by normalized name and by id (always name before id) and re-check
/// the maps under the lock.
///
/// # Examples
///
/// ```rust
/// use phrase_funnel::token::{NamedToken, Tag, TokenPool};
///
/// let pool = TokenPool::new(|id, name| Tag::new(id, name));
/// let first = pool.get_or_create_token("  Important  ")?;
/// let second = pool.get_or_create_token("important")?;
///
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(first.name(), "Important");
/// assert_eq!(pool.len(), 1);
/// # Ok::<(), phrase_funnel::FunnelError>(())
/// ```
pub struct TokenPool<T: NamedToken> {
    factory: TokenFactory<T>,
    by_name: DashMap<String, Arc<T>>,
    by_id: DashMap<TokenId, Arc<T>>,
    name_locks: StripedLocks,
    id_locks: StripedLocks,
}

impl<T: NamedToken> TokenPool<T> {
    /// Create an empty pool that builds new tokens with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(TokenId, &str) -> T + Send + Sync + 'static,
    {
        Self::with_config(factory, PoolConfig::default())
    }

    pub fn with_config<F>(factory: F, config: PoolConfig) -> Self
    where
        F: Fn(TokenId, &str) -> T + Send + Sync + 'static,
    {
        let stripes = config.effective_stripes();
        Self {
            factory: Arc::new(factory),
            by_name: DashMap::new(),
            by_id: DashMap::new(),
            name_locks: StripedLocks::new(stripes),
            id_locks: StripedLocks::new(stripes),
        }
    }

    /// Number of tokens in the pool.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Snapshot of every token in the pool.
    pub fn all_tokens(&self) -> Vec<Arc<T>> {
        self.by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Look up a token by id.
    ///
    /// # Errors
    /// `InvalidArgument` for the nil id.
    pub fn get_token(&self, id: TokenId) -> Result<Option<Arc<T>>> {
        if id.is_nil() {
            return Err(FunnelError::InvalidArgument(
                "Token id cannot be empty.".to_string(),
            ));
        }
        Ok(self.lookup_id(&id))
    }

    /// Look up a token by name (trimmed, case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<Arc<T>> {
        self.lookup_name(&name_key(name))
    }

    /// Return the canonical token for `name`, creating it if needed.
    ///
    /// Concurrent callers racing on the same normalized name all receive the
    /// same instance, and the factory runs at most once for it.
    ///
    /// # Errors
    /// `InvalidArgument` for a blank name.
    pub fn get_or_create_token(&self, name: &str) -> Result<Arc<T>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FunnelError::InvalidArgument(
                "Token name cannot be empty.".to_string(),
            ));
        }

        let key = name_key(name);
        if let Some(existing) = self.lookup_name(&key) {
            return Ok(existing);
        }

        let _name_guard = self.name_locks.lock(key.as_str());
        if let Some(existing) = self.lookup_name(&key) {
            return Ok(existing);
        }

        let token = Arc::new((self.factory)(Uuid::new_v4(), name));
        self.by_id.insert(token.id(), Arc::clone(&token));
        self.by_name.insert(key, Arc::clone(&token));
        debug!(id = %token.id(), name, "token created");
        Ok(token)
    }

    /// One token per distinct non-blank name, in first-seen order.
    ///
    /// Blank names are skipped and names differing only by surrounding
    /// whitespace or case are collapsed.
    pub fn get_or_create_tokens<I, S>(&self, names: I) -> Vec<Arc<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        names
            .into_iter()
            .filter(|name| seen.insert(name_key(name.as_ref())))
            .filter_map(|name| self.get_or_create_token(name.as_ref()).ok())
            .collect()
    }

    /// Insert an existing token.
    ///
    /// Inserting a token that is already present is a no-op.
    ///
    /// # Errors
    /// - `InvalidArgument` for a blank name or nil id.
    /// - `StateConflict` if the name is stored under another id, or the id
    ///   under another name. The pool is left unchanged.
    pub fn insert_token(&self, token: impl Into<Arc<T>>) -> Result<()> {
        let token = token.into();
        let key = Self::validate(&token)?;

        let _name_guard = self.name_locks.lock(key.as_str());
        let _id_guard = self.id_locks.lock(&token.id());

        if self.check_conflicts(&key, &token)? {
            return Ok(());
        }

        self.commit(key, token);
        Ok(())
    }

    /// Insert a batch of tokens, all or nothing.
    ///
    /// Every token is validated first. Then the locks for every involved
    /// name and id are taken (each stripe once, names before ids), the batch
    /// is checked against the pool and against itself, and only then is
    /// anything written.
    ///
    /// # Errors
    /// Same as [`TokenPool::insert_token`]; on error nothing is inserted.
    pub fn insert_tokens<I>(&self, tokens: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Arc<T>>,
    {
        self.insert_new_tokens(tokens).map(|_| ())
    }

    /// [`TokenPool::insert_tokens`], returning the tokens that were not in
    /// the pool before.
    pub(crate) fn insert_new_tokens<I>(&self, tokens: I) -> Result<Vec<Arc<T>>>
    where
        I: IntoIterator,
        I::Item: Into<Arc<T>>,
    {
        let prepared = tokens
            .into_iter()
            .map(|token| {
                let token = token.into();
                Self::validate(&token).map(|key| (key, token))
            })
            .collect::<Result<Vec<(String, Arc<T>)>>>()?;
        if prepared.is_empty() {
            return Ok(Vec::new());
        }

        let _name_guards = self.name_locks.lock_stripes(
            prepared
                .iter()
                .map(|(key, _)| self.name_locks.stripe_of(key.as_str())),
        );
        let _id_guards = self.id_locks.lock_stripes(
            prepared
                .iter()
                .map(|(_, token)| self.id_locks.stripe_of(&token.id())),
        );

        let mut batch_names: HashMap<&str, TokenId> = HashMap::new();
        let mut batch_ids: HashMap<TokenId, &str> = HashMap::new();
        let mut pending = Vec::new();

        for (key, token) in &prepared {
            match batch_names.get(key.as_str()) {
                Some(&id) if id != token.id() => {
                    return Err(Self::name_conflict(token.name()));
                }
                Some(_) => continue,
                None => {}
            }
            if let Some(&other) = batch_ids.get(&token.id()) {
                return Err(Self::id_conflict(token.id(), other));
            }
            batch_names.insert(key.as_str(), token.id());
            batch_ids.insert(token.id(), token.name().trim());

            if !self.check_conflicts(key, token)? {
                pending.push((key.clone(), Arc::clone(token)));
            }
        }

        let inserted = pending
            .into_iter()
            .map(|(key, token)| {
                self.commit(key, Arc::clone(&token));
                token
            })
            .collect::<Vec<_>>();
        debug!(
            requested = prepared.len(),
            inserted = inserted.len(),
            "token batch inserted"
        );
        Ok(inserted)
    }

    /// Remove `token` if, and only if, the pool holds exactly this id under
    /// exactly this name.
    ///
    /// A token that merely shares its name with a stored token of another
    /// id is never removed.
    pub fn remove_token(&self, token: &T) -> bool {
        let key = name_key(token.name());
        if key.is_empty() {
            return false;
        }

        let _name_guard = self.name_locks.lock(key.as_str());
        let _id_guard = self.id_locks.lock(&token.id());

        let id_matches = self
            .by_id
            .get(&token.id())
            .map_or(false, |stored| name_key(stored.name()) == key);
        let name_matches = self
            .by_name
            .get(&key)
            .map_or(false, |stored| stored.id() == token.id());
        if !(id_matches && name_matches) {
            return false;
        }

        self.by_name.remove(&key);
        self.by_id.remove(&token.id());
        debug!(id = %token.id(), name = token.name(), "token removed");
        true
    }

    fn validate(token: &T) -> Result<String> {
        if token.name().trim().is_empty() {
            return Err(FunnelError::InvalidArgument(
                "Token name cannot be empty.".to_string(),
            ));
        }
        if token.id().is_nil() {
            return Err(FunnelError::InvalidArgument(
                "Token id cannot be empty.".to_string(),
            ));
        }
        Ok(name_key(token.name()))
    }

    /// Check `token` against the pool. Returns true if it is already
    /// present. Callers hold the name and id locks.
    fn check_conflicts(&self, key: &str, token: &T) -> Result<bool> {
        if let Some(existing) = self.lookup_name(key) {
            if existing.id() != token.id() {
                return Err(Self::name_conflict(token.name()));
            }
            return Ok(true);
        }

        if let Some(existing) = self.lookup_id(&token.id()) {
            if name_key(existing.name()) != key {
                return Err(Self::id_conflict(token.id(), existing.name()));
            }
            return Ok(true);
        }

        Ok(false)
    }

    fn commit(&self, key: String, token: Arc<T>) {
        debug!(id = %token.id(), name = token.name(), "token inserted");
        self.by_id.insert(token.id(), Arc::clone(&token));
        self.by_name.insert(key, token);
    }

    fn name_conflict(name: &str) -> FunnelError {
        warn!(name, "token name already taken by another id");
        FunnelError::StateConflict(format!(
            "A token with name '{}' already exists with a different ID.",
            name.trim()
        ))
    }

    fn id_conflict(id: TokenId, existing_name: &str) -> FunnelError {
        warn!(%id, existing_name, "token id already taken by another name");
        FunnelError::StateConflict(format!(
            "A token with ID '{id}' already exists with a different name '{existing_name}'."
        ))
    }

    fn lookup_name(&self, key: &str) -> Option<Arc<T>> {
        self.by_name.get(key).map(|entry| Arc::clone(entry.value()))
    }

    fn lookup_id(&self, id: &TokenId) -> Option<Arc<T>> {
        self.by_id.get(id).map(|entry| Arc::clone(entry.value()))
    }
}

impl<T: NamedToken> fmt::Debug for TokenPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPool")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
