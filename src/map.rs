//! ChainedHashMap: the table engine.

use crate::chain::{Chains, Entries, Entry, Probe};
use crate::dump::BucketDump;
use crate::error::{BuildError, GrowError};
use crate::key_ops::{FnKeyOps, HashEq, KeyOps};
use crate::spread::{bucket_index, spread, MAX_BUCKETS, MIN_BUCKETS};
use core::fmt;
use core::hash::Hash;
use core::ops::ControlFlow;

/// Separate-chaining hash map whose hashing and equality come from a
/// `KeyOps` collaborator.
pub struct ChainedHashMap<K, V, O = HashEq> {
    ops: O,
    chains: Chains<K, V>,
}

/// Outcome of `put`.
///
/// `Inserted` and `Replaced` stay distinguishable even when `V` is itself
/// an `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutResult<V> {
    /// The key was absent; a new entry was linked in.
    Inserted,
    /// The key existed; its value was swapped and the old one handed back.
    Replaced { previous: V },
}

impl<V> PutResult<V> {
    /// Whether the key was already present.
    pub fn existed(&self) -> bool {
        matches!(self, PutResult::Replaced { .. })
    }

    pub fn previous(&self) -> Option<&V> {
        match self {
            PutResult::Inserted => None,
            PutResult::Replaced { previous } => Some(previous),
        }
    }

    pub fn into_previous(self) -> Option<V> {
        match self {
            PutResult::Inserted => None,
            PutResult::Replaced { previous } => Some(previous),
        }
    }
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::with_key_ops(HashEq::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H, E> ChainedHashMap<K, V, FnKeyOps<H, E>>
where
    H: Fn(&K) -> i32,
    E: Fn(&K, &K) -> bool,
{
    /// Build a map from a hash function and an equality predicate.
    pub fn from_fns(hash: H, equals: E) -> Self {
        Self::with_key_ops(FnKeyOps::new(hash, equals))
    }

    /// Like `from_fns`, for callers whose collaborators may be missing.
    pub fn try_from_fns(hash: Option<H>, equals: Option<E>) -> Result<Self, BuildError> {
        let hash = hash.ok_or(BuildError::MissingHash)?;
        let equals = equals.ok_or(BuildError::MissingEquals)?;
        Ok(Self::from_fns(hash, equals))
    }
}

impl<K, V, O> ChainedHashMap<K, V, O>
where
    O: KeyOps<K>,
{
    pub fn with_key_ops(ops: O) -> Self {
        Self {
            ops,
            chains: Chains::with_buckets(MIN_BUCKETS),
        }
    }

    pub fn key_ops(&self) -> &O {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }
    pub fn is_empty(&self) -> bool {
        self.chains.len() == 0
    }

    /// Current number of buckets; always a power of two.
    pub fn bucket_count(&self) -> usize {
        self.chains.bucket_count()
    }

    #[inline]
    fn spread_hash(&self, key: &K) -> i32 {
        spread(self.ops.hash(key))
    }

    /// Match rule for `put`: identity, then cached hash, then the equality
    /// predicate.
    #[inline]
    fn same_key(ops: &O, stored: &Entry<K, V>, key: &K, hash: i32) -> bool {
        ops.identical(&stored.key, key) || (stored.hash == hash && ops.equals(&stored.key, key))
    }

    /// Insert `key -> value`, or overwrite the value of an equal key.
    ///
    /// The table grows first when it is already past three quarters full.
    /// If growth is refused the insert still happens, into longer chains.
    /// On overwrite the stored key is kept and `key` is dropped.
    pub fn put(&mut self, key: K, value: V) -> PutResult<V> {
        if self.needs_growth() {
            match self.grow() {
                Ok(()) => {}
                Err(err @ GrowError::AtCapacity { .. }) => {
                    tracing::debug!(%err, len = self.len(), "inserting without growth");
                }
                Err(err @ GrowError::Alloc(_)) => {
                    tracing::warn!(%err, len = self.len(), "inserting without growth");
                }
            }
        }

        let hash = self.spread_hash(&key);
        let bucket = bucket_index(hash, self.chains.bucket_count());
        let ops = &self.ops;
        match self
            .chains
            .probe(bucket, |e| Self::same_key(ops, e, &key, hash))
        {
            Probe::Found(link) => {
                let entry = self
                    .chains
                    .entry_mut(link.key())
                    .expect("probed entry must be live");
                let previous = core::mem::replace(&mut entry.value, value);
                tracing::trace!(bucket, "replaced value");
                PutResult::Replaced { previous }
            }
            Probe::Vacant { tail } => {
                self.chains.insert_after(bucket, tail, key, value, hash);
                tracing::trace!(bucket, len = self.len(), "inserted entry");
                PutResult::Inserted
            }
        }
    }

    /// Look up by the equality predicate alone.
    ///
    /// Unlike `put` and `remove`, no identity or cached-hash test runs
    /// before `equals`; every entry in the bucket is offered to it.
    pub fn get(&self, key: &K) -> Option<&V> {
        let bucket = bucket_index(self.spread_hash(key), self.chains.bucket_count());
        self.chains
            .walk(bucket)
            .find(|(_, e)| self.ops.equals(&e.key, key))
            .map(|(_, e)| &e.value)
    }

    /// Mutable lookup; same matching rule as `get`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let bucket = bucket_index(self.spread_hash(key), self.chains.bucket_count());
        let ops = &self.ops;
        match self.chains.probe(bucket, |e| ops.equals(&e.key, key)) {
            Probe::Found(link) => self.chains.entry_mut(link.key()).map(|e| &mut e.value),
            Probe::Vacant { .. } => None,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove `key` and return its value. Absent keys yield `None`.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove `key` and return the stored key with its value.
    ///
    /// Matches like `get`: every entry ahead of the match is offered to
    /// `equals`.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let bucket = bucket_index(self.spread_hash(key), self.chains.bucket_count());
        let ops = &self.ops;
        match self.chains.probe(bucket, |e| ops.equals(&e.key, key)) {
            Probe::Found(link) => {
                let entry = self.chains.unlink(bucket, link)?;
                tracing::trace!(bucket, len = self.len(), "removed entry");
                Some((entry.key, entry.value))
            }
            Probe::Vacant { .. } => None,
        }
    }

    /// Visit entries in bucket order, then chain order, until `f` breaks.
    ///
    /// Returns `Break` if the visitor stopped early.
    pub fn for_each<F>(&self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(&K, &V) -> ControlFlow<()>,
    {
        for e in self.chains.entries() {
            f(&e.key, &e.value)?;
        }
        ControlFlow::Continue(())
    }

    /// `for_each` with mutable access to values.
    pub fn for_each_mut<F>(&mut self, f: F) -> ControlFlow<()>
    where
        F: FnMut(&K, &mut V) -> ControlFlow<()>,
    {
        self.chains.visit_mut(f)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.chains.entries(),
        }
    }

    /// Drop every entry. The bucket array keeps its current size.
    pub fn clear(&mut self) {
        self.chains.clear();
    }

    /// Render each bucket on its own line as `bucket[ i]->[v]->[v]`.
    pub fn dump<F>(&self, render: F) -> BucketDump<'_, K, V, F>
    where
        F: Fn(&V) -> String,
    {
        BucketDump::new(&self.chains, render)
    }

    fn needs_growth(&self) -> bool {
        self.chains.len() > self.chains.bucket_count() * 3 / 4
    }

    /// Double the bucket array and relink every entry by its cached hash.
    pub(crate) fn grow(&mut self) -> Result<(), GrowError> {
        let buckets = self.chains.bucket_count();
        let doubled = buckets * 2;
        if doubled > MAX_BUCKETS {
            return Err(GrowError::AtCapacity { buckets });
        }
        self.chains.rehash(doubled)?;
        tracing::debug!(from = buckets, to = doubled, len = self.len(), "grew bucket array");
        Ok(())
    }
}

/// Iterator over `(&K, &V)` in bucket order, then chain order.
pub struct Iter<'a, K, V> {
    inner: Entries<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }
}

impl<'a, K, V, O> IntoIterator for &'a ChainedHashMap<K, V, O>
where
    O: KeyOps<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, O> Extend<(K, V)> for ChainedHashMap<K, V, O>
where
    O: KeyOps<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            let _ = self.put(k, v);
        }
    }
}

impl<K, V, O> fmt::Debug for ChainedHashMap<K, V, O>
where
    K: fmt::Debug,
    V: fmt::Debug,
    O: KeyOps<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
