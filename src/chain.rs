//! Chains: bucket heads plus an arena of singly linked entries.
//!
//! Entries live in a `SlotMap` and point at their successor by generational
//! key, so unlinking never leaves a dangling link and a stale key simply
//! fails to resolve. Each bucket slot holds the key of its chain's head.

use crate::spread::bucket_index;
use core::ops::ControlFlow;
use slotmap::{new_key_type, SlotMap};
use std::collections::TryReserveError;

new_key_type! {
    /// Arena slot of one entry.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Spread hash computed when the entry was inserted.
    pub(crate) hash: i32,
    next: Option<EntryKey>,
}

/// Where a matching entry sits: unlinking rewrites the predecessor's link
/// (or the bucket head when there is none).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Link {
    prev: Option<EntryKey>,
    at: EntryKey,
}

impl Link {
    pub(crate) fn key(&self) -> EntryKey {
        self.at
    }
}

/// Outcome of scanning one chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    Found(Link),
    /// No match; `tail` is the last entry of the chain, if any.
    Vacant { tail: Option<EntryKey> },
}

pub(crate) struct Chains<K, V> {
    heads: Vec<Option<EntryKey>>,
    entries: SlotMap<EntryKey, Entry<K, V>>,
}

impl<K, V> Chains<K, V> {
    pub(crate) fn with_buckets(bucket_count: usize) -> Self {
        debug_assert!(bucket_count.is_power_of_two());
        Self {
            heads: vec![None; bucket_count],
            entries: SlotMap::with_key(),
        }
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry_mut(&mut self, k: EntryKey) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(k)
    }

    /// Entries of one bucket in chain order.
    pub(crate) fn walk(&self, bucket: usize) -> Walk<'_, K, V> {
        Walk {
            entries: &self.entries,
            cursor: self.heads.get(bucket).copied().flatten(),
        }
    }

    /// Every entry, bucket order then chain order.
    pub(crate) fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            chains: self,
            bucket: 0,
            walk: self.walk(0),
        }
    }

    /// Scan a bucket's chain for the first entry accepted by `matches`.
    pub(crate) fn probe<F>(&self, bucket: usize, mut matches: F) -> Probe
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        let mut prev = None;
        for (k, e) in self.walk(bucket) {
            if matches(e) {
                return Probe::Found(Link { prev, at: k });
            }
            prev = Some(k);
        }
        Probe::Vacant { tail: prev }
    }

    /// Link a new entry after `tail`, or as the head when `tail` is `None`.
    ///
    /// `tail` must come from a `Probe::Vacant` of the same bucket with no
    /// mutation in between.
    pub(crate) fn insert_after(
        &mut self,
        bucket: usize,
        tail: Option<EntryKey>,
        key: K,
        value: V,
        hash: i32,
    ) -> EntryKey {
        let k = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail {
            Some(t) => {
                if let Some(e) = self.entries.get_mut(t) {
                    debug_assert!(e.next.is_none(), "tail must end its chain");
                    e.next = Some(k);
                }
            }
            None => {
                if let Some(head) = self.heads.get_mut(bucket) {
                    debug_assert!(head.is_none(), "empty chain expected");
                    *head = Some(k);
                }
            }
        }
        k
    }

    /// Detach the entry at `link` from its chain and free its slot.
    pub(crate) fn unlink(&mut self, bucket: usize, link: Link) -> Option<Entry<K, V>> {
        let entry = self.entries.remove(link.at)?;
        match link.prev {
            Some(p) => {
                if let Some(prev) = self.entries.get_mut(p) {
                    prev.next = entry.next;
                }
            }
            None => {
                if let Some(head) = self.heads.get_mut(bucket) {
                    *head = entry.next;
                }
            }
        }
        Some(entry)
    }

    /// Move every entry into a fresh array of `bucket_count` chains.
    ///
    /// Indices come from the cached hashes; entries are relinked in place and
    /// pushed at the head of their new chain. On allocation failure nothing
    /// changes.
    pub(crate) fn rehash(&mut self, bucket_count: usize) -> Result<(), TryReserveError> {
        debug_assert!(bucket_count.is_power_of_two());
        let mut heads: Vec<Option<EntryKey>> = Vec::new();
        heads.try_reserve_exact(bucket_count)?;
        heads.resize(bucket_count, None);

        for &head in &self.heads {
            let mut cursor = head;
            while let Some(k) = cursor {
                let Some(e) = self.entries.get_mut(k) else {
                    break;
                };
                cursor = e.next;
                let index = bucket_index(e.hash, bucket_count);
                e.next = heads[index];
                heads[index] = Some(k);
            }
        }

        self.heads = heads;
        Ok(())
    }

    /// Visit values mutably, bucket order then chain order.
    pub(crate) fn visit_mut<F>(&mut self, mut f: F) -> ControlFlow<()>
    where
        F: FnMut(&K, &mut V) -> ControlFlow<()>,
    {
        for &head in &self.heads {
            let mut cursor = head;
            while let Some(k) = cursor {
                let Some(e) = self.entries.get_mut(k) else {
                    break;
                };
                f(&e.key, &mut e.value)?;
                cursor = e.next;
            }
        }
        ControlFlow::Continue(())
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.heads.iter_mut().for_each(|h| *h = None);
    }
}

/// Iterator over one chain.
pub(crate) struct Walk<'a, K, V> {
    entries: &'a SlotMap<EntryKey, Entry<K, V>>,
    cursor: Option<EntryKey>,
}

impl<'a, K, V> Iterator for Walk<'a, K, V> {
    type Item = (EntryKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let e = self.entries.get(k)?;
        self.cursor = e.next;
        Some((k, e))
    }
}

/// Iterator over all chains in bucket order.
pub(crate) struct Entries<'a, K, V> {
    chains: &'a Chains<K, V>,
    bucket: usize,
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Iterator for Entries<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, e)) = self.walk.next() {
                return Some(e);
            }
            self.bucket += 1;
            if self.bucket >= self.chains.bucket_count() {
                return None;
            }
            self.walk = self.chains.walk(self.bucket);
        }
    }
}
