//! Key collaborators: how the map hashes and compares keys.
//!
//! The map never looks inside a key. Everything it needs is asked of a
//! `KeyOps` value supplied at construction and held for the map's lifetime.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use std::rc::Rc;

/// Hashing and equality for keys of type `K`.
///
/// Implementations must keep `hash` consistent with `equals`: keys that
/// compare equal must produce equal digests. The map cannot check this;
/// violating it makes lookups miss.
pub trait KeyOps<K: ?Sized> {
    /// Raw digest for `key`. The map spreads it before indexing.
    fn hash(&self, key: &K) -> i32;

    /// Semantic key equality.
    fn equals(&self, a: &K, b: &K) -> bool;

    /// Cheap identity test tried before `equals` on insert and removal.
    ///
    /// Returning `true` must imply `equals(stored, probe)`. Key types that
    /// are references can compare addresses here.
    #[inline]
    fn identical(&self, _stored: &K, _probe: &K) -> bool {
        false
    }
}

impl<K: ?Sized, O: KeyOps<K> + ?Sized> KeyOps<K> for &O {
    #[inline]
    fn hash(&self, key: &K) -> i32 {
        (**self).hash(key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (**self).equals(a, b)
    }
    #[inline]
    fn identical(&self, stored: &K, probe: &K) -> bool {
        (**self).identical(stored, probe)
    }
}

impl<K: ?Sized, O: KeyOps<K> + ?Sized> KeyOps<K> for Rc<O> {
    #[inline]
    fn hash(&self, key: &K) -> i32 {
        (**self).hash(key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (**self).equals(a, b)
    }
    #[inline]
    fn identical(&self, stored: &K, probe: &K) -> bool {
        (**self).identical(stored, probe)
    }
}

/// A hash function and an equality predicate supplied as closures.
#[derive(Clone, Copy)]
pub struct FnKeyOps<H, E> {
    hash: H,
    equals: E,
}

impl<H, E> FnKeyOps<H, E> {
    pub fn new(hash: H, equals: E) -> Self {
        Self { hash, equals }
    }
}

impl<K: ?Sized, H, E> KeyOps<K> for FnKeyOps<H, E>
where
    H: Fn(&K) -> i32,
    E: Fn(&K, &K) -> bool,
{
    #[inline]
    fn hash(&self, key: &K) -> i32 {
        (self.hash)(key)
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}

impl<H, E> core::fmt::Debug for FnKeyOps<H, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnKeyOps").finish_non_exhaustive()
    }
}

/// Adapter for keys that already implement `Hash + Eq`.
///
/// The 64-bit output of `S` is truncated to its low 32 bits.
#[derive(Clone, Debug, Default)]
pub struct HashEq<S = DefaultHashBuilder> {
    build_hasher: S,
}

impl<S> HashEq<S> {
    pub fn with_hasher(build_hasher: S) -> Self {
        Self { build_hasher }
    }
}

impl<K, S> KeyOps<K> for HashEq<S>
where
    K: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash(&self, key: &K) -> i32 {
        self.build_hasher.hash_one(key) as i32
    }
    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fn_key_ops_delegates_to_closures() {
        let calls = Cell::new(0);
        let ops = FnKeyOps::new(
            |k: &str| k.len() as i32,
            |a: &str, b: &str| {
                calls.set(calls.get() + 1);
                a == b
            },
        );
        assert_eq!(KeyOps::<str>::hash(&ops, "abc"), 3);
        assert!(ops.equals("abc", "abc"));
        assert!(!ops.equals("abc", "abd"));
        assert_eq!(calls.get(), 2);
        assert!(!ops.identical("abc", "abc"), "default identity is never taken");
    }

    #[test]
    fn hash_eq_is_consistent_with_eq() {
        let ops: HashEq = HashEq::default();
        let a = String::from("key");
        let b = String::from("key");
        assert!(KeyOps::<String>::equals(&ops, &a, &b));
        assert_eq!(KeyOps::<String>::hash(&ops, &a), KeyOps::<String>::hash(&ops, &b));
        assert!(!KeyOps::<String>::equals(&ops, &a, &String::from("other")));
    }

    #[test]
    fn borrowed_and_shared_collaborators_forward() {
        struct Len;
        impl KeyOps<str> for Len {
            fn hash(&self, key: &str) -> i32 {
                key.len() as i32
            }
            fn equals(&self, a: &str, b: &str) -> bool {
                a == b
            }
            fn identical(&self, stored: &str, probe: &str) -> bool {
                core::ptr::eq(stored, probe)
            }
        }

        let owned = Len;
        let borrowed = &owned;
        let shared = Rc::new(Len);
        let s = "four";
        assert_eq!(KeyOps::<str>::hash(&borrowed, s), 4);
        assert_eq!(KeyOps::<str>::hash(&shared, s), 4);
        assert!(borrowed.identical(s, s));
        assert!(shared.identical(s, s));
        assert!(!shared.identical(s, &String::from("four")));
    }
}
