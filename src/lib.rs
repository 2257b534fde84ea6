//! chained-hashmap: a separate-chaining hash map whose hashing and key
//! equality are supplied by the caller.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small hash table whose invariants can be checked layer by
//!   layer, with all key semantics delegated to a collaborator.
//! - Layers:
//!   - `spread`: Doug Lea's bit-spreading transform over the caller's
//!     `i32` digest, and power-of-two masking into a bucket index.
//!   - `chain`: bucket heads plus an arena (`SlotMap`) of entries, each
//!     linked to its successor by generational key. Supports append,
//!     unlink given a predecessor, and relinking into a larger array.
//!   - `ChainedHashMap<K, V, O>`: the engine. Owns the chains and the
//!     `KeyOps` collaborator; exposes put/get/remove/for_each and grows
//!     before it would breach the load factor.
//!
//! Constraints
//! - Bucket count is a power of two between `MIN_BUCKETS` and
//!   `MAX_BUCKETS`.
//! - Load factor 3/4: `put` doubles the array when the live count already
//!   exceeds three quarters of the bucket count. The check runs before the
//!   new entry is counted.
//! - Past `MAX_BUCKETS` the table stops growing and `put` keeps inserting
//!   into longer chains instead of failing.
//! - Keys are unique under the collaborator's equality.
//!
//! Hashing and rehashing invariants
//! - Each entry stores the spread hash computed at insertion. Rehashing
//!   reads only that cached value; the collaborator's `hash` is never
//!   called after insertion.
//! - Entries are relinked, never moved or cloned, when the array grows.
//!
//! Key comparison
//! - `put` tries the collaborator's identity test, then the cached hash,
//!   and only then `equals`.
//! - `get`, `get_mut`, `contains_key` and `remove` call `equals` on every
//!   entry of the bucket in order, without either short-circuit. The two rules
//!   agree whenever the collaborator's `hash` is consistent with `equals`.
//!
//! Ownership
//! - The map owns whatever `K` and `V` are. Instantiate with references
//!   (`K = &'a str`, `V = &'a T`) to keep keys and values owned by the
//!   caller; the borrow checker then keeps the map from outliving them.
//! - Collaborators are held by value. `&O` and `Rc<O>` implement `KeyOps`
//!   as well, for borrowed or shared collaborators.
//!
//! Notes and non-goals
//! - Single-threaded; no internal locking. Wrap in a `Mutex` to share.
//! - No persistence or serialization.
//! - Logging goes through `tracing`; the crate never installs a subscriber.

mod chain;
mod dump;
mod error;
pub mod key_ops;
mod map;
mod map_proptest;
pub mod spread;

// Public surface
pub use dump::BucketDump;
pub use error::BuildError;
pub use key_ops::{FnKeyOps, HashEq, KeyOps};
pub use map::{ChainedHashMap, Iter, PutResult};
pub use spread::{MAX_BUCKETS, MIN_BUCKETS};
