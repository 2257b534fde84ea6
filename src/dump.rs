//! Bucket-by-bucket rendering for inspection.

use crate::chain::Chains;
use core::fmt;

/// Displays every bucket on its own line, chains rendered through a
/// caller-supplied function of the value:
///
/// ```text
/// bucket[ 0]->[A(10)]->[D(40)]
/// bucket[ 1]
/// ```
pub struct BucketDump<'a, K, V, F> {
    chains: &'a Chains<K, V>,
    render: F,
}

impl<'a, K, V, F> BucketDump<'a, K, V, F> {
    pub(crate) fn new(chains: &'a Chains<K, V>, render: F) -> Self {
        Self { chains, render }
    }
}

impl<K, V, F> fmt::Display for BucketDump<'_, K, V, F>
where
    F: Fn(&V) -> String,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in 0..self.chains.bucket_count() {
            write!(f, "bucket[{bucket:2}]")?;
            for (_, e) in self.chains.walk(bucket) {
                write!(f, "->[{}]", (self.render)(&e.value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
