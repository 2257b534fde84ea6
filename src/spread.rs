//! Hash spreading and bucket indexing.
//!
//! Bucket indices only use the low bits of a hash, so caller digests that
//! vary mostly in their high bits (sequential ids, string lengths, pointer
//! values) would pile into a few buckets. `spread` runs Doug Lea's
//! shift/xor/add avalanche over the digest before it is masked.

/// Bucket count of a freshly constructed map.
pub const MIN_BUCKETS: usize = 1;

/// Growth ceiling. Past this the map keeps inserting into longer chains.
pub const MAX_BUCKETS: usize = 4096;

/// Mix the caller's digest so that its entropy reaches the low bits.
///
/// Arithmetic is wrapping 32-bit; right shifts are logical.
#[inline]
pub fn spread(raw: i32) -> i32 {
    let mut h = raw;
    h = h.wrapping_add(!(h << 9));
    h ^= ((h as u32) >> 14) as i32;
    h = h.wrapping_add(h << 4);
    h ^= ((h as u32) >> 10) as i32;
    h
}

/// Map a spread hash onto `0..bucket_count`.
///
/// `bucket_count` must be a power of two; the mask silently misroutes
/// otherwise.
#[inline]
pub fn bucket_index(hash: i32, bucket_count: usize) -> usize {
    debug_assert!(bucket_count.is_power_of_two());
    (hash as u32 as usize) & (bucket_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference vectors pin the transform bit-for-bit.
    #[test]
    fn spread_matches_reference_vectors() {
        let cases: [(i32, u32); 7] = [
            (0, 0xff83_ef00),
            (1, 0xff83_cee7),
            (2, 0xff83_acce),
            (3, 0xff83_8ad4),
            (-1, 0x0000_21d6),
            (i32::MAX, 0x8002_2956),
            (i32::MIN, 0x7fc1_f780),
        ];
        for (raw, expected) in cases {
            assert_eq!(spread(raw) as u32, expected, "spread({raw})");
        }
    }

    /// Small consecutive digests land in distinct buckets of a small table,
    /// which plain masking of the raw digest would also do, but digests
    /// differing only above bit 16 must not all collapse into one bucket.
    #[test]
    fn high_bit_digests_are_dispersed() {
        let buckets: std::collections::BTreeSet<usize> = (0..16)
            .map(|i| bucket_index(spread(i << 20), 16))
            .collect();
        assert!(buckets.len() > 1, "all high-bit digests collided");
    }

    #[test]
    fn index_with_single_bucket_is_zero() {
        for raw in [0, 1, -1, i32::MAX, i32::MIN] {
            assert_eq!(bucket_index(spread(raw), MIN_BUCKETS), 0);
        }
    }

    #[test]
    fn bounds_are_powers_of_two() {
        assert!(MIN_BUCKETS.is_power_of_two());
        assert!(MAX_BUCKETS.is_power_of_two());
        assert!(MIN_BUCKETS <= MAX_BUCKETS);
    }

    proptest! {
        // Growing the table only adds one more low bit to the mask, so the
        // index in the larger table agrees with the smaller one on its low bits.
        #[test]
        fn prop_index_in_range_and_nested(raw in any::<i32>(), shift in 0u32..12) {
            let n = 1usize << shift;
            let h = spread(raw);
            let small = bucket_index(h, n);
            let big = bucket_index(h, n * 2);
            prop_assert!(small < n);
            prop_assert!(big < n * 2);
            prop_assert_eq!(big & (n - 1), small);
        }
    }
}
