//! Flag bitset helpers.
//!
//! Some chunk formats store option sets as plain integers; these helpers
//! convert between the integer and the list of set bit indices.

/// Return the indices of all set bits in `value`, lowest first.
pub fn bits_set(value: u64) -> Vec<u32> {
    (0..u64::BITS).filter(|b| value & (1 << b) != 0).collect()
}

/// Combine a list of bit indices back into an integer value.
///
/// Indices of 64 or above are ignored.
pub fn bits_value(flags: &[u32]) -> u64 {
    flags
        .iter()
        .filter(|&&b| b < u64::BITS)
        .fold(0u64, |acc, &b| acc | (1 << b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        assert_eq!(bits_set(0b1010_0001), vec![0, 5, 7]);
        assert_eq!(bits_value(&[0, 5, 7]), 0b1010_0001);
        assert_eq!(bits_set(0), Vec::<u32>::new());
        assert_eq!(bits_value(&[]), 0);
    }

    #[test]
    fn test_out_of_range_ignored() {
        assert_eq!(bits_value(&[1, 64, 200]), 2);
    }
}
