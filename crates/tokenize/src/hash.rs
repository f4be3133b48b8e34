/// Starting value of the djb2 accumulator.
pub const DJB2_SEED: u64 = 5381;

/// djb2 over raw bytes: `h = h * 33 + byte`, wrapping.
///
/// Cheap first-level identity for token text. Equal hashes do not imply equal
/// text, so callers compare the bytes before merging two tokens.
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(u64::from(b))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_seed() {
        assert_eq!(djb2(b""), DJB2_SEED);
    }

    #[test]
    fn known_values() {
        // 5381 * 33 + '.'
        assert_eq!(djb2(b"."), 177_619);
        assert_eq!(djb2(b"a"), 177_670);
    }

    #[test]
    fn short_colliding_pair() {
        // 33 * ('b' - 'a') + ('A' - 'b') == 0
        assert_eq!(djb2(b"bA"), djb2(b"ab"));
        assert_eq!(djb2(b"ab"), 5_863_208);
    }

    #[test]
    fn long_input_wraps_instead_of_overflowing() {
        let long = vec![b'z'; 4096];
        let _ = djb2(&long);
    }
}
