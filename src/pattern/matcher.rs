// Tue Jan 13 2026 - Alex

use crate::pattern::simd::{self, has_vector_support, LANES};
use crate::pattern::PatternError;
use std::fmt;

/// Word width used by the word-wise tier.
pub const WORD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Matching strategy, ordered from slowest to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    ByteWise,
    WordWise,
    Vector,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteWise => write!(f, "byte-wise"),
            Self::WordWise => write!(f, "word-wise"),
            Self::Vector => write!(f, "vector"),
        }
    }
}

/// Drop trailing wildcards so raw byte/mask input has the same shape as a
/// `Pattern`. Mismatched lengths are left for `validate` to reject.
pub fn trim_trailing_wildcards<'a>(bytes: &'a [u8], mask: &'a [bool]) -> (&'a [u8], &'a [bool]) {
    if bytes.len() != mask.len() {
        return (bytes, mask);
    }
    let len = mask.iter().rposition(|&exact| exact).map_or(0, |last| last + 1);
    (&bytes[..len], &mask[..len])
}

/// Reject patterns no tier can run: empty, mismatched, or starting with a
/// wildcard.
pub fn validate(bytes: &[u8], mask: &[bool]) -> Result<(), PatternError> {
    if bytes.is_empty() {
        return Err(PatternError::InvalidPattern("pattern is empty".to_string()));
    }
    if bytes.len() != mask.len() {
        return Err(PatternError::InvalidPattern(format!(
            "{} bytes but {} mask entries",
            bytes.len(),
            mask.len()
        )));
    }
    if !mask[0] {
        return Err(PatternError::InvalidPattern(
            "first byte must not be a wildcard".to_string(),
        ));
    }
    Ok(())
}

fn word_eligible(mask: &[bool]) -> bool {
    mask.len() >= WORD && mask[..WORD].iter().all(|&m| m)
}

/// The tier `find` will run for this pattern shape and haystack.
pub fn select_tier(mask: &[bool], haystack_len: usize, direction: Direction) -> Tier {
    if !direction.is_forward() || mask.len() <= 2 {
        return Tier::ByteWise;
    }
    if has_vector_support() {
        if haystack_len < LANES + mask.len() {
            Tier::ByteWise
        } else {
            Tier::Vector
        }
    } else if word_eligible(mask) {
        Tier::WordWise
    } else {
        Tier::ByteWise
    }
}

/// Find the first (forward) or last (backward) match of the pattern in
/// `haystack`, returning its offset. Always runs the fastest valid tier.
pub fn find(
    bytes: &[u8],
    mask: &[bool],
    haystack: &[u8],
    direction: Direction,
) -> Result<Option<usize>, PatternError> {
    find_vector(bytes, mask, haystack, direction)
}

pub fn find_bytewise(
    bytes: &[u8],
    mask: &[bool],
    haystack: &[u8],
    direction: Direction,
) -> Result<Option<usize>, PatternError> {
    validate(bytes, mask)?;
    Ok(match direction {
        Direction::Forward => find_bytewise_forward(bytes, mask, haystack),
        Direction::Backward => find_bytewise_backward(bytes, mask, haystack),
    })
}

/// Word-wise scan; degrades to byte-wise for backward scans and for patterns
/// whose first eight bytes are not all exact.
pub fn find_wordwise(
    bytes: &[u8],
    mask: &[bool],
    haystack: &[u8],
    direction: Direction,
) -> Result<Option<usize>, PatternError> {
    validate(bytes, mask)?;
    if !direction.is_forward() || !word_eligible(mask) {
        return find_bytewise(bytes, mask, haystack, direction);
    }
    Ok(find_wordwise_forward(bytes, mask, haystack))
}

/// Vector scan; degrades to word-wise without AVX2 and to byte-wise for
/// backward scans, tiny patterns and haystacks narrower than one block.
pub fn find_vector(
    bytes: &[u8],
    mask: &[bool],
    haystack: &[u8],
    direction: Direction,
) -> Result<Option<usize>, PatternError> {
    validate(bytes, mask)?;
    Ok(match select_tier(mask, haystack.len(), direction) {
        Tier::Vector => simd::scan_forward(bytes, mask, haystack),
        Tier::WordWise => find_wordwise_forward(bytes, mask, haystack),
        Tier::ByteWise => match direction {
            Direction::Forward => find_bytewise_forward(bytes, mask, haystack),
            Direction::Backward => find_bytewise_backward(bytes, mask, haystack),
        },
    })
}

/// Check bytes `from..` of the pattern against `haystack[at..]`.
#[inline(always)]
pub(crate) fn verify_from(haystack: &[u8], at: usize, bytes: &[u8], mask: &[bool], from: usize) -> bool {
    let window = &haystack[at..at + bytes.len()];
    (from..bytes.len()).all(|i| !mask[i] || window[i] == bytes[i])
}

pub(crate) fn find_bytewise_forward(bytes: &[u8], mask: &[bool], haystack: &[u8]) -> Option<usize> {
    if haystack.len() < bytes.len() {
        return None;
    }
    let first = bytes[0];
    (0..=haystack.len() - bytes.len())
        .find(|&at| haystack[at] == first && verify_from(haystack, at, bytes, mask, 1))
}

fn find_bytewise_backward(bytes: &[u8], mask: &[bool], haystack: &[u8]) -> Option<usize> {
    if haystack.len() < bytes.len() {
        return None;
    }
    let first = bytes[0];
    (0..=haystack.len() - bytes.len())
        .rev()
        .find(|&at| haystack[at] == first && verify_from(haystack, at, bytes, mask, 1))
}

#[inline(always)]
fn read_word(data: &[u8], at: usize) -> u64 {
    let mut word = [0u8; WORD];
    word.copy_from_slice(&data[at..at + WORD]);
    u64::from_le_bytes(word)
}

fn find_wordwise_forward(bytes: &[u8], mask: &[bool], haystack: &[u8]) -> Option<usize> {
    if haystack.len() < bytes.len() {
        return None;
    }
    let head = read_word(bytes, 0);
    (0..=haystack.len() - bytes.len())
        .find(|&at| read_word(haystack, at) == head && verify_from(haystack, at, bytes, mask, WORD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Obviously-correct reference: every window, every byte.
    fn reference(bytes: &[u8], mask: &[bool], haystack: &[u8], direction: Direction) -> Option<usize> {
        if haystack.len() < bytes.len() {
            return None;
        }
        let matches_at = |at: usize| {
            bytes
                .iter()
                .zip(mask)
                .enumerate()
                .all(|(i, (b, &m))| !m || haystack[at + i] == *b)
        };
        let mut starts = 0..=haystack.len() - bytes.len();
        match direction {
            Direction::Forward => starts.find(|&at| matches_at(at)),
            Direction::Backward => starts.rev().find(|&at| matches_at(at)),
        }
    }

    fn all_tiers(bytes: &[u8], mask: &[bool], haystack: &[u8], direction: Direction) -> [Option<usize>; 3] {
        [
            find_bytewise(bytes, mask, haystack, direction).unwrap(),
            find_wordwise(bytes, mask, haystack, direction).unwrap(),
            find_vector(bytes, mask, haystack, direction).unwrap(),
        ]
    }

    #[test]
    fn test_pattern_at_buffer_edges() {
        let needle = [0x01, 0x02, 0x03, 0x04];
        let mask = [true; 4];

        let mut data = vec![0u8; 100];
        for direction in [Direction::Forward, Direction::Backward] {
            assert_eq!(all_tiers(&needle, &mask, &data, direction), [None; 3]);
        }

        data[..4].copy_from_slice(&needle);
        for direction in [Direction::Forward, Direction::Backward] {
            assert_eq!(all_tiers(&needle, &mask, &data, direction), [Some(0); 3]);
        }

        data[..4].fill(0);
        data[96..].copy_from_slice(&needle);
        for direction in [Direction::Forward, Direction::Backward] {
            assert_eq!(all_tiers(&needle, &mask, &data, direction), [Some(96); 3]);
        }
    }

    #[test]
    fn test_direction_picks_first_or_last() {
        let mut data = vec![0u8; 300];
        data[10..13].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
        data[250..253].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
        let (bytes, mask) = ([0xAA, 0xBB, 0xCC], [true; 3]);
        assert_eq!(find(&bytes, &mask, &data, Direction::Forward), Ok(Some(10)));
        assert_eq!(find(&bytes, &mask, &data, Direction::Backward), Ok(Some(250)));
    }

    #[test]
    fn test_wordwise_verifies_tail_with_mask() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 11];
        let mask = [true, true, true, true, true, true, true, true, true, false, true];
        let mut data = vec![0u8; 64];
        data[5..16].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0x77, 10]);
        data[30..41].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 0x77, 11]);
        assert_eq!(find_wordwise(&bytes, &mask, &data, Direction::Forward), Ok(Some(30)));
    }

    #[test]
    fn test_haystack_smaller_than_pattern() {
        let bytes = [1, 2, 3, 4, 5];
        let mask = [true; 5];
        for direction in [Direction::Forward, Direction::Backward] {
            assert_eq!(all_tiers(&bytes, &mask, &[1, 2, 3, 4], direction), [None; 3]);
            assert_eq!(all_tiers(&bytes, &mask, &[], direction), [None; 3]);
        }
    }

    #[test]
    fn test_trim_trailing_wildcards() {
        let (bytes, mask) = trim_trailing_wildcards(&[0x7E, 0x00, 0x11, 0x00], &[true, false, true, false]);
        assert_eq!(bytes, &[0x7E, 0x00, 0x11]);
        assert_eq!(mask, &[true, false, true]);

        let (bytes, mask) = trim_trailing_wildcards(&[0x00, 0x00], &[false, false]);
        assert!(bytes.is_empty() && mask.is_empty());

        let (bytes, mask) = trim_trailing_wildcards(&[0x01, 0x02], &[true]);
        assert_eq!((bytes.len(), mask.len()), (2, 1));
    }

    #[test]
    fn test_invalid_patterns_are_errors() {
        let data = [0u8; 16];
        assert!(matches!(
            find(&[], &[], &data, Direction::Forward),
            Err(PatternError::InvalidPattern(_))
        ));
        assert!(matches!(
            find(&[0, 1], &[false, true], &data, Direction::Forward),
            Err(PatternError::InvalidPattern(_))
        ));
        assert!(matches!(
            find_bytewise(&[0, 1], &[true], &data, Direction::Backward),
            Err(PatternError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_select_tier() {
        let exact8 = [true; 8];
        let holey8 = [true, true, false, true, true, true, true, true];

        assert_eq!(select_tier(&exact8, 4096, Direction::Backward), Tier::ByteWise);
        assert_eq!(select_tier(&[true, true], 4096, Direction::Forward), Tier::ByteWise);

        if has_vector_support() {
            assert_eq!(select_tier(&holey8, 4096, Direction::Forward), Tier::Vector);
            assert_eq!(select_tier(&exact8, LANES + 7, Direction::Forward), Tier::ByteWise);
        } else {
            assert_eq!(select_tier(&exact8, 4096, Direction::Forward), Tier::WordWise);
            assert_eq!(select_tier(&holey8, 4096, Direction::Forward), Tier::ByteWise);
        }
    }

    fn pattern_and_haystack() -> impl Strategy<Value = (Vec<u8>, Vec<bool>, Vec<u8>, usize, bool)> {
        (1usize..=128, 1usize..=4096).prop_flat_map(|(pattern_len, haystack_len)| {
            (
                // Small alphabet so partial matches are common.
                prop::collection::vec(0u8..4, pattern_len),
                prop::collection::vec(prop::bool::weighted(0.7), pattern_len),
                prop::collection::vec(0u8..4, haystack_len),
                0..haystack_len,
                any::<bool>(),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn tiers_agree_with_reference((bytes, mut mask, mut haystack, place, plant) in pattern_and_haystack()) {
            mask[0] = true;
            if plant && place + bytes.len() <= haystack.len() {
                for (i, (&b, &m)) in bytes.iter().zip(&mask).enumerate() {
                    if m {
                        haystack[place + i] = b;
                    }
                }
            }

            for direction in [Direction::Forward, Direction::Backward] {
                let expected = reference(&bytes, &mask, &haystack, direction);
                let got = all_tiers(&bytes, &mask, &haystack, direction);
                prop_assert_eq!(got, [expected; 3], "direction {:?}", direction);
            }
        }

        #[test]
        fn exact_prefix_tiers_agree((bytes, _mask, haystack, place, _plant) in pattern_and_haystack()) {
            let mask = vec![true; bytes.len()];
            let mut haystack = haystack;
            if place + bytes.len() <= haystack.len() {
                haystack[place..place + bytes.len()].copy_from_slice(&bytes);
            }
            let expected = reference(&bytes, &mask, &haystack, Direction::Forward);
            prop_assert_eq!(all_tiers(&bytes, &mask, &haystack, Direction::Forward), [expected; 3]);
        }
    }
}
