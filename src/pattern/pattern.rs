// Tue Jan 13 2026 - Alex

use crate::pattern::signature::{format_signature, parse_signature};
use crate::pattern::PatternError;
use std::fmt;
use std::str::FromStr;

/// A validated byte pattern: never empty, first byte exact, no trailing
/// wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    bytes: Vec<u8>,
    mask: Vec<bool>,
}

impl Pattern {
    /// Build a pattern from raw parts. Trailing wildcards are trimmed; wildcard
    /// bytes are zeroed so equal patterns compare equal.
    pub fn new(mut bytes: Vec<u8>, mut mask: Vec<bool>) -> Result<Self, PatternError> {
        if bytes.len() != mask.len() {
            return Err(PatternError::InvalidPattern(format!(
                "{} bytes but {} mask entries",
                bytes.len(),
                mask.len()
            )));
        }
        while mask.last() == Some(&false) {
            mask.pop();
            bytes.pop();
        }
        match mask.first() {
            None => return Err(PatternError::InvalidPattern("pattern is empty".to_string())),
            Some(false) => {
                return Err(PatternError::InvalidPattern(
                    "first byte must not be a wildcard".to_string(),
                ))
            }
            Some(true) => {}
        }
        for (b, &exact) in bytes.iter_mut().zip(mask.iter()) {
            if !exact {
                *b = 0;
            }
        }
        Ok(Self { bytes, mask })
    }

    /// Create a pattern with a byte mask (0xFF = fixed, anything else = wildcard)
    pub fn with_byte_mask(bytes: &[u8], byte_mask: &[u8]) -> Result<Self, PatternError> {
        Self::new(bytes.to_vec(), byte_mask.iter().map(|&m| m == 0xFF).collect())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PatternError> {
        Self::new(bytes.to_vec(), vec![true; bytes.len()])
    }

    pub fn parse(signature: &str) -> Result<Self, PatternError> {
        let (bytes, mask) = parse_signature(signature)?;
        Ok(Self { bytes, mask })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(self.mask.iter())
                .zip(data.iter())
                .all(|((pattern_byte, &exact), data_byte)| !exact || pattern_byte == data_byte)
    }

    pub fn significant_byte_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn to_hex_string(&self) -> String {
        format_signature(&self.bytes, &self.mask)
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}
