// Tue Jan 15 2026 - Alex

//! AVX2 candidate filter for forward scans.
//!
//! Byte 0 of the pattern is broadcast across a 32-byte lane and compared
//! against each block of the haystack; the movemask of that comparison gives
//! one bit per candidate start. When byte 1 is exact a second comparison is
//! shifted onto the first so most false candidates die before the byte-wise
//! verification runs.

use crate::pattern::matcher::{find_bytewise_forward, verify_from};
use once_cell::sync::Lazy;

/// Width of one vector block in bytes.
pub const LANES: usize = 32;

static VECTOR_SUPPORT: Lazy<bool> = Lazy::new(detect_vector_support);

/// Whether the AVX2 tier can run on this machine. The CPU and OS probe runs
/// once per process; later calls read the cached answer.
pub fn has_vector_support() -> bool {
    *VECTOR_SUPPORT
}

#[cfg(target_arch = "x86_64")]
fn detect_vector_support() -> bool {
    // Checks CPUID for AVX and AVX2 and XGETBV for OS-enabled YMM state.
    let supported = is_x86_feature_detected!("avx") && is_x86_feature_detected!("avx2");
    log::debug!("AVX2 vector scanning {}", if supported { "enabled" } else { "unsupported" });
    supported
}

#[cfg(not(target_arch = "x86_64"))]
fn detect_vector_support() -> bool {
    log::debug!("AVX2 vector scanning unsupported on this architecture");
    false
}

/// Forward scan using the vector filter.
///
/// Callers must have checked `has_vector_support()`, a pattern longer than
/// two bytes with an exact first byte, and a haystack of at least
/// `LANES + bytes.len()` bytes.
pub(crate) fn scan_forward(bytes: &[u8], mask: &[bool], haystack: &[u8]) -> Option<usize> {
    debug_assert!(bytes.len() > 2 && mask[0]);
    debug_assert!(haystack.len() >= LANES + bytes.len());

    #[cfg(target_arch = "x86_64")]
    {
        if has_vector_support() {
            // SAFETY: AVX2 availability was verified by the runtime probe.
            return unsafe { scan_forward_avx2(bytes, mask, haystack) };
        }
    }

    find_bytewise_forward(bytes, mask, haystack)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn scan_forward_avx2(bytes: &[u8], mask: &[bool], haystack: &[u8]) -> Option<usize> {
    use std::arch::x86_64::*;

    unsafe {
        let pattern_len = bytes.len();
        // Last block start whose candidates can all be verified in bounds.
        let end = haystack.len() - LANES - pattern_len;
        let ptr = haystack.as_ptr();

        let first = _mm256_set1_epi8(bytes[0] as i8);
        let second = if mask[1] {
            Some(_mm256_set1_epi8(bytes[1] as i8))
        } else {
            None
        };

        let mut pos = 0;
        while pos <= end {
            let block = _mm256_loadu_si256(ptr.add(pos) as *const __m256i);
            let mut matches = _mm256_movemask_epi8(_mm256_cmpeq_epi8(block, first)) as u32;

            if let Some(second) = second {
                let next = _mm256_movemask_epi8(_mm256_cmpeq_epi8(block, second)) as u32;
                // Bit 31's second byte sits in the next block; keep it and let
                // verification decide.
                matches &= (next >> 1) | (1 << 31);
            }

            while matches != 0 {
                let candidate = pos + matches.trailing_zeros() as usize;
                if verify_from(haystack, candidate, bytes, mask, 1) {
                    return Some(candidate);
                }
                matches &= matches - 1;
            }

            pos += LANES;
        }

        find_bytewise_forward(bytes, mask, &haystack[end..]).map(|off| off + end)
    }
}
