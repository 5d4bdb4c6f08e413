// Tue Jan 13 2026 - Alex

use crate::pattern::PatternError;

/// Parse an IDA-style signature such as `"48 8B 05 ?? ?? ?? ?? 48"` into a
/// byte sequence and an equal-length mask (`true` = must match).
///
/// A token of one or more `?` is a single wildcard byte. Wildcards before the
/// first exact byte are dropped and trailing wildcards are trimmed, so the
/// result always starts and ends on an exact byte.
pub fn parse_signature(signature: &str) -> Result<(Vec<u8>, Vec<bool>), PatternError> {
    let mut bytes = Vec::with_capacity(signature.len() / 3 + 1);
    let mut mask = Vec::with_capacity(signature.len() / 3 + 1);

    for token in signature.split_ascii_whitespace() {
        if token.bytes().all(|c| c == b'?') {
            if !mask.is_empty() {
                bytes.push(0);
                mask.push(false);
            }
            continue;
        }

        bytes.push(parse_hex_token(token)?);
        mask.push(true);
    }

    while mask.last() == Some(&false) {
        mask.pop();
        bytes.pop();
    }

    if mask.is_empty() {
        return Err(PatternError::EmptySignature);
    }

    Ok((bytes, mask))
}

fn parse_hex_token(token: &str) -> Result<u8, PatternError> {
    let digits = token.as_bytes();
    if digits.len() == 1 && digits[0].is_ascii_hexdigit() {
        return Err(PatternError::MalformedSignature(format!(
            "truncated byte '{}'",
            token
        )));
    }
    if digits.len() != 2 || !digits.iter().all(u8::is_ascii_hexdigit) {
        return Err(PatternError::MalformedSignature(format!(
            "unexpected token '{}'",
            token
        )));
    }
    u8::from_str_radix(token, 16)
        .map_err(|e| PatternError::MalformedSignature(format!("'{}': {}", token, e)))
}

/// Render bytes and mask back into signature text.
pub fn format_signature(bytes: &[u8], mask: &[bool]) -> String {
    bytes
        .iter()
        .zip(mask.iter())
        .map(|(b, &exact)| {
            if exact {
                format!("{:02X}", b)
            } else {
                "??".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
