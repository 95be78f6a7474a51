//! The single error kind this crate can return.

/// A byte span that does not conform to the accepted floating-point grammar.
///
/// There is exactly one failure kind: every grammar violation — an empty
/// input, a lone sign, a duplicated radix point, trailing garbage, a missing
/// hexadecimal binary exponent, and so on — maps to it. The offending input
/// is echoed back (as ISO-8859-1 text) for diagnostics, up to a bound; longer
/// inputs report only their length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed float literal: {description}")]
pub struct Error {
    description: String,
}

/// Inputs longer than this are too long to usefully echo back; only their
/// length is reported instead.
const MAX_ECHO_LEN: usize = 1024;

impl Error {
    pub(crate) fn malformed(bytes: &[u8]) -> Self {
        let description = if bytes.len() <= MAX_ECHO_LEN {
            // Every byte in `bytes` is meaningful as ISO-8859-1: code points
            // 0..=255 map 1:1 onto Latin-1 bytes, so this can't panic or lose
            // information even when the input itself was rejected for
            // containing non-ASCII bytes.
            let text: String = bytes.iter().map(|&b| b as char).collect();
            format!("{text:?}")
        } else {
            format!("<{} bytes>", bytes.len())
        };
        Error { description }
    }
}
