//! JSON serialization for analysis results.

use crate::result::Analysis;

/// Serialize an Analysis to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for Analysis;
/// non-finite bounds are written as `null`).
pub fn to_json(analysis: &Analysis) -> Result<String, serde_json::Error> {
    serde_json::to_string(analysis)
}

/// Serialize an Analysis to a pretty-printed JSON string.
///
/// # Errors
///
/// See [`to_json`].
pub fn to_json_pretty(analysis: &Analysis) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(analysis)
}
