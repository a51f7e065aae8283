//! Public types for the decoding parameters API
pub use crate::bedrock::DecodingParams;

/// Reasons a set of decoding parameters is rejected, if any.
pub fn validate(params: &DecodingParams) -> Option<&'static str> {
    if !(0.0..=1.0).contains(&params.temperature) {
        return Some("temperature must be between 0 and 1");
    }
    if !(0.0..=1.0).contains(&params.top_p) {
        return Some("top_p must be between 0 and 1");
    }
    if params.max_tokens == 0 {
        return Some("max_tokens must be greater than 0");
    }
    None
}
