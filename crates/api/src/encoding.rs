//! Base64 transport encoding for attachment payloads.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::AppError;

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 request field, naming the field in the error.
pub fn decode(field: &str, value: &str) -> Result<Vec<u8>, AppError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| AppError::BadRequest(format!("{field} is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_reverses_encode() {
        let bytes = [0u8, 1, 2, 254, 255];
        assert_eq!(decode("encoded_image", &encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn decode_names_the_bad_field() {
        let err = decode("encoded_latents", "not base64!").unwrap_err();
        assert_matches!(err, AppError::BadRequest(msg) if msg.starts_with("encoded_latents"));
    }
}
