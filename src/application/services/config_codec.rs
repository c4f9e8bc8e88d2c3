use crate::domain::entities::config::Configuration;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;
use tracing::{debug, error};

/// URL-safe alphabet, no padding on output, padding optional on input
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encodes a configuration as a share token.
///
/// The JSON keys are always written as `v`, `a`, `b`, `t` in that order, so a
/// given configuration always yields the same token. The input is not
/// re-validated.
pub fn encode_config(config: &Configuration) -> String {
    match serde_json::to_string(config) {
        Ok(canonical) => TOKEN_ENGINE.encode(canonical.as_bytes()),
        Err(e) => {
            error!("Failed to serialize configuration: {}", e);
            String::new()
        }
    }
}

/// Decodes a share token. Returns `None` for anything that is not base64 of a
/// UTF-8 JSON object holding all four keys.
///
/// Only structure is checked here: run the result through
/// `validate_config` before using it.
pub fn decode_config(token: &str) -> Option<Configuration> {
    // tokens mangled into the standard alphabet still decode
    let normalized = token.trim().replace('+', "-").replace('/', "_");

    let bytes = match TOKEN_ENGINE.decode(normalized.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Rejected token, not base64: {}", e);
            return None;
        }
    };

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("Rejected token, not UTF-8: {}", e);
            return None;
        }
    };

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Rejected token, not JSON: {}", e);
            return None;
        }
    };

    if !value.is_object() {
        debug!("Rejected token, JSON is not an object");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!("Rejected token, incomplete configuration: {}", e);
            None
        }
    }
}
