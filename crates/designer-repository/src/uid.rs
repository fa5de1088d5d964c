//! Opaque unique identifiers
//!
//! An identifier is the absolute URI of an asset or directory, encoded with
//! URL-safe base64 (no padding) so it can travel through client-visible
//! contexts unchanged.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use url::Url;

/// Encode an absolute URI string as an identifier.
pub fn encode(uri: &str) -> String {
    URL_SAFE_NO_PAD.encode(uri.as_bytes())
}

/// Decode an identifier back to its URI string.
///
/// Decoding is tolerant: anything that is not URL-safe base64 of an
/// absolute URI is returned unchanged, so raw URIs and locations pass
/// through.
pub fn decode(id: &str) -> String {
    try_decode(id).unwrap_or_else(|| id.to_string())
}

fn try_decode(id: &str) -> Option<String> {
    if id.is_empty() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(id.trim_end_matches('=')).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    Url::parse(&decoded).ok()?;
    Some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_padding_or_unsafe_characters() {
        let id = encode("file:///tmp/designer-repo/processes/a.bpmn");
        assert!(!id.contains(&['=', '+', '/'][..]));
    }

    #[test]
    fn decodes_encoded_uri() {
        let uri = "file:///tmp/designer-repo/processes/a.bpmn";
        assert_eq!(decode(&encode(uri)), uri);
    }

    #[test]
    fn accepts_padded_input() {
        let uri = "mem:///a";
        let padded = base64::engine::general_purpose::URL_SAFE.encode(uri);
        assert!(padded.ends_with('='));
        assert_eq!(decode(&padded), uri);
    }

    #[test]
    fn raw_values_pass_through() {
        for raw in [
            "file:///tmp/designer-repo/a.bpmn",
            "/processes/a.bpmn",
            "processes",
            "abcd",
            "",
        ] {
            assert_eq!(decode(raw), raw);
        }
    }
}
