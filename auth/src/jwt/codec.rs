use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;

use super::claims::TokenPayload;
use super::errors::InvalidReason;
use super::errors::TokenError;

const SEPARATOR: char = '.';

/// The three raw segments of a compact token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl Segments<'_> {
    /// Bytes covered by the signature: `header.payload`.
    pub fn signing_input(&self) -> String {
        signing_input(self.header, self.payload)
    }
}

/// Encoding and decoding of the compact `header.payload.signature` form.
///
/// Pure functions only; signing lives in [`super::signer::Signer`].
pub struct TokenCodec;

impl TokenCodec {
    /// Encode header and payload into their base64url segments.
    ///
    /// # Errors
    /// * `EncodingFailed` - Header or payload could not be serialized
    pub fn encode<H: Serialize, P: Serialize>(
        header: &H,
        payload: &P,
    ) -> Result<(String, String), TokenError> {
        Ok((Self::encode_segment(header)?, Self::encode_segment(payload)?))
    }

    /// Split a token into its three segments.
    ///
    /// # Errors
    /// * `MalformedToken` - Token does not have exactly three segments
    pub fn decode(token: &str) -> Result<Segments<'_>, InvalidReason> {
        let mut parts = token.split(SEPARATOR);

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature), None) => Ok(Segments {
                header,
                payload,
                signature,
            }),
            _ => Err(InvalidReason::MalformedToken),
        }
    }

    /// Decode a payload segment into claims.
    ///
    /// # Errors
    /// * `MalformedPayload` - Segment is not base64url JSON carrying the required claims
    pub fn decode_payload(segment: &str) -> Result<TokenPayload, InvalidReason> {
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| InvalidReason::MalformedPayload)?;

        serde_json::from_slice(&bytes).map_err(|_| InvalidReason::MalformedPayload)
    }

    /// Join the three segments into a compact token.
    pub fn join(header: &str, payload: &str, signature: &str) -> String {
        format!("{header}{SEPARATOR}{payload}{SEPARATOR}{signature}")
    }

    fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
        let json =
            serde_json::to_vec(value).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

pub(crate) fn signing_input(header: &str, payload: &str) -> String {
    format!("{header}{SEPARATOR}{payload}")
}
