//! HMAC-SHA256 request signing for Binance signed endpoints.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid HMAC key: {0}")]
    InvalidKey(String),
}

/// Signs canonical query strings with the API secret.
///
/// The MAC is keyed once; every signature starts from a clone of it.
#[derive(Clone)]
pub struct RequestSigner {
    keyed: HmacSha256,
}

impl RequestSigner {
    pub fn new(api_secret: &str) -> Result<Self, SigningError> {
        let keyed = HmacSha256::new_from_slice(api_secret.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        Ok(Self { keyed })
    }

    /// Lower-case hex HMAC-SHA256 of `query`
    pub fn sign(&self, query: &str) -> String {
        let mut mac = self.keyed.clone();
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// `query&signature=<hex>`
    pub fn signed_query(&self, query: &str) -> String {
        format!("{}&signature={}", query, self.sign(query))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}
