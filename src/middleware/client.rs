//! Client origin extraction
//!
//! The raw address is never stored; only its SHA-256 digest.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::AppError;

/// Network origin of the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOrigin {
    pub ip_address: Option<String>,
}

impl ClientOrigin {
    /// One-way digest of the origin, if one is known
    pub fn ip_hash(&self) -> Option<String> {
        self.ip_address.as_deref().map(hash_origin)
    }
}

fn hash_origin(origin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(origin.as_bytes());
    format!("{:x}", hasher.finalize())
}

// First X-Forwarded-For hop, else the socket peer
#[axum::async_trait]
impl<S> FromRequestParts<S> for ClientOrigin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts.headers
            .get("X-Forwarded-For")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.split(',').next().unwrap_or(s).trim().to_string())
            .filter(|s| !s.is_empty() && s != "unknown");

        let ip_address = forwarded.or_else(|| {
            parts.extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(ClientOrigin { ip_address })
    }
}
