//! Rate limiting building blocks for tower-governor.
//!
//! All public routes are limited per client IP; admin routes sit behind a
//! session and are not rate limited. The governor layers themselves are
//! built in server.rs.

use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tower_governor::{key_extractor::KeyExtractor, GovernorError};
use tracing::warn;

/// Login attempts per minute per IP (strict - prevents brute force)
pub const LOGIN_PER_MINUTE: u32 = 10;

/// Search and popularity requests per minute per IP
pub const SEARCH_PER_MINUTE: u32 = 60;

/// Usage-event submissions per minute per IP
pub const EVENTS_PER_MINUTE: u32 = 120;

/// Extracts IP address from ConnectInfo for IP-based rate limiting
#[derive(Clone)]
pub struct IpKeyExtractor;

impl KeyExtractor for IpKeyExtractor {
    type Key = SocketAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Logs rate limit violations and maps them to plain status responses.
pub fn rate_limit_error_handler(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { .. } => {
            warn!("Rate limit exceeded");
            StatusCode::TOO_MANY_REQUESTS.into_response()
        }
        _ => {
            warn!("Rate limiting error: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
