use thiserror::Error;

/// Top-level error type for the `uniward-api` crate.
///
/// Credential rejection is deliberately absent: [`authenticate`] reports it
/// as `Ok(false)` so callers can branch without string inspection. Everything
/// here is a real fault.
///
/// [`authenticate`]: crate::session::ControllerSession::authenticate
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction ────────────────────────────────────────────────
    /// Malformed controller base address. No session is created.
    #[error("Invalid controller address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// TLS setup failed (client construction, CA certificate loading).
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── Session ─────────────────────────────────────────────────────
    /// Operation attempted without an authenticated session.
    ///
    /// Raised locally -- no request reaches the controller.
    #[error("Not authenticated -- call authenticate() first")]
    NotAuthenticated,

    /// The controller answered 401 mid-session (cookie expired or revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Controller ──────────────────────────────────────────────────
    /// Error reported by the controller (envelope `rc`, HTTP error status,
    /// or the UniFi OS `{"error": {...}}` wrapper).
    #[error("Controller API error: {message}")]
    Api { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::SessionExpired)
    }

    /// Returns `true` if this is a transient transport-level failure.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
