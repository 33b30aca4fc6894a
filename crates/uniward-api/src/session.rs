// Controller session transport
//
// Wraps `reqwest::Client` with controller-specific URL construction,
// envelope unwrapping, and platform-aware path prefixing. The management
// operations (stations, devices) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::{Arc, RwLock};

use reqwest::cookie::Jar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthState;
use crate::error::Error;
use crate::models::{Envelope, OperationResult};
use crate::platform::ControllerPlatform;
use crate::transport::TransportConfig;

/// UniFi OS wraps some errors as `{"error":{"code":N,"message":"..."}}` with HTTP 200.
#[derive(serde::Deserialize)]
struct OsError {
    error: Option<OsErrorInner>,
}

#[derive(serde::Deserialize)]
struct OsErrorInner {
    code: u16,
    message: Option<String>,
}

/// One authenticated session against a UniFi controller.
///
/// Owns the connection parameters (base address, target site), the transport
/// (HTTP client + cookie jar holding the session credential), and the
/// authentication state. Create one per connect action; management
/// operations borrow it and require [`authenticate`] to have succeeded.
///
/// State transitions take `&mut self`, operations take `&self`; there is no
/// internal locking beyond the CSRF slot, so callers serialize use of one
/// session.
///
/// [`authenticate`]: ControllerSession::authenticate
pub struct ControllerSession {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    platform: ControllerPlatform,
    pub(crate) auth_state: AuthState,
    /// CSRF token for UniFi OS. Required on all mutating requests through
    /// the `/proxy/network/` path. Captured from login response headers and
    /// rotated via `X-Updated-CSRF-Token`.
    csrf_token: RwLock<Option<String>>,
    /// Cookie jar holding the session cookie after login.
    cookie_jar: Option<Arc<Jar>>,
}

impl ControllerSession {
    /// Create a session for the controller at `base_address`.
    ///
    /// Fails only on a malformed address. `site` selects the controller site;
    /// `None` or an empty string means the default site. Assumes a standalone
    /// (classic) controller -- use [`with_transport`](Self::with_transport)
    /// for UniFi OS devices or custom TLS settings.
    ///
    /// The default transport accepts invalid certificates because controllers
    /// ship self-signed; see [`TlsMode`](crate::transport::TlsMode) to opt
    /// back into verification.
    pub fn connect(base_address: &str, site: Option<&str>) -> Result<Self, Error> {
        let base_url = Url::parse(base_address).map_err(Error::InvalidAddress)?;
        Self::with_transport(
            base_url,
            site,
            ControllerPlatform::ClassicController,
            &TransportConfig::default(),
        )
    }

    /// Create a session from an already-parsed URL and explicit transport.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url` should
    /// be the controller root (e.g. `https://192.168.1.1` for UniFi OS or
    /// `https://controller:8443` for standalone).
    pub fn with_transport(
        base_url: Url,
        site: Option<&str>,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            site: normalize_site(site),
            platform,
            auth_state: AuthState::Unauthenticated,
            csrf_token: RwLock::new(None),
            cookie_jar,
        })
    }

    /// Create a session with a pre-built `reqwest::Client`.
    ///
    /// Use this when the client is already configured (e.g. test fixtures
    /// talking to a mock controller).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            platform,
            auth_state: AuthState::Unauthenticated,
            csrf_token: RwLock::new(None),
            cookie_jar: None,
        }
    }

    /// The current site identifier.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The underlying HTTP client (for the auth flow, which bypasses the
    /// envelope helpers).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The controller platform this session targets.
    pub fn platform(&self) -> ControllerPlatform {
        self.platform
    }

    /// Whether [`authenticate`](Self::authenticate) has succeeded and the
    /// session credential is still held.
    pub fn is_authenticated(&self) -> bool {
        self.auth_state == AuthState::Authenticated
    }

    // ── CSRF token management ─────────────────────────────────────────

    /// Store a CSRF token (captured from login response headers).
    pub(crate) fn set_csrf_token(&self, token: String) {
        debug!("storing CSRF token");
        *self.csrf_token.write().expect("CSRF lock poisoned") = Some(token);
    }

    /// Drop any stored CSRF token (on logout).
    pub(crate) fn clear_csrf_token(&self) {
        *self.csrf_token.write().expect("CSRF lock poisoned") = None;
    }

    /// Update CSRF token if the response contains a rotated value.
    fn update_csrf_from_response(&self, headers: &reqwest::header::HeaderMap) {
        // UniFi OS may rotate tokens — prefer the updated one.
        let new_token = headers
            .get("X-Updated-CSRF-Token")
            .or_else(|| headers.get("x-csrf-token"))
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(token) = new_token {
            trace!("CSRF token rotated");
            *self.csrf_token.write().expect("CSRF lock poisoned") = Some(token);
        }
    }

    /// Apply the stored CSRF token to a request builder.
    pub(crate) fn apply_csrf(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.csrf_token.read().expect("CSRF lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.header("X-CSRF-Token", token),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    ///
    /// All management endpoints are site-scoped: stat/sta, cmd/stamgr, etc.
    pub(crate) fn site_url(&self, path: &str) -> Url {
        let prefix = self.platform.legacy_prefix().trim_end_matches('/');
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}{prefix}/api/s/{}/{path}", self.site);
        Url::parse(&full).expect("invalid site URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope, returning `data`.
    ///
    /// Fails with [`Error::NotAuthenticated`] before issuing any request if
    /// the session isn't authenticated. An envelope with `rc != "ok"` aborts
    /// the whole fetch.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        self.require_auth()?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let envelope: Envelope<T> = self.read_envelope(resp).await?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok(envelope.data),
            _ => Err(Error::Api {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            }),
        }
    }

    /// Send a command (POST with JSON body) and return the controller's
    /// verdict as an [`OperationResult`].
    ///
    /// Fails with [`Error::NotAuthenticated`] before issuing any request if
    /// the session isn't authenticated. A rejected command (`rc != "ok"`)
    /// is reported through the result code, not as an error.
    pub(crate) async fn command(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<OperationResult, Error> {
        self.require_auth()?;
        debug!("POST {}", url);

        let builder = self.apply_csrf(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;
        let envelope: Envelope<serde_json::Value> = self.read_envelope(resp).await?;

        Ok(OperationResult::from(envelope.meta))
    }

    /// Guard for operations that need a live session.
    fn require_auth(&self) -> Result<(), Error> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    /// Parse a response into the `{ meta, data }` envelope.
    ///
    /// Handles HTTP-level failures and the UniFi OS error shape
    /// `{"error": {"code": 403, "message": "..."}}` (returned with HTTP 200).
    async fn read_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let status = resp.status();

        // Capture any CSRF token rotation before consuming the response.
        self.update_csrf_from_response(resp.headers());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Api {
                message: "insufficient permissions (HTTP 403)".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: format!("HTTP {status}: {}", &body[..body.len().min(200)]),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if let Ok(wrapper) = serde_json::from_str::<OsError>(&body) {
            if let Some(err) = wrapper.error {
                let msg = err.message.unwrap_or_default();
                return Err(if err.code == 401 {
                    Error::SessionExpired
                } else {
                    Error::Api {
                        message: format!("UniFi OS error {}: {msg}", err.code),
                    }
                });
            }
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}

fn normalize_site(site: Option<&str>) -> String {
    match site {
        Some(s) if !s.trim().is_empty() => s.to_owned(),
        _ => "default".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_site_means_default() {
        assert_eq!(normalize_site(None), "default");
        assert_eq!(normalize_site(Some("")), "default");
        assert_eq!(normalize_site(Some("  ")), "default");
        assert_eq!(normalize_site(Some("branch-office")), "branch-office");
    }

    #[test]
    fn site_url_applies_platform_prefix() {
        let session = ControllerSession::with_client(
            reqwest::Client::new(),
            Url::parse("https://gateway.local").expect("valid url"),
            "default".into(),
            ControllerPlatform::UnifiOs,
        );
        assert_eq!(
            session.site_url("cmd/stamgr").as_str(),
            "https://gateway.local/proxy/network/api/s/default/cmd/stamgr"
        );

        let session = ControllerSession::with_client(
            reqwest::Client::new(),
            Url::parse("https://controller:8443").expect("valid url"),
            "default".into(),
            ControllerPlatform::ClassicController,
        );
        assert_eq!(
            session.site_url("stat/sta").as_str(),
            "https://controller:8443/api/s/default/stat/sta"
        );
    }
}
