// Authentication flow
//
// Cookie-based session login/logout. The login endpoint sets a session
// cookie in the client's jar; subsequent requests use that cookie
// automatically. Credential rejection is a `false` return, not an error.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::session::ControllerSession;

/// Authentication state of a [`ControllerSession`].
///
/// `Unauthenticated -> Authenticating -> {Authenticated, Unauthenticated}`.
/// Any transport failure or credential rejection returns the session to
/// `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

impl ControllerSession {
    /// Authenticate with the controller using username/password.
    ///
    /// Returns `Ok(true)` on success; the session cookie is then stored in
    /// the cookie jar and used for all subsequent requests. Returns
    /// `Ok(false)` when the controller rejects the credentials -- bad
    /// credentials are never an error. Transport-level faults propagate as
    /// [`Error::Transport`].
    ///
    /// The login endpoint differs by platform:
    /// - UniFi OS: `POST /api/auth/login`
    /// - Standalone: `POST /api/login`
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<bool, Error> {
        let url = self
            .base_url()
            .join(self.platform().login_path())
            .map_err(Error::InvalidAddress)?;

        debug!("logging in at {}", url);
        self.auth_state = AuthState::Authenticating;

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = match self.http().post(url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.auth_state = AuthState::Unauthenticated;
                return Err(Error::Transport(e));
            }
        };

        let status = resp.status();
        if status.is_success() {
            // Capture CSRF token from login response — required for all
            // mutating requests through the UniFi OS proxy.
            if let Some(token) = resp
                .headers()
                .get("X-CSRF-Token")
                .or_else(|| resp.headers().get("x-csrf-token"))
                .and_then(|v| v.to_str().ok())
            {
                self.set_csrf_token(token.to_owned());
            }

            self.auth_state = AuthState::Authenticated;
            debug!("login successful");
            return Ok(true);
        }

        self.auth_state = AuthState::Unauthenticated;

        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            debug!(%status, "credentials rejected");
            return Ok(false);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Error::Api {
            message: format!("login failed (HTTP {status}): {}", &body[..body.len().min(200)]),
        })
    }

    /// End the current session, invalidating the credential server-side.
    ///
    /// Returns `Ok(true)` after a held session is torn down. Calling this on
    /// a session that was never authenticated is a designed no-op: it returns
    /// `Ok(false)` without issuing a request.
    ///
    /// Platform-specific logout endpoint:
    /// - UniFi OS: `POST /api/auth/logout`
    /// - Standalone: `POST /api/logout`
    pub async fn logout(&mut self) -> Result<bool, Error> {
        if !self.is_authenticated() {
            debug!("logout requested without an active session");
            return Ok(false);
        }

        let url = self
            .base_url()
            .join(self.platform().logout_path())
            .map_err(Error::InvalidAddress)?;

        debug!("logging out at {}", url);

        let _resp = self
            .apply_csrf(self.http().post(url))
            .send()
            .await
            .map_err(Error::Transport)?;

        self.auth_state = AuthState::Unauthenticated;
        self.clear_csrf_token();

        debug!("logout complete");
        Ok(true)
    }
}
