use tracing::debug;
use url::Url;

use crate::error::Error;

/// The platform type of the UniFi controller.
///
/// Determines the legacy path prefix and the login/logout paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- port 443, `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for session-API endpoints.
    pub fn legacy_prefix(&self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(&self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// The logout endpoint path.
    pub fn logout_path(&self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/logout",
            Self::ClassicController => "/api/logout",
        }
    }

    /// Auto-detect the controller platform by probing login endpoints.
    ///
    /// Tries the UniFi OS endpoint first (`/api/auth/login`). UniFi OS
    /// answers at that path (even with 401/405); standalone controllers
    /// don't have it at all, so a 404 or connection failure falls through
    /// to the standalone probe.
    pub async fn detect(base_url: &Url) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(Error::Transport)?;

        let unifi_os_url = base_url.join("/api/auth/login").map_err(Error::InvalidAddress)?;
        debug!("probing UniFi OS at {}", unifi_os_url);

        if let Ok(resp) = http.get(unifi_os_url).send().await {
            if resp.status() != reqwest::StatusCode::NOT_FOUND {
                debug!("detected UniFi OS platform");
                return Ok(Self::UnifiOs);
            }
        }
        // Connection error -- might be standalone on a different port

        let standalone_url = base_url.join("/api/login").map_err(Error::InvalidAddress)?;
        debug!("probing standalone at {}", standalone_url);

        match http.get(standalone_url).send().await {
            Ok(_) => {
                debug!("detected standalone (classic) controller");
                Ok(Self::ClassicController)
            }
            Err(e) => Err(Error::Transport(e)),
        }
    }
}
