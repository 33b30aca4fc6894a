// Station management
//
// Client (station) operations via stat/sta (read) and cmd/stamgr (commands).
// Covers listing, blocking, and hotspot guest authorization. All of these
// require an authenticated session; MAC addresses are passed through
// verbatim, without normalization -- callers validate input first.

use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{ClientRecord, OperationResult};
use crate::session::ControllerSession;

impl ControllerSession {
    /// List all currently connected clients (stations).
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, Error> {
        let url = self.site_url("stat/sta");
        debug!("listing connected clients");
        self.get(url).await
    }

    /// Block a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "block-sta", "mac": "..."}`
    pub async fn block_client(&self, mac: &str) -> Result<OperationResult, Error> {
        let url = self.site_url("cmd/stamgr");
        debug!(mac, "blocking client");
        self.command(
            url,
            &json!({
                "cmd": "block-sta",
                "mac": mac,
            }),
        )
        .await
    }

    /// Unblock a client by MAC address.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unblock-sta", "mac": "..."}`
    pub async fn unblock_client(&self, mac: &str) -> Result<OperationResult, Error> {
        let url = self.site_url("cmd/stamgr");
        debug!(mac, "unblocking client");
        self.command(
            url,
            &json!({
                "cmd": "unblock-sta",
                "mac": mac,
            }),
        )
        .await
    }

    /// Authorize a guest client on the hotspot portal for `minutes`.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with
    /// `{"cmd": "authorize-guest", "mac": "...", "minutes": N}`
    pub async fn authorize_guest(&self, mac: &str, minutes: u32) -> Result<OperationResult, Error> {
        let url = self.site_url("cmd/stamgr");
        debug!(mac, minutes, "authorizing guest");
        self.command(
            url,
            &json!({
                "cmd": "authorize-guest",
                "mac": mac,
                "minutes": minutes,
            }),
        )
        .await
    }

    /// Revoke a guest client's authorization.
    ///
    /// `POST /api/s/{site}/cmd/stamgr` with `{"cmd": "unauthorize-guest", "mac": "..."}`
    pub async fn unauthorize_guest(&self, mac: &str) -> Result<OperationResult, Error> {
        let url = self.site_url("cmd/stamgr");
        debug!(mac, "unauthorizing guest");
        self.command(
            url,
            &json!({
                "cmd": "unauthorize-guest",
                "mac": mac,
            }),
        )
        .await
    }
}
