// Wire types for the controller's session (legacy) API
//
// All responses arrive wrapped in the `Envelope<T>` envelope. Fields use
// `#[serde(default)]` liberally because the API is inconsistent about field
// presence across firmware versions.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard controller response envelope.
///
/// Every session-API endpoint wraps its payload:
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc` == `"ok"` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Enumerated command outcome, parsed from [`Meta::rc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    /// The controller accepted the command (`rc == "ok"`).
    Ok,
    /// The controller rejected it; [`Meta::msg`] usually says why.
    Error,
}

impl ResultCode {
    fn from_rc(rc: &str) -> Self {
        if rc == "ok" { Self::Ok } else { Self::Error }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Outcome of a mutating operation (block, unblock, authorize, unauthorize).
///
/// A rejected command (`rc != "ok"`) is still an `OperationResult`, not an
/// `Err` -- the controller answered, and callers render the outcome. HTTP and
/// transport failures remain errors. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub result_code: ResultCode,
    pub meta: Meta,
}

impl OperationResult {
    /// `true` when the controller accepted the command.
    pub fn is_ok(&self) -> bool {
        self.result_code == ResultCode::Ok
    }
}

impl From<Meta> for OperationResult {
    fn from(meta: Meta) -> Self {
        Self {
            result_code: ResultCode::from_rc(&meta.rc),
            meta,
        }
    }
}

// ── Client (station) ─────────────────────────────────────────────────

/// Connected client from `stat/sta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    /// User-assigned alias, when one has been set in the controller.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub is_guest: Option<bool>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    #[serde(default)]
    pub authorized: Option<bool>,
    #[serde(default)]
    pub blocked: Option<bool>,
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClientRecord {
    /// Human-facing name: the alias when non-blank, else the hostname,
    /// else the MAC address.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.hostname.as_deref().unwrap_or(&self.mac),
        }
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Device from `stat/device`, with its switch-port table.
///
/// The API can return 100+ fields per device; only the ones needed for the
/// port/MAC listing are modeled. Everything else lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Ports in the controller's reported order.
    #[serde(default)]
    pub port_table: Vec<PortRecord>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One switch port and the stations the controller sees behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortRecord {
    #[serde(default)]
    pub port_idx: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    /// MAC bindings in the controller's reported order.
    #[serde(default)]
    pub mac_table: Vec<MacBinding>,
}

/// A MAC address the controller has learned on a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacBinding {
    pub mac: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub vlan: Option<i32>,
    /// Seconds the station has been up.
    #[serde(default)]
    pub uptime: Option<i64>,
    #[serde(default)]
    pub is_only_station_on_port: Option<bool>,
    /// Seconds since the binding was last refreshed.
    #[serde(default)]
    pub age: Option<i64>,
}
