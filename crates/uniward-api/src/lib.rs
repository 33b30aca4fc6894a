// uniward-api: Async Rust client for UniFi controller session management

pub mod auth;
pub mod devices;
pub mod error;
pub mod models;
pub mod platform;
pub mod session;
pub mod stations;
pub mod transport;

pub use auth::AuthState;
pub use error::Error;
pub use models::{ClientRecord, DeviceRecord, MacBinding, Meta, OperationResult, PortRecord, ResultCode};
pub use platform::ControllerPlatform;
pub use session::ControllerSession;
pub use transport::{TlsMode, TransportConfig};
