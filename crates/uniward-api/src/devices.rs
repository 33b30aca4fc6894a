// Device listing
//
// Devices via stat/device, including each switch's port table and the MAC
// bindings the controller has learned per port. Ordering is whatever the
// controller reports -- nothing is re-sorted here.

use tracing::debug;

use crate::error::Error;
use crate::models::DeviceRecord;
use crate::session::ControllerSession;

impl ControllerSession {
    /// List all devices with their port tables.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.site_url("stat/device");
        debug!("listing devices");
        self.get(url).await
    }
}
