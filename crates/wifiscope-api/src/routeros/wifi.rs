// WiFi endpoints (RouterOS v7 `wifi` package)

use tracing::debug;

use crate::error::Error;
use crate::routeros::client::RouterOsClient;
use crate::routeros::models::{RegistrationEntry, WifiInterface, WifiRadio};

impl RouterOsClient {
    /// List currently associated stations.
    ///
    /// `GET /rest/interface/wifi/registration-table`
    pub async fn registration_table(&self) -> Result<Vec<RegistrationEntry>, Error> {
        debug!("fetching wifi registration table");
        self.get("interface/wifi/registration-table", &[]).await
    }

    /// List radios and their capability descriptors.
    ///
    /// `GET /rest/interface/wifi/radio`
    pub async fn list_wifi_radios(&self) -> Result<Vec<WifiRadio>, Error> {
        debug!("listing wifi radios");
        self.get("interface/wifi/radio", &[]).await
    }

    /// List physical and virtual WiFi interfaces.
    ///
    /// `GET /rest/interface/wifi`
    pub async fn list_wifi_interfaces(&self) -> Result<Vec<WifiInterface>, Error> {
        debug!("listing wifi interfaces");
        self.get("interface/wifi", &[]).await
    }
}
