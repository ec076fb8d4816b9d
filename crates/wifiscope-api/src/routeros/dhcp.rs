// DHCP server endpoints

use tracing::debug;

use crate::error::Error;
use crate::routeros::client::RouterOsClient;
use crate::routeros::models::DhcpLease;

impl RouterOsClient {
    /// List bound, enabled DHCP leases.
    ///
    /// `GET /rest/ip/dhcp-server/lease?disabled=false&status=bound`
    pub async fn list_dhcp_leases(&self) -> Result<Vec<DhcpLease>, Error> {
        debug!("listing DHCP leases");
        self.get(
            "ip/dhcp-server/lease",
            &[("disabled", "false"), ("status", "bound")],
        )
        .await
    }
}
