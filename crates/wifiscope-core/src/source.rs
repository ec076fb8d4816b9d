// ── Fetch seam ──
//
// `RouterApi` is the only way the core talks to a router. The real
// implementation is `RouterOsClient`; tests plug in in-memory fakes.

use std::future::Future;

use wifiscope_api::{DhcpLease, RegistrationEntry, RouterOsClient, WifiInterface, WifiRadio};

use crate::model::SourceKind;

/// The four fetch operations the poller needs.
///
/// An empty `Vec` is a valid answer; only `Err` means the source is
/// unavailable.
pub trait RouterApi: Send + Sync + 'static {
    fn dhcp_leases(
        &self,
    ) -> impl Future<Output = Result<Vec<DhcpLease>, wifiscope_api::Error>> + Send;

    fn registration_table(
        &self,
    ) -> impl Future<Output = Result<Vec<RegistrationEntry>, wifiscope_api::Error>> + Send;

    fn wifi_radios(
        &self,
    ) -> impl Future<Output = Result<Vec<WifiRadio>, wifiscope_api::Error>> + Send;

    fn wifi_interfaces(
        &self,
    ) -> impl Future<Output = Result<Vec<WifiInterface>, wifiscope_api::Error>> + Send;
}

impl RouterApi for RouterOsClient {
    async fn dhcp_leases(&self) -> Result<Vec<DhcpLease>, wifiscope_api::Error> {
        self.list_dhcp_leases().await
    }

    async fn registration_table(&self) -> Result<Vec<RegistrationEntry>, wifiscope_api::Error> {
        RouterOsClient::registration_table(self).await
    }

    async fn wifi_radios(&self) -> Result<Vec<WifiRadio>, wifiscope_api::Error> {
        self.list_wifi_radios().await
    }

    async fn wifi_interfaces(&self) -> Result<Vec<WifiInterface>, wifiscope_api::Error> {
        self.list_wifi_interfaces().await
    }
}

/// A row that can live in a [`SourceTable`](crate::store::SourceTable).
pub trait TableRow: Clone + Send + Sync + 'static {
    /// Which source this row type comes from.
    const SOURCE: SourceKind;

    /// Natural key the table is indexed by.
    fn key(&self) -> &str;
}

impl TableRow for DhcpLease {
    const SOURCE: SourceKind = SourceKind::Leases;

    fn key(&self) -> &str {
        &self.mac_address
    }
}

impl TableRow for RegistrationEntry {
    const SOURCE: SourceKind = SourceKind::Registrations;

    fn key(&self) -> &str {
        &self.mac_address
    }
}

impl TableRow for WifiRadio {
    const SOURCE: SourceKind = SourceKind::Radios;

    fn key(&self) -> &str {
        &self.radio_mac
    }
}

impl TableRow for WifiInterface {
    const SOURCE: SourceKind = SourceKind::Interfaces;

    fn key(&self) -> &str {
        &self.name
    }
}
