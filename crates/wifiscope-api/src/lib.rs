// wifiscope-api: Async Rust client for the RouterOS REST API
//
// Covers the four read-only tables the wifiscope poller joins:
// DHCP leases, the WiFi registration table, WiFi radios and WiFi
// interfaces. Everything here is plain transport; caching and joining
// live in `wifiscope-core`.

pub mod error;
pub mod routeros;
pub mod transport;

pub use error::Error;
pub use routeros::RouterOsClient;
pub use routeros::models::{DhcpLease, RegistrationEntry, WifiInterface, WifiRadio};
pub use transport::{TlsMode, TransportConfig};
