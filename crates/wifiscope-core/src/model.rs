// ── Domain model ──
//
// The joined per-client view and the identifiers of the four sources.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// The four RouterOS datasets the poller keeps tables for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    /// `/ip/dhcp-server/lease`, keyed by client MAC.
    Leases,
    /// `/interface/wifi/registration-table`, keyed by client MAC.
    Registrations,
    /// `/interface/wifi/radio`, keyed by radio MAC.
    Radios,
    /// `/interface/wifi`, keyed by interface name.
    Interfaces,
}

/// One associated WiFi client, enriched with lease and radio data.
///
/// Every field is a string. Enrichment that could not be resolved is an
/// empty string, never omitted, so consumers can rely on the shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    pub active_address: String,
    pub host_name: String,
    pub mac_address: String,
    pub rssi: String,
    pub ssid: String,
    pub cap: String,
    pub band: String,
    pub comment: String,
}

/// The published view: client MAC → [`ClientView`].
///
/// Ordered so serialized snapshots are stable across identical joins.
pub type ClientMap = BTreeMap<String, ClientView>;
