// RouterOS REST row types
//
// RouterOS serializes every property as a string, including numbers and
// booleans, and omits properties that are unset. All fields therefore
// default to the empty string.

use serde::{Deserialize, Serialize};

/// One row of `/ip/dhcp-server/lease`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DhcpLease {
    #[serde(rename = ".id")]
    pub id: String,
    pub address: String,
    pub active_address: String,
    pub active_mac_address: String,
    pub host_name: String,
    pub mac_address: String,
    pub server: String,
    pub status: String,
    pub disabled: String,
    pub dynamic: String,
    pub expires_after: String,
    pub last_seen: String,
    pub comment: String,
}

/// One row of `/interface/wifi/registration-table`: a currently associated station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RegistrationEntry {
    #[serde(rename = ".id")]
    pub id: String,
    pub mac_address: String,
    /// Interface the station associated through, possibly a virtual AP
    /// such as `wifi1-virtual1`.
    pub interface: String,
    pub signal: String,
    pub ssid: String,
    pub band: String,
    pub comment: String,
    pub auth_type: String,
    pub authorized: String,
    pub rx_rate: String,
    pub tx_rate: String,
    pub uptime: String,
    pub bytes: String,
    pub packets: String,
}

/// One row of `/interface/wifi/radio`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WifiRadio {
    #[serde(rename = ".id")]
    pub id: String,
    pub radio_mac: String,
    /// Capability descriptor, `<cap>@<suffix>` (e.g. `ax@5ghz`).
    pub cap: String,
    pub bands: String,
    pub hw_type: String,
    pub hw_caps: String,
    pub interface: String,
    pub current_channels: String,
    pub current_country: String,
    pub ciphers: String,
    pub max_interfaces: String,
    pub rx_chains: String,
    pub tx_chains: String,
}

impl WifiRadio {
    /// The capability name: everything before the first `@`, or the whole
    /// descriptor when there is no `@`.
    pub fn cap_name(&self) -> &str {
        self.cap
            .split_once('@')
            .map_or(self.cap.as_str(), |(name, _)| name)
    }
}

/// One row of `/interface/wifi`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WifiInterface {
    #[serde(rename = ".id")]
    pub id: String,
    pub name: String,
    pub mac_address: String,
    pub master_interface: String,
    #[serde(rename = "configuration.ssid")]
    pub configuration_ssid: String,
    #[serde(rename = "channel.band")]
    pub channel_band: String,
    #[serde(rename = "channel.frequency")]
    pub channel_frequency: String,
    pub disabled: String,
    pub running: String,
    pub inactive: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cap_name_strips_suffix() {
        let radio = WifiRadio {
            cap: "ac@2ghz-n".into(),
            ..WifiRadio::default()
        };
        assert_eq!(radio.cap_name(), "ac");
    }

    #[test]
    fn cap_name_without_separator_is_unchanged() {
        let radio = WifiRadio {
            cap: "ax".into(),
            ..WifiRadio::default()
        };
        assert_eq!(radio.cap_name(), "ax");

        let empty = WifiRadio::default();
        assert_eq!(empty.cap_name(), "");
    }

    #[test]
    fn lease_decodes_kebab_case_and_missing_fields() {
        let lease: DhcpLease = serde_json::from_str(
            r#"{
                ".id": "*1A",
                "active-address": "10.0.0.5",
                "host-name": "phone",
                "mac-address": "AA:BB:CC:DD:EE:FF",
                "status": "bound"
            }"#,
        )
        .unwrap();

        assert_eq!(lease.id, "*1A");
        assert_eq!(lease.active_address, "10.0.0.5");
        assert_eq!(lease.host_name, "phone");
        assert_eq!(lease.mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(lease.comment, "");
    }

    #[test]
    fn interface_decodes_dotted_properties() {
        let iface: WifiInterface = serde_json::from_str(
            r#"{
                "name": "wifi1",
                "mac-address": "48:A9:8A:00:00:01",
                "configuration.ssid": "Home",
                "channel.band": "5ghz-ax"
            }"#,
        )
        .unwrap();

        assert_eq!(iface.name, "wifi1");
        assert_eq!(iface.mac_address, "48:A9:8A:00:00:01");
        assert_eq!(iface.configuration_ssid, "Home");
        assert_eq!(iface.channel_band, "5ghz-ax");
    }
}
