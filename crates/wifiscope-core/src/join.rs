// ── Join engine ──
//
// Derives the per-client view from the four source tables. Pure: no I/O,
// no errors, same inputs give the same output. Registrations are the
// spine of the join; a client never appears from lease or radio data
// alone, and is never dropped for missing enrichment.

use std::collections::HashMap;

use wifiscope_api::{DhcpLease, RegistrationEntry, WifiInterface, WifiRadio};

use crate::model::{ClientMap, ClientView};

/// Suffixes RouterOS gives virtual APs layered on a physical radio.
/// Stripped in this order, so `wifi1-virtual1` and `wifi1-virtual` both
/// resolve to `wifi1`.
const VIRTUAL_SUFFIXES: [&str; 2] = ["-virtual1", "-virtual"];

/// The physical interface a (possibly virtual) interface belongs to.
pub fn base_interface_name(interface: &str) -> &str {
    VIRTUAL_SUFFIXES.iter().fold(interface, |name, suffix| {
        name.strip_suffix(suffix).unwrap_or(name)
    })
}

/// Build a complete replacement view from the current tables.
pub fn recompute(
    registrations: &HashMap<String, RegistrationEntry>,
    leases: &HashMap<String, DhcpLease>,
    radios: &HashMap<String, WifiRadio>,
    interfaces: &HashMap<String, WifiInterface>,
) -> ClientMap {
    registrations
        .values()
        .map(|reg| {
            let mut client = ClientView {
                mac_address: reg.mac_address.clone(),
                rssi: reg.signal.clone(),
                ssid: reg.ssid.clone(),
                band: reg.band.clone(),
                comment: reg.comment.clone(),
                ..ClientView::default()
            };

            if let Some(lease) = leases.get(&reg.mac_address) {
                client.active_address.clone_from(&lease.active_address);
                client.host_name.clone_from(&lease.host_name);
            }

            // interface name -> interface MAC -> radio
            let radio = interfaces
                .get(base_interface_name(&reg.interface))
                .and_then(|iface| radios.get(&iface.mac_address));
            if let Some(radio) = radio {
                radio.cap_name().clone_into(&mut client.cap);
            }

            (client.mac_address.clone(), client)
        })
        .collect()
}
