// ── Runtime polling configuration ──
//
// These types describe *how often* to poll. They never touch disk: the
// binary builds a `PollerConfig` from `wifiscope-config` and hands it in.

use std::time::Duration;

use crate::error::CoreError;
use crate::model::SourceKind;

/// Staleness windows per source plus the scheduler cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// DHCP leases. Clients come and go quickly.
    pub lease_interval: Duration,
    /// WiFi registration table.
    pub registration_interval: Duration,
    /// WiFi radios. Hardware capabilities essentially never change.
    pub radio_interval: Duration,
    /// WiFi interfaces.
    pub interface_interval: Duration,
    /// How often the scheduler wakes up to check for due sources.
    pub cadence: Duration,
    /// Join and publish on every cycle instead of only when a table changed.
    pub recompute_every_cycle: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            lease_interval: Duration::from_secs(60),
            registration_interval: Duration::from_secs(60),
            radio_interval: Duration::from_secs(30 * 60),
            interface_interval: Duration::from_secs(2 * 60),
            cadence: Duration::from_secs(1),
            recompute_every_cycle: false,
        }
    }
}

impl PollerConfig {
    /// Staleness window for one source.
    pub fn interval(&self, source: SourceKind) -> Duration {
        match source {
            SourceKind::Leases => self.lease_interval,
            SourceKind::Registrations => self.registration_interval,
            SourceKind::Radios => self.radio_interval,
            SourceKind::Interfaces => self.interface_interval,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.cadence.is_zero() {
            return Err(CoreError::Config {
                message: "poll cadence must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_router_churn() {
        let cfg = PollerConfig::default();
        assert_eq!(cfg.interval(SourceKind::Leases), Duration::from_secs(60));
        assert_eq!(cfg.interval(SourceKind::Registrations), Duration::from_secs(60));
        assert_eq!(cfg.interval(SourceKind::Interfaces), Duration::from_secs(120));
        assert_eq!(cfg.interval(SourceKind::Radios), Duration::from_secs(1800));
        assert_eq!(cfg.cadence, Duration::from_secs(1));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let cfg = PollerConfig {
            cadence: Duration::ZERO,
            ..PollerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
    }
}
