//! Arbiter configuration.

use crate::error::Error;
use crate::protocol::Protocol;

/// Static arbitration settings.
///
/// Lower priority values take precedence. Every protocol must have a distinct priority; this is
/// checked by [`Config::validate`] and asserted by [`Arbiter::new`](crate::Arbiter::new).
///
/// ```
/// use mws_coex::{Config, Protocol};
///
/// const CONFIG: Config = Config::new()
///     .with_priority(Protocol::Ieee802154, 0)
///     .with_priority(Protocol::Ble, 1)
///     .with_priority_preemption(false);
///
/// assert_eq!(CONFIG.priority(Protocol::Ble), 1);
/// assert!(CONFIG.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    priorities: [u8; Protocol::COUNT],
    priority_preemption: bool,
}

impl Config {
    /// BLE 0, IEEE 802.15.4 1, ANT 2, GENFSK 3, preemption enabled.
    pub const DEFAULT: Config = Config {
        priorities: [0, 1, 2, 3],
        priority_preemption: true,
    };

    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the priority of `protocol`.
    pub const fn with_priority(mut self, protocol: Protocol, priority: u8) -> Self {
        self.priorities[protocol.index()] = priority;
        self
    }

    /// Allow a protocol to take the transceiver from an owner with a lower precedence.
    ///
    /// When disabled, only a forced [`acquire`](crate::Arbiter::acquire) preempts.
    pub const fn with_priority_preemption(mut self, enabled: bool) -> Self {
        self.priority_preemption = enabled;
        self
    }

    pub const fn priority(&self, protocol: Protocol) -> u8 {
        self.priorities[protocol.index()]
    }

    pub const fn priority_preemption(&self) -> bool {
        self.priority_preemption
    }

    /// Check that no two protocols share a priority.
    pub const fn validate(self) -> Result<Self, Error> {
        let mut i = 0;
        while i < Protocol::COUNT {
            let mut j = i + 1;
            while j < Protocol::COUNT {
                if self.priorities[i] == self.priorities[j] {
                    return Err(Error::InvalidParameter);
                }
                j += 1;
            }
            i += 1;
        }
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
