//! Protocol identifiers and the handler interface protocol stacks implement.

use crate::error::{Error, RetVal};

/// A protocol stack sharing the transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Protocol {
    /// Bluetooth Low Energy
    Ble = 0,
    /// IEEE 802.15.4 (Thread, Zigbee)
    Ieee802154 = 1,
    /// ANT
    Ant = 2,
    /// Proprietary generic FSK
    Genfsk = 3,
}

impl Protocol {
    /// Number of protocol identifiers.
    pub const COUNT: usize = 4;

    /// All protocol identifiers, in raw value order.
    pub const ALL: [Protocol; Self::COUNT] = [Protocol::Ble, Protocol::Ieee802154, Protocol::Ant, Protocol::Genfsk];

    /// Raw value of the "no protocol" sentinel.
    pub const NONE_RAW: u8 = Self::COUNT as u8;

    /// Convert a raw identifier.
    ///
    /// The `None` sentinel and out of range values are rejected with [`Error::InvalidParameter`].
    pub const fn from_raw(raw: u8) -> Result<Protocol, Error> {
        match raw {
            0 => Ok(Protocol::Ble),
            1 => Ok(Protocol::Ieee802154),
            2 => Ok(Protocol::Ant),
            3 => Ok(Protocol::Genfsk),
            _ => Err(Error::InvalidParameter),
        }
    }

    /// The raw identifier.
    pub const fn to_raw(self) -> u8 {
        self as u8
    }

    /// Raw identifier of an optional protocol, mapping `None` to [`Protocol::NONE_RAW`].
    pub const fn option_to_raw(protocol: Option<Protocol>) -> u8 {
        match protocol {
            Some(p) => p.to_raw(),
            None => Self::NONE_RAW,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Protocol {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Protocol::from_raw(value)
    }
}

impl From<Protocol> for u8 {
    fn from(value: Protocol) -> Self {
        value.to_raw()
    }
}

/// An event delivered to a protocol [`Handler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// The protocol has been registered. Delivered once; the reply is ignored.
    Init,
    /// The transceiver is free. A protocol may acquire it from within this event.
    Idle,
    /// The protocol now owns the transceiver. The reply is ignored.
    Active,
    /// The protocol released the transceiver. The reply is ignored.
    Release,
    /// The protocol must stop using the transceiver. A non-zero reply refuses the abort and the
    /// protocol keeps ownership.
    Abort,
    /// Query how long the protocol will leave the transceiver unused, in microseconds.
    GetInactivityDuration,
}

/// The event handler of a protocol stack.
///
/// Handlers run synchronously inside the arbiter's critical section, so they must be short. They
/// may call back into the arbiter.
pub trait Handler: Sync {
    /// Handle `event`, see [`RetVal`] for the meaning of the reply.
    fn on_event(&self, event: Event) -> RetVal;
}

impl<F> Handler for F
where
    F: Fn(Event) -> RetVal + Sync,
{
    fn on_event(&self, event: Event) -> RetVal {
        self(event)
    }
}
