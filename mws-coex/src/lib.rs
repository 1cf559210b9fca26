//! Mobile Wireless Standard (MWS) coexistence arbiter.
//!
//! Several protocol stacks (BLE, IEEE 802.15.4, ANT and proprietary GENFSK) share one radio
//! transceiver. The [`Arbiter`] grants it to one stack at a time using static priorities, with
//! optional preemption, and tells the other stacks when it becomes free.
//!
//! Each stack registers a [`Handler`] that receives [`Event`]s synchronously from within the
//! arbiter calls:
//!
//! ```
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use mws_coex::{Arbiter, Config, Error, Event, Protocol, RetVal};
//!
//! let ble = |_: Event| RetVal::SUCCESS;
//! let thread = |event: Event| match event {
//!     Event::GetInactivityDuration => RetVal::new(10_000),
//!     _ => RetVal::SUCCESS,
//! };
//!
//! let mws = Arbiter::<NoopRawMutex>::new(Config::new().with_priority_preemption(false));
//! mws.register(Protocol::Ble, &ble)?;
//! mws.register(Protocol::Ieee802154, &thread)?;
//!
//! mws.acquire(Protocol::Ieee802154, false)?;
//! // Without preemption, BLE has to wait for 802.15.4 to finish.
//! assert_eq!(mws.acquire(Protocol::Ble, false), Err(Error::Denied));
//! // A forced request always preempts.
//! mws.acquire(Protocol::Ble, true)?;
//! assert_eq!(mws.get_active_protocol(), Some(Protocol::Ble));
//! assert_eq!(mws.get_inactivity_duration(Protocol::Ble), 10_000);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Critical sections
//!
//! The arbiter state is guarded by an [`embassy_sync`] blocking mutex. Use
//! [`CriticalSectionRawMutex`](raw::CriticalSectionRawMutex) when protocol stacks call the
//! arbiter from interrupt handlers. The `critical-section-impl` feature provides the single-core
//! Cortex-M critical section implementation.
#![no_std]

#[cfg(feature = "critical-section-impl")]
use cortex_m as _;
/// Re-export of the raw mutex types the [`Arbiter`] can be instantiated with.
pub use embassy_sync::blocking_mutex::raw;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod arbiter;
mod chain;
mod config;
mod error;
mod protocol;
mod registry;

pub use arbiter::*;
pub use config::*;
pub use error::*;
pub use protocol::*;
