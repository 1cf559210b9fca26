//! Transceiver ownership arbitration.
//!
//! The [`Arbiter`] grants the transceiver to one protocol at a time. A protocol is either idle or
//! active:
//!
//! - idle → active: [`Arbiter::acquire`] while nobody owns the transceiver, or when preempting the
//!   owner;
//! - active → active: nested [`Arbiter::acquire`] by the owner, counted by the hold count;
//! - active → idle: [`Arbiter::release`] draining the hold count, or [`Arbiter::abort`].
//!
//! Every operation runs inside the lock of the user-selected [`RawMutex`]. Handlers are called
//! with the lock held and may re-enter the arbiter.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::chain::PriorityChain;
use crate::config::Config;
use crate::error::Error;
use crate::protocol::{Event, Handler, Protocol};
use crate::registry::Registry;

/// Inactivity duration reported when no other protocol is registered.
pub const INACTIVITY_UNBOUNDED: u32 = u32::MAX;

/// Shared transceiver arbiter.
///
/// Usually placed in a `static` so that protocol stacks running in different interrupt handlers
/// can reach it:
///
/// ```
/// use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
/// use mws_coex::{Arbiter, Config, Event, Protocol, RetVal};
///
/// static MWS: Arbiter<'static, CriticalSectionRawMutex> = Arbiter::new(Config::new());
///
/// static BLE: fn(Event) -> RetVal = |event| match event {
///     Event::GetInactivityDuration => RetVal::new(1_250),
///     _ => RetVal::SUCCESS,
/// };
///
/// MWS.register(Protocol::Ble, &BLE).unwrap();
/// MWS.acquire(Protocol::Ble, false).unwrap();
/// assert_eq!(MWS.get_active_protocol(), Some(Protocol::Ble));
/// MWS.release(Protocol::Ble).unwrap();
/// assert_eq!(MWS.get_active_protocol(), None);
/// ```
pub struct Arbiter<'d, M: RawMutex> {
    state: Mutex<M, State<'d>>,
}

struct State<'d> {
    registry: Registry<'d>,
    chain: PriorityChain,
    active: Cell<Option<Protocol>>,
    hold_count: Cell<u32>,
}

impl<'d, M: RawMutex> Arbiter<'d, M> {
    /// Create an arbiter with no registered protocol.
    ///
    /// # Panics
    ///
    /// Panics if two protocols share a priority in `config`. In a `const` or `static` context
    /// this is a compile error.
    pub const fn new(config: Config) -> Self {
        if config.validate().is_err() {
            panic!("MWS protocols must have distinct priorities");
        }
        Self {
            state: Mutex::new(State::new(config)),
        }
    }

    /// Create an arbiter, returning [`Error::InvalidParameter`] if two protocols share a
    /// priority in `config`.
    pub fn try_new(config: Config) -> Result<Self, Error> {
        let config = config.validate()?;
        Ok(Self {
            state: Mutex::new(State::new(config)),
        })
    }

    /// Register the handler of `protocol`.
    ///
    /// The first registration links the protocol into the priority chain and delivers
    /// [`Event::Init`] before returning. Later registrations only replace the handler.
    pub fn register(&self, protocol: Protocol, handler: &'d dyn Handler) -> Result<(), Error> {
        self.state.lock(|s| {
            if s.registry.store(protocol, handler) {
                let priority = s.registry.priority(protocol);
                s.chain.insert(protocol, priority, |p| s.registry.priority(p));
                info!("mws: registered {:?} with priority {}", protocol, priority);
                let _ = handler.on_event(Event::Init);
            } else {
                debug!("mws: replaced handler of {:?}", protocol);
            }
            Ok(())
        })
    }

    /// The handler of `protocol`, if registered.
    pub fn lookup(&self, protocol: Protocol) -> Option<&'d dyn Handler> {
        self.state.lock(|s| s.registry.lookup(protocol))
    }

    pub fn is_registered(&self, protocol: Protocol) -> bool {
        self.state.lock(|s| s.registry.is_registered(protocol))
    }

    /// The configured priority of `protocol`, whether registered or not.
    pub fn priority(&self, protocol: Protocol) -> u8 {
        self.state.lock(|s| s.registry.priority(protocol))
    }

    /// Request the transceiver for `protocol`.
    ///
    /// Succeeds if the transceiver is free or already owned by `protocol` (nested hold). If
    /// another protocol owns it, the owner is aborted when `force` is set, or when priority
    /// preemption is enabled and the owner has a lower precedence. Otherwise, or if the owner
    /// refuses the abort, returns [`Error::Denied`].
    ///
    /// Unregistered protocols get [`Error::InvalidParameter`].
    pub fn acquire(&self, protocol: Protocol, force: bool) -> Result<(), Error> {
        self.state.lock(|s| {
            let Some(handler) = s.registry.lookup(protocol) else {
                return Err(Error::InvalidParameter);
            };

            // An `Abort` handler may release the transceiver and let another protocol take it
            // during the idle broadcast, so the owner is checked again after every abort.
            for _ in 0..=Protocol::COUNT {
                match s.active.get() {
                    None => {
                        s.activate(protocol, handler);
                        return Ok(());
                    }
                    Some(active) if active == protocol => {
                        let Some(hold_count) = s.hold_count.get().checked_add(1) else {
                            warn!("mws: {:?} hold count saturated", protocol);
                            return Err(Error::Denied);
                        };
                        s.hold_count.set(hold_count);
                        trace!("mws: {:?} hold count {}", protocol, hold_count);
                        return Ok(());
                    }
                    Some(active) => {
                        if !force && !s.preempts(protocol, active) {
                            trace!("mws: {:?} denied, {:?} is active", protocol, active);
                            return Err(Error::Denied);
                        }
                        if s.abort().is_err() {
                            return Err(Error::Denied);
                        }
                        debug!("mws: {:?} preempted {:?} (force: {})", protocol, active, force);
                    }
                }
            }

            warn!("mws: {:?} gave up preempting", protocol);
            Err(Error::Denied)
        })
    }

    /// Release one hold of the transceiver.
    ///
    /// When the last hold is released the owner gets [`Event::Release`] and the other protocols
    /// are notified with [`signal_idle`](Self::signal_idle), whose result is returned. Releasing
    /// a free transceiver only notifies the other protocols. Releasing a transceiver owned by
    /// another protocol returns [`Error::Denied`].
    pub fn release(&self, protocol: Protocol) -> Result<(), Error> {
        self.state.lock(|s| match s.active.get() {
            None => s.signal_idle(protocol),
            Some(active) if active != protocol => {
                trace!("mws: {:?} cannot release, {:?} is active", protocol, active);
                Err(Error::Denied)
            }
            Some(_) => {
                let remaining = s.hold_count.get() - 1;
                s.hold_count.set(remaining);
                if remaining > 0 {
                    trace!("mws: {:?} hold count {}", protocol, remaining);
                    return Ok(());
                }

                s.active.set(None);
                debug!("mws: {:?} released the transceiver", protocol);
                let handler = unwrap!(s.registry.lookup(protocol));
                let _ = handler.on_event(Event::Release);
                s.signal_idle(protocol)
            }
        })
    }

    /// Take the transceiver away from its owner.
    ///
    /// Returns [`Error::Failed`] and leaves the owner in place if it refuses
    /// [`Event::Abort`]. Does nothing if the transceiver is free.
    pub fn abort(&self) -> Result<(), Error> {
        self.state.lock(|s| s.abort())
    }

    /// Deliver [`Event::Idle`] to every registered protocol except `protocol`, in priority order.
    ///
    /// The broadcast stops as soon as a protocol owns the transceiver, typically because an
    /// `Idle` handler acquired it. Refusals are reported as [`Error::Failed`] once the broadcast
    /// is complete.
    pub fn signal_idle(&self, protocol: Protocol) -> Result<(), Error> {
        self.state.lock(|s| s.signal_idle(protocol))
    }

    /// The shortest inactivity duration reported by the protocols other than `protocol`, in
    /// microseconds, or [`INACTIVITY_UNBOUNDED`] if there are none.
    pub fn get_inactivity_duration(&self, protocol: Protocol) -> u32 {
        self.state.lock(|s| {
            Protocol::ALL
                .into_iter()
                .filter(|&p| p != protocol)
                .filter_map(|p| s.registry.lookup(p))
                .map(|handler| handler.on_event(Event::GetInactivityDuration).get())
                .min()
                .unwrap_or(INACTIVITY_UNBOUNDED)
        })
    }

    /// The protocol owning the transceiver.
    pub fn get_active_protocol(&self) -> Option<Protocol> {
        self.state.lock(|s| s.active.get())
    }

    /// Number of nested acquisitions held by the owner, zero when the transceiver is free.
    pub fn hold_count(&self) -> u32 {
        self.state.lock(|s| s.hold_count.get())
    }

    pub fn config(&self) -> Config {
        self.state.lock(|s| *s.registry.config())
    }

    /// The registered protocols, from the highest to the lowest priority.
    pub fn registered(&self) -> impl Iterator<Item = Protocol> {
        let mut order = [None; Protocol::COUNT];
        self.state.lock(|s| {
            for (slot, protocol) in order.iter_mut().zip(s.chain.iter()) {
                *slot = Some(protocol);
            }
        });
        order.into_iter().flatten()
    }
}

impl<'d> State<'d> {
    const fn new(config: Config) -> Self {
        Self {
            registry: Registry::new(config),
            chain: PriorityChain::new(),
            active: Cell::new(None),
            hold_count: Cell::new(0),
        }
    }

    fn preempts(&self, requester: Protocol, active: Protocol) -> bool {
        self.registry.config().priority_preemption()
            && self.registry.priority(active) > self.registry.priority(requester)
    }

    fn activate(&self, protocol: Protocol, handler: &dyn Handler) {
        self.active.set(Some(protocol));
        self.hold_count.set(1);
        debug!("mws: {:?} is active", protocol);
        let _ = handler.on_event(Event::Active);
    }

    fn abort(&self) -> Result<(), Error> {
        let Some(active) = self.active.get() else {
            return Ok(());
        };

        let handler = unwrap!(self.registry.lookup(active));
        if handler.on_event(Event::Abort).to_result().is_err() {
            warn!("mws: {:?} refused to abort", active);
            return Err(Error::Failed);
        }

        // The handler may have released the transceiver itself, and another protocol may
        // already own it.
        if self.active.get() != Some(active) {
            debug!("mws: {:?} gave up the transceiver while aborting", active);
            return Ok(());
        }
        self.active.set(None);
        self.hold_count.set(0);
        debug!("mws: {:?} aborted", active);
        Ok(())
    }

    fn signal_idle(&self, excluding: Protocol) -> Result<(), Error> {
        let mut result = Ok(());
        for protocol in self.chain.iter() {
            if let Some(active) = self.active.get() {
                trace!("mws: idle broadcast stopped, {:?} is active", active);
                break;
            }
            if protocol == excluding {
                continue;
            }

            let handler = unwrap!(self.registry.lookup(protocol));
            trace!("mws: {:?} idle", protocol);
            if handler.on_event(Event::Idle).to_result().is_err() {
                warn!("mws: {:?} refused idle notification", protocol);
                result = Err(Error::Failed);
            }
        }
        result
    }
}
