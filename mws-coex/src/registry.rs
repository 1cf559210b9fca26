//! Per-protocol handler and priority storage.
use core::cell::Cell;

use crate::config::Config;
use crate::protocol::{Handler, Protocol};

pub(crate) struct Registry<'d> {
    config: Config,
    handlers: [Cell<Option<&'d dyn Handler>>; Protocol::COUNT],
}

impl<'d> Registry<'d> {
    pub(crate) const fn new(config: Config) -> Self {
        Self {
            config,
            handlers: [const { Cell::new(None) }; Protocol::COUNT],
        }
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn priority(&self, protocol: Protocol) -> u8 {
        self.config.priority(protocol)
    }

    /// Store the handler of `protocol`, replacing any previous one.
    ///
    /// Returns `true` if this is the first registration of `protocol`.
    pub(crate) fn store(&self, protocol: Protocol, handler: &'d dyn Handler) -> bool {
        self.handlers[protocol.index()].replace(Some(handler)).is_none()
    }

    pub(crate) fn lookup(&self, protocol: Protocol) -> Option<&'d dyn Handler> {
        self.handlers[protocol.index()].get()
    }

    pub(crate) fn is_registered(&self, protocol: Protocol) -> bool {
        self.lookup(protocol).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Event, RetVal};

    #[test]
    fn first_store_reports_new_registration() {
        let ok = |_: Event| RetVal::SUCCESS;
        let busy = |_: Event| RetVal::REFUSED;
        let registry = Registry::new(Config::new());
        assert!(!registry.is_registered(Protocol::Ant));

        assert!(registry.store(Protocol::Ant, &ok));
        assert!(registry.is_registered(Protocol::Ant));
        assert!(!registry.store(Protocol::Ant, &busy));
        assert!(!registry.is_registered(Protocol::Ble));
    }

    #[test]
    fn store_replaces_handler() {
        let ok = |_: Event| RetVal::SUCCESS;
        let busy = |_: Event| RetVal::REFUSED;
        let registry = Registry::new(Config::new());
        registry.store(Protocol::Genfsk, &ok);
        registry.store(Protocol::Genfsk, &busy);

        let handler = registry.lookup(Protocol::Genfsk).unwrap();
        assert_eq!(handler.on_event(Event::Abort), RetVal::REFUSED);
    }

    #[test]
    fn priorities_come_from_config() {
        let registry = Registry::new(Config::new().with_priority(Protocol::Ant, 40));
        assert_eq!(registry.priority(Protocol::Ant), 40);
        assert_eq!(registry.priority(Protocol::Ble), 0);
        assert_eq!(registry.config().priority(Protocol::Ant), 40);
    }
}
