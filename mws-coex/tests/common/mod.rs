#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use mws_coex::{Event, Handler, Protocol, RetVal};

/// Events delivered to all probes sharing the log, in delivery order.
#[derive(Default)]
pub struct EventLog(Mutex<Vec<(Protocol, Event)>>);

impl EventLog {
    pub const fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    pub fn push(&self, protocol: Protocol, event: Event) {
        self.0.lock().unwrap().push((protocol, event));
    }

    pub fn take(&self) -> Vec<(Protocol, Event)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn count(&self, protocol: Protocol, event: Event) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|&&entry| entry == (protocol, event))
            .count()
    }
}

/// A protocol stack stand-in recording every event it receives.
pub struct Probe<'a> {
    pub protocol: Protocol,
    log: &'a EventLog,
    abort_reply: AtomicU32,
    idle_reply: AtomicU32,
    inactivity_us: AtomicU32,
}

impl<'a> Probe<'a> {
    pub const fn new(protocol: Protocol, log: &'a EventLog) -> Self {
        Self {
            protocol,
            log,
            abort_reply: AtomicU32::new(0),
            idle_reply: AtomicU32::new(0),
            inactivity_us: AtomicU32::new(0),
        }
    }

    pub fn refuse_abort(&self, refuse: bool) {
        self.abort_reply.store(u32::from(refuse), Ordering::Relaxed);
    }

    pub fn refuse_idle(&self, refuse: bool) {
        self.idle_reply.store(u32::from(refuse), Ordering::Relaxed);
    }

    pub fn set_inactivity_us(&self, us: u32) {
        self.inactivity_us.store(us, Ordering::Relaxed);
    }
}

impl Handler for Probe<'_> {
    fn on_event(&self, event: Event) -> RetVal {
        self.log.push(self.protocol, event);
        match event {
            Event::Abort => RetVal::new(self.abort_reply.load(Ordering::Relaxed)),
            Event::Idle => RetVal::new(self.idle_reply.load(Ordering::Relaxed)),
            Event::GetInactivityDuration => RetVal::new(self.inactivity_us.load(Ordering::Relaxed)),
            _ => RetVal::SUCCESS,
        }
    }
}
