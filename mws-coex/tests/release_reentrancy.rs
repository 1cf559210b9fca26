//! An owner calling back into the arbiter from its own `Release` handler.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use common::{EventLog, Probe};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use mws_coex::{Arbiter, Config, Event, Handler, Protocol, RetVal};

static MWS: Arbiter<'static, CriticalSectionRawMutex> = Arbiter::new(Config::new());
static LOG: EventLog = EventLog::new();

static BLE: Rearming = Rearming {
    reacquire: AtomicBool::new(false),
    seen_on_release: Mutex::new(Vec::new()),
};
static ANT: Probe<'static> = Probe::new(Protocol::Ant, &LOG);

/// A BLE stack that may schedule its next event from the `Release` notification.
struct Rearming {
    reacquire: AtomicBool,
    seen_on_release: Mutex<Vec<(Option<Protocol>, u32)>>,
}

impl Handler for Rearming {
    fn on_event(&self, event: Event) -> RetVal {
        LOG.push(Protocol::Ble, event);
        if event != Event::Release {
            return RetVal::SUCCESS;
        }

        self.seen_on_release
            .lock()
            .unwrap()
            .push((MWS.get_active_protocol(), MWS.hold_count()));
        if self.reacquire.load(Ordering::Relaxed) {
            MWS.acquire(Protocol::Ble, false).into()
        } else {
            RetVal::SUCCESS
        }
    }
}

#[test]
fn release_handler_sees_free_transceiver_and_may_reacquire() {
    MWS.register(Protocol::Ble, &BLE).unwrap();
    MWS.register(Protocol::Ant, &ANT).unwrap();
    LOG.take();

    // The transceiver is already free when the owner is told about the release.
    MWS.acquire(Protocol::Ble, false).unwrap();
    MWS.release(Protocol::Ble).unwrap();
    assert_eq!(
        LOG.take(),
        [
            (Protocol::Ble, Event::Active),
            (Protocol::Ble, Event::Release),
            (Protocol::Ant, Event::Idle),
        ]
    );
    assert_eq!(*BLE.seen_on_release.lock().unwrap(), [(None, 0)]);

    // Acquiring again from the release notification keeps the others from being told it is idle.
    BLE.reacquire.store(true, Ordering::Relaxed);
    MWS.acquire(Protocol::Ble, false).unwrap();
    MWS.release(Protocol::Ble).unwrap();
    assert_eq!(
        LOG.take(),
        [
            (Protocol::Ble, Event::Active),
            (Protocol::Ble, Event::Release),
            (Protocol::Ble, Event::Active),
        ]
    );
    assert_eq!(MWS.get_active_protocol(), Some(Protocol::Ble));
    assert_eq!(MWS.hold_count(), 1);

    BLE.reacquire.store(false, Ordering::Relaxed);
    MWS.release(Protocol::Ble).unwrap();
    assert_eq!(
        LOG.take(),
        [(Protocol::Ble, Event::Release), (Protocol::Ant, Event::Idle)]
    );
    assert_eq!(MWS.get_active_protocol(), None);
}
