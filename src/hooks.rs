use lipid_lotto::config::SCAN_PERIOD_MS;
use lipid_lotto::web::{AnimationFrames, TimerLatency};
use lipid_lotto::{AutoScanDriver, Bet, MockDb, ScanMode, SystemClock, ValueRange};
use std::rc::Rc;
use yew::prelude::*;

/// The backend the app talks to in the browser.
pub type Backend = MockDb<TimerLatency>;

type BrowserDriver = AutoScanDriver<AnimationFrames, SystemClock>;

/// Auto-scan state and the callbacks that hand control to the user.
#[derive(Clone)]
pub struct AutoScan {
    /// Whether the sweep or the user owns the reading.
    pub mode: ScanMode,
    /// True while a pointer is held down on the slider.
    pub dragging: bool,
    pub begin_interaction: Callback<()>,
    pub end_interaction: Callback<()>,
}

impl AutoScan {
    /// The reading is final once the user has taken over and let go.
    pub fn is_locked(&self) -> bool {
        self.mode == ScanMode::UserInteracting && !self.dragging
    }
}

/// Runs an [`AutoScanDriver`] on animation frames, feeding `on_value`.
///
/// The driver is dropped (and its pending frame cancelled) when the
/// component unmounts.
#[hook]
pub fn use_auto_scan(range: ValueRange, on_value: Callback<i32>) -> AutoScan {
    let mode = use_state(|| ScanMode::AutoScanning);
    let dragging = use_state(|| false);
    let driver = use_mut_ref(|| None::<BrowserDriver>);

    {
        let driver = driver.clone();
        let scanning = *mode == ScanMode::AutoScanning;
        use_effect_with(range, move |range| {
            if scanning {
                let d = AutoScanDriver::new(
                    AnimationFrames,
                    SystemClock,
                    *range,
                    SCAN_PERIOD_MS,
                    move |v| on_value.emit(v),
                );
                d.start();
                *driver.borrow_mut() = Some(d);
            }
            move || {
                driver.borrow_mut().take();
            }
        });
    }

    let begin_interaction = {
        let driver = driver.clone();
        let mode = mode.clone();
        let dragging = dragging.clone();
        Callback::from(move |_: ()| {
            if let Some(d) = driver.borrow().as_ref() {
                d.begin_interaction();
            }
            mode.set(ScanMode::UserInteracting);
            dragging.set(true);
        })
    };

    let end_interaction = {
        let driver = driver.clone();
        let dragging = dragging.clone();
        Callback::from(move |_: ()| {
            if let Some(d) = driver.borrow().as_ref() {
                d.end_interaction();
            }
            dragging.set(false);
        })
    };

    AutoScan {
        mode: *mode,
        dragging: *dragging,
        begin_interaction,
        end_interaction,
    }
}

/// Current pot total, kept live by a ledger subscription.
#[hook]
pub fn use_pot_total(db: Rc<Backend>) -> u32 {
    let total = use_state(|| 0u32);
    {
        let setter = total.setter();
        use_effect_with((), move |_| {
            let subscription = db.subscribe_pot(move |t| setter.set(t));
            move || drop(subscription)
        });
    }
    *total
}

/// Snapshot of every bet, refreshed on each ledger change.
#[hook]
pub fn use_bets(db: Rc<Backend>) -> Rc<Vec<Bet>> {
    let bets = use_state(|| Rc::new(Vec::<Bet>::new()));
    {
        let setter = bets.setter();
        use_effect_with((), move |_| {
            let subscription = db.subscribe_bets(move |all| setter.set(Rc::new(all)));
            move || drop(subscription)
        });
    }
    (*bets).clone()
}
