//! Lipid Lotto: bet on where the cholesterol reading lands.
//!
//! Everything in this crate except [`web`] is plain Rust and runs natively;
//! the Yew front end lives in the binary.

pub mod clock;
pub mod config;
pub mod curve;
pub mod ledger;
pub mod normalize;
pub mod scan;
pub mod service;
pub mod utils;
pub mod visual;
pub mod web;

pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{CubicBezier, Point, ARTERY};
pub use ledger::{Bet, Ledger, LedgerError, Subscription, Team, User};
pub use normalize::{Breakpoints, Reading, RiskTier, ValueRange};
pub use scan::{oscillate, AutoScanDriver, FrameScheduler, ScanMode};
pub use service::{walk_in, Latency, MockDb, NoLatency};
pub use visual::{derive, LabelAnchor, VisualConfig, VisualState};

use std::rc::Rc;

/// The session ledger: seeded from the bundled CSV, or empty if the seed
/// cannot be read.
pub fn session_ledger(clock: Rc<dyn Clock>) -> Ledger {
    Ledger::with_seed_csv(ledger::SEED_CSV, config::ENTRY_FEE, clock.clone()).unwrap_or_else(|e| {
        log::warn!("{}; starting with an empty ledger", e);
        Ledger::new(config::ENTRY_FEE, clock)
    })
}
