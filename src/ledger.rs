//! In-memory wager store.
//!
//! One [`Ledger`] is built per session and handed to whoever needs it; clones
//! share the same store. A user id can hold at most one bet, and the pot is
//! always `entry_fee * bets.len()`.

use crate::clock::Clock;
use crate::config::{DEMO_BALANCE, DEMO_DISPLAY_NAME, DEMO_PHOTO_URL, DEMO_UID};
use crate::utils::random_bet_id;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Opening bets shipped with the app.
pub const SEED_CSV: &str = include_str!("bets.csv");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    RabbitFood,
    Tallow,
}

impl Team {
    /// Readings strictly above the threshold back Tallow.
    pub fn for_reading(value: i32, threshold: i32) -> Self {
        if value > threshold {
            Team::Tallow
        } else {
            Team::RabbitFood
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::RabbitFood => "RABBIT_FOOD",
            Team::Tallow => "TALLOW",
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Team::RabbitFood => "TEAM KHỔ QUA",
            Team::Tallow => "TEAM NƯỚC BÉO",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub amount: u32,
    pub team: Team,
    pub target_value: i32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub uid: String,
    pub display_name: String,
    pub balance: u32,
    pub photo_url: Option<String>,
}

impl User {
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            balance: 0,
            photo_url: None,
        }
    }

    /// The account the mock login hands out.
    pub fn demo() -> Self {
        Self {
            uid: DEMO_UID.to_string(),
            display_name: DEMO_DISPLAY_NAME.to_string(),
            balance: DEMO_BALANCE,
            photo_url: Some(DEMO_PHOTO_URL.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    DuplicateBet { user_id: String },
    Seed(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::DuplicateBet { .. } => write!(f, "You have already placed a bet!"),
            LedgerError::Seed(msg) => write!(f, "Failed to load seed bets: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

type Listener<T> = Rc<dyn Fn(T)>;

#[derive(Default)]
struct LedgerState {
    bets: Vec<Bet>,
    by_user: HashMap<String, usize>,
    pot_listeners: Vec<(u64, Listener<u32>)>,
    bet_listeners: Vec<(u64, Listener<Vec<Bet>>)>,
    next_listener_id: u64,
}

impl LedgerState {
    fn next_id(&mut self) -> u64 {
        self.next_listener_id += 1;
        self.next_listener_id
    }
}

#[derive(Clone)]
pub struct Ledger {
    state: Rc<RefCell<LedgerState>>,
    entry_fee: u32,
    clock: Rc<dyn Clock>,
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("entry_fee", &self.entry_fee)
            .field("bets", &self.len())
            .finish()
    }
}

#[derive(Deserialize)]
struct SeedRow {
    id: String,
    user_id: String,
    user_name: String,
    team: Team,
    target_value: i32,
    age_ms: f64,
}

impl Ledger {
    pub fn new(entry_fee: u32, clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Rc::new(RefCell::new(LedgerState::default())),
            entry_fee,
            clock,
        }
    }

    /// Build a ledger pre-filled from CSV content with the header
    /// `id,user_id,user_name,team,target_value,age_ms`.
    ///
    /// `age_ms` is how long before "now" the bet was placed.
    pub fn with_seed_csv(
        csv_content: &str,
        entry_fee: u32,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let ledger = Self::new(entry_fee, clock);
        let now = ledger.clock.now_ms();

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_content.as_bytes());

        for (line, row) in rdr.deserialize::<SeedRow>().enumerate() {
            let row = row.map_err(|e| LedgerError::Seed(format!("row {}: {}", line + 1, e)))?;
            ledger.insert(Bet {
                id: row.id,
                user_id: row.user_id,
                user_name: row.user_name,
                amount: entry_fee,
                team: row.team,
                target_value: row.target_value,
                timestamp: now - row.age_ms,
            })?;
        }

        info!("Loaded {} seed bets", ledger.len());
        Ok(ledger)
    }

    pub fn entry_fee(&self) -> u32 {
        self.entry_fee
    }

    pub fn len(&self) -> usize {
        self.state.borrow().bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pot_total(&self) -> u32 {
        self.entry_fee * self.len() as u32
    }

    /// Copy of every bet, oldest insert first.
    pub fn bets(&self) -> Vec<Bet> {
        self.state.borrow().bets.clone()
    }

    pub fn user_bet(&self, user_id: &str) -> Option<Bet> {
        let state = self.state.borrow();
        state.by_user.get(user_id).map(|&idx| state.bets[idx].clone())
    }

    /// Record a wager for `user`. Rejects a second bet from the same user id
    /// without touching the store.
    pub fn place_bet(&self, user: &User, team: Team, target_value: i32) -> Result<Bet, LedgerError> {
        let bet = Bet {
            id: random_bet_id(&mut rand::rng()),
            user_id: user.uid.clone(),
            user_name: user.display_name.clone(),
            amount: self.entry_fee,
            team,
            target_value,
            timestamp: self.clock.now_ms(),
        };
        self.insert(bet.clone())?;
        info!(
            "{} bet {} on {} at {} mg/dL",
            bet.user_name, bet.amount, bet.team, bet.target_value
        );
        self.notify();
        Ok(bet)
    }

    /// Check-and-insert in one borrow.
    fn insert(&self, bet: Bet) -> Result<(), LedgerError> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        match state.by_user.entry(bet.user_id.clone()) {
            Entry::Occupied(_) => {
                warn!("Rejected duplicate bet from {}", bet.user_id);
                Err(LedgerError::DuplicateBet {
                    user_id: bet.user_id,
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(state.bets.len());
                state.bets.push(bet);
                Ok(())
            }
        }
    }

    /// Call `on_total` now with the current pot, then after every new bet.
    pub fn subscribe_pot(&self, on_total: impl Fn(u32) + 'static) -> Subscription {
        let listener: Listener<u32> = Rc::new(on_total);
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id();
            state.pot_listeners.push((id, listener.clone()));
            id
        };
        listener(self.pot_total());
        self.subscription(id)
    }

    /// Call `on_bets` now with a snapshot of all bets, then after every new bet.
    pub fn subscribe_bets(&self, on_bets: impl Fn(Vec<Bet>) + 'static) -> Subscription {
        let listener: Listener<Vec<Bet>> = Rc::new(on_bets);
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id();
            state.bet_listeners.push((id, listener.clone()));
            id
        };
        listener(self.bets());
        self.subscription(id)
    }

    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        state.pot_listeners.len() + state.bet_listeners.len()
    }

    fn subscription(&self, id: u64) -> Subscription {
        Subscription {
            state: Rc::downgrade(&self.state),
            id,
        }
    }

    // Listeners run with no borrow held so they may read the ledger or drop
    // their own subscription.
    fn notify(&self) {
        let (pot_listeners, bet_listeners) = {
            let state = self.state.borrow();
            let pot: Vec<Listener<u32>> = state.pot_listeners.iter().map(|(_, l)| l.clone()).collect();
            let bets: Vec<Listener<Vec<Bet>>> =
                state.bet_listeners.iter().map(|(_, l)| l.clone()).collect();
            (pot, bets)
        };
        debug!(
            "Notifying {} pot and {} bet listeners",
            pot_listeners.len(),
            bet_listeners.len()
        );

        let total = self.pot_total();
        for listener in pot_listeners {
            listener(total);
        }
        if !bet_listeners.is_empty() {
            let snapshot = self.bets();
            for listener in bet_listeners {
                listener(snapshot.clone());
            }
        }
    }
}

/// Live registration with a [`Ledger`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    state: Weak<RefCell<LedgerState>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.borrow_mut();
            let id = self.id;
            state.pot_listeners.retain(|(l, _)| *l != id);
            state.bet_listeners.retain(|(l, _)| *l != id);
        }
    }
}
