//! Mock backend: auth, bet lookups and writes with simulated latency, plus the
//! background "walk-in" generator that stands in for other players.

use crate::config::{
    LOGIN_LATENCY_MS, LOOKUP_LATENCY_MS, PLACE_BET_LATENCY_MS, WALK_IN_MAX_READING,
    WALK_IN_MIN_READING,
};
use crate::ledger::{Bet, Ledger, LedgerError, Subscription, Team, User};
use crate::utils::random_bet_id;
use futures::future::{self, FutureExt, LocalBoxFuture};
use log::{debug, info};
use rand::Rng;

/// How long the fake network takes.
pub trait Latency {
    fn wait(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// Resolves immediately. Used natively and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

impl Latency for NoLatency {
    fn wait(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
        future::ready(()).boxed_local()
    }
}

pub struct MockDb<L: Latency> {
    ledger: Ledger,
    latency: L,
}

impl<L: Latency> MockDb<L> {
    pub fn new(ledger: Ledger, latency: L) -> Self {
        Self { ledger, latency }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub async fn login(&self) -> User {
        self.latency.wait(LOGIN_LATENCY_MS).await;
        let user = User::demo();
        info!("Logged in as {}", user.display_name);
        user
    }

    pub async fn get_user_bet(&self, user_id: &str) -> Option<Bet> {
        self.latency.wait(LOOKUP_LATENCY_MS).await;
        self.ledger.user_bet(user_id)
    }

    /// Nothing is written until the simulated round trip completes.
    pub async fn place_bet(
        &self,
        user: &User,
        team: Team,
        target_value: i32,
    ) -> Result<Bet, LedgerError> {
        self.latency.wait(PLACE_BET_LATENCY_MS).await;
        self.ledger.place_bet(user, team, target_value)
    }

    pub fn subscribe_pot(&self, on_total: impl Fn(u32) + 'static) -> Subscription {
        self.ledger.subscribe_pot(on_total)
    }

    pub fn subscribe_bets(&self, on_bets: impl Fn(Vec<Bet>) + 'static) -> Subscription {
        self.ledger.subscribe_bets(on_bets)
    }
}

/// One tick of background traffic: with `probability`, a random player joins
/// through the normal write path.
pub fn walk_in(ledger: &Ledger, rng: &mut impl Rng, probability: f64) -> Option<Bet> {
    if !rng.random_bool(probability.clamp(0.0, 1.0)) {
        return None;
    }
    let user = User::new(
        format!("u_{}", random_bet_id(rng)),
        format!("Random_Eater_{}", rng.random_range(0..100)),
    );
    let team = if rng.random_bool(0.5) {
        Team::Tallow
    } else {
        Team::RabbitFood
    };
    let target = rng.random_range(WALK_IN_MIN_READING..WALK_IN_MAX_READING);
    match ledger.place_bet(&user, team, target) {
        Ok(bet) => Some(bet),
        Err(e) => {
            debug!("Walk-in skipped: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ledger::SEED_CSV;
    use futures::executor::block_on;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Records every requested delay instead of sleeping.
    #[derive(Clone, Default)]
    struct RecordedLatency(Rc<RefCell<Vec<u32>>>);

    impl Latency for RecordedLatency {
        fn wait(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
            self.0.borrow_mut().push(ms);
            future::ready(()).boxed_local()
        }
    }

    fn db() -> MockDb<NoLatency> {
        let clock = Rc::new(ManualClock::new(1_000_000.0));
        MockDb::new(Ledger::with_seed_csv(SEED_CSV, 5, clock).unwrap(), NoLatency)
    }

    #[test]
    fn login_returns_the_demo_user() {
        let user = block_on(db().login());
        assert_eq!(user.uid, "user_123");
        assert_eq!(user.balance, 500);
    }

    #[test]
    fn calls_wait_for_their_simulated_latency() {
        let latency = RecordedLatency::default();
        let clock = Rc::new(ManualClock::new(0.0));
        let db = MockDb::new(Ledger::new(5, clock), latency.clone());
        block_on(async {
            let user = db.login().await;
            db.get_user_bet(&user.uid).await;
            db.place_bet(&user, Team::Tallow, 400).await.unwrap();
        });
        assert_eq!(
            *latency.0.borrow(),
            vec![LOGIN_LATENCY_MS, LOOKUP_LATENCY_MS, PLACE_BET_LATENCY_MS]
        );
    }

    #[test]
    fn get_user_bet_is_idempotent() {
        let db = db();
        let first = block_on(db.get_user_bet("u2"));
        let second = block_on(db.get_user_bet("u2"));
        assert_eq!(first, second);
        assert_eq!(first.unwrap().team, Team::RabbitFood);
        assert!(block_on(db.get_user_bet("nobody")).is_none());
    }

    #[test]
    fn walk_in_never_fires_at_zero_probability() {
        let db = db();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(walk_in(db.ledger(), &mut rng, 0.0).is_none());
        }
        assert_eq!(db.ledger().len(), 3);
    }

    #[test]
    fn walk_ins_go_through_the_ledger() {
        let db = db();
        let totals = Rc::new(Cell::new(0));
        let sink = totals.clone();
        let _sub = db.subscribe_pot(move |t| sink.set(t));

        let mut rng = StdRng::seed_from_u64(42);
        let bet = walk_in(db.ledger(), &mut rng, 1.0).unwrap();
        assert_eq!(bet.amount, 5);
        assert!(bet.user_name.starts_with("Random_Eater_"));
        assert!((WALK_IN_MIN_READING..WALK_IN_MAX_READING).contains(&bet.target_value));
        assert_eq!(db.ledger().user_bet(&bet.user_id), Some(bet));
        assert_eq!(totals.get(), 20);
    }
}
