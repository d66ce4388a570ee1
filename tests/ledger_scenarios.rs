// End-to-end ledger scenarios through the async mock backend.

use futures::executor::block_on;
use lipid_lotto::config::{ENTRY_FEE, LIMIT_LINE};
use lipid_lotto::{
    derive, session_ledger, LedgerError, ManualClock, MockDb, NoLatency, Team, User, VisualConfig,
};
use std::cell::RefCell;
use std::rc::Rc;

fn backend() -> MockDb<NoLatency> {
    let clock = Rc::new(ManualClock::new(1_730_000_000_000.0));
    MockDb::new(session_ledger(clock), NoLatency)
}

#[test]
fn second_bet_from_the_same_user_is_rejected() {
    let db = backend();
    let user = User::new("U", "Tester");
    let pot = Rc::new(RefCell::new(Vec::new()));
    let sink = pot.clone();
    let _sub = db.subscribe_pot(move |t| sink.borrow_mut().push(t));

    let bet = block_on(db.place_bet(&user, Team::Tallow, 420)).unwrap();
    assert_eq!(bet.amount, 5);
    assert_eq!(bet.team, Team::Tallow);
    assert_eq!(bet.target_value, 420);
    assert_eq!(bet.user_id, "U");

    let err = block_on(db.place_bet(&user, Team::RabbitFood, 200)).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateBet { .. }));
    assert_eq!(*pot.borrow(), vec![15, 20]);
    assert_eq!(db.ledger().pot_total(), 20);
}

#[test]
fn pot_subscription_starts_at_the_seeded_total() {
    let db = backend();
    let first = Rc::new(RefCell::new(None));
    let sink = first.clone();
    let _sub = db.subscribe_pot(move |t| {
        sink.borrow_mut().get_or_insert(t);
    });
    assert_eq!(*first.borrow(), Some(3 * ENTRY_FEE));
}

#[test]
fn confirming_uses_the_team_shown_on_screen() {
    let db = backend();
    let user = block_on(db.login());
    assert!(block_on(db.get_user_bet(&user.uid)).is_none());

    let reading = 512;
    let view = derive(reading, LIMIT_LINE, &VisualConfig::default());
    let bet = block_on(db.place_bet(&user, view.team, reading)).unwrap();
    assert_eq!(bet.team, Team::Tallow);
    assert_eq!(block_on(db.get_user_bet(&user.uid)), Some(bet));
}
