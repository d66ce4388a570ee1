//! Main module for the Lipid Lotto application using Yew.
//! Owns the reading, the session backend and the bet flow.

use lipid_lotto::config::*;
use lipid_lotto::web::{TimerLatency, WalkInTraffic};
use lipid_lotto::{derive, session_ledger, Clock, MockDb, SystemClock, Team, User, VisualConfig};
use log::{info, warn};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;

use components::{ArteryVisualizer, ConfirmModal, Countdown, EntryFeed, PotCard, StatusBadge, Ticker};
use hooks::{use_bets, use_pot_total, Backend};

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let clock: Rc<dyn Clock> = (*use_memo((), |_| Rc::new(SystemClock) as Rc<dyn Clock>)).clone();
    // one backend per session, shared by reference
    let db: Rc<Backend> = use_memo((), {
        let clock = clock.clone();
        move |_| MockDb::new(session_ledger(clock), TimerLatency)
    });
    let deadline = *use_memo((), {
        let clock = clock.clone();
        move |_| clock.now_ms() + COUNTDOWN_OFFSET_MS
    });

    let reading = use_state(|| INITIAL_READING);
    let user = use_state(|| None::<User>);
    let has_bet = use_state(|| false);
    let modal_open = use_state(|| false);
    let confirming = use_state(|| false);
    let total_pot = use_pot_total(db.clone());
    let bets = use_bets(db.clone());

    // Log in, then check whether this user already holds a bet
    {
        let db = db.clone();
        let user = user.clone();
        let has_bet = has_bet.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let logged_in = db.login().await;
                if let Some(existing) = db.get_user_bet(&logged_in.uid).await {
                    info!(
                        "{} already backs {} at {}",
                        logged_in.display_name, existing.team, existing.target_value
                    );
                    has_bet.set(true);
                }
                user.set(Some(logged_in));
            });
        });
    }

    // Other players trickle in while the page is open
    {
        let ledger = db.ledger().clone();
        use_effect_with((), move |_| {
            let traffic = WalkInTraffic::start(ledger, WALK_IN_INTERVAL_MS, WALK_IN_PROBABILITY);
            move || drop(traffic)
        });
    }

    // The only writer of `reading`
    let set_reading = {
        let reading = reading.clone();
        Callback::from(move |v: i32| reading.set(v))
    };

    let team = Team::for_reading(*reading, LIMIT_LINE);
    let glow = derive(*reading, LIMIT_LINE, &VisualConfig::default()).glow_opacity;

    let on_place_bet = {
        let has_bet = has_bet.clone();
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| {
            if !*has_bet {
                modal_open.set(true);
            }
        })
    };

    let on_close = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| modal_open.set(false))
    };

    let on_confirm = {
        let db = db.clone();
        let user = user.clone();
        let has_bet = has_bet.clone();
        let modal_open = modal_open.clone();
        let confirming = confirming.clone();
        let target = *reading;
        Callback::from(move |_: ()| {
            let Some(current) = (*user).clone() else {
                warn!("Confirm pressed before login finished");
                return;
            };
            if *confirming {
                return;
            }
            confirming.set(true);

            let db = db.clone();
            let has_bet = has_bet.clone();
            let modal_open = modal_open.clone();
            let confirming = confirming.clone();
            spawn_local(async move {
                match db.place_bet(&current, team, target).await {
                    Ok(bet) => {
                        info!("Bet {} confirmed", bet.id);
                        has_bet.set(true);
                        modal_open.set(false);
                    }
                    Err(e) => {
                        warn!("Bet rejected: {}", e);
                        let message = format!("Error placing bet: {}", e);
                        if gloo_utils::window().alert_with_message(&message).is_err() {
                            warn!("Could not show alert");
                        }
                    }
                }
                confirming.set(false);
            });
        })
    };

    html! {
        <div class="app">
            <div
                class="glow"
                style={format!(
                    "background: radial-gradient(circle at 50% 30%, rgba(239, 68, 68, {:.3}) 0%, transparent 70%)",
                    glow * 0.8
                )}
            />
            <Ticker />

            <header class="app-header">
                <div>
                    <h1>{ "LIPID LOTTO" }</h1>
                    <div class="edition">{ "Edition: Asian Parent" }</div>
                </div>
                <StatusBadge has_bet={*has_bet} />
            </header>

            <Countdown target_ms={deadline} clock={clock.clone()} />

            <ArteryVisualizer value={*reading} threshold={LIMIT_LINE} on_change={set_reading} />

            <PotCard
                total={total_pot}
                entry_fee={db.ledger().entry_fee()}
                locked={*has_bet}
                {on_place_bet}
            />

            <EntryFeed bets={bets} />

            <ConfirmModal
                open={*modal_open}
                busy={*confirming}
                amount={db.ledger().entry_fee()}
                {team}
                target_value={*reading}
                {on_confirm}
                {on_close}
            />
        </div>
    }
}

/// Entry point: installs the panic hook and mounts the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
