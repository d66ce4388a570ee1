//! Yew view components for the Lipid Lotto UI.
//!
//! The artery is the only stateful piece (it owns the auto-scan); the rest
//! render straight from props.

use crate::hooks::use_auto_scan;
use gloo_timers::callback::Interval;
use lipid_lotto::config::*;
use lipid_lotto::curve::{stage_percent, ARTERY, VIEW_HEIGHT, VIEW_WIDTH};
use lipid_lotto::utils::{format_countdown, format_money, format_reading, parse_reading, short_name};
use lipid_lotto::{derive, Bet, Clock, LabelAnchor, ScanMode, Team, ValueRange, VisualConfig};
use log::debug;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ArteryVisualizerProps {
    pub value: i32,
    #[prop_or(LIMIT_LINE)]
    pub threshold: i32,
    /// The single setter for the reading.
    pub on_change: Callback<i32>,
}

/// The artery track with the sandal handle, driven by auto-scan until the
/// user grabs the invisible range input laid over it.
#[function_component(ArteryVisualizer)]
pub fn artery_visualizer(props: &ArteryVisualizerProps) -> Html {
    let range = ValueRange::READING;
    let scan = use_auto_scan(range, props.on_change.clone());
    let config = use_memo((), |_| VisualConfig::default());
    let path = use_memo((), |_| ARTERY.path_data());
    let view = derive(props.value, props.threshold, &config);

    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match parse_reading(&input.value(), range) {
                Ok(v) => on_change.emit(v),
                Err(err) => debug!("Ignoring slider input: {}", err),
            }
        })
    };
    // keyboard nudges take control without a pointer press
    let onkeydown = {
        let begin = scan.begin_interaction.clone();
        let end = scan.end_interaction.clone();
        let scanning = scan.mode == ScanMode::AutoScanning;
        Callback::from(move |_: KeyboardEvent| {
            if scanning {
                begin.emit(());
                end.emit(());
            }
        })
    };
    let on_press = scan.begin_interaction.clone();
    let on_release = scan.end_interaction.clone();

    let anchor_class = match view.anchor {
        LabelAnchor::Left => "anchor-left",
        LabelAnchor::Center => "anchor-center",
        LabelAnchor::Right => "anchor-right",
    };
    let tone = if view.alarm { "alarm" } else { "calm" };
    let (left, top) = stage_percent(view.handle);
    let handle_style = format!("left: {:.3}%; top: {:.3}%;", left, top);
    // the stage keeps the view box's proportions so percentages land on the track
    let stage_style = format!("aspect-ratio: {} / {};", VIEW_WIDTH, VIEW_HEIGHT);
    let track = (*path).clone();

    html! {
        <div class="artery-card">
            <div class="artery-backdrop-number">
                <span class={classes!("reading", tone)}>{ view.value }</span>
                <span class="unit">{ "mg/dL" }</span>
            </div>

            <div class="team-banners">
                <div class={classes!("team", "rabbit", (view.team == Team::RabbitFood).then_some("active"))}>
                    <span class="team-sub">{ "Bitter Melon (Suffering Past)" }</span>
                    <span>{ Team::RabbitFood.banner() }</span>
                </div>
                <div class={classes!("team", "tallow", (view.team == Team::Tallow).then_some("active"))}>
                    <span class="team-sub">{ "Fatty Broth (Guilty Pleasure)" }</span>
                    <span>{ Team::Tallow.banner() }</span>
                </div>
            </div>

            <div class="artery-stage" style={stage_style}>
                <svg class="artery" viewBox={format!("0 0 {} {}", VIEW_WIDTH, VIEW_HEIGHT)} preserveAspectRatio="none">
                    <g class="artery-wall" style={format!("animation-duration: {}s", view.pulse_period_s)}>
                        <path d={track.clone()} fill="none" stroke={view.wall_color} stroke-width="110" />
                        <path d={track.clone()} fill="none" stroke={view.wall_highlight} stroke-width="100" opacity="0.4" />
                    </g>
                    <path class="plaque" d={track.clone()} fill="none" stroke="#facc15" stroke-width="90" />
                    <path
                        class="blood"
                        d={track.clone()}
                        fill="none"
                        stroke="#7f1d1d"
                        stroke-width={format!("{:.2}", view.blood_stroke_width)}
                        stroke-linecap="round"
                    />
                    <g class="cells">
                        { (0..RED_CELL_COUNT).map(|i| html! {
                            <circle key={format!("rbc-{}", i)} r={(4 + i % 3).to_string()} fill="#ef4444" opacity="0.8">
                                <@{"animateMotion"}
                                    dur={format!("{}s", view.platelet_duration_s + i as f64)}
                                    repeatCount="indefinite"
                                    path={track.clone()}
                                    begin={format!("-{}s", i as f64 * 1.5)}
                                />
                            </circle>
                        }).collect::<Html>() }
                        { (0..WHITE_CELL_COUNT).map(|i| html! {
                            <ellipse key={format!("wbc-{}", i)} rx="4" ry="3" fill="#fecaca" opacity="0.6">
                                <@{"animateMotion"}
                                    dur={format!("{}s", view.platelet_duration_s + 2.0 + i as f64)}
                                    repeatCount="indefinite"
                                    path={track.clone()}
                                    begin={format!("-{}s", i * 2)}
                                    rotate="auto"
                                />
                            </ellipse>
                        }).collect::<Html>() }
                    </g>
                </svg>

                <div class="handle" style={handle_style}>
                    <div class={classes!("bubble", anchor_class, tone)}>
                        <div class="bubble-title">
                            { if scan.is_locked() { "BET LOCKED" } else { "ANALYZING..." } }
                        </div>
                        <div class="bubble-value">{ format_reading(view.value) }</div>
                        if scan.is_locked() {
                            <div class="bubble-note">
                                { if view.alarm { "WARNING: MÁ IS WATCHING." } else { "CONFIRM THIS NUMBER?" } }
                            </div>
                        }
                    </div>
                    <div class={classes!("sandal", view.alarm.then_some("shake"))}>{ "🩴" }</div>
                </div>

                <input
                    type="range"
                    class="artery-input"
                    min={range.min.to_string()}
                    max={range.max.to_string()}
                    value={props.value.to_string()}
                    {oninput}
                    {onkeydown}
                    onmousedown={on_press.reform(|_: MouseEvent| ())}
                    ontouchstart={on_press.reform(|_: TouchEvent| ())}
                    onmouseup={on_release.reform(|_: MouseEvent| ())}
                    ontouchend={on_release.reform(|_: TouchEvent| ())}
                />
            </div>

            <div class="artery-footer">
                <span class={classes!("risk-badge", view.footer_tone)}>
                    { format!("STATUS: {}", view.risk_label) }
                </span>
                <p class={classes!("status-message", tone)}>{ format!("\"{}\"", view.status_message) }</p>
            </div>
        </div>
    }
}

pub struct TickerScroll {
    offset: i32,
}

impl Reducible for TickerScroll {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        let next = self.offset - 1;
        Rc::new(TickerScroll {
            offset: if next < -TICKER_WRAP_PX { 0 } else { next },
        })
    }
}

/// Scrolling banner of parental wisdom.
#[function_component(Ticker)]
pub fn ticker() -> Html {
    let scroll = use_reducer(|| TickerScroll { offset: 0 });
    {
        let step = scroll.dispatcher();
        use_effect_with((), move |_| {
            let interval = Interval::new(TICKER_STEP_MS, move || step.dispatch(()));
            move || drop(interval)
        });
    }

    html! {
        <div class="ticker">
            <div class="ticker-track" style={format!("transform: translateX({}px)", scroll.offset)}>
                { TICKER_MESSAGES.iter().cycle().take(TICKER_MESSAGES.len() * 3).enumerate().map(|(i, msg)| html! {
                    <span key={i} class="ticker-item">{ msg.to_uppercase() }</span>
                }).collect::<Html>() }
            </div>
        </div>
    }
}

#[derive(Properties)]
pub struct CountdownProps {
    /// Wall-clock deadline in epoch milliseconds.
    pub target_ms: f64,
    pub clock: Rc<dyn Clock>,
}

impl PartialEq for CountdownProps {
    fn eq(&self, other: &Self) -> bool {
        self.target_ms == other.target_ms && Rc::ptr_eq(&self.clock, &other.clock)
    }
}

/// Time left until the next lab draw, re-read from the clock every second.
#[function_component(Countdown)]
pub fn countdown(props: &CountdownProps) -> Html {
    let now = use_state({
        let clock = props.clock.clone();
        move || clock.now_ms()
    });
    {
        let now = now.setter();
        let clock = props.clock.clone();
        use_effect_with((), move |_| {
            let interval = Interval::new(COUNTDOWN_TICK_MS, move || now.set(clock.now_ms()));
            move || drop(interval)
        });
    }

    let remaining = props.target_ms - *now;
    html! {
        <div class={classes!("countdown", (remaining <= 0.0).then_some("expired"))}>
            <span class="countdown-label">{ "RESULTS IN" }</span>
            <span class="countdown-value">{ format_countdown(remaining) }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub has_bet: bool,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    html! {
        <div class={classes!("status-badge", if props.has_bet { "investor" } else { "debtor" })}>
            { if props.has_bet { "Status: INVESTOR" } else { "Status: DEBTOR" } }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PotCardProps {
    pub total: u32,
    pub entry_fee: u32,
    pub locked: bool,
    pub on_place_bet: Callback<()>,
}

#[function_component(PotCard)]
pub fn pot_card(props: &PotCardProps) -> Html {
    html! {
        <div class="pot-card">
            <div class="pot-label">{ "TOTAL POT" }</div>
            <div class="pot-total">{ format_money(props.total) }</div>
            <button
                class="place-bet"
                disabled={props.locked}
                onclick={props.on_place_bet.reform(|_: MouseEvent| ())}
            >
                { if props.locked {
                    "LOCKED IN".to_string()
                } else {
                    format!("PLACE BET ({})", format_money(props.entry_fee))
                } }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub open: bool,
    pub busy: bool,
    pub amount: u32,
    pub team: Team,
    pub target_value: i32,
    pub on_confirm: Callback<()>,
    pub on_close: Callback<()>,
}

/// Last step before the wager is sent to the ledger.
#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    if !props.open {
        return html! {};
    }
    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <h2>{ "Confirm your wager" }</h2>
                <p>{ format!("{} on {}", format_money(props.amount), props.team.banner()) }</p>
                <p class="modal-target">{ format!("Target: {}", format_reading(props.target_value)) }</p>
                <div class="modal-actions">
                    <button class="btn-secondary" disabled={props.busy} onclick={props.on_close.reform(|_: MouseEvent| ())}>
                        { "Cancel" }
                    </button>
                    <button class="btn-primary" disabled={props.busy} onclick={props.on_confirm.reform(|_: MouseEvent| ())}>
                        { if props.busy { "Placing..." } else { "Confirm" } }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EntryFeedProps {
    pub bets: Rc<Vec<Bet>>,
}

/// Most recent entries, newest first.
#[function_component(EntryFeed)]
pub fn entry_feed(props: &EntryFeedProps) -> Html {
    if props.bets.is_empty() {
        return html! {
            <div class="entry-feed">
                <p class="no-results-message">{ "No bets yet" }</p>
            </div>
        };
    }
    html! {
        <div class="entry-feed">
            <h3>{ "Latest Entries" }</h3>
            <ul>
                { props.bets.iter().rev().take(FEED_LENGTH).map(|bet| html! {
                    <li key={bet.id.clone()} class={classes!("entry", if bet.team == Team::Tallow { "tallow" } else { "rabbit" })}>
                        <span class="entry-name">{ short_name(&bet.user_name, 18) }</span>
                        <span class="entry-target">{ format_reading(bet.target_value) }</span>
                    </li>
                }).collect::<Html>() }
            </ul>
        </div>
    }
}
