//! Browser-backed implementations of the scheduling seams.

use crate::ledger::Ledger;
use crate::scan::FrameScheduler;
use crate::service::{walk_in, Latency};
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::callback::Interval;
use gloo_timers::future::TimeoutFuture;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// `requestAnimationFrame` / `cancelAnimationFrame`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrames;

/// A requested frame. Owns the JS closure so it stays alive until it runs or
/// is cancelled.
pub struct FrameRequest {
    id: Option<i32>,
    _closure: Closure<dyn FnMut()>,
}

impl FrameScheduler for AnimationFrames {
    type Handle = FrameRequest;

    fn request(&self, callback: Box<dyn FnOnce()>) -> FrameRequest {
        let closure: Closure<dyn FnMut()> = Closure::once(callback);
        let id = match gloo_utils::window().request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        };
        FrameRequest {
            id,
            _closure: closure,
        }
    }

    fn cancel(&self, handle: FrameRequest) {
        if let Some(id) = handle.id {
            if let Err(e) = gloo_utils::window().cancel_animation_frame(id) {
                warn!("cancelAnimationFrame failed: {:?}", e);
            }
        }
    }
}

/// Real delays via `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerLatency;

impl Latency for TimerLatency {
    fn wait(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(ms).boxed_local()
    }
}

/// Periodic walk-ins for as long as this value lives.
pub struct WalkInTraffic {
    _interval: Interval,
}

impl WalkInTraffic {
    pub fn start(ledger: Ledger, period_ms: u32, probability: f64) -> Self {
        info!("Walk-in traffic every {} ms (p = {})", period_ms, probability);
        let interval = Interval::new(period_ms, move || {
            if let Some(bet) = walk_in(&ledger, &mut rand::rng(), probability) {
                info!("{} walked in on {}", bet.user_name, bet.team);
            }
        });
        Self {
            _interval: interval,
        }
    }
}
