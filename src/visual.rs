//! Derived render state for the artery visualizer.
//!
//! [`derive`] is a pure function of the reading, the threshold and a
//! [`VisualConfig`]; the components only draw what it returns.

use crate::config::*;
use crate::curve::{CubicBezier, Point, ARTERY};
use crate::ledger::Team;
use crate::normalize::{read, Breakpoints, RiskTier, ValueRange};
use serde::Serialize;

/// Where the floating label sits relative to the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelAnchor {
    Left,
    Center,
    Right,
}

/// Tunables for [`derive`]. `Default` pulls everything from [`crate::config`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisualConfig {
    pub range: ValueRange,
    pub breakpoints: Breakpoints,
    pub curve: CubicBezier,
    pub left_edge_below: f64,
    pub right_edge_above: f64,
    pub max_blood_stroke: f64,
    pub min_blood_stroke: f64,
    pub blood_stroke_floor: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            range: ValueRange::READING,
            breakpoints: Breakpoints::default(),
            curve: ARTERY,
            left_edge_below: LEFT_EDGE_BELOW,
            right_edge_above: RIGHT_EDGE_ABOVE,
            max_blood_stroke: MAX_BLOOD_STROKE,
            min_blood_stroke: MIN_BLOOD_STROKE,
            blood_stroke_floor: BLOOD_STROKE_FLOOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualState {
    pub value: i32,
    pub t: f64,
    pub tier: RiskTier,
    pub team: Team,
    pub handle: Point,
    pub blood_stroke_width: f64,
    pub wall_color: &'static str,
    pub wall_highlight: &'static str,
    pub risk_label: &'static str,
    pub status_message: &'static str,
    pub footer_tone: &'static str,
    pub anchor: LabelAnchor,
    pub platelet_duration_s: f64,
    pub pulse_period_s: f64,
    pub glow_opacity: f64,
    pub alarm: bool,
}

struct TierStyle {
    wall_color: &'static str,
    wall_highlight: &'static str,
    risk_label: &'static str,
    status_message: &'static str,
    footer_tone: &'static str,
}

const SAFE: TierStyle = TierStyle {
    wall_color: "#691e2c",
    wall_highlight: "#be123c",
    risk_label: "Safe (Khổ Qua)",
    status_message: "You eat it, you suffer, but you live. 'Cools the blood'.",
    footer_tone: "tone-safe",
};

const WARNING: TierStyle = TierStyle {
    wall_color: "#7f1d1d",
    wall_highlight: "#b91c1c",
    risk_label: "Risky (Nước Béo)",
    status_message: "Delicious, but it speeds up the inheritance process.",
    footer_tone: "tone-warning",
};

const DANGER: TierStyle = TierStyle {
    wall_color: "#450a0a",
    wall_highlight: "#991b1b",
    risk_label: "GẶP ÔNG BÀ SOON",
    status_message: "Your blood has the consistency of cold gravy. Say hi to Grandpa.",
    footer_tone: "tone-danger",
};

fn style(tier: RiskTier) -> &'static TierStyle {
    match tier {
        RiskTier::Safe => &SAFE,
        RiskTier::Warning => &WARNING,
        RiskTier::Danger => &DANGER,
    }
}

impl VisualConfig {
    /// Blood stroke narrows linearly with `t` and never drops below the floor.
    pub fn blood_stroke_width(&self, t: f64) -> f64 {
        let width = self.max_blood_stroke - t * (self.max_blood_stroke - self.min_blood_stroke);
        width.max(self.blood_stroke_floor)
    }

    pub fn anchor(&self, t: f64) -> LabelAnchor {
        if t < self.left_edge_below {
            LabelAnchor::Left
        } else if t > self.right_edge_above {
            LabelAnchor::Right
        } else {
            LabelAnchor::Center
        }
    }
}

/// Compute the full render state for `value` against `threshold`.
pub fn derive(value: i32, threshold: i32, config: &VisualConfig) -> VisualState {
    let reading = read(value, config.range, config.breakpoints);
    let t = reading.t;
    let s = style(reading.tier);
    let danger = reading.tier == RiskTier::Danger;

    VisualState {
        value,
        t,
        tier: reading.tier,
        team: Team::for_reading(value, threshold),
        handle: config.curve.point_at(t),
        blood_stroke_width: config.blood_stroke_width(t),
        wall_color: s.wall_color,
        wall_highlight: s.wall_highlight,
        risk_label: s.risk_label,
        status_message: s.status_message,
        footer_tone: s.footer_tone,
        anchor: config.anchor(t),
        platelet_duration_s: if danger { PLATELET_DANGER_S } else { PLATELET_CALM_S },
        pulse_period_s: if danger { PULSE_DANGER_S } else { PULSE_CALM_S },
        glow_opacity: ((value as f64 - GLOW_FROM) / GLOW_SPAN).clamp(0.0, 1.0),
        alarm: danger,
    }
}
