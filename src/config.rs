//! Application-level configuration constants.

// Reading range (mg/dL)
pub const MIN_READING: i32 = 100;
pub const MAX_READING: i32 = 600;
pub const LIMIT_LINE: i32 = 385;
pub const INITIAL_READING: i32 = 350;

// Risk tier breakpoints, as fractions of the normalized reading
pub const WARNING_FROM: f64 = 0.3;
pub const DANGER_FROM: f64 = 0.6;

// Floating label edge fractions
pub const LEFT_EDGE_BELOW: f64 = 0.2;
pub const RIGHT_EDGE_ABOVE: f64 = 0.8;

// Artery constriction
pub const MAX_BLOOD_STROKE: f64 = 80.0;
pub const MIN_BLOOD_STROKE: f64 = 2.0;
pub const BLOOD_STROKE_FLOOR: f64 = 5.0;

// Page glow: readings above GLOW_FROM tint the background, full at GLOW_FROM + GLOW_SPAN
pub const GLOW_FROM: f64 = 200.0;
pub const GLOW_SPAN: f64 = 400.0;

// Animation
pub const SCAN_PERIOD_MS: f64 = 2000.0;
pub const PLATELET_CALM_S: f64 = 4.0;
pub const PLATELET_DANGER_S: f64 = 12.0;
pub const PULSE_CALM_S: f64 = 3.0;
pub const PULSE_DANGER_S: f64 = 0.2;
pub const TICKER_STEP_MS: u32 = 50;
pub const TICKER_WRAP_PX: i32 = 3000;
pub const RED_CELL_COUNT: usize = 6;
pub const WHITE_CELL_COUNT: usize = 4;

// Countdown to the next lab draw: 3 days, 14 hours, 15 minutes after load
pub const COUNTDOWN_OFFSET_MS: f64 = ((3 * 24 + 14) * 60 + 15) as f64 * 60_000.0;
pub const COUNTDOWN_TICK_MS: u32 = 1000;

// Ledger
pub const ENTRY_FEE: u32 = 5;
pub const LOGIN_LATENCY_MS: u32 = 800;
pub const LOOKUP_LATENCY_MS: u32 = 300;
pub const PLACE_BET_LATENCY_MS: u32 = 1000;
pub const WALK_IN_INTERVAL_MS: u32 = 3000;
pub const WALK_IN_PROBABILITY: f64 = 0.2;
pub const WALK_IN_MIN_READING: i32 = 200;
pub const WALK_IN_MAX_READING: i32 = 600;
pub const FEED_LENGTH: usize = 5;

// Demo account handed out by the mock login
pub const DEMO_UID: &str = "user_123";
pub const DEMO_DISPLAY_NAME: &str = "Cholesterol Champ";
pub const DEMO_BALANCE: u32 = 500;
pub const DEMO_PHOTO_URL: &str = "https://picsum.photos/100/100";

pub const TICKER_MESSAGES: &[&str] = &[
    "Current status: Emotional Damage",
    "MÁ LA (MOM IS SCREAMING)",
    "Your cousin Timmy is a doctor",
    "GẶP ÔNG BÀ SOON",
    "DRINK SOME TEA, YOU'LL BE FINE",
    "Why you so fat?",
    "ANCESTORS ARE WATCHING YOUR DIET",
    "Eat more bitter melon",
    "Blood Type: Fish Sauce",
    "Disappointment level: High",
    "Rice is life, but this is too much",
    "Only B+? Why not A+?",
    "Remember to bow to your ancestors",
];
