//! Harvest yield formula.
//!
//! `yield = floor(base × (1 + 0.01×level) × (1 + 0.05×scan) × tool × variance)`
//! clamped to `[1, max_yield]`. The variance draw (uniform in [0.8, 1.2]) is
//! supplied by the caller so the formula stays deterministic for testing.

/// Lower bound of the uniform variance draw.
pub const VARIANCE_MIN: f32 = 0.8;
/// Upper bound of the uniform variance draw.
pub const VARIANCE_MAX: f32 = 1.2;

/// Compute harvest yield. `tool_power` is the equipped tool's power if the
/// player has one equipped; each point adds a 10% bonus.
pub fn calculate_yield(
    base_yield: u32,
    max_yield: u32,
    player_level: u32,
    scan_power: u32,
    tool_power: Option<u32>,
    variance: f32,
) -> u32 {
    let level_bonus = 1.0 + 0.01 * player_level as f32;
    let scan_bonus = 1.0 + 0.05 * scan_power as f32;
    let tool_bonus = match tool_power {
        Some(power) => 1.0 + 0.1 * power as f32,
        None => 1.0,
    };
    let raw = base_yield as f32 * level_bonus * scan_bonus * tool_bonus * variance;
    (raw.floor() as u32).clamp(1, max_yield)
}
