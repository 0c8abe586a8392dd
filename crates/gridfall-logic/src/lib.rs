//! Pure simulation logic for Gridfall.
//!
//! This crate contains the balancing formulas and static probability tables
//! that drive the game, independent of any RNG source, engine, or runtime.
//! Functions take plain data and return results, making them unit-testable
//! and portable. Anything that needs a random draw takes the rolled value
//! as a parameter; the engine crate owns the seeded RNG.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`damage`] | Hit checks, the damage formula, defense diminishing returns |
//! | [`encounter`] | Row→tier bands, encounter/boss probabilities, group sizing |
//! | [`gathering`] | Harvest yield formula (level, scan power, tool, variance) |
//! | [`grid`] | Map positions, Manhattan distance, cell addressing |
//! | [`progression`] | XP curve, level resolution, stat growth, energy regen |
//! | [`scan`] | Scan tiers, per-rarity discovery chances |

pub mod damage;
pub mod encounter;
pub mod gathering;
pub mod grid;
pub mod progression;
pub mod scan;
