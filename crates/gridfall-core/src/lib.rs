//! Gridfall simulation engine.
//!
//! The simulation core of a tile-based exploration RPG: procedural world
//! population, a gathering/crafting economy, a probability-gated scan
//! system, and a turn-based tactical combat engine, all exposed as pure
//! (state, input) → (state, result) transforms. The UI and persistence
//! layers are thin collaborators over this crate's plain-data outputs.
//!
//! All randomness flows through `&mut impl rand::Rng`; a [`session::GameSession`]
//! owns a single seeded `StdRng` so world generation, combat, and loot are
//! reproducible under a fixed seed.

pub mod combat;
pub mod content;
pub mod economy;
pub mod error;
pub mod persistence;
pub mod player;
pub mod scan;
pub mod session;
pub mod worldgen;
