//! Static content definitions: enemies, resources, recipes, zones, and
//! scan patterns. Pure data; all behavior lives in the systems that
//! consume these tables. Lookups by id return `Option` and fail closed on
//! unknown ids.

pub mod enemies;
pub mod patterns;
pub mod recipes;
pub mod resources;
pub mod zones;
