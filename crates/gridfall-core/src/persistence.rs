//! Save snapshots.
//!
//! A [`SaveData`] is a plain-data extraction of everything a session needs
//! to resume: player, inventory, equipment, world nodes, discoveries,
//! exploration history, clock, settings, and the RNG seed. Combat is never
//! part of a snapshot; saving happens on the exploration surface.
//!
//! The binary form is bincode behind a format version; serde_json works on
//! the same structure for debugging and interchange.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::zones::zone_for_row;
use crate::player::{Equipment, Inventory};
use crate::scan::ScanState;
use crate::session::{GameSession, Settings};
use crate::worldgen::ResourceNode;
use gridfall_logic::grid::Position;
use gridfall_logic::progression::PlayerStats;

/// Current save format version. Bumped on any layout change.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("unsupported save version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// The complete persisted state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub player: PlayerStats,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub position: Position,
    pub current_zone: String,
    pub explored_cells: Vec<u32>,
    pub visited_pois: Vec<String>,
    pub play_time_ms: u64,
    pub settings: Settings,
    pub nodes: Vec<ResourceNode>,
    pub known_patterns: Vec<String>,
    pub points: u64,
    pub rng_seed: u64,
}

/// Write a snapshot in the binary save format.
pub fn save_to_writer<W: Write>(save: &SaveData, writer: W) -> Result<(), PersistenceError> {
    bincode::serialize_into(writer, save)?;
    Ok(())
}

/// Read a snapshot back, rejecting unknown format versions.
pub fn load_from_reader<R: Read>(reader: R) -> Result<SaveData, PersistenceError> {
    let save: SaveData = bincode::deserialize_from(reader)?;
    if save.version != SAVE_VERSION {
        return Err(PersistenceError::VersionMismatch {
            found: save.version,
            expected: SAVE_VERSION,
        });
    }
    Ok(save)
}

impl GameSession {
    /// Extract a snapshot of the current exploration state. Collections are
    /// sorted so two snapshots of the same state are byte-identical.
    pub fn snapshot(&self) -> SaveData {
        let mut explored_cells: Vec<u32> = self.explored_cells.iter().copied().collect();
        explored_cells.sort_unstable();
        let mut visited_pois: Vec<String> = self.visited_pois.iter().cloned().collect();
        visited_pois.sort();
        let mut known_patterns: Vec<String> = self.scan.known_patterns.iter().cloned().collect();
        known_patterns.sort();
        SaveData {
            version: SAVE_VERSION,
            player: self.stats.clone(),
            inventory: self.inventory.clone(),
            equipment: self.equipment.clone(),
            position: self.position,
            current_zone: self.current_zone.clone(),
            explored_cells,
            visited_pois,
            play_time_ms: self.play_time_ms,
            settings: self.settings.clone(),
            nodes: self.nodes.clone(),
            known_patterns,
            points: self.points,
            rng_seed: self.seed,
        }
    }

    /// Rebuild a session from a snapshot. The world comes from the save,
    /// not from regeneration; the RNG is reseeded from the stored seed, so
    /// the resumed session is a valid continuation though not a replay of
    /// the interrupted random stream.
    pub fn restore(save: SaveData) -> Self {
        let mut session = GameSession::new(save.rng_seed);
        session.stats = save.player;
        session.inventory = save.inventory;
        session.equipment = save.equipment;
        session.position = save.position;
        session.current_zone = if save.current_zone.is_empty() {
            zone_for_row(save.position.row)
                .map(|z| z.id.to_string())
                .unwrap_or_default()
        } else {
            save.current_zone
        };
        session.explored_cells = save.explored_cells.into_iter().collect();
        session.visited_pois = save.visited_pois.into_iter().collect();
        session.play_time_ms = save.play_time_ms;
        session.settings = save.settings;
        session.nodes = save.nodes;
        session.scan = ScanState {
            known_patterns: save.known_patterns.into_iter().collect(),
            last_scan_ms: Default::default(),
        };
        session.points = save.points;
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ItemRef;
    use gridfall_logic::grid::Direction;

    fn played_session() -> GameSession {
        let mut session = GameSession::new(31);
        session.inventory.add(ItemRef::Resource("bio-gel".into()), 7);
        session.inventory.add(ItemRef::Crafted("plasma-cutter".into()), 1);
        session.equip("plasma-cutter").unwrap();
        session.tick(5000);
        if !session.in_combat() {
            let _ = session.move_player(Direction::East);
        }
        session.scan.known_patterns.insert("helix-glyph".into());
        session.points = 40;
        session
    }

    #[test]
    fn bincode_round_trip() {
        let session = played_session();
        let save = session.snapshot();
        let mut buf = Vec::new();
        save_to_writer(&save, &mut buf).unwrap();
        let loaded = load_from_reader(buf.as_slice()).unwrap();
        assert_eq!(loaded, save);
    }

    #[test]
    fn json_round_trip() {
        let save = played_session().snapshot();
        let json = serde_json::to_string(&save).unwrap();
        let back: SaveData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, save);
    }

    #[test]
    fn version_mismatch_rejected() {
        let mut save = played_session().snapshot();
        save.version = SAVE_VERSION + 1;
        let mut buf = Vec::new();
        save_to_writer(&save, &mut buf).unwrap();
        let err = load_from_reader(buf.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::VersionMismatch { found, expected: SAVE_VERSION }
                if found == SAVE_VERSION + 1
        ));
    }

    #[test]
    fn restore_resumes_equivalent_state() {
        let session = played_session();
        let restored = GameSession::restore(session.snapshot());
        assert_eq!(restored.stats, session.stats);
        assert_eq!(restored.inventory, session.inventory);
        assert_eq!(restored.equipment, session.equipment);
        assert_eq!(restored.position, session.position);
        assert_eq!(restored.current_zone, session.current_zone);
        assert_eq!(restored.nodes, session.nodes);
        assert_eq!(restored.explored_cells, session.explored_cells);
        assert_eq!(restored.play_time_ms, session.play_time_ms);
        assert_eq!(restored.points, session.points);
        assert!(restored.scan.is_known("helix-glyph"));
    }

    #[test]
    fn snapshots_of_same_state_are_identical() {
        let session = played_session();
        let a = session.snapshot();
        let b = session.snapshot();
        let mut buf_a = Vec::new();
        let mut buf_b = Vec::new();
        save_to_writer(&a, &mut buf_a).unwrap();
        save_to_writer(&b, &mut buf_b).unwrap();
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn restored_session_stays_playable() {
        let session = played_session();
        let mut restored = GameSession::restore(session.snapshot());
        restored.tick(10_000);
        if !restored.in_combat() {
            restored.move_player(Direction::South).unwrap();
        }
        assert!(restored.stats.total_moves >= session.stats.total_moves);
    }
}
