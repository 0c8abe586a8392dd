//! Recoverable action failures.
//!
//! Every player-facing action returns `Result<_, ActionError>` rather than
//! panicking; the variants carry enough structured data for the UI to
//! render a precise reason. There are no fatal error conditions in the
//! simulation core. Unknown content ids fail closed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A missing crafting ingredient and the exact shortfall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialShortfall {
    pub item_id: String,
    pub required: u32,
    pub available: u32,
}

impl MaterialShortfall {
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.available)
    }
}

/// Why a player action could not be performed. All variants are
/// recoverable and surfaced verbatim to the UI.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ActionError {
    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },

    #[error("requires level {required} (currently {current})")]
    InsufficientLevel { required: u32, current: u32 },

    #[error("missing materials for {recipe_id}")]
    MissingMaterials {
        recipe_id: String,
        missing: Vec<MaterialShortfall>,
    },

    #[error("requires tool: {tool_id}")]
    MissingTool { tool_id: String },

    #[error("resource is depleted, respawns in {respawn_in_ms} ms")]
    ResourceDepleted { respawn_in_ms: u64 },

    #[error("invalid target: {reason}")]
    InvalidTarget { reason: String },

    #[error("on cooldown for {remaining_ms} ms")]
    OnCooldown { remaining_ms: u64 },

    #[error("skill ready in {remaining_turns} turns")]
    SkillOnCooldown { remaining_turns: u32 },

    #[error("unknown id: {0}")]
    UnknownId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_math() {
        let s = MaterialShortfall {
            item_id: "bio-gel".into(),
            required: 3,
            available: 1,
        };
        assert_eq!(s.missing(), 2);
    }

    #[test]
    fn messages_render() {
        let e = ActionError::InsufficientEnergy {
            required: 25,
            available: 10,
        };
        assert!(e.to_string().contains("25"));
        let e = ActionError::MissingTool {
            tool_id: "plasma-cutter".into(),
        };
        assert!(e.to_string().contains("plasma-cutter"));
    }

    #[test]
    fn cooldown_messages_name_their_unit() {
        let scan = ActionError::OnCooldown { remaining_ms: 500 };
        assert!(scan.to_string().contains("ms"));
        let skill = ActionError::SkillOnCooldown { remaining_turns: 2 };
        assert!(skill.to_string().contains("turns"));
    }
}
