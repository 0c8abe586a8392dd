//! Player combat skills.
//!
//! Static skill definitions: energy cost, cooldown in turns, grid range
//! (0 = self-targeted), and effect. Cooldowns are tracked per combat
//! session and decrement once per enemy phase.

use super::status::StatusKind;

/// What a skill does on a successful use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// Plain damage with the given attack multiplier.
    Damage { multiplier: f32 },
    /// Damage that heals the player for half the damage dealt.
    Drain { multiplier: f32 },
    /// Apply a status to the target (or to the player when range is 0).
    ApplyStatus {
        kind: StatusKind,
        duration: u32,
        strength: f32,
    },
}

/// Static definition of a player skill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub energy_cost: u32,
    /// Turns before the skill can be used again.
    pub cooldown_turns: u32,
    /// Maximum grid distance to the target; 0 targets the player.
    pub range: u32,
    pub effect: SkillEffect,
}

const SKILLS: &[Skill] = &[
    Skill {
        id: "pulse-strike",
        name: "Pulse Strike",
        energy_cost: 10,
        cooldown_turns: 2,
        range: 1,
        effect: SkillEffect::Damage { multiplier: 1.5 },
    },
    Skill {
        id: "arc-lance",
        name: "Arc Lance",
        energy_cost: 15,
        cooldown_turns: 3,
        range: 2,
        effect: SkillEffect::Damage { multiplier: 1.2 },
    },
    Skill {
        id: "siphon-ray",
        name: "Siphon Ray",
        energy_cost: 20,
        cooldown_turns: 4,
        range: 2,
        effect: SkillEffect::Drain { multiplier: 1.0 },
    },
    Skill {
        id: "emp-burst",
        name: "EMP Burst",
        energy_cost: 25,
        cooldown_turns: 5,
        range: 1,
        effect: SkillEffect::ApplyStatus {
            kind: StatusKind::Stunned,
            duration: 1,
            strength: 0.0,
        },
    },
    Skill {
        id: "neural-spike",
        name: "Neural Spike",
        energy_cost: 12,
        cooldown_turns: 3,
        range: 2,
        effect: SkillEffect::ApplyStatus {
            kind: StatusKind::Vulnerable,
            duration: 3,
            strength: 25.0,
        },
    },
    Skill {
        id: "overdrive",
        name: "Overdrive",
        energy_cost: 18,
        cooldown_turns: 4,
        range: 0,
        effect: SkillEffect::ApplyStatus {
            kind: StatusKind::Buffed,
            duration: 3,
            strength: 25.0,
        },
    },
    Skill {
        id: "barrier-field",
        name: "Barrier Field",
        energy_cost: 15,
        cooldown_turns: 4,
        range: 0,
        effect: SkillEffect::ApplyStatus {
            kind: StatusKind::Shielded,
            duration: 2,
            strength: 50.0,
        },
    },
];

/// Look up a skill by id. Fails closed on unknown ids.
pub fn skill(id: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}

/// All skills, in unlock order.
pub fn all_skills() -> &'static [Skill] {
    SKILLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(skill("pulse-strike").unwrap().energy_cost, 10);
        assert!(skill("missing-skill").is_none());
    }

    #[test]
    fn self_targeted_skills_have_zero_range() {
        let barrier = skill("barrier-field").unwrap();
        assert_eq!(barrier.range, 0);
        assert!(matches!(
            barrier.effect,
            SkillEffect::ApplyStatus {
                kind: StatusKind::Shielded,
                ..
            }
        ));
    }

    #[test]
    fn costs_positive_except_none() {
        for s in all_skills() {
            assert!(s.cooldown_turns >= 1, "{}", s.id);
            assert!(s.energy_cost > 0, "{}", s.id);
        }
    }
}
