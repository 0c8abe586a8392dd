//! The turn-based tactical combat engine.
//!
//! A combat session is a state machine: it starts active on the player's
//! turn and runs until every enemy is dead (victory), the player's health
//! reaches zero (defeat, reported upward), or an escape roll succeeds.
//! Enemies and the player share a 5×5 grid; the player starts at (4, 2)
//! and enemies fill the top rows in row-major order.
//!
//! The enemy phase is exposed as a drainable sequence of discrete
//! [`EnemyPhaseStep`]s so the UI can animate between them at its own pace;
//! draining fully is equivalent to a synchronous loop. Ordering is fixed:
//! enemies act in spawn order, then one housekeeping step decrements every
//! skill cooldown and status duration, increments the turn counter, and
//! hands control back to the player. No wall-clock timers anywhere.

pub mod skills;
pub mod status;

use std::collections::{HashMap, VecDeque};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::content::enemies::{enemy_template, AbilityTag, Behavior, Enemy};
use crate::error::ActionError;
use crate::player::EffectiveStats;
use gridfall_logic::damage::{
    check_hit, enemy_attack_damage, roll_damage, BASIC_ATTACK_ACCURACY, BASIC_ATTACK_BASE,
};
use gridfall_logic::grid::{Direction, Position};
use gridfall_logic::progression::{PlayerStats, ESCAPE_ENERGY_COST};
use skills::{skill, SkillEffect};
use status::{StatusKind, StatusList};

/// Side length of the combat grid.
pub const GRID_SIZE: i32 = 5;

/// The player's starting cell.
pub const PLAYER_START: Position = Position { row: 4, col: 2 };

/// Combat log capacity; the oldest entry is evicted beyond this.
pub const LOG_CAP: usize = 50;

/// Fixed escape success probability.
pub const ESCAPE_CHANCE: f32 = 0.7;

/// An enemy promoted into a combat session: grid position plus statuses.
/// Discarded when the session terminates, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEnemy {
    pub enemy: Enemy,
    pub position: Position,
    pub statuses: StatusList,
}

/// Which side owns the current turn. Exactly one side at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOwner {
    Player,
    Enemies,
}

/// Who performed a logged action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Enemy(u32),
}

/// One bounded combat log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    pub turn: u32,
    pub actor: Actor,
    pub action: String,
    pub result: Option<String>,
}

/// A single loot drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub item_id: String,
    pub quantity: u32,
}

/// Aggregated victory rewards. Loot is rolled one draw per loot-table
/// entry, in enemy-then-entry order, so outcomes are reproducible under a
/// fixed RNG sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRewards {
    pub xp: u64,
    pub points: u64,
    pub loot: Vec<LootDrop>,
}

/// Terminal state of a combat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatOutcome {
    Victory(CombatRewards),
    /// Player health reached zero; resolved by the caller, not in here.
    Defeat,
    Escaped,
}

/// Report of a resolved player attack or damage skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    pub target_id: u32,
    pub damage: u32,
    pub critical: bool,
    pub target_defeated: bool,
    /// Health restored, for life-drain skills.
    pub healed: u32,
}

/// One discrete step of the enemy phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyPhaseStep {
    /// A stunned enemy forfeits its action.
    Skipped { enemy_id: u32 },
    Attacked {
        enemy_id: u32,
        damage: u32,
        player_health: u32,
    },
    Moved { enemy_id: u32, to: Position },
    /// Both candidate approach cells were blocked.
    Waited { enemy_id: u32 },
    /// Cooldown/status decrements and the turn-counter increment.
    Housekeeping { player_poison_damage: u32 },
}

/// The live state of one combat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    pub enemies: Vec<CombatEnemy>,
    pub turn_owner: TurnOwner,
    /// Full player-then-enemy cycles completed, starting at 1.
    pub turn_count: u32,
    pub log: VecDeque<CombatLogEntry>,
    pub player_position: Position,
    pub player_defending: bool,
    pub player_statuses: StatusList,
    /// Remaining cooldown turns per skill id.
    pub cooldowns: HashMap<String, u32>,
    pub outcome: Option<CombatOutcome>,
    enemy_cursor: usize,
}

impl CombatState {
    /// Start a session: enemies fill the top rows in row-major order, the
    /// player starts at [`PLAYER_START`], and the player owns the first turn.
    pub fn new(enemies: Vec<Enemy>) -> Self {
        let placed = enemies
            .into_iter()
            .enumerate()
            .map(|(i, enemy)| CombatEnemy {
                enemy,
                position: Position::new(i as i32 / GRID_SIZE, i as i32 % GRID_SIZE),
                statuses: StatusList::default(),
            })
            .collect();
        Self {
            enemies: placed,
            turn_owner: TurnOwner::Player,
            turn_count: 1,
            log: VecDeque::new(),
            player_position: PLAYER_START,
            player_defending: false,
            player_statuses: StatusList::default(),
            cooldowns: HashMap::new(),
            outcome: None,
            enemy_cursor: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.outcome.is_none()
    }

    fn push_log(&mut self, actor: Actor, action: &str, result: Option<String>) {
        if self.log.len() == LOG_CAP {
            self.log.pop_front();
        }
        self.log.push_back(CombatLogEntry {
            turn: self.turn_count,
            actor,
            action: action.to_string(),
            result,
        });
    }

    fn ensure_player_turn(&self) -> Result<(), ActionError> {
        if !self.is_active() {
            return Err(ActionError::InvalidTarget {
                reason: "combat has ended".into(),
            });
        }
        if self.turn_owner != TurnOwner::Player {
            return Err(ActionError::InvalidTarget {
                reason: "not the player's turn".into(),
            });
        }
        Ok(())
    }

    fn alive_target(&self, index: usize) -> Result<&CombatEnemy, ActionError> {
        match self.enemies.get(index) {
            Some(e) if e.enemy.health > 0 => Ok(e),
            Some(_) => Err(ActionError::InvalidTarget {
                reason: "target is already down".into(),
            }),
            None => Err(ActionError::InvalidTarget {
                reason: "no such target".into(),
            }),
        }
    }

    fn cell_free(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.row < GRID_SIZE
            && pos.col >= 0
            && pos.col < GRID_SIZE
            && pos != self.player_position
            && !self
                .enemies
                .iter()
                .any(|e| e.enemy.health > 0 && e.position == pos)
    }

    /// Outgoing damage multiplier from the player's buff/weaken statuses.
    fn player_outgoing_multiplier(&self) -> f32 {
        1.0 + (self.player_statuses.strength_of(StatusKind::Buffed)
            - self.player_statuses.strength_of(StatusKind::Weakened))
            / 100.0
    }

    fn end_player_turn(&mut self) {
        if self.is_active() {
            self.turn_owner = TurnOwner::Enemies;
            self.enemy_cursor = 0;
        }
    }

    /// Victory check; sets the terminal outcome with rolled rewards when
    /// every enemy is down. No enemy turn is taken once all are dead.
    fn try_victory(&mut self, rng: &mut impl Rng) -> bool {
        if self.enemies.iter().all(|e| e.enemy.health == 0) {
            let rewards = self.roll_rewards(rng);
            debug!("combat won: {} xp", rewards.xp);
            self.outcome = Some(CombatOutcome::Victory(rewards));
            true
        } else {
            false
        }
    }

    fn roll_rewards(&self, rng: &mut impl Rng) -> CombatRewards {
        let xp: u64 = self.enemies.iter().map(|e| u64::from(e.enemy.xp_reward)).sum();
        let mut loot = Vec::new();
        // One draw per loot entry, enemies in spawn order.
        for combat_enemy in &self.enemies {
            let Some(template) = enemy_template(&combat_enemy.enemy.template_id) else {
                continue;
            };
            for entry in template.loot {
                if rng.gen::<f32>() < entry.chance {
                    let quantity = rng.gen_range(entry.min_quantity..=entry.max_quantity);
                    loot.push(LootDrop {
                        item_id: entry.item_id.to_string(),
                        quantity,
                    });
                }
            }
        }
        CombatRewards {
            xp,
            points: xp * 2,
            loot,
        }
    }

    fn deal_to_enemy(&mut self, index: usize, amount: u32) -> bool {
        let enemy = &mut self.enemies[index].enemy;
        enemy.health = enemy.health.saturating_sub(amount);
        enemy.health == 0
    }

    /// Basic attack against an adjacent enemy. Consumes the turn on success.
    pub fn player_attack(
        &mut self,
        target_index: usize,
        stats: &EffectiveStats,
        rng: &mut impl Rng,
    ) -> Result<AttackReport, ActionError> {
        self.ensure_player_turn()?;
        let target = self.alive_target(target_index)?;
        if target.position.manhattan(&self.player_position) > 1 {
            return Err(ActionError::InvalidTarget {
                reason: "target out of reach".into(),
            });
        }
        let target_id = target.enemy.id;
        let target_defense = target.enemy.defense;
        let vulnerable = target.statuses.strength_of(StatusKind::Vulnerable);

        // The default basic attack rolls at full accuracy against zero
        // evasion, so this is a deterministic hit.
        if !check_hit(BASIC_ATTACK_ACCURACY, 0, rng.gen::<f32>()) {
            self.push_log(Actor::Player, "attack", Some("missed".into()));
            self.end_player_turn();
            return Ok(AttackReport {
                target_id,
                damage: 0,
                critical: false,
                target_defeated: false,
                healed: 0,
            });
        }
        let result = roll_damage(
            BASIC_ATTACK_BASE,
            stats.attack_power,
            self.player_outgoing_multiplier(),
            target_defense,
            stats.crit_chance,
            stats.crit_damage,
            vulnerable,
            rng.gen::<f32>(),
        );
        let defeated = self.deal_to_enemy(target_index, result.amount);
        let crit_note = if result.critical { " (critical)" } else { "" };
        self.push_log(
            Actor::Player,
            "attack",
            Some(format!("{} damage{crit_note}", result.amount)),
        );
        if defeated {
            self.push_log(Actor::Enemy(target_id), "down", None);
        }

        if !self.try_victory(rng) {
            self.end_player_turn();
        }
        Ok(AttackReport {
            target_id,
            damage: result.amount,
            critical: result.critical,
            target_defeated: defeated,
            healed: 0,
        })
    }

    /// Use a skill. Requires energy and zero cooldown; ranged skills need a
    /// target within grid distance. Consumes the turn on success.
    pub fn player_skill(
        &mut self,
        skill_id: &str,
        target_index: Option<usize>,
        player: &mut PlayerStats,
        stats: &EffectiveStats,
        rng: &mut impl Rng,
    ) -> Result<Option<AttackReport>, ActionError> {
        self.ensure_player_turn()?;
        let skill = skill(skill_id).ok_or_else(|| ActionError::UnknownId(skill_id.to_string()))?;

        if let Some(remaining) = self.cooldowns.get(skill.id).copied().filter(|r| *r > 0) {
            return Err(ActionError::SkillOnCooldown {
                remaining_turns: remaining,
            });
        }
        if player.energy < skill.energy_cost {
            return Err(ActionError::InsufficientEnergy {
                required: skill.energy_cost,
                available: player.energy,
            });
        }

        let target_index = if skill.range > 0 {
            let index = target_index.ok_or_else(|| ActionError::InvalidTarget {
                reason: "skill requires a target".into(),
            })?;
            let target = self.alive_target(index)?;
            if target.position.manhattan(&self.player_position) > skill.range {
                return Err(ActionError::InvalidTarget {
                    reason: "target out of range".into(),
                });
            }
            Some(index)
        } else {
            None
        };
        // Every failure path must precede the energy/cooldown mutation.
        if target_index.is_none()
            && matches!(
                skill.effect,
                SkillEffect::Damage { .. } | SkillEffect::Drain { .. }
            )
        {
            return Err(ActionError::InvalidTarget {
                reason: "skill requires a target".into(),
            });
        }

        player.spend_energy(skill.energy_cost);
        self.cooldowns.insert(skill.id.to_string(), skill.cooldown_turns);

        let report = match skill.effect {
            SkillEffect::Damage { multiplier } | SkillEffect::Drain { multiplier } => {
                let Some(index) = target_index else {
                    return Err(ActionError::InvalidTarget {
                        reason: "skill requires a target".into(),
                    });
                };
                let target = &self.enemies[index];
                let target_id = target.enemy.id;
                let vulnerable = target.statuses.strength_of(StatusKind::Vulnerable);
                let result = roll_damage(
                    BASIC_ATTACK_BASE,
                    stats.attack_power,
                    multiplier * self.player_outgoing_multiplier(),
                    target.enemy.defense,
                    stats.crit_chance,
                    stats.crit_damage,
                    vulnerable,
                    rng.gen::<f32>(),
                );
                let defeated = self.deal_to_enemy(index, result.amount);
                let healed = if matches!(skill.effect, SkillEffect::Drain { .. }) {
                    let heal = result.amount / 2;
                    let before = player.health;
                    player.heal(heal);
                    player.health - before
                } else {
                    0
                };
                self.push_log(
                    Actor::Player,
                    skill.id,
                    Some(format!("{} damage", result.amount)),
                );
                if defeated {
                    self.push_log(Actor::Enemy(target_id), "down", None);
                }
                Some(AttackReport {
                    target_id,
                    damage: result.amount,
                    critical: result.critical,
                    target_defeated: defeated,
                    healed,
                })
            }
            SkillEffect::ApplyStatus {
                kind,
                duration,
                strength,
            } => {
                match target_index {
                    Some(index) => {
                        self.enemies[index].statuses.apply(kind, duration, strength);
                        self.push_log(Actor::Player, skill.id, Some(format!("{kind:?} applied")));
                    }
                    None => {
                        self.player_statuses.apply(kind, duration, strength);
                        self.push_log(Actor::Player, skill.id, Some(format!("{kind:?} gained")));
                    }
                }
                None
            }
        };

        if !self.try_victory(rng) {
            self.end_player_turn();
        }
        Ok(report)
    }

    /// Brace for the coming enemy phase: incoming damage is halved until
    /// housekeeping. Consumes the turn.
    pub fn player_defend(&mut self) -> Result<(), ActionError> {
        self.ensure_player_turn()?;
        self.player_defending = true;
        self.push_log(Actor::Player, "defend", None);
        self.end_player_turn();
        Ok(())
    }

    /// One-tile step onto an unoccupied, in-bounds cell. Consumes the turn.
    pub fn player_move(&mut self, direction: Direction) -> Result<Position, ActionError> {
        self.ensure_player_turn()?;
        let candidate = self.player_position.step(direction);
        if !self.cell_free(candidate) {
            return Err(ActionError::InvalidTarget {
                reason: "cell is blocked".into(),
            });
        }
        self.player_position = candidate;
        self.push_log(Actor::Player, "move", None);
        self.end_player_turn();
        Ok(candidate)
    }

    /// Attempt to flee. Requires energy ≥ the escape threshold; succeeds
    /// with fixed 70% probability, ending combat immediately with no
    /// rewards. Failure consumes the turn.
    pub fn player_escape(
        &mut self,
        player: &PlayerStats,
        rng: &mut impl Rng,
    ) -> Result<bool, ActionError> {
        self.ensure_player_turn()?;
        if player.energy < ESCAPE_ENERGY_COST {
            return Err(ActionError::InsufficientEnergy {
                required: ESCAPE_ENERGY_COST,
                available: player.energy,
            });
        }
        if rng.gen::<f32>() < ESCAPE_CHANCE {
            self.push_log(Actor::Player, "escape", Some("fled the fight".into()));
            self.outcome = Some(CombatOutcome::Escaped);
            Ok(true)
        } else {
            self.push_log(Actor::Player, "escape", Some("failed".into()));
            self.end_player_turn();
            Ok(false)
        }
    }

    /// Advance the enemy phase by one discrete step, or `None` when control
    /// is back with the player (or combat has ended). Enemies act in spawn
    /// order; the final step is always housekeeping.
    pub fn enemy_step(
        &mut self,
        player: &mut PlayerStats,
        player_defense: u32,
        rng: &mut impl Rng,
    ) -> Option<EnemyPhaseStep> {
        if !self.is_active() || self.turn_owner != TurnOwner::Enemies {
            return None;
        }
        while self.enemy_cursor < self.enemies.len() {
            let index = self.enemy_cursor;
            self.enemy_cursor += 1;
            if self.enemies[index].enemy.health == 0 {
                continue;
            }
            if self.enemies[index].statuses.has(StatusKind::Stunned) {
                let id = self.enemies[index].enemy.id;
                self.push_log(Actor::Enemy(id), "stunned", Some("turn skipped".into()));
                return Some(EnemyPhaseStep::Skipped { enemy_id: id });
            }
            let distance = self.enemies[index]
                .position
                .manhattan(&self.player_position);
            if distance <= 1 {
                return Some(self.enemy_attack(index, player, player_defense, rng));
            }
            return Some(self.enemy_approach(index));
        }
        Some(self.housekeeping(player, rng))
    }

    /// Drain the whole enemy phase synchronously.
    pub fn run_enemy_phase(
        &mut self,
        player: &mut PlayerStats,
        player_defense: u32,
        rng: &mut impl Rng,
    ) -> Vec<EnemyPhaseStep> {
        let mut steps = Vec::new();
        while let Some(step) = self.enemy_step(player, player_defense, rng) {
            steps.push(step);
        }
        steps
    }

    fn enemy_attack(
        &mut self,
        index: usize,
        player: &mut PlayerStats,
        player_defense: u32,
        rng: &mut impl Rng,
    ) -> EnemyPhaseStep {
        let id = self.enemies[index].enemy.id;
        let weakened = self.enemies[index].statuses.strength_of(StatusKind::Weakened);
        let attack =
            ((self.enemies[index].enemy.attack as f32) * (1.0 - weakened / 100.0)).floor() as u32;
        let damage = enemy_attack_damage(
            attack,
            player_defense,
            self.player_defending,
            self.player_statuses.has(StatusKind::Shielded),
        );
        player.take_damage(damage);
        self.push_log(
            Actor::Enemy(id),
            "attack",
            Some(format!("{damage} damage")),
        );

        self.apply_on_hit_abilities(index, rng);

        if player.health == 0 {
            self.outcome = Some(CombatOutcome::Defeat);
            self.push_log(Actor::Player, "down", None);
        }
        EnemyPhaseStep::Attacked {
            enemy_id: id,
            damage,
            player_health: player.health,
        }
    }

    fn apply_on_hit_abilities(&mut self, index: usize, rng: &mut impl Rng) {
        let Some(template) = enemy_template(&self.enemies[index].enemy.template_id) else {
            return;
        };
        for tag in template.abilities {
            match tag {
                AbilityTag::Venom => {
                    if rng.gen::<f32>() < 0.25 {
                        self.player_statuses.apply(StatusKind::Poison, 3, 2.0);
                    }
                }
                AbilityTag::Stagger => {
                    if rng.gen::<f32>() < 0.15 {
                        self.player_statuses.apply(StatusKind::Vulnerable, 2, 15.0);
                    }
                }
                AbilityTag::Corrode => {
                    if rng.gen::<f32>() < 0.20 {
                        self.player_statuses.apply(StatusKind::Weakened, 2, 20.0);
                    }
                }
            }
        }
    }

    /// Close distance by one step: horizontal first, vertical as fallback,
    /// wait if both candidate cells are blocked. Territorial enemies hold
    /// their ground instead.
    fn enemy_approach(&mut self, index: usize) -> EnemyPhaseStep {
        let id = self.enemies[index].enemy.id;
        if self.enemies[index].enemy.behavior == Behavior::Territorial {
            return EnemyPhaseStep::Waited { enemy_id: id };
        }
        let from = self.enemies[index].position;
        let target = self.player_position;

        let mut candidates = Vec::with_capacity(2);
        if target.col != from.col {
            let step = if target.col > from.col { 1 } else { -1 };
            candidates.push(Position::new(from.row, from.col + step));
        }
        if target.row != from.row {
            let step = if target.row > from.row { 1 } else { -1 };
            candidates.push(Position::new(from.row + step, from.col));
        }
        for candidate in candidates {
            if self.cell_free(candidate) {
                self.enemies[index].position = candidate;
                return EnemyPhaseStep::Moved {
                    enemy_id: id,
                    to: candidate,
                };
            }
        }
        EnemyPhaseStep::Waited { enemy_id: id }
    }

    /// End-of-phase housekeeping: cooldowns, then statuses, then the turn
    /// counter; exactly once per enemy phase.
    fn housekeeping(&mut self, player: &mut PlayerStats, rng: &mut impl Rng) -> EnemyPhaseStep {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        for combat_enemy in &mut self.enemies {
            let poison = combat_enemy.statuses.tick();
            if combat_enemy.enemy.health > 0 {
                combat_enemy.enemy.health = combat_enemy.enemy.health.saturating_sub(poison);
            }
        }
        let player_poison = self.player_statuses.tick();
        player.take_damage(player_poison);

        self.player_defending = false;
        self.turn_count += 1;
        self.turn_owner = TurnOwner::Player;
        self.enemy_cursor = 0;

        if player.health == 0 {
            self.outcome = Some(CombatOutcome::Defeat);
        } else {
            self.try_victory(rng);
        }
        EnemyPhaseStep::Housekeeping {
            player_poison_damage: player_poison,
        }
    }
}
