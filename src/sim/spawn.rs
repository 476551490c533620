//! Spawn scheduling: enemy fire, bonus target and wave advancement
//!
//! Three independent accumulators compared against fixed periods.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Actor, BonusTarget, Body, Projectile, ShotSprite};
use super::events::{EventQueue, GameEvent};
use super::formation::Formation;
use crate::tuning::Tuning;

/// Wave counter and the formation step it implies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    /// 1-based
    pub number: u32,
    /// Formation displacement per step for this wave
    pub step: f32,
}

impl Wave {
    pub fn first(tuning: &Tuning) -> Self {
        Self {
            number: 1,
            step: tuning.base_step,
        }
    }

    /// Move to the next wave; the step always grows
    pub fn advance(&mut self, tuning: &Tuning) {
        self.number += 1;
        self.step += tuning.step_increment;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpawnScheduler {
    enemy_fire_ms: f32,
    bonus_ms: f32,
    /// Time since the formation emptied, while a new wave is pending
    wave_advance_ms: Option<f32>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire from a random eligible shooter once per period
    pub fn update_enemy_fire<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        formation: &Formation,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<Projectile> {
        self.enemy_fire_ms += dt_ms;
        if self.enemy_fire_ms < tuning.enemy_fire_interval_ms {
            return None;
        }
        self.enemy_fire_ms = 0.0;

        let shooters = formation.shooters();
        if shooters.is_empty() {
            return None;
        }
        let shooter = shooters[rng.random_range(0..shooters.len())];
        let sprite = ShotSprite::ENEMY[rng.random_range(0..ShotSprite::ENEMY.len())];
        let pos = shooter.body.pos + Vec2::new(0.0, tuning.enemy_shot_offset);
        log::trace!("Enemy shot from column {} row {}", shooter.column, shooter.row);
        Some(Projectile::enemy_shot(
            pos,
            tuning.enemy_shot_size,
            tuning.enemy_shot_speed,
            sprite,
        ))
    }

    /// Spawn, move and expire the bonus target
    pub fn update_bonus<R: Rng + ?Sized>(
        &mut self,
        dt_ms: f32,
        bonus: &mut Option<BonusTarget>,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut EventQueue,
    ) {
        self.bonus_ms += dt_ms;

        if bonus.as_ref().is_some_and(|b| !b.is_active()) {
            *bonus = None;
        }

        if let Some(target) = bonus.as_mut() {
            target.body.integrate(dt_ms);
            let x = target.body.pos.x;
            if x > tuning.bonus_max_x || x < tuning.bonus_min_x {
                *bonus = None;
                events.push(GameEvent::BonusExpired);
                log::debug!("Bonus target left the field");
            }
            return;
        }

        if self.bonus_ms >= tuning.bonus_interval_ms {
            self.bonus_ms = 0.0;
            let rightward = rng.random_bool(0.5);
            let (x, dir) = if rightward {
                (tuning.bonus_min_x, 1.0)
            } else {
                (tuning.bonus_max_x, -1.0)
            };
            let body = Body::new(Vec2::new(x, tuning.bonus_y), tuning.bonus_size)
                .with_velocity(Vec2::new(tuning.bonus_speed * dir, 0.0));
            *bonus = Some(BonusTarget { body });
            events.push(GameEvent::BonusSpawned);
            log::debug!("Bonus target spawned at x={}", x);
        }
    }

    /// Start the countdown to the next wave. Returns false if one is
    /// already running.
    pub fn notify_wave_cleared(&mut self) -> bool {
        if self.wave_advance_ms.is_some() {
            return false;
        }
        self.wave_advance_ms = Some(0.0);
        true
    }

    pub fn wave_pending(&self) -> bool {
        self.wave_advance_ms.is_some()
    }

    /// Returns true exactly once, when the wave delay has elapsed
    pub fn update_wave(&mut self, dt_ms: f32, tuning: &Tuning) -> bool {
        let Some(elapsed) = self.wave_advance_ms.as_mut() else {
            return false;
        };
        *elapsed += dt_ms;
        if *elapsed >= tuning.wave_advance_delay_ms {
            self.wave_advance_ms = None;
            return true;
        }
        false
    }
}
