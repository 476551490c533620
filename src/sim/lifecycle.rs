//! Player lifecycle state machine
//!
//! Active -> Exploding -> Respawning -> Invincible -> Active, with Dead as the
//! terminal loss state. All timers are accumulated frame deltas.

use serde::{Deserialize, Serialize};

use super::events::{EventQueue, GameEvent};
use crate::tuning::Tuning;

/// Player lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeState {
    /// Vulnerable, accepts input
    Active,
    /// Just hit; input ignored until the explosion finishes
    Exploding,
    /// Waiting for the simulation to place a fresh ship
    Respawning,
    /// Fresh ship, blinking, immune to hits
    Invincible,
    /// Match lost
    Dead,
}

/// Work the owner of the player entity must do after `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeTransition {
    /// Create a new player at the spawn point, then call `finish_respawn`
    Respawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lifecycle {
    lives: u32,
    state: LifeState,
    /// Time spent in the current state
    state_ms: f32,
    fire_cooldown_ms: f32,
    visible: bool,

    explode_ms: f32,
    invincible_ms: f32,
    blink_interval_ms: f32,
    game_over_delay_ms: f32,
    fire_cooldown_total_ms: f32,
}

impl Lifecycle {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lives: tuning.lives,
            state: LifeState::Active,
            state_ms: 0.0,
            fire_cooldown_ms: 0.0,
            visible: true,
            explode_ms: tuning.explode_ms,
            invincible_ms: tuning.invincible_ms,
            blink_interval_ms: tuning.blink_interval_ms,
            game_over_delay_ms: tuning.game_over_delay_ms,
            fire_cooldown_total_ms: tuning.fire_cooldown_ms,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn state(&self) -> LifeState {
        self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state == LifeState::Dead
    }

    /// Only an Active player can be hit
    pub fn is_vulnerable(&self) -> bool {
        self.state == LifeState::Active
    }

    /// Movement and fire are honoured while Active or Invincible
    pub fn accepts_input(&self) -> bool {
        matches!(self.state, LifeState::Active | LifeState::Invincible)
    }

    /// Whether the ship should be drawn this frame
    pub fn player_visible(&self) -> bool {
        self.visible
    }

    /// The post-game-over delay has elapsed; the host may leave the match
    pub fn match_ended(&self) -> bool {
        self.is_dead() && self.state_ms >= self.game_over_delay_ms
    }

    /// Advance timers. May request a respawn from the caller.
    pub fn update(&mut self, dt_ms: f32, events: &mut EventQueue) -> Option<LifeTransition> {
        self.fire_cooldown_ms = (self.fire_cooldown_ms - dt_ms).max(0.0);

        match self.state {
            LifeState::Active | LifeState::Respawning => None,
            LifeState::Exploding => {
                self.state_ms += dt_ms;
                if self.state_ms >= self.explode_ms {
                    self.enter(LifeState::Respawning);
                    return Some(LifeTransition::Respawn);
                }
                None
            }
            LifeState::Invincible => {
                self.state_ms += dt_ms;
                if self.state_ms >= self.invincible_ms {
                    self.enter(LifeState::Active);
                    self.set_visible(true, events);
                    return None;
                }
                let phase = (self.state_ms / self.blink_interval_ms).floor() as u32;
                self.set_visible(phase % 2 == 0, events);
                None
            }
            LifeState::Dead => {
                self.state_ms += dt_ms;
                None
            }
        }
    }

    /// Called once the new ship is in place
    pub fn finish_respawn(&mut self, events: &mut EventQueue) {
        if self.state != LifeState::Respawning {
            return;
        }
        self.enter(LifeState::Invincible);
        self.visible = true;
        events.push(GameEvent::PlayerRespawned);
    }

    /// Apply a confirmed hit. Ignored unless Active. Returns true if a life
    /// was lost.
    pub fn register_hit(&mut self, score: u64, events: &mut EventQueue) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.fire_cooldown_ms = 0.0;
        events.push(GameEvent::PlayerHit);
        log::debug!("Player hit, {} lives left", self.lives);

        if self.lives == 0 {
            self.game_over(score, events);
        } else {
            self.enter(LifeState::Exploding);
            self.visible = false;
        }
        true
    }

    /// Enter Dead and announce the final score. Idempotent.
    pub fn game_over(&mut self, score: u64, events: &mut EventQueue) -> bool {
        if self.is_dead() {
            return false;
        }
        self.enter(LifeState::Dead);
        self.visible = false;
        events.push(GameEvent::GameOver(score));
        log::info!("Game over: score {}, {} lives left", score, self.lives);
        true
    }

    /// Gate a fire request: input accepted, nothing in flight, cooldown done.
    /// Starts the cooldown when it succeeds.
    pub fn try_fire(&mut self, shot_in_flight: bool) -> bool {
        if !self.accepts_input() || shot_in_flight || self.fire_cooldown_ms > 0.0 {
            return false;
        }
        self.fire_cooldown_ms = self.fire_cooldown_total_ms;
        true
    }

    fn enter(&mut self, state: LifeState) {
        self.state = state;
        self.state_ms = 0.0;
    }

    fn set_visible(&mut self, visible: bool, events: &mut EventQueue) {
        if self.visible != visible {
            self.visible = visible;
            events.push(GameEvent::BlinkToggled(visible));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifecycle() -> (Lifecycle, EventQueue) {
        (Lifecycle::new(&Tuning::default()), EventQueue::new())
    }

    #[test]
    fn test_hit_while_active_costs_one_life() {
        let (mut life, mut events) = lifecycle();
        assert!(life.register_hit(0, &mut events));
        assert_eq!(life.lives(), 2);
        assert_eq!(life.state(), LifeState::Exploding);
        assert_eq!(events.drain(), vec![GameEvent::PlayerHit]);
    }

    #[test]
    fn test_full_respawn_cycle() {
        let (mut life, mut events) = lifecycle();
        life.register_hit(0, &mut events);
        assert!(!life.accepts_input());

        assert_eq!(life.update(999.0, &mut events), None);
        assert_eq!(life.update(1.0, &mut events), Some(LifeTransition::Respawn));
        assert_eq!(life.state(), LifeState::Respawning);
        assert!(!life.register_hit(0, &mut events));

        life.finish_respawn(&mut events);
        assert_eq!(life.state(), LifeState::Invincible);
        assert!(life.accepts_input());
        assert!(!life.register_hit(0, &mut events));
        assert_eq!(life.lives(), 2);

        life.update(2000.0, &mut events);
        assert_eq!(life.state(), LifeState::Active);
        assert!(life.player_visible());
        assert!(life.is_vulnerable());
    }

    #[test]
    fn test_invincibility_blinks_every_200ms() {
        let (mut life, mut events) = lifecycle();
        life.register_hit(0, &mut events);
        life.update(1000.0, &mut events);
        life.finish_respawn(&mut events);
        events.drain();

        let mut toggles = Vec::new();
        for _ in 0..19 {
            life.update(100.0, &mut events);
            assert_eq!(life.state(), LifeState::Invincible);
            toggles.extend(events.drain());
        }
        // 100ms steps: hidden at 200, shown at 400, ... hidden at 1800
        assert_eq!(toggles.len(), 9);
        assert_eq!(toggles[0], GameEvent::BlinkToggled(false));
        assert_eq!(toggles[1], GameEvent::BlinkToggled(true));

        life.update(100.0, &mut events);
        assert_eq!(life.state(), LifeState::Active);
        assert_eq!(events.drain(), vec![GameEvent::BlinkToggled(true)]);
    }

    #[test]
    fn test_last_life_goes_straight_to_dead() {
        let tuning = Tuning {
            lives: 1,
            ..Tuning::default()
        };
        let mut life = Lifecycle::new(&tuning);
        let mut events = EventQueue::new();

        assert!(life.register_hit(420, &mut events));
        assert_eq!(life.lives(), 0);
        assert_eq!(life.state(), LifeState::Dead);
        assert_eq!(events.drain(), vec![GameEvent::PlayerHit, GameEvent::GameOver(420)]);

        // Nothing brings it back
        assert_eq!(life.update(5000.0, &mut events), None);
        assert_eq!(life.state(), LifeState::Dead);
        life.finish_respawn(&mut events);
        assert_eq!(life.state(), LifeState::Dead);
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut life, mut events) = lifecycle();
        assert!(life.game_over(100, &mut events));
        assert!(!life.game_over(200, &mut events));
        assert!(!life.register_hit(200, &mut events));
        assert_eq!(events.drain(), vec![GameEvent::GameOver(100)]);
        assert_eq!(life.lives(), 3);
    }

    #[test]
    fn test_match_ends_after_delay() {
        let (mut life, mut events) = lifecycle();
        life.game_over(0, &mut events);
        life.update(2999.0, &mut events);
        assert!(!life.match_ended());
        life.update(1.0, &mut events);
        assert!(life.match_ended());
    }

    #[test]
    fn test_fire_gating() {
        let (mut life, mut events) = lifecycle();
        assert!(!life.try_fire(true));
        assert!(life.try_fire(false));
        // Cooldown holds even with nothing in flight
        assert!(!life.try_fire(false));
        life.update(499.0, &mut events);
        assert!(!life.try_fire(false));
        life.update(1.0, &mut events);
        assert!(life.try_fire(false));

        life.register_hit(0, &mut events);
        life.update(600.0, &mut events);
        assert!(!life.try_fire(false));
    }
}
