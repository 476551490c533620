//! Simulation state
//!
//! The `Simulation` owns every entity, the formation, the barriers and the
//! collaborators (lifecycle, scheduler, event queue). Nothing is global, so a
//! match is just a value: build one per match and drop it afterwards.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{BonusTarget, Player, Projectile};
use super::events::{EventQueue, GameEvent};
use super::formation::Formation;
use super::lifecycle::Lifecycle;
use super::spawn::{SpawnScheduler, Wave};
use super::terrain::TerrainMask;
use super::tick::{FrameInput, tick};
use crate::tuning::{Tuning, TuningError};

/// Complete match state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub score: u64,
    pub wave: Wave,
    /// Frames simulated so far
    pub frame: u64,
    /// Total simulated time
    pub time_ms: f64,
    pub player: Player,
    pub lifecycle: Lifecycle,
    pub formation: Formation,
    /// Barriers still standing (destroyed ones are retired)
    pub barriers: Vec<TerrainMask>,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub bonus: Option<BonusTarget>,
    pub scheduler: SpawnScheduler,
    pub events: EventQueue,
}

impl Simulation {
    /// New match with the default arcade tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// New match with custom tuning (validated first)
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let wave = Wave::first(&tuning);
        log::info!("New match, seed {}", seed);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            wave,
            frame: 0,
            time_ms: 0.0,
            player: Player::new(tuning.player_spawn, tuning.player_size),
            lifecycle: Lifecycle::new(&tuning),
            formation: Formation::new(&tuning, wave.step),
            barriers: Self::build_barriers(&tuning),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            bonus: None,
            scheduler: SpawnScheduler::new(),
            events: EventQueue::new(),
            tuning,
        }
    }

    /// One barrier per configured centre, all intact
    pub fn build_barriers(tuning: &Tuning) -> Vec<TerrainMask> {
        tuning
            .barrier_centers_x
            .iter()
            .map(|&x| {
                TerrainMask::centered(x, tuning.barrier_top_y, tuning.barrier_cell_size, &tuning.barrier_shape)
            })
            .collect()
    }

    /// Replace the player with a fresh ship at the spawn point
    pub fn spawn_player(&mut self) {
        self.player = Player::new(self.tuning.player_spawn, self.tuning.player_size);
    }

    /// Advance one frame
    pub fn update(&mut self, input: &FrameInput, dt_ms: f32) {
        tick(self, input, dt_ms);
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn player_shot_in_flight(&self) -> bool {
        self.player_shots.iter().any(|s| s.body.active)
    }

    pub fn is_over(&self) -> bool {
        self.lifecycle.is_dead()
    }

    /// Game over and the end-of-match delay has elapsed
    pub fn match_ended(&self) -> bool {
        self.lifecycle.match_ended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle::LifeState;

    #[test]
    fn test_new_match() {
        let sim = Simulation::new(1);
        assert_eq!(sim.score, 0);
        assert_eq!(sim.wave.number, 1);
        assert_eq!(sim.formation.active_count(), 55);
        assert_eq!(sim.barriers.len(), 4);
        assert_eq!(sim.lifecycle.lives(), 3);
        assert_eq!(sim.lifecycle.state(), LifeState::Active);
        assert_eq!(sim.player.body.pos, sim.tuning.player_spawn);
        assert!(sim.bonus.is_none());
        assert!(!sim.player_shot_in_flight());
    }

    #[test]
    fn test_barriers_centred_on_configured_x() {
        let sim = Simulation::new(1);
        for (barrier, &x) in sim.barriers.iter().zip(&sim.tuning.barrier_centers_x) {
            let hitbox = barrier.hitbox();
            assert!(((hitbox.min.x + hitbox.max.x) / 2.0 - x).abs() < 1e-3);
            assert_eq!(hitbox.min.y, 460.0);
            assert!(!barrier.is_destroyed());
        }
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            bonus_points: Vec::new(),
            ..Tuning::default()
        };
        assert!(Simulation::with_tuning(1, tuning).is_err());
    }
}
