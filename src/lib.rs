//! Pixel Invaders - simulation core for a fixed-formation arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation, collisions, lifecycle, waves)
//! - `tuning`: Data-driven game balance
//! - `scores`: Recent score and top-five table handed to the host for storage

pub mod scores;
pub mod sim;
pub mod tuning;

pub use scores::ScoreBoard;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Times are milliseconds, distances are pixels, speeds are pixels per second.
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Formation layout (11 columns x 5 rows)
    pub const FORMATION_COLUMNS: usize = 11;
    pub const FORMATION_ROWS: usize = 5;
    pub const FORMATION_ORIGIN_X: f32 = 150.0;
    pub const FORMATION_ORIGIN_Y: f32 = 80.0;
    pub const FORMATION_SPACING_X: f32 = 48.0;
    pub const FORMATION_SPACING_Y: f32 = 40.0;
    /// Units may not step past these x coordinates
    pub const FORMATION_LEFT_MARGIN: f32 = 50.0;
    pub const FORMATION_RIGHT_MARGIN: f32 = 750.0;
    /// Horizontal displacement per step on wave 1
    pub const FORMATION_BASE_STEP: f32 = 10.0;
    /// Added to the step displacement on every new wave
    pub const FORMATION_STEP_INCREMENT: f32 = 2.0;
    pub const FORMATION_DESCENT: f32 = 16.0;
    pub const FORMATION_BASE_INTERVAL_MS: f32 = 1000.0;
    /// Move-interval speedup per fraction of the formation destroyed
    pub const FORMATION_SPEEDUP: f32 = 0.05;
    pub const FORMATION_ANIM_INTERVAL_MS: f32 = 500.0;
    pub const ENEMY_WIDTH: f32 = 24.0;
    pub const ENEMY_HEIGHT: f32 = 16.0;

    /// Player
    pub const PLAYER_SPAWN_X: f32 = 400.0;
    pub const PLAYER_SPAWN_Y: f32 = 550.0;
    pub const PLAYER_WIDTH: f32 = 31.2;
    pub const PLAYER_HEIGHT: f32 = 18.2;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_LIVES: u32 = 3;
    pub const PLAYER_FIRE_COOLDOWN_MS: f32 = 500.0;
    /// Loss line sits this far above the player's depth
    pub const INTRUSION_MARGIN: f32 = 20.0;

    /// Lifecycle timers
    pub const EXPLODE_MS: f32 = 1000.0;
    pub const INVINCIBLE_MS: f32 = 2000.0;
    pub const BLINK_INTERVAL_MS: f32 = 200.0;
    pub const GAME_OVER_DELAY_MS: f32 = 3000.0;

    /// Projectiles
    pub const PLAYER_SHOT_SPEED: f32 = 300.0;
    pub const PLAYER_SHOT_OFFSET: f32 = 20.0;
    pub const PLAYER_SHOT_WIDTH: f32 = 4.0;
    pub const PLAYER_SHOT_HEIGHT: f32 = 8.0;
    pub const ENEMY_SHOT_SPEED: f32 = 150.0;
    pub const ENEMY_SHOT_OFFSET: f32 = 20.0;
    pub const ENEMY_SHOT_SIZE: f32 = 8.0;
    pub const ENEMY_FIRE_INTERVAL_MS: f32 = 1000.0;

    /// Bonus target
    pub const BONUS_INTERVAL_MS: f32 = 25000.0;
    pub const BONUS_SPEED: f32 = 100.0;
    pub const BONUS_Y: f32 = 50.0;
    /// Spawn and exit bounds (off-screen on both sides)
    pub const BONUS_MIN_X: f32 = -50.0;
    pub const BONUS_MAX_X: f32 = 850.0;
    pub const BONUS_WIDTH: f32 = 54.6;
    pub const BONUS_HEIGHT: f32 = 13.0;
    /// Hit tolerance, wider than the sprite to catch the fast-moving target
    pub const BONUS_HIT_DX: f32 = 25.0;
    pub const BONUS_HIT_DY: f32 = 15.0;
    pub const BONUS_POINTS: [u32; 6] = [50, 100, 150, 200, 250, 300];

    /// Waves
    pub const WAVE_ADVANCE_DELAY_MS: f32 = 2000.0;

    /// Barriers
    pub const BARRIER_CENTERS_X: [f32; 4] = [100.0, 300.0, 500.0, 700.0];
    pub const BARRIER_TOP_Y: f32 = 460.0;
    pub const BARRIER_CELL_SIZE: f32 = 4.05;
    /// Cells around a sample point that count as solid
    pub const BARRIER_PROBE_RADIUS: i32 = 2;
    pub const PLAYER_SHOT_BLAST_RADIUS: i32 = 3;
    pub const ENEMY_SHOT_BLAST_RADIUS: i32 = 6;
    /// Swept-path sampling against barriers
    pub const BARRIER_SAMPLE_SPAN: f32 = 10.0;
    pub const BARRIER_SAMPLE_STEP: f32 = 2.0;
    /// Smallest accepted sample step
    pub const MIN_SAMPLE_STEP: f32 = 0.5;
    /// Upper bound on samples taken along one shot's path per frame
    pub const MAX_SWEEP_SAMPLES: usize = 4096;

    /// Barrier bitmap, `1` = solid
    pub const BARRIER_SHAPE: [&str; 16] = [
        "0001111111111111110000",
        "0011111111111111111000",
        "0111111111111111111100",
        "1111111111111111111110",
        "1111111111111111111111",
        "1111111111111111111111",
        "1111111111111111111111",
        "1111111111111111111111",
        "1111111111111111111111",
        "1111111111111111111111",
        "1111110000000001111111",
        "1111100000000000111111",
        "1111000000000000011111",
        "1110000000000000001111",
        "1110000000000000001111",
        "1110000000000000001111",
    ];
}

/// Convert a millisecond delta into seconds for velocity integration
#[inline]
pub fn ms_to_secs(dt_ms: f32) -> f32 {
    dt_ms / 1000.0
}
