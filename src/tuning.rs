//! Game balance and layout parameters
//!
//! Defaults reproduce the arcade layout from `consts`. Hosts may load a JSON
//! override; missing fields fall back to the defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value: {0}")]
    Invalid(String),
}

/// Balance and layout parameters for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Formation ===
    pub columns: usize,
    pub rows: usize,
    pub formation_origin: Vec2,
    pub formation_spacing: Vec2,
    pub left_margin: f32,
    pub right_margin: f32,
    pub base_step: f32,
    pub step_increment: f32,
    pub descent: f32,
    pub base_interval_ms: f32,
    pub speedup: f32,
    pub anim_interval_ms: f32,
    pub enemy_size: Vec2,

    // === Player ===
    pub player_spawn: Vec2,
    pub player_size: Vec2,
    pub player_speed: f32,
    pub lives: u32,
    pub fire_cooldown_ms: f32,
    pub intrusion_margin: f32,
    pub explode_ms: f32,
    pub invincible_ms: f32,
    pub blink_interval_ms: f32,
    pub game_over_delay_ms: f32,

    // === Projectiles ===
    pub player_shot_speed: f32,
    pub player_shot_offset: f32,
    pub player_shot_size: Vec2,
    pub enemy_shot_speed: f32,
    pub enemy_shot_offset: f32,
    pub enemy_shot_size: Vec2,
    pub enemy_fire_interval_ms: f32,

    // === Bonus target ===
    pub bonus_interval_ms: f32,
    pub bonus_speed: f32,
    pub bonus_y: f32,
    pub bonus_min_x: f32,
    pub bonus_max_x: f32,
    pub bonus_size: Vec2,
    pub bonus_hit_tolerance: Vec2,
    pub bonus_points: Vec<u32>,

    // === Waves ===
    pub wave_advance_delay_ms: f32,

    // === Barriers ===
    pub barrier_centers_x: Vec<f32>,
    pub barrier_top_y: f32,
    pub barrier_cell_size: f32,
    pub barrier_shape: Vec<String>,
    pub probe_radius: i32,
    pub player_blast_radius: i32,
    pub enemy_blast_radius: i32,
    pub sample_span: f32,
    pub sample_step: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            columns: FORMATION_COLUMNS,
            rows: FORMATION_ROWS,
            formation_origin: Vec2::new(FORMATION_ORIGIN_X, FORMATION_ORIGIN_Y),
            formation_spacing: Vec2::new(FORMATION_SPACING_X, FORMATION_SPACING_Y),
            left_margin: FORMATION_LEFT_MARGIN,
            right_margin: FORMATION_RIGHT_MARGIN,
            base_step: FORMATION_BASE_STEP,
            step_increment: FORMATION_STEP_INCREMENT,
            descent: FORMATION_DESCENT,
            base_interval_ms: FORMATION_BASE_INTERVAL_MS,
            speedup: FORMATION_SPEEDUP,
            anim_interval_ms: FORMATION_ANIM_INTERVAL_MS,
            enemy_size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),

            player_spawn: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            player_speed: PLAYER_SPEED,
            lives: PLAYER_LIVES,
            fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            intrusion_margin: INTRUSION_MARGIN,
            explode_ms: EXPLODE_MS,
            invincible_ms: INVINCIBLE_MS,
            blink_interval_ms: BLINK_INTERVAL_MS,
            game_over_delay_ms: GAME_OVER_DELAY_MS,

            player_shot_speed: PLAYER_SHOT_SPEED,
            player_shot_offset: PLAYER_SHOT_OFFSET,
            player_shot_size: Vec2::new(PLAYER_SHOT_WIDTH, PLAYER_SHOT_HEIGHT),
            enemy_shot_speed: ENEMY_SHOT_SPEED,
            enemy_shot_offset: ENEMY_SHOT_OFFSET,
            enemy_shot_size: Vec2::splat(ENEMY_SHOT_SIZE),
            enemy_fire_interval_ms: ENEMY_FIRE_INTERVAL_MS,

            bonus_interval_ms: BONUS_INTERVAL_MS,
            bonus_speed: BONUS_SPEED,
            bonus_y: BONUS_Y,
            bonus_min_x: BONUS_MIN_X,
            bonus_max_x: BONUS_MAX_X,
            bonus_size: Vec2::new(BONUS_WIDTH, BONUS_HEIGHT),
            bonus_hit_tolerance: Vec2::new(BONUS_HIT_DX, BONUS_HIT_DY),
            bonus_points: BONUS_POINTS.to_vec(),

            wave_advance_delay_ms: WAVE_ADVANCE_DELAY_MS,

            barrier_centers_x: BARRIER_CENTERS_X.to_vec(),
            barrier_top_y: BARRIER_TOP_Y,
            barrier_cell_size: BARRIER_CELL_SIZE,
            barrier_shape: BARRIER_SHAPE.iter().map(|row| row.to_string()).collect(),
            probe_radius: BARRIER_PROBE_RADIUS,
            player_blast_radius: PLAYER_SHOT_BLAST_RADIUS,
            enemy_blast_radius: ENEMY_SHOT_BLAST_RADIUS,
            sample_span: BARRIER_SAMPLE_SPAN,
            sample_step: BARRIER_SAMPLE_STEP,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for writing a starter override file)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("base_interval_ms", self.base_interval_ms),
            ("anim_interval_ms", self.anim_interval_ms),
            ("enemy_fire_interval_ms", self.enemy_fire_interval_ms),
            ("bonus_interval_ms", self.bonus_interval_ms),
            ("blink_interval_ms", self.blink_interval_ms),
            ("barrier_cell_size", self.barrier_cell_size),
            ("sample_step", self.sample_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.columns == 0 || self.rows == 0 {
            return Err(TuningError::Invalid(format!(
                "formation must have at least one slot, got {}x{}",
                self.columns, self.rows
            )));
        }
        if self.left_margin >= self.right_margin {
            return Err(TuningError::Invalid(format!(
                "left_margin {} must be below right_margin {}",
                self.left_margin, self.right_margin
            )));
        }
        if self.step_increment <= 0.0 {
            return Err(TuningError::Invalid(
                "step_increment must be positive so waves get harder".to_string(),
            ));
        }
        if self.bonus_points.is_empty() {
            return Err(TuningError::Invalid("bonus_points is empty".to_string()));
        }
        if self.bonus_min_x >= self.bonus_max_x {
            return Err(TuningError::Invalid(format!(
                "bonus_min_x {} must be below bonus_max_x {}",
                self.bonus_min_x, self.bonus_max_x
            )));
        }

        let width = self.barrier_shape.first().map(|row| row.len()).unwrap_or(0);
        if width == 0 {
            return Err(TuningError::Invalid("barrier_shape is empty".to_string()));
        }
        if let Some(row) = self.barrier_shape.iter().find(|row| row.len() != width) {
            return Err(TuningError::Invalid(format!(
                "barrier_shape rows must all be {width} wide, found {:?}",
                row
            )));
        }
        // A radius larger than the grid clears nothing more
        let extent = width.max(self.barrier_shape.len()) as i32;
        let radii = [
            ("probe_radius", self.probe_radius),
            ("player_blast_radius", self.player_blast_radius),
            ("enemy_blast_radius", self.enemy_blast_radius),
        ];
        for (name, radius) in radii {
            if !(0..=extent).contains(&radius) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be within 0..={extent} cells, got {radius}"
                )));
            }
        }
        if self.sample_step < MIN_SAMPLE_STEP {
            return Err(TuningError::Invalid(format!(
                "sample_step must be at least {MIN_SAMPLE_STEP}, got {}",
                self.sample_step
            )));
        }

        Ok(())
    }

    /// Depth at which the formation counts as having landed
    pub fn loss_line(&self) -> f32 {
        self.player_spawn.y - self.intrusion_margin
    }

    /// Total formation slots
    pub fn formation_size(&self) -> usize {
        self.columns * self.rows
    }
}
