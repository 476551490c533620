//! Enemy formation: a fixed grid of slots moving in lock-step
//!
//! Slots are never reflowed. A destroyed unit leaves an inactive slot behind,
//! so (column, row) stays meaningful for the whole wave.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Actor, Body, EnemyKind, EnemyUnit};
use crate::tuning::Tuning;

/// Outcome of one triggered formation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Direction flipped on this step
    pub reversed: bool,
    /// Whole formation dropped one row on this step
    pub descended: bool,
}

/// The enemy grid and its shared kinematics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    columns: usize,
    rows: usize,
    /// Row-major: `row * columns + column`
    slots: Vec<EnemyUnit>,
    active_units: usize,
    /// +1 right, -1 left
    direction: f32,
    /// Horizontal displacement per step
    step: f32,
    move_timer_ms: f32,
    anim_timer_ms: f32,
    anim_frame: u8,

    origin: Vec2,
    spacing: Vec2,
    unit_size: Vec2,
    descent: f32,
    left_margin: f32,
    right_margin: f32,
    base_interval_ms: f32,
    speedup: f32,
    anim_interval_ms: f32,
}

impl Formation {
    /// Full formation at the starting layout
    pub fn new(tuning: &Tuning, step: f32) -> Self {
        let mut formation = Self {
            columns: tuning.columns,
            rows: tuning.rows,
            slots: Vec::with_capacity(tuning.formation_size()),
            active_units: 0,
            direction: 1.0,
            step,
            move_timer_ms: 0.0,
            anim_timer_ms: 0.0,
            anim_frame: 0,
            origin: tuning.formation_origin,
            spacing: tuning.formation_spacing,
            unit_size: tuning.enemy_size,
            descent: tuning.descent,
            left_margin: tuning.left_margin,
            right_margin: tuning.right_margin,
            base_interval_ms: tuning.base_interval_ms,
            speedup: tuning.speedup,
            anim_interval_ms: tuning.anim_interval_ms,
        };
        formation.rebuild(step);
        formation
    }

    /// Restore every slot at the starting layout with a new step size
    pub fn rebuild(&mut self, step: f32) {
        self.slots.clear();
        for row in 0..self.rows {
            for column in 0..self.columns {
                let pos = self.origin + Vec2::new(column as f32, row as f32) * self.spacing;
                self.slots.push(EnemyUnit {
                    body: Body::new(pos, self.unit_size),
                    kind: EnemyKind::for_row(row),
                    column,
                    row,
                    anim_frame: 0,
                });
            }
        }
        self.active_units = self.slots.len();
        self.direction = 1.0;
        self.step = step;
        self.move_timer_ms = 0.0;
        self.anim_timer_ms = 0.0;
        self.anim_frame = 0;
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn anim_frame(&self) -> u8 {
        self.anim_frame
    }

    pub fn initial_units(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_units
    }

    pub fn is_empty(&self) -> bool {
        self.active_units == 0
    }

    /// Active units only
    pub fn active_units(&self) -> impl Iterator<Item = &EnemyUnit> {
        self.slots.iter().filter(|u| u.is_active())
    }

    pub fn unit(&self, column: usize, row: usize) -> Option<&EnemyUnit> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.slots.get(row * self.columns + column)
    }

    /// Destroy the unit in a slot. Returns its tier, or `None` if the slot
    /// was already empty.
    pub fn destroy(&mut self, column: usize, row: usize) -> Option<EnemyKind> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let unit = &mut self.slots[row * self.columns + column];
        if !unit.is_active() {
            return None;
        }
        unit.deactivate();
        self.active_units -= 1;
        Some(unit.kind)
    }

    /// Share of the formation destroyed so far (0.0 - 1.0)
    pub fn removed_fraction(&self) -> f32 {
        let total = self.slots.len();
        if total == 0 {
            return 0.0;
        }
        (total - self.active_units) as f32 / total as f32
    }

    /// Current time between steps; shrinks as the formation thins out
    pub fn move_interval(&self) -> f32 {
        self.base_interval_ms / (1.0 + self.removed_fraction() * self.speedup)
    }

    /// Accumulate time and step once the move interval has elapsed
    pub fn advance(&mut self, dt_ms: f32) -> Option<MovementEvent> {
        if self.is_empty() {
            return None;
        }
        self.move_timer_ms += dt_ms;
        if self.move_timer_ms < self.move_interval() {
            return None;
        }
        self.move_timer_ms = 0.0;
        Some(self.step_once())
    }

    fn step_once(&mut self) -> MovementEvent {
        let offset = self.step * self.direction;
        let crossing = self.active_units().any(|unit| {
            let next_x = unit.body.pos.x + offset;
            next_x > self.right_margin || next_x < self.left_margin
        });

        if crossing {
            self.direction = -self.direction;
        }

        let dx = self.step * self.direction;
        let dy = if crossing { self.descent } else { 0.0 };
        for unit in self.slots.iter_mut().filter(|u| u.body.active) {
            unit.body.pos += Vec2::new(dx, dy);
        }

        MovementEvent {
            reversed: crossing,
            descended: crossing,
        }
    }

    /// Toggle the shared animation frame on its own timer.
    /// Returns true when the frame flipped.
    pub fn animate(&mut self, dt_ms: f32) -> bool {
        self.anim_timer_ms += dt_ms;
        if self.anim_timer_ms < self.anim_interval_ms {
            return false;
        }
        self.anim_timer_ms = 0.0;
        self.anim_frame = 1 - self.anim_frame;
        let frame = self.anim_frame;
        for unit in self.slots.iter_mut().filter(|u| u.body.active) {
            unit.anim_frame = frame;
        }
        true
    }

    /// For each occupied column, the active unit nearest the base.
    /// Units move in lock-step, so that is the highest occupied row.
    pub fn shooters(&self) -> Vec<&EnemyUnit> {
        (0..self.columns)
            .filter_map(|column| {
                (0..self.rows)
                    .rev()
                    .map(|row| &self.slots[row * self.columns + column])
                    .find(|unit| unit.is_active())
            })
            .collect()
    }

    /// Whether any active unit has reached depth `y`
    pub fn reached_depth(&self, y: f32) -> bool {
        self.active_units().any(|unit| unit.body.pos.y >= y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn formation() -> Formation {
        let tuning = Tuning::default();
        Formation::new(&tuning, tuning.base_step)
    }

    #[test]
    fn test_initial_layout() {
        let f = formation();
        assert_eq!(f.initial_units(), 55);
        assert_eq!(f.active_count(), 55);
        assert_eq!(f.move_interval(), 1000.0);

        let corner = f.unit(10, 4).unwrap();
        assert_eq!(corner.body.pos, Vec2::new(150.0 + 480.0, 80.0 + 160.0));
        assert_eq!(f.unit(0, 0).unwrap().kind, EnemyKind::Low);
        assert_eq!(f.unit(0, 1).unwrap().kind, EnemyKind::Mid);
        assert_eq!(f.unit(0, 3).unwrap().kind, EnemyKind::High);
        assert!(f.unit(11, 0).is_none());
    }

    #[test]
    fn test_interval_after_five_kills() {
        let mut f = formation();
        for column in 0..5 {
            assert!(f.destroy(column, 4).is_some());
        }
        let expected = 1000.0 / (1.0 + (5.0 / 55.0) * 0.05);
        assert!((f.move_interval() - expected).abs() < 1e-3);
        assert!(f.move_interval() < 1000.0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut f = formation();
        assert_eq!(f.destroy(3, 2), Some(EnemyKind::Mid));
        assert_eq!(f.destroy(3, 2), None);
        assert_eq!(f.active_count(), 54);
        // Slot keeps its grid position after removal
        let slot = f.unit(3, 2).unwrap();
        assert!(!slot.is_active());
        assert_eq!((slot.column, slot.row), (3, 2));
    }

    #[test]
    fn test_steps_only_after_interval() {
        let mut f = formation();
        assert_eq!(f.advance(999.0), None);
        let event = f.advance(1.0).unwrap();
        assert!(!event.reversed && !event.descended);
        assert_eq!(f.unit(0, 0).unwrap().body.pos.x, 160.0);
        // Timer restarted
        assert_eq!(f.advance(500.0), None);
    }

    #[test]
    fn test_edge_reverses_and_descends_together() {
        let mut f = formation();
        // Rightmost column starts at 630 and may reach 750 in twelve steps
        for _ in 0..12 {
            let event = f.advance(1000.0).unwrap();
            assert!(!event.reversed);
        }
        assert_eq!(f.unit(10, 0).unwrap().body.pos.x, 750.0);

        let event = f.advance(1000.0).unwrap();
        assert!(event.reversed && event.descended);
        assert_eq!(f.direction(), -1.0);
        let unit = f.unit(10, 0).unwrap();
        assert_eq!(unit.body.pos, Vec2::new(740.0, 96.0));

        // Next step continues left without another descent
        let event = f.advance(1000.0).unwrap();
        assert!(!event.descended);
        assert_eq!(f.unit(10, 0).unwrap().body.pos, Vec2::new(730.0, 96.0));
    }

    #[test]
    fn test_destroyed_units_do_not_move() {
        let mut f = formation();
        f.destroy(0, 0);
        f.advance(1000.0);
        assert_eq!(f.unit(0, 0).unwrap().body.pos.x, 150.0);
        assert_eq!(f.unit(1, 0).unwrap().body.pos.x, 208.0);
    }

    #[test]
    fn test_empty_formation_never_steps() {
        let mut f = formation();
        for row in 0..5 {
            for column in 0..11 {
                f.destroy(column, row);
            }
        }
        assert!(f.is_empty());
        assert_eq!(f.advance(10_000.0), None);
        assert!(f.shooters().is_empty());
    }

    #[test]
    fn test_animation_decoupled_from_movement() {
        let mut f = formation();
        assert!(!f.animate(499.0));
        assert!(f.animate(1.0));
        assert!(f.active_units().all(|u| u.anim_frame == 1));
        assert!(f.animate(500.0));
        assert_eq!(f.anim_frame(), 0);
        // Movement timer untouched by animation
        assert_eq!(f.advance(999.0), None);
    }

    #[test]
    fn test_shooters_are_lowest_per_column() {
        let mut f = formation();
        assert_eq!(f.shooters().len(), 11);
        assert!(f.shooters().iter().all(|u| u.row == 4));

        f.destroy(2, 4);
        f.destroy(2, 3);
        for row in 0..5 {
            f.destroy(7, row);
        }
        let shooters = f.shooters();
        assert_eq!(shooters.len(), 10);
        let col2 = shooters.iter().find(|u| u.column == 2).unwrap();
        assert_eq!(col2.row, 2);
        assert!(shooters.iter().all(|u| u.column != 7));
    }

    #[test]
    fn test_rebuild_restores_layout() {
        let mut f = formation();
        f.destroy(0, 0);
        f.advance(1000.0);
        f.rebuild(12.0);
        assert_eq!(f.active_count(), 55);
        assert_eq!(f.step(), 12.0);
        assert_eq!(f.direction(), 1.0);
        assert_eq!(f.unit(0, 0).unwrap().body.pos, Vec2::new(150.0, 80.0));
    }

    #[test]
    fn test_reached_depth() {
        let f = formation();
        assert!(f.reached_depth(240.0));
        assert!(!f.reached_depth(240.5));
    }

    proptest! {
        #[test]
        fn prop_interval_shrinks_with_every_kill(order in Just((0..55usize).collect::<Vec<_>>()).prop_shuffle()) {
            let mut f = formation();
            let mut last = f.move_interval();
            for slot in order {
                f.destroy(slot % 11, slot / 11);
                let interval = f.move_interval();
                prop_assert!(interval < last);
                let expected = 1000.0 / (1.0 + f.removed_fraction() * 0.05);
                prop_assert!((interval - expected).abs() < 1e-3);
                last = interval;
            }
        }
    }
}
