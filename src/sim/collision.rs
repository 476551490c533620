//! Collision detection and resolution between actor sets
//!
//! Stateless: every function borrows the actors it needs for one call and
//! applies the outcome (deactivation, scoring, lifecycle hit, terrain damage)
//! immediately, so later checks in the same frame see it.

use glam::Vec2;
use rand::Rng;

use super::entity::{Aabb, Actor, BonusTarget, Player, Projectile, Side};
use super::events::{EventQueue, GameEvent};
use super::formation::Formation;
use super::lifecycle::Lifecycle;
use super::terrain::TerrainMask;
use crate::consts::MAX_SWEEP_SAMPLES;
use crate::ms_to_secs;
use crate::tuning::Tuning;

/// Outcome of player shots against the formation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormationHits {
    pub kills: u32,
    pub points: u64,
    /// The last unit fell during this pass
    pub cleared: bool,
}

/// Active actors only; inactive ones never take part in a collision
pub fn candidates<A: Actor>(actors: &mut [A]) -> impl Iterator<Item = &mut A> {
    actors.iter_mut().filter(|a| a.is_active())
}

/// Player shots against formation units (exact box overlap)
pub fn shots_vs_formation(
    shots: &mut [Projectile],
    formation: &mut Formation,
    events: &mut EventQueue,
) -> FormationHits {
    let mut hits = FormationHits::default();
    if formation.is_empty() {
        return hits;
    }

    for shot in candidates(shots).filter(|s| s.side == Side::Player) {
        let bounds = shot.bounds();
        let Some((column, row)) = formation
            .active_units()
            .find(|unit| unit.bounds().overlaps(&bounds))
            .map(|unit| (unit.column, unit.row))
        else {
            continue;
        };

        if let Some(kind) = formation.destroy(column, row) {
            shot.deactivate();
            let points = kind.points();
            hits.kills += 1;
            hits.points += u64::from(points);
            events.push(GameEvent::EnemyDestroyed(points));
            log::debug!("Unit ({}, {}) destroyed for {} points", column, row, points);
        }
    }

    hits.cleared = hits.kills > 0 && formation.is_empty();
    hits
}

/// Whether a shot lands on the bonus target: centre distance within a
/// tolerance wider than the sprite
#[inline]
pub fn bonus_hit(shot_pos: Vec2, target_pos: Vec2, tolerance: Vec2) -> bool {
    let d = (shot_pos - target_pos).abs();
    d.x < tolerance.x && d.y < tolerance.y
}

/// Player shots against the bonus target. Returns the points awarded.
pub fn shots_vs_bonus<R: Rng + ?Sized>(
    shots: &mut [Projectile],
    bonus: &mut Option<BonusTarget>,
    tuning: &Tuning,
    rng: &mut R,
    events: &mut EventQueue,
) -> u64 {
    let Some(target) = bonus.as_mut().filter(|b| b.is_active()) else {
        return 0;
    };

    for shot in candidates(shots).filter(|s| s.side == Side::Player) {
        if !bonus_hit(shot.body.pos, target.body.pos, tuning.bonus_hit_tolerance) {
            continue;
        }
        shot.deactivate();
        target.deactivate();
        let points = tuning.bonus_points[rng.random_range(0..tuning.bonus_points.len())];
        events.push(GameEvent::BonusDestroyed(points));
        log::debug!("Bonus target destroyed for {} points", points);
        return u64::from(points);
    }
    0
}

/// Enemy shots against the player (exact box overlap). Every touching shot is
/// consumed; only a vulnerable player takes the hit. Returns shots consumed.
pub fn shots_vs_player(
    shots: &mut [Projectile],
    player: &Player,
    lifecycle: &mut Lifecycle,
    score: u64,
    events: &mut EventQueue,
) -> usize {
    if !player.is_active() {
        return 0;
    }
    let bounds = player.bounds();
    let mut consumed = 0;

    for shot in candidates(shots).filter(|s| s.side == Side::Enemy) {
        if !shot.bounds().overlaps(&bounds) {
            continue;
        }
        shot.deactivate();
        consumed += 1;
        lifecycle.register_hit(score, events);
    }
    consumed
}

/// Length of path behind a shot that is checked this frame: the configured
/// window, or the whole hop if the shot moved further than that
fn sweep_span(shot: &Projectile, tuning: &Tuning, dt_ms: f32) -> f32 {
    let travelled = shot.body.vel.length() * ms_to_secs(dt_ms);
    tuning.sample_span.max(travelled)
}

/// Box covering the shot at both ends of its swept path
pub fn swept_bounds(shot: &Projectile, tuning: &Tuning, dt_ms: f32) -> Aabb {
    let tail = shot.body.pos - shot.heading() * sweep_span(shot, tuning, dt_ms);
    shot.bounds().union(&Aabb::from_center(tail, shot.body.size))
}

/// Points along the path a shot swept to reach its position, nearest first
pub fn sweep_samples(shot: &Projectile, tuning: &Tuning, dt_ms: f32) -> impl Iterator<Item = Vec2> + use<> {
    let back = -shot.heading();
    let origin = shot.body.pos;
    let step = tuning.sample_step;
    let count = ((sweep_span(shot, tuning, dt_ms) / step).floor() as usize + 1).min(MAX_SWEEP_SAMPLES);
    (0..count).map(move |k| origin + back * (k as f32 * step))
}

/// Shots of either side against barriers. The first sample on the swept path
/// that touches solid cells takes the hit; player shots blast a small radius,
/// enemy shots a large one. Returns the number of shots absorbed.
pub fn shots_vs_terrain(
    shots: &mut [Projectile],
    barriers: &mut [TerrainMask],
    tuning: &Tuning,
    dt_ms: f32,
    events: &mut EventQueue,
) -> usize {
    let mut absorbed = 0;

    for barrier in barriers.iter_mut().filter(|b| !b.is_destroyed()) {
        let hitbox = barrier.hitbox();
        for shot in candidates(shots) {
            if barrier.is_destroyed() {
                break;
            }
            if !swept_bounds(shot, tuning, dt_ms).overlaps(&hitbox) {
                continue;
            }
            let Some(impact) = sweep_samples(shot, tuning, dt_ms).find(|&p| barrier.has_cell_near(p, tuning.probe_radius))
            else {
                continue;
            };

            let radius = match shot.side {
                Side::Player => tuning.player_blast_radius,
                Side::Enemy => tuning.enemy_blast_radius,
            };
            let cleared = barrier.blast(impact, radius);
            shot.deactivate();
            absorbed += 1;
            log::trace!("Barrier hit at {:?}, {} cells cleared", impact, cleared);

            if barrier.is_destroyed() {
                events.push(GameEvent::BarrierDestroyed);
                log::debug!("Barrier destroyed");
            }
        }
    }
    absorbed
}
