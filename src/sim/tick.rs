//! Per-frame simulation step
//!
//! Advances the match by one host frame. Stage order matters and is fixed:
//!
//! 0. integrate projectiles, player shots vs formation
//! 1. lifecycle timers (respawn places a new ship)
//! 2. movement and fire input, if the lifecycle accepts it
//! 3. enemy shots vs player, every frame
//! 4. formation step
//! 5. formation animation
//! 6. enemy fire
//! 7. bonus target and wave-advance timers
//! 8. player shots vs bonus target
//! 9. shots vs barriers
//! 10. cleanup of spent and off-field actors
//! 11. loss check (formation reached the player's depth)

use glam::Vec2;

use super::collision;
use super::entity::{Actor, Projectile};
use super::events::GameEvent;
use super::lifecycle::LifeTransition;
use super::state::Simulation;
use crate::ms_to_secs;

/// Abstract input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered: true only on the frame the button went down
    pub fire: bool,
    /// Title/attract flow only; ignored by the simulation
    pub coin: bool,
    /// Title/attract flow only; ignored by the simulation
    pub start: bool,
}

impl FrameInput {
    /// -1, 0 or +1. Right wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.move_right {
            1.0
        } else if self.move_left {
            -1.0
        } else {
            0.0
        }
    }
}

/// Attract-mode input: track the nearest shooter column and fire whenever the
/// ship is lined up and nothing is in flight. Dodges a shot about to land.
pub fn autopilot(sim: &Simulation) -> FrameInput {
    let mut input = FrameInput::default();
    if !sim.lifecycle.accepts_input() {
        return input;
    }

    let x = sim.player.body.pos.x;
    let threat = sim
        .enemy_shots
        .iter()
        .filter(|s| s.body.active && s.body.pos.y < sim.player.body.pos.y)
        .filter(|s| (s.body.pos.x - x).abs() < sim.player.body.size.x)
        .max_by(|a, b| a.body.pos.y.total_cmp(&b.body.pos.y));
    if let Some(shot) = threat {
        // Step away from the side the shot is on
        if shot.body.pos.x >= x {
            input.move_left = true;
        } else {
            input.move_right = true;
        }
        return input;
    }

    let target = sim
        .formation
        .shooters()
        .into_iter()
        .map(|unit| unit.body.pos.x)
        .min_by(|a, b| (a - x).abs().total_cmp(&(b - x).abs()));
    let Some(target_x) = target.or(sim.bonus.as_ref().map(|b| b.body.pos.x)) else {
        return input;
    };

    let dx = target_x - x;
    if dx > 2.0 {
        input.move_right = true;
    } else if dx < -2.0 {
        input.move_left = true;
    }
    input.fire = dx.abs() < sim.tuning.enemy_size.x / 2.0 && !sim.player_shot_in_flight();
    input
}

/// Advance the simulation by `dt_ms`
pub fn tick(sim: &mut Simulation, input: &FrameInput, dt_ms: f32) {
    sim.frame += 1;
    sim.time_ms += f64::from(dt_ms);

    // Once the match is lost only the end-of-match timer runs
    if sim.lifecycle.is_dead() {
        sim.lifecycle.update(dt_ms, &mut sim.events);
        return;
    }

    // 0. Kinematics and the formation overlap pass
    for shot in sim.player_shots.iter_mut().chain(sim.enemy_shots.iter_mut()) {
        shot.body.integrate(dt_ms);
    }
    let hits = collision::shots_vs_formation(&mut sim.player_shots, &mut sim.formation, &mut sim.events);
    sim.score += hits.points;
    if hits.cleared && sim.scheduler.notify_wave_cleared() {
        sim.events.push(GameEvent::WaveCleared);
        log::info!("Wave {} cleared, score {}", sim.wave.number, sim.score);
    }

    // 1. Lifecycle
    if let Some(LifeTransition::Respawn) = sim.lifecycle.update(dt_ms, &mut sim.events) {
        sim.spawn_player();
        sim.lifecycle.finish_respawn(&mut sim.events);
    }
    sim.player.visible = sim.lifecycle.player_visible();

    // 2. Input
    if sim.lifecycle.accepts_input() {
        apply_input(sim, input, dt_ms);
    }

    // 3. Enemy shots vs player
    collision::shots_vs_player(
        &mut sim.enemy_shots,
        &sim.player,
        &mut sim.lifecycle,
        sim.score,
        &mut sim.events,
    );
    sim.player.visible = sim.lifecycle.player_visible();
    if sim.lifecycle.is_dead() {
        end_match(sim);
        return;
    }

    // 4. Formation movement
    if sim.formation.advance(dt_ms).is_some() {
        sim.events.push(GameEvent::EnemyStepped);
    }

    // 5. Formation animation
    sim.formation.animate(dt_ms);

    // 6. Enemy fire
    if let Some(shot) = sim
        .scheduler
        .update_enemy_fire(dt_ms, &sim.formation, &sim.tuning, &mut sim.rng)
    {
        sim.enemy_shots.push(shot);
    }

    // 7. Bonus target and wave advancement
    sim.scheduler
        .update_bonus(dt_ms, &mut sim.bonus, &sim.tuning, &mut sim.rng, &mut sim.events);
    if sim.scheduler.update_wave(dt_ms, &sim.tuning) {
        advance_wave(sim);
    }

    // 8. Bonus collision
    sim.score += collision::shots_vs_bonus(
        &mut sim.player_shots,
        &mut sim.bonus,
        &sim.tuning,
        &mut sim.rng,
        &mut sim.events,
    );

    // 9. Barriers
    collision::shots_vs_terrain(&mut sim.player_shots, &mut sim.barriers, &sim.tuning, dt_ms, &mut sim.events);
    collision::shots_vs_terrain(&mut sim.enemy_shots, &mut sim.barriers, &sim.tuning, dt_ms, &mut sim.events);

    // 10. Cleanup
    cleanup(sim);

    // 11. Loss by intrusion
    if sim.formation.reached_depth(sim.tuning.loss_line()) {
        log::info!("Formation reached the base");
        sim.lifecycle.game_over(sim.score, &mut sim.events);
        end_match(sim);
    }
}

fn apply_input(sim: &mut Simulation, input: &FrameInput, dt_ms: f32) {
    let dir = input.horizontal();
    if dir != 0.0 {
        let half = sim.player.body.size.x / 2.0;
        let x = sim.player.body.pos.x + dir * sim.tuning.player_speed * ms_to_secs(dt_ms);
        sim.player.body.pos.x = x.clamp(half, sim.tuning.field_width - half);
    }

    if input.fire {
        let in_flight = sim.player_shot_in_flight();
        if sim.lifecycle.try_fire(in_flight) {
            let pos = sim.player.body.pos - Vec2::new(0.0, sim.tuning.player_shot_offset);
            sim.player_shots.push(Projectile::player_shot(
                pos,
                sim.tuning.player_shot_size,
                sim.tuning.player_shot_speed,
            ));
            sim.events.push(GameEvent::PlayerFired);
        }
    }
}

fn advance_wave(sim: &mut Simulation) {
    sim.wave.advance(&sim.tuning);
    sim.formation.rebuild(sim.wave.step);
    sim.events.push(GameEvent::WaveAdvanced);
    log::info!("Wave {} begins, step {}", sim.wave.number, sim.wave.step);
}

/// Drop spent shots, shots that left the field, a downed bonus target and
/// retired barriers
fn cleanup(sim: &mut Simulation) {
    sim.player_shots.retain(|s| s.is_active() && s.body.pos.y >= 0.0);
    let floor = sim.tuning.field_height;
    sim.enemy_shots.retain(|s| s.is_active() && s.body.pos.y <= floor);
    if sim.bonus.as_ref().is_some_and(|b| !b.is_active()) {
        sim.bonus = None;
    }
    sim.barriers.retain(|b| !b.is_destroyed());
}

fn end_match(sim: &mut Simulation) {
    sim.player.deactivate();
    sim.player.visible = false;
    cleanup(sim);
}
