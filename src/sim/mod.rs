//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame deltas only, no clock reads
//! - Seeded RNG only
//! - Stable iteration order (row-major formation, insertion-ordered shots)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod events;
pub mod formation;
pub mod lifecycle;
pub mod spawn;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::FormationHits;
pub use entity::{Aabb, Actor, ActorKind, BonusTarget, Body, EnemyKind, EnemyUnit, Player, Projectile, ShotSprite, Side};
pub use events::{EventQueue, GameEvent};
pub use formation::{Formation, MovementEvent};
pub use lifecycle::{LifeState, LifeTransition, Lifecycle};
pub use spawn::{SpawnScheduler, Wave};
pub use state::Simulation;
pub use terrain::TerrainMask;
pub use tick::{FrameInput, autopilot, tick};
