//! Spatial entities shared by every moving actor
//!
//! Positions are sprite centres; boxes are axis-aligned and centred on them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ms_to_secs;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Inclusive overlap (touching edges count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Smallest box covering both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Which side an actor fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// Actor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    EnemyUnit,
    Projectile,
    BonusTarget,
}

/// Position, box, velocity and liveness common to all actors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Centre position
    pub pos: Vec2,
    /// Box width and height
    pub size: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub active: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            active: true,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Advance by velocity over `dt_ms`; inactive bodies stay put
    pub fn integrate(&mut self, dt_ms: f32) {
        if self.active {
            self.pos += self.vel * ms_to_secs(dt_ms);
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.vel = Vec2::ZERO;
    }
}

/// Common view over every actor variant
pub trait Actor {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
    fn kind(&self) -> ActorKind;
    fn side(&self) -> Side;

    fn is_active(&self) -> bool {
        self.body().active
    }

    fn bounds(&self) -> Aabb {
        self.body().bounds()
    }

    fn deactivate(&mut self) {
        self.body_mut().deactivate();
    }
}

/// Enemy tier; row 0 is `Low`, the next two rows `Mid`, the rest `High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Low,
    Mid,
    High,
}

impl EnemyKind {
    pub fn points(&self) -> u32 {
        match self {
            EnemyKind::Low => 30,
            EnemyKind::Mid => 20,
            EnemyKind::High => 10,
        }
    }

    /// Tier for a formation row
    pub fn for_row(row: usize) -> Self {
        match row {
            0 => EnemyKind::Low,
            1 | 2 => EnemyKind::Mid,
            _ => EnemyKind::High,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Cosmetic; toggled while invincible
    pub visible: bool,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            body: Body::new(pos, size),
            visible: true,
        }
    }
}

/// One slot of the formation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub body: Body,
    pub kind: EnemyKind,
    pub column: usize,
    pub row: usize,
    /// Two-frame animation index (0 or 1)
    pub anim_frame: u8,
}

/// Cosmetic projectile sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotSprite {
    /// Player laser
    Laser,
    Zigzag,
    Bolt,
    Cross,
}

impl ShotSprite {
    /// Enemy sprites chosen between at random
    pub const ENEMY: [ShotSprite; 3] = [ShotSprite::Zigzag, ShotSprite::Bolt, ShotSprite::Cross];
}

/// A shot fired by either side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub side: Side,
    pub sprite: ShotSprite,
}

impl Projectile {
    /// Player shots travel up the screen
    pub fn player_shot(pos: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            body: Body::new(pos, size).with_velocity(Vec2::new(0.0, -speed)),
            side: Side::Player,
            sprite: ShotSprite::Laser,
        }
    }

    /// Enemy shots travel down toward the base
    pub fn enemy_shot(pos: Vec2, size: Vec2, speed: f32, sprite: ShotSprite) -> Self {
        Self {
            body: Body::new(pos, size).with_velocity(Vec2::new(0.0, speed)),
            side: Side::Enemy,
            sprite,
        }
    }

    /// Unit vector of travel (zero for a stopped shot)
    pub fn heading(&self) -> Vec2 {
        self.body.vel.normalize_or_zero()
    }
}

/// The periodic high-value target crossing the top of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusTarget {
    pub body: Body,
}

macro_rules! impl_actor {
    ($ty:ty, $kind:expr, |$this:ident| $side:expr) => {
        impl Actor for $ty {
            fn body(&self) -> &Body {
                &self.body
            }
            fn body_mut(&mut self) -> &mut Body {
                &mut self.body
            }
            fn kind(&self) -> ActorKind {
                $kind
            }
            fn side(&self) -> Side {
                let $this = self;
                $side
            }
        }
    };
}

impl_actor!(Player, ActorKind::Player, |_this| Side::Player);
impl_actor!(EnemyUnit, ActorKind::EnemyUnit, |_this| Side::Enemy);
impl_actor!(Projectile, ActorKind::Projectile, |this| this.side);
impl_actor!(BonusTarget, ActorKind::BonusTarget, |_this| Side::Enemy);
