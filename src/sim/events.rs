//! Outbound events for presentation, audio and scoring collaborators
//!
//! Stages push into the queue while resolving a frame; the host drains it once
//! per frame, so nothing is called back mid-collision.

use serde::{Deserialize, Serialize};

/// Something the simulation wants the outside world to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Formation unit destroyed by a player shot
    EnemyDestroyed(u32),
    /// Bonus target shot down
    BonusDestroyed(u32),
    PlayerHit,
    PlayerRespawned,
    /// A new formation has been built
    WaveAdvanced,
    /// Match lost; carries the final score
    GameOver(u64),
    /// One formation step (audio cue)
    EnemyStepped,
    BonusSpawned,
    /// Bonus target left the field unharmed
    BonusExpired,
    PlayerFired,
    /// Last unit destroyed; the next wave follows after a delay
    WaveCleared,
    BarrierDestroyed,
    /// Invincibility blink (true = drawn)
    BlinkToggled(bool),
}

/// Per-frame outbound queue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::trace!("event: {:?}", event);
        self.events.push(event);
    }

    /// Take everything queued so far, in emission order
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::PlayerFired);
        queue.push(GameEvent::EnemyDestroyed(30));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained, vec![GameEvent::PlayerFired, GameEvent::EnemyDestroyed(30)]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
