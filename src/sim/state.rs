//! Game state and session bookkeeping
//!
//! One `GameState` holds the whole session: level, difficulty, gem count,
//! every entity, the RNG and the game clock. Nothing lives in globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Collectible, Enemy, EntityRef, Player};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Level label should show this value
    LevelChanged { level: u32 },
    /// Gem counter should show this value
    CollectedChanged { count: u32 },
    /// Play the level splash
    Splash,
    /// Player was hit; the session restarted at level 1
    GameOver { level_reached: u32 },
    GemSpawned,
    GemExpired,
    GemCollected,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source for every random draw in the session
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Current level (starts at 1)
    pub level: u32,
    /// Scales the random part of enemy speed at respawn
    pub speed_multiplier: f32,
    /// Gems collected this session
    pub collected: u32,
    pub phase: GamePhase,
    pub player: Player,
    /// Enemies in roster order (collision checks follow this order)
    pub enemies: Vec<Enemy>,
    /// At most one gem on the board
    pub collectible: Option<Collectible>,
    /// Monotonic game clock (seconds of unpaused play)
    pub clock: f64,
    /// Clock time of the next gem spawn
    pub next_gem_at: f64,
    /// Events since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state with the given seed and tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.validated();
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(&tuning, &mut rng);
        let enemies = (0..tuning.initial_enemies)
            .map(|_| Enemy::spawn(&tuning, tuning.base_speed_multiplier, &mut rng))
            .collect();

        Self {
            seed,
            rng,
            level: 1,
            speed_multiplier: tuning.base_speed_multiplier,
            collected: 0,
            phase: GamePhase::Playing,
            player,
            enemies,
            collectible: None,
            clock: 0.0,
            next_gem_at: tuning.gem_spawn_interval as f64,
            events: vec![
                GameEvent::LevelChanged { level: 1 },
                GameEvent::CollectedChanged { count: 0 },
            ],
            tuning,
        }
    }

    /// Record an event for the presentation layer
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Every live entity in draw order: enemies, gem, then the player on top
    pub fn entities(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.enemies
            .iter()
            .map(EntityRef::Enemy)
            .chain(self.collectible.iter().map(EntityRef::Collectible))
            .chain(std::iter::once(EntityRef::Player(&self.player)))
    }
}
