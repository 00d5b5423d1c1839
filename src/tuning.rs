//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON file can override it. The
//! defaults reproduce the classic board: five columns, three bug lanes and a
//! water row at the top.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::load_json_or_default;

/// Shortest allowed gap between gem spawns (seconds)
pub const MIN_GEM_SPAWN_INTERVAL: f32 = 0.1;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Start cell (column 2 of 5, bottom row)
    pub player_start: Vec2,
    /// One grid step (horizontal, vertical)
    pub player_step: Vec2,
    /// Largest x the player may occupy
    pub player_max_x: f32,
    /// Largest y the player may occupy (no upper clamp, leaving the top is the win)
    pub player_max_y: f32,
    /// Rows with y below this are the goal
    pub goal_y: f32,
    pub player_inset: Vec2,
    pub player_size: Vec2,

    // === Enemies ===
    /// x an enemy respawns at (off the left edge)
    pub enemy_spawn_x: f32,
    /// Respawn once x exceeds this
    pub enemy_exit_x: f32,
    pub enemy_base_speed: f32,
    /// Random speed component is drawn from 0..enemy_speed_range
    pub enemy_speed_range: u32,
    pub enemy_inset: Vec2,
    pub enemy_size: Vec2,
    pub initial_enemies: usize,

    // === Lanes (shared by enemies and gems) ===
    pub lane_origin_y: f32,
    pub lane_spacing: f32,
    pub lane_count: u32,

    // === Difficulty ===
    pub base_speed_multiplier: f32,
    pub speed_multiplier_step: f32,
    /// Every Nth level raises the speed multiplier
    pub speedup_every: u32,
    /// Every Nth level adds an enemy
    pub extra_enemy_every: u32,

    // === Gems ===
    pub gem_columns: u32,
    pub gem_column_width: f32,
    pub gem_inset: Vec2,
    pub gem_size: Vec2,
    /// Seconds between gem spawns
    pub gem_spawn_interval: f32,
    /// Seconds a gem stays on the board
    pub gem_lifetime: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_start: Vec2::new(200.0, 400.0),
            player_step: Vec2::new(100.0, 85.0),
            player_max_x: 400.0,
            player_max_y: 400.0,
            goal_y: 60.0,
            player_inset: Vec2::new(15.0, 60.0),
            player_size: Vec2::new(70.0, 85.0),

            enemy_spawn_x: -100.0,
            enemy_exit_x: 505.0,
            enemy_base_speed: 100.0,
            enemy_speed_range: 100,
            enemy_inset: Vec2::new(0.0, 75.0),
            enemy_size: Vec2::new(100.0, 70.0),
            initial_enemies: 2,

            lane_origin_y: 50.0,
            lane_spacing: 85.0,
            lane_count: 3,

            base_speed_multiplier: 0.1,
            speed_multiplier_step: 0.1,
            speedup_every: 2,
            extra_enemy_every: 3,

            gem_columns: 5,
            gem_column_width: 101.0,
            gem_inset: Vec2::new(15.0, 85.0),
            gem_size: Vec2::new(70.0, 60.0),
            gem_spawn_interval: 5.0,
            gem_lifetime: 3.0,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        load_json_or_default::<Self>(path).validated()
    }

    /// y of lane `index`
    #[inline]
    pub fn lane_y(&self, index: u32) -> f32 {
        self.lane_origin_y + index as f32 * self.lane_spacing
    }

    /// Slowest and fastest speed an enemy can draw at `multiplier`
    pub fn enemy_speed_bounds(&self, multiplier: f32) -> (f32, f32) {
        let top = self.enemy_speed_range.saturating_sub(1) as f32;
        (self.enemy_base_speed, self.enemy_base_speed + top * multiplier)
    }

    /// Replace values that would break simulation invariants with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        fn positive(v: Vec2) -> bool {
            v.x > 0.0 && v.y > 0.0 && v.is_finite()
        }

        fn repair<T: std::fmt::Debug + Copy>(ok: bool, name: &str, value: &mut T, default: T) {
            if !ok {
                log::warn!("Invalid tuning value {name} = {value:?}, using {default:?}");
                *value = default;
            }
        }

        repair(positive(self.player_step), "player_step", &mut self.player_step, defaults.player_step);
        repair(positive(self.player_size), "player_size", &mut self.player_size, defaults.player_size);
        repair(positive(self.enemy_size), "enemy_size", &mut self.enemy_size, defaults.enemy_size);
        repair(positive(self.gem_size), "gem_size", &mut self.gem_size, defaults.gem_size);
        repair(self.player_max_x >= 0.0, "player_max_x", &mut self.player_max_x, defaults.player_max_x);
        repair(self.enemy_base_speed > 0.0, "enemy_base_speed", &mut self.enemy_base_speed, defaults.enemy_base_speed);
        repair(self.enemy_speed_range > 0, "enemy_speed_range", &mut self.enemy_speed_range, defaults.enemy_speed_range);
        repair(self.enemy_exit_x > self.enemy_spawn_x, "enemy_exit_x", &mut self.enemy_exit_x, defaults.enemy_exit_x);
        repair(self.lane_count > 0, "lane_count", &mut self.lane_count, defaults.lane_count);
        repair(self.base_speed_multiplier > 0.0, "base_speed_multiplier", &mut self.base_speed_multiplier, defaults.base_speed_multiplier);
        repair(self.speed_multiplier_step >= 0.0, "speed_multiplier_step", &mut self.speed_multiplier_step, defaults.speed_multiplier_step);
        repair(self.speedup_every > 0, "speedup_every", &mut self.speedup_every, defaults.speedup_every);
        repair(self.extra_enemy_every > 0, "extra_enemy_every", &mut self.extra_enemy_every, defaults.extra_enemy_every);
        repair(self.gem_columns > 0, "gem_columns", &mut self.gem_columns, defaults.gem_columns);
        repair(self.gem_spawn_interval >= MIN_GEM_SPAWN_INTERVAL, "gem_spawn_interval", &mut self.gem_spawn_interval, defaults.gem_spawn_interval);
        repair(self.gem_lifetime > 0.0, "gem_lifetime", &mut self.gem_lifetime, defaults.gem_lifetime);
        self
    }
}
