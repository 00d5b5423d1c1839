//! Board entities: the player, the bugs and the gem
//!
//! Each entity owns its position and a bounding box recomputed from that
//! position. Randomized respawns draw from the RNG handed in through
//! [`TickContext`], never from a global source.

use glam::Vec2;
use rand::{Rng, RngCore};

use super::collision::Aabb;
use crate::consts::{ENEMY_SPRITE, GEM_SPRITES, PLAYER_SPRITES};
use crate::tuning::Tuning;

/// Opaque sprite reference resolved by the presentation layer
pub type SpriteId = &'static str;

/// Movement command for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// One grid step in this direction
    pub fn step(self, step: Vec2) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-step.x, 0.0),
            Direction::Right => Vec2::new(step.x, 0.0),
            Direction::Up => Vec2::new(0.0, -step.y),
            Direction::Down => Vec2::new(0.0, step.y),
        }
    }
}

/// What a player move resulted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Player reached the goal row and was sent back to start
    ReachedGoal,
}

/// Shared inputs for advancing and respawning entities
pub struct TickContext<'a> {
    pub tuning: &'a Tuning,
    /// Applies to enemies respawned during this tick
    pub speed_multiplier: f32,
    pub rng: &'a mut dyn RngCore,
}

/// Capability shared by everything on the board
pub trait Tickable {
    /// Advance by `dt` seconds and refresh the bounding box
    fn advance(&mut self, dt: f32, ctx: &mut TickContext<'_>);
    fn pos(&self) -> Vec2;
    fn bounds(&self) -> Aabb;
    fn sprite(&self) -> SpriteId;
}

fn pick_sprite(sprites: &[SpriteId], rng: &mut dyn RngCore) -> SpriteId {
    sprites[rng.random_range(0..sprites.len())]
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub bounds: Aabb,
    pub sprite: SpriteId,
}

impl Player {
    /// Create a player at the start cell with a random skin
    pub fn new(tuning: &Tuning, rng: &mut dyn RngCore) -> Self {
        let mut player = Self {
            pos: tuning.player_start,
            bounds: Aabb::default(),
            sprite: pick_sprite(&PLAYER_SPRITES, rng),
        };
        player.update_bounds(tuning);
        player
    }

    /// Move back to the start cell
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = tuning.player_start;
        self.update_bounds(tuning);
    }

    /// Recompute the bounding box from the current position
    pub fn update_bounds(&mut self, tuning: &Tuning) {
        self.bounds = Aabb::at(self.pos, tuning.player_inset, tuning.player_size);
    }

    /// Step one cell, clamp to the board, and reset on reaching the goal row
    pub fn handle_input(&mut self, direction: Direction, tuning: &Tuning) -> MoveOutcome {
        self.pos += direction.step(tuning.player_step);
        self.clamp_to_board(tuning);

        if self.reached_goal(tuning) {
            self.reset(tuning);
            return MoveOutcome::ReachedGoal;
        }

        self.update_bounds(tuning);
        MoveOutcome::Moved
    }

    /// Keep the player on the board. The top edge is open: leaving it is the goal.
    fn clamp_to_board(&mut self, tuning: &Tuning) {
        self.pos.x = self.pos.x.clamp(0.0, tuning.player_max_x);
        self.pos.y = self.pos.y.min(tuning.player_max_y);
    }

    pub fn reached_goal(&self, tuning: &Tuning) -> bool {
        self.pos.y < tuning.goal_y
    }
}

impl Tickable for Player {
    fn advance(&mut self, _dt: f32, ctx: &mut TickContext<'_>) {
        self.update_bounds(ctx.tuning);
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn sprite(&self) -> SpriteId {
        self.sprite
    }
}

/// A bug crossing the road left to right
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub bounds: Aabb,
    /// Canvas units per second, fixed at respawn time
    pub speed: f32,
    pub sprite: SpriteId,
}

impl Enemy {
    /// Create an enemy in a valid spawn state
    pub fn spawn(tuning: &Tuning, speed_multiplier: f32, rng: &mut dyn RngCore) -> Self {
        let mut enemy = Self {
            pos: Vec2::ZERO,
            bounds: Aabb::default(),
            speed: tuning.enemy_base_speed,
            sprite: ENEMY_SPRITE,
        };
        enemy.reset(tuning, speed_multiplier, rng);
        enemy
    }

    /// Respawn off the left edge in a random lane with a fresh speed
    pub fn reset(&mut self, tuning: &Tuning, speed_multiplier: f32, rng: &mut dyn RngCore) {
        let lane = rng.random_range(0..tuning.lane_count);
        self.pos = Vec2::new(tuning.enemy_spawn_x, tuning.lane_y(lane));
        let extra = rng.random_range(0..tuning.enemy_speed_range) as f32;
        self.speed = tuning.enemy_base_speed + extra * speed_multiplier;
        self.update_bounds(tuning);
    }

    pub fn update_bounds(&mut self, tuning: &Tuning) {
        self.bounds = Aabb::at(self.pos, tuning.enemy_inset, tuning.enemy_size);
    }
}

impl Tickable for Enemy {
    fn advance(&mut self, dt: f32, ctx: &mut TickContext<'_>) {
        self.pos.x += dt * self.speed;

        if self.pos.x > ctx.tuning.enemy_exit_x {
            self.reset(ctx.tuning, ctx.speed_multiplier, &mut *ctx.rng);
        }

        self.update_bounds(ctx.tuning);
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn sprite(&self) -> SpriteId {
        self.sprite
    }
}

/// A gem waiting to be picked up
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    pub bounds: Aabb,
    pub sprite: SpriteId,
    /// Game clock time the gem disappears at
    pub expires_at: f64,
}

impl Collectible {
    /// Place a gem on a random cell, living until `now + gem_lifetime`
    pub fn spawn(tuning: &Tuning, now: f64, rng: &mut dyn RngCore) -> Self {
        let column = rng.random_range(0..tuning.gem_columns);
        let lane = rng.random_range(0..tuning.lane_count);
        let pos = Vec2::new(column as f32 * tuning.gem_column_width, tuning.lane_y(lane));
        Self {
            pos,
            bounds: Aabb::at(pos, tuning.gem_inset, tuning.gem_size),
            sprite: pick_sprite(&GEM_SPRITES, rng),
            expires_at: now + tuning.gem_lifetime as f64,
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.expires_at
    }
}

impl Tickable for Collectible {
    fn advance(&mut self, _dt: f32, ctx: &mut TickContext<'_>) {
        self.bounds = Aabb::at(self.pos, ctx.tuning.gem_inset, ctx.tuning.gem_size);
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn sprite(&self) -> SpriteId {
        self.sprite
    }
}

/// Borrowed view of any entity, tagged by kind
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Player(&'a Player),
    Enemy(&'a Enemy),
    Collectible(&'a Collectible),
}

impl EntityRef<'_> {
    fn inner(&self) -> &dyn Tickable {
        match *self {
            EntityRef::Player(p) => p as &dyn Tickable,
            EntityRef::Enemy(e) => e,
            EntityRef::Collectible(c) => c,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.inner().pos()
    }

    pub fn bounds(&self) -> Aabb {
        self.inner().bounds()
    }

    pub fn sprite(&self) -> SpriteId {
        self.inner().sprite()
    }
}
