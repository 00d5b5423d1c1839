//! Variable timestep simulation tick
//!
//! Core game loop: apply input, run the gem schedule against the game clock,
//! advance entities, then resolve collisions.

use super::entity::{Collectible, Direction, Enemy, MoveOutcome, TickContext, Tickable};
use super::state::{GameEvent, GamePhase, GameState};
use crate::sanitize_dt;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Player move (unmapped keys never get here)
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Queue a move; a move already queued this frame is applied right away
    pub fn push_move(&mut self, state: &mut GameState, direction: Direction) {
        if let Some(pending) = self.direction.replace(direction) {
            handle_input(state, pending);
        }
    }

    /// Queue a pause toggle, first applying any move pressed before it
    pub fn push_pause(&mut self, state: &mut GameState) {
        if let Some(pending) = self.direction.take() {
            handle_input(state, pending);
        }
        self.pause = !self.pause;
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
        };
        log::info!("Phase: {:?}", state.phase);
    }

    if state.is_paused() {
        return;
    }

    if let Some(direction) = input.direction {
        handle_input(state, direction);
    }

    let dt = sanitize_dt(dt);
    state.clock += dt as f64;

    run_gem_schedule(state);
    advance_entities(state, dt);
    resolve_collisions(state);
}

/// Move the player one cell; crossing into the goal row levels up
pub fn handle_input(state: &mut GameState, direction: Direction) {
    if state.is_paused() {
        return;
    }
    if state.player.handle_input(direction, &state.tuning) == MoveOutcome::ReachedGoal {
        level_up(state);
    }
}

/// Advance to the next level, speeding up and adding enemies periodically
pub fn level_up(state: &mut GameState) {
    state.level += 1;

    if state.level % state.tuning.speedup_every == 0 {
        state.speed_multiplier += state.tuning.speed_multiplier_step;
    }

    if state.level % state.tuning.extra_enemy_every == 0 {
        let enemy = Enemy::spawn(&state.tuning, state.speed_multiplier, &mut state.rng);
        state.enemies.push(enemy);
    }

    log::info!(
        "Level {} (speed x{:.2}, {} enemies)",
        state.level,
        state.speed_multiplier,
        state.enemies.len()
    );
    state.push_event(GameEvent::LevelChanged { level: state.level });
    state.push_event(GameEvent::Splash);
}

/// Restart the session after the player is hit
///
/// The player returns to start, extra enemies are dropped and the survivors
/// respawn at base speed, the gem is cleared, and level and gem count reset.
pub fn game_over(state: &mut GameState) {
    let level_reached = state.level;

    state.player.reset(&state.tuning);
    state.speed_multiplier = state.tuning.base_speed_multiplier;

    let initial = state.tuning.initial_enemies;
    state.enemies.truncate(initial);
    for enemy in &mut state.enemies {
        enemy.reset(&state.tuning, state.speed_multiplier, &mut state.rng);
    }
    while state.enemies.len() < initial {
        let enemy = Enemy::spawn(&state.tuning, state.speed_multiplier, &mut state.rng);
        state.enemies.push(enemy);
    }

    state.collectible = None;
    state.collected = 0;
    state.level = 1;

    log::info!("Game over at level {}", level_reached);
    state.push_event(GameEvent::GameOver { level_reached });
    state.push_event(GameEvent::CollectedChanged { count: 0 });
    state.push_event(GameEvent::LevelChanged { level: 1 });
    state.push_event(GameEvent::Splash);
}

/// Pick up the current gem
pub fn collect(state: &mut GameState) {
    if state.collectible.take().is_none() {
        return;
    }
    state.collected += 1;

    log::debug!("Gem collected ({} total)", state.collected);
    state.push_event(GameEvent::GemCollected);
    state.push_event(GameEvent::CollectedChanged {
        count: state.collected,
    });
}

/// Place a new gem, replacing any gem already on the board
pub fn spawn_collectible(state: &mut GameState) {
    let gem = Collectible::spawn(&state.tuning, state.clock, &mut state.rng);
    log::debug!("Gem spawned at ({}, {})", gem.pos.x, gem.pos.y);
    state.collectible = Some(gem);
    state.push_event(GameEvent::GemSpawned);
}

/// Evaluate gem expiry and spawn events against the game clock
fn run_gem_schedule(state: &mut GameState) {
    let now = state.clock;

    if state.collectible.as_ref().is_some_and(|gem| gem.is_expired(now)) {
        state.collectible = None;
        log::debug!("Gem expired");
        state.push_event(GameEvent::GemExpired);
    }

    if now >= state.next_gem_at {
        spawn_collectible(state);
        // A long frame fires the spawn once and re-arms at the next multiple
        let interval = state.tuning.gem_spawn_interval as f64;
        let next = ((now / interval).floor() + 1.0) * interval;
        state.next_gem_at = if next > now { next } else { now + interval };
    }
}

fn advance_entities(state: &mut GameState, dt: f32) {
    let mut ctx = TickContext {
        tuning: &state.tuning,
        speed_multiplier: state.speed_multiplier,
        rng: &mut state.rng,
    };

    for enemy in &mut state.enemies {
        enemy.advance(dt, &mut ctx);
    }
    if let Some(gem) = &mut state.collectible {
        gem.advance(dt, &mut ctx);
    }
    state.player.advance(dt, &mut ctx);
}

/// First overlapping enemy (roster order) ends the run; otherwise check the gem
fn resolve_collisions(state: &mut GameState) {
    let player = state.player.bounds();

    if state.enemies.iter().any(|enemy| enemy.bounds().overlaps(&player)) {
        game_over(state);
        return;
    }

    let touching_gem = state
        .collectible
        .as_ref()
        .is_some_and(|gem| gem.bounds().overlaps(&player));
    if touching_gem {
        collect(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Park every enemy far off the board so nothing collides
    fn park_enemies(state: &mut GameState) {
        for enemy in &mut state.enemies {
            enemy.pos = Vec2::new(-100.0, 50.0);
            enemy.speed = 0.0;
            enemy.update_bounds(&state.tuning);
        }
    }

    fn put_enemy_on_player(state: &mut GameState, index: usize) {
        let player = state.player.pos;
        let enemy = &mut state.enemies[index];
        // Enemy box sits 75 below its origin, player box 60 below
        enemy.pos = Vec2::new(player.x, player.y - 15.0);
        enemy.speed = 0.0;
        enemy.update_bounds(&state.tuning);
    }

    #[test]
    fn test_idle_tick_keeps_session() {
        let mut state = GameState::new(1);
        park_enemies(&mut state);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.level, 1);
        assert!((state.clock - DT as f64).abs() < 1e-9);
    }

    #[test]
    fn test_collision_resets_session() {
        let mut state = GameState::new(12345);
        park_enemies(&mut state);
        state.level = 5;
        state.collected = 3;
        state.speed_multiplier = 0.3;
        for _ in 0..2 {
            let enemy = Enemy::spawn(&state.tuning, 0.3, &mut state.rng);
            state.enemies.push(enemy);
        }
        park_enemies(&mut state);
        assert_eq!(state.enemies.len(), 4);

        state.player.pos = Vec2::new(100.0, 145.0);
        put_enemy_on_player(&mut state, 3);
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.level, 1);
        assert_eq!(state.collected, 0);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.player.pos, state.tuning.player_start);
        assert!((state.speed_multiplier - 0.1).abs() < 1e-6);
        assert!(state.collectible.is_none());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameOver { level_reached: 5 }));
        assert!(events.contains(&GameEvent::LevelChanged { level: 1 }));
        assert!(events.contains(&GameEvent::CollectedChanged { count: 0 }));
    }

    #[test]
    fn test_game_over_respawns_survivors() {
        let mut state = GameState::new(9);
        park_enemies(&mut state);
        game_over(&mut state);
        let (lo, hi) = state.tuning.enemy_speed_bounds(state.tuning.base_speed_multiplier);
        for enemy in &state.enemies {
            assert_eq!(enemy.pos.x, state.tuning.enemy_spawn_x);
            assert!(enemy.speed >= lo && enemy.speed <= hi);
        }
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let mut state = GameState::new(3);
        game_over(&mut state);
        game_over(&mut state);
        assert_eq!(state.level, 1);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.collected, 0);
    }

    #[test]
    fn test_no_collision_when_apart() {
        let mut state = GameState::new(4);
        park_enemies(&mut state);
        state.level = 3;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_collect_gem() {
        let mut state = GameState::new(5);
        park_enemies(&mut state);
        spawn_collectible(&mut state);
        let gem_pos = state.collectible.as_ref().unwrap().pos;
        // Gem box is 25 lower than the player box for the same origin
        state.player.pos = Vec2::new(gem_pos.x, gem_pos.y + 25.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.collected, 1);
        assert!(state.collectible.is_none());
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::GemCollected,
                GameEvent::CollectedChanged { count: 1 }
            ]
        );

        // Nothing left to collect on the next tick
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.collected, 1);
    }

    #[test]
    fn test_collect_without_gem_is_noop() {
        let mut state = GameState::new(5);
        state.drain_events();
        collect(&mut state);
        assert_eq!(state.collected, 0);
        assert!(state.pending_events().is_empty());
    }

    #[test]
    fn test_gem_schedule() {
        let mut state = GameState::new(6);
        park_enemies(&mut state);
        state.player.pos = Vec2::new(0.0, 400.0);
        state.player.update_bounds(&state.tuning);

        tick(&mut state, &TickInput::default(), 4.9);
        assert!(state.collectible.is_none());

        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.collectible.is_some());
        assert_eq!(state.next_gem_at, 10.0);

        // Lifetime is 3 s
        tick(&mut state, &TickInput::default(), 2.5);
        assert!(state.collectible.is_some());
        tick(&mut state, &TickInput::default(), 0.6);
        assert!(state.collectible.is_none());
        assert!(state.drain_events().contains(&GameEvent::GemExpired));
    }

    #[test]
    fn test_long_frame_spawns_once() {
        let mut state = GameState::new(6);
        park_enemies(&mut state);
        state.player.pos = Vec2::new(0.0, 400.0);
        state.drain_events();

        tick(&mut state, &TickInput::default(), 12.0);
        let spawns = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::GemSpawned)
            .count();
        assert_eq!(spawns, 1);
        assert_eq!(state.next_gem_at, 15.0);
    }

    #[test]
    fn test_tiny_interval_rearms_without_looping() {
        let mut state = GameState::new(6);
        park_enemies(&mut state);
        state.tuning.gem_spawn_interval = 1e-12;
        state.clock = 1e6;
        state.next_gem_at = 1e6;
        state.drain_events();

        tick(&mut state, &TickInput::default(), 0.1);
        let spawns = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::GemSpawned)
            .count();
        assert_eq!(spawns, 1);
        assert!(state.next_gem_at >= state.clock);
    }

    #[test]
    fn test_rearm_lands_on_next_multiple() {
        let mut state = GameState::new(6);
        park_enemies(&mut state);
        state.player.pos = Vec2::new(0.0, 400.0);

        tick(&mut state, &TickInput::default(), 7.0);
        assert_eq!(state.next_gem_at, 10.0);
        tick(&mut state, &TickInput::default(), 3.0);
        assert_eq!(state.next_gem_at, 15.0);
    }

    #[test]
    fn test_move_before_pause_is_applied() {
        let mut state = GameState::new(18);
        park_enemies(&mut state);
        let mut input = TickInput::default();
        input.push_move(&mut state, Direction::Left);
        input.push_pause(&mut state);
        assert!(input.direction.is_none());
        assert_eq!(state.player.pos, Vec2::new(100.0, 400.0));

        tick(&mut state, &input, DT);
        assert!(state.is_paused());
        assert_eq!(state.player.pos, Vec2::new(100.0, 400.0));
    }

    #[test]
    fn test_queued_moves_keep_order() {
        let mut state = GameState::new(19);
        park_enemies(&mut state);
        let mut input = TickInput::default();
        input.push_move(&mut state, Direction::Up);
        input.push_move(&mut state, Direction::Right);
        assert_eq!(state.player.pos, Vec2::new(200.0, 315.0));

        tick(&mut state, &input, DT);
        assert_eq!(state.player.pos, Vec2::new(300.0, 315.0));
    }

    #[test]
    fn test_new_spawn_replaces_gem() {
        let mut state = GameState::new(8);
        spawn_collectible(&mut state);
        state.clock = 1.0;
        spawn_collectible(&mut state);
        let gem = state.collectible.as_ref().unwrap();
        assert_eq!(gem.expires_at, 4.0);
    }

    #[test]
    fn test_crossing_levels_up_once() {
        let mut state = GameState::new(10);
        park_enemies(&mut state);
        let up = TickInput {
            direction: Some(Direction::Up),
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &up, DT);
        }
        assert_eq!(state.level, 2);
        assert_eq!(state.player.pos, state.tuning.player_start);
    }

    #[test]
    fn test_level_up_progression() {
        let mut state = GameState::new(11);
        let base = state.speed_multiplier;

        level_up(&mut state); // 2: speed up
        assert_eq!(state.level, 2);
        assert!((state.speed_multiplier - (base + 0.1)).abs() < 1e-6);
        assert_eq!(state.enemies.len(), 2);

        level_up(&mut state); // 3: extra enemy
        assert!((state.speed_multiplier - (base + 0.1)).abs() < 1e-6);
        assert_eq!(state.enemies.len(), 3);

        level_up(&mut state); // 4: speed up
        assert!((state.speed_multiplier - (base + 0.2)).abs() < 1e-6);
        assert_eq!(state.enemies.len(), 3);

        level_up(&mut state); // 5: nothing
        level_up(&mut state); // 6: both
        assert!((state.speed_multiplier - (base + 0.3)).abs() < 1e-6);
        assert_eq!(state.enemies.len(), 4);
    }

    #[test]
    fn test_speedup_is_not_retroactive() {
        let mut state = GameState::new(12);
        let speeds: Vec<f32> = state.enemies.iter().map(|e| e.speed).collect();
        level_up(&mut state);
        let after: Vec<f32> = state.enemies.iter().map(|e| e.speed).collect();
        assert_eq!(speeds, after);
    }

    #[test]
    fn test_level_up_events() {
        let mut state = GameState::new(13);
        state.drain_events();
        level_up(&mut state);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelChanged { level: 2 }, GameEvent::Splash]
        );
    }

    #[test]
    fn test_first_overlapping_enemy_wins() {
        let mut state = GameState::new(14);
        park_enemies(&mut state);
        state.player.pos = Vec2::new(200.0, 230.0);
        state.player.update_bounds(&state.tuning);
        put_enemy_on_player(&mut state, 0);
        put_enemy_on_player(&mut state, 1);
        state.level = 4;
        state.drain_events();

        tick(&mut state, &TickInput::default(), DT);
        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut state = GameState::new(15);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert!(state.is_paused());

        let enemies = state.enemies.clone();
        let up = TickInput {
            direction: Some(Direction::Up),
            ..Default::default()
        };
        tick(&mut state, &up, 1.0);
        assert_eq!(state.enemies, enemies);
        assert_eq!(state.player.pos, state.tuning.player_start);
        assert_eq!(state.clock, 0.0);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_negative_dt_is_zero() {
        let mut state = GameState::new(16);
        let enemies = state.enemies.clone();
        tick(&mut state, &TickInput::default(), -1.0);
        tick(&mut state, &TickInput::default(), f32::NAN);
        assert_eq!(state.enemies, enemies);
        assert_eq!(state.clock, 0.0);
    }

    #[test]
    fn test_bounds_track_positions_after_tick() {
        let mut state = GameState::new(17);
        tick(&mut state, &TickInput::default(), 0.25);
        for enemy in &state.enemies {
            assert_eq!(enemy.bounds.x, enemy.pos.x);
            assert_eq!(enemy.bounds.y, enemy.pos.y + 75.0);
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                direction: Some(Direction::Up),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                direction: Some(Direction::Left),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                tick(&mut state1, input, 0.05);
                tick(&mut state2, input, 0.05);
            }
        }

        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.enemies, state2.enemies);
        assert_eq!(state1.collectible, state2.collectible);
        assert_eq!(state1.player, state2.player);
    }
}
