//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::api::PlayerName;
use crate::settings::GameConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session started yet (or reset for a new player)
    NotStarted,
    /// Active gameplay
    Playing,
    /// Session ended; score and objects are frozen until restart
    GameOver,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, x: f32 },
    Caught { id: u32 },
    Dropped { id: u32 },
    GameOver { score: u32 },
}

/// A falling object entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl FallingObject {
    pub fn bounds(&self, size: f32) -> Rect {
        Rect::new(self.x, self.y, size, size)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge, clamped to `[0, width - paddle_width]`
    pub x: f32,
}

impl Paddle {
    pub fn centered(config: &GameConfig) -> Self {
        Self {
            x: config.centered_paddle_x(),
        }
    }

    /// Place the paddle's left edge, clamped into the field
    pub fn set_x(&mut self, x: f32, config: &GameConfig) {
        // NaN from a broken pointer event keeps the old position
        if x.is_nan() {
            return;
        }
        self.x = x.clamp(0.0, config.max_paddle_x().max(0.0));
    }

    /// Centre the paddle on a pointer x coordinate
    pub fn follow_pointer(&mut self, pointer_x: f32, config: &GameConfig) {
        self.set_x(pointer_x - config.paddle_width / 2.0, config);
    }

    pub fn bounds(&self, config: &GameConfig) -> Rect {
        Rect::new(
            self.x,
            config.paddle_top(),
            config.paddle_width,
            config.paddle_height,
        )
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Caught objects this session
    pub score: u32,
    pub player_name: Option<PlayerName>,
    pub paddle: Paddle,
    /// Live objects, in spawn (id) order
    pub objects: Vec<FallingObject>,
    /// Timestamp (ms) of the last spawn, or of session start
    pub last_spawn_ms: f64,
    /// Ticks run this session
    pub time_ticks: u64,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle state; `seed` drives spawn positions
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            paddle: Paddle::centered(&config),
            config,
            phase: GamePhase::NotStarted,
            score: 0,
            player_name: None,
            objects: Vec::new(),
            last_spawn_ms: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a fresh session for `player` at timestamp `now_ms`
    pub fn start(&mut self, player: PlayerName, now_ms: f64) {
        self.score = 0;
        self.objects.clear();
        self.paddle = Paddle::centered(&self.config);
        self.last_spawn_ms = now_ms;
        self.time_ticks = 0;
        self.player_name = Some(player);
        self.phase = GamePhase::Playing;
    }

    /// Drop the session and the player name
    pub fn reset(&mut self) {
        self.score = 0;
        self.objects.clear();
        self.paddle = Paddle::centered(&self.config);
        self.time_ticks = 0;
        self.player_name = None;
        self.phase = GamePhase::NotStarted;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Apply a pointer position (field coordinates); ignored unless playing
    pub fn pointer_moved(&mut self, pointer_x: f32) {
        if self.is_playing() {
            self.paddle.follow_pointer(pointer_x, &self.config);
        }
    }

    /// Spawn one object at the top with a random x in `[0, width - size]`
    pub fn spawn_object(&mut self) -> &FallingObject {
        let span = (self.config.width - self.config.object_size).max(0.0);
        let x = self.rng.random::<f32>() * span;
        let id = self.next_entity_id();
        self.objects.push(FallingObject { id, x, y: 0.0 });
        &self.objects[self.objects.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> PlayerName {
        PlayerName::parse("Ada").unwrap()
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(GameConfig::default(), 1);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.paddle.x, 250.0);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_paddle_clamped() {
        let config = GameConfig::default();
        let mut paddle = Paddle::centered(&config);
        paddle.follow_pointer(-100.0, &config);
        assert_eq!(paddle.x, 0.0);
        paddle.follow_pointer(10_000.0, &config);
        assert_eq!(paddle.x, 500.0);
        paddle.follow_pointer(300.0, &config);
        assert_eq!(paddle.x, 250.0);
        paddle.set_x(f32::NAN, &config);
        assert_eq!(paddle.x, 250.0);
    }

    #[test]
    fn test_paddle_wider_than_field_pins_left() {
        let config = GameConfig {
            paddle_width: 700.0,
            ..Default::default()
        };
        let mut state = GameState::new(config, 1);
        state.start(ada(), 0.0);
        state.pointer_moved(100.0);
        assert_eq!(state.paddle.x, 0.0);
    }

    #[test]
    fn test_pointer_ignored_unless_playing() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.pointer_moved(100.0);
        assert_eq!(state.paddle.x, 250.0);

        state.start(ada(), 0.0);
        state.pointer_moved(100.0);
        assert_eq!(state.paddle.x, 50.0);
    }

    #[test]
    fn test_spawn_within_field() {
        let mut state = GameState::new(GameConfig::default(), 42);
        let mut last_id = 0;
        for _ in 0..500 {
            let obj = state.spawn_object();
            assert!(obj.x >= 0.0 && obj.x <= 570.0);
            assert_eq!(obj.y, 0.0);
            assert!(obj.id > last_id);
            last_id = obj.id;
        }
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(GameConfig::default(), 7);
        let mut b = GameState::new(GameConfig::default(), 7);
        for _ in 0..10 {
            assert_eq!(a.spawn_object().x, b.spawn_object().x);
        }
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.start(ada(), 10.0);
        state.score = 9;
        state.spawn_object();
        state.paddle.x = 0.0;
        state.phase = GamePhase::GameOver;

        state.start(ada(), 2000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.objects.is_empty());
        assert_eq!(state.paddle.x, 250.0);
        assert_eq!(state.last_spawn_ms, 2000.0);
    }

    #[test]
    fn test_reset_clears_player() {
        let mut state = GameState::new(GameConfig::default(), 1);
        state.start(ada(), 0.0);
        state.reset();
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert!(state.player_name.is_none());
    }
}
