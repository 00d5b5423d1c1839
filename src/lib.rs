//! Bug Crossing - a road crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, level progression)
//! - `renderer`: Presentation adapter and the terminal renderer
//! - `platform`: Input mapping from raw key events
//! - `tuning`: Data-driven game balance
//! - `settings`: Display preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Board dimensions (canvas units)
    pub const BOARD_WIDTH: f32 = 505.0;
    pub const BOARD_HEIGHT: f32 = 606.0;
    pub const BOARD_COLUMNS: u32 = 5;
    pub const BOARD_ROWS: u32 = 6;

    /// Width of one board column as drawn
    pub const COLUMN_WIDTH: f32 = 101.0;
    /// Height of one board row as drawn
    pub const ROW_HEIGHT: f32 = 85.0;

    /// Longest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// How long the level splash stays visible (seconds)
    pub const SPLASH_DURATION: f32 = 0.5;

    /// Sprite identifiers, resolved by the presentation layer
    pub const PLAYER_SPRITES: [&str; 5] = [
        "images/char-boy.png",
        "images/char-cat-girl.png",
        "images/char-horn-girl.png",
        "images/char-pink-girl.png",
        "images/char-princess-girl.png",
    ];
    pub const ENEMY_SPRITE: &str = "images/enemy-bug.png";
    pub const GEM_SPRITES: [&str; 3] = [
        "images/gem-blue.png",
        "images/gem-green.png",
        "images/gem-orange.png",
    ];
}

/// Sanitize a frame delta: negative or non-finite values become zero
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
