//! Presentation adapter
//!
//! The simulation never draws. Each frame the caller drains the world's
//! events and hands them, with the world, to a [`Presenter`].

pub mod terminal;

pub use terminal::TerminalPresenter;

use crate::sim::{GameEvent, GameState, SpriteId};

/// On-screen text labels the game updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Level,
    Gems,
}

impl Label {
    /// Class name of the label element
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Level => "level",
            Label::Gems => "gems",
        }
    }
}

/// Something that can show the board
pub trait Presenter {
    /// Start a new frame (clear and draw the static board)
    fn begin_frame(&mut self) {}

    /// Draw a sprite with its top-left corner at board coordinates
    fn draw_sprite(&mut self, sprite: SpriteId, x: f32, y: f32);

    /// Replace the text of a label
    fn set_label_text(&mut self, label: Label, value: &str);

    /// Play the brief level transition
    fn flash_splash(&mut self);
}

/// Apply events to labels and draw every entity
pub fn present<P: Presenter + ?Sized>(state: &GameState, events: &[GameEvent], presenter: &mut P) {
    for event in events {
        match *event {
            GameEvent::LevelChanged { level } => {
                presenter.set_label_text(Label::Level, &level.to_string())
            }
            GameEvent::CollectedChanged { count } => {
                presenter.set_label_text(Label::Gems, &count.to_string())
            }
            GameEvent::Splash => presenter.flash_splash(),
            GameEvent::GameOver { .. }
            | GameEvent::GemSpawned
            | GameEvent::GemExpired
            | GameEvent::GemCollected => {}
        }
    }

    presenter.begin_frame();
    for entity in state.entities() {
        let pos = entity.pos();
        presenter.draw_sprite(entity.sprite(), pos.x, pos.y);
    }
}
