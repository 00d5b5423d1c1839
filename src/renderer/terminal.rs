//! Terminal presenter built on crossterm
//!
//! The 505x606 board is mapped onto a grid of character cells: each board
//! column is `CELL_W` characters wide and each row `CELL_H` lines tall. Frames
//! are composed in memory and only changed cells are written out.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};

use super::{Label, Presenter};
use crate::consts::{BOARD_COLUMNS, BOARD_ROWS, COLUMN_WIDTH, ROW_HEIGHT, SPLASH_DURATION};
use crate::settings::Settings;
use crate::sim::SpriteId;

const CELL_W: u16 = 12;
const CELL_H: u16 = 3;
const HUD_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 1;

const BOARD_W: u16 = CELL_W * BOARD_COLUMNS as u16;
const BOARD_H: u16 = CELL_H * BOARD_ROWS as u16;

/// Smallest terminal the board fits in
pub const MIN_TERM_W: u16 = BOARD_W;
pub const MIN_TERM_H: u16 = BOARD_H + HUD_ROWS + FOOTER_ROWS;

/// Board y offset so sprites land on the row they stand in
const ROW_BIAS: f32 = 35.0;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
    bg: Color::Black,
};

/// Character grid composed each frame, flushed as runs of changed cells
struct Frame {
    w: u16,
    h: u16,
    cells: Vec<Cell>,
    /// What the terminal currently shows; `None` forces a redraw
    shown: Vec<Option<Cell>>,
}

impl Frame {
    fn new(w: u16, h: u16) -> Self {
        let len = (w as usize) * (h as usize);
        Self {
            w,
            h,
            cells: vec![BLANK; len],
            shown: vec![None; len],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 {
            return None;
        }
        Some(y as usize * self.w as usize + x as usize)
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, bg: Color) {
        for yy in y..y.saturating_add(h) {
            for xx in x..x.saturating_add(w) {
                if let Some(i) = self.index(xx as i32, yy as i32) {
                    self.cells[i] = Cell { ch: ' ', fg: Color::White, bg };
                }
            }
        }
    }

    /// Write `s` starting at a possibly off-screen position; `bg: None` keeps
    /// whatever background is already there
    fn text(&mut self, x: i32, y: i32, s: &str, fg: Color, bg: Option<Color>) {
        for (ch, xx) in s.chars().zip(x..) {
            if let Some(i) = self.index(xx, y) {
                let bg = bg.unwrap_or(self.cells[i].bg);
                self.cells[i] = Cell { ch, fg, bg };
            }
        }
    }

    fn row_text(&self, y: u16) -> String {
        let start = y as usize * self.w as usize;
        self.cells[start..start + self.w as usize].iter().map(|c| c.ch).collect()
    }

    fn flush<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut style = None::<(Color, Color)>;
        let mut run = String::new();

        for y in 0..self.h {
            let row = y as usize * self.w as usize;
            let mut x = 0usize;
            while x < self.w as usize {
                if self.shown[row + x] == Some(self.cells[row + x]) {
                    x += 1;
                    continue;
                }

                queue!(out, cursor::MoveTo(x as u16, y))?;
                while x < self.w as usize && self.shown[row + x] != Some(self.cells[row + x]) {
                    let cell = self.cells[row + x];
                    if style != Some((cell.fg, cell.bg)) {
                        if !run.is_empty() {
                            queue!(out, Print(&run))?;
                            run.clear();
                        }
                        queue!(out, SetForegroundColor(cell.fg), SetBackgroundColor(cell.bg))?;
                        style = Some((cell.fg, cell.bg));
                    }
                    run.push(cell.ch);
                    self.shown[row + x] = Some(cell);
                    x += 1;
                }
                if !run.is_empty() {
                    queue!(out, Print(&run))?;
                    run.clear();
                }
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }
}

/// How a sprite id is drawn
struct Glyph {
    text: &'static str,
    fg: Color,
}

fn glyph_for(sprite: SpriteId) -> Glyph {
    let name = sprite
        .rsplit('/')
        .next()
        .unwrap_or(sprite)
        .trim_end_matches(".png");
    match name {
        "enemy-bug" => Glyph { text: "=[BUG]=>", fg: Color::Red },
        "gem-blue" => Glyph { text: "<>", fg: Color::Blue },
        "gem-green" => Glyph { text: "<>", fg: Color::Green },
        "gem-orange" => Glyph { text: "<>", fg: Color::Rgb { r: 255, g: 150, b: 0 } },
        "char-boy" => Glyph { text: "\\o/", fg: Color::White },
        "char-cat-girl" => Glyph { text: "=^.^=", fg: Color::Magenta },
        "char-horn-girl" => Glyph { text: "\\^/", fg: Color::Yellow },
        "char-pink-girl" => Glyph { text: "(o)", fg: Color::Rgb { r: 255, g: 120, b: 200 } },
        "char-princess-girl" => Glyph { text: "*o*", fg: Color::Cyan },
        _ => Glyph { text: "?", fg: Color::White },
    }
}

/// Background of board row `row` (water, stone lanes, grass)
fn row_bg(row: u16, high_contrast: bool) -> Color {
    if high_contrast {
        return if row % 2 == 0 { Color::Black } else { Color::DarkGrey };
    }
    match row {
        0 => Color::Rgb { r: 30, g: 80, b: 170 },
        1..=3 => Color::Rgb { r: 90, g: 90, b: 90 },
        _ => Color::Rgb { r: 40, g: 120, b: 40 },
    }
}

/// Where the board sits inside the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Viewport {
    board_x: u16,
    board_y: u16,
}

fn fit_view(term_w: u16, term_h: u16) -> Option<Viewport> {
    if term_w < MIN_TERM_W || term_h < MIN_TERM_H {
        return None;
    }
    Some(Viewport {
        board_x: (term_w - BOARD_W) / 2,
        board_y: HUD_ROWS + (term_h - MIN_TERM_H) / 2,
    })
}

/// Board coordinates to terminal cell (column of the sprite's left edge, line)
fn board_to_cell(view: &Viewport, x: f32, y: f32) -> (i32, i32) {
    let cx = (x / COLUMN_WIDTH * CELL_W as f32).round() as i32;
    let row = ((y + ROW_BIAS) / ROW_HEIGHT).floor() as i32;
    let cy = row * CELL_H as i32 + CELL_H as i32 / 2;
    (view.board_x as i32 + cx, view.board_y as i32 + cy)
}

/// Presenter that draws the board into a terminal
pub struct TerminalPresenter {
    frame: Frame,
    view: Option<Viewport>,
    settings: Settings,
    level: String,
    gems: String,
    splash_left: f32,
    fps: u32,
}

impl TerminalPresenter {
    pub fn new(term_w: u16, term_h: u16, settings: Settings) -> Self {
        Self {
            frame: Frame::new(term_w, term_h),
            view: fit_view(term_w, term_h),
            settings,
            level: String::new(),
            gems: String::new(),
            splash_left: 0.0,
            fps: 0,
        }
    }

    pub fn resize(&mut self, term_w: u16, term_h: u16) {
        self.frame = Frame::new(term_w, term_h);
        self.view = fit_view(term_w, term_h);
        log::debug!("Resized to {}x{}", term_w, term_h);
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps;
    }

    /// Current text of a label
    pub fn label_text(&self, label: Label) -> &str {
        match label {
            Label::Level => &self.level,
            Label::Gems => &self.gems,
        }
    }

    pub fn splash_active(&self) -> bool {
        self.splash_left > 0.0
    }

    /// Draw HUD, footer and splash over the frame, then write it out
    pub fn finish_frame<W: Write>(&mut self, out: &mut W, dt: f32, paused: bool) -> io::Result<()> {
        self.splash_left = (self.splash_left - dt).max(0.0);

        match self.view {
            Some(view) => self.draw_overlay(view, paused),
            None => {
                self.frame.clear();
                let msg = format!("Terminal too small. Need at least {}x{}.", MIN_TERM_W, MIN_TERM_H);
                self.frame.text(0, 0, &msg, Color::White, Some(Color::Black));
            }
        }

        self.frame.flush(out)
    }

    fn draw_overlay(&mut self, view: Viewport, paused: bool) {
        let fg = Color::White;
        let bg = Color::Black;

        let mut hud = format!("Level {}   Gems {}", self.level, self.gems);
        if self.settings.show_fps {
            hud.push_str(&format!("   {} fps", self.fps));
        }
        if paused {
            hud.push_str("   PAUSED");
        }
        let (left, top) = (view.board_x as i32, view.board_y as i32);
        self.frame.text(left, top - HUD_ROWS as i32, &hud, fg, Some(bg));

        if self.settings.show_help {
            self.frame.text(
                left,
                top + BOARD_H as i32,
                "Arrows/WASD move  Space pause  R restart  Q quit",
                Color::DarkGrey,
                Some(bg),
            );
        }

        if self.splash_active() {
            let text = format!("  LEVEL {}  ", self.level);
            let x = left + (BOARD_W as i32 - text.len() as i32).max(0) / 2;
            let y = top + BOARD_H as i32 / 2;
            self.frame.text(x, y, &text, Color::Black, Some(Color::Yellow));
        }
    }
}

impl Presenter for TerminalPresenter {
    fn begin_frame(&mut self) {
        self.frame.clear();
        let Some(view) = self.view else { return };

        for row in 0..BOARD_ROWS as u16 {
            let bg = row_bg(row, self.settings.high_contrast);
            self.frame
                .fill_rect(view.board_x, view.board_y + row * CELL_H, BOARD_W, CELL_H, bg);
        }
    }

    fn draw_sprite(&mut self, sprite: SpriteId, x: f32, y: f32) {
        let Some(view) = self.view else { return };
        let glyph = glyph_for(sprite);
        let width = glyph.text.chars().count() as i32;
        let (cx, cy) = board_to_cell(&view, x, y);
        // Center narrow sprites in their column
        let cx = cx + (CELL_W as i32 - width).max(0) / 2;

        let left = view.board_x as i32;
        let right = left + BOARD_W as i32;
        let top = view.board_y as i32;
        let bottom = top + BOARD_H as i32;
        if cy < top || cy >= bottom {
            return;
        }

        // Clip to the board, not just the terminal
        let start = cx.max(left);
        let visible: String = glyph
            .text
            .chars()
            .skip((start - cx) as usize)
            .take((right - start).max(0) as usize)
            .collect();
        let fg = if self.settings.high_contrast { Color::White } else { glyph.fg };
        self.frame.text(start, cy, &visible, fg, None);
    }

    fn set_label_text(&mut self, label: Label, value: &str) {
        match label {
            Label::Level => self.level = value.to_string(),
            Label::Gems => self.gems = value.to_string(),
        }
    }

    fn flash_splash(&mut self) {
        if self.settings.effective_splash() {
            self.splash_left = SPLASH_DURATION;
        }
    }
}
