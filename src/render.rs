//! Frame composition against an abstract drawing surface
//!
//! `draw_frame` only reads state and emits commands; it never inspects pixels.
//! The browser host backs `DrawingSurface` with a 2D canvas, tests use
//! `DrawList`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::format_time;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Rect};

/// Opaque RGB colour, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s).ok_or_else(|| format!("invalid colour {:?}, expected #rrggbb", s))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub const fn centered(size: f32, color: Color) -> Self {
        Self {
            size,
            align: TextAlign::Center,
            color,
        }
    }
}

/// Images the game may draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Arrow-key hint shown under the shaft once the run starts
    ControlsHint,
}

/// Where the controls hint sits on the canvas
pub const CONTROLS_HINT_RECT: Rect =
    Rect::new(CANVAS_WIDTH / 2.0 - 50.0, CANVAS_HEIGHT - 70.0, 100.0, 50.0);

/// Write-only 2D drawing target
pub trait DrawingSurface {
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);
    fn draw_image(&mut self, image: ImageId, rect: Rect);
    /// Whether `image` has finished loading; unloaded images are skipped
    fn image_ready(&self, image: ImageId) -> bool;
}

/// A recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Rect { rect: Rect, color: Color },
    Text { text: String, x: f32, y: f32, style: TextStyle },
    Image { image: ImageId, rect: Rect },
}

/// Surface that records commands instead of drawing
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    /// Images reported as loaded
    pub ready_images: Vec<ImageId>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_images(images: &[ImageId]) -> Self {
        Self {
            commands: Vec::new(),
            ready_images: images.to_vec(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn rects_with(&self, color: Color) -> impl Iterator<Item = &Rect> {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::Rect { rect, color: c } if *c == color => Some(rect),
            _ => None,
        })
    }

    pub fn has_image(&self, image: ImageId) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Image { image: i, .. } if *i == image))
    }
}

impl DrawingSurface for DrawList {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
    }

    fn draw_image(&mut self, image: ImageId, rect: Rect) {
        self.commands.push(DrawCommand::Image { image, rect });
    }

    fn image_ready(&self, image: ImageId) -> bool {
        self.ready_images.contains(&image)
    }
}

const BANNER_SIZE: f32 = 30.0;
const HUD_SIZE: f32 = 20.0;

/// Draw one complete frame for the current state
pub fn draw_frame(state: &GameState, settings: &Settings, surface: &mut impl DrawingSurface) {
    surface.clear();
    draw_walls(surface);

    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;

    match state.phase {
        GamePhase::NotStarted => {}
        GamePhase::Intro => {
            let banner = TextStyle::centered(BANNER_SIZE, Color::RED);
            surface.fill_text("OH NO... YOU FELL", cx, cy - 50.0, banner);
            surface.fill_text("INTO 404 HELL", cx, cy, banner);

            // Player sprite drops through the banner
            let mut rect = state.player.rect();
            rect.y += state.intro_frame as f32 * INTRO_FALL_PER_FRAME;
            surface.fill_rect(rect, Color::WHITE);
        }
        GamePhase::Running => {
            draw_world(state, surface);
        }
        GamePhase::GameOver => {
            draw_world(state, surface);

            surface.fill_text("GAME OVER", cx, cy, TextStyle::centered(BANNER_SIZE, Color::RED));
            let hud = TextStyle::centered(HUD_SIZE, Color::WHITE);
            let survived = format!("You survived {}", format_time(state.elapsed_secs as f64));
            surface.fill_text(&survived, cx, cy + 40.0, hud);
            surface.fill_text("Press R to try again", cx, cy + 70.0, hud);
        }
    }

    if state.intro_done() {
        if settings.show_timer {
            let timer = format_time(state.elapsed_secs as f64);
            surface.fill_text(&timer, cx, 30.0, TextStyle::centered(HUD_SIZE, Color::WHITE));
        }
        if settings.show_controls_hint && surface.image_ready(ImageId::ControlsHint) {
            surface.draw_image(ImageId::ControlsHint, CONTROLS_HINT_RECT);
        }
    }
}

fn draw_walls(surface: &mut impl DrawingSurface) {
    let left = Rect::new(LEFT_BOUNDARY - WALL_THICKNESS, 0.0, WALL_THICKNESS, CANVAS_HEIGHT);
    let right = Rect::new(RIGHT_BOUNDARY, 0.0, WALL_THICKNESS, CANVAS_HEIGHT);
    surface.fill_rect(left, Color::WHITE);
    surface.fill_rect(right, Color::WHITE);
}

fn draw_world(state: &GameState, surface: &mut impl DrawingSurface) {
    surface.fill_rect(state.player.rect(), Color::WHITE);
    for obstacle in &state.obstacles {
        let color = state
            .tuning
            .category(obstacle.kind)
            .map(|c| c.color)
            .unwrap_or(Color::RED);
        surface.fill_rect(obstacle.rect(), color);
    }
}
