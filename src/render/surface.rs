//! Draw targets and presentation
//!
//! `Canvas` is everything the draw pass needs from a back buffer.
//! `SurfaceProvider` hands out back buffers and presents them, and reports
//! when the platform threw away a buffer's contents so the frame has to be
//! drawn again.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::assets::SpriteImage;
use crate::sim::Rect;

/// RGBA color, 0-1 per channel
pub type Color = [f32; 4];

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
    pub const CYAN: Color = [0.0, 1.0, 1.0, 1.0];
    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const BULLET: Color = [1.0, 0.85, 0.3, 1.0];
    pub const ENEMY_BULLET: Color = [1.0, 0.35, 0.2, 1.0];
}

/// Font settings for a line of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            bold: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A back buffer the draw pass paints into
pub trait Canvas {
    /// Drawable area in pixels
    fn size(&self) -> IVec2;
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Ellipse inscribed in `bounds`
    fn fill_oval(&mut self, bounds: Rect, color: Color);
    /// Draw a sprite with its top-left at `top_left`, rotated by `angle`
    /// around the sprite center
    fn draw_sprite(&mut self, sprite: &SpriteImage, top_left: Vec2, angle: f32);
    /// Draw text with its baseline starting at `pos`
    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle);
    /// Width and line height of `text`
    fn text_metrics(&self, text: &str, style: &TextStyle) -> Vec2;
}

/// Source of back buffers
pub trait SurfaceProvider {
    type Target: Canvas;

    /// Next back buffer, cleared
    fn acquire_draw_target(&mut self) -> &mut Self::Target;
    /// True if the buffer just drawn was restored after a loss and must be
    /// redrawn before it can be shown
    fn contents_restored(&mut self) -> bool;
    /// Show the back buffer
    fn present(&mut self);
    /// True if the presented buffer was lost and the frame must be redone
    fn contents_lost(&mut self) -> bool;
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillOval {
        bounds: Rect,
        color: Color,
    },
    Sprite {
        name: String,
        top_left: Vec2,
        angle: f32,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
    },
}

/// Canvas that records draw calls instead of rasterizing them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandList {
    size: IVec2,
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(size: IVec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text of every text command, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Names of every sprite drawn, in draw order
    pub fn sprite_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Canvas for CommandList {
    fn size(&self) -> IVec2 {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_oval(&mut self, bounds: Rect, color: Color) {
        self.commands.push(DrawCommand::FillOval { bounds, color });
    }

    fn draw_sprite(&mut self, sprite: &SpriteImage, top_left: Vec2, angle: f32) {
        self.commands.push(DrawCommand::Sprite {
            name: sprite.name.clone(),
            top_left,
            angle,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style: *style,
        });
    }

    /// Fixed-advance approximation of a sans-serif face
    fn text_metrics(&self, text: &str, style: &TextStyle) -> Vec2 {
        let advance = if style.bold { 0.62 } else { 0.55 };
        let width = text.chars().count() as f32 * style.size * advance;
        Vec2::new(width, (style.size * 1.2).ceil())
    }
}

/// Back buffers in the swap chain
pub const BUFFER_COUNT: usize = 3;

/// Headless triple-buffered surface
///
/// Records each frame as a `CommandList`. Loss and restore events can be
/// queued up to exercise the frame loop's redraw path.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    buffers: [CommandList; BUFFER_COUNT],
    back: usize,
    front: Option<usize>,
    pending_restores: u32,
    pending_losses: u32,
    acquires: u64,
    presents: u64,
}

impl RecordingSurface {
    pub fn new(size: IVec2) -> Self {
        Self {
            buffers: std::array::from_fn(|_| CommandList::new(size)),
            back: 0,
            front: None,
            pending_restores: 0,
            pending_losses: 0,
            acquires: 0,
            presents: 0,
        }
    }

    /// Report the next `n` drawn buffers as restored
    pub fn inject_restores(&mut self, n: u32) {
        self.pending_restores += n;
    }

    /// Report the next `n` presented buffers as lost
    pub fn inject_losses(&mut self, n: u32) {
        self.pending_losses += n;
    }

    /// Most recently presented frame
    pub fn front(&self) -> Option<&CommandList> {
        self.front.map(|i| &self.buffers[i])
    }

    pub fn acquires(&self) -> u64 {
        self.acquires
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }
}

impl SurfaceProvider for RecordingSurface {
    type Target = CommandList;

    fn acquire_draw_target(&mut self) -> &mut CommandList {
        self.acquires += 1;
        let target = &mut self.buffers[self.back];
        target.clear();
        target
    }

    fn contents_restored(&mut self) -> bool {
        take_pending(&mut self.pending_restores)
    }

    fn present(&mut self) {
        self.front = Some(self.back);
        self.back = (self.back + 1) % BUFFER_COUNT;
        self.presents += 1;
    }

    fn contents_lost(&mut self) -> bool {
        take_pending(&mut self.pending_losses)
    }
}

fn take_pending(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}
