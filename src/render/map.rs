//! Scrolling background map
//!
//! The tile layout is designed once from a seed. Scrolling shifts where
//! tiles are drawn, never the world coordinates of anything on top of them.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::surface::{Canvas, Color};
use crate::sim::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Grass,
    Dirt,
    Sand,
    Rock,
}

impl Tile {
    pub fn color(self) -> Color {
        match self {
            Tile::Grass => [0.24, 0.42, 0.2, 1.0],
            Tile::Dirt => [0.42, 0.32, 0.2, 1.0],
            Tile::Sand => [0.76, 0.68, 0.46, 1.0],
            Tile::Rock => [0.36, 0.36, 0.38, 1.0],
        }
    }
}

/// Static tile grid
#[derive(Debug, Clone)]
pub struct Map {
    tile_size: i32,
    cols: i32,
    rows: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// Lay out enough tiles to cover a `width` x `height` view, plus one
    /// spare row so vertical wrap-around never shows a gap
    ///
    /// Tiles never grow past the larger view dimension.
    pub fn design(seed: u64, width: i32, height: i32, tile_size: i32) -> Self {
        let tile_size = tile_size.clamp(1, width.max(height).max(1));
        let cols = (width.max(0) as u32).div_ceil(tile_size as u32) as i32;
        let rows = (height.max(0) as u32).div_ceil(tile_size as u32) as i32 + 1;

        let mut rng = Pcg32::seed_from_u64(seed);
        let tiles = (0..cols * rows)
            .map(|_| match rng.random_range(0..100) {
                0..70 => Tile::Grass,
                70..85 => Tile::Dirt,
                85..95 => Tile::Sand,
                _ => Tile::Rock,
            })
            .collect();

        Self {
            tile_size,
            cols,
            rows,
            tiles,
        }
    }

    pub fn tile(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 || col >= self.cols || row >= self.rows {
            return None;
        }
        self.tiles.get((row * self.cols + col) as usize).copied()
    }

    pub fn height_px(&self) -> i32 {
        self.rows * self.tile_size
    }

    /// Draw the visible tiles, shifted down by `camera_y` and wrapped
    pub fn draw(&self, canvas: &mut impl Canvas, camera_y: i32) {
        let view = canvas.size();
        let map_h = self.height_px();
        let size = self.tile_size as f32;
        let camera_y = camera_y.rem_euclid(map_h);

        for row in 0..self.rows {
            let y = (row * self.tile_size + camera_y) % map_h;
            for col in 0..self.cols {
                let color = self.tiles[(row * self.cols + col) as usize].color();
                let x = (col * self.tile_size) as f32;
                for y in [y, y - map_h] {
                    if y < view.y && y + self.tile_size > 0 {
                        canvas.fill_rect(Rect::new(x, y as f32, size, size), color);
                    }
                }
            }
        }
    }
}
