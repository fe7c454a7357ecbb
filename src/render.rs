use glam::Vec2;

use crate::{Coords, TermInt};
use crate::camera::OrthographicCamera;

/// Character buffer the size of the terminal. Objects draw into it, and the
/// terminal manager pushes the differences to the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: TermInt,
    height: TermInt,
    cells: Vec<char>,
}

impl Frame {
    pub fn new(size: Coords) -> Self {
        let (width, height) = size;
        Frame { width, height, cells: vec![' '; width as usize * height as usize] }
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = ' ');
    }

    pub fn get(&self, pos: Coords) -> Option<char> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Out-of-bounds writes are dropped.
    pub fn put(&mut self, pos: Coords, ch: char) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = ch;
        }
    }

    pub fn put_str(&mut self, pos: Coords, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            self.put((pos.0.saturating_add(i as TermInt), pos.1), ch);
        }
    }

    /// Paints the whole character block of the grid cell `world` falls in.
    pub fn fill_block(&mut self, camera: &OrthographicCamera, world: Vec2, ch: char) {
        if let Some((x, y)) = camera.world_to_screen(world) {
            let vp = camera.viewport();
            for dy in 0..vp.rows_per_unit {
                for dx in 0..vp.cols_per_unit {
                    self.put((x + dx, y + dy), ch);
                }
            }
        }
    }

    /// Draws a box just outside the rectangle starting at `top_left`.
    pub fn draw_border(&mut self, top_left: Coords, size: Coords) {
        if top_left.0 == 0 || top_left.1 == 0 {
            return;
        }

        let (start_x, start_y) = (top_left.0 - 1, top_left.1 - 1);
        let (end_x, end_y) = (top_left.0 + size.0, top_left.1 + size.1);

        for x in start_x..=end_x {
            let ch = if x == start_x || x == end_x {'+'} else {'-'};
            self.put((x, start_y), ch);
            self.put((x, end_y), ch);
        }

        for y in top_left.1..end_y {
            self.put((start_x, y), '|');
            self.put((end_x, y), '|');
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: Coords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }
}
