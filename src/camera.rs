use glam::Vec2;

use crate::{Coords, TermInt};
use crate::error::{GameError, Result};

/// How world cells land on the terminal: where the grid starts and how many
/// characters one world unit takes on each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub origin: Coords,
    pub cols_per_unit: TermInt,
    pub rows_per_unit: TermInt,
}

pub struct OrthographicCamera {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    position: Vec2,
    viewport: Viewport,
}

impl OrthographicCamera {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32, position: Vec2) -> Self {
        let viewport = Viewport { origin: (1, 1), cols_per_unit: 2, rows_per_unit: 1 };
        OrthographicCamera { left, right, top, bottom, position, viewport }
    }

    /// Camera centred on the origin looking at a square arena of
    /// `half_extent` units on each side.
    pub fn centered(half_extent: f32) -> Self {
        Self::new(-half_extent, half_extent, half_extent, -half_extent, Vec2::ZERO)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of grid cells visible horizontally and vertically.
    pub fn grid_cells(&self) -> (TermInt, TermInt) {
        let w = ((self.right - self.left).round() as TermInt).saturating_add(1);
        let h = ((self.top - self.bottom).round() as TermInt).saturating_add(1);
        (w, h)
    }

    /// Chooses the largest whole-character scale that fits the grid plus a
    /// one-character border into `term_size`, and centres it.
    pub fn fit_to(&mut self, term_size: Coords) -> Result<()> {
        let (grid_w, grid_h) = self.grid_cells();
        let avail_w = term_size.0.saturating_sub(2);
        let avail_h = term_size.1.saturating_sub(2);

        let max_rows = avail_h / grid_h;
        let max_cols = avail_w / grid_w;

        if max_rows == 0 || max_cols == 0 {
            let need = (grid_w.saturating_add(2), grid_h.saturating_add(2));
            return Err(GameError::TerminalTooSmall { need, have: term_size });
        }

        // Terminal characters are roughly twice as tall as they are wide
        let cols = max_cols.min(max_rows * 2);
        let rows = max_rows.min((cols + 1) / 2).max(1);

        let arena = (grid_w * cols, grid_h * rows);
        let origin = ((term_size.0 - arena.0) / 2, (term_size.1 - arena.1) / 2);

        self.viewport = Viewport { origin, cols_per_unit: cols, rows_per_unit: rows };
        Ok(())
    }

    /// Top-left corner and size, in terminal characters, of the visible grid.
    pub fn arena_rect(&self) -> (Coords, Coords) {
        let (grid_w, grid_h) = self.grid_cells();
        let vp = self.viewport;
        (vp.origin, (grid_w * vp.cols_per_unit, grid_h * vp.rows_per_unit))
    }

    /// Terminal position of the top-left character of the grid cell nearest
    /// to `world`, or `None` outside the view volume.
    pub fn world_to_screen(&self, world: Vec2) -> Option<Coords> {
        let rel = world - self.position;
        let gx = (rel.x - self.left).round();
        let gy = (self.top - rel.y).round();

        let (grid_w, grid_h) = self.grid_cells();
        if gx < 0.0 || gy < 0.0 || gx >= grid_w as f32 || gy >= grid_h as f32 {
            return None;
        }

        let vp = self.viewport;
        Some((
            vp.origin.0 + gx as TermInt * vp.cols_per_unit,
            vp.origin.1 + gy as TermInt * vp.rows_per_unit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_default_terminal() {
        let mut camera = OrthographicCamera::centered(10.0);
        camera.fit_to((80, 24)).unwrap();

        // 21 cells: one row each, two columns each
        let vp = camera.viewport();
        assert_eq!((vp.cols_per_unit, vp.rows_per_unit), (2, 1));
        assert_eq!(camera.arena_rect(), ((19, 1), (42, 21)));
    }

    #[test]
    fn scales_up_on_large_terminals() {
        let mut camera = OrthographicCamera::centered(10.0);
        camera.fit_to((200, 70)).unwrap();

        let vp = camera.viewport();
        assert_eq!((vp.cols_per_unit, vp.rows_per_unit), (6, 3));
        let ((x, y), (w, h)) = camera.arena_rect();
        assert!(x >= 1 && y >= 1);
        assert!(x + w < 200 && y + h < 70);
    }

    #[test]
    fn narrow_terminal_keeps_square_cells_roughly() {
        let mut camera = OrthographicCamera::centered(10.0);
        camera.fit_to((30, 60)).unwrap();

        let vp = camera.viewport();
        assert_eq!((vp.cols_per_unit, vp.rows_per_unit), (1, 1));
    }

    #[test]
    fn too_small_terminal_is_an_error() {
        let mut camera = OrthographicCamera::centered(10.0);
        let err = camera.fit_to((40, 20)).unwrap_err();
        assert!(matches!(err, GameError::TerminalTooSmall { need: (23, 23), have: (40, 20) }));
    }

    #[test]
    fn oversized_arena_fails_without_overflow() {
        let mut camera = OrthographicCamera::centered(40000.0);
        assert_eq!(camera.grid_cells(), (TermInt::MAX, TermInt::MAX));

        let err = camera.fit_to((80, 24)).unwrap_err();
        assert!(matches!(
            err,
            GameError::TerminalTooSmall { need: (TermInt::MAX, TermInt::MAX), have: (80, 24) }
        ));
    }

    #[test]
    fn projects_corners_and_centre() {
        let mut camera = OrthographicCamera::centered(10.0);
        camera.fit_to((80, 24)).unwrap();

        assert_eq!(camera.world_to_screen(Vec2::new(-10.0, 10.0)), Some((19, 1)));
        assert_eq!(camera.world_to_screen(Vec2::new(10.0, -10.0)), Some((59, 21)));
        assert_eq!(camera.world_to_screen(Vec2::ZERO), Some((39, 11)));
        // Rounds to the nearest cell
        assert_eq!(camera.world_to_screen(Vec2::new(0.4, -0.6)), Some((39, 12)));
    }

    #[test]
    fn outside_volume_is_not_projected() {
        let camera = OrthographicCamera::centered(10.0);
        assert_eq!(camera.world_to_screen(Vec2::new(10.6, 0.0)), None);
        assert_eq!(camera.world_to_screen(Vec2::new(0.0, -11.0)), None);
        assert!(camera.world_to_screen(Vec2::new(10.3, 0.0)).is_some());
    }
}
