use glam::{IVec2, Vec2, ivec2};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::camera::OrthographicCamera;
use crate::object::GameObject;
use crate::render::Frame;

const APPLE_CHAR: char = 'O';

pub struct Fruit {
    cell: IVec2,
    grid_min: i32,
    grid_max: i32,
}

impl Fruit {
    pub fn new(cell: IVec2, grid_min: i32, grid_max: i32) -> Self {
        Fruit { cell, grid_min, grid_max }
    }

    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    pub fn position(&self) -> Vec2 {
        self.cell.as_vec2()
    }

    /// Moves to a random cell of the fruit grid, avoiding `occupied` cells
    /// while any free one is left.
    pub fn relocate<R: Rng>(&mut self, rng: &mut R, occupied: &[IVec2]) {
        let range = self.grid_min..=self.grid_max;
        let choices: Vec<IVec2> = range.clone()
            .flat_map(|y| range.clone().map(move |x| ivec2(x, y)))
            .filter(|cell| !occupied.contains(cell))
            .collect();

        self.cell = match choices.choose(rng) {
            Some(cell) => *cell,
            None => ivec2(rng.gen_range(range.clone()), rng.gen_range(range)),
        };
    }
}

impl GameObject for Fruit {
    fn update(&mut self, _dt: f32) {}

    fn draw(&self, frame: &mut Frame, camera: &OrthographicCamera) {
        frame.fill_block(camera, self.position(), APPLE_CHAR);
    }
}
