use std::collections::VecDeque;

use glam::{IVec2, Vec2, ivec2};

use crate::camera::OrthographicCamera;
use crate::object::GameObject;
use crate::render::Frame;
use Direction::*;

const SNAKE_BODY_CHAR: char = '█';
const MAX_QUEUED_TURNS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step in world space, +y pointing up.
    pub fn offset(self) -> IVec2 {
        match self {
            Up => ivec2(0, 1),
            Down => ivec2(0, -1),
            Left => ivec2(-1, 0),
            Right => ivec2(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// One cube of the snake: the cell it is leaving and where it is heading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BodyNode {
    pub cell: IVec2,
    pub direction: Direction,
}

impl BodyNode {
    fn position(&self, progress: f32) -> Vec2 {
        self.cell.as_vec2() + self.direction.offset().as_vec2() * progress
    }
}

pub struct Player {
    body: Vec<BodyNode>,
    next_direction: VecDeque<Direction>,
    progress: f32,
    pieces_to_add: u32,
    move_speed: f32,
    initial_length: usize,
}

impl Player {
    pub fn new(initial_length: usize) -> Self {
        let mut player = Player {
            body: vec![],
            next_direction: VecDeque::new(),
            progress: 0.0,
            pieces_to_add: 0,
            move_speed: 0.0,
            initial_length: initial_length.max(1),
        };
        player.reset();
        player
    }

    /// Back to a stationary snake at the origin, facing up, tail trailing below.
    pub fn reset(&mut self) {
        self.body = (0..self.initial_length as i32)
            .map(|i| BodyNode { cell: ivec2(0, -i), direction: Up })
            .collect();
        self.next_direction.clear();
        self.progress = 0.0;
        self.pieces_to_add = 0;
        self.move_speed = 0.0;
    }

    pub fn body(&self) -> &[BodyNode] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head_position(&self) -> Vec2 {
        self.body[0].position(self.progress)
    }

    pub fn head_direction(&self) -> Direction {
        self.body[0].direction
    }

    pub fn segment_positions(&self) -> impl DoubleEndedIterator<Item = Vec2> + ExactSizeIterator + '_ {
        self.body.iter().map(move |node| node.position(self.progress))
    }

    /// Cells covered by the snake, including the ones it is moving into.
    pub fn occupied_cells(&self) -> Vec<IVec2> {
        let mut cells: Vec<IVec2> = self.body().iter().map(|n| n.cell).collect();
        cells.push(self.body[0].cell + self.body[0].direction.offset());
        cells
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed.max(0.0);
    }

    /// Queues a turn. It is applied once the head reaches the next cell, so
    /// turning twice within one cell can never fold the head back onto the body.
    pub fn set_head_direction(&mut self, direction: Direction) {
        let last = self.next_direction.back().copied().unwrap_or_else(|| self.head_direction());

        if direction == last || direction == last.opposite() {
            return;
        }
        if self.next_direction.len() >= MAX_QUEUED_TURNS {
            return;
        }

        self.next_direction.push_back(direction);
    }

    pub fn queued_directions(&self) -> impl Iterator<Item = &Direction> {
        self.next_direction.iter()
    }

    /// The new piece is attached on the next cell step.
    pub fn add_body_piece(&mut self) {
        self.pieces_to_add += 1;
    }

    pub fn pieces_to_add(&self) -> u32 {
        self.pieces_to_add
    }

    /// Whether the head overlaps any segment from the third one on.
    pub fn hits_own_body(&self, half_extent: f32) -> bool {
        let head = self.head_position();
        self.segment_positions()
            .skip(2)
            .any(|pos| boxes_overlap(head, pos, half_extent))
    }

    pub fn head_char(&self) -> char {
        match self.head_direction() {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn step_cell(&mut self) {
        // The body always holds at least the head
        let old_tail = self.body[self.body.len() - 1];

        for node in self.body.iter_mut() {
            node.cell += node.direction.offset();
        }

        for i in (1..self.body.len()).rev() {
            self.body[i].direction = self.body[i - 1].direction;
        }

        if let Some(dir) = self.next_direction.pop_front() {
            self.body[0].direction = dir;
        }

        if self.pieces_to_add > 0 {
            self.pieces_to_add -= 1;
            self.body.push(old_tail);
        }
    }
}

impl GameObject for Player {
    fn update(&mut self, dt: f32) {
        self.progress += self.move_speed * dt;

        while self.progress >= 1.0 {
            self.progress -= 1.0;
            self.step_cell();
        }
    }

    fn draw(&self, frame: &mut Frame, camera: &OrthographicCamera) {
        // Tail first so the head always ends up on top
        for (i, pos) in self.segment_positions().enumerate().rev() {
            let ch = if i == 0 { self.head_char() } else { SNAKE_BODY_CHAR };
            frame.fill_block(camera, pos, ch);
        }
    }
}

/// Axis-aligned box test between two points with the same half-width.
pub fn boxes_overlap(a: Vec2, b: Vec2, half_extent: f32) -> bool {
    (a.x - b.x).abs() < half_extent && (a.y - b.y).abs() < half_extent
}
