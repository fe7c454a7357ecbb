use glam::{Vec2, ivec2};
use log::{debug, info, trace};
use rand::{SeedableRng, rngs::StdRng};

use crate::camera::OrthographicCamera;
use crate::config::Config;
use crate::fruit::Fruit;
use crate::input::{InputManager, Key};
use crate::object::GameObject;
use crate::render::Frame;
use crate::snake::{Player, boxes_overlap};

const DEAD_SNAKE_CHAR: char = 'X';

/// Result of a crash: what the round scored and where the snake died.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub score: u32,
    pub wreck: Vec<Vec2>,
}

pub struct Game {
    config: Config,
    player: Player,
    fruit: Fruit,
    camera: OrthographicCamera,
    current_score: u32,
    is_running: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        let player = Player::new(config.initial_length);
        let fruit = Fruit::new(ivec2(5, 0), config.fruit_grid_min, config.fruit_grid_max);
        let camera = OrthographicCamera::centered(config.arena_half_extent);

        Game { config, player, fruit, camera, current_score: 0, is_running: true, rng }
    }

    pub fn score(&self) -> u32 {
        self.current_score
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    #[cfg(test)]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[cfg(test)]
    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn camera_mut(&mut self) -> &mut OrthographicCamera {
        &mut self.camera
    }

    pub fn title(&self) -> String {
        format!("Snake - Score: {}", self.current_score)
    }

    /// Starts the next round after a game over.
    pub fn resume(&mut self) {
        self.is_running = true;
    }

    /// Advances one frame. Returns the finished round when the snake crashed;
    /// the game then stays stopped until `resume` is called.
    pub fn update(&mut self, dt: f32, input: &InputManager) -> Option<GameOver> {
        if !self.is_running {
            return None;
        }

        let head = self.player.head_position();

        if boxes_overlap(head, self.fruit.position(), self.config.fruit_half_extent) {
            self.fruit.relocate(&mut self.rng, &self.player.occupied_cells());
            self.player.add_body_piece();
            self.current_score += self.config.score_per_fruit;
            info!("Fruit eaten, score {}, fruit moved to {}", self.current_score, self.fruit.cell());
            debug!("Snake length {} with {} piece(s) pending", self.player.len(), self.player.pieces_to_add());
        }

        let limit = self.config.arena_half_extent;
        let out_of_bounds = head.x > limit || head.x < -limit || head.y > limit || head.y < -limit;

        if out_of_bounds || self.player.hits_own_body(self.config.body_half_extent) {
            let over = GameOver {
                score: self.current_score,
                wreck: self.player.segment_positions().collect(),
            };
            info!("Crashed at {} with score {} (out of bounds: {})", head, over.score, out_of_bounds);

            self.current_score = 0;
            self.player.reset();
            self.is_running = false;
            return Some(over);
        }

        trace!(
            "Player {} speed {} turns {:?}, fruit {}",
            head,
            self.player.move_speed(),
            self.player.queued_directions().collect::<Vec<_>>(),
            self.fruit.position()
        );

        let pressed = [Key::Up, Key::Down, Key::Left, Key::Right]
            .into_iter()
            .find(|key| input.is_key_down(*key));

        if let Some(dir) = pressed.and_then(Key::direction) {
            self.player.set_head_direction(dir);
            self.player.set_move_speed(self.config.move_speed);
        }

        for object in self.objects_mut() {
            object.update(dt);
        }

        None
    }

    pub fn draw(&self, frame: &mut Frame) {
        frame.clear();

        let (top_left, size) = self.camera.arena_rect();
        frame.draw_border(top_left, size);
        if top_left.1 > 0 {
            frame.put_str((top_left.0 + 1, top_left.1 - 1), &format!(" Score: {} ", self.current_score));
        }

        for object in self.objects() {
            object.draw(frame, &self.camera);
        }
    }

    pub fn draw_wreck(&self, frame: &mut Frame, over: &GameOver) {
        for pos in &over.wreck {
            frame.fill_block(&self.camera, *pos, DEAD_SNAKE_CHAR);
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    // Render order: the snake is drawn over the fruit
    fn objects(&self) -> [&dyn GameObject; 2] {
        [&self.fruit as &dyn GameObject, &self.player]
    }

    fn objects_mut(&mut self) -> [&mut dyn GameObject; 2] {
        [&mut self.fruit as &mut dyn GameObject, &mut self.player]
    }
}
