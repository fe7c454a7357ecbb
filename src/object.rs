use crate::camera::OrthographicCamera;
use crate::render::Frame;

/// Anything living in the game's object list: ticked once per frame, then drawn
/// through the active camera.
pub trait GameObject {
    fn update(&mut self, dt: f32);
    fn draw(&self, frame: &mut Frame, camera: &OrthographicCamera);
}
