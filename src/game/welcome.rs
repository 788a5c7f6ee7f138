//! Welcome Scene
//!
//! Title card. The first pointer press starts a round.

use glam::Vec2;

use crate::core::draw::DrawList;
use crate::game::scene::{Scene, SceneKey, SceneRequest};
use crate::game::LABEL_COLOR;

pub const TITLE: &str = "Starfall";
pub const HINT: &str = "Click to start";

#[derive(Default)]
pub struct WelcomeScene {
    /// Listening for the start click; cleared once it fires.
    armed: bool,
}

impl WelcomeScene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scene for WelcomeScene {
    fn key(&self) -> SceneKey {
        SceneKey::Welcome
    }

    fn create(&mut self) {
        self.armed = true;
    }

    fn pointer_down(&mut self, _at: Vec2) -> Option<SceneRequest> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        Some(SceneRequest::Play)
    }

    fn shutdown(&mut self) {
        self.armed = false;
    }

    fn draw(&self, list: &mut DrawList) {
        list.text(TITLE, Vec2::new(150.0, 200.0), 128.0, LABEL_COLOR);
        list.text(HINT, Vec2::new(300.0, 350.0), 24.0, LABEL_COLOR);
    }
}
