//! Score Scene
//!
//! Shows how many stars were caught. A pointer press goes back to the title.

use glam::Vec2;

use crate::core::draw::DrawList;
use crate::game::scene::{Scene, SceneKey, SceneRequest};
use crate::game::LABEL_COLOR;

pub const HINT: &str = "Click to restart";

pub fn result_text(score: u32) -> String {
    format!("Your score is {}!", score)
}

#[derive(Default)]
pub struct ScoreScene {
    score: u32,
    result: String,
    armed: bool,
}

impl ScoreScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

impl Scene for ScoreScene {
    fn key(&self) -> SceneKey {
        SceneKey::Score
    }

    fn init(&mut self, request: &SceneRequest) {
        self.score = match request {
            SceneRequest::Score { stars_caught } => *stars_caught,
            other => {
                log::warn!("Score scene started with {:?}, showing 0", other);
                0
            }
        };
    }

    fn create(&mut self) {
        self.result = result_text(self.score);
        self.armed = true;
    }

    fn pointer_down(&mut self, _at: Vec2) -> Option<SceneRequest> {
        if !self.armed {
            return None;
        }
        self.armed = false;
        Some(SceneRequest::Welcome)
    }

    fn shutdown(&mut self) {
        self.armed = false;
    }

    fn draw(&self, list: &mut DrawList) {
        list.text(self.result.clone(), Vec2::new(200.0, 250.0), 48.0, LABEL_COLOR);
        list.text(HINT, Vec2::new(300.0, 350.0), 24.0, LABEL_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(stars_caught: u32) -> ScoreScene {
        let mut scene = ScoreScene::new();
        scene.init(&SceneRequest::Score { stars_caught });
        scene.create();
        scene
    }

    #[test]
    fn shows_carried_score() {
        let scene = started(5);
        assert_eq!(scene.score(), 5);

        let mut list = DrawList::new();
        scene.draw(&mut list);
        assert_eq!(list.texts(), vec!["Your score is 5!", "Click to restart"]);
    }

    #[test]
    fn press_returns_to_welcome_once() {
        let mut scene = started(0);
        assert_eq!(scene.pointer_down(Vec2::ZERO), Some(SceneRequest::Welcome));
        assert_eq!(scene.pointer_down(Vec2::ZERO), None);
    }

    #[test]
    fn bare_start_shows_zero() {
        let mut scene = ScoreScene::new();
        scene.init(&SceneRequest::Play);
        scene.create();
        assert_eq!(result_text(scene.score()), "Your score is 0!");
    }
}
