//! Game Module
//!
//! Contains game-specific logic: scenes, stars, and the session state driven
//! by the fixed-timestep loop.

pub mod play;
pub mod scene;
pub mod score;
pub mod stars;
pub mod state;
pub mod welcome;

use rand::rngs::StdRng;

use crate::core::config::GameConfig;
use crate::core::draw::Color;

pub use play::PlayScene;
pub use scene::{Scene, SceneKey, SceneManager, SceneRequest};
pub use score::ScoreScene;
pub use state::GameState;
pub use welcome::WelcomeScene;

/// Color of every text label.
pub const LABEL_COLOR: Color = Color::from_rgb_hex(0xfbfbac);

/// Builds the scenes in the configured order.
pub fn build_scenes(config: &GameConfig, rng: StdRng) -> Vec<Box<dyn Scene>> {
    let mut rng = Some(rng);
    config
        .scenes
        .iter()
        .map(|key| -> Box<dyn Scene> {
            match key {
                SceneKey::Welcome => Box::new(WelcomeScene::new()),
                SceneKey::Play => Box::new(PlayScene::new(
                    config.physics.gravity.into(),
                    rng.take().unwrap_or_else(rand::SeedableRng::from_entropy),
                )),
                SceneKey::Score => Box::new(ScoreScene::new()),
            }
        })
        .collect()
}
