//! Game State
//!
//! Holds the simulation that is advanced at a fixed timestep: the scene
//! manager plus the game clock handed to every scene update.

use glam::Vec2;
use rand::rngs::StdRng;

use crate::core::assets::AssetLibrary;
use crate::core::config::GameConfig;
use crate::core::draw::DrawList;
use crate::game::scene::{SceneError, SceneKey, SceneManager};

/// The game session: one per running game.
pub struct GameState {
    scenes: SceneManager,
    /// Number of fixed-timestep updates that have occurred.
    pub tick_count: u64,
    /// Game time since boot in milliseconds.
    pub time_ms: f64,
}

impl GameState {
    pub fn new(config: &GameConfig, rng: StdRng) -> Result<Self, SceneError> {
        let assets = AssetLibrary::new(config.assets.clone());
        let scenes = SceneManager::new(super::build_scenes(config, rng), assets)?;
        Ok(Self {
            scenes,
            tick_count: 0,
            time_ms: 0.0,
        })
    }

    /// Advances the game by one fixed timestep of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.tick_count += 1;
        self.time_ms += dt as f64 * 1000.0;

        self.scenes.update(self.time_ms, dt);

        // Roughly every ten seconds
        if self.tick_count % 600 == 0 {
            log::debug!(
                "Tick {} | {:.1}s | scene '{}'",
                self.tick_count,
                self.time_ms / 1000.0,
                self.scenes.active_key().name()
            );
        }
    }

    /// Pointer press in game-space pixels.
    pub fn pointer_down(&mut self, at: Vec2) {
        self.scenes.pointer_down(at);
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.scenes.draw(list);
    }

    pub fn active_scene(&self) -> SceneKey {
        self.scenes.active_key()
    }

    pub fn scene_starts(&self) -> u64 {
        self.scenes.starts()
    }

    pub fn assets(&self) -> &AssetLibrary {
        self.scenes.assets()
    }

    /// Swaps in images that finished loading in the background.
    pub fn poll_assets(&mut self) {
        self.scenes.assets_mut().poll();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::manifest;
    use crate::core::config::AssetConfig;
    use crate::core::draw::DrawCommand;
    use crate::core::time::FIXED_TIMESTEP;
    use rand::SeedableRng;

    fn offline_config() -> GameConfig {
        GameConfig {
            assets: AssetConfig::offline(),
            ..GameConfig::default()
        }
    }

    fn new_game(seed: u64) -> GameState {
        GameState::new(&offline_config(), StdRng::seed_from_u64(seed)).unwrap()
    }

    /// Runs fixed steps until the active scene changes or `max_ticks` pass.
    fn run_until_scene_changes(game: &mut GameState, max_ticks: u32) -> bool {
        let start = game.active_scene();
        for _ in 0..max_ticks {
            game.update(FIXED_TIMESTEP);
            if game.active_scene() != start {
                return true;
            }
        }
        false
    }

    fn texts(game: &GameState) -> Vec<String> {
        let mut list = DrawList::new();
        game.draw(&mut list);
        list.texts().into_iter().map(str::to_string).collect()
    }

    fn star_count(game: &GameState) -> usize {
        let mut list = DrawList::new();
        game.draw(&mut list);
        list.iter()
            .filter(|command| {
                matches!(command, DrawCommand::Image { texture, .. } if *texture == manifest::STAR)
            })
            .count()
    }

    #[test]
    fn boots_into_welcome() {
        let game = new_game(1);
        assert_eq!(game.active_scene(), SceneKey::Welcome);
        assert_eq!(texts(&game), vec!["Starfall", "Click to start"]);
    }

    #[test]
    fn welcome_waits_for_exactly_one_press() {
        let mut game = new_game(2);
        assert!(!run_until_scene_changes(&mut game, 600));
        assert_eq!(game.active_scene(), SceneKey::Welcome);

        game.pointer_down(Vec2::new(400.0, 300.0));
        assert_eq!(game.active_scene(), SceneKey::Play);
        assert_eq!(game.scene_starts(), 2);
    }

    #[test]
    fn unattended_round_ends_with_zero_score() {
        let mut game = new_game(3);
        game.pointer_down(Vec2::ZERO);

        // Three stars have to spawn and fall; 30 seconds is plenty.
        assert!(run_until_scene_changes(&mut game, 60 * 30));
        assert_eq!(game.active_scene(), SceneKey::Score);
        assert_eq!(texts(&game), vec!["Your score is 0!", "Click to restart"]);
    }

    #[test]
    fn full_cycle_resets_round() {
        let mut game = new_game(4);
        game.pointer_down(Vec2::ZERO);
        assert!(run_until_scene_changes(&mut game, 60 * 30));

        game.pointer_down(Vec2::ZERO);
        assert_eq!(game.active_scene(), SceneKey::Welcome);
        game.pointer_down(Vec2::ZERO);
        assert_eq!(game.active_scene(), SceneKey::Play);

        // A new round starts from scratch: empty status until the first tick,
        // then zero counters.
        assert_eq!(texts(&game), vec![""]);
        game.update(FIXED_TIMESTEP);
        assert_eq!(texts(&game), vec!["0 caught - 0 fallen (max 3)"]);

        // The spawn clock restarts too: one star at once, then 1000 - 20 ms
        // until the next. A carried-over interval would already be at 940 or
        // below and spawn a second star earlier.
        assert_eq!(star_count(&game), 1);
        for _ in 0..58 {
            game.update(FIXED_TIMESTEP);
        }
        assert_eq!(star_count(&game), 1);
        game.update(FIXED_TIMESTEP);
        assert_eq!(star_count(&game), 2);
    }

    #[test]
    fn play_preload_registers_textures() {
        let mut game = new_game(5);
        assert_eq!(game.assets().keys().count(), 0);
        game.pointer_down(Vec2::ZERO);
        let mut keys: Vec<&str> = game.assets().keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["sand", "star"]);
    }

    #[test]
    fn clock_advances_in_milliseconds() {
        let mut game = new_game(6);
        for _ in 0..60 {
            game.update(FIXED_TIMESTEP);
        }
        assert_eq!(game.tick_count, 60);
        assert!((game.time_ms - 1000.0).abs() < 0.1);
    }
}
