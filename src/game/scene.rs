//! Scenes
//!
//! A scene is one mode of the game (welcome, play, score) with its own
//! init → preload → create lifecycle, per-tick update and pointer input.
//! Handlers return a `SceneRequest` to switch scenes; the manager applies it
//! before anything else is dispatched.

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::core::assets::AssetLibrary;
use crate::core::draw::DrawList;

/// Registered scene identities.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SceneKey {
    Welcome,
    Play,
    Score,
}

impl SceneKey {
    pub const ALL: [SceneKey; 3] = [SceneKey::Welcome, SceneKey::Play, SceneKey::Score];

    pub fn name(self) -> &'static str {
        match self {
            SceneKey::Welcome => "welcome",
            SceneKey::Play => "play",
            SceneKey::Score => "score",
        }
    }
}

/// A request to start a scene, carrying that scene's parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    Welcome,
    Play,
    Score { stars_caught: u32 },
}

impl SceneRequest {
    pub fn key(&self) -> SceneKey {
        match self {
            SceneRequest::Welcome => SceneKey::Welcome,
            SceneRequest::Play => SceneKey::Play,
            SceneRequest::Score { .. } => SceneKey::Score,
        }
    }

    /// Request used when a scene is started without parameters.
    pub fn bare(key: SceneKey) -> Self {
        match key {
            SceneKey::Welcome => SceneRequest::Welcome,
            SceneKey::Play => SceneRequest::Play,
            SceneKey::Score => SceneRequest::Score { stars_caught: 0 },
        }
    }
}

/// Lifecycle hooks of a scene.
pub trait Scene {
    fn key(&self) -> SceneKey;

    /// Receives the start request; resets per-entry state.
    fn init(&mut self, _request: &SceneRequest) {}

    /// Declares the images this scene needs.
    fn preload(&mut self, _assets: &mut AssetLibrary) {}

    /// Builds the scene's objects.
    fn create(&mut self);

    /// One fixed-timestep tick. `time_ms` is game time since boot.
    fn update(&mut self, _time_ms: f64, _dt: f32) -> Option<SceneRequest> {
        None
    }

    /// Pointer press at a game-space position.
    fn pointer_down(&mut self, _at: Vec2) -> Option<SceneRequest> {
        None
    }

    /// Releases per-entry state when another scene takes over.
    fn shutdown(&mut self) {}

    fn draw(&self, list: &mut DrawList);
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no scenes registered")]
    Empty,
    #[error("scene '{0}' registered more than once")]
    Duplicate(&'static str),
}

// ============================================================================
// Scene Manager
// ============================================================================

/// Owns the registered scenes and runs exactly one at a time.
pub struct SceneManager {
    scenes: Vec<Box<dyn Scene>>,
    active: usize,
    assets: AssetLibrary,
    /// Number of scene starts, including the boot scene.
    starts: u64,
}

impl SceneManager {
    /// Registers `scenes` in order and starts the first one.
    pub fn new(scenes: Vec<Box<dyn Scene>>, assets: AssetLibrary) -> Result<Self, SceneError> {
        let Some(first) = scenes.first() else {
            return Err(SceneError::Empty);
        };
        let first = first.key();

        for (i, scene) in scenes.iter().enumerate() {
            if scenes[..i].iter().any(|s| s.key() == scene.key()) {
                return Err(SceneError::Duplicate(scene.key().name()));
            }
        }

        let mut manager = Self {
            scenes,
            active: 0,
            assets,
            starts: 0,
        };
        manager.start(SceneRequest::bare(first));
        Ok(manager)
    }

    /// Shuts down the active scene and runs init/preload/create on the target.
    /// Requests for unregistered scenes are logged and ignored.
    pub fn start(&mut self, request: SceneRequest) {
        let key = request.key();
        let Some(index) = self.scenes.iter().position(|s| s.key() == key) else {
            log::error!("Scene '{}' is not registered", key.name());
            return;
        };

        if self.starts > 0 {
            self.scenes[self.active].shutdown();
            log::info!("Scene '{}' -> '{}'", self.active_key().name(), key.name());
        } else {
            log::info!("Booting scene '{}'", key.name());
        }

        self.active = index;
        self.starts += 1;

        let scene = &mut self.scenes[index];
        scene.init(&request);
        scene.preload(&mut self.assets);
        scene.create();
    }

    pub fn update(&mut self, time_ms: f64, dt: f32) {
        if let Some(request) = self.scenes[self.active].update(time_ms, dt) {
            self.start(request);
        }
    }

    pub fn pointer_down(&mut self, at: Vec2) {
        if let Some(request) = self.scenes[self.active].pointer_down(at) {
            self.start(request);
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        self.scenes[self.active].draw(list);
    }

    pub fn active_key(&self) -> SceneKey {
        self.scenes[self.active].key()
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetLibrary {
        &mut self.assets
    }

    pub fn starts(&self) -> u64 {
        self.starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AssetConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lifecycle calls and switches on every pointer press.
    struct Recorder {
        key: SceneKey,
        next: SceneRequest,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Scene for Recorder {
        fn key(&self) -> SceneKey {
            self.key
        }
        fn init(&mut self, request: &SceneRequest) {
            self.log.borrow_mut().push(format!("{}:init:{:?}", self.key.name(), request));
        }
        fn preload(&mut self, _assets: &mut AssetLibrary) {
            self.log.borrow_mut().push(format!("{}:preload", self.key.name()));
        }
        fn create(&mut self) {
            self.log.borrow_mut().push(format!("{}:create", self.key.name()));
        }
        fn pointer_down(&mut self, _at: Vec2) -> Option<SceneRequest> {
            Some(self.next)
        }
        fn shutdown(&mut self) {
            self.log.borrow_mut().push(format!("{}:shutdown", self.key.name()));
        }
        fn draw(&self, _list: &mut DrawList) {}
    }

    fn recorder(key: SceneKey, next: SceneRequest, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Scene> {
        Box::new(Recorder {
            key,
            next,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn boots_first_scene_and_runs_lifecycle_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::new(
            vec![
                recorder(SceneKey::Welcome, SceneRequest::Score { stars_caught: 4 }, &log),
                recorder(SceneKey::Score, SceneRequest::Welcome, &log),
            ],
            AssetLibrary::new(AssetConfig::offline()),
        )
        .unwrap();
        assert_eq!(manager.active_key(), SceneKey::Welcome);

        manager.pointer_down(Vec2::ZERO);
        assert_eq!(manager.active_key(), SceneKey::Score);
        assert_eq!(manager.starts(), 2);
        assert_eq!(
            *log.borrow(),
            vec![
                "welcome:init:Welcome",
                "welcome:preload",
                "welcome:create",
                "welcome:shutdown",
                "score:init:Score { stars_caught: 4 }",
                "score:preload",
                "score:create",
            ]
        );
    }

    #[test]
    fn ignores_unregistered_target() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = SceneManager::new(
            vec![recorder(SceneKey::Welcome, SceneRequest::Play, &log)],
            AssetLibrary::new(AssetConfig::offline()),
        )
        .unwrap();
        manager.pointer_down(Vec2::ZERO);
        assert_eq!(manager.active_key(), SceneKey::Welcome);
        assert_eq!(manager.starts(), 1);
    }

    #[test]
    fn rejects_empty_and_duplicate_registration() {
        let log = Rc::new(RefCell::new(Vec::new()));
        assert!(matches!(
            SceneManager::new(Vec::new(), AssetLibrary::new(AssetConfig::offline())),
            Err(SceneError::Empty)
        ));
        assert!(matches!(
            SceneManager::new(
                vec![
                    recorder(SceneKey::Play, SceneRequest::Play, &log),
                    recorder(SceneKey::Play, SceneRequest::Play, &log),
                ],
                AssetLibrary::new(AssetConfig::offline()),
            ),
            Err(SceneError::Duplicate("play"))
        ));
    }
}
