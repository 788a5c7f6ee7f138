//! Play Scene
//!
//! Stars drop from the top at a shrinking interval. Clicking one catches it;
//! letting it reach the sand counts as fallen. The third fallen star ends the
//! round and hands the caught count to the score scene.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::assets::{manifest, AssetLibrary};
use crate::core::draw::DrawList;
use crate::core::physics::StaticGroup;
use crate::core::timer::DelayedCalls;
use crate::game::scene::{Scene, SceneKey, SceneRequest};
use crate::game::stars::{Star, StarId, StarPhase, StarPool};
use crate::game::LABEL_COLOR;

/// Tuning constants for a round.
pub mod consts {
    use glam::Vec2;

    pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 1000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f64 = 500.0;
    pub const SPAWN_INTERVAL_STEP_MS: f64 = 20.0;

    /// The round ends once more than this many stars have fallen.
    pub const FALLEN_LIMIT: u32 = 2;

    pub const SPAWN_X_MIN: i32 = 25;
    pub const SPAWN_X_MAX: i32 = 775;
    pub const SPAWN_Y: f32 = 26.0;
    pub const STAR_SIZE: Vec2 = Vec2::splat(50.0);
    pub const STAR_VELOCITY: Vec2 = Vec2::new(0.0, 200.0);

    pub const CAUGHT_REMOVAL_DELAY_MS: f64 = 100.0;
    pub const FALLEN_REMOVAL_DELAY_MS: f64 = 10.0;

    pub const GROUND_TILES: usize = 20;
    pub const GROUND_START: Vec2 = Vec2::new(20.0, 580.0);
    pub const GROUND_END: Vec2 = Vec2::new(820.0, 580.0);
    pub const GROUND_TILE_SIZE: Vec2 = Vec2::splat(40.0);

    pub const STATUS_POSITION: Vec2 = Vec2::new(10.0, 10.0);
    pub const STATUS_SIZE_PX: f32 = 24.0;
}

use consts::*;

/// Status line shown during play.
pub fn status_text(caught: u32, fallen: u32) -> String {
    format!("{} caught - {} fallen (max 3)", caught, fallen)
}

/// Spawn interval after `n` spawns in one round.
pub fn spawn_interval_after(n: u32) -> f64 {
    (INITIAL_SPAWN_INTERVAL_MS - SPAWN_INTERVAL_STEP_MS * n as f64).max(MIN_SPAWN_INTERVAL_MS)
}

// ============================================================================
// Play Session
// ============================================================================

/// Everything one round owns. Rebuilt on every entry into the play scene, so
/// nothing (counters, stars, pending removals) survives into the next round.
#[derive(Debug)]
pub struct PlaySession {
    spawn_interval: f64,
    last_spawn_time: f64,
    stars_caught: u32,
    stars_fallen: u32,
    stars: StarPool,
    ground: StaticGroup,
    removals: DelayedCalls<StarId>,
    status: String,
    /// Game time of the latest update; timers scheduled by input start here.
    now_ms: f64,
}

impl PlaySession {
    fn new() -> Self {
        Self {
            spawn_interval: INITIAL_SPAWN_INTERVAL_MS,
            last_spawn_time: 0.0,
            stars_caught: 0,
            stars_fallen: 0,
            stars: StarPool::new(),
            ground: StaticGroup::default(),
            removals: DelayedCalls::new(),
            status: String::new(),
            now_ms: 0.0,
        }
    }

    pub fn spawn_interval(&self) -> f64 {
        self.spawn_interval
    }

    pub fn last_spawn_time(&self) -> f64 {
        self.last_spawn_time
    }

    pub fn stars_caught(&self) -> u32 {
        self.stars_caught
    }

    pub fn stars_fallen(&self) -> u32 {
        self.stars_fallen
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn stars(&self) -> &StarPool {
        &self.stars
    }

    fn update(
        &mut self,
        time_ms: f64,
        dt: f32,
        gravity: Vec2,
        rng: &mut StdRng,
    ) -> Option<SceneRequest> {
        self.now_ms = time_ms;

        for id in self.removals.drain_due(time_ms) {
            self.stars.remove(id);
        }

        if time_ms - self.last_spawn_time > self.spawn_interval {
            self.last_spawn_time = time_ms;
            if self.spawn_interval > MIN_SPAWN_INTERVAL_MS {
                self.spawn_interval -= SPAWN_INTERVAL_STEP_MS;
            }
            self.emit_star(rng);
        }

        let mut landed = Vec::new();
        for (id, star) in self.stars.iter_mut() {
            if star.phase != StarPhase::Active {
                continue;
            }
            star.body.step(gravity, dt);
            if self.ground.overlaps(&star.body) {
                landed.push(id);
            }
        }

        let mut request = None;
        for id in landed {
            request = self.on_fall(id);
            if request.is_some() {
                break;
            }
        }

        self.status = status_text(self.stars_caught, self.stars_fallen);
        request
    }

    fn emit_star(&mut self, rng: &mut StdRng) {
        let x = rng.gen_range(SPAWN_X_MIN..=SPAWN_X_MAX) as f32;
        let id = self
            .stars
            .spawn(Star::new(Vec2::new(x, SPAWN_Y), STAR_SIZE, STAR_VELOCITY));
        log::debug!(
            "Star {:?} spawned at x={} (next interval {}ms)",
            id,
            x,
            self.spawn_interval
        );
    }

    /// Catches the topmost active star under the pointer, if any.
    fn pointer_down(&mut self, at: Vec2) {
        let hit = self
            .stars
            .iter()
            .filter(|(_, star)| star.phase == StarPhase::Active && star.body.bounds().contains(at))
            .map(|(id, _)| id)
            .last();

        if let Some(id) = hit {
            self.on_catch(id);
        }
    }

    fn on_catch(&mut self, id: StarId) {
        let Some(star) = self.stars.get_mut(id) else {
            return;
        };
        if !star.catch() {
            return;
        }
        self.stars_caught += 1;
        self.removals
            .schedule(self.now_ms, CAUGHT_REMOVAL_DELAY_MS, id);
        log::debug!("Star {:?} caught ({} total)", id, self.stars_caught);
    }

    fn on_fall(&mut self, id: StarId) -> Option<SceneRequest> {
        let star = self.stars.get_mut(id)?;
        if !star.fall() {
            return None;
        }
        self.stars_fallen += 1;
        self.removals
            .schedule(self.now_ms, FALLEN_REMOVAL_DELAY_MS, id);
        log::debug!("Star {:?} fell ({} total)", id, self.stars_fallen);

        if self.stars_fallen > FALLEN_LIMIT {
            log::info!("Round over: {} caught", self.stars_caught);
            return Some(SceneRequest::Score {
                stars_caught: self.stars_caught,
            });
        }
        None
    }
}

// ============================================================================
// Play Scene
// ============================================================================

pub struct PlayScene {
    gravity: Vec2,
    rng: StdRng,
    session: Option<PlaySession>,
}

impl PlayScene {
    pub fn new(gravity: Vec2, rng: StdRng) -> Self {
        Self {
            gravity,
            rng,
            session: None,
        }
    }

    /// The running round, if the scene is active.
    pub fn session(&self) -> Option<&PlaySession> {
        self.session.as_ref()
    }
}

impl Scene for PlayScene {
    fn key(&self) -> SceneKey {
        SceneKey::Play
    }

    fn init(&mut self, _request: &SceneRequest) {
        self.session = Some(PlaySession::new());
    }

    fn preload(&mut self, assets: &mut AssetLibrary) {
        assets.image(manifest::STAR, manifest::STAR_PATH);
        assets.image(manifest::SAND, manifest::SAND_PATH);
    }

    fn create(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.ground =
                StaticGroup::place_on_line(GROUND_TILES, GROUND_START, GROUND_END, GROUND_TILE_SIZE);
        }
    }

    fn update(&mut self, time_ms: f64, dt: f32) -> Option<SceneRequest> {
        let session = self.session.as_mut()?;
        session.update(time_ms, dt, self.gravity, &mut self.rng)
    }

    fn pointer_down(&mut self, at: Vec2) -> Option<SceneRequest> {
        if let Some(session) = self.session.as_mut() {
            session.pointer_down(at);
        }
        None
    }

    fn shutdown(&mut self) {
        self.session = None;
    }

    fn draw(&self, list: &mut DrawList) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        for tile in session.ground.members() {
            list.image(manifest::SAND, tile.center, tile.half_size * 2.0, None);
        }
        for (_, star) in session.stars.iter() {
            list.image(manifest::STAR, star.body.position, star.body.size, star.tint);
        }
        list.text(
            session.status.clone(),
            STATUS_POSITION,
            STATUS_SIZE_PX,
            LABEL_COLOR,
        );
    }
}
