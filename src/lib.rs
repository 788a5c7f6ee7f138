//! Starfall - catch the falling stars
//!
//! Modules:
//! - `core`: configuration, timing, assets, physics, rendering
//! - `game`: the welcome / play / score scenes and the session that runs them

pub mod core;
pub mod game;
