//! Core Engine Module
//!
//! Contains the engine-side systems the scenes lean on: configuration, time,
//! assets, arcade physics, timers, draw lists and rendering.

pub mod assets;
pub mod config;
pub mod draw;
pub mod gui;
pub mod physics;
pub mod renderer;
pub mod time;
pub mod timer;

pub use config::GameConfig;
pub use renderer::Renderer;
pub use time::{FixedStep, Time};
