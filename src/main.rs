//! Starfall - Main Entry Point
//!
//! Host shell for the game:
//! - Loads configuration and builds the scenes
//! - Creates the window (or canvas, mounted into the page on wasm)
//! - Runs fixed-timestep game logic (60 Hz) with variable-rate rendering
//! - Maps mouse and touch presses into game space

use std::sync::Arc;

use anyhow::Context as _;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

use starfall::core::draw::DrawList;
use starfall::core::time::FIXED_TIMESTEP;
use starfall::core::{FixedStep, GameConfig, Renderer, Time};
use starfall::game::GameState;

/// Application state handler for winit 0.30.
///
/// The renderer arrives as a user event because on wasm it can only be built
/// asynchronously.
struct App {
    config: GameConfig,
    /// Taken when the window is created.
    proxy: Option<EventLoopProxy<Renderer>>,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    game_state: GameState,
    time: Time,
    fixed_step: FixedStep,
    /// Reused every frame.
    draw_list: DrawList,
    /// Last known cursor position in physical pixels.
    cursor: PhysicalPosition<f64>,
}

impl App {
    fn new(config: GameConfig, game_state: GameState, proxy: EventLoopProxy<Renderer>) -> Self {
        Self {
            config,
            proxy: Some(proxy),
            window: None,
            renderer: None,
            game_state,
            time: Time::new(),
            fixed_step: FixedStep::new(),
            draw_list: DrawList::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
        }
    }

    fn pointer_down(&mut self, position: PhysicalPosition<f64>) {
        let Some(window) = &self.window else {
            return;
        };
        if let Some(at) = window_to_game(position, window.inner_size(), self.config.world_size()) {
            self.game_state.pointer_down(at);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.time.update();
        self.game_state.poll_assets();

        for _ in 0..self.fixed_step.advance(self.time.delta_time()) {
            self.game_state.update(FIXED_TIMESTEP);
        }

        let Some(renderer) = &mut self.renderer else {
            return;
        };

        self.draw_list.clear();
        self.game_state.draw(&mut self.draw_list);

        match renderer.render(&self.draw_list, self.game_state.assets()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory!");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
            }
            Err(e) => {
                log::warn!("Render error: {:?}", e);
            }
        }

        renderer.request_redraw();
    }
}

impl ApplicationHandler<Renderer> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Starfall")
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        log::info!("Window created: {}x{}", self.config.width, self.config.height);

        #[cfg(target_arch = "wasm32")]
        mount_canvas(&window, &self.config.parent);

        self.window = Some(Arc::clone(&window));

        let Some(proxy) = self.proxy.take() else {
            return;
        };
        let config = self.config.clone();

        #[cfg(not(target_arch = "wasm32"))]
        match pollster::block_on(Renderer::new(window, &config)) {
            Ok(renderer) => {
                let _ = proxy.send_event(renderer);
            }
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            match Renderer::new(window, &config).await {
                Ok(renderer) => {
                    let _ = proxy.send_event(renderer);
                }
                Err(e) => log::error!("Failed to initialize renderer: {}", e),
            }
        });
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, renderer: Renderer) {
        log::info!("Renderer initialized successfully");
        renderer.request_redraw();
        self.renderer = Some(renderer);

        // Don't count renderer start-up as game time
        self.time = Time::new();
        log::info!(
            "Game loop initialized | Fixed timestep: {:.4}s ({} Hz)",
            FIXED_TIMESTEP,
            (1.0 / FIXED_TIMESTEP) as u32
        );
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(renderer) = &mut self.renderer {
            renderer.on_window_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                log::info!(
                    "Final stats: {} ticks, {:.2}s elapsed, {} scene starts, {:.0} fps",
                    self.game_state.tick_count,
                    self.game_state.time_ms / 1000.0,
                    self.game_state.scene_starts(),
                    self.time.fps()
                );
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                log::debug!(
                    "Window resized to {}x{}",
                    physical_size.width,
                    physical_size.height
                );
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.pointer_down(self.cursor);
            }
            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.pointer_down(touch.location);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Maps a physical window position into game-space pixels.
fn window_to_game(
    position: PhysicalPosition<f64>,
    window_size: PhysicalSize<u32>,
    world: Vec2,
) -> Option<Vec2> {
    if window_size.width == 0 || window_size.height == 0 {
        return None;
    }
    let x = position.x / window_size.width as f64;
    let y = position.y / window_size.height as f64;
    Some(Vec2::new(x as f32 * world.x, y as f32 * world.y))
}

/// Appends the canvas to the configured page element, or to `<body>`.
#[cfg(target_arch = "wasm32")]
fn mount_canvas(window: &Window, parent_id: &str) {
    use winit::platform::web::WindowExtWebSys;

    let Some(canvas) = window.canvas() else {
        log::error!("Window has no canvas to mount");
        return;
    };
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document to mount the canvas into");
        return;
    };

    let parent: Option<web_sys::Element> = document.get_element_by_id(parent_id).or_else(|| {
        log::warn!("No element with id '{}', mounting canvas on <body>", parent_id);
        document.body().map(Into::into)
    });

    match parent {
        Some(parent) => {
            if let Err(e) = parent.append_child(&canvas) {
                log::error!("Failed to mount canvas: {:?}", e);
            }
        }
        None => log::error!("Page has no <body> to mount the canvas into"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    // RUST_LOG overrides; wgpu logs show up too.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    // Panics go to console.error in the browser
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
fn run_app(event_loop: EventLoop<Renderer>, mut app: App) -> anyhow::Result<()> {
    event_loop.run_app(&mut app).context("event loop error")
}

#[cfg(target_arch = "wasm32")]
fn run_app(event_loop: EventLoop<Renderer>, app: App) -> anyhow::Result<()> {
    // Runs the app via the browser's event loop
    use winit::platform::web::EventLoopExtWebSys;
    event_loop.spawn_app(app);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    log::info!("Starfall starting...");

    let config = GameConfig::load().context("failed to load configuration")?;
    log::info!(
        "Renderer {:?} | {}x{} | physics {:?} gravity ({}, {})",
        config.renderer,
        config.width,
        config.height,
        config.physics.default,
        config.physics.gravity.x,
        config.physics.gravity.y
    );
    let game_state =
        GameState::new(&config, StdRng::from_entropy()).context("failed to register scenes")?;

    let event_loop = EventLoop::<Renderer>::with_user_event()
        .build()
        .context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let app = App::new(config, game_state, event_loop.create_proxy());
    run_app(event_loop, app)
}
