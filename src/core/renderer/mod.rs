//! Renderer Module
//!
//! Handles frame rendering using WebGPU:
//! - Clears to the configured background color
//! - Paints the scene's draw list through the egui canvas

mod context;

use std::sync::Arc;

use thiserror::Error;
use winit::window::Window;

use context::RenderContext;

use crate::core::assets::AssetLibrary;
use crate::core::config::{GameConfig, RendererMode};
use crate::core::draw::{Color, DrawList};
use crate::core::gui::GuiSystem;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no GPU adapter available for renderer mode {0:?}")]
    NoAdapter(RendererMode),
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

// ============================================================================
// Renderer
// ============================================================================

pub struct Renderer {
    /// WebGPU context (device, queue, surface).
    ctx: RenderContext,
    /// egui canvas painting text and sprites.
    gui: GuiSystem,
    window: Arc<Window>,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, RenderError> {
        let ctx = RenderContext::new(Arc::clone(&window), config.renderer).await?;
        let gui = GuiSystem::new(&ctx.device, ctx.config.format, &window, config.world_size());

        Ok(Self {
            ctx,
            gui,
            window,
            clear_color: clear_color(config.background()),
        })
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn on_window_event(&mut self, event: &winit::event::WindowEvent) {
        self.gui.on_window_event(&self.window, event);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    /// Renders a single frame.
    pub fn render(&mut self, list: &DrawList, assets: &AssetLibrary) -> Result<(), wgpu::SurfaceError> {
        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.ctx
                    .surface
                    .configure(&self.ctx.device, &self.ctx.config);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let gui_output = self.gui.paint(&self.window, list, assets);

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let primitives = self.gui.prepare_render(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &self.window,
            &gui_output,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Canvas Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.gui.render(
                &mut render_pass,
                &primitives,
                [self.ctx.config.width, self.ctx.config.height],
                gui_output.pixels_per_point,
            );
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.gui.cleanup_textures(&gui_output);
        Ok(())
    }
}

/// Background color as a wgpu clear value.
fn clear_color(color: Color) -> wgpu::Color {
    let [r, g, b, a] = color.to_f64_rgba();
    wgpu::Color { r, g, b, a }
}
