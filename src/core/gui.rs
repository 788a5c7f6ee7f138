//! GUI System - Scene Canvas
//!
//! Paints a frame's `DrawList` with egui:
//! - Text labels in game-space pixels, scaled to the window
//! - Textured sprites from the asset library, with tint
//!
//! Also tracks which egui textures mirror which asset keys.

use std::collections::HashMap;

use egui::{Color32, Context, FontId, Pos2, Rect, TextureHandle};
use glam::Vec2;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::core::assets::AssetLibrary;
use crate::core::draw::{Color, DrawCommand, DrawList};

/// Converts a draw color to egui's premultiplied form.
pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

/// Maps game-space points onto the egui screen rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasTransform {
    origin: Pos2,
    scale: egui::Vec2,
}

impl CanvasTransform {
    /// Stretches a `world` sized canvas over `screen`.
    pub fn new(screen: Rect, world: Vec2) -> Self {
        Self {
            origin: screen.min,
            scale: egui::vec2(screen.width() / world.x, screen.height() / world.y),
        }
    }

    pub fn point(&self, p: Vec2) -> Pos2 {
        Pos2::new(
            self.origin.x + p.x * self.scale.x,
            self.origin.y + p.y * self.scale.y,
        )
    }

    pub fn rect(&self, center: Vec2, size: Vec2) -> Rect {
        Rect::from_min_max(self.point(center - size * 0.5), self.point(center + size * 0.5))
    }

    /// Font sizes follow vertical scale so labels keep their layout.
    pub fn font_size(&self, size_px: f32) -> f32 {
        size_px * self.scale.y
    }
}

// ============================================================================
// GUI System
// ============================================================================

/// egui context, input state and wgpu renderer for the scene canvas.
pub struct GuiSystem {
    ctx: Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    /// Game-space canvas size.
    world: Vec2,
    /// Uploaded asset textures by asset key, with the asset version they hold.
    textures: HashMap<&'static str, (TextureHandle, u64)>,
}

impl GuiSystem {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        world: Vec2,
    ) -> Self {
        let ctx = Context::default();

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        log::info!("GUI system initialized ({}x{} canvas)", world.x, world.y);

        Self {
            ctx,
            state,
            renderer,
            world,
            textures: HashMap::new(),
        }
    }

    /// Feeds window events to egui (resize, scale factor).
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Uploads asset images egui has not seen yet, or that changed since.
    fn sync_textures(&mut self, assets: &AssetLibrary) {
        for key in assets.keys() {
            let Some(version) = assets.version(key) else {
                continue;
            };
            if self.textures.get(key).is_some_and(|(_, seen)| *seen == version) {
                continue;
            }
            let Some(image) = assets.get(key) else {
                continue;
            };
            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [image.width as usize, image.height as usize],
                &image.data,
            );

            match self.textures.get_mut(key) {
                Some((handle, seen)) => {
                    handle.set(color_image, egui::TextureOptions::LINEAR);
                    *seen = version;
                    log::debug!("Replaced texture '{}' (v{})", key, version);
                }
                None => {
                    let handle =
                        self.ctx
                            .load_texture(key, color_image, egui::TextureOptions::LINEAR);
                    log::debug!("Uploaded texture '{}'", key);
                    self.textures.insert(key, (handle, version));
                }
            }
        }
    }

    /// Paints the draw list and returns egui's output for this frame.
    pub fn paint(
        &mut self,
        window: &Window,
        list: &DrawList,
        assets: &AssetLibrary,
    ) -> egui::FullOutput {
        self.sync_textures(assets);
        let raw_input = self.state.take_egui_input(window);

        self.ctx.run(raw_input, |ctx| {
            let transform = CanvasTransform::new(ctx.screen_rect(), self.world);
            let painter = ctx.layer_painter(egui::LayerId::background());
            let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

            for command in list.iter() {
                match command {
                    DrawCommand::Image {
                        texture,
                        center,
                        size,
                        tint,
                    } => {
                        let Some((handle, _)) = self.textures.get(texture) else {
                            continue;
                        };
                        let tint = tint.map_or(Color32::WHITE, to_color32);
                        painter.image(handle.id(), transform.rect(*center, *size), uv, tint);
                    }
                    DrawCommand::Text {
                        text,
                        position,
                        size_px,
                        color,
                    } => {
                        painter.text(
                            transform.point(*position),
                            egui::Align2::LEFT_TOP,
                            text,
                            FontId::proportional(transform.font_size(*size_px)),
                            to_color32(*color),
                        );
                    }
                }
            }
        })
    }

    /// Tessellates and uploads egui buffers.
    pub fn prepare_render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        output: &egui::FullOutput,
    ) -> Vec<egui::ClippedPrimitive> {
        self.state
            .handle_platform_output(window, output.platform_output.clone());

        let primitives = self
            .ctx
            .tessellate(output.shapes.clone(), output.pixels_per_point);

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [window.inner_size().width, window.inner_size().height],
            pixels_per_point: output.pixels_per_point,
        };

        self.renderer
            .update_buffers(device, queue, encoder, &primitives, &screen_descriptor);

        primitives
    }

    /// Renders egui into the given render pass.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        size_in_pixels: [u32; 2],
        pixels_per_point: f32,
    ) {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point,
        };

        self.renderer
            .render(render_pass, primitives, &screen_descriptor);
    }

    /// Frees textures that are no longer needed.
    pub fn cleanup_textures(&mut self, output: &egui::FullOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
