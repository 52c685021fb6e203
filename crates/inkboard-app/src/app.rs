//! Core application state and lifecycle.

use inkboard_core::theme::Theme;
use inkboard_core::{Board, Modifiers, PerformanceMonitor, TextEditSession};
use inkboard_render::{RenderContext, Renderer, TextEditState, VelloRenderer};
use kurbo::{Point, Size};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::shortcuts::ShortcutRegistry;

/// How often frame metrics go to the debug log, in frames.
const PERF_LOG_INTERVAL: u64 = 300;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Inkboard".to_string(),
            width: 1280,
            height: 800,
            theme: Theme::Light,
        }
    }
}

/// A live text session paired with its keystroke editor.
pub(crate) struct ActiveTextEdit {
    pub(crate) session: TextEditSession,
    pub(crate) editor: TextEditState,
}

/// Runtime state for the application.
pub(crate) struct AppState {
    // Windowing
    pub(crate) window: Arc<Window>,
    pub(crate) surface: RenderSurface<'static>,

    // Rendering
    pub(crate) vello_renderer: vello::Renderer,
    pub(crate) board_renderer: VelloRenderer,
    /// RGBA->surface format conversion (Vello's compute shaders need an
    /// Rgba8Unorm storage texture; the surface is usually Bgra8Unorm).
    pub(crate) texture_blitter: vello::wgpu::util::TextureBlitter,

    // State
    pub(crate) board: Board,
    pub(crate) theme: Theme,
    pub(crate) modifiers: Modifiers,
    /// Last cursor position in physical pixels.
    pub(crate) cursor: Point,
    pub(crate) text_edit: Option<ActiveTextEdit>,

    // Diagnostics
    pub(crate) perf: PerformanceMonitor,
    pub(crate) frame_count: u64,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
        }
    }

    /// Run the application event loop.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let mut app = App::new();
        event_loop.run_app(&mut app).expect("Event loop error");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        log::info!("Creating window...");

        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        let render_cx = self
            .render_cx
            .get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");
        let texture_blitter =
            vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut board = Board::new();
        board.set_viewport_size(surface.config.width as f64, surface.config.height as f64);

        log::info!(
            "Inkboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        ShortcutRegistry::print_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            board_renderer: VelloRenderer::new(),
            texture_blitter,
            board,
            theme: self.config.theme,
            modifiers: Modifiers::default(),
            cursor: Point::ZERO,
            text_edit: None,
            perf: PerformanceMonitor::new(),
            frame_count: 0,
        });

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                state
                    .board
                    .set_viewport_size(size.width as f64, size.height as f64);
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.perf.begin_frame();
                state.frame_count += 1;
                if state.frame_count % PERF_LOG_INTERVAL == 0 {
                    let m = state.perf.metrics();
                    log::debug!(
                        "{:.1} fps, frame {:.2}ms ({:.2}-{:.2}ms), {} entities",
                        m.fps,
                        m.avg_frame_time,
                        m.min_frame_time,
                        m.max_frame_time,
                        state.board.scene.len()
                    );
                }

                // Caret blink for a live text session.
                if let Some(edit) = state.text_edit.as_mut() {
                    edit.editor.cursor_blink();
                }
                let caret_visible = state
                    .text_edit
                    .as_ref()
                    .is_some_and(|edit| edit.editor.is_cursor_visible());

                let viewport = Size::new(
                    state.surface.config.width as f64,
                    state.surface.config.height as f64,
                );
                let ctx = RenderContext::new(
                    &state.board.scene,
                    &state.board.view,
                    viewport,
                    state.theme.colors(),
                )
                .with_scale_factor(state.window.scale_factor())
                .with_selected_image(state.board.gestures.selected_image())
                .with_editing(
                    state.text_edit.as_ref().map(|edit| &edit.session),
                    caret_visible,
                );
                state.board_renderer.build_scene(&ctx);
                let scene = state.board_renderer.take_scene();

                let base_color = state.theme.colors().background;
                present_scene(render_cx, state, &scene, base_color);

                // Continuous draw loop: the next frame is always scheduled.
                state.window.request_redraw();
            }

            // Everything else is raw input, translated in event_handler.
            other => {
                if let Some(render_cx) = self.render_cx.as_ref() {
                    state.handle_input(other, render_cx);
                }
            }
        }
    }
}

/// Render a built scene to the window surface.
fn present_scene(
    render_cx: &vello::util::RenderContext,
    state: &mut AppState,
    scene: &Scene,
    base_color: peniko::Color,
) {
    let device_handle = &render_cx.devices[state.surface.dev_id];
    let device = &device_handle.device;
    let queue = &device_handle.queue;

    let surface_texture = match state.surface.surface.get_current_texture() {
        Ok(t) => t,
        Err(e) => {
            log::warn!("Failed to get surface texture: {e:?}");
            return;
        }
    };

    let width = state.surface.config.width;
    let height = state.surface.config.height;
    let params = RenderParams {
        base_color,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };

    // Vello's compute pipeline wants an Rgba8Unorm storage texture; render
    // there and blit to the surface (which may be Bgra8Unorm).
    let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("vello render texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let render_texture_view =
        render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    if let Err(e) = state.vello_renderer.render_to_texture(
        device,
        queue,
        scene,
        &render_texture_view,
        &params,
    ) {
        log::error!("Failed to render: {e:?}");
        return;
    }

    let surface_view = surface_texture
        .texture
        .create_view(&vello::wgpu::TextureViewDescriptor::default());
    let mut blit_encoder =
        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("blit encoder"),
        });
    state.texture_blitter.copy(
        device,
        &mut blit_encoder,
        &render_texture_view,
        &surface_view,
    );
    queue.submit(std::iter::once(blit_encoder.finish()));

    surface_texture.present();
}

impl AppState {
    /// Render the current view offscreen and return it as encoded PNG bytes.
    pub(crate) fn capture_frame(
        &mut self,
        render_cx: &vello::util::RenderContext,
    ) -> Option<Vec<u8>> {
        let viewport = Size::new(
            self.surface.config.width as f64,
            self.surface.config.height as f64,
        );
        let ctx = RenderContext::new(
            &self.board.scene,
            &self.board.view,
            viewport,
            self.theme.colors(),
        )
        .with_scale_factor(self.window.scale_factor());
        let scene = self.board_renderer.build_export_scene(&ctx);

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let rgba = render_scene_to_rgba(
            &device_handle.device,
            &device_handle.queue,
            &mut self.vello_renderer,
            &scene,
            self.surface.config.width,
            self.surface.config.height,
            self.theme.colors().background,
        )?;
        encode_png(&rgba, self.surface.config.width, self.surface.config.height)
    }
}

/// Render a scene to an offscreen texture and read the pixels back.
fn render_scene_to_rgba(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
    base_color: peniko::Color,
) -> Option<Vec<u8>> {
    if width == 0 || height == 0 {
        return None;
    }

    let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("png export texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    let params = RenderParams {
        base_color,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };
    if let Err(e) = vello_renderer.render_to_texture(device, queue, scene, &texture_view, &params)
    {
        log::error!("Failed to render scene for PNG export: {e:?}");
        return None;
    }

    // wgpu requires 256-byte row alignment on readback buffers.
    let bytes_per_row = (width * 4).next_multiple_of(256);
    let buffer_size = (bytes_per_row * height) as u64;
    let readback_buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("png readback buffer"),
        size: buffer_size,
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("png copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = readback_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(vello::wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    let _ = device.poll(vello::wgpu::PollType::wait());
    if rx.recv().ok()?.is_err() {
        log::error!("Failed to map buffer for PNG readback");
        return None;
    }

    let data = buffer_slice.get_mapped_range();
    let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
    for row in 0..height {
        let row_start = (row * bytes_per_row) as usize;
        let row_end = row_start + (width * 4) as usize;
        rgba_data.extend_from_slice(&data[row_start..row_end]);
    }
    drop(data);
    readback_buffer.unmap();

    Some(rgba_data)
}

/// Encode raw RGBA pixels as a PNG.
pub(crate) fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().ok()?;
        writer.write_image_data(rgba_data).ok()?;
    }
    Some(png_data)
}
