use anyhow::{Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use gallery_assets::{DecodedImage, ImageLoader, ImageSource, LoadEvent};
use gallery_common::{GalleryConfig, Screen};
use gallery_input::{Action, Debouncer, PointerTracker, TouchPhase, WheelDelta};
use gallery_kernel::{FrameLoop, Gallery};
use gallery_render_wgpu::WgpuRenderer;
use gallery_tools::GalleryInspector;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "gallery-desktop", about = "Infinite horizontal plane gallery")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image files, one plane each (overrides the config's list)
    images: Vec<PathBuf>,
}

/// Application state.
struct AppState {
    config: GalleryConfig,
    sources: Vec<ImageSource>,
    gallery: Option<Gallery>,
    tracker: PointerTracker,
    frame_loop: FrameLoop,
    loader: Option<ImageLoader>,
    snap: Option<Debouncer>,
    show_inspector: bool,
}

impl AppState {
    fn new(config: GalleryConfig, sources: Vec<ImageSource>) -> Self {
        let snap = config
            .snap_delay_ms
            .map(|ms| Debouncer::new(Duration::from_millis(ms)));
        Self {
            config,
            sources,
            gallery: None,
            tracker: PointerTracker::new(),
            frame_loop: FrameLoop::new(),
            loader: None,
            snap,
            show_inspector: false,
        }
    }

    /// Build the gallery against the first measured window size and start
    /// loading images no larger than `max_texture_dimension`.
    fn start(&mut self, screen: Screen, max_texture_dimension: u32) -> &Gallery {
        let labels: Vec<String> = self.sources.iter().map(ImageSource::label).collect();
        match ImageLoader::spawn(self.sources.clone(), max_texture_dimension) {
            Ok(loader) => self.loader = Some(loader),
            Err(e) => tracing::error!("failed to start image loader: {e}"),
        }
        self.frame_loop.start();
        self.gallery
            .insert(Gallery::new(self.config.clone(), labels, screen))
    }

    fn apply(&mut self, action: Option<Action>) {
        let (Some(action), Some(gallery)) = (action, &mut self.gallery) else {
            return;
        };
        if let Some(snap) = &mut self.snap {
            match action {
                Action::Wheel(_) => snap.trigger(Instant::now()),
                Action::PointerDown { .. } => snap.cancel(),
                _ => {}
            }
        }
        gallery.apply(&action);
    }

    /// Finished decodes waiting for GPU upload.
    fn drain_images(&mut self) -> Vec<DecodedImage> {
        let Some(loader) = &mut self.loader else {
            return Vec::new();
        };
        let mut loaded = Vec::new();
        for event in loader.drain() {
            match event {
                LoadEvent::Loaded(image) => loaded.push(image),
                LoadEvent::Failed { index, error } => {
                    tracing::warn!(index, "image failed to load: {error}");
                }
            }
        }
        if loader.is_done() {
            tracing::debug!("all images loaded");
            self.loader = None;
        }
        loaded
    }

    fn poll_snap(&mut self) {
        let (Some(snap), Some(gallery)) = (&mut self.snap, &mut self.gallery) else {
            return;
        };
        if snap.poll(Instant::now()) && !gallery.is_dragging() {
            gallery.snap_to_item();
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::F1 => {
                self.show_inspector = !self.show_inspector;
            }
            KeyCode::Home => {
                if let Some(gallery) = &mut self.gallery {
                    gallery.scroll_to(0.0);
                }
            }
            _ => {}
        }
    }

    fn shutdown(&mut self) {
        self.frame_loop.stop();
        self.tracker.detach();
        self.loader = None;
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }
        let Some(gallery) = &mut self.gallery else {
            return;
        };

        let summary = GalleryInspector::summary(gallery);
        let centered = GalleryInspector::centered_item(gallery);

        egui::SidePanel::left("inspector")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Gallery");
                ui.separator();
                ui.label(format!("Frame: {}", summary.frame));
                ui.label(format!(
                    "Scroll: {:.2} -> {:.2}",
                    summary.current, summary.target
                ));
                ui.label(format!("Direction: {}", summary.direction));
                ui.label(format!("Dragging: {}", summary.dragging));
                ui.label(format!(
                    "Viewport: {:.2} x {:.2}",
                    summary.viewport.width, summary.viewport.height
                ));
                ui.label(format!(
                    "Images: {} / {}",
                    summary.loaded_images, summary.item_count
                ));
                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Snap to item").clicked() {
                        gallery.snap_to_item();
                    }
                    if ui.button("Home").clicked() {
                        gallery.scroll_to(0.0);
                    }
                });

                ui.separator();
                ui.heading("Items");
                for index in 0..summary.item_count {
                    let Some(info) = GalleryInspector::inspect_item(gallery, index) else {
                        continue;
                    };
                    let text = format!("{}  x={:.2}", info.label, info.position_x);
                    if centered == Some(index) {
                        ui.strong(text);
                    } else {
                        ui.label(text);
                    }
                }

                ui.separator();
                ui.small("F1: Toggle Inspector | Drag/Wheel: Scroll | Home: Reset");
            });
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn redraw(&mut self) {
        let images = self.state.drain_images();
        self.state.poll_snap();

        let (Some(surface), Some(device), Some(queue), Some(renderer)) =
            (&self.surface, &self.device, &self.queue, &mut self.renderer)
        else {
            return;
        };
        for image in &images {
            if renderer.upload_image(device, queue, image) {
                if let Some(gallery) = &mut self.state.gallery {
                    gallery.set_image_size(image.index, image.width, image.height);
                }
            }
        }

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(config) = &self.config {
                    surface.configure(device, config);
                }
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let AppState {
            gallery,
            frame_loop,
            ..
        } = &mut self.state;
        let keep_running = match gallery {
            Some(gallery) => {
                frame_loop.step(gallery, |g| renderer.render(device, queue, &view, g))
            }
            None => false,
        };

        let (Some(window), Some(egui_winit), Some(egui_renderer), Some(config)) = (
            &self.window,
            &mut self.egui_winit,
            &mut self.egui_renderer,
            &self.config,
        ) else {
            output.present();
            return;
        };

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        if keep_running {
            window.request_redraw();
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Gallery")
            .with_inner_size(LogicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("gallery_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let logical = size.to_logical::<f32>(window.scale_factor());
        let gallery = self.state.start(
            Screen::new(logical.width, logical.height.max(1.0)),
            device.limits().max_texture_dimension_2d,
        );
        let renderer = WgpuRenderer::new(&device, &queue, surface_format, gallery.items().len());

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        window.request_redraw();
        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
        Ok(())
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialize GPU: {e:#}");
            self.state.shutdown();
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed && !ends_pointer(&event) {
                return;
            }
        }

        let scale = self.scale_factor();
        match event {
            WindowEvent::CloseRequested => {
                self.state.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                }
                let logical = new_size.to_logical::<f32>(scale);
                let action = self
                    .state
                    .tracker
                    .resized(logical.width, logical.height.max(1.0));
                self.state.apply(action);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let x = position.to_logical::<f32>(scale).x;
                let action = self.state.tracker.cursor_moved(x);
                self.state.apply(action);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                let action = self
                    .state
                    .tracker
                    .mouse_button(btn_state == ElementState::Pressed);
                self.state.apply(action);
            }
            WindowEvent::Touch(touch) => {
                let phase = match touch.phase {
                    winit::event::TouchPhase::Started => TouchPhase::Started,
                    winit::event::TouchPhase::Moved => TouchPhase::Moved,
                    winit::event::TouchPhase::Ended => TouchPhase::Ended,
                    winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
                };
                let x = touch.location.to_logical::<f32>(scale).x;
                let action = self.state.tracker.touch(touch.id, phase, x);
                self.state.apply(action);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for wheel-up; the gallery expects
                // positive y for wheel-down.
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => WheelDelta::Lines { x: -x, y: -y },
                    MouseScrollDelta::PixelDelta(pos) => {
                        let pos = pos.to_logical::<f32>(scale);
                        WheelDelta::Pixels {
                            x: -pos.x,
                            y: -pos.y,
                        }
                    }
                };
                let action = self.state.tracker.wheel(delta);
                self.state.apply(action);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.state.frame_loop.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Releases always reach the tracker, even over egui, so a drag that ends
/// on the inspector panel still ends.
fn ends_pointer(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput {
            button: MouseButton::Left,
            state: ElementState::Released,
            ..
        } => true,
        WindowEvent::Touch(touch) => matches!(
            touch.phase,
            winit::event::TouchPhase::Ended | winit::event::TouchPhase::Cancelled
        ),
        _ => false,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    };
    let paths = if cli.images.is_empty() {
        config.images.clone()
    } else {
        cli.images
    };
    let sources: Vec<ImageSource> = paths.into_iter().map(ImageSource::new).collect();

    tracing::info!(images = sources.len(), "gallery-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, sources));
    event_loop.run_app(&mut app)?;

    Ok(())
}
