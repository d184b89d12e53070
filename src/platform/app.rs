//! Native window and event loop

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::clock::{FpsCounter, FrameClock};
use super::input::InputState;
use crate::consts::MAX_SUBSTEPS;
use crate::error::{Error, Result};
use crate::renderer::{Renderer, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Open the window and run the game until it is closed
pub fn run(settings: Settings) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Game instance holding all state
struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    state: Option<GameState>,
    input: InputState,
    clock: FrameClock,
    fps: FpsCounter,
    shown_fps: u32,
    /// Fatal error to report once the loop returns
    error: Option<Error>,
}

impl App {
    fn new(settings: Settings) -> Self {
        let clock = FrameClock::new(settings.sim_dt(), MAX_SUBSTEPS);
        Self {
            settings,
            window: None,
            renderer: None,
            state: None,
            input: InputState::new(),
            clock,
            fps: FpsCounter::default(),
            shown_fps: 0,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let mut renderer = pollster::block_on(create_renderer(window.clone(), size.width, size.height))?;
        let sizes = renderer.load_sprites(&self.settings)?;

        let seed = self.settings.seed.unwrap_or_else(clock_seed);
        log::info!("Crate layout seed: {}", seed);
        let state = GameState::with_crates(
            seed,
            logical_size(&window),
            sizes,
            self.settings.crate_count,
            self.settings.crate_min_dist,
        )?;

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.state = Some(state);
        Ok(())
    }

    /// Release GPU resources in order (textures, surface) and then the window
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.unload_textures();
        }
        self.renderer = None;
        self.window = None;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer), Some(state)) =
            (&self.window, self.renderer.as_mut(), self.state.as_mut())
        else {
            return;
        };

        let now = Instant::now();
        let dt = self.settings.sim_dt();
        for _ in 0..self.clock.advance(now) {
            let input = self.input.tick_input();
            for event in tick(state, &input, dt) {
                log_event(&event);
                if matches!(event, GameEvent::CrateDestroyed { .. }) && state.crates_remaining() == 0 {
                    log::info!("All crates destroyed after {} ticks", state.time_ticks);
                }
            }
            self.input.consume_one_shots();
        }

        let draws = build_scene(state);
        match renderer.draw(&draws, state.arena) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory");
                self.error = Some(Error::Graphics("out of GPU memory".into()));
                self.shutdown(event_loop);
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        self.fps.frame(now);
        if self.settings.show_fps && self.fps.fps() != self.shown_fps {
            self.shown_fps = self.fps.fps();
            window.set_title(&format!("{} - {} FPS", self.settings.title, self.shown_fps));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Startup failed: {}", e);
            self.error = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    self.shutdown(event_loop);
                } else {
                    self.input.handle_key_event(&event);
                }
            }

            WindowEvent::Focused(false) => self.input.clear(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                if let (Some(window), Some(state)) = (&self.window, self.state.as_mut()) {
                    let logical = logical_size(window);
                    state.resize(logical.x, logical.y);
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        let now = Instant::now();
        let deadline = self.clock.next_deadline(now);
        if deadline <= now {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }
}

async fn create_renderer(window: Arc<Window>, width: u32, height: u32) -> Result<Renderer> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });

    let surface = instance
        .create_surface(window)
        .map_err(|e| Error::Graphics(format!("surface creation failed: {e}")))?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await
        .map_err(|e| Error::Graphics(format!("no suitable adapter: {e}")))?;

    log::info!("Using adapter: {:?}", adapter.get_info().name);

    Renderer::new(surface, &adapter, width, height).await
}

/// Window size in logical pixels, the space the game is laid out in
fn logical_size(window: &Window) -> Vec2 {
    let size: LogicalSize<f32> = window.inner_size().to_logical(window.scale_factor());
    Vec2::new(size.width, size.height)
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::BulletFired { position, heading } => {
            log::debug!(
                "Bullet fired from ({:.1}, {:.1}) heading {:.1}",
                position.x,
                position.y,
                heading
            );
        }
        GameEvent::CrateDestroyed { index, cause } => {
            log::debug!("Crate {} destroyed ({:?})", index, cause);
        }
        GameEvent::ExplosionFinished { index } => {
            log::debug!("Crate {} explosion finished", index);
        }
    }
}
