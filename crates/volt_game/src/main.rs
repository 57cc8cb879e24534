//! Volt Wizard: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Each `RedrawRequested`
//! runs the fixed-timestep simulation (see `TimeState`), then composes the
//! level into a software frame buffer and hands it to `pixels`:
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- one `Game::step` per fixed slice
//!   3. compose world, blit with camera offset and shake, present
//!
//! Hot reload: the current level's JSON file is watched via mtime polling and
//! reloaded at a frame boundary. R forces a reload.

mod ability;
mod collision;
mod config;
mod entities;
mod error;
mod game;
mod level;
mod player;
mod power;
mod registry;
mod render;
#[cfg(test)]
mod replay;
mod tiles;
mod watcher;

use std::path::Path;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_or_default, GameConfig};
use error::AppError;
use game::{Game, GameFlow};
use registry::LevelRegistry;
use render::WorldRenderer;
use volt_core::input::{InputState, Key, MouseBtn};
use volt_core::time::TimeState;
use volt_platform::window::PlatformConfig;
use volt_render::PixelSurface;
use watcher::FileWatcher;

const CONFIG_PATH: &str = "assets/game.json";

/// All mutable runtime state. Built in `ApplicationHandler::resumed` once the
/// window exists.
struct EngineState {
    window: Arc<Window>,
    surface: PixelSurface,
    time: TimeState,
    input: InputState,
    game: Game,
    renderer: WorldRenderer,
    level_watcher: Option<FileWatcher>,
    watched_index: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, game: Game) -> Result<Self, AppError> {
        let (width, height) = (game.config().display_width, game.config().display_height);
        let surface = PixelSurface::new(window.clone(), width, height).map_err(AppError::Surface)?;
        let level_watcher = game.current_source().map(|path| FileWatcher::new(path.to_path_buf()));
        let watched_index = game.current_index();
        Ok(Self {
            window,
            surface,
            time: TimeState::new(),
            input: InputState::new(),
            game,
            renderer: WorldRenderer::new(width, height),
            level_watcher,
            watched_index,
        })
    }

    fn reload_level(&mut self, reason: &str) {
        log::info!("Reloading level ({reason})");
        if let Err(err) = self.game.reload_current() {
            log::error!("Level reload failed, keeping the previous level: {err}");
        }
        if let Some(watcher) = self.level_watcher.as_mut() {
            watcher.mark_seen();
        }
    }

    /// Point the watcher at whichever level file is now live.
    fn sync_watcher(&mut self) {
        if self.watched_index == self.game.current_index() {
            return;
        }
        self.watched_index = self.game.current_index();
        self.level_watcher = self
            .game
            .current_source()
            .map(|path| FileWatcher::new(path.to_path_buf()));
    }

    /// Returns `false` once the game wants to quit.
    fn run_frame(&mut self) -> bool {
        self.time.begin_frame();

        let level_changed = self
            .level_watcher
            .as_mut()
            .is_some_and(|watcher| watcher.should_reload());
        if level_changed {
            self.reload_level("file watcher");
        }

        let frame_input = self.input.frame_input();
        let mut first_step = true;
        while self.time.should_step() {
            let input = if first_step {
                if self.input.is_just_pressed(Key::Escape) {
                    log::info!("Escape pressed, exiting.");
                    return false;
                }
                if self.input.is_just_pressed(Key::R) {
                    self.reload_level("manual trigger (R)");
                }
                frame_input
            } else {
                frame_input.without_edges()
            };
            first_step = false;

            if self.game.step(&input, self.time.sim_elapsed()) == GameFlow::Quit {
                return false;
            }
        }
        // Edges are kept until a step has seen them.
        if self.time.steps_this_frame > 0 {
            self.input.end_frame();
        }
        self.sync_watcher();

        let screen = self.renderer.render(self.game.level());
        if let Err(err) = self.surface.present(screen) {
            log::error!("Present failed: {err}");
            return false;
        }
        true
    }
}

struct App {
    config: PlatformConfig,
    game: Option<Game>,
    state: Option<EngineState>,
    error: Option<AppError>,
}

impl App {
    fn new(game: Game) -> Self {
        let config = PlatformConfig {
            width: game.config().display_width,
            height: game.config().display_height,
            ..PlatformConfig::default()
        };
        Self {
            config,
            game: Some(game),
            state: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(game) = self.game.take() else {
            return;
        };
        let window = match volt_platform::window::create_window(event_loop, &self.config) {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, AppError::CreateWindow(err)),
        };
        match EngineState::new(window, game) {
            Ok(state) => self.state = Some(state),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Err(err) = state
                    .surface
                    .resize(physical_size.width, physical_size.height)
                {
                    log::error!("Surface resize failed: {err}");
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(state.window.scale_factor());
                state.input.cursor = (logical.x, logical.y);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(btn) = map_mouse(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if !state.run_frame() {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn map_mouse(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        _ => None,
    }
}

fn load_game(config: GameConfig) -> Result<Game, AppError> {
    let registry = LevelRegistry::load_from_paths(&config.levels)?;
    Ok(Game::new(registry, config)?)
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Volt Wizard starting...");

    let config = load_config_or_default(Path::new(CONFIG_PATH))?;
    let game = load_game(config)?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(game);
    event_loop
        .run_app(&mut app)
        .map_err(AppError::EventLoopRun)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
