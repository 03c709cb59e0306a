//! Audioring - a ring of cubes and a stack of discs dancing to the spectrum
//! of whatever track is playing.

use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audioring::audio::AudioSystem;
use audioring::camera::PerspectiveCamera;
use audioring::cli::Args;
use audioring::params::*;
use audioring::rendering::{GpuRenderer, RenderContext};
use audioring::tracks::TrackSelector;
use audioring::visualizer::{AnimationDriver, Visualizer};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    context: Option<RenderContext<GpuRenderer>>,

    // Audio and animation
    audio: Option<AudioSystem>,
    visualizer: Visualizer,
    driver: AnimationDriver,
    tracks: TrackSelector,

    // Configuration
    analyser_config: AnalyserConfig,
    playback_config: PlaybackConfig,
    render_config: RenderConfig,
}

impl App {
    fn new(args: &Args, tracks: TrackSelector) -> Self {
        let visualizer_config = args.visualizer_config();
        let driver = AnimationDriver::new(visualizer_config.rotate_speed);

        Self {
            window: None,
            context: None,
            audio: None,
            visualizer: Visualizer::new(visualizer_config),
            driver,
            tracks,
            analyser_config: args.analyser_config(),
            playback_config: args.playback_config(),
            render_config: args.render_config(),
        }
    }

    /// Create window, GPU surface and audio, then lay out the scene
    fn init(&mut self, event_loop: &ActiveEventLoop) -> audioring::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Audioring")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| audioring::VisualizerError::Gpu(e.to_string()))?,
        );

        let renderer = pollster::block_on(GpuRenderer::new(Arc::clone(&window)))?;
        let mut context =
            RenderContext::new(PerspectiveCamera::from_config(&self.render_config), renderer);
        let size = window.inner_size();
        context.resize(size.width, size.height);

        let mut audio = AudioSystem::new(self.analyser_config.clone(), self.playback_config.clone())?;
        audio.load_audio(self.tracks.current(), self.analyser_config.fft_size)?;

        let config = self.visualizer.config().clone();
        self.visualizer
            .generate_cubes_in_circle(config.ring_radius, audio.bin_count())?;
        self.visualizer
            .generate_spheres(config.disc_count, config.disc_radius);

        self.driver.start();

        info!("Audioring is running");
        info!("Keys: 1-9 / arrows switch tracks, Space pauses, Esc quits");

        self.window = Some(window);
        self.context = Some(context);
        self.audio = Some(audio);
        Ok(())
    }

    fn change_track(&mut self, path: &Path) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        info!("Switching to {}", path.display());
        if let Err(e) = audio.load_audio(path, self.analyser_config.fft_size) {
            error!("Could not load {}: {}", path.display(), e);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let selected = match key {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Space => {
                self.driver.toggle();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            KeyCode::ArrowRight => self.tracks.next(),
            KeyCode::ArrowLeft => self.tracks.previous(),
            _ => match digit_index(key) {
                Some(index) => self.tracks.select(index),
                None => return,
            },
        };

        if let Some(path) = selected.map(Path::to_path_buf) {
            self.change_track(&path);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref mut context) = self.context else {
            return;
        };
        let Some(ref mut audio) = self.audio else {
            return;
        };

        audio.poll_loads();

        if !self.driver.is_running() {
            // Paused: redraw the frozen scene (after a resize, say)
            if let Err(e) = context.render(&self.visualizer.scene) {
                error!("Render error: {}", e);
            }
            return;
        }

        let Some(spectrum) = audio.snapshot() else {
            return;
        };

        if let Err(e) = self.driver.frame(&spectrum, &mut self.visualizer, context) {
            error!("Frame error: {}", e);
        }
    }
}

/// Map the digit keys 1-9 onto track indices 0-8
fn digit_index(key: KeyCode) -> Option<usize> {
    let index = match key {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        KeyCode::Digit9 => 8,
        _ => return None,
    };
    Some(index)
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if !self.driver.is_running() {
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            error!("Startup failed: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(key),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::Resized(size) => {
                if let Some(context) = self.context.as_mut() {
                    context.resize(size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let Some(tracks) = TrackSelector::new(args.tracks.clone()) else {
        error!("No tracks given");
        return;
    };

    info!("Audioring - {} track(s), FFT size {}", tracks.len(), args.fft_size);

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {}", e);
            return;
        }
    };

    let mut app = App::new(&args, tracks);
    if let Err(e) = event_loop.run_app(&mut app) {
        warn!("Event loop exited with error: {}", e);
    }
}
