mod gpu;
mod overlay;

use std::time::Instant;

use anyhow::Context;
use companion_core::{Companion, CompanionParams, DisplacementWorker, MoodState};
use glam::Vec2;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use gpu::GpuState;
use overlay::GlassOverlay;

// Longest frame step fed to the animation; a stalled window resumes smoothly.
const MAX_FRAME_DT: f32 = 0.1;

struct App {
    companion: Companion,
    worker: DisplacementWorker,
    overlay: GlassOverlay,
    cursor: Vec2,
    last_frame: Instant,
}

impl App {
    fn on_key(&mut self, key: Key<&str>) {
        match key {
            Key::Character("1") => self.companion.set_mood(MoodState::Idle),
            Key::Character("2") => self.companion.set_mood(MoodState::Listening),
            Key::Character("3") => self.companion.set_mood(MoodState::Thinking),
            Key::Character("4") => self.companion.set_mood(MoodState::Speaking),
            Key::Character("g") | Key::Character("G") => self.companion.trigger_glitch(),
            Key::Character("+") | Key::Character("=") => {
                self.change_count(self.companion.entity_count() + 1)
            }
            Key::Character("-") => {
                self.change_count(self.companion.entity_count().saturating_sub(1))
            }
            _ => {}
        }
    }

    fn change_count(&mut self, count: usize) {
        match self.companion.set_count(count) {
            Ok(()) => log::info!("[entities] count = {}", count),
            Err(e) => log::warn!("[entities] {}", e),
        }
    }

    fn on_cursor(&mut self, p: Vec2, window: Vec2) {
        self.cursor = p;
        if self.overlay.is_dragging() {
            self.overlay.drag_to(p, window);
            return;
        }
        if let Some(uv) = self.overlay.normalized_pointer(p) {
            self.request_displacement(uv);
        }
    }

    fn request_displacement(&mut self, uv: Vec2) {
        if let Err(e) = self.worker.request(uv) {
            log::warn!("[glass] request failed: {}", e);
        }
    }

    fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;
        dt
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let params = CompanionParams::default();
    let (overlay_w, overlay_h) = (params.overlay_width, params.overlay_height);
    let companion = Companion::new(params).context("invalid companion parameters")?;
    let worker = DisplacementWorker::spawn(overlay_w, overlay_h)?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Companion (native)")
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window, overlay_w, overlay_h))?;
    let (w, h) = gpu.size();
    let window_size = Vec2::new(w as f32, h as f32);
    let mut app = App {
        companion,
        worker,
        overlay: GlassOverlay::centered(
            window_size,
            Vec2::new(overlay_w as f32, overlay_h as f32),
        ),
        cursor: window_size * 0.5,
        last_frame: Instant::now(),
    };
    app.request_displacement(Vec2::splat(0.5));
    log::info!("keys: 1-4 mood, G glitch, +/- entity count, drag the glass pane");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            gpu.resize(size);
            let (w, h) = gpu.size();
            app.overlay.clamp_into(Vec2::new(w as f32, h as f32));
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if logical_key == Key::Named(NamedKey::Escape) {
                elwt.exit();
            } else {
                app.on_key(logical_key.as_ref());
            }
        }
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let (w, h) = gpu.size();
            app.on_cursor(
                Vec2::new(position.x as f32, position.y as f32),
                Vec2::new(w as f32, h as f32),
            );
        }
        Event::WindowEvent {
            event:
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                },
            ..
        } => match state {
            ElementState::Pressed => {
                app.overlay.press(app.cursor);
            }
            ElementState::Released => app.overlay.release(),
        },
        Event::AboutToWait => {
            let dt = app.frame_dt();
            let frames = app.companion.frame(dt);
            if let Some(published) = app.worker.take_latest() {
                gpu.upload_displacement(&published.map);
            }
            match gpu.render(&frames, app.companion.backdrop_color(), &app.overlay) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::debug!("[gpu] frame skipped: {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}
