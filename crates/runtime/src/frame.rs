//! Frame loop with clamped delta time.

use tracing::{debug, error, warn};

/// Upper bound on per-frame delta time, in seconds. A stalled tab otherwise
/// produces one giant catch-up step.
pub const DELTA_CAP_SECONDS: f64 = 0.1;

/// Identifies a registered callback; pass back to remove it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type Callback<W> = Box<dyn FnMut(&mut W, f64) -> anyhow::Result<()>>;

struct Slot<W> {
    id: CallbackId,
    callback: Callback<W>,
}

/// Update/render loop over a world `W`.
///
/// The host calls [`GameLoop::tick`] once per animation frame with its clock
/// reading (seconds). Update callbacks are skipped entirely while the caller
/// reports the scene as suspended (paused); render callbacks always run. A
/// callback returning an error is logged and does not stop the rest of the
/// frame.
pub struct GameLoop<W> {
    running: bool,
    last_tick: Option<f64>,
    frame_count: u64,
    next_id: u64,
    fps: f64,
    fps_window_start: f64,
    fps_window_frames: u32,
    update_callbacks: Vec<Slot<W>>,
    render_callbacks: Vec<Slot<W>>,
}

impl<W> GameLoop<W> {
    pub fn new() -> Self {
        Self {
            running: false,
            last_tick: None,
            frame_count: 0,
            next_id: 0,
            fps: 0.0,
            fps_window_start: 0.0,
            fps_window_frames: 0,
            update_callbacks: Vec::new(),
            render_callbacks: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last completed one-second window.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn start(&mut self, now: f64) {
        if self.running {
            warn!("game loop is already running");
            return;
        }
        debug!("starting game loop");
        self.running = true;
        self.last_tick = Some(now);
        self.fps_window_start = now;
        self.fps_window_frames = 0;
    }

    /// Stop ticking; the next scheduled tick becomes a no-op.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        debug!("stopping game loop");
        self.running = false;
        self.last_tick = None;
    }

    fn attach(slots: &mut Vec<Slot<W>>, next_id: &mut u64, callback: Callback<W>) -> CallbackId {
        *next_id += 1;
        let id = CallbackId(*next_id);
        slots.push(Slot { id, callback });
        id
    }

    pub fn on_update<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut W, f64) -> anyhow::Result<()> + 'static,
    {
        Self::attach(&mut self.update_callbacks, &mut self.next_id, Box::new(callback))
    }

    pub fn on_render<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&mut W, f64) -> anyhow::Result<()> + 'static,
    {
        Self::attach(&mut self.render_callbacks, &mut self.next_id, Box::new(callback))
    }

    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.update_callbacks.len() + self.render_callbacks.len();
        self.update_callbacks.retain(|s| s.id != id);
        self.render_callbacks.retain(|s| s.id != id);
        before != self.update_callbacks.len() + self.render_callbacks.len()
    }

    /// Drop every registered callback (teardown path).
    pub fn clear_callbacks(&mut self) {
        self.update_callbacks.clear();
        self.render_callbacks.clear();
    }

    /// Advance one frame. Returns the clamped delta time, or `None` when the
    /// loop is stopped.
    pub fn tick(&mut self, now: f64, world: &mut W, suspend_update: bool) -> Option<f64> {
        if !self.running {
            return None;
        }

        let raw_delta = self.last_tick.map(|last| now - last).unwrap_or(0.0);
        let delta = raw_delta.clamp(0.0, DELTA_CAP_SECONDS);
        self.last_tick = Some(now);

        self.track_fps(now);

        if !suspend_update {
            for slot in self.update_callbacks.iter_mut() {
                if let Err(err) = (slot.callback)(world, delta) {
                    error!(error = %err, "update callback failed");
                }
            }
        }

        for slot in self.render_callbacks.iter_mut() {
            if let Err(err) = (slot.callback)(world, delta) {
                error!(error = %err, "render callback failed");
            }
        }

        self.frame_count += 1;
        Some(delta)
    }

    fn track_fps(&mut self, now: f64) {
        self.fps_window_frames += 1;
        let elapsed = now - self.fps_window_start;
        if elapsed >= 1.0 {
            self.fps = f64::from(self.fps_window_frames) / elapsed;
            self.fps_window_start = now;
            self.fps_window_frames = 0;
        }
    }
}

impl<W> Default for GameLoop<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> core::fmt::Debug for GameLoop<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameLoop")
            .field("running", &self.running)
            .field("frame_count", &self.frame_count)
            .field("update_callbacks", &self.update_callbacks.len())
            .field("render_callbacks", &self.render_callbacks.len())
            .finish()
    }
}
