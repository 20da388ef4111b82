//! Step-driven animation controller.
//!
//! Owns a step function and the play/pause state of a walkthrough. The
//! controller can be driven two ways:
//!
//! - [`run`](AnimationController::run) ticks on its own until the step
//!   function reports completion or the stop handle is cleared;
//! - an outer event loop calls [`tick`](AnimationController::tick) every
//!   [`delay`](AnimationController::delay) and [`step`](AnimationController::step)
//!   on demand, so key presses can interleave with playback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::error::Blk66Error;

/// Default time between automatic steps.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

type Callback = Box<dyn FnMut()>;

/// Play / pause / step controller around a step function.
///
/// The step function returns `false` once there is nothing left to show.
pub struct AnimationController<F>
where
    F: FnMut() -> bool,
{
    step_fn: F,
    interval: Duration,
    speed: f64,
    running: Arc<AtomicBool>,
    on_reset: Option<Callback>,
    on_complete: Option<Callback>,
}

impl<F> AnimationController<F>
where
    F: FnMut() -> bool,
{
    pub fn new(step_fn: F) -> Self {
        Self {
            step_fn,
            interval: DEFAULT_INTERVAL,
            speed: 1.0,
            running: Arc::new(AtomicBool::new(false)),
            on_reset: None,
            on_complete: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Called after [`reset`](Self::reset) stops playback.
    pub fn on_reset(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_reset = Some(Box::new(f));
        self
    }

    /// Called when the step function reports completion during playback.
    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// A cloneable handle that can be used to stop playback from
    /// another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run a single step regardless of playback state.
    pub fn step(&mut self) -> bool {
        let more = (self.step_fn)();
        if !more && self.is_running() {
            self.stop();
            self.complete();
        }
        more
    }

    /// One scheduled tick: steps only while playing.
    ///
    /// Returns `true` if a step was taken.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        if !(self.step_fn)() {
            self.running.store(false, Ordering::SeqCst);
            debug!("animation complete");
            self.complete();
        }
        true
    }

    /// Play until the step function is exhausted or playback is stopped.
    pub async fn run(&mut self) {
        self.start();
        while self.tick() {
            if !self.is_running() {
                break;
            }
            tokio::time::sleep(self.delay()).await;
        }
    }

    pub fn start(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            debug!(delay = ?self.delay(), "animation started");
        }
    }

    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("animation stopped");
        }
    }

    pub fn toggle(&self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Stop playback and fire the reset callback.
    pub fn reset(&mut self) {
        self.stop();
        if let Some(f) = self.on_reset.as_mut() {
            f();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Set the playback speed multiplier.
    ///
    /// The multiplier must be positive and finite, and the resulting delay
    /// must fit in a [`Duration`].
    pub fn set_speed(&mut self, multiplier: f64) -> Result<(), Blk66Error> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(Blk66Error::InvalidSpeed(multiplier));
        }
        scaled_delay(self.interval, multiplier).ok_or(Blk66Error::InvalidSpeed(multiplier))?;
        self.speed = multiplier;
        Ok(())
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Time between automatic steps at the current speed.
    ///
    /// Saturates at [`Duration::MAX`] if a later `set_interval` pushed the
    /// scaled delay out of range.
    pub fn delay(&self) -> Duration {
        scaled_delay(self.interval, self.speed).unwrap_or(Duration::MAX)
    }

    fn complete(&mut self) {
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }
}

fn scaled_delay(interval: Duration, speed: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(interval.as_secs_f64() / speed).ok()
}
