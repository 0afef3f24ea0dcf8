//! Frame scheduling.
//!
//! [`FrameScheduler`] drives a [`Field`] one tick per delivered frame:
//!
//! ```text
//! Idle --start--> Running --cancel--> Cancelled
//! ```
//!
//! Frames come from a [`FrameSource`]. The scheduler asks for one frame at
//! a time and only runs a frame whose ticket matches the outstanding
//! request while it is `Running`, so a callback that was already in flight
//! when [`FrameScheduler::cancel`] ran does nothing.
//!
//! [`ManualFrames`] hands out frames on demand, which makes the whole loop
//! deterministic in tests.

use std::collections::VecDeque;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::field::Field;
use crate::input::{InputQueue, InputSender};
use crate::surface::Surface;
use crate::time::Time;

/// Ticket for one requested frame.
pub type FrameId = u64;

/// Something that delivers display frames, such as a window's redraw
/// requests or a test harness.
pub trait FrameSource {
    /// Ask for one more frame. The returned ticket is passed back to
    /// [`FrameScheduler::run_frame`] when the frame arrives.
    fn request_frame(&mut self) -> FrameId;

    /// Withdraw a request. Sources that cannot recall an in-flight frame
    /// may ignore this; the scheduler rejects stale frames anyway.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Frames delivered by hand.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: FrameId,
    requested: VecDeque<FrameId>,
    cancelled: Vec<FrameId>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding request, without taking it.
    pub fn pending(&self) -> Option<FrameId> {
        self.requested.front().copied()
    }

    /// Take the oldest outstanding request, as if the display refreshed.
    pub fn next_frame(&mut self) -> Option<FrameId> {
        self.requested.pop_front()
    }

    /// Requests withdrawn so far.
    pub fn cancelled(&self) -> &[FrameId] {
        &self.cancelled
    }
}

impl FrameSource for ManualFrames {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        self.requested.push_back(self.next_id);
        self.next_id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.requested.retain(|&r| r != id);
        self.cancelled.push(id);
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    /// Terminal.
    Cancelled,
}

/// Runs a [`Field`] one tick per frame until cancelled.
pub struct FrameScheduler<F: FrameSource> {
    state: SchedulerState,
    frames: F,
    pending: Option<FrameId>,
    field: Option<Field>,
    /// Dropped on cancel so senders see the teardown.
    input: Option<InputQueue>,
    time: Time,
}

impl<F: FrameSource> FrameScheduler<F> {
    pub fn new(frames: F) -> Self {
        Self {
            state: SchedulerState::Idle,
            frames,
            pending: None,
            field: None,
            input: Some(InputQueue::new()),
            time: Time::new(),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Handle for pushing pointer and resize events. Once cancelled, the
    /// handle rejects every event.
    pub fn input(&self) -> InputSender {
        match &self.input {
            Some(queue) => queue.sender(),
            None => InputSender::disconnected(),
        }
    }

    /// The running field, if any.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    /// The frame the scheduler is waiting for.
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    /// Frame counter and FPS estimate.
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Validate `config`, spawn the field and request the first frame.
    ///
    /// Without a surface nothing starts and the scheduler stays `Idle`;
    /// the field is decorative, so that is not an error. Calling `start`
    /// when not `Idle` does nothing.
    pub fn start<S: Surface + ?Sized>(&mut self, surface: Option<&S>, config: FieldConfig) -> Result<()> {
        config.validate()?;

        if self.state != SchedulerState::Idle {
            log::warn!("particle field already started ({:?}); ignoring start", self.state);
            return Ok(());
        }

        let Some(surface) = surface else {
            log::debug!("no drawing surface available; particle field not started");
            return Ok(());
        };

        // Anything queued before start describes a surface we never saw.
        if let Some(queue) = &self.input {
            queue.drain();
        }

        let field = Field::new(config, surface.size())?;
        log::info!(
            "particle field started with {} particles",
            field.particles().len()
        );
        self.field = Some(field);
        self.state = SchedulerState::Running;
        self.pending = Some(self.frames.request_frame());
        Ok(())
    }

    /// Run the tick for frame `id`, then request the next frame.
    ///
    /// Returns `false` without touching anything when the scheduler is not
    /// running or `id` is not the outstanding request.
    pub fn run_frame<S: Surface + ?Sized>(&mut self, id: FrameId, surface: &mut S) -> bool {
        if self.state != SchedulerState::Running || self.pending != Some(id) {
            log::trace!("dropping frame {id} ({:?}, waiting for {:?})", self.state, self.pending);
            return false;
        }
        let Some(field) = self.field.as_mut() else {
            return false;
        };
        self.pending = None;

        let input = self
            .input
            .as_ref()
            .map(InputQueue::drain)
            .unwrap_or_default();
        if let Some(pointer) = input.pointer {
            field.set_pointer(pointer);
        }
        if let Some((width, height)) = input.resize {
            // The config was validated at start, so a rebuild cannot fail
            // on it; log and keep going rather than kill the loop.
            if let Err(e) = field.resize(width, height) {
                log::warn!("particle rebuild failed: {e}");
            }
        }

        field.tick(surface);

        if self.time.tick() {
            log::debug!("particle field: {:.1} fps", self.time.fps());
        }

        self.pending = Some(self.frames.request_frame());
        true
    }

    /// Stop the loop and drop the particles. Idempotent.
    pub fn cancel(&mut self) {
        if self.state == SchedulerState::Cancelled {
            return;
        }

        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
        }
        self.field = None;
        self.input = None;
        self.state = SchedulerState::Cancelled;
        log::info!(
            "particle field stopped after {} frames ({:.1}s)",
            self.time.frame(),
            self.time.elapsed().as_secs_f32()
        );
    }
}
