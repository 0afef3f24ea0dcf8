//! Pointer and resize input.
//!
//! Input arrives from outside the tick loop (window callbacks, an embedding
//! UI, another thread). Producers push immutable [`InputEvent`]s through a
//! cloneable [`InputSender`]; the field drains them at the start of each
//! tick. Neither side ever blocks the other, and when several events of a
//! kind pile up between ticks only the latest one counts.
//!
//! ```ignore
//! let input = scheduler.input();
//! input.pointer_moved(320.0, 180.0);
//! input.resized(1280, 720);
//! ```

use glam::Vec2;
use std::sync::mpsc::{self, Receiver, Sender};
use winit::event::WindowEvent;

use crate::interaction::Pointer;

/// One input snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in surface coordinates.
    PointerMoved(Vec2),
    /// New surface size. Zero or negative sides pause the field until the
    /// next valid size.
    Resized { width: i32, height: i32 },
}

impl InputEvent {
    /// Translate a winit window event, if it is one the field cares about.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved(Vec2::new(
                position.x as f32,
                position.y as f32,
            ))),
            WindowEvent::Resized(size) => Some(InputEvent::Resized {
                width: i32::try_from(size.width).unwrap_or(i32::MAX),
                height: i32::try_from(size.height).unwrap_or(i32::MAX),
            }),
            _ => None,
        }
    }
}

/// Cloneable handle for pushing input into a running field.
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// A sender whose receiver is already gone.
    pub(crate) fn disconnected() -> Self {
        let (tx, _) = mpsc::channel();
        Self { tx }
    }

    /// Queue an event. Returns `false` once the field has been torn down.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn pointer_moved(&self, x: f32, y: f32) -> bool {
        self.send(InputEvent::PointerMoved(Vec2::new(x, y)))
    }

    pub fn resized(&self, width: i32, height: i32) -> bool {
        self.send(InputEvent::Resized { width, height })
    }
}

/// What changed since the last drain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingInput {
    pub pointer: Option<Pointer>,
    pub resize: Option<(i32, i32)>,
}

/// Receiving end, owned by the scheduler.
#[derive(Debug)]
pub(crate) struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Take everything queued so far without waiting.
    pub fn drain(&self) -> PendingInput {
        let mut pending = PendingInput::default();
        for event in self.rx.try_iter() {
            match event {
                InputEvent::PointerMoved(position) => pending.pointer = Some(Pointer { position }),
                InputEvent::Resized { width, height } => pending.resize = Some((width, height)),
            }
        }
        pending
    }
}
