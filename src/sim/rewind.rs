//! Run-length compressed rewind log
//!
//! Every simulated object owns one `TemporalBuffer` of its own snapshot type.
//! Forward ticks push (or extend) entries; backward ticks pop them one tick at a
//! time, undoing exactly one tick of motion per call.
//!
//! Snapshots only hold the per-tick *rates* (velocities, directions, flags), never
//! positions. Positions are rebuilt by subtracting the delta each snapshot implies,
//! which is why long static stretches compress down to a single entry.

use serde::{Deserialize, Serialize};

/// An object whose state can be stepped backward one tick at a time.
pub trait Rewindable {
    /// The recorded per-tick state (rates and flags, not positions)
    type Snapshot: Clone + PartialEq;

    /// Capture the current rates
    fn capture(&self) -> Self::Snapshot;

    /// Whether the live state differs from `last`. Must be cheap and pure.
    fn has_changed(&self, last: &Self::Snapshot) -> bool {
        self.capture() != *last
    }

    /// Undo one tick of the forward delta `snapshot` describes and adopt its rates
    fn apply_backward(&mut self, snapshot: &Self::Snapshot);

    /// Adopt `snapshot`'s rates without moving anything
    fn resume(&mut self, snapshot: &Self::Snapshot);
}

/// One run of identical consecutive snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame<S> {
    pub snapshot: S,
    /// Number of consecutive ticks this snapshot covers (always >= 1)
    pub run_length: u32,
}

/// Stack of run-length compressed snapshots (last = most recent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBuffer<S> {
    frames: Vec<Frame<S>>,
    /// Set on first record; replaying a never-recorded buffer is a caller bug
    armed: bool,
}

impl<S> Default for TemporalBuffer<S> {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            armed: false,
        }
    }
}

impl<S: Clone + PartialEq> TemporalBuffer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one forward tick of `subject`
    pub fn record<E>(&mut self, subject: &E)
    where
        E: Rewindable<Snapshot = S> + ?Sized,
    {
        self.armed = true;
        match self.frames.last_mut() {
            Some(top) if !subject.has_changed(&top.snapshot) => top.run_length += 1,
            _ => self.frames.push(Frame {
                snapshot: subject.capture(),
                run_length: 1,
            }),
        }
    }

    /// Step `subject` back by one tick.
    ///
    /// Returns `false` (and leaves `subject` untouched) once the log is exhausted.
    pub fn replay_step<E>(&mut self, subject: &mut E) -> bool
    where
        E: Rewindable<Snapshot = S> + ?Sized,
    {
        let Some(top) = self.frames.last_mut() else {
            debug_assert!(self.armed, "replay_step on a buffer that was never recorded");
            return false;
        };

        subject.apply_backward(&top.snapshot);
        top.run_length -= 1;

        if top.run_length == 0 {
            self.frames.pop();
            // The tick we just returned to ran with the next-older rates
            if let Some(prev) = self.frames.last() {
                subject.resume(&prev.snapshot);
            }
        }
        true
    }

    /// Number of stored entries (distinct consecutive snapshots)
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total ticks that can still be replayed
    pub fn recorded_ticks(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.run_length)).sum()
    }

    /// Most recent snapshot, if any
    pub fn latest(&self) -> Option<&S> {
        self.frames.last().map(|f| &f.snapshot)
    }

    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    /// Whether anything has ever been recorded
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Record `subject` into its own buffer without fighting the borrow checker.
///
/// The buffer is moved out for the duration of the call; `Vec` moves don't allocate.
pub fn record_into<E, F>(subject: &mut E, history: F)
where
    E: Rewindable,
    F: Fn(&mut E) -> &mut TemporalBuffer<E::Snapshot>,
{
    let mut buffer = std::mem::take(history(subject));
    buffer.record(subject);
    *history(subject) = buffer;
}

/// Step `subject` back one tick using its own buffer. See [`record_into`].
pub fn replay_from<E, F>(subject: &mut E, history: F) -> bool
where
    E: Rewindable,
    F: Fn(&mut E) -> &mut TemporalBuffer<E::Snapshot>,
{
    let mut buffer = std::mem::take(history(subject));
    let stepped = buffer.replay_step(subject);
    *history(subject) = buffer;
    stepped
}
