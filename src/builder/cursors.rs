use crate::foundation::{
    error::{VineResult, ensure_non_negative},
    kind::{KindMap, TrackKind},
};

/// Cursor position after a sequential add that resolved `duration`.
pub fn sequential_advance(start_time: f64, duration: f64) -> f64 {
    start_time + duration
}

/// Cursor position after an explicit add. Cursors never move backwards.
pub fn explicit_advance(cursor: f64, start_time: f64, duration: Option<f64>) -> f64 {
    let reach = match duration {
        Some(d) => start_time + d,
        None => start_time,
    };
    cursor.max(reach)
}

/// Sequential-mode registers: one cursor per kind plus the sticky default duration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cursors {
    times: KindMap<f64>,
    next_duration: Option<f64>,
}

impl Cursors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TrackKind) -> f64 {
        self.times[kind]
    }

    /// The furthest cursor across every kind.
    pub fn latest(&self) -> f64 {
        self.times.iter().map(|(_, t)| *t).fold(0.0, f64::max)
    }

    pub fn next_duration(&self) -> Option<f64> {
        self.next_duration
    }

    pub fn set_next_duration(&mut self, duration: f64) -> VineResult<()> {
        ensure_non_negative(duration, "duration")?;
        self.next_duration = Some(duration);
        Ok(())
    }

    pub fn clear_next_duration(&mut self) {
        self.next_duration = None;
    }

    /// An explicit duration wins over the sticky one.
    pub fn resolve(&self, duration: Option<f64>) -> Option<f64> {
        duration.or(self.next_duration)
    }

    pub fn advance_explicit(&mut self, kind: TrackKind, start_time: f64, duration: Option<f64>) {
        let slot = &mut self.times[kind];
        *slot = explicit_advance(*slot, start_time, duration);
        tracing::trace!(%kind, cursor = *slot, "cursor moved");
    }

    pub fn advance_sequential(&mut self, kind: TrackKind, start_time: f64, duration: f64) {
        self.times[kind] = sequential_advance(start_time, duration);
        tracing::trace!(%kind, cursor = self.times[kind], "cursor moved");
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/builder/cursors.rs"]
mod tests;
