use std::sync::atomic::{AtomicU8, Ordering};

use serde::Serialize;

/// Evaluation lifecycle: `Idle → Evaluating → Committing → Idle`. No other
/// transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnginePhase {
    Idle,
    Evaluating,
    Committing,
}

impl EnginePhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => EnginePhase::Evaluating,
            2 => EnginePhase::Committing,
            _ => EnginePhase::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Evaluating => "evaluating",
            EnginePhase::Committing => "committing",
        }
    }
}

const IDLE: u8 = 0;
const EVALUATING: u8 = 1;
const COMMITTING: u8 = 2;

/// Atomic phase holder enforcing at-most-one-in-flight.
///
/// Transitions are compare-and-swap so the timer tick and a concurrent
/// manual trigger can race safely even on a multi-threaded runtime; the
/// loser observes the current phase and backs off.
#[derive(Debug)]
pub struct PhaseGuard {
    phase: AtomicU8,
}

impl PhaseGuard {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(IDLE),
        }
    }

    pub fn current(&self) -> EnginePhase {
        EnginePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// `Idle → Evaluating`; on failure returns the phase that was observed.
    pub fn begin_evaluating(&self) -> Result<(), EnginePhase> {
        self.phase
            .compare_exchange(IDLE, EVALUATING, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(EnginePhase::from_u8)
    }

    /// `Evaluating → Committing`; on failure returns the observed phase.
    pub fn begin_committing(&self) -> Result<(), EnginePhase> {
        self.phase
            .compare_exchange(EVALUATING, COMMITTING, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(EnginePhase::from_u8)
    }

    pub fn finish(&self) {
        self.phase.store(IDLE, Ordering::Release);
    }
}

impl Default for PhaseGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the guard to `Idle` when an evaluation scope ends, whether it
/// committed, produced nothing, or errored out.
pub(crate) struct PhaseReset<'a> {
    guard: &'a PhaseGuard,
}

impl<'a> PhaseReset<'a> {
    pub(crate) fn new(guard: &'a PhaseGuard) -> Self {
        Self { guard }
    }
}

impl Drop for PhaseReset<'_> {
    fn drop(&mut self) {
        self.guard.finish();
    }
}
