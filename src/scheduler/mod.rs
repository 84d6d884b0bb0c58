mod controller;
mod loop_worker;
mod phase;

pub use controller::EngineController;
pub use phase::{EnginePhase, PhaseGuard};

pub(crate) use loop_worker::adaptation_loop;
pub(crate) use phase::PhaseReset;
