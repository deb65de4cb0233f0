//! `vrstore-runtime` — scene lifecycle, frame loop, deferred work.
//!
//! Execution is single-threaded and cooperative: the host drives
//! [`GameLoop::tick`] at its animation-frame cadence, and anything "async"
//! (courier calls, timers) is a deferred continuation on the [`Scheduler`],
//! resumed with exclusive access to the world: no locking, no parallel
//! writers.

pub mod frame;
pub mod scheduler;
pub mod state;

pub use frame::{CallbackId, DELTA_CAP_SECONDS, GameLoop};
pub use scheduler::{Scheduler, TaskId};
pub use state::{GamePhase, SceneStateMachine, StateError};
