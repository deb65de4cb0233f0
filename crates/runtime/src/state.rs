//! Scene lifecycle state machine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use vrstore_events::{EventBus, names};

/// Scene lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Loading,
    Ready,
    Playing,
    Paused,
    Error,
}

impl GamePhase {
    /// Allowed forward transitions. `Error` is reachable from anywhere;
    /// nothing leaves it.
    pub fn can_transition_to(self, target: GamePhase) -> bool {
        if target == GamePhase::Error {
            return self != GamePhase::Error;
        }
        matches!(
            (self, target),
            (GamePhase::Loading, GamePhase::Ready)
                | (GamePhase::Ready, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::Paused)
                | (GamePhase::Paused, GamePhase::Playing)
        )
    }
}

impl core::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            GamePhase::Loading => "loading",
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: GamePhase, to: GamePhase },
}

type Hook = Box<dyn FnMut()>;

/// Lifecycle state machine with enter/exit hooks.
///
/// A valid transition runs the exit hooks of the old phase, switches state,
/// runs the enter hooks of the new phase, then broadcasts `state:changed` on
/// the bus passed to the call. Invalid requests are rejected and logged; no
/// hooks run, no event is published.
pub struct SceneStateMachine {
    current: GamePhase,
    previous: Option<GamePhase>,
    enter_hooks: HashMap<GamePhase, Vec<Hook>>,
    exit_hooks: HashMap<GamePhase, Vec<Hook>>,
}

impl SceneStateMachine {
    pub fn new() -> Self {
        Self {
            current: GamePhase::Loading,
            previous: None,
            enter_hooks: HashMap::new(),
            exit_hooks: HashMap::new(),
        }
    }

    pub fn state(&self) -> GamePhase {
        self.current
    }

    pub fn previous_state(&self) -> Option<GamePhase> {
        self.previous
    }

    pub fn is(&self, phase: GamePhase) -> bool {
        self.current == phase
    }

    /// Register a hook run whenever `phase` is entered.
    pub fn on_enter(&mut self, phase: GamePhase, hook: impl FnMut() + 'static) {
        self.enter_hooks.entry(phase).or_default().push(Box::new(hook));
    }

    /// Register a hook run whenever `phase` is exited.
    pub fn on_exit(&mut self, phase: GamePhase, hook: impl FnMut() + 'static) {
        self.exit_hooks.entry(phase).or_default().push(Box::new(hook));
    }

    /// Request a transition. A same-state request is a no-op.
    pub fn transition_to(
        &mut self,
        target: GamePhase,
        bus: &mut EventBus,
    ) -> Result<(), StateError> {
        if self.current == target {
            return Ok(());
        }
        if !self.current.can_transition_to(target) {
            warn!(from = %self.current, to = %target, "rejected scene transition");
            return Err(StateError::InvalidTransition {
                from: self.current,
                to: target,
            });
        }

        debug!(from = %self.current, to = %target, "scene transition");

        if let Some(hooks) = self.exit_hooks.get_mut(&self.current) {
            for hook in hooks.iter_mut() {
                hook();
            }
        }

        let old = self.current;
        self.previous = Some(old);
        self.current = target;

        if let Some(hooks) = self.enter_hooks.get_mut(&target) {
            for hook in hooks.iter_mut() {
                hook();
            }
        }

        bus.publish(
            names::STATE_CHANGED,
            json!({ "old": old, "new": target }),
        );
        Ok(())
    }

    /// Pause; permitted only while `Playing`. Returns whether it happened.
    pub fn pause(&mut self, bus: &mut EventBus) -> bool {
        self.is(GamePhase::Playing) && self.transition_to(GamePhase::Paused, bus).is_ok()
    }

    /// Resume; permitted only while `Paused`. Returns whether it happened.
    pub fn resume(&mut self, bus: &mut EventBus) -> bool {
        self.is(GamePhase::Paused) && self.transition_to(GamePhase::Playing, bus).is_ok()
    }

    /// Unrecoverable scene failure; valid from any phase.
    pub fn fail(&mut self, bus: &mut EventBus) {
        let _ = self.transition_to(GamePhase::Error, bus);
    }

    /// Drop all registered hooks (teardown path).
    pub fn clear_hooks(&mut self) {
        self.enter_hooks.clear();
        self.exit_hooks.clear();
    }
}

impl Default for SceneStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SceneStateMachine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneStateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish()
    }
}
