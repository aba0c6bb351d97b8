//! Per-request shaping context.
//!
//! A [`ShapeContext`] travels through the stack with each request. It carries
//! the request id and start time used in log records, and records whether the
//! shaper rewrote the response or let it pass through untouched.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Why a response was passed through without shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The shaper is running with `debug = true`.
    DebugMode,
    /// The request path matched an excluded prefix.
    ExcludedPath,
    /// The response did not declare a JSON content type.
    NotJson,
}

/// What the shaper did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeOutcome {
    /// The response was rewritten into the canonical envelope.
    Shaped {
        /// Status code of the shaped response.
        status_code: u16,
    },
    /// The response was passed through untouched.
    Passed(SkipReason),
}

/// Mutable per-request state shared across the stack.
#[derive(Debug)]
pub struct ShapeContext {
    request_id: Uuid,
    started_at: Instant,
    outcome: Option<ShapeOutcome>,
}

impl ShapeContext {
    /// Creates a context with a fresh time-ordered request id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            started_at: Instant::now(),
            outcome: None,
        }
    }

    /// The request id, generated at context creation.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Time elapsed since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Records what the shaper did. Last writer wins.
    pub fn set_outcome(&mut self, outcome: ShapeOutcome) {
        self.outcome = Some(outcome);
    }

    /// What the shaper did, if it has run.
    #[must_use]
    pub fn outcome(&self) -> Option<ShapeOutcome> {
        self.outcome
    }
}

impl Default for ShapeContext {
    fn default() -> Self {
        Self::new()
    }
}
