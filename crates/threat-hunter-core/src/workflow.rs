//! Request/response workflow state machine
//!
//! One [`Workflow`] drives a single classification job through
//! Idle -> Running -> Done -> Idle. Each accepted run hands out a [`Ticket`];
//! only the completion carrying the current ticket is applied, so a response
//! that arrives after the workflow moved on cannot overwrite newer state.

use crate::constants::STATUS_RESET_DELAY;
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Lifecycle phase of a prediction workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    /// Request in flight ("Reasoning…")
    Running,
    /// Result committed; reverts to Idle after the reset delay
    Done,
}

/// Proof that a request was started by a specific run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub(crate) fn new(generation: u64) -> Self {
        Self { generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completion handed to [`Workflow::complete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Result stored, phase is Done
    Committed,
    /// Request failed, phase is Idle, previous result kept
    Failed,
    /// Ticket no longer current; nothing changed
    Stale,
}

/// State of one asynchronous classification job
///
/// # Examples
///
/// ```
/// use threat_hunter_core::workflow::{Completion, Workflow, WorkflowPhase};
/// use std::time::{Duration, Instant};
///
/// let mut wf: Workflow<Vec<u8>> = Workflow::new("demo");
/// let ticket = wf.begin().expect("idle workflow accepts a run");
/// assert!(wf.begin().is_none()); // already running
///
/// let now = Instant::now();
/// let outcome = wf.complete(ticket, Ok::<_, String>(vec![1, 0]), now);
/// assert_eq!(outcome, Completion::Committed);
/// assert_eq!(wf.phase(), WorkflowPhase::Done);
///
/// wf.tick(now + Duration::from_secs(2));
/// assert_eq!(wf.phase(), WorkflowPhase::Idle);
/// assert_eq!(wf.result(), Some(&vec![1, 0]));
/// ```
#[derive(Debug, Clone)]
pub struct Workflow<T> {
    /// Name used in log lines
    name: &'static str,
    phase: WorkflowPhase,
    /// Last committed result, kept across failures
    result: Option<T>,
    /// Error of the most recent failed run, cleared by the next run
    last_error: Option<String>,
    /// Generation of the last accepted run
    generation: u64,
    /// Generation whose response is still awaited
    in_flight: Option<u64>,
    /// When Done should revert to Idle
    reset_at: Option<Instant>,
    reset_delay: Duration,
}

impl<T> Workflow<T> {
    /// Create an idle workflow with the standard reset delay
    pub fn new(name: &'static str) -> Self {
        Self::with_reset_delay(name, STATUS_RESET_DELAY)
    }

    pub fn with_reset_delay(name: &'static str, reset_delay: Duration) -> Self {
        Self {
            name,
            phase: WorkflowPhase::Idle,
            result: None,
            last_error: None,
            generation: 0,
            in_flight: None,
            reset_at: None,
            reset_delay,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == WorkflowPhase::Idle
    }

    pub fn is_running(&self) -> bool {
        self.phase == WorkflowPhase::Running
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    /// Mutable access for in-place view state (page navigation)
    pub fn result_mut(&mut self) -> Option<&mut T> {
        self.result.as_mut()
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket of the request currently awaited, if any
    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight.map(Ticket::new)
    }

    /// Pending Done -> Idle deadline
    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Start a run
    ///
    /// Only accepted from Idle. Returns the ticket the request must carry;
    /// `None` means the call was rejected and nothing changed.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.phase != WorkflowPhase::Idle {
            tracing::debug!("{}: run rejected while {:?}", self.name, self.phase);
            return None;
        }

        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.phase = WorkflowPhase::Running;
        self.last_error = None;
        self.reset_at = None;
        tracing::info!("{}: started (generation {})", self.name, self.generation);
        Some(Ticket::new(self.generation))
    }

    /// Apply the outcome of the request started with `ticket`
    pub fn complete<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<T, E>,
        now: Instant,
    ) -> Completion {
        if self.in_flight != Some(ticket.generation) {
            tracing::debug!(
                "{}: discarding stale response (generation {}, current {:?})",
                self.name,
                ticket.generation,
                self.in_flight
            );
            return Completion::Stale;
        }
        self.in_flight = None;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.phase = WorkflowPhase::Done;
                self.reset_at = Some(now + self.reset_delay);
                tracing::info!("{}: done (generation {})", self.name, ticket.generation);
                Completion::Committed
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("{}: failed: {}", self.name, message);
                self.last_error = Some(message);
                self.phase = WorkflowPhase::Idle;
                self.reset_at = None;
                Completion::Failed
            }
        }
    }

    /// Fire the deferred Done -> Idle reset if its deadline passed
    ///
    /// Returns true when the phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(deadline) if self.phase == WorkflowPhase::Done && now >= deadline => {
                self.phase = WorkflowPhase::Idle;
                self.reset_at = None;
                true
            }
            _ => false,
        }
    }

    /// Abandon any in-flight request and return to Idle
    ///
    /// A response for the abandoned request will be reported as stale.
    /// Returns true when a request was abandoned.
    pub fn cancel(&mut self) -> bool {
        let abandoned = self.in_flight.take();
        if let Some(generation) = abandoned {
            tracing::info!("{}: cancelled generation {}", self.name, generation);
        }
        self.phase = WorkflowPhase::Idle;
        self.reset_at = None;
        abandoned.is_some()
    }
}
