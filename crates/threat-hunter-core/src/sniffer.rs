//! Capture (sniffing) control state machine
//!
//! Idle -> Running -> Stopping -> Stopped -> Idle, with an explicit Failed
//! phase when the stop request itself fails.

use crate::constants::STATUS_RESET_DELAY;
use crate::workflow::Ticket;
use std::fmt::Display;
use std::time::{Duration, Instant};

/// Phase of the capture control
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SniffPhase {
    #[default]
    Idle,
    Running,
    Stopping,
    /// Stop acknowledged; reverts to Idle after the reset delay
    Stopped,
    /// Stop request failed; retry with `stop()` or `dismiss()`
    Failed(String),
}

impl SniffPhase {
    pub fn can_start(&self) -> bool {
        matches!(self, SniffPhase::Idle)
    }

    pub fn can_stop(&self) -> bool {
        matches!(self, SniffPhase::Running | SniffPhase::Failed(_))
    }
}

/// Capture control
#[derive(Debug, Clone)]
pub struct SniffControl {
    phase: SniffPhase,
    /// Set once a stop completes; cleared by the next start
    capture_completed: bool,
    generation: u64,
    /// Start request whose failure would still matter
    pending_start: Option<u64>,
    /// Stop request currently awaited
    pending_stop: Option<u64>,
    reset_at: Option<Instant>,
    reset_delay: Duration,
    last_error: Option<String>,
}

impl Default for SniffControl {
    fn default() -> Self {
        Self::new()
    }
}

impl SniffControl {
    pub fn new() -> Self {
        Self::with_reset_delay(STATUS_RESET_DELAY)
    }

    pub fn with_reset_delay(reset_delay: Duration) -> Self {
        Self {
            phase: SniffPhase::Idle,
            capture_completed: false,
            generation: 0,
            pending_start: None,
            pending_stop: None,
            reset_at: None,
            reset_delay,
            last_error: None,
        }
    }

    pub fn phase(&self) -> &SniffPhase {
        &self.phase
    }

    pub fn capture_completed(&self) -> bool {
        self.capture_completed
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn reset_deadline(&self) -> Option<Instant> {
        self.reset_at
    }

    /// Start capturing
    ///
    /// Only accepted from Idle. The returned ticket goes with the
    /// fire-and-forget start request.
    pub fn start(&mut self) -> Option<Ticket> {
        if !self.phase.can_start() {
            tracing::debug!("sniffer: start rejected while {:?}", self.phase);
            return None;
        }
        self.generation += 1;
        self.pending_start = Some(self.generation);
        self.phase = SniffPhase::Running;
        self.capture_completed = false;
        self.last_error = None;
        tracing::info!("sniffer: capture started (generation {})", self.generation);
        Some(Ticket::new(self.generation))
    }

    /// Report the outcome of the start request
    ///
    /// Success changes nothing (the phase is already Running). Failure while
    /// still Running reverts to Idle and records the error.
    pub fn start_completed<E: Display>(&mut self, ticket: Ticket, outcome: Result<(), E>) -> bool {
        if self.pending_start != Some(ticket.generation()) {
            if let Err(e) = outcome {
                tracing::warn!("sniffer: ignoring stale start failure: {}", e);
            }
            return false;
        }
        self.pending_start = None;

        match outcome {
            Ok(()) => false,
            Err(e) => {
                let message = e.to_string();
                tracing::error!("sniffer: start request failed: {}", message);
                self.last_error = Some(message);
                self.phase = SniffPhase::Idle;
                true
            }
        }
    }

    /// Stop capturing
    ///
    /// Accepted from Running, or from Failed as a manual retry.
    pub fn stop(&mut self) -> Option<Ticket> {
        if !self.phase.can_stop() {
            tracing::debug!("sniffer: stop rejected while {:?}", self.phase);
            return None;
        }
        self.generation += 1;
        self.pending_start = None;
        self.pending_stop = Some(self.generation);
        self.phase = SniffPhase::Stopping;
        tracing::info!("sniffer: stopping (generation {})", self.generation);
        Some(Ticket::new(self.generation))
    }

    /// Report the outcome of the stop request
    pub fn stop_completed<E: Display>(
        &mut self,
        ticket: Ticket,
        outcome: Result<(), E>,
        now: Instant,
    ) -> bool {
        if self.pending_stop != Some(ticket.generation()) || self.phase != SniffPhase::Stopping {
            tracing::debug!("sniffer: discarding stale stop response");
            return false;
        }
        self.pending_stop = None;

        match outcome {
            Ok(()) => {
                self.phase = SniffPhase::Stopped;
                self.capture_completed = true;
                self.reset_at = Some(now + self.reset_delay);
                tracing::info!("sniffer: capture stopped");
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("sniffer: stop request failed: {}", message);
                self.last_error = Some(message.clone());
                self.phase = SniffPhase::Failed(message);
            }
        }
        true
    }

    /// Leave the Failed phase without retrying
    pub fn dismiss(&mut self) -> bool {
        if matches!(self.phase, SniffPhase::Failed(_)) {
            self.phase = SniffPhase::Idle;
            self.last_error = None;
            true
        } else {
            false
        }
    }

    /// Fire the deferred Stopped -> Idle reset
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.reset_at {
            Some(deadline) if self.phase == SniffPhase::Stopped && now >= deadline => {
                self.phase = SniffPhase::Idle;
                self.reset_at = None;
                true
            }
            Some(_) if self.phase != SniffPhase::Stopped => {
                self.reset_at = None;
                false
            }
            _ => false,
        }
    }
}
