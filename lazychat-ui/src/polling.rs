//! Adaptive polling for assistant replies.
//!
//! The backend offers no push channel, so after a message is sent the UI
//! re-fetches the conversation on a fixed interval until the latest reply
//! stops changing, too many fetches fail, or the attempt ceiling is hit.
//! [`PollingState`] is the pure decision logic; [`PollTask`] owns the
//! spawned timer loop that drives it.

use dioxus::core::Task;
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval_ms: u32,
    pub max_attempts: u32,
    /// Unchanged complete-looking observations needed to stop.
    pub unchanged_threshold: u32,
    pub max_consecutive_errors: u32,
    /// Growth of the current node (chars) that counts as still streaming.
    pub growth_threshold: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            max_attempts: 6,
            unchanged_threshold: 3,
            max_consecutive_errors: 3,
            growth_threshold: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Stabilized,
    MaxAttempts,
    TooManyErrors,
    Cancelled,
}

impl StopReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::Stabilized => "response stabilized",
            StopReason::MaxAttempts => "maximum attempts reached",
            StopReason::TooManyErrors => "too many consecutive errors",
            StopReason::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollingState {
    config: PollConfig,
    phase: PollPhase,
    attempts: u32,
    snapshot: Option<String>,
    unchanged: u32,
    consecutive_errors: u32,
    previous_length: Option<usize>,
    last_stop: Option<StopReason>,
}

impl PollingState {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn phase(&self) -> PollPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == PollPhase::Active
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn unchanged(&self) -> u32 {
        self.unchanged
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// Reset every counter and begin a fresh session.
    pub fn start(&mut self) {
        *self = Self {
            config: self.config,
            phase: PollPhase::Active,
            ..Self::default()
        };
        dioxus_logger::tracing::debug!("Starting polling for response updates");
    }

    pub fn stop(&mut self, reason: StopReason) {
        if self.phase == PollPhase::Idle {
            return;
        }
        self.phase = PollPhase::Idle;
        self.last_stop = Some(reason);
        dioxus_logger::tracing::info!(
            "Polling stopped after {} attempt(s): {}",
            self.attempts,
            reason.describe()
        );
    }

    /// Count an attempt. Returns whether this tick should fetch.
    pub fn begin_tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.attempts += 1;
        dioxus_logger::tracing::debug!(
            "Polling attempt {}/{}",
            self.attempts,
            self.config.max_attempts
        );
        true
    }

    /// Close out a tick; enforces the attempt ceiling.
    pub fn end_tick(&mut self) {
        if self.is_active() && self.attempts >= self.config.max_attempts {
            self.stop(StopReason::MaxAttempts);
        }
    }

    /// Feed one successful fetch: the latest assistant text (if any) and the
    /// length of the current node's text.
    pub fn observe(&mut self, latest_assistant: Option<&str>, current_node_len: usize) {
        if !self.is_active() {
            return;
        }
        self.consecutive_errors = 0;

        let grew = self
            .previous_length
            .is_some_and(|previous| current_node_len > previous + self.config.growth_threshold);
        if current_node_len > 0 {
            self.previous_length = Some(current_node_len);
        }

        let Some(text) = latest_assistant else {
            return;
        };

        if grew {
            dioxus_logger::tracing::debug!("Large response detected, extending polling");
            self.unchanged = 0;
            self.snapshot = Some(text.to_string());
            return;
        }

        if looks_incomplete(text) {
            self.unchanged = 0;
            if self.snapshot.as_deref() != Some(text) {
                self.snapshot = Some(text.to_string());
            }
            return;
        }

        match self.snapshot.as_deref() {
            // A complete-looking first sighting already counts once.
            None => {
                self.snapshot = Some(text.to_string());
                self.unchanged = 1;
            }
            Some(previous) if previous == text => self.unchanged += 1,
            Some(_) => {
                self.snapshot = Some(text.to_string());
                self.unchanged = 0;
            }
        }
        if self.unchanged >= self.config.unchanged_threshold {
            self.stop(StopReason::Stabilized);
        }
    }

    pub fn record_error(&mut self) {
        if !self.is_active() {
            return;
        }
        self.consecutive_errors += 1;
        if self.consecutive_errors >= self.config.max_consecutive_errors {
            self.stop(StopReason::TooManyErrors);
        }
    }

    /// Manual "keep waiting". Returns true when a new session was started
    /// and the caller has to spawn a timer loop.
    pub fn extend(&mut self) -> bool {
        if self.is_active() {
            self.unchanged = 0;
            self.attempts = 0;
            dioxus_logger::tracing::debug!("Polling manually extended");
            false
        } else {
            self.start();
            true
        }
    }
}

fn incomplete_markers() -> &'static [Regex] {
    static MARKERS: OnceLock<Vec<Regex>> = OnceLock::new();
    MARKERS.get_or_init(|| {
        [
            // trailing character is not terminal punctuation
            r"[^.!?]\s*$",
            // code fence opened and never closed
            r"```[^`]*$",
            // bullet item without terminal punctuation
            r"\n\s*[-*]\s+[^.!?]+$",
            r"\.\.\.\s*$",
            // numbered item without terminal punctuation
            r"\d+\.\s+[^.!?]+$",
            r"\([^)]*$",
            r"\[[^\]]*$",
            r"\{[^}]*$",
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    })
}

/// Heuristic: does this reply look cut off mid-stream?
pub fn looks_incomplete(text: &str) -> bool {
    incomplete_markers().iter().any(|marker| marker.is_match(text))
}

/// Handle to the spawned polling loop. Clones share the handle; starting a
/// new loop cancels the previous one.
#[derive(Clone, Default)]
pub struct PollTask {
    handle: Rc<RefCell<Option<Task>>>,
}

impl PollTask {
    pub fn replace(&self, task: Task) {
        if let Some(previous) = self.handle.borrow_mut().replace(task) {
            previous.cancel();
        }
    }

    pub fn stop(&self) {
        if let Some(task) = self.handle.borrow_mut().take() {
            task.cancel();
        }
    }

    /// Called by the loop itself when it exits on its own.
    pub fn finished(&self) {
        self.handle.borrow_mut().take();
    }
}
