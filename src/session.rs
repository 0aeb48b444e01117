use tracing::debug;

use crate::scoring::{score, Metrics, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Running,
    Complete,
}

/// One attempt at typing a target text.
///
/// Timestamps are host milliseconds. `started_at` is written once, by the first
/// non-empty input, and `ended_at` once, when the input reaches the target's
/// length. A reset replaces the whole session instead of clearing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSession {
    target: String,
    target_len: usize,
    typed: String,
    started_at: Option<u64>,
    ended_at: Option<u64>,
}

impl TypingSession {
    pub fn new(target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            target_len: target.chars().count(),
            target,
            typed: String::new(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<u64> {
        self.ended_at
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.started_at, self.ended_at) {
            (_, Some(_)) => SessionPhase::Complete,
            (Some(_), None) => SessionPhase::Running,
            (None, None) => SessionPhase::Idle,
        }
    }

    /// Replace the typed text with `raw`, truncated to the target length.
    ///
    /// Any string is accepted. Returns the phase after the input is applied.
    pub fn accept_input(&mut self, raw: &str, now: u64) -> SessionPhase {
        let typed: String = raw.chars().take(self.target_len).collect();
        let typed_len = typed.chars().count();
        self.typed = typed;

        if self.started_at.is_none() && typed_len > 0 {
            debug!(now, "session started");
            self.started_at = Some(now);
        }

        if self.target_len > 0
            && typed_len == self.target_len
            && self.started_at.is_some()
            && self.ended_at.is_none()
        {
            debug!(now, "session complete");
            self.ended_at = Some(now);
        }

        self.phase()
    }

    pub fn push_char(&mut self, c: char, now: u64) -> SessionPhase {
        let mut next = self.typed.clone();
        next.push(c);
        self.accept_input(&next, now)
    }

    pub fn pop_char(&mut self, now: u64) -> SessionPhase {
        let mut next = self.typed.clone();
        next.pop();
        self.accept_input(&next, now)
    }

    pub fn score(&self) -> Score {
        score(&self.target, &self.typed)
    }

    pub fn metrics(&self, now: u64) -> Metrics {
        Metrics::compute(
            &self.target,
            &self.typed,
            self.started_at,
            self.ended_at,
            now,
        )
    }

    pub fn is_complete(&self) -> bool {
        self.target_len > 0 && self.typed.chars().count() == self.target_len
    }
}
