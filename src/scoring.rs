use serde::Serialize;

/// Characters per word when converting typed characters to words per minute
pub const CHARS_PER_WORD: f64 = 5.0;
const MS_PER_MINUTE: f64 = 60_000.0;

/// How one target position relates to what has been typed so far
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CharState {
    Pending,
    Current,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Score {
    pub char_states: Vec<CharState>,
    pub correct_count: usize,
}

/// Classify every target position against `typed`.
///
/// Positions are compared by `char`. `typed` is expected to be no longer than
/// `target`; any excess is ignored.
pub fn score(target: &str, typed: &str) -> Score {
    let mut typed_chars = typed.chars();
    let mut typed_len = 0;
    let mut correct_count = 0;
    let mut char_states = Vec::with_capacity(target.len());

    for expected in target.chars() {
        let state = match typed_chars.next() {
            Some(actual) => {
                typed_len += 1;
                if actual == expected {
                    correct_count += 1;
                    CharState::Correct
                } else {
                    CharState::Incorrect
                }
            }
            None if char_states.len() == typed_len => CharState::Current,
            None => CharState::Pending,
        };
        char_states.push(state);
    }

    Score {
        char_states,
        correct_count,
    }
}

/// Percentage of typed characters that were correct; 100 before anything is typed
pub fn accuracy(correct_count: usize, typed_len: usize) -> f64 {
    if typed_len == 0 {
        return 100.0;
    }
    correct_count as f64 / typed_len as f64 * 100.0
}

/// Words per minute using the five-characters-per-word convention
pub fn wpm(typed_len: usize, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    (typed_len as f64 / CHARS_PER_WORD) / (elapsed_ms as f64 / MS_PER_MINUTE)
}

pub fn error_count(correct_count: usize, typed_len: usize) -> usize {
    typed_len.saturating_sub(correct_count)
}

/// Everything the host displays for a session at one instant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    pub score: Score,
    pub typed_len: usize,
    pub elapsed_ms: u64,
    pub wpm: f64,
    pub accuracy: f64,
    pub error_count: usize,
    pub is_complete: bool,
}

impl Metrics {
    /// Derive metrics for `typed` against `target`.
    ///
    /// `started_at` and `ended_at` are host timestamps in milliseconds; `now` is
    /// used while the session has not ended.
    pub fn compute(
        target: &str,
        typed: &str,
        started_at: Option<u64>,
        ended_at: Option<u64>,
        now: u64,
    ) -> Self {
        let score = score(target, typed);
        let target_len = target.chars().count();
        let typed_len = typed.chars().count().min(target_len);

        let elapsed_ms = match started_at {
            Some(start) => ended_at.unwrap_or(now).saturating_sub(start),
            None => 0,
        };
        let wpm = if started_at.is_some() {
            wpm(typed_len, elapsed_ms)
        } else {
            0.0
        };

        Self {
            accuracy: accuracy(score.correct_count, typed_len),
            error_count: error_count(score.correct_count, typed_len),
            is_complete: target_len > 0 && typed_len == target_len,
            score,
            typed_len,
            elapsed_ms,
            wpm,
        }
    }
}
