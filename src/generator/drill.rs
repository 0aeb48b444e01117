use rand::seq::SliceRandom;
use rand::Rng;
use std::iter;
use tracing::trace;

use crate::registry::{Registry, RowId};

pub const TARGET_LENGTH: usize = 120;
/// Longest drill a generator will build; longer requests are clamped
pub const MAX_TARGET_LENGTH: usize = 1_000;
/// Extra characters generated beyond the target so truncation always has material
const SAFETY_MARGIN: usize = 10;
const RUN_LENGTHS: [usize; 4] = [1, 2, 3, 4];

/// Builds character drills: short runs of one key, cycling through a row
pub struct DrillGenerator<'a, R> {
    registry: &'a Registry,
    rng: R,
    target_length: usize,
}

impl<'a, R: Rng> DrillGenerator<'a, R> {
    pub fn new(registry: &'a Registry, rng: R) -> Self {
        Self {
            registry,
            rng,
            target_length: TARGET_LENGTH,
        }
    }

    /// Drills are at least one character so a session can always complete.
    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = target_length.clamp(1, MAX_TARGET_LENGTH);
        self
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    /// A sequence of exactly `target_length` characters drawn from `row`.
    ///
    /// Starts at a random key, then emits runs of 1 to 4 copies of each key in
    /// row order, separated by single spaces.
    pub fn generate(&mut self, row: RowId) -> String {
        let characters = &self.registry.rows().get(row).characters;
        let mut index = self.rng.gen_range(0..characters.len());
        let mut buffer = String::new();
        let mut buffered = 0;

        while buffered < self.target_length.saturating_add(SAFETY_MARGIN) {
            let run = *RUN_LENGTHS.choose(&mut self.rng).unwrap_or(&1);
            let ch = characters[index % characters.len()];

            buffer.extend(iter::repeat(ch).take(run));
            buffer.push(' ');
            buffered += run + 1;
            index += 1;
        }

        trace!(%row, buffered, "generated character drill");
        buffer.chars().take(self.target_length).collect()
    }
}
