pub mod drill;
pub mod formatting;
pub mod paragraph;

pub use drill::DrillGenerator;
pub use formatting::sentence_case;
pub use paragraph::{replay, GeneratedParagraph, ParagraphGenerator};

use crate::registry::{registry, RowId};

/// Generate a paragraph from the built-in data, avoiding `previous_seed` when possible
pub fn generate_paragraph(previous_seed: Option<&str>) -> GeneratedParagraph {
    ParagraphGenerator::new(registry(), rand::thread_rng()).generate(previous_seed)
}

/// A 120 character drill for `row`
pub fn create_character_sequence(row: RowId) -> String {
    DrillGenerator::new(registry(), rand::thread_rng()).generate(row)
}
