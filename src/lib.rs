// Library surface for the binary, headless integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod practice;
pub mod registry;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod util;

pub use error::{ConfigError, ConfigResult};
pub use generator::{create_character_sequence, generate_paragraph, GeneratedParagraph};
pub use practice::{Practice, PracticeMode, PracticeSettings};
pub use registry::{list_rows, registry, RowId, RowInfo};
pub use scoring::{score, CharState, Metrics, Score};
pub use session::{SessionPhase, TypingSession};
