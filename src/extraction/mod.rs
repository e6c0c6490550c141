//! Prescription reply extraction — the prompt sent to the vision model and
//! the parser that turns its free-text reply into structured fields.

pub mod parser;
pub mod prompt;

pub use parser::{parse_reply, ParsedPrescription};
pub use prompt::EXTRACTION_PROMPT;
