//! The review pipeline: prompt construction, raw-output parsing, and the
//! generate-and-persist service glue.

pub mod parser;
pub mod prompt;
pub mod service;

pub use parser::{FALLBACK_CATEGORY, parse_review_output};
pub use prompt::build_review_prompt;
pub use service::{StoredReview, generate_and_save_review, save_feedback};
