pub mod job;
pub mod ollama;
pub mod review;

pub use job::{JobCreateResponse, JobStatus, JobStatusResponse, JobUpdateRequest};
pub use ollama::{OllamaGenerateRequest, OllamaGenerateResponse};
pub use review::{
    FeedbackAck, FeedbackItem, ReviewFeedbackRequest, ReviewRequest, ReviewResponse,
    ReviewResponseCategory,
};
