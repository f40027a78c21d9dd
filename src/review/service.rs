use crate::db::{DbHandle, NewFeedback, NewReview};
use crate::engine::ReviewEngine;
use crate::error::CastorError;
use crate::review::{parser, prompt};
use castor_schema::{ReviewFeedbackRequest, ReviewRequest, ReviewResponseCategory};
use tracing::debug;

/// A persisted review plus its parsed categories, ready to shape a response.
#[derive(Debug, Clone)]
pub struct StoredReview {
    pub review_id: String,
    pub reviews: Vec<ReviewResponseCategory>,
}

/// Runs the full pipeline: prompt -> engine -> parse -> persist.
///
/// The engine error propagates untouched; no fallback review text is ever
/// fabricated here.
pub async fn generate_and_save_review(
    db: &DbHandle,
    engine: &dyn ReviewEngine,
    categories_cfg: &[String],
    req: &ReviewRequest,
) -> Result<StoredReview, CastorError> {
    let prompt = prompt::build_review_prompt(
        &req.language,
        &req.source_code,
        req.diff.as_deref(),
        categories_cfg,
    );

    let raw = engine.generate_review(&prompt).await?;
    let parsed = parser::parse_review_output(&raw);
    debug!(
        language = %req.language,
        categories = parsed.len(),
        raw_len = raw.len(),
        "Parsed engine output"
    );

    let options = req
        .options
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let review = db
        .create_review(NewReview {
            language: req.language.clone(),
            source_code: req.source_code.clone(),
            diff: req.diff.clone(),
            file_name: req.file_name.clone(),
            options,
            categories: parsed.clone(),
        })
        .await?;

    Ok(StoredReview {
        review_id: review.review_id,
        reviews: parsed
            .into_iter()
            .map(|(category, message)| ReviewResponseCategory { category, message })
            .collect(),
    })
}

/// Stores user feedback; the parent review must exist.
pub async fn save_feedback(
    db: &DbHandle,
    req: &ReviewFeedbackRequest,
) -> Result<(), CastorError> {
    let items = req
        .feedbacks
        .iter()
        .map(|f| NewFeedback {
            category_name: f.category.clone(),
            user_feedback: f.feedback.clone(),
        })
        .collect();

    db.insert_feedback(req.review_id.clone(), items).await
}
