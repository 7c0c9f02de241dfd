use axum::{Form, extract::State};
use std::sync::Arc;

use super::auth::CurrentActor;
use super::error::{OnPage, Rejection};
use super::params::Params;
use super::types::{
    FinalGradeResultDto, FinalsDto, FinalsSheetDto, Page, ScoreRequest, SubmissionDto,
};
use super::{AppState, templates, validation};

/// GET /grade/submission/{submission_id}
pub async fn grade_submission_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(submission_id): Params<i32>,
) -> Result<Page<SubmissionDto>, Rejection> {
    let page = templates::GRADE_SUBMISSION;
    let submission = state
        .grading_service
        .submission_to_grade(&actor, submission_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(submission))
}

/// POST /grade/submission/{submission_id}
pub async fn grade_submission(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(submission_id): Params<i32>,
    Form(payload): Form<ScoreRequest>,
) -> Result<Page<SubmissionDto>, Rejection> {
    let page = templates::GRADE_SUBMISSION;
    let score = validation::parse_int("Score", &payload.score).on_page(page)?;

    let submission = state
        .grading_service
        .grade_submission(&actor, submission_id, score)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Score updated successfully!")
        .with_context(submission))
}

/// GET /grade/final/{course_id}
pub async fn grade_finals(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<FinalsSheetDto>, Rejection> {
    let page = templates::GRADE_FINALS;
    let sheet = state
        .grading_service
        .grade_finals(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(sheet))
}

/// POST /grade/final/{course_id}/{user_id}
pub async fn grade_final(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params((course_id, user_id)): Params<(i32, i32)>,
    Form(payload): Form<ScoreRequest>,
) -> Result<Page<FinalGradeResultDto>, Rejection> {
    let page = templates::GRADE_FINALS;
    let score = validation::parse_int("Score", &payload.score).on_page(page)?;

    let result = state
        .grading_service
        .grade_final(&actor, course_id, user_id, score)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Final grade saved")
        .with_context(result))
}

/// GET /view/final/{course_id}
pub async fn view_finals(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<FinalsDto>, Rejection> {
    let page = templates::VIEW_FINALS;
    let finals = state
        .grading_service
        .view_finals(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(finals))
}
