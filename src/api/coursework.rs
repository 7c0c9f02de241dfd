use axum::{Form, extract::State};
use std::sync::Arc;

use super::auth::CurrentActor;
use super::error::{OnPage, Rejection};
use super::params::Params;
use super::types::{
    ActivityListDto, AnnouncementDto, AnnouncementRequest, AssignmentDto, AssignmentRequest,
    CourseDto, Page, SubmissionDto, SubmissionFormDto, SubmissionListDto, SubmissionRequest,
};
use super::validation::{self, MAX_DESCRIPTION_LENGTH};
use super::{ApiError, AppState, templates};
use crate::services::Activity;

const NEW_ANNOUNCEMENT: &str = "create an announcement";
const NEW_ASSIGNMENT: &str = "create an assignment";

/// GET /create/announcement/{course_id}
pub async fn create_announcement_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::CREATE_ANNOUNCEMENT;
    let course = state
        .coursework_service
        .owned_course(&actor, course_id, NEW_ANNOUNCEMENT)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(course))
}

/// POST /create/announcement/{course_id}
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
    Form(payload): Form<AnnouncementRequest>,
) -> Result<Page<AnnouncementDto>, Rejection> {
    let page = templates::CREATE_ANNOUNCEMENT;

    // Non-owners are rejected before the form is looked at.
    state
        .coursework_service
        .owned_course(&actor, course_id, NEW_ANNOUNCEMENT)
        .await
        .on_page(page)?;

    let text = payload.text.trim();
    if text.is_empty() {
        return Err(Rejection::new(
            page,
            ApiError::validation(
                "Sorry, your announcement cannot be blank, please refresh, and try again",
            ),
        ));
    }
    if text.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(Rejection::new(
            page,
            ApiError::validation(format!(
                "Announcements must be {MAX_DESCRIPTION_LENGTH} characters or less"
            )),
        ));
    }

    let announcement = state
        .coursework_service
        .create_announcement(&actor, course_id, text.to_string())
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Announcement Created Successfully")
        .with_context(announcement))
}

/// GET /create/assignment/{course_id}
pub async fn create_assignment_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::CREATE_ASSIGNMENT;
    let course = state
        .coursework_service
        .owned_course(&actor, course_id, NEW_ASSIGNMENT)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(course))
}

/// POST /create/assignment/{course_id}
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
    Form(payload): Form<AssignmentRequest>,
) -> Result<Page<AssignmentDto>, Rejection> {
    let page = templates::CREATE_ASSIGNMENT;

    state
        .coursework_service
        .owned_course(&actor, course_id, NEW_ASSIGNMENT)
        .await
        .on_page(page)?;

    let assignment = validation::validate_assignment_form(&payload).on_page(page)?;

    let assignment = state
        .coursework_service
        .create_assignment(&actor, course_id, assignment)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Assignment Created Successfully")
        .with_context(assignment))
}

/// GET /create/submission/{course_id}/{assignment_id}
pub async fn create_submission_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params((course_id, assignment_id)): Params<(i32, i32)>,
) -> Result<Page<SubmissionFormDto>, Rejection> {
    let page = templates::CREATE_SUBMISSION;
    let form = state
        .coursework_service
        .submission_form(&actor, course_id, assignment_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(form))
}

/// POST /create/submission/{course_id}/{assignment_id}
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params((course_id, assignment_id)): Params<(i32, i32)>,
    Form(payload): Form<SubmissionRequest>,
) -> Result<Page<SubmissionDto>, Rejection> {
    let page = templates::CREATE_SUBMISSION;
    let text = validation::required("Submission text", &payload.text).on_page(page)?;

    let submission = state
        .coursework_service
        .create_submission(&actor, course_id, assignment_id, text.to_string())
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Assignment submitted successfully!")
        .with_context(submission))
}

/// GET /view/all/{activity}/{course_id}
pub async fn view_all(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params((activity, course_id)): Params<(String, i32)>,
) -> Result<Page<ActivityListDto>, Rejection> {
    let activity: Activity = activity.parse().on_page(templates::INDEX)?;
    let page = templates::view_activity(&activity.to_string());

    let list = state
        .coursework_service
        .view_all(&actor, activity, course_id)
        .await
        .on_page(&page)?;

    Ok(Page::new(page).with_context(list))
}

/// GET /view/submissions/{course_id}/{assignment_id}
pub async fn view_submissions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params((course_id, assignment_id)): Params<(i32, i32)>,
) -> Result<Page<SubmissionListDto>, Rejection> {
    let page = templates::VIEW_SUBMISSIONS;
    let list = state
        .coursework_service
        .view_submissions(&actor, course_id, assignment_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(list))
}

/// GET /view/submissions/{course_id}
pub async fn view_all_submissions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<SubmissionListDto>, Rejection> {
    let page = templates::VIEW_ALL_SUBMISSIONS;
    let list = state
        .coursework_service
        .view_all_submissions(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(list))
}
