use axum::{Form, extract::State};
use std::sync::Arc;

use super::auth::CurrentActor;
use super::error::{OnPage, Rejection};
use super::params::Params;
use super::types::{AttendanceFormDto, AttendanceRecordedDto, AttendanceSheetDto, Page};
use super::{AppState, templates, validation};

/// GET /create/attendance/{course_id}
pub async fn create_attendance_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<AttendanceFormDto>, Rejection> {
    let page = templates::CREATE_ATTENDANCE;
    let form = state
        .attendance_service
        .attendance_form(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(form))
}

/// POST /create/attendance/{course_id}
///
/// The body carries `week` plus one `<student id>=on` pair per student
/// marked present.
pub async fn create_attendance(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Page<AttendanceRecordedDto>, Rejection> {
    let page = templates::CREATE_ATTENDANCE;
    let (week, student_ids) = validation::parse_attendance_form(&fields).on_page(page)?;

    let recorded = state
        .attendance_service
        .create_attendance(&actor, course_id, week, student_ids)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success(format!("Attendance for week {week} recorded"))
        .with_context(recorded))
}

/// GET /view/attendance/{course_id}
pub async fn view_attendance(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<AttendanceSheetDto>, Rejection> {
    let page = templates::VIEW_ATTENDANCE;
    let sheet = state
        .attendance_service
        .view_attendance(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(sheet))
}
