use axum::{Form, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::auth::CurrentActor;
use super::error::{OnPage, Rejection};
use super::params::Params;
use super::types::{ChoiceDto, CourseDetailDto, CourseDto, CourseRequest, Page, WithdrawalDto};
use super::{AppState, templates, validation};
use crate::domain::Department;

#[derive(Debug, Serialize)]
pub struct CourseFormContext {
    pub departments: Vec<ChoiceDto>,
}

#[derive(Debug, Serialize)]
pub struct CourseListContext {
    pub courses: Vec<CourseDto>,
}

/// GET /create/course
pub async fn create_course_form(CurrentActor(_): CurrentActor) -> Page<CourseFormContext> {
    Page::new(templates::CREATE_COURSE).with_context(CourseFormContext {
        departments: Department::ALL
            .iter()
            .map(|d| ChoiceDto {
                value: d.as_str(),
                label: d.label(),
            })
            .collect(),
    })
}

/// POST /create/course
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Form(payload): Form<CourseRequest>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::CREATE_COURSE;
    let course = validation::validate_course_form(&payload).on_page(page)?;

    let course = state
        .course_service
        .create_course(&actor, course)
        .await
        .on_page(page)?;

    Ok(Page::new(templates::INDEX)
        .success("Course Created Successfully")
        .with_context(course))
}

/// GET /view_all_courses
pub async fn view_all_courses(
    State(state): State<Arc<AppState>>,
) -> Result<Page<CourseListContext>, Rejection> {
    let courses = state
        .course_service
        .view_all_courses()
        .await
        .on_page(templates::VIEW_COURSES)?;

    Ok(Page::new(templates::VIEW_COURSES).with_context(CourseListContext { courses }))
}

/// GET /view_course/{course_id}
pub async fn view_course(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDetailDto>, Rejection> {
    let page = templates::VIEW_COURSE;
    let course_id = validation::validate_id("course", course_id).on_page(page)?;

    let detail = state
        .course_service
        .view_course(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(detail))
}

/// GET /join_course/{course_id}
pub async fn join_course_form(
    State(state): State<Arc<AppState>>,
    CurrentActor(_): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::JOIN_COURSE;
    let course_id = validation::validate_id("course", course_id).on_page(page)?;

    let course = state
        .course_service
        .get_course(course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page).with_context(course))
}

/// POST /join_course/{course_id}
pub async fn join_course(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::JOIN_COURSE;
    let course_id = validation::validate_id("course", course_id).on_page(page)?;

    let course = state
        .course_service
        .join_course(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("You have successfully joined this course!")
        .with_context(course))
}

/// POST /leave_course/{course_id}
pub async fn leave_course(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<WithdrawalDto>, Rejection> {
    let page = templates::LEAVE_COURSE;
    let course_id = validation::validate_id("course", course_id).on_page(page)?;

    let withdrawal = state
        .course_service
        .leave_course(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("You have left this course")
        .with_context(withdrawal))
}

/// POST /deactivate/course/{course_id}
pub async fn deactivate_course(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Params(course_id): Params<i32>,
) -> Result<Page<CourseDto>, Rejection> {
    let page = templates::VIEW_COURSE;
    let course_id = validation::validate_id("course", course_id).on_page(page)?;

    let course = state
        .course_service
        .deactivate_course(&actor, course_id)
        .await
        .on_page(page)?;

    Ok(Page::new(templates::CREATED_COURSES)
        .success("Course deactivated")
        .with_context(course))
}

/// GET /view_joined_courses
pub async fn view_joined_courses(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Page<CourseListContext>, Rejection> {
    let courses = state
        .course_service
        .view_joined_courses(&actor)
        .await
        .on_page(templates::JOINED_COURSES)?;

    Ok(Page::new(templates::JOINED_COURSES).with_context(CourseListContext { courses }))
}

/// GET /view_created_courses
pub async fn view_created_courses(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<Page<CourseListContext>, Rejection> {
    let courses = state
        .course_service
        .view_created_courses(&actor)
        .await
        .on_page(templates::CREATED_COURSES)?;

    Ok(Page::new(templates::CREATED_COURSES).with_context(CourseListContext { courses }))
}
