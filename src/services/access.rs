//! Course-scoped authorization predicates.
//!
//! Every check fails closed: a missing course, a missing role or a missing
//! enrollment all reject the request.

use tracing::warn;

use crate::db::Store;
use crate::domain::{Actor, InstructorProfile, Role, StudentProfile};
use crate::entities::{courses, enrollments};
use crate::services::CourseError;

/// How the actor is attached to a course they are allowed to see.
#[derive(Debug, Clone, Copy)]
pub enum Membership<'a> {
    Owner(&'a InstructorProfile),
    Enrolled(&'a StudentProfile),
}

/// The actor holds either a Student or an Instructor role.
#[must_use]
pub const fn has_account(actor: &Actor) -> bool {
    actor.role.is_assigned()
}

pub async fn find_course(store: &Store, course_id: i32) -> Result<courses::Model, CourseError> {
    store
        .get_course(course_id)
        .await?
        .ok_or(CourseError::CourseNotFound)
}

/// The actor must be the instructor who owns the course.
///
/// `action` completes the sentence "you don't have the permission to ...".
pub async fn instructor_check<'a>(
    store: &Store,
    actor: &'a Actor,
    course_id: i32,
    action: &str,
) -> Result<(courses::Model, &'a InstructorProfile), CourseError> {
    let course = find_course(store, course_id).await?;

    let denied = || {
        CourseError::PermissionDenied(format!(
            "Sorry, you don't have the permission to {action} in this course."
        ))
    };

    let Some(instructor) = actor.role.as_instructor() else {
        warn!(
            "User {} is not an instructor; refused to {} in course {}",
            actor.user_id, action, course_id
        );
        return Err(denied());
    };

    if course.instructor_id != instructor.user_id {
        warn!(
            "Instructor {} does not own course {}; refused to {}",
            actor.user_id, course_id, action
        );
        return Err(denied());
    }

    Ok((course, instructor))
}

/// The actor must be a student enrolled in the course.
pub async fn student_check<'a>(
    store: &Store,
    actor: &'a Actor,
    course_id: i32,
) -> Result<(courses::Model, &'a StudentProfile, enrollments::Model), CourseError> {
    let course = find_course(store, course_id).await?;

    let Some(student) = actor.role.as_student() else {
        warn!(
            "User {} is not a student; refused access to course {}",
            actor.user_id, course_id
        );
        return Err(CourseError::PermissionDenied(
            "Sorry, only students enrolled in this course can do that.".to_string(),
        ));
    };

    let enrollment = store
        .enrollment_repo()
        .find(student.user_id, course_id)
        .await?
        .ok_or_else(|| {
            warn!(
                "Student {} is not enrolled in course {}",
                actor.user_id, course_id
            );
            CourseError::PermissionDenied(
                "Sorry, you need to join a course in order to view it".to_string(),
            )
        })?;

    Ok((course, student, enrollment))
}

/// The actor either owns the course or is enrolled in it.
pub async fn member_check<'a>(
    store: &Store,
    actor: &'a Actor,
    course_id: i32,
) -> Result<(courses::Model, Membership<'a>), CourseError> {
    let course = find_course(store, course_id).await?;

    match &actor.role {
        Role::Instructor(instructor) => {
            if course.instructor_id == instructor.user_id {
                Ok((course, Membership::Owner(instructor)))
            } else {
                warn!(
                    "Instructor {} tried to view course {} they do not own",
                    actor.user_id, course_id
                );
                Err(CourseError::PermissionDenied(
                    "Sorry, you need to create a course in order to view it".to_string(),
                ))
            }
        }
        Role::Student(student) => {
            if store.is_enrolled(student.user_id, course_id).await? {
                Ok((course, Membership::Enrolled(student)))
            } else {
                Err(CourseError::PermissionDenied(
                    "Sorry, you need to join a course in order to view it".to_string(),
                ))
            }
        }
        Role::Unassigned => Err(CourseError::PermissionDenied(
            "Sorry, you need to join a course as a student or create it as an instructor in order to view it"
                .to_string(),
        )),
    }
}
