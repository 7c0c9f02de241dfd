//! `SeaORM` implementation of the `CourseService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::api::types::{AnnouncementDto, AssignmentDto, CourseDetailDto, CourseDto, WithdrawalDto};
use crate::db::{NewCourse, Store};
use crate::domain::Actor;
use crate::entities::courses;
use crate::services::access::{self, Membership};
use crate::services::course_service::{CourseError, CourseService};

pub struct SeaOrmCourseService {
    store: Store,
}

impl SeaOrmCourseService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn with_instructor_names(
        &self,
        courses: Vec<courses::Model>,
    ) -> Result<Vec<CourseDto>, CourseError> {
        let names = self.store.course_repo().instructor_names(&courses).await?;

        Ok(courses
            .into_iter()
            .map(|course| {
                let name = names.get(&course.instructor_id).cloned();
                CourseDto::new(course, name)
            })
            .collect())
    }
}

#[async_trait]
impl CourseService for SeaOrmCourseService {
    async fn create_course(
        &self,
        actor: &Actor,
        course: NewCourse,
    ) -> Result<CourseDto, CourseError> {
        let Some(instructor) = actor.role.as_instructor() else {
            return Err(CourseError::PermissionDenied(
                "Sorry, only instructors can create courses".to_string(),
            ));
        };

        let created = self
            .store
            .course_repo()
            .create(instructor.user_id, course)
            .await?;

        Ok(CourseDto::new(created, Some(actor.full_name())))
    }

    async fn view_all_courses(&self) -> Result<Vec<CourseDto>, CourseError> {
        let courses = self.store.course_repo().list_active().await?;
        self.with_instructor_names(courses).await
    }

    async fn get_course(&self, course_id: i32) -> Result<CourseDto, CourseError> {
        let course = access::find_course(&self.store, course_id).await?;
        let mut dtos = self.with_instructor_names(vec![course]).await?;
        dtos.pop().ok_or(CourseError::CourseNotFound)
    }

    async fn view_course(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<CourseDetailDto, CourseError> {
        let (course, membership) = access::member_check(&self.store, actor, course_id).await?;

        let coursework = self.store.coursework_repo();
        let announcements = coursework.list_announcements(course_id).await?;
        let assignments = coursework.list_assignments(course_id).await?;
        let students_enrolled = self.store.enrollment_repo().count_students(course_id).await?;

        let mut course = self.with_instructor_names(vec![course]).await?;
        let course = course.pop().ok_or(CourseError::CourseNotFound)?;

        Ok(CourseDetailDto {
            course,
            is_owner: matches!(membership, Membership::Owner(_)),
            students_enrolled,
            announcements: announcements.into_iter().map(AnnouncementDto::from).collect(),
            assignments: assignments.into_iter().map(AssignmentDto::from).collect(),
        })
    }

    async fn join_course(&self, actor: &Actor, course_id: i32) -> Result<CourseDto, CourseError> {
        let course = access::find_course(&self.store, course_id).await?;

        let Some(student) = actor.role.as_student() else {
            return Err(CourseError::PermissionDenied(
                "Sorry, only students can join courses".to_string(),
            ));
        };

        if !course.is_active {
            return Err(CourseError::Inactive);
        }

        self.store
            .enrollment_repo()
            .enroll(student.user_id, course_id)
            .await?
            .ok_or(CourseError::AlreadyEnrolled)?;

        Ok(CourseDto::from(course))
    }

    async fn leave_course(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<WithdrawalDto, CourseError> {
        let course = access::find_course(&self.store, course_id).await?;

        let Some(student) = actor.role.as_student() else {
            return Err(CourseError::NotEnrolled);
        };

        if !course.is_active {
            return Err(CourseError::Inactive);
        }

        let removed = self
            .store
            .enrollment_repo()
            .withdraw(student.user_id, course_id)
            .await?
            .ok_or(CourseError::NotEnrolled)?;

        Ok(WithdrawalDto {
            course: CourseDto::from(course),
            removed,
        })
    }

    async fn deactivate_course(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<CourseDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "deactivate a course").await?;

        if !course.is_active || !self.store.course_repo().deactivate(course_id).await? {
            return Err(CourseError::AlreadyInactive);
        }

        info!("Instructor {} deactivated course {}", actor.user_id, course_id);

        let mut course = CourseDto::from(course);
        course.is_active = false;
        Ok(course)
    }

    async fn view_joined_courses(&self, actor: &Actor) -> Result<Vec<CourseDto>, CourseError> {
        let Some(student) = actor.role.as_student() else {
            return Err(CourseError::PermissionDenied(
                "Sorry, only students can view joined courses".to_string(),
            ));
        };

        let courses = self.store.course_repo().list_for_student(student.user_id).await?;
        self.with_instructor_names(courses).await
    }

    async fn view_created_courses(&self, actor: &Actor) -> Result<Vec<CourseDto>, CourseError> {
        let Some(instructor) = actor.role.as_instructor() else {
            return Err(CourseError::PermissionDenied(
                "Sorry, only instructors can view created courses".to_string(),
            ));
        };

        let courses = self
            .store
            .course_repo()
            .list_for_instructor(instructor.user_id)
            .await?;

        Ok(courses
            .into_iter()
            .map(|course| CourseDto::new(course, Some(actor.full_name())))
            .collect())
    }
}
