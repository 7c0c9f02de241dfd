//! `SeaORM` implementation of the `CourseworkService` trait.

use async_trait::async_trait;

use crate::api::types::{
    ActivityItems, ActivityListDto, AnnouncementDto, AssignmentDto, CourseDto, SubmissionDto,
    SubmissionFormDto, SubmissionListDto,
};
use crate::db::{NewAssignment, Store};
use crate::domain::Actor;
use crate::entities::{assignments, courses};
use crate::services::access;
use crate::services::coursework_service::{Activity, CourseworkService};
use crate::services::CourseError;

pub struct SeaOrmCourseworkService {
    store: Store,
}

impl SeaOrmCourseworkService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Loads an assignment and checks it belongs to `course`.
    async fn course_assignment(
        &self,
        course: &courses::Model,
        assignment_id: i32,
    ) -> Result<assignments::Model, CourseError> {
        self.store
            .coursework_repo()
            .get_assignment(assignment_id)
            .await?
            .filter(|a| a.course_id == course.id)
            .ok_or(CourseError::AssignmentNotFound)
    }
}

#[async_trait]
impl CourseworkService for SeaOrmCourseworkService {
    async fn owned_course(
        &self,
        actor: &Actor,
        course_id: i32,
        action: &str,
    ) -> Result<CourseDto, CourseError> {
        let (course, _) = access::instructor_check(&self.store, actor, course_id, action).await?;
        Ok(CourseDto::from(course))
    }

    async fn create_announcement(
        &self,
        actor: &Actor,
        course_id: i32,
        text: String,
    ) -> Result<AnnouncementDto, CourseError> {
        access::instructor_check(&self.store, actor, course_id, "create an announcement").await?;

        let announcement = self
            .store
            .coursework_repo()
            .create_announcement(course_id, text)
            .await?;

        Ok(AnnouncementDto::from(announcement))
    }

    async fn create_assignment(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment: NewAssignment,
    ) -> Result<AssignmentDto, CourseError> {
        access::instructor_check(&self.store, actor, course_id, "create an assignment").await?;

        let assignment = self
            .store
            .coursework_repo()
            .create_assignment(course_id, assignment)
            .await?;

        Ok(AssignmentDto::from(assignment))
    }

    async fn view_all(
        &self,
        actor: &Actor,
        activity: Activity,
        course_id: i32,
    ) -> Result<ActivityListDto, CourseError> {
        let (course, _) = access::member_check(&self.store, actor, course_id).await?;
        let coursework = self.store.coursework_repo();

        let items = match activity {
            Activity::Announcements => ActivityItems::Announcements(
                coursework
                    .list_announcements(course_id)
                    .await?
                    .into_iter()
                    .map(AnnouncementDto::from)
                    .collect(),
            ),
            Activity::Assignments => ActivityItems::Assignments(
                coursework
                    .list_assignments(course_id)
                    .await?
                    .into_iter()
                    .map(AssignmentDto::from)
                    .collect(),
            ),
        };

        Ok(ActivityListDto {
            course: CourseDto::from(course),
            items,
        })
    }

    async fn submission_form(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
    ) -> Result<SubmissionFormDto, CourseError> {
        let (course, _, _) = access::student_check(&self.store, actor, course_id).await?;
        let assignment = self.course_assignment(&course, assignment_id).await?;

        Ok(SubmissionFormDto {
            course: CourseDto::from(course),
            assignment: AssignmentDto::from(assignment),
        })
    }

    async fn create_submission(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
        text: String,
    ) -> Result<SubmissionDto, CourseError> {
        let (course, student, _) = access::student_check(&self.store, actor, course_id).await?;
        let assignment = self.course_assignment(&course, assignment_id).await?;

        if !course.is_active {
            return Err(CourseError::Inactive);
        }

        let submission = self
            .store
            .coursework_repo()
            .create_submission(assignment.id, student.user_id, text)
            .await?;

        Ok(SubmissionDto::new(
            submission,
            &assignment,
            Some(actor.full_name()),
        ))
    }

    async fn view_submissions(
        &self,
        actor: &Actor,
        course_id: i32,
        assignment_id: i32,
    ) -> Result<SubmissionListDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "view submissions").await?;
        let assignment = self.course_assignment(&course, assignment_id).await?;

        let submissions = self
            .store
            .coursework_repo()
            .list_for_assignment(assignment.id)
            .await?
            .into_iter()
            .map(SubmissionDto::from)
            .collect();

        Ok(SubmissionListDto {
            course: CourseDto::from(course),
            assignment: Some(AssignmentDto::from(assignment)),
            submissions,
        })
    }

    async fn view_all_submissions(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<SubmissionListDto, CourseError> {
        let (course, student, _) = access::student_check(&self.store, actor, course_id).await?;

        let submissions = self
            .store
            .coursework_repo()
            .list_for_student_in_course(student.user_id, course_id)
            .await?
            .into_iter()
            .map(|(submission, assignment)| SubmissionDto::new(submission, &assignment, None))
            .collect();

        Ok(SubmissionListDto {
            course: CourseDto::from(course),
            assignment: None,
            submissions,
        })
    }
}
