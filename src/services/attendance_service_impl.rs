//! `SeaORM` implementation of the `AttendanceService` trait.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;

use crate::api::types::{
    AttendanceFormDto, AttendanceRecordedDto, AttendanceRowDto, AttendanceSheetDto, CourseDto,
    StudentDto,
};
use crate::db::Store;
use crate::domain::Actor;
use crate::entities::courses;
use crate::services::access::{self, Membership};
use crate::services::attendance_service::AttendanceService;
use crate::services::CourseError;

const EMPTY_CLASS: &str = "Sorry you cannot take an attendance for an empty class";

pub struct SeaOrmAttendanceService {
    store: Store,
}

impl SeaOrmAttendanceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn weeks(course: &courses::Model) -> Vec<i32> {
    (1..=course.length_weeks).collect()
}

#[async_trait]
impl AttendanceService for SeaOrmAttendanceService {
    async fn attendance_form(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<AttendanceFormDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "take attendance").await?;

        let students = self.store.enrollment_repo().list_students(course_id).await?;
        if students.is_empty() {
            return Err(CourseError::Validation(EMPTY_CLASS.to_string()));
        }

        Ok(AttendanceFormDto {
            weeks: weeks(&course),
            students: students.iter().map(StudentDto::from).collect(),
            course: CourseDto::from(course),
        })
    }

    async fn create_attendance(
        &self,
        actor: &Actor,
        course_id: i32,
        week: i32,
        student_ids: Vec<i32>,
    ) -> Result<AttendanceRecordedDto, CourseError> {
        let (course, _) =
            access::instructor_check(&self.store, actor, course_id, "take attendance").await?;

        let enrolled: BTreeSet<i32> = self
            .store
            .enrollment_repo()
            .list_students(course_id)
            .await?
            .iter()
            .map(|s| s.student.user_id)
            .collect();

        if enrolled.is_empty() {
            return Err(CourseError::Validation(EMPTY_CLASS.to_string()));
        }

        if !(1..=course.length_weeks).contains(&week) {
            return Err(CourseError::Validation(format!(
                "Week must be between 1 and {}",
                course.length_weeks
            )));
        }

        let marked: BTreeSet<i32> = student_ids.into_iter().collect();
        if let Some(&stranger) = marked.iter().find(|&&id| !enrolled.contains(&id)) {
            return Err(CourseError::StudentNotEnrolled(stranger));
        }

        let ids: Vec<i32> = marked.into_iter().collect();
        let newly_recorded = self
            .store
            .attendance_repo()
            .record(course_id, week, &ids)
            .await?;

        Ok(AttendanceRecordedDto {
            course_id,
            week,
            marked: ids.len(),
            newly_recorded,
        })
    }

    async fn view_attendance(
        &self,
        actor: &Actor,
        course_id: i32,
    ) -> Result<AttendanceSheetDto, CourseError> {
        let (course, membership) = access::member_check(&self.store, actor, course_id).await?;

        let mut students = self.store.enrollment_repo().list_students(course_id).await?;
        let records = match membership {
            Membership::Owner(_) => self.store.attendance_repo().list_for_course(course_id).await?,
            Membership::Enrolled(student) => {
                students.retain(|s| s.student.user_id == student.user_id);
                self.store
                    .attendance_repo()
                    .list_for_student(course_id, student.user_id)
                    .await?
            }
        };

        let mut attended: HashMap<i32, Vec<i32>> = HashMap::new();
        for record in records {
            attended.entry(record.student_id).or_default().push(record.week);
        }

        let rows = students
            .iter()
            .map(|s| AttendanceRowDto {
                student: StudentDto::from(s),
                weeks_attended: attended.remove(&s.student.user_id).unwrap_or_default(),
            })
            .collect();

        Ok(AttendanceSheetDto {
            weeks: weeks(&course),
            course: CourseDto::from(course),
            rows,
        })
    }
}
