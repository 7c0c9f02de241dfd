//! Submission grading, final grades and attendance.

mod common;

use axum::http::StatusCode;
use common::{
    Client, TestApp, create_assignment, create_course, join, register, register_instructor,
    register_student, spawn_app, submit,
};
use coursemanager::entities::students;
use sea_orm::{ActiveModelTrait, Set};

struct Classroom {
    app: TestApp,
    instructor: Client,
    student: Client,
    student_id: i32,
    course_id: i32,
}

/// An instructor with one 4-credit, 10-week course and one enrolled student.
async fn classroom() -> Classroom {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "4").await;

    let mut student = app.client();
    let student_id = register_student(&mut student, "ada").await;
    let response = join(&mut student, course_id).await;
    assert_eq!(response.status, StatusCode::OK);

    Classroom {
        app,
        instructor,
        student,
        student_id,
        course_id,
    }
}

#[tokio::test]
async fn test_grade_submission_within_points() {
    let mut room = classroom().await;
    let assignment_id = create_assignment(&mut room.instructor, room.course_id, "Proofs").await;
    let submission_id = submit(&mut room.student, room.course_id, assignment_id).await;
    let uri = format!("/grade/submission/{submission_id}");

    let response = room.instructor.get(&uri).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["points"], 50);
    assert!(response.context()["score"].is_null());

    let response = room.instructor.post(&uri, &[("score", "51")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.template(), "classmanager/grade_submission.html");

    let response = room.instructor.post(&uri, &[("score", "45")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.success(), "Score updated successfully!");
    assert_eq!(response.context()["score"], 45);

    let response = room.student.post(&uri, &[("score", "50")]).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grade_missing_submission() {
    let mut room = classroom().await;

    let response = room.instructor.get("/grade/submission/404").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.failure(),
        "The Submission you are trying to grade does not exist"
    );
}

#[tokio::test]
async fn test_final_grade_awards_credits_once() {
    let mut room = classroom().await;
    let uri = format!("/grade/final/{}/{}", room.course_id, room.student_id);

    let response = room.instructor.post(&uri, &[("score", "101")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = room.instructor.post(&uri, &[("score", "88")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["outcome"]["created"]["credits_awarded"], 4);

    let response = room.instructor.post(&uri, &[("score", "93")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["outcome"], "updated");

    let response = room.student.get("/view/my_profile").await;
    assert_eq!(response.context()["role"]["credits"], 4);

    let response = room
        .instructor
        .get(&format!("/grade/final/{}", room.course_id))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["students"][0]["score"], 93);
}

#[tokio::test]
async fn test_starting_credits_are_bounded() {
    let app = spawn_app().await;
    let mut client = app.client();
    register(&mut client, "ada").await;
    let form = |credits| {
        [
            ("date_of_birth", "2001-09-12"),
            ("major", "Science"),
            ("standing", "SR"),
            ("credits", credits),
        ]
    };

    let response = client.post("/register/student", &form("2147483647")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.template(), "classmanager/register_student.html");
    assert_eq!(response.failure(), "Credits must be between 0 and 1000");

    let response = client.post("/register/student", &form("1000")).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.context()["role"]["credits"], 1000);
}

#[tokio::test]
async fn test_final_grade_rejects_credit_overflow() {
    let mut room = classroom().await;
    students::ActiveModel {
        user_id: Set(room.student_id),
        credits: Set(i32::MAX - 1),
        ..Default::default()
    }
    .update(&room.app.state.store.conn)
    .await
    .unwrap();

    let response = room
        .instructor
        .post(
            &format!("/grade/final/{}/{}", room.course_id, room.student_id),
            &[("score", "88")],
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.failure().contains("cannot receive more credits"));

    let response = room.student.get("/view/my_profile").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["role"]["credits"], i32::MAX - 1);

    let response = room
        .student
        .get(&format!("/view/final/{}", room.course_id))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.context()["grades"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_instructor_cannot_grade_or_take_attendance() {
    let mut room = classroom().await;
    let assignment_id = create_assignment(&mut room.instructor, room.course_id, "Proofs").await;
    let submission_id = submit(&mut room.student, room.course_id, assignment_id).await;
    let mut other = room.app.client();
    register_instructor(&mut other, "church").await;
    let student = room.student_id.to_string();

    let response = other
        .post(
            &format!("/create/assignment/{}", room.course_id),
            &[
                ("title", "Lambda"),
                ("points", "50"),
                ("due_date", "2030-01-15"),
                ("description", "Reduce it"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = other
        .post(
            &format!("/grade/submission/{submission_id}"),
            &[("score", "50")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = other
        .post(
            &format!("/grade/final/{}/{}", room.course_id, room.student_id),
            &[("score", "100")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = other
        .post(
            &format!("/create/attendance/{}", room.course_id),
            &[("week", "1"), (student.as_str(), "on")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Nothing the other instructor sent was recorded.
    let response = room
        .instructor
        .get(&format!("/grade/submission/{submission_id}"))
        .await;
    assert!(response.context()["score"].is_null());

    let response = room.student.get("/view/my_profile").await;
    assert_eq!(response.context()["role"]["credits"], 0);

    let response = room
        .student
        .get(&format!("/view/attendance/{}", room.course_id))
        .await;
    assert_eq!(response.context()["rows"][0]["weeks_attended"], serde_json::json!([]));
}

#[tokio::test]
async fn test_final_grade_requires_enrollment() {
    let mut room = classroom().await;
    let mut outsider = room.app.client();
    let outsider_id = register_student(&mut outsider, "grace").await;

    let response = room
        .instructor
        .post(
            &format!("/grade/final/{}/{}", room.course_id, outsider_id),
            &[("score", "70")],
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_students_see_only_their_final() {
    let mut room = classroom().await;
    let mut classmate = room.app.client();
    let classmate_id = register_student(&mut classmate, "grace").await;
    join(&mut classmate, room.course_id).await;

    for (id, score) in [(room.student_id, "80"), (classmate_id, "90")] {
        let response = room
            .instructor
            .post(
                &format!("/grade/final/{}/{}", room.course_id, id),
                &[("score", score)],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let uri = format!("/view/final/{}", room.course_id);

    let response = room.instructor.get(&uri).await;
    assert_eq!(response.context()["grades"].as_array().unwrap().len(), 2);

    let response = room.student.get(&uri).await;
    let grades = response.context()["grades"].as_array().unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0]["student_id"], room.student_id);
    assert_eq!(grades[0]["score"], 80);
}

#[tokio::test]
async fn test_attendance_is_idempotent() {
    let mut room = classroom().await;
    let uri = format!("/create/attendance/{}", room.course_id);
    let id = room.student_id.to_string();

    let response = room.instructor.get(&uri).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["weeks"].as_array().unwrap().len(), 10);
    assert_eq!(response.context()["students"][0]["user_id"], room.student_id);

    let response = room
        .instructor
        .post(&uri, &[("week", "3"), (id.as_str(), "on")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["newly_recorded"], 1);

    let response = room
        .instructor
        .post(&uri, &[("week", "3"), (id.as_str(), "on")])
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["marked"], 1);
    assert_eq!(response.context()["newly_recorded"], 0);

    let response = room
        .student
        .get(&format!("/view/attendance/{}", room.course_id))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let rows = response.context()["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["weeks_attended"], serde_json::json!([3]));
}

#[tokio::test]
async fn test_attendance_rejects_bad_input() {
    let mut room = classroom().await;
    let uri = format!("/create/attendance/{}", room.course_id);
    let id = room.student_id.to_string();

    let response = room
        .instructor
        .post(&uri, &[("week", "11"), (id.as_str(), "on")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = room
        .instructor
        .post(&uri, &[("week", "0"), (id.as_str(), "on")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = room
        .instructor
        .post(&uri, &[("week", "2"), ("9999", "on")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = room
        .student
        .post(&uri, &[("week", "2"), (id.as_str(), "on")])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_attendance_needs_students() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "4").await;

    let response = instructor
        .get(&format!("/create/attendance/{course_id}"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.failure(),
        "Sorry you cannot take an attendance for an empty class"
    );
}
