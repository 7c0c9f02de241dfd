//! Course lifecycle and coursework tests.

mod common;

use axum::http::StatusCode;
use common::{
    create_assignment, create_course, join, register, register_instructor, register_student,
    spawn_app, submit,
};

#[tokio::test]
async fn test_course_is_listed_publicly() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;

    let response = instructor
        .post(
            "/create/course",
            &[
                ("name", "Computability"),
                ("department", "Math"),
                ("description", "Machines and limits"),
                ("length", "12"),
                ("credits", "4"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.template(), "classmanager/index.html");
    assert_eq!(response.success(), "Course Created Successfully");

    let response = app.client().get("/view_all_courses").await;
    assert_eq!(response.status, StatusCode::OK);
    let courses = response.context()["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["name"], "Computability");
    assert_eq!(courses[0]["instructor_name"], "Test turing");
}

#[tokio::test]
async fn test_only_instructors_create_courses() {
    let app = spawn_app().await;
    let mut student = app.client();
    register_student(&mut student, "ada").await;

    let response = student
        .post(
            "/create/course",
            &[
                ("name", "Poetry"),
                ("department", "English"),
                ("length", "10"),
                ("credits", "3"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.template(), "classmanager/index.html");
}

#[tokio::test]
async fn test_course_form_validates_ranges() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;

    let response = instructor
        .post(
            "/create/course",
            &[
                ("name", "Forever"),
                ("department", "Math"),
                ("length", "53"),
                ("credits", "4"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.template(), "classmanager/create_course.html");
}

#[tokio::test]
async fn test_join_twice_is_rejected() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let mut student = app.client();
    register_student(&mut student, "ada").await;

    let response = join(&mut student, course_id).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.success(), "You have successfully joined this course!");

    let response = join(&mut student, course_id).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.failure(), "Sorry, You cannot join the same course twice");

    let response = student.get("/view_joined_courses").await;
    assert_eq!(response.context()["courses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_instructor_cannot_join() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let response = join(&mut instructor, course_id).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_join_missing_course_is_not_found() {
    let app = spawn_app().await;
    let mut student = app.client();
    register_student(&mut student, "ada").await;

    let response = join(&mut student, 999).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.failure(), "The course you are searching for does not exist");
}

#[tokio::test]
async fn test_leave_removes_only_that_course() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let left = create_course(&mut instructor, "Logic", "10", "3").await;
    let kept = create_course(&mut instructor, "Algebra", "10", "3").await;
    let left_assignment = create_assignment(&mut instructor, left, "Proofs").await;
    let kept_assignment = create_assignment(&mut instructor, kept, "Groups").await;

    let mut student = app.client();
    let student_id = register_student(&mut student, "ada").await;
    join(&mut student, left).await;
    join(&mut student, kept).await;
    submit(&mut student, left, left_assignment).await;
    submit(&mut student, kept, kept_assignment).await;

    let id = student_id.to_string();
    for course_id in [left, kept] {
        let response = instructor
            .post(
                &format!("/create/attendance/{course_id}"),
                &[("week", "1"), (id.as_str(), "on")],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = student.post(&format!("/leave_course/{left}"), &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["submissions_removed"], 1);
    assert_eq!(response.context()["attendance_removed"], 1);

    let store = &app.state.store;
    assert!(!store.is_enrolled(student_id, left).await.unwrap());
    assert!(store.is_enrolled(student_id, kept).await.unwrap());

    let coursework = store.coursework_repo();
    assert!(
        coursework
            .list_for_student_in_course(student_id, left)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        coursework
            .list_for_student_in_course(student_id, kept)
            .await
            .unwrap()
            .len(),
        1
    );

    let attendance = store.attendance_repo();
    assert!(
        attendance
            .list_for_student(left, student_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        attendance
            .list_for_student(kept, student_id)
            .await
            .unwrap()
            .len(),
        1
    );

    let response = student.post(&format!("/leave_course/{left}"), &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deactivate_course() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let mut other = app.client();
    register_instructor(&mut other, "church").await;
    let response = other
        .post(&format!("/deactivate/course/{course_id}"), &[])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let uri = format!("/deactivate/course/{course_id}");
    let response = instructor.post(&uri, &[]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["is_active"], false);

    let response = instructor.post(&uri, &[]).await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let mut student = app.client();
    register_student(&mut student, "ada").await;
    let response = join(&mut student, course_id).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.failure(), "Sorry, this course is no longer active");

    let response = app.client().get("/view_all_courses").await;
    assert!(response.context()["courses"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_view_course_requires_membership() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;
    let uri = format!("/view_course/{course_id}");

    let response = instructor.get(&uri).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["is_owner"], true);

    let mut other = app.client();
    register_instructor(&mut other, "church").await;
    let response = other.get(&uri).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let mut student = app.client();
    register_student(&mut student, "ada").await;
    let response = student.get(&uri).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    join(&mut student, course_id).await;
    let response = student.get(&uri).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["is_owner"], false);
    assert_eq!(response.context()["students_enrolled"], 1);

    let mut nobody = app.client();
    register(&mut nobody, "plain").await;
    let response = nobody.get(&uri).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_owner_cannot_post_announcement() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let mut other = app.client();
    register_instructor(&mut other, "church").await;
    let response = other
        .post(
            &format!("/create/announcement/{course_id}"),
            &[("text", "Class is cancelled")],
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.template(), "classmanager/index.html");
    assert_eq!(
        response.failure(),
        "Sorry, you don't have the permission to create an announcement in this course."
    );
}

#[tokio::test]
async fn test_announcements_are_listed_for_members() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let response = instructor
        .post(&format!("/create/announcement/{course_id}"), &[("text", "  ")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = instructor
        .post(
            &format!("/create/announcement/{course_id}"),
            &[("text", "Welcome to Logic")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let mut student = app.client();
    register_student(&mut student, "ada").await;
    join(&mut student, course_id).await;

    let response = student
        .get(&format!("/view/all/announcements/{course_id}"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.template(), "classmanager/view_announcements.html");
    assert_eq!(response.context()["activity"], "announcements");
    assert_eq!(response.context()["items"][0]["text"], "Welcome to Logic");
}

#[tokio::test]
async fn test_unknown_activity_is_not_found() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;

    let response = instructor.get(&format!("/view/all/quizzes/{course_id}")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.failure(),
        "Sorry, the activity you tried to access does not exist"
    );
}

#[tokio::test]
async fn test_submission_must_match_course() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let first = create_course(&mut instructor, "Logic", "10", "3").await;
    let second = create_course(&mut instructor, "Algebra", "10", "3").await;
    let assignment_id = create_assignment(&mut instructor, second, "Groups").await;

    let mut student = app.client();
    register_student(&mut student, "ada").await;
    join(&mut student, first).await;

    let response = student
        .post(
            &format!("/create/submission/{first}/{assignment_id}"),
            &[("text", "My answer")],
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = student
        .post(
            &format!("/create/submission/{second}/{assignment_id}"),
            &[("text", "My answer")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_instructor_sees_submissions() {
    let app = spawn_app().await;
    let mut instructor = app.client();
    register_instructor(&mut instructor, "turing").await;
    let course_id = create_course(&mut instructor, "Logic", "10", "3").await;
    let assignment_id = create_assignment(&mut instructor, course_id, "Proofs").await;

    let mut student = app.client();
    register_student(&mut student, "ada").await;
    join(&mut student, course_id).await;
    submit(&mut student, course_id, assignment_id).await;
    submit(&mut student, course_id, assignment_id).await;

    let response = instructor
        .get(&format!("/view/submissions/{course_id}/{assignment_id}"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let submissions = response.context()["submissions"].as_array().unwrap();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0]["student_name"], "Test ada");

    let response = student
        .get(&format!("/view/submissions/{course_id}"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["submissions"].as_array().unwrap().len(), 2);

    let response = instructor
        .get(&format!("/view/submissions/{course_id}"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = student
        .get(&format!("/view/submissions/{course_id}/{assignment_id}"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
