//! Account, session and routing tests.

mod common;

use axum::http::StatusCode;
use common::{register, register_student, spawn_app};

#[tokio::test]
async fn test_index_is_public() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.template(), "classmanager/index.html");
    assert!(response.context()["user"].is_null());
}

#[tokio::test]
async fn test_protected_route_redirects_to_login() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client.get("/view_joined_courses").await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location.as_deref(),
        Some("/accounts/login?next=/view_joined_courses")
    );
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = spawn_app().await;
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}

#[tokio::test]
async fn test_metrics_disabled_returns_not_found() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client.get("/metrics").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_logs_user_in() {
    let app = spawn_app().await;
    let mut client = app.client();

    let user_id = register(&mut client, "ada").await;

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.context()["id"], user_id);
    assert_eq!(response.context()["username"], "ada");
    assert_eq!(response.context()["role"]["kind"], "unassigned");
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client
        .post(
            "/register/user",
            &[
                ("username", "ada"),
                ("email", "ada@example.com"),
                ("password", "secret"),
                ("confirmation", "secrets"),
                ("first-name", "Ada"),
                ("last-name", "Lovelace"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.template(), "classmanager/register_user.html");
    assert_eq!(response.failure(), "Passwords do not match, please correct it.");
}

#[tokio::test]
async fn test_register_rejects_taken_username() {
    let app = spawn_app().await;
    register(&mut app.client(), "ada").await;

    let mut other = app.client();
    let response = other
        .post(
            "/register/user",
            &[
                ("username", "ada"),
                ("email", "other@example.com"),
                ("password", "secret"),
                ("confirmation", "secret"),
                ("first-name", "Other"),
                ("last-name", "Person"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.template(), "classmanager/register_user.html");
}

#[tokio::test]
async fn test_register_while_logged_in_is_rejected() {
    let app = spawn_app().await;
    let mut client = app.client();
    register(&mut client, "ada").await;

    let response = client
        .post(
            "/register/user",
            &[
                ("username", "grace"),
                ("email", "grace@example.com"),
                ("password", "secret"),
                ("confirmation", "secret"),
                ("first-name", "Grace"),
                ("last-name", "Hopper"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let app = spawn_app().await;
    register(&mut app.client(), "ada").await;

    let mut client = app.client();
    let response = client
        .post(
            "/accounts/login",
            &[("username", "ada"), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.template(), "classmanager/login.html");
    assert_eq!(response.failure(), "Invalid username and/or password.");

    let response = client
        .post(
            "/accounts/login",
            &[("username", "ada"), ("password", "secret")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.template(), "classmanager/index.html");

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = client.get("/logout").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_forgot_password_resets_password() {
    let app = spawn_app().await;
    register(&mut app.client(), "ada").await;

    let mut client = app.client();
    let response = client
        .post(
            "/forgot_password",
            &[
                ("username", "ada"),
                ("email", "nobody@example.com"),
                ("password", "newpass"),
                ("confirmation", "newpass"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = client
        .post(
            "/forgot_password",
            &[
                ("username", "ada"),
                ("email", "ada@example.com"),
                ("password", "newpass"),
                ("confirmation", "newpass"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = client
        .post(
            "/accounts/login",
            &[("username", "ada"), ("password", "newpass")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_is_assigned_once() {
    let app = spawn_app().await;
    let mut client = app.client();
    register_student(&mut client, "ada").await;

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.context()["role"]["kind"], "student");
    assert_eq!(response.context()["role"]["standing"], "FR");
    assert_eq!(response.context()["role"]["credits"], 0);

    let response = client
        .post(
            "/register/instructor",
            &[("date_of_birth", "1970-05-04"), ("department", "Math")],
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.failure(),
        "Sorry, you cannot create another Student/Instructor account"
    );

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.context()["role"]["kind"], "student");
}

#[tokio::test]
async fn test_register_role_requires_user_account() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client
        .post(
            "/register/student",
            &[
                ("date_of_birth", "2001-09-12"),
                ("major", "Science"),
                ("standing", "FR"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.failure().starts_with("Sorry, you need a User account"));
}

#[tokio::test]
async fn test_unknown_role_is_not_found() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client.get("/register/admin").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.template(), "classmanager/index.html");

    let response = client.get("/register/Instructor").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.template(), "classmanager/register_instructor.html");
}

#[tokio::test]
async fn test_role_form_rejects_future_birth_date() {
    let app = spawn_app().await;
    let mut client = app.client();
    register(&mut client, "ada").await;

    let response = client
        .post(
            "/register/instructor",
            &[("date_of_birth", "2999-01-01"), ("department", "Math")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.failure(), "Date of birth must be in the past");
}

#[tokio::test]
async fn test_change_name() {
    let app = spawn_app().await;
    let mut client = app.client();
    register(&mut client, "ada").await;

    let response = client
        .post(
            "/change/name",
            &[("first-name", "Augusta"), ("last-name", "King")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = client.get("/view/my_profile").await;
    assert_eq!(response.context()["first_name"], "Augusta");
    assert_eq!(response.context()["last_name"], "King");
}

#[tokio::test]
async fn test_malformed_ids_render_not_found() {
    let app = spawn_app().await;
    let mut client = app.client();
    register_student(&mut client, "ada").await;

    for uri in ["/view_course/abc", "/view/final/1.5", "/view/attendance/99999999999"] {
        let response = client.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.template(), "classmanager/index.html", "{uri}");
        assert_eq!(
            response.failure(),
            "The page you are looking for does not exist"
        );
    }

    let response = client.post("/grade/final/1/someone", &[("score", "90")]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.template(), "classmanager/index.html");
}
