#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use coursemanager::{
    Config,
    api::{self, AppState},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub async fn spawn_app() -> TestApp {
    let state = api::create_app_state_from_config(Config::in_memory(), None)
        .await
        .expect("Failed to create app state");
    let router = api::router(state.clone());
    TestApp { router, state }
}

impl TestApp {
    /// A browser without a session.
    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub json: Value,
}

impl TestResponse {
    pub fn template(&self) -> &str {
        self.json["template"].as_str().unwrap_or_default()
    }

    pub fn failure(&self) -> &str {
        self.json["failure_message"].as_str().unwrap_or_default()
    }

    pub fn success(&self) -> &str {
        self.json["success_message"].as_str().unwrap_or_default()
    }

    pub fn context(&self) -> &Value {
        &self.json["context"]
    }
}

/// Sends requests through the router, carrying the session cookie along.
pub struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            json,
        }
    }
}

// ============================================================================
// Scenario helpers
// ============================================================================

/// Registers and logs in a fresh user, returning its id.
pub async fn register(client: &mut Client, username: &str) -> i32 {
    let email = format!("{username}@example.com");
    let response = client
        .post(
            "/register/user",
            &[
                ("username", username),
                ("email", &email),
                ("password", "secret"),
                ("confirmation", "secret"),
                ("first-name", "Test"),
                ("last-name", username),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    response.context()["id"].as_i64().unwrap() as i32
}

pub async fn register_instructor(client: &mut Client, username: &str) -> i32 {
    let id = register(client, username).await;
    let response = client
        .post(
            "/register/instructor",
            &[("date_of_birth", "1970-05-04"), ("department", "Math")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    id
}

pub async fn register_student(client: &mut Client, username: &str) -> i32 {
    let id = register(client, username).await;
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
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    id
}

pub async fn create_course(client: &mut Client, name: &str, length: &str, credits: &str) -> i32 {
    let response = client
        .post(
            "/create/course",
            &[
                ("name", name),
                ("department", "Math"),
                ("description", "An introduction"),
                ("length", length),
                ("credits", credits),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    response.context()["id"].as_i64().unwrap() as i32
}

pub async fn create_assignment(client: &mut Client, course_id: i32, title: &str) -> i32 {
    let response = client
        .post(
            &format!("/create/assignment/{course_id}"),
            &[
                ("title", title),
                ("points", "50"),
                ("due_date", "2030-01-15"),
                ("description", "Show your work"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    response.context()["id"].as_i64().unwrap() as i32
}

pub async fn submit(client: &mut Client, course_id: i32, assignment_id: i32) -> i32 {
    let response = client
        .post(
            &format!("/create/submission/{course_id}/{assignment_id}"),
            &[("text", "My answer")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.json);
    response.context()["id"].as_i64().unwrap() as i32
}

pub async fn join(client: &mut Client, course_id: i32) -> TestResponse {
    client
        .post(&format!("/join_course/{course_id}"), &[])
        .await
}
