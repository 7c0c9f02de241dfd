use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AttendanceService, AuthService, CourseService, CourseworkService, GradingService,
    SeaOrmAttendanceService, SeaOrmAuthService, SeaOrmCourseService, SeaOrmCourseworkService,
    SeaOrmGradingService,
};

mod attendance;
pub mod auth;
mod courses;
mod coursework;
mod error;
mod grading;
mod observability;
mod params;
pub mod templates;
pub mod types;
pub mod validation;

pub use error::{ApiError, OnPage, Rejection};
pub use types::Page;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub course_service: Arc<dyn CourseService>,

    pub coursework_service: Arc<dyn CourseworkService>,

    pub grading_service: Arc<dyn GradingService>,

    pub attendance_service: Arc<dyn AttendanceService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, store: Store, prometheus_handle: Option<PrometheusHandle>) -> Self {
        Self {
            auth_service: Arc::new(SeaOrmAuthService::new(
                store.clone(),
                config.security.clone(),
            )),
            course_service: Arc::new(SeaOrmCourseService::new(store.clone())),
            coursework_service: Arc::new(SeaOrmCourseworkService::new(store.clone())),
            grading_service: Arc::new(SeaOrmGradingService::new(store.clone())),
            attendance_service: Arc::new(SeaOrmAttendanceService::new(store.clone())),
            config,
            store,
            prometheus_handle,
        }
    }
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState::new(config, store, prometheus_handle)))
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let protected_routes = create_protected_router();

    Router::new()
        .merge(protected_routes)
        .route("/", get(auth::index))
        .route("/accounts/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route(
            "/forgot_password",
            get(auth::forgot_password_form).post(auth::forgot_password),
        )
        .route("/register", get(auth::register))
        .route(
            "/register/user",
            get(auth::register_user_form).post(auth::register_user),
        )
        .route(
            "/register/{role}",
            get(auth::register_role_form).post(auth::register_role),
        )
        .route("/view_all_courses", get(courses::view_all_courses))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(observability::track_requests))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers))
        .with_state(state)
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/create/course",
            get(courses::create_course_form).post(courses::create_course),
        )
        .route("/view_course/{course_id}", get(courses::view_course))
        .route(
            "/join_course/{course_id}",
            get(courses::join_course_form).post(courses::join_course),
        )
        .route("/leave_course/{course_id}", post(courses::leave_course))
        .route("/view_joined_courses", get(courses::view_joined_courses))
        .route("/view_created_courses", get(courses::view_created_courses))
        .route(
            "/deactivate/course/{course_id}",
            post(courses::deactivate_course),
        )
        .route(
            "/create/announcement/{course_id}",
            get(coursework::create_announcement_form).post(coursework::create_announcement),
        )
        .route(
            "/create/assignment/{course_id}",
            get(coursework::create_assignment_form).post(coursework::create_assignment),
        )
        .route(
            "/create/submission/{course_id}/{assignment_id}",
            get(coursework::create_submission_form).post(coursework::create_submission),
        )
        .route(
            "/view/all/{activity}/{course_id}",
            get(coursework::view_all),
        )
        .route(
            "/view/submissions/{course_id}/{assignment_id}",
            get(coursework::view_submissions),
        )
        .route(
            "/view/submissions/{course_id}",
            get(coursework::view_all_submissions),
        )
        .route(
            "/create/attendance/{course_id}",
            get(attendance::create_attendance_form).post(attendance::create_attendance),
        )
        .route(
            "/view/attendance/{course_id}",
            get(attendance::view_attendance),
        )
        .route(
            "/grade/submission/{submission_id}",
            get(grading::grade_submission_form).post(grading::grade_submission),
        )
        .route("/grade/final/{course_id}", get(grading::grade_finals))
        .route(
            "/grade/final/{course_id}/{user_id}",
            post(grading::grade_final),
        )
        .route("/view/final/{course_id}", get(grading::view_finals))
        .route("/view/my_profile", get(auth::view_my_profile))
        .route(
            "/change/name",
            get(auth::change_name_form).post(auth::change_name),
        )
        .route_layer(middleware::from_fn(auth::require_login))
}
