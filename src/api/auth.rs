use axum::{
    Form,
    extract::{FromRequestParts, Path, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::error::{OnPage, Rejection};
use super::types::{
    Blank, ChangeNameRequest, ChoiceDto, ForgotPasswordRequest, LoginRequest, Page, ProfileDto,
    RegisterUserRequest, RoleRequest, UserDto,
};
use super::{ApiError, AppState, templates, validation};
use crate::domain::{Actor, Department, RoleKind, Standing};
use crate::services::AuthError;

/// Session key holding the logged in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

pub const LOGIN_PATH: &str = "/accounts/login";

// ============================================================================
// Session
// ============================================================================

async fn session_user_id(session: &Session) -> Option<i32> {
    session.get::<i32>(SESSION_USER_KEY).await.ok().flatten()
}

async fn start_session(session: &Session, user_id: i32) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;
    session
        .insert(SESSION_USER_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

fn login_redirect(parts_path: &str) -> Response {
    Redirect::to(&format!("{LOGIN_PATH}?next={parts_path}")).into_response()
}

/// Redirects visitors without a session to the login page.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    if let Some(user_id) = session_user_id(&session).await {
        tracing::Span::current().record("user_id", user_id);
        return next.run(request).await;
    }

    login_redirect(request.uri().path())
}

/// The logged in user with their role, loaded fresh for each request.
pub struct CurrentActor(pub Actor);

impl FromRequestParts<Arc<AppState>> for CurrentActor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match MaybeActor::from_request_parts(parts, state).await? {
            MaybeActor(Some(actor)) => Ok(Self(actor)),
            MaybeActor(None) => Err(login_redirect(parts.uri.path())),
        }
    }
}

/// The logged in user, if any.
pub struct MaybeActor(pub Option<Actor>);

impl FromRequestParts<Arc<AppState>> for MaybeActor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let Some(user_id) = session_user_id(&session).await else {
            return Ok(Self(None));
        };

        let actor = state
            .auth_service
            .load_actor(user_id)
            .await
            .map_err(|e| ApiError::from(e).into_response())?;

        if actor.is_none() {
            // The account behind this session no longer exists.
            if let Err(e) = session.flush().await {
                tracing::warn!(user_id, "Failed to clear stale session: {}", e);
            }
        }

        Ok(Self(actor))
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Serialize)]
pub struct IndexContext {
    pub user: Option<ProfileDto>,
}

/// GET /
pub async fn index(MaybeActor(actor): MaybeActor) -> Page<IndexContext> {
    Page::new(templates::INDEX).with_context(IndexContext {
        user: actor.map(ProfileDto::from),
    })
}

/// GET /accounts/login
pub async fn login_form() -> Blank {
    Page::new(templates::LOGIN)
}

/// POST /accounts/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(payload): Form<LoginRequest>,
) -> Result<Page<UserDto>, Rejection> {
    let user = state
        .auth_service
        .login(payload.username.trim(), &payload.password)
        .await
        .on_page(templates::LOGIN)?;

    start_session(&session, user.id)
        .await
        .on_page(templates::LOGIN)?;

    tracing::info!("User {} logged in", user.id);
    Ok(Page::new(templates::INDEX).with_context(UserDto::from(user)))
}

/// GET /logout
pub async fn logout(session: Session) -> Result<Redirect, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to clear session: {e}")))?;

    Ok(Redirect::to("/"))
}

/// GET /forgot_password
pub async fn forgot_password_form() -> Blank {
    Page::new(templates::FORGOT_PASSWORD)
}

/// POST /forgot_password
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<ForgotPasswordRequest>,
) -> Result<Blank, Rejection> {
    let page = templates::FORGOT_PASSWORD;
    let username = validation::required("Username", &payload.username).on_page(page)?;
    let email = validation::required("Email", &payload.email).on_page(page)?;
    validation::validate_password_pair(
        &payload.password,
        &payload.confirmation,
        state.config.security.min_password_length,
    )
    .on_page(page)?;

    state
        .auth_service
        .forgot_password(username, email, &payload.password)
        .await
        .on_page(page)?;

    Ok(Page::new(templates::LOGIN).success("Password changed, you can now log in"))
}

/// GET /register
pub async fn register() -> Blank {
    Page::new(templates::REGISTER)
}

/// GET /register/user
pub async fn register_user_form() -> Blank {
    Page::new(templates::REGISTER_USER)
}

/// POST /register/user
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    session: Session,
    Form(payload): Form<RegisterUserRequest>,
) -> Result<Page<UserDto>, Rejection> {
    let page = templates::REGISTER_USER;

    if actor.is_some() {
        return Err(Rejection::new(page, AuthError::AlreadyAuthenticated));
    }

    let new_user =
        validation::validate_registration(&payload, state.config.security.min_password_length)
            .on_page(page)?;

    let user = state
        .auth_service
        .register_user(new_user)
        .await
        .on_page(page)?;

    start_session(&session, user.id).await.on_page(page)?;

    Ok(Page::new(page)
        .success("User created, now fill out either a Student or Instructor form")
        .with_context(UserDto::from(user)))
}

#[derive(Debug, Serialize)]
pub struct RoleFormContext {
    pub role: RoleKind,
    pub majors: Vec<ChoiceDto>,
    pub standings: Vec<ChoiceDto>,
    pub departments: Vec<ChoiceDto>,
}

impl RoleFormContext {
    fn new(role: RoleKind) -> Self {
        let departments = || {
            Department::ALL
                .iter()
                .map(|d| ChoiceDto {
                    value: d.as_str(),
                    label: d.label(),
                })
                .collect::<Vec<_>>()
        };

        match role {
            RoleKind::Student => Self {
                role,
                majors: departments(),
                standings: Standing::ALL
                    .iter()
                    .map(|s| ChoiceDto {
                        value: s.as_str(),
                        label: s.label(),
                    })
                    .collect(),
                departments: Vec::new(),
            },
            _ => Self {
                role,
                majors: Vec::new(),
                standings: Vec::new(),
                departments: departments(),
            },
        }
    }
}

/// GET /register/{role}
pub async fn register_role_form(Path(role): Path<String>) -> Result<Page<RoleFormContext>, Rejection> {
    let kind = validation::parse_role_path(&role).on_page(templates::INDEX)?;
    Ok(Page::new(templates::register_role(kind.as_str())).with_context(RoleFormContext::new(kind)))
}

/// POST /register/{role}
pub async fn register_role(
    State(state): State<Arc<AppState>>,
    MaybeActor(actor): MaybeActor,
    Path(role): Path<String>,
    Form(payload): Form<RoleRequest>,
) -> Result<Page<ProfileDto>, Rejection> {
    let kind = validation::parse_role_path(&role).on_page(templates::INDEX)?;
    let page = templates::register_role(kind.as_str());

    let Some(actor) = actor else {
        return Err(Rejection::new(
            page,
            AuthError::NotAuthenticated(format!(
                "Sorry, you need a User account to be able to register for your {kind} account"
            )),
        ));
    };

    if actor.role.is_assigned() {
        return Err(Rejection::new(page, AuthError::RoleAlreadyAssigned));
    }

    let today = chrono::Utc::now().date_naive();
    let registration = validation::validate_role_form(kind, &payload, today).on_page(&page)?;

    let actor = state
        .auth_service
        .register_role(&actor, registration)
        .await
        .on_page(&page)?;

    Ok(Page::new(page)
        .success(format!(
            "Great, you just made your {kind} account, now you can participate in classes and submit assignments!"
        ))
        .with_context(ProfileDto::from(actor)))
}

/// GET /view/my_profile
pub async fn view_my_profile(CurrentActor(actor): CurrentActor) -> Page<ProfileDto> {
    Page::new(templates::MY_PROFILE).with_context(ProfileDto::from(actor))
}

/// GET /change/name
pub async fn change_name_form(CurrentActor(actor): CurrentActor) -> Page<ProfileDto> {
    Page::new(templates::CHANGE_NAME).with_context(ProfileDto::from(actor))
}

/// POST /change/name
pub async fn change_name(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Form(payload): Form<ChangeNameRequest>,
) -> Result<Page<UserDto>, Rejection> {
    let page = templates::CHANGE_NAME;
    let first_name = validation::required("First name", &payload.first_name).on_page(page)?;
    let last_name = validation::required("Last name", &payload.last_name).on_page(page)?;

    let user = state
        .auth_service
        .change_name(actor.user_id, first_name, last_name)
        .await
        .on_page(page)?;

    Ok(Page::new(page)
        .success("Your name has been updated")
        .with_context(UserDto::from(user)))
}
