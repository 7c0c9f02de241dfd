use chrono::NaiveDate;
use std::ops::RangeInclusive;

use super::ApiError;
use super::types::{AssignmentRequest, CourseRequest, RegisterUserRequest, RoleRequest};
use crate::db::{NewAssignment, NewCourse, NewUser};
use crate::domain::{Department, NewInstructor, NewStudent, RoleKind, RoleRegistration, Standing};

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_USERNAME_LENGTH: usize = 150;
pub const COURSE_LENGTH_WEEKS: RangeInclusive<i32> = 1..=52;
pub const COURSE_CREDITS: RangeInclusive<i32> = 1..=20;
pub const ASSIGNMENT_POINTS: RangeInclusive<i32> = 1..=1000;
pub const DEFAULT_ASSIGNMENT_POINTS: i32 = 100;
pub const STARTING_CREDITS: RangeInclusive<i32> = 0..=1000;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub fn validate_id(kind: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::not_found(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            kind, id
        )));
    }
    Ok(id)
}

/// Trimmed value of a field that must not be blank.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}

fn max_length<'a>(field: &str, value: &'a str, max: usize) -> Result<&'a str, ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::validation(format!(
            "{} must be {} characters or less",
            field, max
        )));
    }
    Ok(value)
}

pub fn parse_int_in(field: &str, value: &str, range: RangeInclusive<i32>) -> Result<i32, ApiError> {
    let n = parse_int(field, value)?;
    if !range.contains(&n) {
        return Err(ApiError::validation(format!(
            "{} must be between {} and {}",
            field,
            range.start(),
            range.end()
        )));
    }
    Ok(n)
}

pub fn parse_int(field: &str, value: &str) -> Result<i32, ApiError> {
    required(field, value)?
        .parse()
        .map_err(|_| ApiError::validation(format!("{} must be a whole number", field)))
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    let value = required(field, value)?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ApiError::validation(format!("{} must be a valid date", field)))
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let username = required("Username", username)?;
    max_length("Username", username, MAX_USERNAME_LENGTH)?;

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers and @/./+/-/_ characters",
        ));
    }
    Ok(username)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = required("Email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ApiError::validation("Enter a valid email address")),
    }
}

pub fn validate_password_pair(
    password: &str,
    confirmation: &str,
    min_length: usize,
) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }
    if password != confirmation {
        return Err(ApiError::validation(
            "Passwords do not match, please correct it.",
        ));
    }
    if password.chars().count() < min_length {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }
    Ok(())
}

pub fn validate_registration(
    req: &RegisterUserRequest,
    min_password_length: usize,
) -> Result<NewUser, ApiError> {
    let username = validate_username(&req.username)?;
    let email = validate_email(&req.email)?;
    let first_name = max_length("First name", required("First name", &req.first_name)?, 150)?;
    let last_name = max_length("Last name", required("Last name", &req.last_name)?, 150)?;
    validate_password_pair(&req.password, &req.confirmation, min_password_length)?;

    Ok(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: req.password.clone(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    })
}

/// Role named in a `/register/{role}` path.
pub fn parse_role_path(role: &str) -> Result<RoleKind, ApiError> {
    match role.parse::<RoleKind>() {
        Ok(kind @ (RoleKind::Student | RoleKind::Instructor)) => Ok(kind),
        _ => Err(ApiError::not_found(format!(
            "Sorry, '{}' is not a role you can register for",
            role
        ))),
    }
}

fn validate_date_of_birth(value: &str, today: NaiveDate) -> Result<NaiveDate, ApiError> {
    let date = parse_date("Date of birth", value)?;
    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    if date >= today || date < earliest {
        return Err(ApiError::validation("Date of birth must be in the past"));
    }
    Ok(date)
}

pub fn validate_role_form(
    kind: RoleKind,
    req: &RoleRequest,
    today: NaiveDate,
) -> Result<RoleRegistration, ApiError> {
    let date_of_birth = validate_date_of_birth(&req.date_of_birth, today)?;

    match kind {
        RoleKind::Student => {
            let major = required("Major", &req.major)?
                .parse::<Department>()
                .map_err(|e| ApiError::validation(e.to_string()))?;
            let standing = required("Standing", &req.standing)?
                .parse::<Standing>()
                .map_err(|e| ApiError::validation(e.to_string()))?;
            let credits = if req.credits.trim().is_empty() {
                0
            } else {
                parse_int_in("Credits", &req.credits, STARTING_CREDITS)?
            };

            Ok(RoleRegistration::Student(NewStudent {
                date_of_birth,
                major,
                standing,
                credits,
            }))
        }
        RoleKind::Instructor => {
            let department = required("Department", &req.department)?
                .parse::<Department>()
                .map_err(|e| ApiError::validation(e.to_string()))?;

            Ok(RoleRegistration::Instructor(NewInstructor {
                date_of_birth,
                department,
            }))
        }
        RoleKind::Unassigned => Err(ApiError::not_found("Unknown role")),
    }
}

pub fn validate_course_form(req: &CourseRequest) -> Result<NewCourse, ApiError> {
    let name = max_length("Name", required("Name", &req.name)?, MAX_NAME_LENGTH)?;
    let department = required("Department", &req.department)?
        .parse::<Department>()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let description = max_length(
        "Description",
        req.description.trim(),
        MAX_DESCRIPTION_LENGTH,
    )?;
    let length_weeks = parse_int_in("Length", &req.length, COURSE_LENGTH_WEEKS)?;
    let credits = parse_int_in("Credits", &req.credits, COURSE_CREDITS)?;

    Ok(NewCourse {
        name: name.to_string(),
        department,
        description: description.to_string(),
        length_weeks,
        credits,
    })
}

pub fn validate_assignment_form(req: &AssignmentRequest) -> Result<NewAssignment, ApiError> {
    let title = max_length("Title", required("Title", &req.title)?, MAX_NAME_LENGTH)?;

    let file = req.file.trim();
    let file_url = if file.is_empty() {
        None
    } else if file.starts_with("http://") || file.starts_with("https://") {
        Some(file.to_string())
    } else {
        return Err(ApiError::validation("File must be an http(s) URL"));
    };

    let points = if req.points.trim().is_empty() {
        DEFAULT_ASSIGNMENT_POINTS
    } else {
        parse_int_in("Points", &req.points, ASSIGNMENT_POINTS)?
    };

    let due_date = parse_date("Due date", &req.due_date)?;
    let description = max_length(
        "Description",
        req.description.trim(),
        MAX_DESCRIPTION_LENGTH,
    )?;

    Ok(NewAssignment {
        title: title.to_string(),
        file_url,
        points,
        due_date,
        description: description.to_string(),
    })
}

/// Week plus the ids of the students ticked present.
///
/// Checkboxes arrive as `<student id>=on`; a `student` field may also be
/// repeated with the id as its value.
pub fn parse_attendance_form(fields: &[(String, String)]) -> Result<(i32, Vec<i32>), ApiError> {
    let week = fields
        .iter()
        .find(|(k, _)| k == "week")
        .map(|(_, v)| parse_int("Week", v))
        .transpose()?
        .ok_or_else(|| ApiError::validation("Week is required"))?;

    let mut students = Vec::new();
    for (key, value) in fields {
        let id = match (key.as_str(), value.as_str()) {
            ("week", _) => continue,
            ("student", id) => id,
            (id, "on") => id,
            _ => continue,
        };
        let id = id
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::validation(format!("Invalid student ID: {}", id)))?;
        students.push(id);
    }

    Ok((week, students))
}
