//! Domain types for course management with strong typing.
//!
//! Roles are modelled as a sum type: a user is either unassigned, or carries
//! exactly one of the Student or Instructor records. The storage layer keeps
//! a `role` column in sync with the one-to-one role tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a choice field does not match any known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {field}")]
pub struct InvalidChoice {
    pub field: &'static str,
    pub value: String,
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $code:literal, $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored/submitted code for this choice.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Human readable label.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($code => Ok(Self::$variant),)+
                    other => Err(InvalidChoice {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Academic department; also used as a student's major.
    Department, "department" {
        Math => "Math", "Math",
        English => "English", "English",
        Science => "Science", "Science",
        Technology => "Technology", "Technology",
        Law => "Law", "Law",
        Art => "Art", "Art",
        Business => "Business", "Business",
        Health => "Health", "Health",
    }
}

choice_enum! {
    /// Class standing of a student.
    Standing, "standing" {
        Freshman => "FR", "Freshman",
        Sophomore => "SM", "Sophomore",
        Junior => "JR", "Junior",
        Senior => "SR", "Senior",
        Graduate => "GR", "Graduate",
    }
}

/// Majors share the department list.
pub type Major = Department;

/// Storage discriminant of a user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    #[default]
    Unassigned,
    Student,
    Instructor,
}

impl RoleKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Student => "student",
            Self::Instructor => "instructor",
        }
    }
}

impl FromStr for RoleKind {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unassigned" => Ok(Self::Unassigned),
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            other => Err(InvalidChoice {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific attributes of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentProfile {
    pub user_id: i32,
    pub date_of_birth: NaiveDate,
    pub major: Major,
    pub standing: Standing,
    pub credits: i32,
}

/// Role-specific attributes of an instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorProfile {
    pub user_id: i32,
    pub date_of_birth: NaiveDate,
    pub department: Department,
}

/// A user's role, carrying the role record directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Role {
    #[default]
    Unassigned,
    Student(StudentProfile),
    Instructor(InstructorProfile),
}

impl Role {
    #[must_use]
    pub const fn kind(&self) -> RoleKind {
        match self {
            Self::Unassigned => RoleKind::Unassigned,
            Self::Student(_) => RoleKind::Student,
            Self::Instructor(_) => RoleKind::Instructor,
        }
    }

    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        !matches!(self, Self::Unassigned)
    }

    #[must_use]
    pub const fn as_student(&self) -> Option<&StudentProfile> {
        match self {
            Self::Student(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_instructor(&self) -> Option<&InstructorProfile> {
        match self {
            Self::Instructor(i) => Some(i),
            _ => None,
        }
    }
}

/// The authenticated user making the current request.
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated input for the student role form.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub date_of_birth: NaiveDate,
    pub major: Major,
    pub standing: Standing,
    pub credits: i32,
}

/// Validated input for the instructor role form.
#[derive(Debug, Clone)]
pub struct NewInstructor {
    pub date_of_birth: NaiveDate,
    pub department: Department,
}

/// A validated role registration.
#[derive(Debug, Clone)]
pub enum RoleRegistration {
    Student(NewStudent),
    Instructor(NewInstructor),
}

impl RoleRegistration {
    #[must_use]
    pub const fn kind(&self) -> RoleKind {
        match self {
            Self::Student(_) => RoleKind::Student,
            Self::Instructor(_) => RoleKind::Instructor,
        }
    }
}

/// Whether a final grade call created the grade (and credited the student)
/// or only replaced the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalGradeOutcome {
    Created { credits_awarded: i32 },
    Updated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_parses_codes() {
        assert_eq!("FR".parse::<Standing>().unwrap(), Standing::Freshman);
        assert_eq!("GR".parse::<Standing>().unwrap().label(), "Graduate");
        assert!("Freshman".parse::<Standing>().is_err());
    }

    #[test]
    fn department_rejects_unknown() {
        assert_eq!("Law".parse::<Department>().unwrap(), Department::Law);
        let err = "Other".parse::<Department>().unwrap_err();
        assert_eq!(err.field, "department");
        assert_eq!(Department::ALL.len(), 8);
    }

    #[test]
    fn role_kind_is_case_insensitive() {
        assert_eq!("Student".parse::<RoleKind>().unwrap(), RoleKind::Student);
        assert_eq!("INSTRUCTOR".parse::<RoleKind>().unwrap(), RoleKind::Instructor);
        assert!("admin".parse::<RoleKind>().is_err());
    }

    #[test]
    fn role_accessors() {
        let student = Role::Student(StudentProfile {
            user_id: 1,
            date_of_birth: NaiveDate::from_ymd_opt(2001, 8, 7).unwrap(),
            major: Department::Science,
            standing: Standing::Freshman,
            credits: 2,
        });
        assert!(student.is_assigned());
        assert_eq!(student.kind(), RoleKind::Student);
        assert!(student.as_student().is_some());
        assert!(student.as_instructor().is_none());
        assert!(!Role::Unassigned.is_assigned());
    }
}
