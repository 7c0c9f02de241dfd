pub mod access;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod course_service;
pub mod course_service_impl;
pub use course_service::{CourseError, CourseService};
pub use course_service_impl::SeaOrmCourseService;

pub mod coursework_service;
pub mod coursework_service_impl;
pub use coursework_service::{Activity, CourseworkService};
pub use coursework_service_impl::SeaOrmCourseworkService;

pub mod grading_service;
pub mod grading_service_impl;
pub use grading_service::GradingService;
pub use grading_service_impl::SeaOrmGradingService;

pub mod attendance_service;
pub mod attendance_service_impl;
pub use attendance_service::AttendanceService;
pub use attendance_service_impl::SeaOrmAttendanceService;

/// How a failed operation is reported back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    PermissionDenied,
    Validation,
    Duplicate,
    Unauthenticated,
    Internal,
}
