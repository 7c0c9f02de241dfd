//! Template names returned in page responses.

pub const INDEX: &str = "classmanager/index.html";
pub const LOGIN: &str = "classmanager/login.html";
pub const FORGOT_PASSWORD: &str = "classmanager/forgot_password.html";
pub const REGISTER: &str = "classmanager/register.html";
pub const REGISTER_USER: &str = "classmanager/register_user.html";
pub const CREATE_COURSE: &str = "classmanager/create_course.html";
pub const VIEW_COURSES: &str = "classmanager/view_courses.html";
pub const VIEW_COURSE: &str = "classmanager/view_course.html";
pub const JOIN_COURSE: &str = "classmanager/join_course.html";
pub const LEAVE_COURSE: &str = "classmanager/leave_course.html";
pub const JOINED_COURSES: &str = "classmanager/joined_courses.html";
pub const CREATED_COURSES: &str = "classmanager/created_courses.html";
pub const CREATE_ANNOUNCEMENT: &str = "classmanager/create_announcement.html";
pub const CREATE_ASSIGNMENT: &str = "classmanager/create_assignment.html";
pub const CREATE_SUBMISSION: &str = "classmanager/create_submission.html";
pub const CREATE_ATTENDANCE: &str = "classmanager/create_attendance.html";
pub const VIEW_ATTENDANCE: &str = "classmanager/view_attendance.html";
pub const VIEW_SUBMISSIONS: &str = "classmanager/view_submissions.html";
pub const VIEW_ALL_SUBMISSIONS: &str = "classmanager/view_all_submissions.html";
pub const GRADE_SUBMISSION: &str = "classmanager/grade_submission.html";
pub const GRADE_FINALS: &str = "classmanager/grade_finals.html";
pub const VIEW_FINALS: &str = "classmanager/view_finals.html";
pub const MY_PROFILE: &str = "classmanager/my_profile.html";
pub const CHANGE_NAME: &str = "classmanager/change_name.html";

/// Form page for a role, e.g. `classmanager/register_student.html`.
#[must_use]
pub fn register_role(role: &str) -> String {
    format!("classmanager/register_{role}.html")
}

/// List page for an activity, e.g. `classmanager/view_assignments.html`.
#[must_use]
pub fn view_activity(activity: &str) -> String {
    format!("classmanager/view_{activity}.html")
}
