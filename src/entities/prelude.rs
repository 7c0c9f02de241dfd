pub use super::announcements::Entity as Announcements;
pub use super::assignments::Entity as Assignments;
pub use super::attendance::Entity as Attendance;
pub use super::courses::Entity as Courses;
pub use super::enrollments::Entity as Enrollments;
pub use super::grades::Entity as Grades;
pub use super::instructors::Entity as Instructors;
pub use super::students::Entity as Students;
pub use super::submissions::Entity as Submissions;
pub use super::users::Entity as Users;
