pub mod prelude;

pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod instructors;
pub mod students;
pub mod submissions;
pub mod users;
