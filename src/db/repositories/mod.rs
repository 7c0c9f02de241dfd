pub mod attendance;
pub mod course;
pub mod coursework;
pub mod enrollment;
pub mod grade;
pub mod user;
