pub mod attendance;
pub mod batches;
pub mod courses;
pub mod fees;
pub mod student_courses;
pub mod students;
pub mod users;
