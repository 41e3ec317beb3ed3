pub mod attendance_record;
pub mod course;
pub mod course_file;
pub mod file;
pub mod group;
pub mod group_course;
pub mod group_student;
pub mod session;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use course::Entity as Course;
pub use course_file::Entity as CourseFile;
pub use file::Entity as File;
pub use group::Entity as Group;
pub use group_course::Entity as GroupCourse;
pub use group_student::Entity as GroupStudent;
pub use session::Entity as Session;
pub use user::Entity as User;
