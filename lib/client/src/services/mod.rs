//! Entity façades: each fixes a model, a default projection, and a domain,
//! and owns whatever encoding its entity needs on top of the raw records.

mod academic_year;
mod course;
mod enrollment;
pub mod fixtures;
mod partner;
mod student;

pub use academic_year::AcademicYearService;
pub use course::CourseService;
pub use enrollment::EnrollmentService;
pub use partner::PartnerService;
pub use student::StudentService;
