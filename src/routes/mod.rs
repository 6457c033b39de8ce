pub mod absences;

pub mod classes;

pub mod dashboard;

pub mod students;

pub mod subjects;

pub mod teachers;

pub use absences::configure_absences_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use teachers::configure_teachers_routes;
