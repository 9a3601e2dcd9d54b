pub mod grades;

pub mod registrar;

pub use grades::configure_grade_routes;
pub use registrar::configure_registrar_routes;
