pub mod approval;
pub mod classifier;
pub mod grades;
pub mod registrar;

pub use approval::{ApprovalEngine, ApprovalPolicy, SeaOrmApprovalEngine};
pub use grades::GradeService;
pub use registrar::RegistrarService;
