pub mod router;
pub mod rules;

pub use router::BatchValidationRouter;
pub use rules::{FileValidator, ValidationVerdict};
