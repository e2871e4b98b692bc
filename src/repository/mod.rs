//! Database repository layer

pub mod enrollment_repo;
pub mod roster_repo;
pub mod subject_repo;
pub mod user_repo;

pub use enrollment_repo::*;
pub use roster_repo::*;
pub use subject_repo::*;
pub use user_repo::*;
