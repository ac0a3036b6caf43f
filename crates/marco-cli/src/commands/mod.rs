//! Command implementations.

pub mod analyze;
pub mod prospectus;

pub use self::analyze::execute_analyze;
pub use self::prospectus::execute_prospectus;
