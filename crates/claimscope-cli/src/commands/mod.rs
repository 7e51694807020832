//! Command implementations.

pub mod analyze;
pub mod claims;
pub mod config;
pub mod papers;
pub mod stats;
pub mod theory;

pub use self::analyze::execute_analyze;
pub use self::claims::execute_claims;
pub use self::config::execute_config;
pub use self::papers::execute_papers;
pub use self::stats::execute_stats;
pub use self::theory::execute_theory;
