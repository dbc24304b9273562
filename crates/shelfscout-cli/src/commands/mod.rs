//! Command implementations.

pub mod check;
pub mod config;
pub mod extract;
pub mod run;
pub mod search;

pub use self::check::execute_check;
pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::run::execute_run;
pub use self::search::execute_search;
