//! Command implementations.

pub mod classify;
pub mod config;
pub mod dedupe;
pub mod init;
pub mod orphans;
pub mod prompt;

pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::dedupe::execute_dedupe;
pub use self::init::execute_init;
pub use self::orphans::execute_orphans;
pub use self::prompt::execute_prompt;
