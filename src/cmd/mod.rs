//! Command bodies for the cardsmith CLI.

mod health;
mod init;
mod serve;

pub use health::cmd_health;
pub use init::cmd_init;
pub use serve::cmd_serve;
