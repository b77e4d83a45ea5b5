mod infraction;
mod restriction;
mod server_config;

pub use infraction::Infraction;
pub use restriction::Restriction;
pub use server_config::{ServerConfig, DEFAULT_COMMAND_PREFIX};
