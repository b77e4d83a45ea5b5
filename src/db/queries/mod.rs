pub mod infraction;
pub mod restriction;
pub mod server_config;
