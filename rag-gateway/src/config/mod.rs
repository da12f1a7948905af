pub mod default_config;
pub mod gateway_config;
