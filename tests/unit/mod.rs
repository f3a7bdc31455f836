pub mod config;
pub mod introspect;
