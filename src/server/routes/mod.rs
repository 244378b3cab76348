pub mod health;
pub mod site_config;
