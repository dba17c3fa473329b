//! Configuration Module
//!
//! Environment-driven configuration for the adapter service.

mod settings;

pub use settings::{
    AdapterConfig, AdapterMode, ConfigError, Credentials, KaikoSettings, PricingSettings,
    ServerSettings,
};
