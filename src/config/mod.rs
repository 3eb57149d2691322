//! Configuration loaded from `.walletvault.toml`.

pub mod settings;

pub use settings::Settings;
