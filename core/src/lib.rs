//! Claw-Core: asset management and stage assembly for OpenClaw
//!
//! Ties the format crates together:
//!
//! - [`AssetManager`] finds levels in `CLAW.REZ` or loose files and caches them
//! - [`TilesetDesc`] says which tile indices are solid, platforms, ladders or deadly
//! - [`Stage`] binds a level plane to a tileset so the collision layer can query it
//! - [`config`] loads engine settings from the platform config directory

pub mod assets;
pub mod config;
pub mod error;
pub mod stage;
pub mod tileset;

pub use assets::AssetManager;
pub use config::Config;
pub use error::AssetError;
pub use stage::Stage;
pub use tileset::TilesetDesc;
