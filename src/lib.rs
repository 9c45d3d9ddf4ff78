// src/lib.rs

//! ogre-kitchen
//!
//! Source recipe and build kitchen that packages the OGRE-Next 3D engine.
//!
//! # Architecture
//!
//! - Recipes are data: a TOML document parsed into typed sections
//! - Six hooks run once each, in a fixed order, against a working directory
//! - The host is described once by a capability value handed to every hook
//! - External tools (git, cmake, apt-get) are reached through a runner trait

mod error;
pub mod hash;
pub mod platform;
pub mod recipe;

pub use error::{Error, Result};
pub use platform::{Condition, HostPlatform, Os};
pub use recipe::{Cook, CookResult, Hook, Kitchen, KitchenConfig, Recipe};
