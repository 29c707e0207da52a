//! Translation corpus engine for Project Zomboid mods: source discovery,
//! charset-aware table parsing, edit tracking and in-place persistence.

pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{Error, Result};
