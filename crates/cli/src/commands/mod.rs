//! CLI command implementations.

pub mod decompile;
pub mod info;
pub mod locate;
pub mod settings;
