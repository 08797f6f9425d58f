//! Shared registry of definitions and aliases.

mod core;

pub use core::DefinitionRegistry;
