//! The document reader: drives parsed wiring documents into registry
//! mutations.

pub mod delegate;
pub mod events;
pub mod loader;
pub mod problems;

pub use delegate::{DocumentDefaults, ParserDelegate};
pub use events::{AliasRegistered, CollectingEventListener, ImportProcessed, ReaderEventListener};
pub use loader::{DefinitionLoader, ReaderHooks};
pub use problems::{Problem, ProblemCollector};
