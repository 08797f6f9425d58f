//! wirecfg - Declarative wiring-configuration loader.
//!
//! This crate reads XML wiring documents (definitions, imports, aliases,
//! nested scopes with inheritable defaults) and compiles them into an
//! in-memory definition registry. Recoverable faults are accumulated as
//! problems instead of aborting a pass, so one bad element never hides the
//! rest of a document.
//!
//! # Example
//!
//! ```
//! use wirecfg::{DefinitionLoader, Environment, FsResourceLoader};
//!
//! let mut loader = DefinitionLoader::new(FsResourceLoader::new("."))
//!     .with_environment(Environment::new().with_active_profile("prod"));
//!
//! loader
//!     .load_str(
//!         r#"<definitions>
//!             <definition id="service" class="app.Service"/>
//!             <alias name="service" alias="svc"/>
//!         </definitions>"#,
//!         "inline.xml",
//!     )
//!     .unwrap();
//!
//! assert_eq!(loader.registry().resolve("svc"), "service");
//! ```
//!
//! # Architecture
//!
//! The loader is organized into several modules:
//!
//! - [`config`]: Grammar constants and tokenizing helpers
//! - [`types`]: Core data types (Definition, DefinitionHolder, Value, etc.)
//! - [`error`]: Error types and Result alias
//! - [`env`]: Active profiles and placeholder resolution
//! - [`resource`]: Resource loading and wildcard expansion
//! - [`xml`]: XML navigation utilities
//! - [`registry`]: The shared definition and alias registry
//! - [`namespace`]: Custom-namespace handler extension point
//! - [`reader`]: The document reader, parser delegate, events and problems
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod namespace;
pub mod reader;
pub mod registry;
pub mod resource;
pub mod types;
pub mod xml;

// Re-export the main entry points
pub use reader::{DefinitionLoader, ReaderEventListener, ReaderHooks};
pub use registry::DefinitionRegistry;

// Re-export commonly used items
pub use env::Environment;
pub use error::{LoaderError, Result};
pub use namespace::{NamespaceContext, NamespaceHandler};
pub use resource::{FsResourceLoader, ResourceLoader};
pub use types::{Definition, DefinitionHolder, Value};
