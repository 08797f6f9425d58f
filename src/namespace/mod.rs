//! Custom-namespace extension point.
//!
//! Elements and attributes outside the default grammar are dispatched to
//! pluggable handlers keyed by namespace URI.

mod handler;
mod resolver;

pub use handler::{DecorationSource, NamespaceContext, NamespaceHandler};
pub use resolver::NamespaceHandlerResolver;
