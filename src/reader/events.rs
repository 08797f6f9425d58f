//! Reader events fired as registrations happen.

use std::cell::RefCell;
use std::rc::Rc;

use crate::types::DefinitionHolder;

/// An import that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportProcessed {
    /// The raw location string from the document (after placeholder
    /// resolution).
    pub location: String,
    /// Concrete resource locations the import resolved to.
    pub resources: Vec<String>,
}

/// An alias registration that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRegistered {
    pub name: String,
    pub alias: String,
}

/// Listener notified of registrations during a load.
///
/// All methods default to no-ops so implementations only override what
/// they care about.
pub trait ReaderEventListener {
    /// An import element finished loading its target resources.
    fn import_processed(&mut self, event: &ImportProcessed) {
        let _ = event;
    }

    /// An alias element registered successfully.
    fn alias_registered(&mut self, event: &AliasRegistered) {
        let _ = event;
    }

    /// A definition (possibly decorated) was registered.
    fn component_registered(&mut self, holder: &DefinitionHolder) {
        let _ = holder;
    }
}

/// Listener that records every event, for tests and CLI reporting.
#[derive(Debug, Clone, Default)]
pub struct CollectingEventListener {
    inner: Rc<RefCell<CollectedEvents>>,
}

/// Events captured by a [`CollectingEventListener`].
#[derive(Debug, Default)]
pub struct CollectedEvents {
    pub imports: Vec<ImportProcessed>,
    pub aliases: Vec<AliasRegistered>,
    pub components: Vec<DefinitionHolder>,
}

impl CollectingEventListener {
    /// Create a fresh collecting listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a closure over the captured events.
    pub fn with_events<R>(&self, f: impl FnOnce(&CollectedEvents) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Number of captured import events.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.inner.borrow().imports.len()
    }

    /// Number of captured component events.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.inner.borrow().components.len()
    }
}

impl ReaderEventListener for CollectingEventListener {
    fn import_processed(&mut self, event: &ImportProcessed) {
        self.inner.borrow_mut().imports.push(event.clone());
    }

    fn alias_registered(&mut self, event: &AliasRegistered) {
        self.inner.borrow_mut().aliases.push(event.clone());
    }

    fn component_registered(&mut self, holder: &DefinitionHolder) {
        self.inner.borrow_mut().components.push(holder.clone());
    }
}
