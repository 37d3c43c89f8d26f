//! Topic catalog for the UI/UX guide: which CSV file backs each topic and stack,
//! which columns are searched and returned, and how a free-text query picks a topic.
//!
//! ```no_run
//! use std::path::Path;
//! use uxguide_catalog::{load_topic, Catalog};
//!
//! let catalog = Catalog::builtin();
//! let topic = catalog.resolver().resolve("glassmorphism dark mode").to_string();
//! let table = load_topic(Path::new("data"), &topic, catalog.topic(&topic)?)?;
//! println!("{} rows", table.len());
//! # Ok::<(), uxguide_catalog::CatalogError>(())
//! ```

mod error;
mod loader;
mod resolver;
mod topics;

pub use error::{CatalogError, Result};
pub use loader::{load_topic, Table};
pub use resolver::{ResolverRule, TopicResolver};
pub use topics::{Catalog, StackConfig, TopicConfig, DEFAULT_TOPIC};
