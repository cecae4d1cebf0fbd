//! # mailbridge-template
//!
//! Template storage and variable substitution for email bodies.
//!
//! Templates are plain text resources addressed by a path-like logical name
//! (e.g. `templates/invitationtemplate`). A [`TemplateStore`] locates the raw
//! template text; a [`TemplateResolver`] substitutes `${name}` placeholders
//! with caller-supplied variables.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::collections::HashMap;
//! use mailbridge_template::{FsTemplateStore, TemplateResolver};
//!
//! let store = FsTemplateStore::new("resources");
//! let resolver = TemplateResolver::new(store);
//!
//! let mut vars = HashMap::new();
//! vars.insert("user".to_string(), "Mike".to_string());
//!
//! let body = resolver.resolve("templates/invitationtemplate", &vars)?;
//! ```
//!
//! ## Missing variables
//!
//! A placeholder whose variable is absent from the supplied map is left as
//! literal text by default. Configure [`MissingVariables::Error`] to fail
//! instead:
//!
//! ```ignore
//! use mailbridge_template::{MissingVariables, TemplateResolver};
//!
//! let resolver = TemplateResolver::new(store)
//!     .with_missing_variables(MissingVariables::Error);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod resolver;
mod store;

pub use error::{Error, Result};
pub use resolver::{MissingVariables, TemplateResolver};
pub use store::{FsTemplateStore, MemoryTemplateStore, TemplateStore};
