//! Template resolution and `${name}` substitution.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::store::TemplateStore;

/// Policy for placeholders whose variable is absent from the supplied map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingVariables {
    /// Leave the placeholder as literal text (default).
    #[default]
    Keep,
    /// Fail resolution with [`Error::MissingVariable`].
    Error,
}

/// Resolves a logical template name to rendered body text.
///
/// Rendering substitutes every `${name}` occurrence with the matching
/// variable value. Substitution is a single pass: values are emitted
/// verbatim and never re-scanned for placeholders. A `$` not followed by
/// `{`, and a `${` with no closing `}`, are ordinary text.
pub struct TemplateResolver {
    store: Box<dyn TemplateStore>,
    missing: MissingVariables,
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver")
            .field("missing", &self.missing)
            .finish_non_exhaustive()
    }
}

impl TemplateResolver {
    /// Creates a resolver over the given store with the default
    /// missing-variable policy.
    #[must_use]
    pub fn new(store: impl TemplateStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            missing: MissingVariables::Keep,
        }
    }

    /// Sets the missing-variable policy.
    #[must_use]
    pub fn with_missing_variables(mut self, missing: MissingVariables) -> Self {
        self.missing = missing;
        self
    }

    /// Loads the template and substitutes variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no template exists under `name`,
    /// [`Error::MissingVariable`] if a placeholder is unresolved under the
    /// [`MissingVariables::Error`] policy, or [`Error::Io`] on other load
    /// failures.
    pub fn resolve(&self, name: &str, variables: &HashMap<String, String>) -> Result<String> {
        let template = self.store.load(name)?;
        let rendered = self.substitute(name, &template, variables)?;
        tracing::debug!(name, bytes = rendered.len(), "Resolved template");
        Ok(rendered)
    }

    fn substitute(
        &self,
        name: &str,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let placeholder = &rest[start..];

            let Some(end) = placeholder.find('}') else {
                // Unterminated placeholder: literal text to end of input.
                out.push_str(placeholder);
                rest = "";
                break;
            };

            let key = &placeholder[2..end];
            match variables.get(key) {
                Some(value) => out.push_str(value),
                None => match self.missing {
                    MissingVariables::Keep => out.push_str(&placeholder[..=end]),
                    MissingVariables::Error => {
                        return Err(Error::MissingVariable {
                            name: name.to_string(),
                            variable: key.to_string(),
                        });
                    }
                },
            }
            rest = &placeholder[end + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }
}
