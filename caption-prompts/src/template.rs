//! `{{variable}}` substitution for prompt text.

use std::collections::HashMap;
use std::fmt;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while rendering a template.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    /// A required variable was not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// A `{{` opener has no matching `}}`.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening braces.
        offset: usize,
    },
}

/// Prompt text with `{{name}}` placeholders.
///
/// Placeholders resolve from runtime values first, then template defaults.
/// Unknown optional placeholders render as the empty string.
///
/// # Examples
///
/// ```
/// use caption_prompts::template::PromptTemplate;
///
/// let template = PromptTemplate::builder("Tone: {{tone}}")
///     .with_variable("tone", "funny")
///     .build();
///
/// assert_eq!(template.render().unwrap(), "Tone: funny");
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    template: String,
    defaults: HashMap<String, String>,
    required: Vec<String>,
}

impl PromptTemplate {
    /// Creates a template with no defaults.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self::builder(template).build()
    }

    /// Returns a builder for the supplied template text.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            template: template.into(),
            defaults: HashMap::new(),
            required: Vec::new(),
        }
    }

    /// Renders using only the template defaults.
    ///
    /// # Errors
    ///
    /// See [`PromptTemplate::render_with`].
    pub fn render(&self) -> TemplateResult<String> {
        self.render_with(&HashMap::new())
    }

    /// Renders with runtime values overriding the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] when a required variable has
    /// no value and [`TemplateError::Unterminated`] for a dangling `{{`.
    pub fn render_with(&self, values: &HashMap<&str, String>) -> TemplateResult<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or(TemplateError::Unterminated {
                offset: offset + start,
            })?;
            let name = after[..end].trim();
            out.push_str(self.lookup(name, values)?);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    fn lookup<'a>(
        &'a self,
        name: &str,
        values: &'a HashMap<&str, String>,
    ) -> TemplateResult<&'a str> {
        if let Some(value) = values.get(name).or_else(|| self.defaults.get(name)) {
            return Ok(value.as_str());
        }
        if self.required.iter().any(|required| required == name) {
            return Err(TemplateError::MissingVariable {
                name: name.to_owned(),
            });
        }
        Ok("")
    }
}

impl fmt::Display for PromptTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Builder for [`PromptTemplate`].
#[derive(Debug)]
pub struct TemplateBuilder {
    template: String,
    defaults: HashMap<String, String>,
    required: Vec<String>,
}

impl TemplateBuilder {
    /// Sets a default value for a variable.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Declares a variable that must be supplied at render time.
    #[must_use]
    pub fn with_required_variable(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Finishes the template.
    #[must_use]
    pub fn build(self) -> PromptTemplate {
        PromptTemplate {
            template: self.template,
            defaults: self.defaults,
            required: self.required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_defaults() {
        let template = PromptTemplate::builder("{{greeting}}, {{ name }}!")
            .with_variable("greeting", "Hello")
            .with_variable("name", "World")
            .build();

        assert_eq!(template.render().unwrap(), "Hello, World!");
    }

    #[test]
    fn runtime_values_override_defaults() {
        let template = PromptTemplate::builder("Hello {{name}}!")
            .with_variable("name", "World")
            .build();

        let values = HashMap::from([("name", "Alice".to_owned())]);
        assert_eq!(template.render_with(&values).unwrap(), "Hello Alice!");
    }

    #[test]
    fn missing_required_variable_errors() {
        let template = PromptTemplate::builder("Hello {{name}}!")
            .with_required_variable("name")
            .build();

        let err = template.render().expect_err("name is required");
        assert_eq!(
            err,
            TemplateError::MissingVariable {
                name: "name".into()
            }
        );
    }

    #[test]
    fn unknown_optional_variable_renders_empty() {
        let template = PromptTemplate::new("[{{missing}}]");
        assert_eq!(template.render().unwrap(), "[]");
    }

    #[test]
    fn values_are_not_rescanned() {
        let template = PromptTemplate::new("{{a}}");
        let values = HashMap::from([("a", "{{b}}".to_owned())]);
        assert_eq!(template.render_with(&values).unwrap(), "{{b}}");
    }

    #[test]
    fn unterminated_placeholder_errors() {
        let template = PromptTemplate::new("ok {{oops");
        let err = template.render().expect_err("dangling opener");
        assert_eq!(err, TemplateError::Unterminated { offset: 3 });
    }
}
