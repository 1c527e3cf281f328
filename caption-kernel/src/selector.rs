//! Ordered model fallback.

use std::slice;

use thiserror::Error;

/// Default preference order, most capable and available first.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-pro",
    "gemini-1.0-pro",
];

/// Rejected candidate list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// No candidates were supplied.
    #[error("at least one model candidate is required")]
    Empty,
    /// A candidate identifier was blank.
    #[error("model candidate at position {0} is blank")]
    BlankCandidate(usize),
}

/// Fixed, ordered list of model identifiers to try.
///
/// The selector only decides order. Callers advance to the next candidate
/// when a request for the current one fails and stop on the first success;
/// running out of candidates is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    candidates: Vec<String>,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_MODELS.iter().map(|model| (*model).to_owned()).collect(),
        }
    }
}

impl ModelSelector {
    /// Creates a selector over `candidates`, trimmed, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for an empty list or a blank identifier.
    pub fn new<I, S>(candidates: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates = candidates
            .into_iter()
            .enumerate()
            .map(|(position, model)| {
                let model = model.as_ref().trim();
                if model.is_empty() {
                    Err(SelectorError::BlankCandidate(position))
                } else {
                    Ok(model.to_owned())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if candidates.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { candidates })
    }

    /// Yields candidates in priority order.
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            inner: self.candidates.iter(),
        }
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always `false`; construction rejects empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Iterator over model identifiers in priority order.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    inner: slice::Iter<'a, String>,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(String::as_str)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Candidates<'_> {}
