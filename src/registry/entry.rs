//! Registered entries

use crate::value::Value;

/// One registered configuration slot
///
/// The default text is rendered once at registration and never follows later
/// changes to the destination; use [`Entry::current_text`] for the live value.
pub struct Entry<'a> {
    pub(crate) name: String,
    pub(crate) usage: String,
    pub(crate) default_text: String,
    pub(crate) value: Box<dyn Value + 'a>,
}

impl<'a> Entry<'a> {
    pub(crate) fn new(name: String, usage: String, value: Box<dyn Value + 'a>) -> Self {
        let default_text = value.render();
        Self {
            name,
            usage,
            default_text,
            value,
        }
    }

    /// Normalized key, e.g. `APP_TIMEOUT`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-text description given at registration
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Rendering of the default, captured at registration
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Rendering of the value as it is now
    pub fn current_text(&self) -> String {
        self.value.render()
    }

    /// Whether the default is the zero value of its type
    pub fn is_zero_default(&self) -> bool {
        self.default_text == self.value.zero_text()
    }
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default_text", &self.default_text)
            .finish_non_exhaustive()
    }
}
