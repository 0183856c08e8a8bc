//! Configuration types for `FormulaActions`.

/// Default maximum length of names, titles, subjects and slugs.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 255;

/// Default maximum length of free text such as expressions, problems and notes.
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 20_000;

/// Input limits applied by the action handlers before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaActionsConfig {
    /// Maximum number of characters in a name-like field.
    pub max_name_length: usize,
    /// Maximum number of characters in a free-text field.
    pub max_text_length: usize,
}

impl Default for FormulaActionsConfig {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl FormulaActionsConfig {
    /// Create a config with custom limits.
    ///
    /// # Arguments
    ///
    /// * `max_name_length` - Maximum characters for names, titles, subjects and slugs
    /// * `max_text_length` - Maximum characters for expressions, descriptions and other free text
    pub fn with_limits(max_name_length: usize, max_text_length: usize) -> Self {
        Self {
            max_name_length,
            max_text_length,
        }
    }
}
