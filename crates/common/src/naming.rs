//! Python module-name checks.

/// Whether `name` is a dotted sequence of ASCII Python identifiers.
///
/// Names that pass can be handed to an interpreter or a backend flag as-is.
pub fn is_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
