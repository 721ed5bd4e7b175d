use uuid::Uuid;

/// Separator between a collection key and a generated suffix.
pub const TEMP_KEY_SEPARATOR: char = '_';

/// A key derived from `base` that no other transform will generate.
///
/// Used both for copy-mode results and for the staging key of a replace.
pub fn temp_key(base: &str) -> String {
    format!("{base}{TEMP_KEY_SEPARATOR}{}", Uuid::new_v4())
}
