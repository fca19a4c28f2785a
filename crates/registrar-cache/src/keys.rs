//! Cache key generation utilities.

use registrar_core::SubjectId;

/// Builds a key under `prefix`.
fn build_key(prefix: &str, parts: &[&str]) -> String {
    format!("{}:{}", prefix, parts.join(":"))
}

/// Keys for revocation markers.
pub mod revocation {
    use super::*;

    /// Key holding the revocation generation for a subject.
    pub fn by_subject(prefix: &str, subject_id: SubjectId) -> String {
        build_key(prefix, &["revocation", &subject_id.to_string()])
    }
}
