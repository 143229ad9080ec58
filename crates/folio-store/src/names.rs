//! Collection and resource name validation.
//!
//! Every name becomes exactly one path segment under the store root, so a
//! valid name:
//! - Must be non-empty
//! - Must not contain `/`, `\` or NUL
//! - Must not be `.` or `..`
//! - Must not start with `.` (hidden names are reserved for in-flight
//!   temporary files)

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Validate a single collection or resource name.
///
/// `what` and `op` only feed the error message for empty names.
///
/// # Examples
///
/// ```
/// use folio_store::names::validate_name;
///
/// assert!(validate_name("users", "collection", "writing a record").is_ok());
/// assert!(validate_name("", "collection", "writing a record").is_err());
/// assert!(validate_name("../etc", "resource", "reading a record").is_err());
/// ```
pub fn validate_name(name: &str, what: &'static str, op: &'static str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::EmptyName { what, op });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    if name.starts_with('.') {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
            reason: "must not start with '.'".into(),
        });
    }

    Ok(())
}

/// Validate a (collection, resource) pair for a record operation.
///
/// Both components are checked before the caller touches the filesystem;
/// an empty pair is reported as a single usage error naming both.
pub fn validate_key(collection: &str, resource: &str, op: &'static str) -> StoreResult<()> {
    if collection.is_empty() || resource.is_empty() {
        return Err(StoreError::EmptyName {
            what: "collection and resource",
            op,
        });
    }
    validate_name(collection, "collection", op)?;
    validate_name(resource, "resource", op)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OP: &str = "writing a record";

    #[test]
    fn valid_names() {
        assert!(validate_name("users", "collection", OP).is_ok());
        assert!(validate_name("John", "resource", OP).is_ok());
        assert!(validate_name("John.json", "resource", OP).is_ok());
        assert!(validate_name("with space", "resource", OP).is_ok());
        assert!(validate_name("émile", "resource", OP).is_ok());
    }

    #[test]
    fn empty_name_is_usage_error() {
        let err = validate_name("", "collection", OP).unwrap_err();
        assert!(matches!(err, StoreError::EmptyName { what: "collection", .. }));
    }

    #[test]
    fn separators_rejected() {
        assert!(validate_name("a/b", "collection", OP).is_err());
        assert!(validate_name("a\\b", "collection", OP).is_err());
        assert!(validate_name("nul\0byte", "resource", OP).is_err());
    }

    #[test]
    fn dot_names_rejected() {
        assert!(validate_name(".", "collection", OP).is_err());
        assert!(validate_name("..", "collection", OP).is_err());
        assert!(validate_name(".hidden", "resource", OP).is_err());
        assert!(validate_name(".John.json.tmp", "resource", OP).is_err());
    }

    #[test]
    fn key_with_empty_component() {
        let err = validate_key("", "John", OP).unwrap_err();
        assert_eq!(
            err.to_string(),
            "collection and resource must not be empty when writing a record"
        );
        assert!(validate_key("users", "", OP).is_err());
    }

    #[test]
    fn key_with_traversal() {
        let err = validate_key("users", "../../etc/passwd", OP).unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
        assert!(validate_key("users", "John", OP).is_ok());
    }
}
