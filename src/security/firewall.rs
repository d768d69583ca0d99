//! Request path firewall.
//!
//! # Responsibilities
//! - Reject request paths that a normalizing upstream would resolve to a
//!   different route than the one the access policy matched
//!
//! # Design Decisions
//! - Runs before policy evaluation; rejected paths never reach the rule table
//! - Paths are rejected, not rewritten, so the upstream sees exactly what
//!   the policy evaluated
//! - A trailing slash is not rejected; segment matching treats it as a
//!   distinct path

use thiserror::Error;

/// Why a request path was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("path is not absolute")]
    NotAbsolute,

    #[error("path contains an empty segment")]
    EmptySegment,

    #[error("path contains a '.' or '..' segment")]
    DotSegment,

    #[error("path contains an encoded separator or dot")]
    EncodedSeparator,

    #[error("path contains a backslash")]
    Backslash,
}

const ENCODED_FORBIDDEN: [&str; 3] = ["%2f", "%2e", "%5c"];

/// Check that `path` is in normal form.
pub fn check_path(path: &str) -> Result<(), PathRejection> {
    let rest = path.strip_prefix('/').ok_or(PathRejection::NotAbsolute)?;

    if path.contains('\\') {
        return Err(PathRejection::Backslash);
    }

    let lower = path.to_ascii_lowercase();
    if ENCODED_FORBIDDEN.iter().any(|e| lower.contains(e)) {
        return Err(PathRejection::EncodedSeparator);
    }

    let segments: Vec<&str> = rest.split('/').collect();
    let last = segments.len() - 1;
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "" if i != last => return Err(PathRejection::EmptySegment),
            "." | ".." => return Err(PathRejection::DotSegment),
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_paths_pass() {
        assert_eq!(check_path("/"), Ok(()));
        assert_eq!(check_path("/api/productos/crear"), Ok(()));
        assert_eq!(check_path("/api/items/ver/5/cantidad/3"), Ok(()));
        assert_eq!(check_path("/api/productos/listar/"), Ok(()));
        assert_eq!(check_path("/api/usuarios/usuarios/a.b"), Ok(()));
        assert_eq!(check_path("/api/items/ver/%20x"), Ok(()));
    }

    #[test]
    fn test_empty_interior_segment() {
        assert_eq!(check_path("/api/productos//crear"), Err(PathRejection::EmptySegment));
        assert_eq!(check_path("//api/productos/crear"), Err(PathRejection::EmptySegment));
    }

    #[test]
    fn test_dot_segments() {
        assert_eq!(check_path("/api/productos/./crear"), Err(PathRejection::DotSegment));
        assert_eq!(check_path("/api/x/../productos/crear"), Err(PathRejection::DotSegment));
        assert_eq!(check_path("/api/productos/crear/.."), Err(PathRejection::DotSegment));
    }

    #[test]
    fn test_encoded_separators() {
        assert_eq!(check_path("/api/productos%2Fcrear"), Err(PathRejection::EncodedSeparator));
        assert_eq!(check_path("/api/x/%2e%2e/productos/crear"), Err(PathRejection::EncodedSeparator));
        assert_eq!(check_path("/api/productos/%5Ccrear"), Err(PathRejection::EncodedSeparator));
    }

    #[test]
    fn test_backslash_and_relative() {
        assert_eq!(check_path("/api\\productos/crear"), Err(PathRejection::Backslash));
        assert_eq!(check_path("api/productos/crear"), Err(PathRejection::NotAbsolute));
    }
}
