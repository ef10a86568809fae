//! # Prefix Permissions
//!
//! A claim's `permissions` list holds path prefixes. A request is authorized
//! when its target path starts with at least one of them.
//!
//! - Matching is case-sensitive and purely textual: `/api/v1/users` grants
//!   `/api/v1/users/42` and also `/api/v1/users-archive`, but not
//!   `/api/v1/userz`.
//! - The first match in list order is sufficient; no longest-prefix rule.
//! - `"/"` grants every path, and so does an empty entry `""`, since every
//!   path starts with it. Issuers must not emit empty entries.
//! - An empty list grants nothing.

use crate::claims::Claims;

/// Does `permission` grant access to `path`?
pub fn grants(permission: &str, path: &str) -> bool {
    path.starts_with(permission)
}

/// The first permission in `permissions` that grants `path`.
pub fn matching_permission<'a>(permissions: &'a [String], path: &str) -> Option<&'a str> {
    permissions
        .iter()
        .map(String::as_str)
        .find(|permission| grants(permission, path))
}

/// Is a request for `path` authorized by `claims`?
pub fn authorize(claims: &Claims, path: &str) -> bool {
    matching_permission(&claims.permissions, path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn claims_with(permissions: &[&str]) -> Claims {
        Claims::builder().permissions(permissions.iter().copied()).build()
    }

    #[test]
    fn prefix_grants_sub_paths() {
        let claims = claims_with(&["/api/v1/users"]);
        assert!(authorize(&claims, "/api/v1/users"));
        assert!(authorize(&claims, "/api/v1/users/42"));
        assert!(!authorize(&claims, "/api/v1/userz"));
        assert!(!authorize(&claims, "/api/v1"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let claims = claims_with(&["/Ping"]);
        assert!(!authorize(&claims, "/ping"));
    }

    #[test]
    fn empty_list_grants_nothing() {
        let claims = claims_with(&[]);
        assert!(!authorize(&claims, "/"));
        assert!(!authorize(&claims, "/ping"));
    }

    #[test]
    fn empty_entry_is_a_prefix_of_every_path() {
        let claims = claims_with(&[""]);
        assert!(authorize(&claims, "/ping"));
        assert!(authorize(&claims, "/"));
    }

    #[test]
    fn root_grants_everything() {
        let claims = claims_with(&["/"]);
        assert!(authorize(&claims, "/"));
        assert!(authorize(&claims, "/private"));
        assert!(authorize(&claims, "/api/v1/messages/9"));
    }

    #[test]
    fn first_match_in_list_order_is_reported() {
        let permissions = vec!["/api".to_string(), "/api/v1".to_string()];
        assert_eq!(matching_permission(&permissions, "/api/v1/x"), Some("/api"));
    }

    #[test]
    fn any_entry_suffices() {
        let claims = claims_with(&["/messages", "/ping"]);
        assert!(authorize(&claims, "/ping"));
        assert!(!authorize(&claims, "/private"));
    }

    proptest! {
        #[test]
        fn path_extending_a_permission_is_authorized(
            permission in "/[a-z]{1,8}(/[a-z0-9]{1,8}){0,3}",
            suffix in "(/[a-z0-9]{0,8}){0,3}",
        ) {
            let claims = claims_with(&[permission.as_str()]);
            let path = format!("{permission}{suffix}");
            prop_assert!(authorize(&claims, &path));
        }

        #[test]
        fn path_not_starting_with_any_permission_is_denied(
            permissions in proptest::collection::vec("/[a-m]{1,8}", 0..4),
            path in "/[n-z]{1,12}",
        ) {
            let claims = Claims::builder().permissions(permissions).build();
            prop_assert!(!authorize(&claims, &path));
        }
    }
}
