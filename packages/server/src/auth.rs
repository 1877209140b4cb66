use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Header carrying the caller's id, until a real identity provider is wired in
pub const USER_ID_HEADER: &str = "x-brandkit-user";

/// Roles ordered from least to most privileged
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Role {
    Viewer,
    Admin,
    #[default]
    SuperAdmin,
}

impl Role {
    /// A role implies every role below it
    pub fn includes(self, other: Role) -> bool {
        self >= other
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Viewer => "viewer",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        };
        f.write_str(s)
    }
}

/// Whoever made the current request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Self { id })
    }
}

pub trait RoleCheck: Send + Sync + 'static {
    fn current_user_has_role(&self, user: &CurrentUser, role: Role) -> bool;
}

/// Grants the same configured role to every caller.
/// Stands in for a real identity provider.
#[derive(Clone, Copy, Debug)]
pub struct GrantedRole(pub Role);

impl RoleCheck for GrantedRole {
    fn current_user_has_role(&self, _user: &CurrentUser, role: Role) -> bool {
        self.0.includes(role)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(Role::SuperAdmin.includes(Role::Admin));
        assert!(Role::SuperAdmin.includes(Role::SuperAdmin));
        assert!(Role::Admin.includes(Role::Viewer));
        assert!(!Role::Admin.includes(Role::SuperAdmin));
        assert!(!Role::Viewer.includes(Role::Admin));
    }

    #[test]
    fn granted_role_applies_to_everyone() {
        let check = GrantedRole(Role::Admin);
        let anonymous = CurrentUser::default();
        let named = CurrentUser {
            id: Some("ada".to_string()),
        };

        for user in [anonymous, named] {
            assert!(check.current_user_has_role(&user, Role::Viewer));
            assert!(check.current_user_has_role(&user, Role::Admin));
            assert!(!check.current_user_has_role(&user, Role::SuperAdmin));
        }
    }

    #[test]
    fn role_wire_format() {
        assert_eq!(
            serde_json::to_value(Role::SuperAdmin).unwrap(),
            serde_json::json!("super_admin")
        );
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
        assert_eq!(Role::default(), Role::SuperAdmin);
    }
}
