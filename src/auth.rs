//! Sign-in boundary.
//!
//! The navigation controller asks an [`Authenticator`] to turn the submitted
//! credentials into a [`Session`]. The bundled [`EmailRoleAuthenticator`]
//! accepts any credentials and infers the role from the email address;
//! a real credential check plugs in here without changing navigation.

use crate::model::{Role, Session};

pub trait Authenticator: Send + Sync {
    /// Build the session for the submitted credentials.
    fn authenticate(&self, email: &str, password: &str) -> Session;
}

/// Infers the role from substrings of the email address.
///
/// Rules are checked in order:
/// 1. contains `admin` → [`Role::Admin`]
/// 2. contains `proveedor` or `provider` → [`Role::Provider`]
/// 3. anything else → [`Role::Client`]
///
/// The password is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailRoleAuthenticator;

impl EmailRoleAuthenticator {
    pub fn role_for(email: &str) -> Role {
        if email.contains("admin") {
            Role::Admin
        } else if email.contains("proveedor") || email.contains("provider") {
            Role::Provider
        } else {
            Role::Client
        }
    }
}

impl Authenticator for EmailRoleAuthenticator {
    fn authenticate(&self, email: &str, _password: &str) -> Session {
        Session::new(email, Self::role_for(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_takes_precedence() {
        assert_eq!(EmailRoleAuthenticator::role_for("admin@x.com"), Role::Admin);
        assert_eq!(
            EmailRoleAuthenticator::role_for("admin.provider@x.com"),
            Role::Admin
        );
    }

    #[test]
    fn test_provider_spellings() {
        assert_eq!(
            EmailRoleAuthenticator::role_for("carlos@proveedor.com"),
            Role::Provider
        );
        assert_eq!(
            EmailRoleAuthenticator::role_for("spa@provider.io"),
            Role::Provider
        );
    }

    #[test]
    fn test_everything_else_is_a_client() {
        assert_eq!(
            EmailRoleAuthenticator::role_for("maria@ejemplo.com"),
            Role::Client
        );
        // Matching is case-sensitive.
        assert_eq!(EmailRoleAuthenticator::role_for("ADMIN@x.com"), Role::Client);
    }

    #[test]
    fn test_password_is_ignored() {
        let auth = EmailRoleAuthenticator;
        let a = auth.authenticate("admin@x.com", "");
        let b = auth.authenticate("admin@x.com", "hunter2");
        assert_eq!(a, b);
        assert_eq!(a.display_name, "Administrador");
    }
}
