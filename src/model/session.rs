use std::fmt;

/// Role of a signed-in visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Provider,
    Client,
}

impl Role {
    /// Fixed display label for the role, shown instead of anything the visitor typed.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Admin => "Administrador",
            Self::Provider => "Proveedor",
            Self::Client => "Cliente",
        }
    }

    /// Short lowercase identifier for the role.
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Provider => "provider",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// The authenticated identity for the current visit.
///
/// Lives only as long as the navigation controller that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl Session {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            display_name: role.display_name().to_string(),
            role,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.display_name, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_comes_from_role() {
        let session = Session::new("maria@ejemplo.com", Role::Client);
        assert_eq!(session.display_name, "Cliente");
        assert_eq!(session.to_string(), "Cliente <maria@ejemplo.com>");
    }

    #[test]
    fn test_role_id() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Provider.id(), "provider");
    }
}
