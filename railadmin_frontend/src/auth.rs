use log::info;

pub const ADMIN_ROLE: &str = "admin";

/// Session handed over by the external authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    authenticated: bool,
    role: Option<String>,
}

impl Session {
    pub fn new(authenticated: bool, role: Option<String>) -> Self {
        Self {
            authenticated,
            role,
        }
    }

    pub fn admin() -> Self {
        Self::new(true, Some(ADMIN_ROLE.to_string()))
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn logout(&mut self) {
        if self.authenticated {
            info!("session closed");
        }
        self.authenticated = false;
        self.role = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
}

/// Checked before an administrative view is built, never after.
pub fn guard_admin(session: &Session) -> Access {
    if session.is_authenticated() && session.role() == Some(ADMIN_ROLE) {
        Access::Granted
    } else {
        Access::RedirectToLogin
    }
}
