use std::collections::HashMap;

use super::role::Role;

/// What the offline check demands for one role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialRule {
    /// Both fields must match exactly.
    Exact { username: String, password: String },
    /// Any username; the password must match exactly.
    PasswordOnly { password: String },
}

impl CredentialRule {
    fn accepts(&self, username: &str, password: &str) -> bool {
        match self {
            CredentialRule::Exact { username: u, password: p } => username == u && password == p,
            CredentialRule::PasswordOnly { password: p } => password == p,
        }
    }
}

/// Fixed table consulted only when the login service cannot be reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialTable {
    rules: HashMap<Role, CredentialRule>,
}

impl CredentialTable {
    pub fn new(rules: impl IntoIterator<Item = (Role, CredentialRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn accepts(&self, role: Role, username: &str, password: &str) -> bool {
        self.rules
            .get(&role)
            .map_or(false, |rule| rule.accepts(username, password))
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        let password_only = |role: Role| {
            (
                role,
                CredentialRule::PasswordOnly {
                    password: role.as_str().to_string(),
                },
            )
        };
        Self::new([
            (
                Role::Admin,
                CredentialRule::Exact {
                    username: "admin".to_string(),
                    password: "admin".to_string(),
                },
            ),
            password_only(Role::Student),
            password_only(Role::Teacher),
            password_only(Role::Parent),
        ])
    }
}

/// Values loaded by the "try the demo" button.
pub struct DemoCredentials {
    pub role: Role,
    pub username: &'static str,
    pub password: &'static str,
}

pub const DEMO: DemoCredentials = DemoCredentials {
    role: Role::Student,
    username: "0002",
    password: "student",
};
