use serde::{Deserialize, Serialize};
use tracing::info;

/// Shown when nobody is signed in or the account has no display name.
pub const FALLBACK_USERNAME: &str = "username";

/// What the sign-in provider hands back. Only the display name is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Credential {
    pub fn new(id: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id: id.into(),
            display_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountAction {
    SignIn,
    SignOut,
}

impl AccountAction {
    pub fn label(&self) -> &'static str {
        match self {
            AccountAction::SignIn => "Login with Google",
            AccountAction::SignOut => "Logout",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<Credential>,
}

impl Session {
    pub fn new(user: Option<Credential>) -> Self {
        Self { user }
    }

    pub fn sign_in(&mut self, credential: Credential) {
        info!(id = %credential.id, "signed in");
        self.user = Some(credential);
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(id = %user.id, "signed out");
        }
    }

    pub fn current_user(&self) -> Option<&Credential> {
        self.user.as_ref()
    }

    pub fn into_user(self) -> Option<Credential> {
        self.user
    }

    pub fn greeting(&self) -> String {
        let name = self
            .user
            .as_ref()
            .and_then(|u| u.display_name.as_deref())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(FALLBACK_USERNAME);
        format!("Welcome, {name}!")
    }

    /// The account entry offers to sign in when signed out and vice versa.
    pub fn account_action(&self) -> AccountAction {
        if self.user.is_some() {
            AccountAction::SignOut
        } else {
            AccountAction::SignIn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_session_greets_placeholder() {
        let session = Session::default();

        assert_eq!(session.greeting(), "Welcome, username!");
        assert_eq!(session.account_action().label(), "Login with Google");
    }

    #[test]
    fn sign_in_and_out() {
        let mut session = Session::default();
        session.sign_in(Credential::new("ada@example.com", Some("Ada".into())));

        assert_eq!(session.greeting(), "Welcome, Ada!");
        assert_eq!(session.account_action(), AccountAction::SignOut);
        assert_eq!(session.account_action().label(), "Logout");

        session.sign_out();
        assert!(session.current_user().is_none());
        assert_eq!(session.account_action(), AccountAction::SignIn);
    }

    #[test]
    fn credential_without_name_uses_placeholder() {
        let session = Session::new(Some(Credential::new("anon", None)));
        assert_eq!(session.greeting(), "Welcome, username!");

        let session = Session::new(Some(Credential::new("anon", Some("  ".into()))));
        assert_eq!(session.greeting(), "Welcome, username!");
    }
}
