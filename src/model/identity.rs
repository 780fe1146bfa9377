//! Identity collaborator

/// User key used when nobody is signed in
pub const DEFAULT_USER_KEY: &str = "default_user_id";

pub trait IdentityProvider: Send + Sync {
    /// Key of the signed-in user, if any
    fn signed_in_user(&self) -> Option<String>;

    /// Signed-in user, falling back to [`DEFAULT_USER_KEY`]
    fn current_user_key(&self) -> String {
        self.signed_in_user()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_KEY.to_string())
    }
}

/// Identity fixed at startup from configuration
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    user: Option<String>,
}

impl StaticIdentity {
    pub fn new(user: Option<String>) -> Self {
        Self { user }
    }
}

impl IdentityProvider for StaticIdentity {
    fn signed_in_user(&self) -> Option<String> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_user() {
        assert_eq!(StaticIdentity::new(None).current_user_key(), DEFAULT_USER_KEY);
        assert_eq!(
            StaticIdentity::new(Some("  ".to_string())).current_user_key(),
            DEFAULT_USER_KEY
        );
    }

    #[test]
    fn signed_in_user_wins() {
        let identity = StaticIdentity::new(Some("alice".to_string()));
        assert_eq!(identity.current_user_key(), "alice");
    }
}
