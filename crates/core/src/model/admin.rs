/// Email/password pair checked by the simulated admin login.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl AdminCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields must match byte for byte.
    #[must_use]
    pub fn matches(&self, attempt: &AdminCredentials) -> bool {
        self.email == attempt.email && self.password == attempt.password
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
