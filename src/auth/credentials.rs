//! Admin credentials configured out of band.

use super::constant_time_compare;
use crate::errors::AppError;

/// Positionally paired admin emails and passwords, immutable after startup.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    emails: Vec<String>,
    passwords: Vec<String>,
}

impl CredentialStore {
    pub fn new(emails: Vec<String>, passwords: Vec<String>) -> Self {
        Self { emails, passwords }
    }

    /// Whether every email has a password.
    pub fn is_consistent(&self) -> bool {
        self.emails.len() == self.passwords.len()
    }

    /// Email configured at `index`.
    pub fn email(&self, index: usize) -> Option<&str> {
        self.emails.get(index).map(String::as_str)
    }

    /// Index of the first pair matching both fields exactly. Empty input never matches.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<usize>, AppError> {
        if !self.is_consistent() {
            return Err(AppError::Configuration(format!(
                "{} admin emails but {} admin passwords configured",
                self.emails.len(),
                self.passwords.len()
            )));
        }

        if email.is_empty() || password.is_empty() {
            return Ok(None);
        }

        Ok(self
            .emails
            .iter()
            .zip(&self.passwords)
            .position(|(e, p)| {
                // both comparisons always run
                let email_ok = constant_time_compare(e, email);
                let password_ok = constant_time_compare(p, password);
                email_ok & password_ok
            }))
    }
}
