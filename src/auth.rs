//! Defines the service provider interface for authentication back-ends and
//! ships two small implementations: fixed credentials compared in constant
//! time, and regular-expression matching.

use async_trait::async_trait;
use regex::Regex;
use std::{fmt::Debug, io};
use subtle::ConstantTimeEq;

use crate::context::Context;

/// An `Authenticator` decides whether a USER/PASS pair may log in.
#[async_trait]
pub trait Authenticator: Send + Sync + Debug {
    /// Returns `Ok(true)` when the password is accepted for the user.
    ///
    /// An `Err` means the back-end itself failed (e.g. a database was
    /// unreachable); the session replies 550 and stays unauthenticated.
    async fn check_passwd(&self, ctx: &Context, name: &str, pass: &str) -> io::Result<bool>;
}

/// Fixed single-user credentials held in memory.
///
/// The comparison runs in constant time so the check does not leak how many
/// characters matched.
#[derive(Debug, Clone)]
pub struct SimpleAuth {
    name: String,
    password: String,
}

impl SimpleAuth {
    /// Creates an authenticator accepting exactly this name/password pair.
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        SimpleAuth {
            name: name.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl Authenticator for SimpleAuth {
    async fn check_passwd(&self, _ctx: &Context, name: &str, pass: &str) -> io::Result<bool> {
        Ok(constant_time_equals(name, &self.name) & constant_time_equals(pass, &self.password))
    }
}

fn constant_time_equals(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Accepts any user whose name and password match the configured patterns.
#[derive(Debug)]
pub struct RegexAuth {
    username_regex: Regex,
    password_regex: Regex,
}

impl RegexAuth {
    /// Compiles the two patterns. Returns an error when either pattern is
    /// not a valid regular expression.
    pub fn new(username_regex: &str, password_regex: &str) -> Result<Self, regex::Error> {
        Ok(RegexAuth {
            username_regex: Regex::new(username_regex)?,
            password_regex: Regex::new(password_regex)?,
        })
    }
}

#[async_trait]
impl Authenticator for RegexAuth {
    async fn check_passwd(&self, _ctx: &Context, name: &str, pass: &str) -> io::Result<bool> {
        Ok(self.username_regex.is_match(name) && self.password_regex.is_match(pass))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionData;
    use pretty_assertions::assert_eq;

    fn ctx() -> Context {
        Context {
            session_id: "0123456789abcdef0123".to_string(),
            user: String::new(),
            remote_addr: "127.0.0.1:9999".parse().unwrap(),
            cmd: "PASS".to_string(),
            param: String::new(),
            data: SessionData::default(),
        }
    }

    #[tokio::test]
    async fn simple_auth_matches_exactly() {
        let auth = SimpleAuth::new("admin", "s3cret");
        let ctx = ctx();
        assert_eq!(auth.check_passwd(&ctx, "admin", "s3cret").await.unwrap(), true);
        assert_eq!(auth.check_passwd(&ctx, "admin", "s3cret ").await.unwrap(), false);
        assert_eq!(auth.check_passwd(&ctx, "Admin", "s3cret").await.unwrap(), false);
        assert_eq!(auth.check_passwd(&ctx, "", "").await.unwrap(), false);
    }

    #[tokio::test]
    async fn regex_auth_matches_patterns() {
        let auth = RegexAuth::new("^user-[0-9]+$", "^.{8,}$").unwrap();
        let ctx = ctx();
        assert_eq!(auth.check_passwd(&ctx, "user-42", "longenough").await.unwrap(), true);
        assert_eq!(auth.check_passwd(&ctx, "user-42", "short").await.unwrap(), false);
        assert_eq!(auth.check_passwd(&ctx, "someone", "longenough").await.unwrap(), false);
    }
}
