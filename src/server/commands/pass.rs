//! The RFC 959 password (`PASS`) command.

use async_trait::async_trait;
use std::io;

use super::CommandHandler;
use crate::notifier::Notifier;
use crate::server::{reply::ReplyCode, Session};

/// Evaluates the credentials collected by USER/PASS against the
/// authenticator, bracketed by the login notifier hooks.
#[derive(Debug)]
pub struct Pass;

#[async_trait]
impl CommandHandler for Pass {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let ctx = sess.context("PASS", param);
        let notifiers = sess.server().notifiers.clone();
        let auth = sess.server().auth.clone();
        let req_user = sess.req_user.clone();

        notifiers.before_login_user(&ctx, &req_user).await;

        let checked = match &auth {
            Some(auth) => auth.check_passwd(&ctx, &req_user, param).await,
            // Without an authenticator nobody gets in.
            None => Ok(false),
        };

        match checked {
            Err(err) => {
                notifiers.after_user_login(&ctx, &req_user, param, false, Some(&err)).await;
                sess.write_message(ReplyCode::FileError, "Checking password error").await;
            }
            Ok(true) => {
                sess.user = req_user.clone();
                sess.req_user.clear();
                notifiers.after_user_login(&ctx, &req_user, param, true, None).await;
                sess.write_message(ReplyCode::UserLoggedIn, "Password ok, continue").await;
            }
            Ok(false) => {
                notifiers.after_user_login(&ctx, &req_user, param, false, None).await;
                sess.write_message(ReplyCode::NotLoggedIn, "Incorrect password, not logged in").await;
            }
        }
        Ok(())
    }

    fn requires_param(&self) -> bool {
        true
    }

    fn requires_auth(&self) -> bool {
        false
    }
}
