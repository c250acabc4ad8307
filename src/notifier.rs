//! Lifecycle hooks that let a host application observe the protocol.
//!
//! Register implementations with
//! [`Server::register_notifier`](crate::Server::register_notifier) before
//! serving. Hooks run synchronously, in registration order, immediately
//! before and after the driver side effect they bracket. The `After*` hooks
//! receive the driver's error, if any.

use async_trait::async_trait;
use std::{fmt::Debug, io};

use crate::context::Context;

/// Observer of session lifecycle events. Every hook has a no-op default, so
/// implementations only override what they care about.
#[allow(unused_variables)]
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    /// Called for every line received on the control channel, before dispatch.
    async fn before_command(&self, ctx: &Context, line: &str) {}
    /// Called before PASS evaluation.
    async fn before_login_user(&self, ctx: &Context, user_name: &str) {}
    /// Called before STOR/APPE/STOU start receiving data.
    async fn before_put_file(&self, ctx: &Context, dst_path: &str) {}
    /// Called before DELE invokes the driver.
    async fn before_delete_file(&self, ctx: &Context, dst_path: &str) {}
    /// Called before CWD/CDUP change the working directory.
    async fn before_change_cur_dir(&self, ctx: &Context, old_cur_dir: &str, new_cur_dir: &str) {}
    /// Called before MKD invokes the driver.
    async fn before_create_dir(&self, ctx: &Context, dst_path: &str) {}
    /// Called before RMD invokes the driver.
    async fn before_delete_dir(&self, ctx: &Context, dst_path: &str) {}
    /// Called before RETR starts sending data.
    async fn before_download_file(&self, ctx: &Context, dst_path: &str) {}
    /// Called after PASS evaluation with the outcome.
    async fn after_user_login(&self, ctx: &Context, user_name: &str, password: &str, pass_matched: bool, err: Option<&io::Error>) {}
    /// Called after STOR/APPE/STOU finished.
    async fn after_file_put(&self, ctx: &Context, dst_path: &str, size: i64, err: Option<&io::Error>) {}
    /// Called after DELE finished.
    async fn after_file_deleted(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {}
    /// Called after RETR finished.
    async fn after_file_downloaded(&self, ctx: &Context, dst_path: &str, size: i64, err: Option<&io::Error>) {}
    /// Called after CWD/CDUP finished.
    async fn after_cur_dir_changed(&self, ctx: &Context, old_cur_dir: &str, new_cur_dir: &str, err: Option<&io::Error>) {}
    /// Called after MKD finished.
    async fn after_dir_created(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {}
    /// Called after RMD finished.
    async fn after_dir_deleted(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {}
}

/// The registered notifiers of a server, broadcast to in order.
#[derive(Debug, Clone, Default)]
pub(crate) struct NotifierList(Vec<std::sync::Arc<dyn Notifier>>);

impl NotifierList {
    pub(crate) fn push(&mut self, notifier: std::sync::Arc<dyn Notifier>) {
        self.0.push(notifier);
    }
}

// The list fans every hook out to its members, so the engine can treat one
// notifier and many uniformly.
#[async_trait]
impl Notifier for NotifierList {
    async fn before_command(&self, ctx: &Context, line: &str) {
        for n in &self.0 {
            n.before_command(ctx, line).await;
        }
    }

    async fn before_login_user(&self, ctx: &Context, user_name: &str) {
        for n in &self.0 {
            n.before_login_user(ctx, user_name).await;
        }
    }

    async fn before_put_file(&self, ctx: &Context, dst_path: &str) {
        for n in &self.0 {
            n.before_put_file(ctx, dst_path).await;
        }
    }

    async fn before_delete_file(&self, ctx: &Context, dst_path: &str) {
        for n in &self.0 {
            n.before_delete_file(ctx, dst_path).await;
        }
    }

    async fn before_change_cur_dir(&self, ctx: &Context, old_cur_dir: &str, new_cur_dir: &str) {
        for n in &self.0 {
            n.before_change_cur_dir(ctx, old_cur_dir, new_cur_dir).await;
        }
    }

    async fn before_create_dir(&self, ctx: &Context, dst_path: &str) {
        for n in &self.0 {
            n.before_create_dir(ctx, dst_path).await;
        }
    }

    async fn before_delete_dir(&self, ctx: &Context, dst_path: &str) {
        for n in &self.0 {
            n.before_delete_dir(ctx, dst_path).await;
        }
    }

    async fn before_download_file(&self, ctx: &Context, dst_path: &str) {
        for n in &self.0 {
            n.before_download_file(ctx, dst_path).await;
        }
    }

    async fn after_user_login(&self, ctx: &Context, user_name: &str, password: &str, pass_matched: bool, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_user_login(ctx, user_name, password, pass_matched, err).await;
        }
    }

    async fn after_file_put(&self, ctx: &Context, dst_path: &str, size: i64, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_file_put(ctx, dst_path, size, err).await;
        }
    }

    async fn after_file_deleted(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_file_deleted(ctx, dst_path, err).await;
        }
    }

    async fn after_file_downloaded(&self, ctx: &Context, dst_path: &str, size: i64, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_file_downloaded(ctx, dst_path, size, err).await;
        }
    }

    async fn after_cur_dir_changed(&self, ctx: &Context, old_cur_dir: &str, new_cur_dir: &str, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_cur_dir_changed(ctx, old_cur_dir, new_cur_dir, err).await;
        }
    }

    async fn after_dir_created(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_dir_created(ctx, dst_path, err).await;
        }
    }

    async fn after_dir_deleted(&self, ctx: &Context, dst_path: &str, err: Option<&io::Error>) {
        for n in &self.0 {
            n.after_dir_deleted(ctx, dst_path, err).await;
        }
    }
}
