//! The RFC 3659 machine listing commands (`MLSD`/`MLST`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;

use super::{list::send_listing, CommandHandler};
use crate::driver::FileInfo;
use crate::server::{path::join_path, reply::ReplyCode, Session};

// Facts are emitted in the fixed order type, size, modify, perm. The perm
// fact is the minimal RFC 3659 §7.5.5 set derived from the provider's mode
// bits.
fn fact_line(info: &dyn FileInfo, mode: u32) -> String {
    let kind = if info.is_dir() { "dir" } else { "file" };
    let modify: DateTime<Utc> = info.modified().into();
    let writable = mode & 0o200 != 0;
    let perm = match (info.is_dir(), writable) {
        (true, true) => "elc",
        (true, false) => "el",
        (false, true) => "rw",
        (false, false) => "r",
    };
    format!(
        "type={};size={};modify={};perm={}; {}",
        kind,
        info.size(),
        modify.format("%Y%m%d%H%M%S"),
        perm,
        info.name(),
    )
}

/// Sends a machine-readable directory listing over the data channel.
#[derive(Debug)]
pub struct Mlsd;

#[async_trait]
impl CommandHandler for Mlsd {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("MLSD", param);
        let driver = sess.server().driver.clone();
        let perm = sess.server().perm.clone();

        let mut lines: Vec<String> = Vec::new();
        let listed = driver
            .list_dir(&ctx, &path, &mut |info| {
                let entry_path = join_path(&path, info.name());
                let mode = perm.get_mode(&entry_path).unwrap_or(0o755);
                lines.push(fact_line(info, mode));
                Ok(())
            })
            .await;
        if listed.is_err() {
            sess.write_message(ReplyCode::FileError, &format!("Could not list {}", path)).await;
            return Ok(());
        }

        send_listing(sess, lines, "Opening data connection for MLSD").await
    }

    fn is_extension(&self) -> bool {
        true
    }
}

/// Reports the machine-readable facts of a single entry over the control
/// channel.
#[derive(Debug)]
pub struct Mlst;

#[async_trait]
impl CommandHandler for Mlst {
    async fn execute(&self, sess: &mut Session, param: &str) -> io::Result<()> {
        let path = sess.build_path(param);
        let ctx = sess.context("MLST", param);
        let driver = sess.server().driver.clone();
        let perm = sess.server().perm.clone();

        match driver.stat(&ctx, &path).await {
            Ok(info) => {
                let mode = perm.get_mode(&path).unwrap_or(0o755);
                let body = format!("Listing {}\n {}\n", path, fact_line(info.as_ref(), mode));
                sess.write_multiline(ReplyCode::FileActionOkay, &body).await;
            }
            Err(_) => {
                sess.write_message(ReplyCode::FileError, &format!("Could not get status of {}", path)).await;
            }
        }
        Ok(())
    }

    fn is_extension(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::SystemTime;

    struct Entry;

    impl FileInfo for Entry {
        fn name(&self) -> &str {
            "report.txt"
        }

        fn size(&self) -> u64 {
            512
        }

        fn is_dir(&self) -> bool {
            false
        }

        fn modified(&self) -> SystemTime {
            SystemTime::UNIX_EPOCH
        }
    }

    #[test]
    fn facts_come_in_fixed_order() {
        let line = fact_line(&Entry, 0o644);
        assert_eq!(line, "type=file;size=512;modify=19700101000000;perm=rw; report.txt");

        let line = fact_line(&Entry, 0o444);
        assert!(line.contains(";perm=r; "));
    }
}
