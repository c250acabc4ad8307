//! Observer hooks fire synchronously around the driver side effects they
//! bracket, in registration order.

mod common;

use async_trait::async_trait;
use std::io;
use std::sync::{Arc, Mutex};

use common::{start_server_with_notifiers, test_options, FtpClient};
use ftpkit::notifier::Notifier;
use ftpkit::Context;

#[derive(Debug, Default)]
struct RecordingNotifier {
    actions: Mutex<Vec<String>>,
    last_pass_matched: Mutex<Option<bool>>,
}

impl RecordingNotifier {
    fn record(&self, action: &str) {
        self.actions.lock().unwrap().push(action.to_string());
    }

    fn assert_last(&self, expected: &[&str]) {
        let actions = self.actions.lock().unwrap();
        let tail: Vec<&str> = actions.iter().rev().take(expected.len()).rev().map(String::as_str).collect();
        assert_eq!(tail, expected, "full sequence: {:?}", *actions);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn before_command(&self, _ctx: &Context, _line: &str) {
        self.record("BeforeCommand");
    }

    async fn before_login_user(&self, _ctx: &Context, _user_name: &str) {
        self.record("BeforeLoginUser");
    }

    async fn before_put_file(&self, _ctx: &Context, _dst_path: &str) {
        self.record("BeforePutFile");
    }

    async fn before_delete_file(&self, _ctx: &Context, _dst_path: &str) {
        self.record("BeforeDeleteFile");
    }

    async fn before_change_cur_dir(&self, _ctx: &Context, _old: &str, _new: &str) {
        self.record("BeforeChangeCurDir");
    }

    async fn before_create_dir(&self, _ctx: &Context, _dst_path: &str) {
        self.record("BeforeCreateDir");
    }

    async fn before_delete_dir(&self, _ctx: &Context, _dst_path: &str) {
        self.record("BeforeDeleteDir");
    }

    async fn before_download_file(&self, _ctx: &Context, _dst_path: &str) {
        self.record("BeforeDownloadFile");
    }

    async fn after_user_login(&self, _ctx: &Context, _user_name: &str, _password: &str, pass_matched: bool, _err: Option<&io::Error>) {
        self.record("AfterUserLogin");
        *self.last_pass_matched.lock().unwrap() = Some(pass_matched);
    }

    async fn after_file_put(&self, _ctx: &Context, _dst_path: &str, _size: i64, _err: Option<&io::Error>) {
        self.record("AfterFilePut");
    }

    async fn after_file_deleted(&self, _ctx: &Context, _dst_path: &str, _err: Option<&io::Error>) {
        self.record("AfterFileDeleted");
    }

    async fn after_file_downloaded(&self, _ctx: &Context, _dst_path: &str, _size: i64, _err: Option<&io::Error>) {
        self.record("AfterFileDownloaded");
    }

    async fn after_cur_dir_changed(&self, _ctx: &Context, _old: &str, _new: &str, _err: Option<&io::Error>) {
        self.record("AfterCurDirChanged");
    }

    async fn after_dir_created(&self, _ctx: &Context, _dst_path: &str, _err: Option<&io::Error>) {
        self.record("AfterDirCreated");
    }

    async fn after_dir_deleted(&self, _ctx: &Context, _dst_path: &str, _err: Option<&io::Error>) {
        self.record("AfterDirDeleted");
    }
}

#[test]
fn hooks_bracket_their_side_effects() {
    let mock = Arc::new(RecordingNotifier::default());
    let _server = start_server_with_notifiers(test_options(2171), vec![mock.clone()]);
    let mut client = FtpClient::connect(2171);

    client.login();
    mock.assert_last(&["BeforeLoginUser", "AfterUserLogin"]);
    assert_eq!(*mock.last_pass_matched.lock().unwrap(), Some(true));

    assert_eq!(client.cmd("USER admin"), "331 User name ok, password required\r\n");
    assert_eq!(client.cmd("PASS nope"), "530 Incorrect password, not logged in\r\n");
    mock.assert_last(&["BeforeLoginUser", "AfterUserLogin"]);
    assert_eq!(*mock.last_pass_matched.lock().unwrap(), Some(false));

    client.login();
    assert_eq!(client.stor("server_test.go", b"test"), "226 OK, received 4 bytes\r\n");
    mock.assert_last(&["BeforePutFile", "AfterFilePut"]);

    let (payload, _) = client.retr("/server_test.go");
    assert_eq!(payload, b"test");
    mock.assert_last(&["BeforeDownloadFile", "AfterFileDownloaded"]);

    assert_eq!(client.cmd("MKD /src"), "257 Directory created\r\n");
    mock.assert_last(&["BeforeCreateDir", "AfterDirCreated"]);

    assert_eq!(client.cmd("DELE /server_test.go"), "250 File deleted\r\n");
    mock.assert_last(&["BeforeDeleteFile", "AfterFileDeleted"]);

    assert_eq!(client.cmd("CWD /src"), "250 Directory changed to /src\r\n");
    mock.assert_last(&["BeforeChangeCurDir", "AfterCurDirChanged"]);

    assert_eq!(client.cmd("CDUP"), "250 Directory changed to /\r\n");
    mock.assert_last(&["BeforeChangeCurDir", "AfterCurDirChanged"]);

    assert_eq!(client.cmd("RMD /src"), "250 Directory deleted\r\n");
    mock.assert_last(&["BeforeDeleteDir", "AfterDirDeleted"]);

    // Every line, including QUIT, goes through BeforeCommand first.
    assert_eq!(client.cmd("QUIT"), "221 Goodbye\r\n");
    mock.assert_last(&["BeforeCommand"]);
}
