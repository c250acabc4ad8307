//! The numeric reply codes written on the control channel.

/// The reply codes according to RFC 959.
//
// The three digits form a code. Codes between 100 and 199 indicate marks;
// codes between 200 and 399 indicate acceptance; codes between 400 and 599
// indicate rejection. Clients are only guaranteed to interpret the first
// digit, the rest of the line is primarily for human consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
#[allow(dead_code)]
pub enum ReplyCode {
    /// 150
    FileStatusOkay = 150,

    /// 200
    CommandOkay = 200,
    /// 202
    CommandOkayNotImplemented = 202,
    /// 211
    SystemStatus = 211,
    /// 213
    FileStatus = 213,
    /// 215
    SystemType = 215,
    /// 220
    ServiceReady = 220,
    /// 221
    ClosingControlConnection = 221,
    /// 226
    ClosingDataConnection = 226,
    /// 227
    EnteringPassiveMode = 227,
    /// 229
    EnteringExtendedPassiveMode = 229,
    /// 230
    UserLoggedIn = 230,
    /// 234
    AuthOkayNoDataNeeded = 234,
    /// 250
    FileActionOkay = 250,
    /// 257
    DirCreated = 257,

    /// 331
    NeedPassword = 331,
    /// 350
    FileActionPending = 350,

    /// 425
    CantOpenDataConnection = 425,
    /// 426
    ConnectionClosed = 426,

    /// 500
    CommandSyntaxError = 500,
    /// 501
    ParameterSyntaxError = 501,
    /// 503
    BadCommandSequence = 503,
    /// 504
    CommandNotImplementedForParameter = 504,
    /// 522
    UnsupportedNetworkProtocol = 522,
    /// 530
    NotLoggedIn = 530,
    /// 534
    PolicyRequiresTls = 534,
    /// 550
    FileError = 550,
    /// 553
    BadFileName = 553,
}

impl ReplyCode {
    /// The numeric wire value of the code.
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Formats a single-line reply, terminated by CRLF.
pub(crate) fn format_single(code: ReplyCode, message: &str) -> String {
    format!("{} {}\r\n", code.code(), message)
}

/// Formats a multi-line reply in the `NNN-body\r\nNNN END\r\n` shape; the
/// body's own lines are separated by bare `\n`.
pub(crate) fn format_multiline(code: ReplyCode, body: &str) -> String {
    format!("{}-{}\r\n{} END\r\n", code.code(), body, code.code())
}
