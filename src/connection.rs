use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::error::Result;
use crate::types::{FetchedMessage, Flag, Name, Seq, Uid};

/// Which attributes a [`MailConnection::uid_fetch`] should return.
///
/// The object layer only ever issues these two shapes: the cheap header-only
/// fetch used to correlate search results by Message-ID, and the full fetch
/// used to load a message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FetchItems {
    /// Only the `Message-ID` header field, without marking the message seen.
    MessageIdHeader,
    /// Flags, internal date, and the full body, without marking the message
    /// seen.
    Full,
}

impl fmt::Display for FetchItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FetchItems::MessageIdHeader => f.write_str("(BODY.PEEK[HEADER.FIELDS (MESSAGE-ID)])"),
            FetchItems::Full => f.write_str("(FLAGS INTERNALDATE BODY.PEEK[])"),
        }
    }
}

/// How a [`MailConnection::uid_store`] alters a message's flag set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreAction {
    /// Add the given flags to whatever is already set (`+FLAGS`).
    Add,
    /// Remove the given flags (`-FLAGS`).
    Remove,
    /// Replace the flag set outright (`FLAGS`).
    Replace,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StoreAction::Add => f.write_str("+FLAGS"),
            StoreAction::Remove => f.write_str("-FLAGS"),
            StoreAction::Replace => f.write_str("FLAGS"),
        }
    }
}

/// The transport capability this crate is built over.
///
/// Implementations issue the corresponding IMAP commands over an
/// authenticated connection and translate server rejections into
/// [`Error::No`](crate::Error::No) / [`Error::Bad`](crate::Error::Bad); the
/// object layer passes those through to the caller untouched.
///
/// IMAP connections are stateful: a `select` establishes which mailbox every
/// subsequent UID-scoped command applies to, so commands must be issued
/// strictly in order and a single connection must not be shared across
/// threads without external serialization. All methods take `&mut self` to
/// make that ordering explicit in the types.
pub trait MailConnection {
    /// `LIST reference pattern`: enumerate mailbox names.
    fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<Name>>;

    /// `SELECT mailbox`: make `mailbox` the target of subsequent UID-scoped
    /// commands.
    fn select(&mut self, mailbox: &str) -> Result<()>;

    /// `CREATE mailbox`.
    fn create(&mut self, mailbox: &str) -> Result<()>;

    /// `DELETE mailbox`.
    fn delete(&mut self, mailbox: &str) -> Result<()>;

    /// `EXPUNGE`: permanently remove messages flagged `\Deleted` from the
    /// selected mailbox.
    fn expunge(&mut self) -> Result<()>;

    /// `SEARCH criteria`: sequence numbers of matching messages in the
    /// selected mailbox. `criteria` is a flat token list, e.g.
    /// `["SUBJECT", "hello"]` or `["ALL"]`.
    fn search(&mut self, criteria: &[String]) -> Result<Vec<Seq>>;

    /// `UID SEARCH criteria`: like [`MailConnection::search`], but
    /// returning UIDs, in whatever order the server reports them.
    fn uid_search(&mut self, criteria: &[String]) -> Result<Vec<Uid>>;

    /// `UID FETCH uids items`: fetch the given attribute shape for each
    /// UID in one round-trip.
    fn uid_fetch(&mut self, uids: &[Uid], items: FetchItems) -> Result<Vec<FetchedMessage>>;

    /// `UID STORE uids action flags`.
    fn uid_store(&mut self, uids: &[Uid], action: StoreAction, flags: &[Flag<'_>]) -> Result<()>;

    /// `UID COPY uids mailbox`: copy messages into another mailbox.
    fn uid_copy(&mut self, uids: &[Uid], mailbox: &str) -> Result<()>;

    /// `APPEND mailbox content` with the given flags and internal date.
    fn append(
        &mut self,
        mailbox: &str,
        content: &[u8],
        flags: &[Flag<'_>],
        date: DateTime<FixedOffset>,
    ) -> Result<()>;
}
