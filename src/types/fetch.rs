use chrono::{DateTime, FixedOffset};

use super::{Flag, Uid};

/// The attributes a `UID FETCH` round-trip returned for one message.
///
/// Which of the optional fields are populated depends on the
/// [`FetchItems`](crate::FetchItems) shape the fetch was issued with;
/// transport implementations fill in whatever the server reported.
#[derive(Clone, Debug)]
pub struct FetchedMessage {
    /// The unique identifier of the message within its mailbox.
    pub uid: Uid,

    /// Flags set on the message at fetch time.
    pub flags: Vec<Flag<'static>>,

    /// The server's `INTERNALDATE` for the message.
    pub internal_date: Option<DateTime<FixedOffset>>,

    /// The requested header section, raw, when the fetch asked for one.
    pub header: Option<Vec<u8>>,

    /// The full message body when the fetch asked for it.
    pub body: Option<Vec<u8>>,
}

impl FetchedMessage {
    /// A fetch result carrying nothing but the UID.
    pub fn new(uid: Uid) -> FetchedMessage {
        FetchedMessage {
            uid,
            flags: Vec::new(),
            internal_date: None,
            header: None,
            body: None,
        }
    }

    /// Attach flags.
    pub fn with_flags(mut self, flags: impl IntoIterator<Item = Flag<'static>>) -> Self {
        self.flags = flags.into_iter().collect();
        self
    }

    /// Attach an `INTERNALDATE`.
    pub fn with_internal_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.internal_date = Some(date);
        self
    }

    /// Attach a raw header section.
    pub fn with_header(mut self, header: impl Into<Vec<u8>>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Attach a full body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}
