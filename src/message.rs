use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use uuid::Uuid;

use crate::connection::{FetchItems, MailConnection, StoreAction};
use crate::document::Document;
use crate::error::{Error, ParseError, Result};
use crate::mailbox::Mailbox;
use crate::types::{Flag, Uid};

/// Domain used for generated Message-IDs. `.invalid` is reserved by RFC
/// 2606, so a generated identifier can never collide with real mail.
const GENERATED_ID_DOMAIN: &str = "satchel.invalid";

/// Configuration for constructing a local message.
///
/// A plain value: collect the pieces, then hand it to [`Mailbox::draft`] or
/// [`Session::draft`](crate::Session::draft). The identity rule when the
/// draft is built: an explicit [`Draft::message_id`] always wins; otherwise
/// a Message-ID carried by the template is adopted; otherwise a fresh one is
/// generated. Whichever wins is written back into the document's header, so
/// the handle and its document never disagree.
///
/// ```no_run
/// # fn demo<C: satchel::MailConnection>(inbox: &satchel::Mailbox<C>) -> satchel::Result<()> {
/// use satchel::{Draft, Flag};
///
/// let mut message = inbox.draft(
///     Draft::new()
///         .header("Subject", "weekly report")
///         .header("To", "team@example.com")
///         .body("all green")
///         .flag(Flag::Seen),
/// )?;
/// message.save()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Draft {
    template: Option<Vec<u8>>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    flags: Vec<Flag<'static>>,
    date: Option<DateTime<FixedOffset>>,
    message_id: Option<String>,
}

impl Draft {
    /// An empty draft: no headers, no body, no flags, date of "now".
    pub fn new() -> Draft {
        Draft::default()
    }

    /// Starts from raw RFC 5322 bytes instead of an empty document.
    pub fn template(mut self, raw: impl Into<Vec<u8>>) -> Draft {
        self.template = Some(raw.into());
        self
    }

    /// Sets a header, replacing any value the template carried for it.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Draft {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Draft {
        self.body = Some(body.into());
        self
    }

    /// Adds one flag.
    pub fn flag(mut self, flag: Flag<'static>) -> Draft {
        self.flags.push(flag);
        self
    }

    /// Adds several flags.
    pub fn flags(mut self, flags: impl IntoIterator<Item = Flag<'static>>) -> Draft {
        self.flags.extend(flags);
        self
    }

    /// Sets the date used as the message's internal date on save.
    pub fn date(mut self, date: DateTime<FixedOffset>) -> Draft {
        self.date = Some(date);
        self
    }

    /// Forces the Message-ID, overriding anything the template carries.
    pub fn message_id(mut self, message_id: impl Into<String>) -> Draft {
        self.message_id = Some(message_id.into());
        self
    }
}

/// One remote message, correlated to the server by its Message-ID.
///
/// The Message-ID is fixed at construction and is the only correlation key;
/// the server-side UID is resolved from it on demand and cached for the
/// handle's lifetime. A cached UID stays valid only while nobody mutates the
/// mailbox (an expunge, another client's delete). This layer never
/// invalidates it on its own, so callers who mutate the mailbox should drop
/// and re-acquire handles.
///
/// Handles are independent: two of them naming the same remote message do
/// not see each other's cached UID, flags or document.
pub struct Message<C> {
    conn: Rc<RefCell<C>>,
    mailbox: Mailbox<C>,
    message_id: String,
    flags: Vec<Flag<'static>>,
    date: DateTime<FixedOffset>,
    document: Option<Document>,
    uid: Option<Uid>,
}

impl<C> fmt::Debug for Message<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("mailbox", &self.mailbox.name())
            .field("message_id", &self.message_id)
            .field("flags", &self.flags)
            .field("uid", &self.uid)
            .finish_non_exhaustive()
    }
}

impl<C> Clone for Message<C> {
    fn clone(&self) -> Self {
        Message {
            conn: Rc::clone(&self.conn),
            mailbox: self.mailbox.clone(),
            message_id: self.message_id.clone(),
            flags: self.flags.clone(),
            date: self.date,
            document: self.document.clone(),
            uid: self.uid,
        }
    }
}

impl<C: MailConnection> Message<C> {
    /// Local construction: builds the document eagerly from the draft and
    /// settles the message's identity. The result has no server counterpart
    /// until [`Message::save`] is called.
    pub(crate) fn draft(
        conn: Rc<RefCell<C>>,
        mailbox: Mailbox<C>,
        draft: Draft,
    ) -> Result<Message<C>> {
        let mut document = match draft.template {
            Some(raw) => Document::parse(raw)?,
            None => Document::empty(),
        };
        for (name, value) in &draft.headers {
            document.set_header(name, value)?;
        }
        if let Some(ref body) = draft.body {
            document.set_body(body);
        }

        // explicit id > template-carried id > freshly generated
        let message_id = match draft.message_id {
            Some(id) => id,
            None => document
                .message_id()
                .unwrap_or_else(generate_message_id),
        };
        document.set_header("Message-ID", &message_id)?;

        Ok(Message {
            conn,
            mailbox,
            message_id,
            flags: draft.flags,
            date: draft.date.unwrap_or_else(|| Utc::now().into()),
            document: Some(document),
            uid: None,
        })
    }

    /// Reference construction: a handle for a message assumed to already
    /// exist in `mailbox`. Nothing is fetched until content is accessed.
    pub(crate) fn reference(
        conn: Rc<RefCell<C>>,
        mailbox: Mailbox<C>,
        message_id: impl Into<String>,
    ) -> Message<C> {
        Message {
            conn,
            mailbox,
            message_id: message_id.into(),
            flags: Vec::new(),
            date: Utc::now().into(),
            document: None,
            uid: None,
        }
    }

    /// The Message-ID this handle is correlated by. Never changes.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// The mailbox this handle is bound to.
    pub fn mailbox(&self) -> &Mailbox<C> {
        &self.mailbox
    }

    /// Flags as last known locally (from construction, the last reload, or
    /// [`Message::set_flags`]).
    pub fn flags(&self) -> &[Flag<'static>] {
        &self.flags
    }

    /// Replaces the local flag set. Takes effect on the server at the next
    /// [`Message::save`].
    pub fn set_flags(&mut self, flags: impl IntoIterator<Item = Flag<'static>>) {
        self.flags = flags.into_iter().collect();
    }

    /// The message date as last known locally.
    pub fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }

    /// Resolves this handle's Message-ID to its server-side UID.
    ///
    /// The first call selects the mailbox and issues
    /// `UID SEARCH HEADER Message-ID <id>`; the answer is cached for the
    /// handle's lifetime. Zero matches is [`Error::NotFound`]; more than one
    /// is [`Error::Duplicate`]; a Message-ID collision is a broken
    /// invariant and is never silently resolved by picking a match.
    pub fn uid(&mut self) -> Result<Uid> {
        if let Some(uid) = self.uid {
            return Ok(uid);
        }
        self.mailbox.select()?;
        let uids = self
            .conn
            .borrow_mut()
            .uid_search(&self.correlation_criteria())?;
        let uid = match uids[..] {
            [] => return Err(Error::NotFound(self.message_id.clone())),
            [uid] => uid,
            _ => {
                return Err(Error::Duplicate {
                    message_id: self.message_id.clone(),
                    matches: uids.len(),
                })
            }
        };
        debug!("{} resolved to uid {}", self.message_id, uid);
        self.uid = Some(uid);
        Ok(uid)
    }

    /// Selects the mailbox and returns the resolved UID. Resolution itself
    /// selects, so the extra round-trip only happens when the UID is
    /// already cached.
    fn select_and_resolve(&mut self) -> Result<Uid> {
        match self.uid {
            Some(uid) => {
                self.mailbox.select()?;
                Ok(uid)
            }
            None => self.uid(),
        }
    }

    /// Fetches the message from the server, replacing the cached document,
    /// flags and date.
    pub fn reload(&mut self) -> Result<()> {
        let uid = self.select_and_resolve()?;
        let mut fetched = self
            .conn
            .borrow_mut()
            .uid_fetch(&[uid], FetchItems::Full)?;
        if fetched.is_empty() {
            return Err(Error::NotFound(self.message_id.clone()));
        }
        if fetched.len() > 1 {
            return Err(Error::Duplicate {
                message_id: self.message_id.clone(),
                matches: fetched.len(),
            });
        }
        let item = fetched.remove(0);
        let body = item.body.ok_or(Error::Parse(ParseError::Document))?;
        self.document = Some(Document::parse(body)?);
        self.flags = item.flags;
        if let Some(date) = item.internal_date {
            self.date = date;
        }
        Ok(())
    }

    /// The message document, fetching it from the server if this handle has
    /// none cached yet.
    pub fn document(&mut self) -> Result<&Document> {
        if self.document.is_none() {
            self.reload()?;
        }
        Ok(self
            .document
            .as_ref()
            .expect("reload always caches a document"))
    }

    /// The decoded `Subject`, if present.
    pub fn subject(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.subject())
    }

    /// The `From` addresses, comma-joined, if present.
    pub fn from(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.from())
    }

    /// The `To` addresses, comma-joined, if present.
    pub fn to(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.to())
    }

    /// The `Cc` addresses, comma-joined, if present.
    pub fn cc(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.cc())
    }

    /// The first text body part, if present.
    pub fn body_text(&mut self) -> Result<Option<String>> {
        Ok(self.document()?.body_text())
    }

    /// An arbitrary header's text value, if present.
    pub fn header(&mut self, name: &str) -> Result<Option<String>> {
        Ok(self.document()?.header(name))
    }

    /// The encoded wire form of the current document, loading it first if
    /// necessary.
    pub fn encoded(&mut self) -> Result<Vec<u8>> {
        Ok(self.document()?.as_bytes().to_vec())
    }

    /// Appends this message to its mailbox with the current flags
    /// (normalized to protocol tokens) and date.
    ///
    /// The cached UID, if any, is left alone: an append does not tell us
    /// the new UID, and the next mutating call re-resolves.
    pub fn save(&mut self) -> Result<()> {
        let raw = self.encoded()?;
        self.mailbox.select()?;
        debug!(
            "appending {} to {} ({} bytes)",
            self.message_id,
            self.mailbox.name(),
            raw.len()
        );
        self.conn
            .borrow_mut()
            .append(self.mailbox.name(), &raw, &self.flags, self.date)
    }

    /// Flags the message `\Deleted` on the server (additive; other flags
    /// survive) and drops the cached document, so the next content access
    /// reloads. The message stays on the server until the mailbox is
    /// [expunged](Mailbox::expunge).
    pub fn delete(&mut self) -> Result<()> {
        let uid = self.select_and_resolve()?;
        self.conn
            .borrow_mut()
            .uid_store(&[uid], StoreAction::Add, &[Flag::Deleted])?;
        self.document = None;
        Ok(())
    }

    /// Copies the message into another mailbox on the same server.
    pub fn copy_to(&mut self, mailbox: &str) -> Result<()> {
        let uid = self.select_and_resolve()?;
        self.conn.borrow_mut().uid_copy(&[uid], mailbox)
    }

    /// Whether a message with this handle's Message-ID currently exists in
    /// the mailbox. Always asks the server; the cached UID is not consulted.
    pub fn exists(&mut self) -> Result<bool> {
        self.mailbox.select()?;
        let uids = self
            .conn
            .borrow_mut()
            .uid_search(&self.correlation_criteria())?;
        Ok(!uids.is_empty())
    }

    fn correlation_criteria(&self) -> [String; 3] {
        [
            "HEADER".to_string(),
            "Message-ID".to_string(),
            self.message_id.clone(),
        ]
    }
}

fn generate_message_id() -> String {
    format!("<{}@{}>", Uuid::new_v4(), GENERATED_ID_DOMAIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{internal_date, MockConnection};
    use crate::types::FetchedMessage;

    const TEMPLATE: &str = "Message-ID: <template@example.com>\r\n\
                            Subject: from the template\r\n\
                            \r\n\
                            template body\r\n";

    fn inbox(conn: MockConnection) -> Mailbox<MockConnection> {
        Mailbox::new(Rc::new(RefCell::new(conn)), "INBOX")
    }

    fn transcript(mb: &Mailbox<MockConnection>) -> Vec<String> {
        mb.connection().borrow().transcript.clone()
    }

    fn full_fetch(uid: Uid) -> FetchedMessage {
        FetchedMessage::new(uid)
            .with_flags([Flag::Seen])
            .with_internal_date(internal_date("17-Jul-2026 02:44:25 -0700"))
            .with_body(TEMPLATE)
    }

    #[test]
    fn explicit_message_id_wins_over_the_template() {
        let mb = inbox(MockConnection::new());
        let mut msg = mb
            .draft(
                Draft::new()
                    .template(TEMPLATE)
                    .message_id("<explicit@example.com>"),
            )
            .unwrap();
        assert_eq!(msg.message_id(), "<explicit@example.com>");
        // the document header was forced to match
        assert_eq!(
            msg.document().unwrap().message_id().unwrap(),
            "<explicit@example.com>"
        );
    }

    #[test]
    fn template_message_id_is_adopted_when_none_is_given() {
        let mb = inbox(MockConnection::new());
        let msg = mb.draft(Draft::new().template(TEMPLATE)).unwrap();
        assert_eq!(msg.message_id(), "<template@example.com>");
    }

    #[test]
    fn a_fresh_message_id_is_generated_and_written_back() {
        let mb = inbox(MockConnection::new());
        let mut msg = mb.draft(Draft::new().body("hi")).unwrap();
        assert!(msg.message_id().starts_with('<'));
        assert!(msg.message_id().ends_with("@satchel.invalid>"));
        let id = msg.message_id().to_string();
        assert_eq!(msg.document().unwrap().message_id().unwrap(), id);
    }

    #[test]
    fn draft_headers_override_the_template() {
        let mb = inbox(MockConnection::new());
        let mut msg = mb
            .draft(
                Draft::new()
                    .template(TEMPLATE)
                    .header("Subject", "overridden")
                    .body("new body"),
            )
            .unwrap();
        assert_eq!(msg.subject().unwrap().unwrap(), "overridden");
        assert_eq!(msg.body_text().unwrap().unwrap().trim_end(), "new body");
    }

    #[test]
    fn uid_resolution_caches_a_unique_match() {
        let mb = inbox(
            MockConnection::new()
                .with_uid_search(vec![7])
                .with_uid_search(vec![99]),
        );
        let mut msg = mb.message("<a@x>");
        assert_eq!(msg.uid().unwrap(), 7);
        // second call answers from the cache; the scripted second search
        // result is never consumed
        assert_eq!(msg.uid().unwrap(), 7);
        assert_eq!(
            transcript(&mb),
            vec!["SELECT INBOX", "UID SEARCH HEADER Message-ID <a@x>"]
        );
    }

    #[test]
    fn uid_resolution_fails_on_zero_matches() {
        let mb = inbox(MockConnection::new().with_uid_search(vec![]));
        let mut msg = mb.message("<gone@x>");
        match msg.uid() {
            Err(Error::NotFound(id)) => assert_eq!(id, "<gone@x>"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn uid_resolution_fails_on_collisions() {
        let mb = inbox(MockConnection::new().with_uid_search(vec![3, 4]));
        let mut msg = mb.message("<twice@x>");
        match msg.uid() {
            Err(Error::Duplicate {
                message_id,
                matches,
            }) => {
                assert_eq!(message_id, "<twice@x>");
                assert_eq!(matches, 2);
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn reload_replaces_document_flags_and_date() {
        let mb = inbox(
            MockConnection::new()
                .with_uid_search(vec![7])
                .with_fetch(vec![full_fetch(7)]),
        );
        let mut msg = mb.message("<template@example.com>");
        assert_eq!(
            msg.subject().unwrap().unwrap(),
            "from the template",
            "content access triggered the load"
        );
        assert_eq!(msg.flags(), [Flag::Seen]);
        assert_eq!(msg.date(), internal_date("17-Jul-2026 02:44:25 -0700"));
        assert_eq!(
            transcript(&mb),
            vec![
                "SELECT INBOX",
                "UID SEARCH HEADER Message-ID <template@example.com>",
                "UID FETCH 7 (FLAGS INTERNALDATE BODY.PEEK[])"
            ]
        );
    }

    #[test]
    fn save_selects_then_appends_with_normalized_flags() {
        let mb = inbox(MockConnection::new());
        let mut msg = mb
            .draft(
                Draft::new()
                    .template(TEMPLATE)
                    .flags(Flag::from_strs(["seen"]))
                    .date(internal_date("01-Feb-2026 09:30:00 +0000")),
            )
            .unwrap();
        msg.save().unwrap();
        let transcript = transcript(&mb);
        assert_eq!(transcript[0], "SELECT INBOX");
        assert!(
            transcript[1].starts_with("APPEND INBOX (\\Seen) 01-Feb-2026 09:30:00 +0000"),
            "unexpected append: {}",
            transcript[1]
        );
        assert!(transcript[1].contains("from the template"));
    }

    #[test]
    fn delete_flags_and_forgets_the_document_but_not_the_flags() {
        let conn = MockConnection::new()
            .with_uid_search(vec![7])
            .with_fetch(vec![full_fetch(7)])
            .with_fetch(vec![full_fetch(7)]);
        let mb = inbox(conn);
        let mut msg = mb.message("<template@example.com>");
        msg.reload().unwrap();
        msg.delete().unwrap();
        // flags and date survive the delete locally
        assert_eq!(msg.flags(), [Flag::Seen]);
        // but the document is gone: the next content access re-fetches
        assert_eq!(msg.subject().unwrap().unwrap(), "from the template");
        let transcript = transcript(&mb);
        assert_eq!(
            transcript[4],
            "UID STORE 7 +FLAGS (\\Deleted)",
            "full transcript: {:?}",
            transcript
        );
        assert!(
            transcript[6].starts_with("UID FETCH 7"),
            "reload after delete, full transcript: {:?}",
            transcript
        );
    }

    #[test]
    fn copy_resolves_and_issues_uid_copy() {
        let mb = inbox(MockConnection::new().with_uid_search(vec![5]));
        let mut msg = mb.message("<a@x>");
        msg.copy_to("Archive/2026").unwrap();
        let transcript = transcript(&mb);
        assert_eq!(*transcript.last().unwrap(), "UID COPY 5 Archive/2026");
    }

    #[test]
    fn exists_is_a_plain_search() {
        let mb = inbox(
            MockConnection::new()
                .with_uid_search(vec![12])
                .with_uid_search(vec![]),
        );
        let mut msg = mb.message("<a@x>");
        assert!(msg.exists().unwrap());
        assert!(!msg.exists().unwrap(), "exists never caches");
    }

    #[test]
    fn save_of_an_unloaded_reference_fetches_first() {
        let conn = MockConnection::new()
            .with_uid_search(vec![7])
            .with_fetch(vec![full_fetch(7)]);
        let mb = inbox(conn);
        let mut msg = mb.message("<template@example.com>");
        msg.save().unwrap();
        let transcript = transcript(&mb);
        assert!(transcript
            .iter()
            .any(|line| line.starts_with("UID FETCH 7")));
        assert!(transcript.last().unwrap().starts_with("APPEND INBOX"));
    }
}
