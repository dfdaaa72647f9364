//! End-to-end flows through the public API, driven against the scripted
//! [`MockConnection`]. Run with `--features test_helpers`.

use satchel::testing::{internal_date, MockConnection};
use satchel::{Draft, Error, FetchedMessage, Flag, Name, Session, WellKnown};

fn msgid_header(id: &str) -> String {
    format!("Message-ID: {}\r\n\r\n", id)
}

#[test]
fn search_then_read_resolves_lazily() {
    let conn = MockConnection::new()
        .with_uid_search(vec![2])
        .with_fetch(vec![FetchedMessage::new(2).with_header(msgid_header("<b@x>"))])
        .with_uid_search(vec![2])
        .with_fetch(vec![FetchedMessage::new(2)
            .with_flags([Flag::Seen])
            .with_internal_date(internal_date("17-Jul-2026 02:44:25 -0700"))
            .with_body("Message-ID: <b@x>\r\nSubject: hello\r\n\r\nworld\r\n")]);
    let session = Session::new(conn);
    let inbox = session.mailboxes().by_alias(WellKnown::Inbox);

    let mut message = inbox
        .filter("subject", "hello")
        .first()
        .unwrap()
        .expect("one match");
    assert_eq!(message.message_id(), "<b@x>");

    // the query only correlated by Message-ID; reading content resolves the
    // UID again and fetches the body
    assert_eq!(message.subject().unwrap().unwrap(), "hello");
    assert_eq!(message.flags(), [Flag::Seen]);
    assert_eq!(
        message.date(),
        internal_date("17-Jul-2026 02:44:25 -0700")
    );

    let transcript = session.connection().borrow().transcript.clone();
    assert_eq!(
        transcript,
        vec![
            "SELECT INBOX",
            "UID SEARCH SUBJECT hello",
            "UID FETCH 2 (BODY.PEEK[HEADER.FIELDS (MESSAGE-ID)])",
            "SELECT INBOX",
            "UID SEARCH HEADER Message-ID <b@x>",
            "UID FETCH 2 (FLAGS INTERNALDATE BODY.PEEK[])",
        ]
    );
}

#[test]
fn draft_save_delete_expunge_lifecycle() {
    let conn = MockConnection::new()
        .with_uid_search(vec![5])
        .with_uid_search(vec![5]);
    let session = Session::new(conn);

    let mut message = session
        .draft(
            "INBOX",
            Draft::new()
                .header("Subject", "fixture")
                .body("payload")
                .flag(Flag::Seen)
                .date(internal_date("01-Feb-2026 09:30:00 +0000")),
        )
        .unwrap();
    let id = message.message_id().to_string();
    assert!(id.ends_with("@satchel.invalid>"));

    message.save().unwrap();
    assert!(message.exists().unwrap());
    message.delete().unwrap();
    session.mailbox("INBOX").expunge().unwrap();

    let transcript = session.connection().borrow().transcript.clone();
    let append = &transcript[1];
    assert!(append.starts_with("APPEND INBOX (\\Seen) 01-Feb-2026 09:30:00 +0000"));
    assert!(append.contains("Subject: fixture"));
    assert!(append.contains(&id));
    assert!(append.contains("payload"));
    assert_eq!(
        transcript,
        vec![
            "SELECT INBOX".to_string(),
            append.clone(),
            "SELECT INBOX".to_string(),
            format!("UID SEARCH HEADER Message-ID {}", id),
            "SELECT INBOX".to_string(),
            format!("UID SEARCH HEADER Message-ID {}", id),
            "UID STORE 5 +FLAGS (\\Deleted)".to_string(),
            "SELECT INBOX".to_string(),
            "EXPUNGE".to_string(),
        ]
    );
}

#[test]
fn create_when_missing_then_enumerate() {
    let conn = MockConnection::new()
        .with_list(vec![]) // Reports is not there yet
        .with_list(vec![
            Name::new("INBOX").with_delimiter("/"),
            Name::new("Reports").with_delimiter("/"),
        ]);
    let session = Session::new(conn);

    let mut reports = session.mailbox("Reports");
    reports.create().unwrap();

    let names: Vec<String> = session
        .mailboxes()
        .all()
        .unwrap()
        .iter()
        .map(|mb| mb.name().to_string())
        .collect();
    assert_eq!(names, ["INBOX", "Reports"]);

    let transcript = session.connection().borrow().transcript.clone();
    assert_eq!(
        transcript,
        vec![
            "LIST \"\" \"Reports\"",
            "CREATE Reports",
            "LIST \"\" \"*\"",
        ]
    );
}

#[test]
fn transport_rejections_pass_through() {
    let session = Session::new(MockConnection::new().with_select_refused());
    match session.mailbox("Restricted").first() {
        Err(Error::No(reason)) => assert!(reason.contains("Restricted")),
        other => panic!("expected the NO to surface unchanged, got {:?}", other),
    }
}
