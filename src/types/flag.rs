use std::borrow::Cow;

/// A message flag, either one of the system flags pre-defined in [RFC 3501
/// section 2.3.2](https://tools.ietf.org/html/rfc3501#section-2.3.2) or a
/// server- or user-defined keyword.
///
/// Parsing accepts `"\\Seen"`, `"Seen"` and `"seen"` alike. Formatting
/// always emits the canonical protocol token (`\Seen`), so flags handed to
/// `APPEND` or `STORE` are normalized no matter how the caller spelled them.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum Flag<'a> {
    /// Message has been read.
    Seen,

    /// Message has been answered.
    Answered,

    /// Message is "flagged" for urgent/special attention.
    Flagged,

    /// Message is marked for removal by a later `EXPUNGE`.
    Deleted,

    /// Message has not completed composition.
    Draft,

    /// Message "recently" arrived in this mailbox. `\Recent` cannot be used
    /// in a `STORE` or `APPEND` command; it only ever comes back from the
    /// server.
    Recent,

    /// A non-standard user- or server-defined flag.
    Custom(Cow<'a, str>),
}

impl Flag<'static> {
    fn system(s: &str) -> Option<Self> {
        let name = s.strip_prefix('\\').unwrap_or(s);
        if name.eq_ignore_ascii_case("Seen") {
            Some(Flag::Seen)
        } else if name.eq_ignore_ascii_case("Answered") {
            Some(Flag::Answered)
        } else if name.eq_ignore_ascii_case("Flagged") {
            Some(Flag::Flagged)
        } else if name.eq_ignore_ascii_case("Deleted") {
            Some(Flag::Deleted)
        } else if name.eq_ignore_ascii_case("Draft") {
            Some(Flag::Draft)
        } else if name.eq_ignore_ascii_case("Recent") {
            Some(Flag::Recent)
        } else {
            None
        }
    }

    /// Helper function to transform strings into owned [`Flag`]s.
    pub fn from_strs<S: ToString>(
        v: impl IntoIterator<Item = S>,
    ) -> impl Iterator<Item = Flag<'static>> {
        v.into_iter().map(|s| Flag::from(s.to_string()))
    }
}

impl<'a> Flag<'a> {
    /// Get an owned version of the [`Flag`].
    pub fn into_owned(self) -> Flag<'static> {
        match self {
            Flag::Custom(cow) => Flag::Custom(Cow::Owned(cow.into_owned())),
            Flag::Seen => Flag::Seen,
            Flag::Answered => Flag::Answered,
            Flag::Flagged => Flag::Flagged,
            Flag::Deleted => Flag::Deleted,
            Flag::Draft => Flag::Draft,
            Flag::Recent => Flag::Recent,
        }
    }
}

impl<'a> std::fmt::Display for Flag<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Flag::Seen => write!(f, "\\Seen"),
            Flag::Answered => write!(f, "\\Answered"),
            Flag::Flagged => write!(f, "\\Flagged"),
            Flag::Deleted => write!(f, "\\Deleted"),
            Flag::Draft => write!(f, "\\Draft"),
            Flag::Recent => write!(f, "\\Recent"),
            Flag::Custom(ref s) => write!(f, "{}", s),
        }
    }
}

impl<'a> From<String> for Flag<'a> {
    fn from(s: String) -> Self {
        if let Some(f) = Flag::system(&s) {
            f
        } else {
            Flag::Custom(Cow::Owned(s))
        }
    }
}

impl<'a> From<&'a str> for Flag<'a> {
    fn from(s: &'a str) -> Self {
        if let Some(f) = Flag::system(s) {
            f
        } else {
            Flag::Custom(Cow::Borrowed(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protocol_tokens() {
        assert_eq!(Flag::from("\\Seen"), Flag::Seen);
        assert_eq!(Flag::from("\\Deleted"), Flag::Deleted);
        assert_eq!(Flag::from("\\Recent"), Flag::Recent);
    }

    #[test]
    fn parses_bare_names_case_insensitively() {
        assert_eq!(Flag::from("seen"), Flag::Seen);
        assert_eq!(Flag::from("SEEN"), Flag::Seen);
        assert_eq!(Flag::from("Answered"), Flag::Answered);
        assert_eq!(Flag::from("\\dRaFt"), Flag::Draft);
    }

    #[test]
    fn unknown_names_become_custom() {
        assert_eq!(
            Flag::from("$Forwarded"),
            Flag::Custom(Cow::Borrowed("$Forwarded"))
        );
    }

    #[test]
    fn displays_canonical_tokens() {
        assert_eq!(Flag::from("seen").to_string(), "\\Seen");
        assert_eq!(Flag::from("deleted").to_string(), "\\Deleted");
        assert_eq!(Flag::Custom("$MDNSent".into()).to_string(), "$MDNSent");
    }

    #[test]
    fn from_strs_normalizes() {
        let flags: Vec<_> = Flag::from_strs(["seen", "\\Flagged", "$Label1"]).collect();
        assert_eq!(
            flags,
            vec![Flag::Seen, Flag::Flagged, Flag::Custom("$Label1".into())]
        );
    }
}
