/// A mailbox name matched by a `LIST` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name {
    name: String,
    delimiter: Option<String>,
}

impl Name {
    /// A listing row for `name` with no hierarchy delimiter.
    pub fn new(name: impl Into<String>) -> Name {
        Name {
            name: name.into(),
            delimiter: None,
        }
    }

    /// Attach the hierarchy delimiter the server reported.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Name {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// The mailbox name. Unless the server said otherwise, it is valid as an
    /// argument for commands, such as `SELECT`, that accept mailbox names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The character delimiting levels of hierarchy in the name, if the
    /// server reported one. `None` means the name is flat.
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }
}
