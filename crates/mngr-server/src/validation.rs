//! Request path validation.
//!
//! Turns a raw request path such as `/view/docs/todo.txt` into a
//! [`ValidatedUrl`]. This is the only place a raw path is interpreted; every
//! handler addresses storage exclusively through the parsed result.
//!
//! Accepted segments are non-empty, do not start with a dot and only contain
//! ASCII letters, digits, `.`, `_` and `-`. Percent-encoded input is not
//! decoded, so `%2e%2e` is rejected like any other disallowed character.

use std::fmt;

/// Route commands understood by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// List a directory.
    List,
    /// Show a page.
    View,
    /// Show the edit form for a page.
    Edit,
    /// Persist a page from a submitted form.
    Save,
    /// Create a folder.
    Folder,
    /// Show the creation form for a file or folder.
    New,
}

impl Command {
    /// Every command, in routing order.
    pub(crate) const ALL: [Self; 6] = [
        Self::List,
        Self::View,
        Self::Edit,
        Self::Save,
        Self::Folder,
        Self::New,
    ];

    /// Route segment for this command.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
            Self::Folder => "folder",
            Self::New => "new",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == segment)
    }

    /// Commands that act on a single named target.
    fn requires_target(self) -> bool {
        matches!(self, Self::View | Self::Edit | Self::Save | Self::Folder)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a request path was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    /// Path does not start with a command segment.
    #[error("missing command")]
    MissingCommand,
    /// First segment is not a known command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    /// Two consecutive slashes.
    #[error("empty path segment")]
    EmptySegment,
    /// `.` or `..` segment.
    #[error("relative path segment {0:?}")]
    RelativeSegment(String),
    /// Segment starting with a dot.
    #[error("hidden path segment {0:?}")]
    HiddenSegment(String),
    /// Segment containing a character outside the allow-list.
    #[error("invalid character {ch:?} in path segment {segment:?}")]
    InvalidCharacter {
        /// Offending segment.
        segment: String,
        /// First disallowed character.
        ch: char,
    },
    /// A page or folder command without a name.
    #[error("{0} requires a target name")]
    MissingTarget(Command),
}

/// A request path that passed validation.
///
/// Fields are private: the only way to obtain a value is [`ValidatedUrl::parse`],
/// and nothing can change it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValidatedUrl {
    command: Command,
    dir: String,
    value: String,
}

impl ValidatedUrl {
    /// Parse a raw request path.
    ///
    /// `/view/docs/todo.txt` yields command `view`, dir `docs` and value
    /// `todo.txt`. A single trailing slash is ignored, and `/list/` yields an
    /// empty dir and value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for any path that is not well-formed; no
    /// partially parsed value is ever produced.
    pub(crate) fn parse(raw: &str) -> Result<Self, ValidationError> {
        let rest = raw.strip_prefix('/').unwrap_or(raw);
        let (head, tail) = rest.split_once('/').unwrap_or((rest, ""));

        if head.is_empty() {
            return Err(ValidationError::MissingCommand);
        }
        let command = Command::from_segment(head)
            .ok_or_else(|| ValidationError::UnknownCommand(head.to_owned()))?;

        let tail = tail.strip_suffix('/').unwrap_or(tail);
        let mut segments = Vec::new();
        if !tail.is_empty() {
            for segment in tail.split('/') {
                check_segment(segment)?;
                segments.push(segment);
            }
        }

        let value = segments.pop().unwrap_or_default().to_owned();
        if value.is_empty() && command.requires_target() {
            return Err(ValidationError::MissingTarget(command));
        }

        Ok(Self {
            command,
            dir: segments.join("/"),
            value,
        })
    }

    /// Route command.
    pub(crate) fn command(&self) -> Command {
        self.command
    }

    /// Directory containing the target, without leading or trailing slash.
    pub(crate) fn dir(&self) -> &str {
        &self.dir
    }

    /// Final path segment: the target name, or the kind on the `new` route.
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Full logical path of the target (`dir` and `value` joined).
    pub(crate) fn path(&self) -> String {
        match (self.dir.is_empty(), self.value.is_empty()) {
            (true, _) => self.value.clone(),
            (false, true) => self.dir.clone(),
            (false, false) => format!("{}/{}", self.dir, self.value),
        }
    }
}

/// True if `name` would pass validation as a path segment, so a link to it
/// can be followed.
pub(crate) fn is_reachable_name(name: &str) -> bool {
    check_segment(name).is_ok()
}

fn check_segment(segment: &str) -> Result<(), ValidationError> {
    if segment.is_empty() {
        return Err(ValidationError::EmptySegment);
    }
    if segment == "." || segment == ".." {
        return Err(ValidationError::RelativeSegment(segment.to_owned()));
    }
    if segment.starts_with('.') {
        return Err(ValidationError::HiddenSegment(segment.to_owned()));
    }
    if let Some(ch) = segment.chars().find(|c| !is_name_char(*c)) {
        return Err(ValidationError::InvalidCharacter {
            segment: segment.to_owned(),
            ch,
        });
    }
    Ok(())
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
