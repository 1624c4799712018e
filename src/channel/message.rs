//! # Restart message: the wire-level restart protocol.
//!
//! External trigger sources speak a text-line format:
//!
//! ```text
//! message  = names [":" files]
//! names    = name *("," name)          ; worker names, whitespace trimmed
//! files    = <opaque remainder>        ; changed-file hint, passed through
//! ```
//!
//! The token [`ALL_PROCESSES`] anywhere in `names` clears the filter and
//! targets every transient worker. The empty message is the shutdown
//! sentinel.
//!
//! Parsing happens once, at the channel boundary; the channel itself
//! carries the structured [`RestartMessage`].
//!
//! ## Rules
//! - Parsing is lenient: a name that is empty after trimming is kept and
//!   simply never matches a real worker, so a malformed line degrades to a
//!   silent no-op restart instead of an error.
//! - Only the first `:` splits names from files; the remainder is opaque.
//!
//! ## Example
//! ```
//! use procvisor::RestartMessage;
//!
//! let msg = RestartMessage::parse("Worker-0, Worker-1:src/app.rs");
//! assert_eq!(
//!     msg,
//!     RestartMessage::Restart {
//!         names: Some(vec!["Worker-0".into(), "Worker-1".into()]),
//!         files: vec!["src/app.rs".into()],
//!     }
//! );
//!
//! assert_eq!(RestartMessage::parse(""), RestartMessage::Shutdown);
//! ```

/// Special token meaning "no filter, affect all transient workers".
pub const ALL_PROCESSES: &str = "__ALL_PROCESSES__";

/// A parsed restart-channel record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartMessage {
    /// The shutdown sentinel: stop monitoring, begin shutdown.
    Shutdown,
    /// A restart request.
    Restart {
        /// Worker names to restart; `None` means all transient workers.
        names: Option<Vec<String>>,
        /// Changed-file hint forwarded verbatim to the restart operation.
        files: Vec<String>,
    },
}

impl RestartMessage {
    /// Parses a raw wire line.
    ///
    /// Never fails: the empty string is [`RestartMessage::Shutdown`], and
    /// any other input yields a [`RestartMessage::Restart`] via best-effort
    /// splitting.
    pub fn parse(line: &str) -> Self {
        if line.is_empty() {
            return RestartMessage::Shutdown;
        }

        let (names_part, files) = match line.split_once(':') {
            Some((names, rest)) => (names, vec![rest.to_string()]),
            None => (line, Vec::new()),
        };

        let names: Vec<String> = names_part
            .split(',')
            .map(|name| name.trim().to_string())
            .collect();

        if names.iter().any(|name| name == ALL_PROCESSES) {
            RestartMessage::Restart { names: None, files }
        } else {
            RestartMessage::Restart {
                names: Some(names),
                files,
            }
        }
    }

    /// Returns true for the shutdown sentinel.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        matches!(self, RestartMessage::Shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_files_split_on_first_colon() {
        let msg = RestartMessage::parse("Worker-0, Worker-1:file.py");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: Some(vec!["Worker-0".into(), "Worker-1".into()]),
                files: vec!["file.py".into()],
            }
        );
    }

    #[test]
    fn remainder_is_opaque_even_with_more_colons() {
        let msg = RestartMessage::parse("Worker-0:a.rs:b.rs");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: Some(vec!["Worker-0".into()]),
                files: vec!["a.rs:b.rs".into()],
            }
        );
    }

    #[test]
    fn all_processes_token_clears_the_filter() {
        let msg = RestartMessage::parse("__ALL_PROCESSES__");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: None,
                files: vec![],
            }
        );

        // Anywhere in the list, with a payload attached.
        let msg = RestartMessage::parse("Worker-3,__ALL_PROCESSES__:x.rs");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: None,
                files: vec!["x.rs".into()],
            }
        );
    }

    #[test]
    fn empty_message_is_the_shutdown_sentinel() {
        assert!(RestartMessage::parse("").is_shutdown());
    }

    #[test]
    fn malformed_names_pass_through_after_trim() {
        // A leading comma produces an empty name that will never match a
        // worker; the message still parses.
        let msg = RestartMessage::parse(",Worker-0");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: Some(vec!["".into(), "Worker-0".into()]),
                files: vec![],
            }
        );
    }

    #[test]
    fn whitespace_only_message_is_not_a_sentinel() {
        let msg = RestartMessage::parse(" ");
        assert_eq!(
            msg,
            RestartMessage::Restart {
                names: Some(vec!["".into()]),
                files: vec![],
            }
        );
    }
}
