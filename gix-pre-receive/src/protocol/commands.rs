// Ref update parsing.
//
// The invoking server hands us one record per line in the form
//   "<old-oid> <new-oid> <refname>"
// which is exactly what a git `pre-receive` hook reads from stdin.
//
// A record with the wrong number of fields invalidates the whole payload: nothing is evaluated
// if any line is malformed. Object ids are passed through as they are, whatever hash they use.

use crate::Error;

/// A single ref update as pushed by the client.
///
/// The null object id (all `0`, of any length) on the `old` side denotes a ref that doesn't exist yet
/// (creation), on the `new` side a ref that is about to be removed (deletion).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefUpdate {
    /// The object the ref currently points to.
    pub old: String,
    /// The object the ref should point to after the push.
    pub new: String,
    /// The full name of the ref, like `refs/heads/main`.
    pub refname: String,
}

impl RefUpdate {
    /// Parse a single record line.
    pub fn from_line(line: &str) -> Result<Self, Error> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [old, new, refname] = tokens.as_slice() else {
            return Err(Error::malformed(
                line,
                format!("expected 3 fields '<old> <new> <refname>', got {}", tokens.len()),
            ));
        };

        Ok(RefUpdate {
            old: (*old).to_owned(),
            new: (*new).to_owned(),
            refname: (*refname).to_owned(),
        })
    }

    /// The ref didn't exist before this push.
    pub fn is_create(&self) -> bool {
        is_null(&self.old)
    }

    /// The ref is removed by this push.
    pub fn is_delete(&self) -> bool {
        is_null(&self.new)
    }
}

/// All ref updates of one invocation, in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefUpdateList {
    updates: Vec<RefUpdate>,
}

impl RefUpdateList {
    pub fn new() -> Self {
        Self { updates: Vec::new() }
    }

    pub fn push(&mut self, update: RefUpdate) {
        self.updates.push(update);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefUpdate> {
        self.updates.iter()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Parse a complete payload, one record per `\n`.
    ///
    /// Empty lines and trailing `\r` are ignored. The first malformed record aborts parsing,
    /// so callers never see a partial list.
    pub fn parse_from_text(text: &str) -> Result<Self, Error> {
        let mut list = RefUpdateList::new();
        for raw_line in text.lines() {
            let line = raw_line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            list.push(RefUpdate::from_line(line)?);
        }
        Ok(list)
    }
}

impl<'a> IntoIterator for &'a RefUpdateList {
    type Item = &'a RefUpdate;
    type IntoIter = std::slice::Iter<'a, RefUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

fn is_null(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b == b'0')
}
