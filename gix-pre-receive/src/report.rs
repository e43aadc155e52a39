//! The text protocol a pushing client sees when ref updates are denied.
//!
//! Every denied ref update becomes one framed block:
//!
//! ```text
//!
//! *******************************************************
//! *
//! *  <message>
//! *
//! *******************************************************
//!
//! ```
//!
//! Passing updates produce no output. Blocks are kept in memory until the invocation is complete
//! so a fatal error never leaves half a report behind.

use std::io::{self, Write};

/// Upper and lower frame of each block.
pub const BORDER: &str = "*******************************************************";

/// The messages reported for a single denied ref update.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// The ref the messages are about. It is not part of the rendered output.
    pub refname: String,
    pub messages: Vec<String>,
}

impl Block {
    /// Write this block in its framed form.
    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{BORDER}")?;
        writeln!(out, "*")?;
        for message in &self.messages {
            writeln!(out, "*  {message}")?;
        }
        writeln!(out, "*")?;
        writeln!(out, "{BORDER}")?;
        writeln!(out)
    }
}

/// Everything one invocation has to say, in the order ref updates were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionReport {
    blocks: Vec<Block>,
}

impl DecisionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the update of `refname` was denied for `messages`, which marks the invocation as failed.
    pub fn reject(&mut self, refname: impl Into<String>, messages: Vec<String>) {
        self.blocks.push(Block {
            refname: refname.into(),
            messages,
        });
    }

    /// `true` if any ref update was denied, in which case none of them may be applied.
    pub fn is_failed(&self) -> bool {
        !self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Write all blocks to `out` and flush it.
    pub fn write_to(&self, mut out: impl Write) -> io::Result<()> {
        for block in &self.blocks {
            block.write_to(&mut out)?;
        }
        out.flush()
    }

    /// Render all blocks into a string.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        self.write_to(&mut buf).expect("writing to a Vec never fails");
        String::from_utf8(buf).expect("all parts are valid UTF-8")
    }
}
