//! Grammar extensions: traits, priorities and the slot set.
//!
//! An extension is an ordinary value implementing [`BlockExtension`] or
//! [`InlineExtension`]. It is handed the shared parser at a block start (or
//! inline position), inspects tokens, and either pushes its node events and
//! reports [`Attempt::Matched`], or reports [`Attempt::NoMatch`] without
//! consuming anything.
//!
//! Every attempt runs behind a checkpoint. An attempt that returns an error,
//! panics, or claims a match without consuming input is treated as a no-match:
//! the parser is rewound and the next rule is tried.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ExtensionError;
use crate::parser::Parser;

/// Outcome of an extension attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Input was consumed and node events were pushed.
    Matched,
    /// Nothing here for this extension.
    NoMatch,
}

/// Ordering weight of a rule. Higher runs first.
///
/// Base rules run at [`Priority::BASE`]. At equal priority base rules go
/// before extensions, and extensions keep their registration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub i16);

impl Priority {
    pub const BASE: Priority = Priority(0);
    pub const HIGH: Priority = Priority(100);
    pub const LOW: Priority = Priority(-100);
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parser for a block-level construct.
pub trait BlockExtension: Send + Sync {
    /// Unique, human-readable name, used in logs and configuration.
    fn name(&self) -> &str;

    /// Names of every node kind this extension may produce.
    fn emits(&self) -> &[&str];

    /// Try to parse a block at the cursor, which is at a line start.
    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError>;

    /// Whether this construct may start on the line right after paragraph
    /// text, closing the paragraph.
    fn interrupts_paragraph(&self, _p: &Parser<'_, '_>) -> bool {
        false
    }
}

/// A parser for an inline construct.
pub trait InlineExtension: Send + Sync {
    fn name(&self) -> &str;

    fn emits(&self) -> &[&str];

    /// Try to parse an inline element at the cursor. Should not consume the
    /// line's NEWLINE.
    fn attempt(&self, p: &mut Parser<'_, '_>) -> Result<Attempt, ExtensionError>;
}

pub(crate) struct BlockSlot {
    pub(crate) extension: Box<dyn BlockExtension>,
    pub(crate) priority: Priority,
}

pub(crate) struct InlineSlot {
    pub(crate) extension: Box<dyn InlineExtension>,
    pub(crate) priority: Priority,
}

/// Block and inline extensions with their priorities, in registration order.
#[derive(Default)]
pub struct ExtensionSlots {
    block: Vec<BlockSlot>,
    inline: Vec<InlineSlot>,
}

impl ExtensionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block(&mut self, extension: impl BlockExtension + 'static, priority: Priority) -> &mut Self {
        self.block_boxed(Box::new(extension), priority)
    }

    pub fn block_boxed(&mut self, extension: Box<dyn BlockExtension>, priority: Priority) -> &mut Self {
        self.block.push(BlockSlot {
            extension,
            priority,
        });
        self
    }

    pub fn inline(&mut self, extension: impl InlineExtension + 'static, priority: Priority) -> &mut Self {
        self.inline_boxed(Box::new(extension), priority)
    }

    pub fn inline_boxed(
        &mut self,
        extension: Box<dyn InlineExtension>,
        priority: Priority,
    ) -> &mut Self {
        self.inline.push(InlineSlot {
            extension,
            priority,
        });
        self
    }

    /// Names and priorities of all extensions, block slots first.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Priority)> {
        let block = self
            .block
            .iter()
            .map(|s| (s.extension.name(), s.priority));
        let inline = self
            .inline
            .iter()
            .map(|s| (s.extension.name(), s.priority));
        block.chain(inline)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries().any(|(n, _)| n == name)
    }

    /// Keep only the extensions whose name passes `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.block.retain(|s| keep(s.extension.name()));
        self.inline.retain(|s| keep(s.extension.name()));
    }

    /// Change the priority of the extension called `name`.
    ///
    /// Returns whether such an extension exists.
    pub fn set_priority(&mut self, name: &str, priority: Priority) -> bool {
        let mut found = false;
        for slot in self.block.iter_mut().filter(|s| s.extension.name() == name) {
            slot.priority = priority;
            found = true;
        }
        for slot in self.inline.iter_mut().filter(|s| s.extension.name() == name) {
            slot.priority = priority;
            found = true;
        }
        found
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.inline.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<BlockSlot>, Vec<InlineSlot>) {
        (self.block, self.inline)
    }
}

impl fmt::Debug for ExtensionSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}

/// Run one attempt behind a checkpoint, coercing every kind of failure to a
/// no-match. Returns whether the attempt matched.
///
/// While the attempt runs, [`Parser::kind`] resolves only the names in
/// `emits`.
fn guarded<'t, 'input>(
    p: &mut Parser<'t, 'input>,
    name: &str,
    emits: &'t [&'t str],
    attempt: impl FnOnce(&mut Parser<'t, 'input>) -> Result<Attempt, ExtensionError>,
) -> bool {
    let checkpoint = p.checkpoint();
    let outer = p.scope_kinds(Some(emits));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| attempt(&mut *p)));
    p.scope_kinds(outer);

    match outcome {
        Ok(Ok(Attempt::Matched)) if p.progressed_since(&checkpoint) => return true,
        Ok(Ok(Attempt::Matched)) => {
            debug!("extension `{name}` matched without consuming input at {:?}", p.offset());
        }
        Ok(Ok(Attempt::NoMatch)) => {}
        Ok(Err(err)) => {
            debug!("extension `{name}` failed at {:?}: {err}", p.offset());
        }
        Err(_) => {
            warn!("extension `{name}` panicked; treating as no match");
        }
    }

    p.rewind(checkpoint);
    false
}

pub(crate) fn attempt_block<'t>(p: &mut Parser<'t, '_>, extension: &'t dyn BlockExtension) -> bool {
    guarded(p, extension.name(), extension.emits(), |p| extension.attempt(p))
}

pub(crate) fn attempt_inline<'t>(p: &mut Parser<'t, '_>, extension: &'t dyn InlineExtension) -> bool {
    guarded(p, extension.name(), extension.emits(), |p| extension.attempt(p))
}

pub(crate) fn interrupts_paragraph(p: &Parser<'_, '_>, extension: &dyn BlockExtension) -> bool {
    panic::catch_unwind(AssertUnwindSafe(|| extension.interrupts_paragraph(p))).unwrap_or_else(
        |_| {
            warn!(
                "extension `{}` panicked while checking for paragraph interruption",
                extension.name()
            );
            false
        },
    )
}
