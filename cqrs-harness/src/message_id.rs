use std::fmt;

/// Identifier of a message dispatched by an [`Engine`](crate::Engine).
///
/// IDs are allocated from the engine's [`MessageIdSequence`], so they are
/// strictly increasing in allocation order and never reused within one
/// engine. Two engines hand out overlapping IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId(u64);

impl MessageId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MessageId {
    fn from(value: u64) -> Self {
        MessageId(value)
    }
}

impl From<MessageId> for u64 {
    fn from(value: MessageId) -> Self {
        value.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of [`MessageId`]s, starting at 1.
///
/// Every engine owns exactly one sequence. It survives
/// [`Engine::reset`](crate::Engine::reset), so IDs stay unique for the
/// lifetime of the engine.
#[derive(Debug, Default)]
pub struct MessageIdSequence {
    last: u64,
}

impl MessageIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next ID.
    pub fn allocate(&mut self) -> MessageId {
        self.last += 1;
        MessageId(self.last)
    }

    /// The most recently allocated ID, if any.
    pub fn last(&self) -> Option<MessageId> {
        (self.last > 0).then_some(MessageId(self.last))
    }
}
