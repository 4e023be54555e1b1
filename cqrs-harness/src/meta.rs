use std::{fmt, hash};

use crate::{HandlerName, MessageClass, MessageId, MessageIdSequence};

/// Metadata attached to every [`Envelope`](crate::Envelope).
///
/// - `id`: allocated from the engine's [`MessageIdSequence`], strictly increasing.
/// - `causation_id`: the envelope whose handling produced this one, or `id`
///   itself for a root.
/// - `correlation_id`: the root of the causal chain. Shared by every envelope
///   produced while dispatching one root.
/// - `class`: whether the payload was executed as a command or recorded as an event.
/// - `handler`: the handler that produced the envelope, `None` for roots.
/// - `depth`: number of causal hops from the root.
#[derive(Debug, Clone, PartialEq, Eq, hash::Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    id: MessageId,
    causation_id: MessageId,
    correlation_id: MessageId,
    class: MessageClass,
    handler: Option<HandlerName>,
    depth: usize,
}

impl Meta {
    pub(crate) fn root(class: MessageClass, sequence: &mut MessageIdSequence) -> Self {
        let id = sequence.allocate();
        Self {
            id,
            causation_id: id,
            correlation_id: id,
            class,
            handler: None,
            depth: 0,
        }
    }

    pub(crate) fn child(
        parent: &Meta,
        class: MessageClass,
        handler: HandlerName,
        sequence: &mut MessageIdSequence,
    ) -> Self {
        Self {
            id: sequence.allocate(),
            causation_id: parent.id,
            correlation_id: parent.correlation_id,
            class,
            handler: Some(handler),
            depth: parent.depth + 1,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn causation_id(&self) -> MessageId {
        self.causation_id
    }

    pub fn correlation_id(&self) -> MessageId {
        self.correlation_id
    }

    pub fn class(&self) -> MessageClass {
        self.class
    }

    /// The handler that produced this envelope. `None` for roots.
    pub fn handler(&self) -> Option<&HandlerName> {
        self.handler.as_ref()
    }

    /// Causal hops from the root (0 for a root).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// True if this envelope started its causal chain.
    pub fn is_root(&self) -> bool {
        self.id == self.causation_id
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Meta {{ id: {}, class: {}, causation_id: {}, correlation_id: {}",
            self.id, self.class, self.causation_id, self.correlation_id,
        )?;
        if let Some(handler) = &self.handler {
            write!(f, ", handler: {}", handler)?;
        }
        write!(f, "}}")
    }
}
