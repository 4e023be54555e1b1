use std::{fmt, hash};

use crate::{HandlerName, Message, MessageClass, MessageId, MessageIdSequence, MessageType, Meta};

/// A message together with its causal metadata.
///
/// Every message the [`Engine`](crate::Engine) dispatches travels as an
/// `Envelope`: the root a test hands in, and every command or event a handler
/// produces while it is handled. Envelopes are immutable once created.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "M: serde::Serialize",
        deserialize = "M: serde::de::DeserializeOwned"
    ))
)]
pub struct Envelope<M> {
    meta: Meta,
    message: M,
}

impl<M> Envelope<M> {
    /// Wrap a message that starts a new causal chain.
    ///
    /// The ID, causation ID and correlation ID are all set to the next ID of
    /// the sequence.
    pub fn new_root(message: M, class: MessageClass, sequence: &mut MessageIdSequence) -> Self {
        Self {
            meta: Meta::root(class, sequence),
            message,
        }
    }

    /// Wrap a message produced by `handler` while handling `self`.
    ///
    /// The child gets a fresh ID, `self`'s ID as causation ID and inherits
    /// `self`'s correlation ID.
    pub fn new_child(
        &self,
        message: M,
        class: MessageClass,
        handler: HandlerName,
        sequence: &mut MessageIdSequence,
    ) -> Self {
        Self {
            meta: Meta::child(&self.meta, class, handler, sequence),
            message,
        }
    }

    /// Returns a reference to the message payload.
    ///
    /// # Example
    ///
    /// ```ignore
    /// if let Bank::AccountOpened(opened) = envelope.message() {
    ///     assert_eq!(opened.name, "Bob");
    /// }
    /// ```
    #[inline]
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Returns the causal metadata.
    #[inline]
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Shorthand for `self.meta().id()`.
    #[inline]
    pub fn id(&self) -> MessageId {
        self.meta.id()
    }

    #[inline]
    pub fn causation_id(&self) -> MessageId {
        self.meta.causation_id()
    }

    #[inline]
    pub fn correlation_id(&self) -> MessageId {
        self.meta.correlation_id()
    }

    #[inline]
    pub fn class(&self) -> MessageClass {
        self.meta.class()
    }

    /// Shorthand for `self.meta().handler()`.
    #[inline]
    pub fn handler(&self) -> Option<&HandlerName> {
        self.meta.handler()
    }

    pub fn into_message(self) -> M {
        self.message
    }
}

impl<M: Message> Envelope<M> {
    /// Shorthand for `self.message().message_type()`.
    pub fn message_type(&self) -> MessageType {
        self.message.message_type()
    }
}

impl<M: PartialEq> PartialEq for Envelope<M> {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta && self.message == other.message
    }
}

impl<M: Eq> Eq for Envelope<M> {}

impl<M: hash::Hash> hash::Hash for Envelope<M> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.meta.id().hash(state);
        self.message.hash(state);
    }
}

impl<M: fmt::Debug> fmt::Debug for Envelope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("id", &self.meta.id())
            .field("class", &self.meta.class())
            .field("causation_id", &self.meta.causation_id())
            .field("correlation_id", &self.meta.correlation_id())
            .field("handler", &self.meta.handler())
            .field("message", &self.message)
            .finish()
    }
}

impl<M: fmt::Display> fmt::Display for Envelope<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope {{ id: {}, {}: {} }}",
            self.meta.id(),
            self.meta.class(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Note(&'static str);

    #[test]
    fn root_ids_are_identical() {
        let mut seq = MessageIdSequence::new();
        let root = Envelope::new_root(Note("open"), MessageClass::Command, &mut seq);

        assert_eq!(root.id(), MessageId::from(1));
        assert_eq!(root.causation_id(), root.id());
        assert_eq!(root.correlation_id(), root.id());
        assert!(root.meta().is_root());
        assert_eq!(root.meta().depth(), 0);
        assert!(root.handler().is_none());
    }

    #[test]
    fn child_links_to_parent_and_root() {
        let mut seq = MessageIdSequence::new();
        let root = Envelope::new_root(Note("open"), MessageClass::Command, &mut seq);
        let child = root.new_child(Note("opened"), MessageClass::Event, "account".into(), &mut seq);
        let grandchild =
            child.new_child(Note("notify"), MessageClass::Command, "notifier".into(), &mut seq);

        assert_eq!(child.id(), MessageId::from(2));
        assert_eq!(child.causation_id(), root.id());
        assert_eq!(child.correlation_id(), root.id());
        assert_eq!(child.handler().map(HandlerName::as_str), Some("account"));

        assert_eq!(grandchild.causation_id(), child.id());
        assert_eq!(grandchild.correlation_id(), root.id());
        assert_eq!(grandchild.meta().depth(), 2);
        assert!(!grandchild.meta().is_root());
    }

    #[test]
    fn envelope_debug() {
        let mut seq = MessageIdSequence::new();
        let envelope = Envelope::new_root(Note("hello"), MessageClass::Event, &mut seq);
        let debug_str = format!("{:?}", envelope);

        assert!(debug_str.contains("Note"));
        assert!(debug_str.contains("hello"));
        assert!(debug_str.contains("Event"));
    }
}
