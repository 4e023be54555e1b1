use std::{collections::HashSet, fmt, rc::Rc};

use crate::{Envelope, HandlerName, Message, MessageClass, MessageId, MessageType};

use super::Output;

type Filter<M> = Rc<dyn Fn(&Envelope<M>) -> bool>;

/// A composable query over the envelopes a test produced.
///
/// Filters narrow the output; terminal operations inspect what is left.
/// Queries are cheap to clone and never change the underlying result.
///
/// # Example
///
/// ```ignore
/// let debits = result.query()
///     .commands()
///     .of::<Debit>()
///     .produced_by("transfer")
///     .count();
///
/// let tree = result.query().descendants_of(opened.id()).messages();
/// ```
#[derive(Clone)]
pub struct OutputQuery<M: Message> {
    output: Output<M>,
    filters: Vec<Filter<M>>,
}

impl<M: Message> fmt::Debug for OutputQuery<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputQuery")
            .field("envelopes", &self.output.len())
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl<M: Message> OutputQuery<M> {
    pub(crate) fn new(output: Output<M>) -> Self {
        Self {
            output,
            filters: Vec::new(),
        }
    }

    fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Envelope<M>) -> bool + 'static,
    {
        self.filters.push(Rc::new(filter));
        self
    }

    fn apply_filters(&self) -> impl Iterator<Item = &Envelope<M>> {
        self.output
            .iter()
            .filter(|e| self.filters.iter().all(|f| f(e)))
    }

    // ==================== Filters ====================

    /// Only executed commands.
    pub fn commands(self) -> Self {
        self.of_class(MessageClass::Command)
    }

    /// Only recorded events.
    pub fn events(self) -> Self {
        self.of_class(MessageClass::Event)
    }

    pub fn of_class(self, class: MessageClass) -> Self {
        self.add_filter(move |e| e.class() == class)
    }

    /// Only messages of exactly this type.
    pub fn of_type(self, message_type: MessageType) -> Self {
        self.add_filter(move |e| e.message_type() == message_type)
    }

    /// Only messages of type `T`.
    pub fn of<T: ?Sized>(self) -> Self {
        self.of_type(MessageType::of::<T>())
    }

    /// Only direct children of the envelope with the given ID.
    pub fn caused_by(self, id: MessageId) -> Self {
        self.add_filter(move |e| e.causation_id() == id)
    }

    /// Only envelopes in the causal chain started by the given root.
    pub fn correlated_with(self, id: MessageId) -> Self {
        self.add_filter(move |e| e.correlation_id() == id)
    }

    /// Only envelopes that descend, directly or not, from the given envelope.
    pub fn descendants_of(self, id: MessageId) -> Self {
        let mut ancestors = HashSet::from([id]);
        for envelope in self.output.iter() {
            if ancestors.contains(&envelope.causation_id()) {
                ancestors.insert(envelope.id());
            }
        }
        ancestors.remove(&id);
        self.add_filter(move |e| ancestors.contains(&e.id()))
    }

    /// Only envelopes produced by the named handler.
    pub fn produced_by(self, handler: impl Into<HandlerName>) -> Self {
        let handler = handler.into();
        self.add_filter(move |e| e.handler() == Some(&handler))
    }

    /// Only envelopes satisfying a custom predicate.
    pub fn matching<F>(self, predicate: F) -> Self
    where
        F: Fn(&Envelope<M>) -> bool + 'static,
    {
        self.add_filter(predicate)
    }

    /// Only envelopes whose message satisfies a predicate.
    pub fn matching_message<F>(self, predicate: F) -> Self
    where
        F: Fn(&M) -> bool + 'static,
    {
        self.add_filter(move |e| predicate(e.message()))
    }

    // ==================== Terminal Operations ====================

    pub fn count(&self) -> usize {
        self.apply_filters().count()
    }

    pub fn is_empty(&self) -> bool {
        self.apply_filters().next().is_none()
    }

    pub fn exists(&self) -> bool {
        !self.is_empty()
    }

    pub fn first(&self) -> Option<Envelope<M>> {
        self.apply_filters().next().cloned()
    }

    pub fn last(&self) -> Option<Envelope<M>> {
        self.apply_filters().last().cloned()
    }

    /// The nth matching envelope (0-indexed).
    pub fn nth(&self, index: usize) -> Option<Envelope<M>> {
        self.apply_filters().nth(index).cloned()
    }

    pub fn collect(&self) -> Vec<Envelope<M>> {
        self.apply_filters().cloned().collect()
    }

    /// The payloads of the matching envelopes.
    pub fn messages(&self) -> Vec<M> {
        self.apply_filters().map(|e| e.message().clone()).collect()
    }

    pub fn ids(&self) -> Vec<MessageId> {
        self.apply_filters().map(Envelope::id).collect()
    }

    /// True if every matching envelope satisfies the predicate.
    pub fn all(&self, predicate: impl Fn(&Envelope<M>) -> bool) -> bool {
        self.apply_filters().all(predicate)
    }

    /// True if any matching envelope satisfies the predicate.
    pub fn any(&self, predicate: impl Fn(&Envelope<M>) -> bool) -> bool {
        self.apply_filters().any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        AccountOpened, Bank, Credited, Debit, Debited, OpenAccount, result_with_tree,
    };

    fn debited(amount: u64) -> Bank {
        Bank::from(Debited {
            account_id: "A1".into(),
            amount,
            transfer_id: None,
        })
    }

    fn credited(amount: u64) -> Bank {
        Bank::from(Credited {
            account_id: "A2".into(),
            amount,
        })
    }

    fn debit(amount: u64) -> Bank {
        Bank::from(Debit {
            account_id: "A1".into(),
            amount,
            transfer_id: None,
        })
    }

    // root #1
    //  ├─ #2 Debited(5)   (event)
    //  │   └─ #4 Debit(1) (command)
    //  │       └─ #5 Debited(1) (event)
    //  └─ #3 Credited(5)  (event)
    fn sample() -> OutputQuery<Bank> {
        result_with_tree(vec![
            (1, debited(5), MessageClass::Event, "account"),
            (1, credited(5), MessageClass::Event, "account"),
            (2, debit(1), MessageClass::Command, "transfer"),
            (4, debited(1), MessageClass::Event, "account"),
        ])
        .query()
    }

    #[test]
    fn filters_by_class() {
        assert_eq!(sample().events().count(), 3);
        assert_eq!(sample().commands().count(), 1);
    }

    #[test]
    fn filters_by_type() {
        assert_eq!(sample().of::<Debited>().count(), 2);
        assert_eq!(sample().of_type(MessageType::of::<Credited>()).count(), 1);
        assert!(sample().of::<AccountOpened>().is_empty());
        assert!(sample().of::<OpenAccount>().is_empty());
    }

    #[test]
    fn filters_by_causation() {
        let ids = sample().caused_by(MessageId::from(1)).ids();
        assert_eq!(ids, vec![MessageId::from(2), MessageId::from(3)]);
    }

    #[test]
    fn descendants_follow_the_tree() {
        let ids = sample().descendants_of(MessageId::from(2)).ids();
        assert_eq!(ids, vec![MessageId::from(4), MessageId::from(5)]);
        assert_eq!(sample().descendants_of(MessageId::from(1)).count(), 4);
        assert!(sample().descendants_of(MessageId::from(3)).is_empty());
    }

    #[test]
    fn correlation_covers_whole_dispatch() {
        assert_eq!(sample().correlated_with(MessageId::from(1)).count(), 4);
        assert!(sample().correlated_with(MessageId::from(9)).is_empty());
    }

    #[test]
    fn filters_by_handler() {
        assert_eq!(sample().produced_by("transfer").messages(), vec![debit(1)]);
        assert_eq!(sample().produced_by("account").count(), 3);
    }

    #[test]
    fn filters_compose() {
        let q = sample().events().produced_by("account").matching_message(|m| *m == debited(1));
        assert_eq!(q.count(), 1);
        assert_eq!(q.first().map(|e| e.id()), Some(MessageId::from(5)));
    }

    #[test]
    fn positional_terminals() {
        let q = sample();
        assert_eq!(q.first().map(|e| e.id()), Some(MessageId::from(2)));
        assert_eq!(q.last().map(|e| e.id()), Some(MessageId::from(5)));
        assert_eq!(q.nth(1).map(|e| e.id()), Some(MessageId::from(3)));
        assert!(q.nth(10).is_none());
        assert_eq!(q.collect().len(), 4);
    }

    #[test]
    fn predicates() {
        let q = sample();
        assert!(q.any(|e| e.class().is_command()));
        assert!(!q.all(|e| e.class().is_command()));
        assert!(q.clone().events().all(|e| e.class().is_event()));
        assert!(q.matching(|e| e.meta().depth() == 3).exists());
    }
}
