use std::fmt;

use crate::{Comparator, Describer, Envelope, Message, logger::SharedLogger};

use super::{MatchResult, Matcher, Output, OutputQuery, all};

/// Everything observable about one tested message.
///
/// Returned by [`Engine::test_command`](crate::Engine::test_command) and
/// [`Engine::test_event`](crate::Engine::test_event). Holds the root
/// envelope, every envelope its dispatch produced (in production order), and
/// the comparison and description strategies the engine was configured with.
///
/// # Example
///
/// ```ignore
/// let result = engine.test_command(OpenAccount { account_id: "A1".into(), name: "Bob".into() })?;
///
/// result.expect([event(AccountOpened { account_id: "A1".into(), name: "Bob".into() })]);
///
/// // Or inspect the output directly
/// assert_eq!(result.query().events().count(), 1);
/// ```
pub struct TestResult<M: Message> {
    envelope: Envelope<M>,
    output: Output<M>,
    comparator: Comparator<M>,
    describer: Describer<M>,
    logger: SharedLogger,
    color: bool,
}

impl<M: Message> TestResult<M> {
    pub(crate) fn new(
        envelope: Envelope<M>,
        output: Vec<Envelope<M>>,
        comparator: Comparator<M>,
        describer: Describer<M>,
        logger: SharedLogger,
        color: bool,
    ) -> Self {
        Self {
            envelope,
            output: Output::new(output),
            comparator,
            describer,
            logger,
            color,
        }
    }

    /// The envelope of the message under test.
    pub fn envelope(&self) -> &Envelope<M> {
        &self.envelope
    }

    /// Every envelope produced while handling the message, in production
    /// order. Does not include [`envelope`](Self::envelope).
    pub fn output(&self) -> &[Envelope<M>] {
        &self.output
    }

    /// Compare two messages with the engine's comparator.
    pub fn compare(&self, a: &M, b: &M) -> bool {
        self.comparator.compare(a, b)
    }

    /// Render a message with the engine's describer.
    pub fn describe(&self, message: &M) -> String {
        self.describer.describe(message)
    }

    pub(crate) fn color(&self) -> bool {
        self.color
    }

    #[cfg(test)]
    pub(crate) fn with_logger(mut self, logger: impl crate::Logger + 'static) -> Self {
        self.logger = std::rc::Rc::new(logger);
        self
    }

    /// Start a query over the output.
    pub fn query(&self) -> OutputQuery<M> {
        OutputQuery::new(self.output.clone())
    }

    /// Evaluate the matchers as if combined with [`all`] and return the report.
    ///
    /// # Panics
    ///
    /// Panics if `matchers` is empty.
    pub fn check(&self, matchers: impl IntoIterator<Item = Matcher<M>>) -> MatchResult {
        all(matchers).evaluate(self)
    }

    /// Evaluate the matchers, log the report and fail the test unless all pass.
    ///
    /// # Panics
    ///
    /// Panics with the rendered report if any matcher fails, or if
    /// `matchers` is empty.
    #[track_caller]
    pub fn expect(&self, matchers: impl IntoIterator<Item = Matcher<M>>) {
        let result = self.check(matchers);
        self.logger.log(&report(&result, self.color));
        if !result.passed() {
            panic!("{}", report(&result, false));
        }
    }

    /// Log one line per output envelope.
    ///
    /// Useful while writing a test, to see what the handlers actually did.
    pub fn dump(&self) {
        self.logger.log(&format!(
            "#{} {} {}",
            self.envelope.id(),
            self.envelope.class(),
            self.envelope.message_type()
        ));
        for envelope in self.output.iter() {
            self.logger.log(&format!(
                "#{} {} {} (caused by #{}, from '{}')",
                envelope.id(),
                envelope.class(),
                envelope.message_type(),
                envelope.causation_id(),
                envelope.handler().map(|h| h.as_str()).unwrap_or("?"),
            ));
        }
    }
}

fn report(result: &MatchResult, color: bool) -> String {
    let heading = if result.passed() {
        "expectation passed:\n"
    } else {
        "expectation failed:\n"
    };
    format!("{heading}{}", result.render(color))
}

impl<M: Message> fmt::Debug for TestResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResult")
            .field("envelope", &self.envelope)
            .field("output", &self.output.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        MessageClass,
        fixtures::{AccountOpened, Bank, result_with},
        testing::{event, event_type},
    };

    fn opened() -> AccountOpened {
        AccountOpened {
            account_id: "A1".into(),
            name: "Bob".into(),
        }
    }

    #[test]
    fn check_combines_matchers_with_all() {
        let tr = result_with(vec![(Bank::from(opened()), MessageClass::Event)]);
        let result = tr.check([event(opened()), event_type(opened())]);
        assert!(result.passed());
        assert_eq!(result.title(), "all of");
    }

    #[test]
    fn expect_logs_report_when_passing() {
        let lines = Rc::new(RefCell::new(Vec::<String>::new()));
        let tr = {
            let lines = lines.clone();
            result_with(vec![(Bank::from(opened()), MessageClass::Event)])
                .with_logger(move |line: &str| lines.borrow_mut().push(line.to_owned()))
        };

        tr.expect([event(opened())]);

        let lines = lines.borrow();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("expectation passed:\n✓ record specific 'AccountOpened' event"));
    }

    #[test]
    #[should_panic(expected = "expectation failed:\n✗ record specific 'AccountOpened' event")]
    fn expect_panics_with_report_when_failing() {
        let tr = result_with(vec![]);
        tr.expect([event(opened())]);
    }

    #[test]
    fn dump_lists_output() {
        let lines = Rc::new(RefCell::new(Vec::<String>::new()));
        let tr = {
            let lines = lines.clone();
            result_with(vec![(Bank::from(opened()), MessageClass::Event)])
                .with_logger(move |line: &str| lines.borrow_mut().push(line.to_owned()))
        };
        tr.dump();
        assert_eq!(
            *lines.borrow(),
            vec![
                "#1 command OpenAccount".to_owned(),
                "#2 event AccountOpened (caused by #1, from 'test')".to_owned(),
            ]
        );
    }
}
