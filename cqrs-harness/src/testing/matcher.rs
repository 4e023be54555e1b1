use std::{fmt, rc::Rc};

use crate::Message;

use super::{MatchResult, TestResult};

type MatchFn<M> = Rc<dyn Fn(&TestResult<M>) -> MatchResult>;

/// A predicate over a [`TestResult`] that explains itself.
///
/// Matchers are built with the free functions of this module and composed
/// with [`all`], [`any`] and [`not`]. Evaluating a matcher never changes the
/// test result, so the same matcher can be reused across tests.
///
/// # Example
///
/// ```ignore
/// use cqrs_harness::testing::{all, event, event_type, not};
///
/// result.expect([
///     event(Declined { account_id: "A1".into(), amount: 1000 }),
///     not([event_type(Debited::default())]),
/// ]);
/// ```
pub struct Matcher<M: Message> {
    matcher: MatchFn<M>,
}

impl<M: Message> Matcher<M> {
    /// Build a matcher from a custom evaluation function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&TestResult<M>) -> MatchResult + 'static,
    {
        Self {
            matcher: Rc::new(f),
        }
    }

    pub fn evaluate(&self, result: &TestResult<M>) -> MatchResult {
        (self.matcher)(result)
    }
}

impl<M: Message> Clone for Matcher<M> {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
        }
    }
}

impl<M: Message> fmt::Debug for Matcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher").finish_non_exhaustive()
    }
}

/// Passes if every sub-matcher passes.
///
/// A single matcher is returned unchanged.
///
/// # Panics
///
/// Panics if `matchers` is empty.
pub fn all<M: Message>(matchers: impl IntoIterator<Item = Matcher<M>>) -> Matcher<M> {
    logical("all of", "all", matchers, true, |n, len| n == len)
}

/// Passes if at least one sub-matcher passes.
///
/// A single matcher is returned unchanged.
///
/// # Panics
///
/// Panics if `matchers` is empty.
pub fn any<M: Message>(matchers: impl IntoIterator<Item = Matcher<M>>) -> Matcher<M> {
    logical("any of", "at least 1", matchers, true, |n, _| n > 0)
}

/// Passes if none of the sub-matchers pass.
///
/// # Panics
///
/// Panics if `matchers` is empty.
pub fn not<M: Message>(matchers: impl IntoIterator<Item = Matcher<M>>) -> Matcher<M> {
    logical("none of", "none", matchers, false, |n, _| n == 0)
}

fn logical<M: Message>(
    title: &'static str,
    expected: &'static str,
    matchers: impl IntoIterator<Item = Matcher<M>>,
    collapse_single: bool,
    pred: fn(usize, usize) -> bool,
) -> Matcher<M> {
    let mut matchers: Vec<_> = matchers.into_iter().collect();
    assert!(
        !matchers.is_empty(),
        "'{title}' matcher requires at least one sub-matcher"
    );
    if collapse_single && matchers.len() == 1 {
        return matchers.remove(0);
    }

    Matcher::new(move |tr| {
        let mut result = MatchResult::new(title);
        let mut n = 0;
        for matcher in &matchers {
            let child = matcher.evaluate(tr);
            if child.passed() {
                n += 1;
            }
            result.append(child);
        }

        result.passed = pred(n, matchers.len());
        if !result.passed {
            result.message = format!(
                "{n} of {} sub-matchers passed, expected {expected}",
                matchers.len()
            );
        }
        result
    })
}
