use crate::{Envelope, Message, MessageClass, MessageType, Similarity};

use super::{MatchResult, Matcher, TestResult, render};

/// Passes if an equal command was executed.
///
/// Equality is decided by the engine's [`Comparator`](crate::Comparator).
pub fn command<M: Message>(command: impl Into<M>) -> Matcher<M> {
    message_matcher(command.into(), MessageClass::Command)
}

/// Passes if an equal event was recorded.
///
/// Equality is decided by the engine's [`Comparator`](crate::Comparator).
pub fn event<M: Message>(event: impl Into<M>) -> Matcher<M> {
    message_matcher(event.into(), MessageClass::Event)
}

/// Passes if any command of the same type as `sample` was executed.
pub fn command_type<M: Message>(sample: impl Into<M>) -> Matcher<M> {
    type_matcher(sample.into().message_type(), MessageClass::Command)
}

/// Passes if any event of the same type as `sample` was recorded.
pub fn event_type<M: Message>(sample: impl Into<M>) -> Matcher<M> {
    type_matcher(sample.into().message_type(), MessageClass::Event)
}

fn message_matcher<M: Message>(expected: M, class: MessageClass) -> Matcher<M> {
    let expected_type = expected.message_type();
    let title = match class {
        MessageClass::Command => format!("execute specific '{expected_type}' command"),
        MessageClass::Event => format!("record specific '{expected_type}' event"),
    };

    Matcher::new(move |tr| {
        let mut result = MatchResult::new(title.clone()).with_details(tr.describe(&expected));

        let mut best: Option<&Envelope<M>> = None;
        let mut best_similarity = Similarity::UNRELATED;
        let mut best_equal = false;

        for envelope in tr.output() {
            if tr.compare(&expected, envelope.message()) {
                if envelope.class() == class {
                    result.passed = true;
                    return result;
                }
                if !best_equal {
                    best = Some(envelope);
                    best_similarity = Similarity::SAME;
                    best_equal = true;
                }
                continue;
            }

            let similarity = expected_type.similarity(&envelope.message_type());
            if similarity > best_similarity {
                best = Some(envelope);
                best_similarity = similarity;
            }
        }

        result.message = format!("this {class} was not {}", class.verb());

        let Some(best) = best else {
            return result;
        };

        if best_equal {
            result.hint = wrong_class_hint(class, best.class(), "This message", false);
            return result;
        }

        result.hint = if best_similarity.is_same() {
            if best.class() == class {
                String::new()
            } else {
                wrong_class_hint(class, best.class(), "A similar message", false)
            }
        } else if best.class() == class {
            "Check the type of the message.".to_owned()
        } else {
            wrong_class_hint(class, best.class(), "A message of a similar type", false)
        };

        result.details = render::diff(&result.details, &tr.describe(best.message()), tr.color());
        result
    })
}

fn type_matcher<M: Message>(expected: MessageType, class: MessageClass) -> Matcher<M> {
    let title = match class {
        MessageClass::Command => format!("execute any '{expected}' command"),
        MessageClass::Event => format!("record any '{expected}' event"),
    };

    Matcher::new(move |tr| {
        let mut result = MatchResult::new(title.clone());

        let mut best: Option<(MessageType, MessageClass)> = None;
        let mut best_similarity = Similarity::UNRELATED;

        for envelope in tr.output() {
            let actual = envelope.message_type();
            let similarity = expected.similarity(&actual);

            if similarity.is_same() && envelope.class() == class {
                result.passed = true;
                return result;
            }

            if similarity > best_similarity {
                best = Some((actual, envelope.class()));
                best_similarity = similarity;
            }
        }

        result.message = match class {
            MessageClass::Command => "no commands of this type were executed".to_owned(),
            MessageClass::Event => "no events of this type were recorded".to_owned(),
        };

        let Some((actual, actual_class)) = best else {
            return result;
        };

        if best_similarity.is_same() {
            result.hint = wrong_class_hint(class, actual_class, "A message of this type", true);
            return result;
        }

        result.hint = if actual_class == class {
            "Check the type of the message.".to_owned()
        } else {
            wrong_class_hint(class, actual_class, "A message of a similar type", true)
        };
        result.details = render::diff(&expected.to_string(), &actual.to_string(), tr.color());
        result
    })
}

/// Hint for a candidate found under the other class.
///
/// `subject` describes the candidate, `by_type` selects the type matchers'
/// names over the message matchers'.
fn wrong_class_hint(
    expected: MessageClass,
    actual: MessageClass,
    subject: &str,
    by_type: bool,
) -> String {
    debug_assert_ne!(expected, actual);
    let (suggested, used) = match (actual, by_type) {
        (MessageClass::Command, false) => ("command()", "event()"),
        (MessageClass::Event, false) => ("event()", "command()"),
        (MessageClass::Command, true) => ("command_type()", "event_type()"),
        (MessageClass::Event, true) => ("event_type()", "command_type()"),
    };
    let as_class = match actual {
        MessageClass::Command => "as a command",
        MessageClass::Event => "as an event",
    };
    format!(
        "{subject} was {} {as_class}, did you mean to use the {suggested} matcher instead of {used}?",
        actual.verb()
    )
}
