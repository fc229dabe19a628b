//! Severity-bucketed result log.
//!
//! A [`ResultLog`] is the per-run output of a monitoring module and also the
//! aggregate of many runs. It keeps one ordered bucket of message texts per
//! [`Severity`]; messages are appended and never dropped.
//!
//! Logs merge with [`ResultLog::combine`], a bucket-wise concatenation. With
//! [`ResultLog::empty`] as identity this forms a monoid, so folding any
//! number of module results is order-preserving and seed-independent:
//!
//! ```rust
//! use devmon_core::{ResultLog, Severity};
//!
//! let mut ping = ResultLog::empty();
//! ping.log(Severity::Ok, "ping succeeded");
//!
//! let mut latency = ResultLog::empty();
//! latency.log(Severity::Warning, "high latency");
//!
//! let total: ResultLog = vec![ping, latency].into_iter().collect();
//! assert_eq!(total.worst_message().severity, Severity::Warning);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ResultError;
use crate::severity::Severity;

/// A single leveled message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Level the message was logged at
    pub severity: Severity,
    /// Message text, possibly empty
    pub text: String,
}

impl Message {
    /// Message at `severity`.
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    /// Color token of the message's severity.
    pub fn color(&self) -> &'static str {
        self.severity.color()
    }

    /// Description of the message's severity.
    pub fn description(&self) -> &'static str {
        self.severity.description()
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)
    }
}

/// Per-run collection of messages, bucketed by severity.
///
/// Serializes as a map from severity label to message list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<Severity, Vec<String>>",
    from = "BTreeMap<Severity, Vec<String>>"
)]
pub struct ResultLog {
    buckets: [Vec<String>; Severity::COUNT],
}

impl ResultLog {
    /// The empty log, identity element of [`combine`](Self::combine).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a message to the bucket for `severity`.
    pub fn log(&mut self, severity: Severity, message: impl Into<String>) {
        self.buckets[severity.index()].push(message.into());
    }

    /// Merge `other` into this log, bucket by bucket, this-then-other.
    ///
    /// Returns `self` so folds can chain. Combining with the empty log
    /// leaves this log unchanged.
    pub fn combine(&mut self, other: ResultLog) -> &mut Self {
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets) {
            mine.extend(theirs);
        }
        self
    }

    /// Merge a log received in serialized form.
    ///
    /// `null` is the identity and leaves this log unchanged; a value that is
    /// not a serialized log is rejected with [`ResultError::InvalidArgument`]
    /// and this log is left untouched.
    pub fn combine_value(&mut self, value: serde_json::Value) -> Result<&mut Self, ResultError> {
        let other = ResultLog::try_from(value)?;
        Ok(self.combine(other))
    }

    /// By-value form of [`combine`](Self::combine).
    pub fn combined(mut self, other: ResultLog) -> Self {
        self.combine(other);
        self
    }

    /// Message texts logged at `severity`, in logging order.
    pub fn messages_at(&self, severity: Severity) -> &[String] {
        &self.buckets[severity.index()]
    }

    /// Number of messages at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.messages_at(severity).len()
    }

    /// Total number of messages across all severities.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Whether no message was logged at any severity.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Whether at least one FAILURE message is present.
    pub fn has_failures(&self) -> bool {
        !self.messages_at(Severity::Failure).is_empty()
    }

    /// Highest severity that has at least one message.
    pub fn worst_severity(&self) -> Option<Severity> {
        Severity::worst_first().find(|s| !self.messages_at(*s).is_empty())
    }

    /// The single most severe message.
    ///
    /// Within the winning severity the first-logged message is returned.
    /// An empty log yields `(Default, "")`, never nothing.
    pub fn worst_message(&self) -> Message {
        self.worst_severity()
            .and_then(|s| self.messages_at(s).first().map(|text| Message::new(s, text.clone())))
            .unwrap_or_else(|| Message::new(Severity::Default, ""))
    }

    /// Every message, most severe first.
    ///
    /// Messages of equal severity keep their logging order.
    pub fn all_messages(&self) -> Vec<Message> {
        Severity::worst_first()
            .flat_map(|s| {
                self.messages_at(s)
                    .iter()
                    .map(move |text| Message::new(s, text.clone()))
            })
            .collect()
    }

    /// Counts per severity plus the worst message, for rendering.
    pub fn summary(&self) -> LogSummary {
        LogSummary {
            worst: self.worst_message(),
            counts: Severity::ALL
                .into_iter()
                .map(|s| (s, self.count(s)))
                .collect(),
            total: self.len(),
        }
    }
}

impl Extend<ResultLog> for ResultLog {
    fn extend<I: IntoIterator<Item = ResultLog>>(&mut self, iter: I) {
        for log in iter {
            self.combine(log);
        }
    }
}

impl FromIterator<ResultLog> for ResultLog {
    fn from_iter<I: IntoIterator<Item = ResultLog>>(iter: I) -> Self {
        let mut acc = ResultLog::empty();
        acc.extend(iter);
        acc
    }
}

impl FromIterator<Message> for ResultLog {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut log = ResultLog::empty();
        for message in iter {
            log.log(message.severity, message.text);
        }
        log
    }
}

impl From<ResultLog> for BTreeMap<Severity, Vec<String>> {
    fn from(log: ResultLog) -> Self {
        Severity::ALL.into_iter().zip(log.buckets).collect()
    }
}

impl From<BTreeMap<Severity, Vec<String>>> for ResultLog {
    fn from(mut map: BTreeMap<Severity, Vec<String>>) -> Self {
        let mut log = ResultLog::empty();
        for severity in Severity::ALL {
            if let Some(messages) = map.remove(&severity) {
                log.buckets[severity.index()] = messages;
            }
        }
        log
    }
}

/// Accepts a serialized log or `null` (the identity); anything else is an
/// invalid argument.
impl TryFrom<serde_json::Value> for ResultLog {
    type Error = ResultError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(ResultLog::empty()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| ResultError::InvalidArgument(format!("malformed log ({})", e))),
            Value::Bool(_) => Err(ResultError::InvalidArgument("a boolean".into())),
            Value::Number(n) => Err(ResultError::InvalidArgument(format!("the number {}", n))),
            Value::String(_) => Err(ResultError::InvalidArgument("a string".into())),
            Value::Array(_) => Err(ResultError::InvalidArgument("an array".into())),
        }
    }
}

/// Rendering-oriented digest of a [`ResultLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSummary {
    /// Result of [`ResultLog::worst_message`]
    pub worst: Message,
    /// Message count for every severity, zeros included
    pub counts: BTreeMap<Severity, usize>,
    /// Total message count
    pub total: usize,
}
