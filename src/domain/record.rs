use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One formatted log line, the unit of transfer through the pipeline.
/// Opaque after formatting; carries no trailing line terminator (the file
/// sink appends one when persisting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record(String);

impl Record {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire body of the `submit` operation, both sides of the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub content: String,
}

/// Turns raw input text into a `Record`. Pure given a clock; applied once
/// per line, at the node that first sees it (or again on receipt when the
/// inbound policy is `retag`).
#[derive(Debug, Clone)]
pub struct Formatter {
    node_name: String,
    stamp: bool,
}

impl Formatter {
    /// `stamp` is the already-resolved decision: timestamping requested AND
    /// this node persists locally rather than forwarding.
    pub fn new(node_name: impl Into<String>, stamp: bool) -> Self {
        Self {
            node_name: node_name.into(),
            stamp,
        }
    }

    pub fn format(&self, text: &str) -> Record {
        self.format_at(text, Utc::now())
    }

    pub fn format_at(&self, text: &str, now: DateTime<Utc>) -> Record {
        let mut line = text.to_string();
        if !self.node_name.is_empty() {
            line = format!("{}: {line}", self.node_name);
        }
        if self.stamp {
            line = format!("{} - {line}", now.to_rfc3339_opts(SecondsFormat::Micros, true));
        }
        Record(line)
    }
}
