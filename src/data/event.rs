// src/data/event.rs

//! Implements the [`RawLine`] read from a log source and the [`Event`]
//! classified from it.

use crate::common::{Dialect, NodeId};
use crate::data::datetime::{NaiveDateTime, DATETIME_FORMAT_OUT};

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Category
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The nine kinds of critical event.
///
/// Declaration order is classification priority; a line that matches the
/// patterns of several categories belongs to the first of them.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Category {
    Fencing,
    ResourceAction,
    FailedOperation,
    CorosyncCommunication,
    MaintenanceModeChange,
    ResourceAgentAlert,
    HighLoadOrCritical,
    MigrationThreshold,
    LocationConstraintChange,
}

pub const CATEGORY_COUNT: usize = 9;

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Fencing,
        Category::ResourceAction,
        Category::FailedOperation,
        Category::CorosyncCommunication,
        Category::MaintenanceModeChange,
        Category::ResourceAgentAlert,
        Category::HighLoadOrCritical,
        Category::MigrationThreshold,
        Category::LocationConstraintChange,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Fencing => "fencing",
            Category::ResourceAction => "resource-action",
            Category::FailedOperation => "failed-operation",
            Category::CorosyncCommunication => "corosync-communication",
            Category::MaintenanceModeChange => "maintenance-mode-change",
            Category::ResourceAgentAlert => "resource-agent-alert",
            Category::HighLoadOrCritical => "high-load-or-critical",
            Category::MigrationThreshold => "migration-threshold",
            Category::LocationConstraintChange => "location-constraint-change",
        }
    }

    /// Position in [`Category::ALL`].
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RawLine
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One line of text from a log source, without the line terminator.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawLine {
    text: String,
    dialect: Dialect,
    /// node of the source the line came from
    node: NodeId,
}

impl RawLine {
    pub fn new(text: String, dialect: Dialect, node: NodeId) -> RawLine {
        RawLine { text, dialect, node }
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A critical event, one classified log line.
///
/// Always has a timestamp; lines without one inherit the previous
/// timestamp of their source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    timestamp: NaiveDateTime,
    node: NodeId,
    category: Category,
    /// daemon or agent that wrote the line, may be empty
    component: String,
    /// `component payload`, as displayed
    raw_text: String,
}

pub type Events = Vec<Event>;

impl Event {
    pub fn new(
        timestamp: NaiveDateTime,
        node: NodeId,
        category: Category,
        component: String,
        raw_text: String,
    ) -> Event {
        Event {
            timestamp,
            node,
            category,
            component,
            raw_text,
        }
    }

    pub const fn timestamp(&self) -> &NaiveDateTime {
        &self.timestamp
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }

    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub const fn category(&self) -> Category {
        self.category
    }

    pub fn component(&self) -> &str {
        self.component.as_str()
    }

    pub fn raw_text(&self) -> &str {
        self.raw_text.as_str()
    }
}

/// Displayed as `<timestamp> <node> <raw_text>`.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format(DATETIME_FORMAT_OUT),
            self.node,
            self.raw_text
        )
    }
}
