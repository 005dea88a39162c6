// src/readers/summary.rs

//! Implements `Summary` statistics tracking structs.

#![allow(non_snake_case)]

use crate::common::{Count, Dialect, NodeId};
use crate::data::event::{Category, CATEGORY_COUNT};

use std::fmt;

use ::more_asserts::debug_assert_le;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Statistics of a [`RawLineReader`].
///
/// [`RawLineReader`]: crate::readers::linereader::RawLineReader
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryLineReader {
    /// lines returned
    pub LineReader_lines: Count,
    /// lines skipped for not being UTF-8
    pub LineReader_lines_undecodable: Count,
    /// bytes read, including skipped lines
    pub LineReader_bytes: Count,
}

/// Statistics of an event stream build.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryEventProcessor {
    /// lines that had their own datetime
    pub EventProcessor_lines_stamped: Count,
    /// events created, stamped and inherited
    pub EventProcessor_events: Count,
    /// events that inherited a datetime
    pub EventProcessor_events_inherited: Count,
    /// classified lines dropped for having no datetime to inherit
    pub EventProcessor_orphans: Count,
    /// times a datetime without a year jumped back into the next year
    pub EventProcessor_year_rollovers: Count,
    /// events per category, indexed by [`Category::index`]
    pub EventProcessor_categories: [Count; CATEGORY_COUNT],
}

impl SummaryEventProcessor {
    pub fn count_category(&mut self, category: Category) {
        self.EventProcessor_categories[category.index()] += 1;
    }

    pub fn category_count(&self, category: Category) -> Count {
        self.EventProcessor_categories[category.index()]
    }
}

/// Accumulated statistics of one processed log source.
///
/// For CLI option `--summary`.
#[derive(Clone, Debug)]
pub struct Summary {
    /// display name of the source, see [`LogSource::describe`]
    ///
    /// [`LogSource::describe`]: crate::readers::filepreprocessor::LogSource::describe
    pub source: String,
    pub node: NodeId,
    pub dialect: Dialect,
    pub linereader: SummaryLineReader,
    pub eventprocessor: SummaryEventProcessor,
}

impl Summary {
    pub fn new(
        source: String,
        node: NodeId,
        dialect: Dialect,
        linereader: SummaryLineReader,
        eventprocessor: SummaryEventProcessor,
    ) -> Summary {
        debug_assert_le!(
            eventprocessor.EventProcessor_lines_stamped,
            linereader.LineReader_lines,
            "more stamped lines than lines"
        );
        debug_assert_le!(
            eventprocessor.EventProcessor_events + eventprocessor.EventProcessor_orphans,
            linereader.LineReader_lines,
            "more events than lines"
        );
        Summary {
            source,
            node,
            dialect,
            linereader,
            eventprocessor,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (node {:?}, {}): lines {}, undecodable {}, events {}, inherited {}, orphans {}",
            self.source,
            self.node,
            self.dialect,
            self.linereader.LineReader_lines,
            self.linereader.LineReader_lines_undecodable,
            self.eventprocessor.EventProcessor_events,
            self.eventprocessor.EventProcessor_events_inherited,
            self.eventprocessor.EventProcessor_orphans,
        )
    }
}
