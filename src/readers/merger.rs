// src/readers/merger.rs

//! Merge the per-source [`Events`] into one timeline.
//!
//! Each source stream is already in file order. Merging takes the event with
//! the earliest datetime among the heads of all streams; equal datetimes are
//! taken from the lower-indexed stream first. So events of equal datetime
//! keep their file order within a stream, and keep stream order across
//! streams.
//!
//! A stream is not required to be sorted. A stream with an out-of-order
//! datetime, e.g. after a clock step, is merged as-is without reordering
//! within it.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::data::event::{Event, Events};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Iterator of merged [`Event`]s, see [`merge`].
#[derive(Debug)]
pub struct MergeEvents {
    streams: Vec<Peekable<IntoIter<Event>>>,
}

impl MergeEvents {
    pub fn new(streams: Vec<Events>) -> MergeEvents {
        defñ!("({} streams)", streams.len());
        MergeEvents {
            streams: streams
                .into_iter()
                .map(|events| events.into_iter().peekable())
                .collect(),
        }
    }

    /// Index of the stream whose head is earliest, lowest index wins ties.
    fn index_earliest(&mut self) -> Option<usize> {
        let mut earliest: Option<(usize, &Event)> = None;
        for (index, stream) in self.streams.iter_mut().enumerate() {
            let head: &Event = match stream.peek() {
                Some(event) => event,
                None => continue,
            };
            match earliest {
                Some((_, event_e)) if event_e.timestamp() <= head.timestamp() => {}
                _ => earliest = Some((index, head)),
            }
        }

        earliest.map(|(index, _)| index)
    }
}

impl Iterator for MergeEvents {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        let index: usize = self.index_earliest()?;

        self.streams[index].next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len: usize = self
            .streams
            .iter()
            .map(|stream| stream.size_hint().0)
            .sum();

        (len, Some(len))
    }
}

/// Merge `streams` into one chronological timeline.
///
/// The result has exactly the events of all `streams`.
pub fn merge(streams: Vec<Events>) -> Events {
    defn!("({} streams)", streams.len());
    let merged: Events = MergeEvents::new(streams).collect();
    defx!("{} events", merged.len());

    merged
}

/// Merge two streams; events of `a` come before events of `b` with equal
/// datetimes.
pub fn merge_two(a: Events, b: Events) -> Events {
    merge(vec![a, b])
}
