// src/readers/timelineprocessor.rs

//! Drives the processing stages for all [`LogSource`]s: read, classify and
//! build each source's event stream, then merge all streams and filter the
//! merged timeline.
//!
//! Sources are processed one after another, or with `threads`, each on its
//! own thread. Either way the streams are merged in source order, so the
//! timeline does not depend on thread scheduling.

use std::sync::Arc;
use std::thread;

use crate::common::{Dialect, NodeId, Result};
use crate::data::event::Events;
use crate::data::rules::PatternTable;
#[allow(unused_imports)]
use crate::debug::printers::{de_err, de_wrn, e_err, e_wrn};
use crate::readers::eventprocessor::build;
use crate::readers::filepreprocessor::{LogSource, SourceReader};
use crate::readers::linereader::RawLineReader;
use crate::readers::merger::merge;
use crate::readers::summary::{Summary, SummaryEventProcessor};
use crate::readers::timefilter::{filter, TimeWindow};

use ::crossbeam_channel;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// The event stream of one [`LogSource`].
#[derive(Debug)]
pub struct ProcessedStream {
    pub node: NodeId,
    pub dialect: Dialect,
    pub events: Events,
    pub summary: Summary,
}

/// Read, classify and build the event stream of `source`.
pub fn process_source(table: &PatternTable, source: &LogSource) -> Result<ProcessedStream> {
    defn!("({:?})", source.describe());
    let mut reader: RawLineReader<SourceReader> = source.open()?;
    let (events, summary_ep): (Events, SummaryEventProcessor) = build(table, reader.by_ref())?;
    let summary = Summary::new(
        source.describe(),
        source.node.clone(),
        source.dialect,
        reader.summary(),
        summary_ep,
    );
    defx!("{} events", events.len());

    Ok(ProcessedStream {
        node: source.node.clone(),
        dialect: source.dialect,
        events,
        summary,
    })
}

type ChanDatum = (usize, Result<ProcessedStream>);

/// Process all `sources`, returning their streams in the order of
/// `sources`. The first failed source, in order, fails the whole.
///
/// With `verbose`, print each source to stderr as it is parsed.
pub fn process_sources(
    table: Arc<PatternTable>,
    sources: Vec<LogSource>,
    threads: bool,
    verbose: bool,
) -> Result<Vec<ProcessedStream>> {
    defn!("({} sources, threads {})", sources.len(), threads);
    if !threads {
        let mut streams: Vec<ProcessedStream> = Vec::with_capacity(sources.len());
        for source in sources.iter() {
            if verbose {
                eprintln!("Parsing {}", source.describe());
            }
            streams.push(process_source(&table, source)?);
        }
        defx!("{} streams", streams.len());
        return Ok(streams);
    }

    let count: usize = sources.len();
    let (chan_send, chan_recv) = crossbeam_channel::unbounded::<ChanDatum>();
    let mut handles: Vec<thread::JoinHandle<()>> = Vec::with_capacity(count);
    for (index, source) in sources.into_iter().enumerate() {
        if verbose {
            eprintln!("Parsing {}", source.describe());
        }
        let table_thread: Arc<PatternTable> = table.clone();
        let chan_send_thread = chan_send.clone();
        let source_thread: LogSource = source.clone();
        let spawned = thread::Builder::new()
            .name(source.describe())
            .spawn(move || {
                let result = process_source(&table_thread, &source_thread);
                if let Err(_err) = chan_send_thread.send((index, result)) {
                    de_err!("chan_send_thread.send(({}, …)) failed {}", index, _err);
                }
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                e_wrn!("thread spawn for {:?} failed {}; processing it on this thread", source.describe(), err);
                let result = process_source(&table, &source);
                if let Err(_err) = chan_send.send((index, result)) {
                    de_err!("chan_send.send(({}, …)) failed {}", index, _err);
                }
            }
        }
    }
    // only the threads hold senders now; `recv` ends once all are done
    drop(chan_send);

    let mut results: Vec<Option<Result<ProcessedStream>>> = (0..count).map(|_| None).collect();
    for (index, result) in chan_recv.iter() {
        defo!("received stream {}", index);
        results[index] = Some(result);
    }
    for handle in handles.into_iter() {
        if let Err(panicked) = handle.join() {
            std::panic::resume_unwind(panicked);
        }
    }
    let mut streams: Vec<ProcessedStream> = Vec::with_capacity(count);
    for (_index, result) in results.into_iter().enumerate() {
        match result {
            Some(result) => streams.push(result?),
            None => {
                de_err!("no result for stream {}", _index);
            }
        }
    }
    defx!("{} streams", streams.len());

    Ok(streams)
}

/// Merge the event streams of `streams` and filter the merged timeline to
/// `window`. Returns the timeline and the per-source summaries.
pub fn timeline(streams: Vec<ProcessedStream>, window: &TimeWindow) -> (Events, Vec<Summary>) {
    defn!("({} streams)", streams.len());
    let (events, summaries): (Vec<Events>, Vec<Summary>) = streams
        .into_iter()
        .map(|stream| (stream.events, stream.summary))
        .unzip();
    let timeline: Events = filter(merge(events), window);
    defx!("{} events", timeline.len());

    (timeline, summaries)
}
