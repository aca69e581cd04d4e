// Copyright 2026 the Kinesis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads events from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use kinesis_core::input::SampleOutcome;
use kinesis_core::time::Timebase;

use crate::recorder::RecordedEvent;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Frames become complete (`"X"`) slices spanning their clamped step, so
/// long or clamped frames stand out. Surface events carry no timestamp of
/// their own and are placed at the most recent frame.
pub fn export(events: &[RecordedEvent], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut out: Vec<Value> = Vec::with_capacity(events.len());
    let mut last_frame_us = 0.0;

    for recorded in events {
        match *recorded {
            RecordedEvent::Sample(e) => {
                let (name, args) = match e.outcome {
                    SampleOutcome::Applied(p) => ("Sample", json!({ "x": p.x, "y": p.y })),
                    SampleOutcome::Ignored(reason) => {
                        ("SampleIgnored", json!({ "reason": format!("{reason:?}") }))
                    }
                };
                out.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Input",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "modality": format!("{:?}", e.modality),
                        "sample": args,
                    }
                }));
            }
            RecordedEvent::Measure(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("Measure:{:?}", e.cause),
                    "cat": "Geometry",
                    "ts": ticks_to_us(e.now.ticks(), timebase),
                    "pid": 0,
                    "tid": 2,
                    "s": "t",
                    "args": {
                        "measured": e.measured,
                        "dropped": e.dropped,
                        "unmeasured": e.unmeasured,
                    }
                }));
            }
            RecordedEvent::Registration(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.registration),
                    "cat": "Geometry",
                    "ts": last_frame_us,
                    "pid": 0,
                    "tid": 2,
                    "s": "t",
                    "args": {
                        "slot": e.id.index(),
                        "generation": e.id.generation(),
                    }
                }));
            }
            RecordedEvent::Permission(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Permission",
                    "cat": "Input",
                    "ts": last_frame_us,
                    "pid": 0,
                    "tid": 1,
                    "s": "g",
                    "args": {
                        "from": format!("{:?}", e.from),
                        "to": format!("{:?}", e.to),
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                let end = ticks_to_us(e.now.ticks(), timebase);
                let dur = ticks_to_us(e.delta.ticks(), timebase);
                last_frame_us = end;
                out.push(json!({
                    "ph": "X",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": end - dur,
                    "dur": dur,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Surface(e) => {
                out.push(json!({
                    "ph": "i",
                    "name": "Surface",
                    "cat": "Rich",
                    "ts": last_frame_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "slot": e.id.index(),
                        "rel_x": e.motion.rel.x,
                        "rel_y": e.motion.rel.y,
                        "is_over": e.motion.is_over,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &out)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
