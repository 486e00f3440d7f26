// Copyright 2026 The Mimegate Project
// SPDX-License-Identifier: Apache-2.0

// Incremental content-type gating
//
// Responsibilities:
// - Accumulate the minimum leading bytes the sniffer needs (4100 for the
//   default sniffer), withholding chunks until a decision lands
// - Decide allow/block exactly once per stream, never revisiting it
// - Forward chunks unchanged after an allow; error permanently after a
//   block, with exactly one terminal error surfaced downstream
// - Fire the "type identified" event once, on the allow transition only
// - Decide explicitly at end of input instead of hanging
// - Chunk-boundary independent: same decision and detected type for any
//   chunking of the same bytes

mod filter;
mod stream;
mod types;

pub use filter::TypeGateFilter;
pub use stream::StreamGate;
pub use types::{
    GateAction, GateError, GateFinish, GateState, NullEventSink, PrefixMode, TypeEventSink,
};
