// Copyright 2026 The Mimegate Project
// SPDX-License-Identifier: Apache-2.0

// Gate types
//
// Core types for the content-type gate: decision states, per-chunk
// actions, prefix handling modes, the event sink, and the error.

use crate::sniff::ContentType;
use bytes::Bytes;
use std::fmt;

// ---------------------------------------------------------------------------
// Decision state
// ---------------------------------------------------------------------------

/// Where the gate stands for one stream instance.
///
/// Starts at `Unclassified` and transitions exactly once, to either
/// `Allowed` or `Blocked`. Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No decision yet; leading bytes are still being accumulated.
    Unclassified,
    /// The stream's type is known and allowed; chunks pass through.
    Allowed,
    /// The stream is disallowed; every further call errors.
    Blocked,
}

// ---------------------------------------------------------------------------
// Prefix handling
// ---------------------------------------------------------------------------

/// What happens to chunks withheld before the decision.
///
/// `Drop` reproduces the historical contract: when classification
/// succeeds mid-stream, only the classifying chunk onward reaches
/// downstream. Every earlier chunk existed solely inside the
/// accumulation buffer and is discarded from the output. `Replay`
/// retains withheld chunks and flushes them, in arrival order, ahead of
/// the classifying chunk on the allow transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixMode {
    /// Discard withheld chunks on allow (compatibility default).
    Drop,
    /// Flush withheld chunks in order on allow.
    Replay,
}

// ---------------------------------------------------------------------------
// Per-chunk actions
// ---------------------------------------------------------------------------

/// What the caller should do after feeding one chunk to the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum GateAction {
    /// Already allowed: forward the chunk downstream unchanged.
    Forward(Bytes),
    /// The decision just landed on allow. `released` holds everything to
    /// forward now: the classifying chunk, preceded by the withheld
    /// chunks when the gate runs in [`PrefixMode::Replay`].
    Classified {
        released: Vec<Bytes>,
        content_type: ContentType,
    },
    /// No decision yet; the chunk was withheld pending more input.
    Held,
}

/// Outcome of end-of-input while the gate had not errored.
#[derive(Debug, Clone, PartialEq)]
pub enum GateFinish {
    /// The stream was already allowed; nothing left to release.
    Done,
    /// End of input forced a final classification that allowed the
    /// stream. `released` holds the withheld chunks to flush (empty in
    /// [`PrefixMode::Drop`]).
    Classified {
        released: Vec<Bytes>,
        content_type: ContentType,
    },
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Receives the "type identified" notification.
///
/// Fired exactly once per stream, only on the allow transition. Blocked
/// streams produce no event. Implementations are injected into the
/// stream adapter, keeping downstream observers decoupled from the gate.
pub trait TypeEventSink: Send + Sync {
    fn type_identified(&self, content_type: &ContentType);
}

/// Sink that discards events. Tracing still records the classification.
pub struct NullEventSink;

impl TypeEventSink for NullEventSink {
    fn type_identified(&self, _content_type: &ContentType) {}
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// The single error the gate produces.
///
/// Raised when a classified type fails the policy, when the byte budget
/// is exhausted without a classification, when input arrives after the
/// gate is blocked, and when input ends before an allowed
/// classification. The causes are deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateError;

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stream type not allowed")
    }
}

impl std::error::Error for GateError {}
