// Incremental type gate — core state machine
//
// Accumulates the leading bytes of a stream until the sniffer can name a
// content type, evaluates the policy exactly once, then becomes a plain
// pass-through (allowed) or a permanent error source (blocked). Chunk
// boundaries are caller-determined; the decision and the detected type
// are identical whether input arrives one byte at a time or all at once.

use super::types::{GateAction, GateError, GateFinish, GateState, PrefixMode};
use crate::policy::Policy;
use crate::sniff::{ContentSniffer, ContentType};
use bytes::Bytes;
use std::sync::Arc;

/// One gate per stream: owns its accumulation buffer and decision state.
///
/// Synchronous and single-owner. Callers feed chunks in delivery order
/// via [`process`](Self::process) and signal end of input via
/// [`finish`](Self::finish); [`StreamGate`](super::StreamGate) drives it
/// for push-based pipelines.
pub struct TypeGateFilter {
    policy: Policy,
    sniffer: Arc<dyn ContentSniffer>,
    prefix_mode: PrefixMode,
    state: GateState,
    /// Zero-initialized, sized to the sniffer's budget. Append-only
    /// while unclassified, untouched after the decision.
    sniff_buf: Vec<u8>,
    /// Bytes the stream has produced so far. Advances by full chunk
    /// length even when the buffer copy truncates.
    bytes_seen: usize,
    /// Chunks withheld before the decision. Populated only in
    /// `PrefixMode::Replay`; `Drop` keeps prefix data solely inside
    /// `sniff_buf`.
    withheld: Vec<Bytes>,
    detected: Option<ContentType>,
}

impl TypeGateFilter {
    /// Create a gate with injected collaborators.
    pub fn new(policy: Policy, sniffer: Arc<dyn ContentSniffer>, prefix_mode: PrefixMode) -> Self {
        let budget = sniffer.bytes_required();
        Self {
            policy,
            sniffer,
            prefix_mode,
            state: GateState::Unclassified,
            sniff_buf: vec![0u8; budget],
            bytes_seen: 0,
            withheld: Vec::new(),
            detected: None,
        }
    }

    /// Create a gate with the default magic-byte sniffer and the
    /// compatibility prefix mode.
    pub fn with_defaults(policy: Policy) -> Self {
        Self::new(
            policy,
            Arc::new(crate::sniff::MagicSniffer),
            PrefixMode::Drop,
        )
    }

    /// Current decision state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// The identified content type, once the gate has allowed the stream.
    pub fn detected(&self) -> Option<&ContentType> {
        self.detected.as_ref()
    }

    /// Feed one inbound chunk, in delivery order.
    ///
    /// Allowed streams forward immediately; blocked streams error on this
    /// and every later call. While unclassified, the chunk is absorbed
    /// into the accumulation buffer and a classification is attempted.
    pub fn process(&mut self, chunk: Bytes) -> Result<GateAction, GateError> {
        match self.state {
            GateState::Allowed => Ok(GateAction::Forward(chunk)),
            GateState::Blocked => Err(GateError),
            GateState::Unclassified => self.classify(chunk),
        }
    }

    /// Signal end of input.
    ///
    /// A stream that ends while unclassified gets one final
    /// classification attempt over the accumulated buffer and blocks if
    /// that attempt does not allow it. An empty stream therefore blocks
    /// here.
    pub fn finish(&mut self) -> Result<GateFinish, GateError> {
        match self.state {
            GateState::Allowed => Ok(GateFinish::Done),
            GateState::Blocked => Err(GateError),
            GateState::Unclassified => {
                if let Some(content_type) = self.sniffer.sniff(&self.sniff_buf) {
                    if self.policy.allows(&content_type.mime) {
                        self.allow(content_type.clone());
                        let released = std::mem::take(&mut self.withheld);
                        return Ok(GateFinish::Classified {
                            released,
                            content_type,
                        });
                    }
                }
                tracing::debug!(bytes_seen = self.bytes_seen, "input ended unclassified");
                self.state = GateState::Blocked;
                Err(GateError)
            }
        }
    }

    fn classify(&mut self, chunk: Bytes) -> Result<GateAction, GateError> {
        self.absorb(&chunk);

        if let Some(content_type) = self.sniffer.sniff(&self.sniff_buf) {
            if !self.policy.allows(&content_type.mime) {
                tracing::debug!(mime = %content_type.mime, "stream type disallowed");
                self.state = GateState::Blocked;
                return Err(GateError);
            }
            self.allow(content_type.clone());
            let mut released = std::mem::take(&mut self.withheld);
            released.push(chunk);
            return Ok(GateAction::Classified {
                released,
                content_type,
            });
        }

        if self.bytes_seen >= self.sniff_buf.len() {
            // Budget exhausted with no signature: more input cannot help,
            // the buffer will never change again.
            tracing::debug!(bytes_seen = self.bytes_seen, "sniff budget exhausted");
            self.state = GateState::Blocked;
            return Err(GateError);
        }

        if self.prefix_mode == PrefixMode::Replay {
            self.withheld.push(chunk);
        }
        Ok(GateAction::Held)
    }

    /// Copy what fits of the chunk into the buffer and advance the
    /// counter by the chunk's full length. A chunk arriving after the
    /// buffer is full copies nothing; a chunk straddling the boundary is
    /// truncated.
    fn absorb(&mut self, chunk: &Bytes) {
        let offset = self.bytes_seen.min(self.sniff_buf.len());
        let n = chunk.len().min(self.sniff_buf.len() - offset);
        self.sniff_buf[offset..offset + n].copy_from_slice(&chunk[..n]);
        self.bytes_seen += chunk.len();
    }

    fn allow(&mut self, content_type: ContentType) {
        tracing::debug!(
            mime = %content_type.mime,
            bytes_seen = self.bytes_seen,
            "stream type identified"
        );
        self.state = GateState::Allowed;
        self.detected = Some(content_type);
    }
}
