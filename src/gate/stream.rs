// Stream gate — push-based adapter
//
// Drives a `TypeGateFilter` over an inbound byte stream and produces an
// outbound stream: withheld chunks emit nothing, allowed chunks pass
// through in order, and a block surfaces as exactly one terminal error
// after which no data items follow.

use super::filter::TypeGateFilter;
use super::types::{GateAction, GateError, GateFinish, PrefixMode, TypeEventSink};
use crate::policy::Policy;
use crate::sniff::ContentSniffer;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

/// Gates byte streams on their sniffed content type.
///
/// Constructed once with a policy and collaborators; each call to
/// [`gate`](Self::gate) builds a fresh filter, so one `StreamGate` can
/// serve many streams while every stream keeps its own buffer and
/// decision state.
pub struct StreamGate {
    policy: Policy,
    sniffer: Arc<dyn ContentSniffer>,
    sink: Arc<dyn TypeEventSink>,
    prefix_mode: PrefixMode,
}

impl StreamGate {
    /// Create a stream gate with injected collaborators.
    pub fn new(
        policy: Policy,
        sniffer: Arc<dyn ContentSniffer>,
        sink: Arc<dyn TypeEventSink>,
        prefix_mode: PrefixMode,
    ) -> Self {
        Self {
            policy,
            sniffer,
            sink,
            prefix_mode,
        }
    }

    /// Create a stream gate with the default magic-byte sniffer, no
    /// event sink, and the compatibility prefix mode.
    pub fn with_defaults(policy: Policy) -> Self {
        Self::new(
            policy,
            Arc::new(crate::sniff::MagicSniffer),
            Arc::new(super::types::NullEventSink),
            PrefixMode::Drop,
        )
    }

    /// Process an inbound byte stream, producing the gated output stream.
    ///
    /// The "type identified" event fires on the sink exactly once, only
    /// when the stream is allowed. A blocked stream yields exactly one
    /// `Err` and then ends.
    pub fn gate(
        &self,
        mut input: impl Stream<Item = Bytes> + Unpin + Send + 'static,
    ) -> impl Stream<Item = Result<Bytes, GateError>> {
        let mut filter =
            TypeGateFilter::new(self.policy.clone(), self.sniffer.clone(), self.prefix_mode);
        let sink = self.sink.clone();

        let (tx, rx) = mpsc::channel::<Result<Bytes, GateError>>(64);

        tokio::spawn(async move {
            while let Some(chunk) = input.next().await {
                match filter.process(chunk) {
                    Ok(GateAction::Forward(bytes)) => {
                        if tx.send(Ok(bytes)).await.is_err() {
                            return; // Downstream went away
                        }
                    }
                    Ok(GateAction::Classified {
                        released,
                        content_type,
                    }) => {
                        sink.type_identified(&content_type);
                        for bytes in released {
                            if tx.send(Ok(bytes)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Ok(GateAction::Held) => {}
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }

            match filter.finish() {
                Ok(GateFinish::Done) => {}
                Ok(GateFinish::Classified {
                    released,
                    content_type,
                }) => {
                    sink.type_identified(&content_type);
                    for bytes in released {
                        if tx.send(Ok(bytes)).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        ReceiverStream::new(rx)
    }
}
