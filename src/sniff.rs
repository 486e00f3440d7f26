// Copyright 2026 The Mimegate Project
// SPDX-License-Identifier: Apache-2.0

// Content-type sniffing — the classifier seam
//
// The gate never inspects magic bytes itself; it hands its accumulation
// buffer to a `ContentSniffer` and acts on the answer. The default
// implementation wraps the `infer` signature database.

use serde::{Deserialize, Serialize};

/// The number of leading bytes the default sniffer needs before it can
/// reliably name a content type. Buffers handed to a sniffer are
/// zero-padded beyond the region actually written.
pub const SNIFF_BUFFER_BYTES: usize = 4100;

/// A content-type signature derived from a byte prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    /// MIME identifier, e.g. "image/jpeg".
    pub mime: String,
    /// Canonical file extension for the format, e.g. "jpg".
    pub extension: String,
}

/// Names the content type of a byte prefix, if it can.
///
/// Implementations must be deterministic and side-effect-free, and must
/// not misclassify based on trailing zero padding: the gate always passes
/// its whole buffer, zeroed beyond the bytes the stream has produced.
pub trait ContentSniffer: Send + Sync {
    /// Inspect the prefix and return a signature, or `None` if the data
    /// seen so far is insufficient or matches nothing.
    fn sniff(&self, prefix: &[u8]) -> Option<ContentType>;

    /// The prefix length after which `sniff` will never change its answer.
    /// Drives the gate's accumulation-buffer size and byte budget.
    fn bytes_required(&self) -> usize {
        SNIFF_BUFFER_BYTES
    }
}

/// Default sniffer backed by the `infer` magic-byte signature database.
pub struct MagicSniffer;

impl ContentSniffer for MagicSniffer {
    fn sniff(&self, prefix: &[u8]) -> Option<ContentType> {
        infer::get(prefix).map(|t| ContentType {
            mime: t.mime_type().to_string(),
            extension: t.extension().to_string(),
        })
    }
}
