// Copyright 2026 The Mimegate Project
// SPDX-License-Identifier: Apache-2.0

// Allow-policy for detected content types.
//
// A policy is supplied once at gate construction and never changes for
// the instance's lifetime. The three accepted shapes (exact type, set of
// types, predicate) are resolved into a single tagged variant here, so
// per-chunk evaluation is one match with no shape re-checking.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// All errors that can occur while constructing a [`Policy`].
///
/// These fire before any stream data flows and are distinct from the
/// streaming [`GateError`](crate::gate::GateError).
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("allowed content type must not be empty")]
    EmptyType,

    #[error("allow list must contain at least one content type")]
    EmptyAllowList,
}

/// The allow-rule evaluated against a detected MIME identifier.
#[derive(Clone)]
pub enum Policy {
    /// Exact equality against a single MIME string.
    Exact(String),
    /// Membership in a set of MIME strings.
    AnyOf(HashSet<String>),
    /// Arbitrary predicate over the MIME string. Must be deterministic
    /// and side-effect-free within a single evaluation.
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Policy {
    /// Allow exactly one MIME type.
    pub fn exact(mime: impl Into<String>) -> Result<Self, PolicyError> {
        let mime = mime.into();
        if mime.is_empty() {
            return Err(PolicyError::EmptyType);
        }
        Ok(Policy::Exact(mime))
    }

    /// Allow any MIME type in the given list.
    pub fn any_of<I, S>(types: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = types.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(PolicyError::EmptyAllowList);
        }
        if set.iter().any(|t| t.is_empty()) {
            return Err(PolicyError::EmptyType);
        }
        Ok(Policy::AnyOf(set))
    }

    /// Allow whatever the predicate accepts.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Policy::Predicate(Arc::new(f))
    }

    /// Evaluate the policy against a detected MIME identifier.
    pub fn allows(&self, mime: &str) -> bool {
        match self {
            Policy::Exact(allowed) => mime == allowed,
            Policy::AnyOf(allowed) => allowed.contains(mime),
            Policy::Predicate(f) => f(mime),
        }
    }
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Exact(mime) => f.debug_tuple("Exact").field(mime).finish(),
            Policy::AnyOf(set) => f.debug_tuple("AnyOf").field(set).finish(),
            Policy::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
