//! Error Types
//!
//! Only construction-time mistakes are reported as errors. Value-level
//! anomalies (read-only locations, null chains, cycles in the bound object
//! graph) are encoded as data instead: read-only binders, default values and
//! placeholder elements.

use thiserror::Error;

use crate::element::ElementId;

/// Errors raised while assembling binders and element trees.
#[derive(Debug, Error)]
pub enum UiError {
    /// The element already has a parent; detach it first.
    #[error("element {child:?} already has parent {parent:?}")]
    AlreadyParented { child: ElementId, parent: ElementId },

    /// Attaching would make an element its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle { child: ElementId, parent: ElementId },

    /// The composite type has no member with this name.
    #[error("type `{type_name}` has no member `{member}`")]
    MemberNotFound {
        type_name: &'static str,
        member: String,
    },

    /// The member exists but holds a different type than requested.
    #[error("member `{member}` of `{type_name}` is `{actual}`, not `{expected}`")]
    MemberTypeMismatch {
        type_name: &'static str,
        member: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Member lookup on a type that is not a composite.
    #[error("type `{type_name}` has no members")]
    NotAComposite { type_name: &'static str },

    /// An untyped write carried a value of the wrong type.
    #[error("binder of `{expected}` cannot accept a value of another type")]
    ValueTypeMismatch { expected: &'static str },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to encode element state: {0}")]
    StateEncode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode element state: {0}")]
    StateDecode(#[from] rmp_serde::decode::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UiError>;
