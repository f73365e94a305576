use std::{fmt::Display, sync::Arc};

use thiserror::Error;

/// An enumeration of potential errors that appear during bencode encoding.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// A renderer met a value it cannot express in the four bencode
    /// shapes.
    #[error("unsupported value: {reason}")]
    Unsupported {
        /// What the renderer could not express.
        reason: String,
    },

    /// A caller-supplied [`ToBencode`](crate::encoding::ToBencode)
    /// implementation failed while rendering itself.
    #[error("custom renderer failed: {source}")]
    Render {
        /// The collaborator's own error.
        source: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// Dictionary keys were not emitted in ascending raw-byte order.
    /// Canonical output requires every key to sort strictly after its
    /// predecessor, which also forbids duplicates.
    #[error("dictionary key {key:?} does not sort after {previous:?}")]
    UnsortedKeys {
        /// The offending key, lossily decoded for display.
        key: String,
        /// The key emitted before it, lossily decoded for display.
        previous: String,
    },

    /// A render callback finished without emitting a value.
    #[error("no value was emitted")]
    NoValueEmitted,

    /// Exceeded the configured nesting limit.
    #[error("maximum nesting depth {max_depth} exceeded")]
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
    },
}

impl Error {
    /// Raised when a renderer cannot express a value in bencode's four
    /// shapes. The message should not be capitalized and should not end
    /// with a period.
    pub fn unsupported(reason: impl Display) -> Self {
        Error::Unsupported {
            reason: reason.to_string(),
        }
    }

    /// Wrap a collaborator's rendering failure so it propagates through
    /// the encoder unchanged.
    pub fn render<SourceT>(source: SourceT) -> Self
    where
        SourceT: std::error::Error + Send + Sync + 'static,
    {
        Error::Render {
            source: Arc::new(source),
        }
    }
}

#[test]
fn encoding_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<Error>();
    is_sync::<Error>();
}
