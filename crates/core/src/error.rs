//! Error types for world configuration, generation, and loading.

use crate::world::grid::GridPoint;
use thiserror::Error;
use validator::ValidationErrors;

/// Everything that can go wrong when building, generating, or loading a
/// world. Soft failures during generation (a region with no biome rule, a
/// landmass that couldn't find a spot in its region) are **not** errors; they
/// are logged as warnings and generation continues without that landmass.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A configuration document (settings, region map, biome rules) couldn't
    /// be parsed.
    #[error("error loading {document}")]
    ConfigLoad {
        /// Name of the document that failed, e.g. `regionMap`
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration parsed fine but failed validation. The contained errors
    /// are keyed by the offending field names.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationErrors),

    /// A persisted world document is missing fields, malformed, or
    /// internally inconsistent. Callers should treat this as "no world
    /// available" and generate a fresh one.
    #[error("error loading world: {reason}")]
    WorldLoad { reason: String },

    /// An edit targeted a point outside the world grid.
    #[error("point {0} is outside the world")]
    OutOfBounds(GridPoint),

    /// Generation failed for some reason that indicates a bug rather than
    /// bad input.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WorldError {
    pub(crate) fn world_load(reason: impl ToString) -> Self {
        Self::WorldLoad {
            reason: reason.to_string(),
        }
    }
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
