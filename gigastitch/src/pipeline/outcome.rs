//! Run outcomes and fatal errors.

use crate::acquisition::AcquisitionResult;
use crate::assembly::AssemblyError;
use crate::grid::{GridError, ResolvedGrid};
use crate::metadata::MetadataError;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result of a run that got as far as tile acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every tile was present and the panorama was written
    Completed {
        artifact: PathBuf,
        grid: ResolvedGrid,
        acquisition: AcquisitionResult,
    },
    /// Some tiles are still missing; nothing was assembled
    Incomplete {
        grid: ResolvedGrid,
        acquisition: AcquisitionResult,
    },
}

impl PipelineOutcome {
    pub fn grid(&self) -> &ResolvedGrid {
        match self {
            Self::Completed { grid, .. } | Self::Incomplete { grid, .. } => grid,
        }
    }

    pub fn acquisition(&self) -> &AcquisitionResult {
        match self {
            Self::Completed { acquisition, .. } | Self::Incomplete { acquisition, .. } => {
                acquisition
            }
        }
    }

    /// Path of the final image, if one was produced.
    pub fn artifact(&self) -> Option<&PathBuf> {
        match self {
            Self::Completed { artifact, .. } => Some(artifact),
            Self::Incomplete { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
