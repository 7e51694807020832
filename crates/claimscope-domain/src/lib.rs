//! Claimscope Domain Layer
//!
//! Core data model shared by the extractor and the viewer. Nothing in this
//! crate performs I/O; it defines the reference claims, the analysis artifact
//! shape, and the trait seam for text-generation providers.
//!
//! ## Key Concepts
//!
//! - **Claim**: one of 50 fixed, numbered statements grouped into six categories
//! - **Artifact**: the persisted JSON result of analysing one paper
//! - **Evidence entry**: quotes, interpretation and strength for one supported claim
//! - **Strength**: strong, moderate or weak; nothing else is accepted
//! - **Model variant**: which generation model produced an artifact

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod claim;
pub mod model;
pub mod naming;
pub mod strength;
pub mod traits;

// Re-exports for convenience
pub use artifact::{
    AnalysisArtifact, ArtifactError, DirectQuote, EvidenceEntry, Insight, PaperMetadata,
    RunMetadata, TheorySynthesis,
};
pub use claim::{Category, Claim, ClaimNumber, CLAIMS, CLAIM_COUNT};
pub use model::ModelVariant;
pub use strength::Strength;
