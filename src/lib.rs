#[macro_use]
mod macros;
mod api;
mod oracle;
mod pipeline;
mod vision;

pub use api::{
    FailureLocator, GameMetadata, Options, PlayerInfo, RecoveryResult, recover, recover_with,
    recover_with_oracle,
};
pub use oracle::{OracleError, RulesOracle, ShakmatyOracle};
pub use pipeline::{CorrectionSet, Substitution};
pub use vision::{VisionExtraction, recover_extraction, recover_vision_response};

// --- Internal types ---------------------------------------------------------

/// How an accepted token got past the rules oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSource {
    /// Accepted verbatim (possibly after whole-text normalization).
    Direct,
    /// Completed from a token missing exactly one grammatical component.
    SkeletonRepaired,
    /// Completed by inserting a required disambiguator.
    Disambiguated,
    /// Matched to the closest legal move within the edit-distance budget.
    FuzzyRepaired,
    /// Repaired by a single-character confusion substitution.
    SubstitutionRepaired,
}

impl TokenSource {
    pub fn label(self) -> &'static str {
        match self {
            TokenSource::Direct => "direct",
            TokenSource::SkeletonRepaired => "skeleton-repaired",
            TokenSource::Disambiguated => "disambiguated",
            TokenSource::FuzzyRepaired => "fuzzy-repaired",
            TokenSource::SubstitutionRepaired => "substitution-repaired",
        }
    }
}

/// A move accepted by the oracle at a specific 1-based ply. Immutable once
/// accepted; `san` is the oracle's canonical rendering, not the raw token.
#[derive(Debug, Clone)]
pub(crate) struct MoveToken {
    pub san: String,
    pub ply: usize,
    pub source: TokenSource,
}

/// Segmentation strategies in priority order (declaration order is the
/// tie-break order when two attempts accept the same number of moves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Strategy {
    StrippedDirect,
    NumberedPairs,
    FlatStream,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::StrippedDirect => "stripped-direct",
            Strategy::NumberedPairs => "numbered-pairs",
            Strategy::FlatStream => "flat-stream",
        }
    }
}

/// A candidate token as produced by the segmenter. `move_number` is the
/// move-number label claimed by the source text; it is used for failure
/// locators only, never for output numbering.
#[derive(Debug, Clone)]
pub(crate) struct SegmentToken {
    pub text: String,
    pub move_number: usize,
}

/// One segmentation strategy's replayed output.
#[derive(Debug, Clone)]
pub(crate) struct RecoveryAttempt {
    pub strategy: Strategy,
    pub accepted: Vec<MoveToken>,
    pub halted_at: Option<FailureLocator>,
    pub consumed_all: bool,
}

impl RecoveryAttempt {
    /// Full-move count of the accepted sequence (ceiling over move pairs).
    pub fn accepted_pairs(&self) -> usize {
        self.accepted.len().div_ceil(2)
    }
}
