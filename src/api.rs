use crate::oracle::{RulesOracle, ShakmatyOracle};
use crate::pipeline;
use crate::pipeline::correct::{CorrectionSet, Substitution};
use serde::Serialize;
use std::fmt;

/// Options that affect recovery behavior.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Correction strategies to run on rejected tokens. All by default.
    pub corrections: CorrectionSet,
    /// Number of full moves the caller expects, when known (e.g. from a
    /// scoresheet header). Bounds the output and drives quality warnings.
    pub expected_moves: Option<usize>,
    /// Replacement confusion table. `None` uses the standard one.
    pub substitutions: Option<Vec<Substitution>>,
}

impl Options {
    pub(crate) fn substitution_table(&self) -> &[Substitution] {
        match &self.substitutions {
            Some(table) => table,
            None => pipeline::correct::standard_substitutions(),
        }
    }
}

/// One side of the game, as read from the header tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerInfo {
    pub name: String,
    pub rating: Option<String>,
}

/// Game context extracted from PGN-style header tags, if any were present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameMetadata {
    pub white: PlayerInfo,
    pub black: PlayerInfo,
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub round: Option<String>,
    pub result: Option<String>,
    pub time_control: Option<String>,
    /// Remaining-time readings from `[%clk H:MM:SS]` annotations, in seconds,
    /// in input order.
    pub clock_times: Vec<u64>,
}

/// Where recovery ran aground: the offending raw token and the move number
/// it was read under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureLocator {
    pub token: String,
    pub move_number: usize,
}

impl fmt::Display for FailureLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` (move {})", self.token, self.move_number)
    }
}

/// Result from [`recover`] and friends.
///
/// `success` means at least one legal move was recovered; inspect
/// `is_partial` and `quality_warning` to judge how much of the input
/// survived.
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryResult {
    pub success: bool,
    /// Recovered movetext, renumbered from move 1. Empty on failure.
    pub movetext: String,
    /// Full moves recovered (a trailing lone White move counts as one).
    pub moves_found: usize,
    /// The input held more than what was recovered.
    pub is_partial: bool,
    /// Echo of [`Options::expected_moves`].
    pub total_expected: Option<usize>,
    pub quality_warning: Option<String>,
    pub metadata: Option<GameMetadata>,
    /// First token the pipeline could not get past, if any.
    pub failed_at: Option<FailureLocator>,
    pub error: Option<String>,
}

impl RecoveryResult {
    pub(crate) fn failure(message: String) -> Self {
        RecoveryResult {
            success: false,
            movetext: String::new(),
            moves_found: 0,
            is_partial: false,
            total_expected: None,
            quality_warning: None,
            metadata: None,
            failed_at: None,
            error: Some(message),
        }
    }
}

/// Recover a legal move sequence from noisy notation, with defaults.
///
/// # Example
/// ```
/// use pgn_salvage::recover;
///
/// let out = recover("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");
/// assert!(out.success);
/// assert_eq!(out.moves_found, 3);
/// ```
pub fn recover(input: &str) -> RecoveryResult {
    recover_with(input, &Options::default())
}

/// Recover with explicit [`Options`], using the bundled rules engine.
pub fn recover_with(input: &str, options: &Options) -> RecoveryResult {
    let mut result = pipeline::recover::run::<ShakmatyOracle>(input, options);
    result.total_expected = options.expected_moves;
    result
}

/// Recover against a caller-supplied rules oracle. The oracle decides move
/// legality and canonical spelling; everything upstream of it is unchanged.
pub fn recover_with_oracle<O: RulesOracle>(input: &str, options: &Options) -> RecoveryResult {
    let mut result = pipeline::recover::run::<O>(input, options);
    result.total_expected = options.expected_moves;
    result
}
