//! The notation recovery pipeline.
//!
//! This module is the operational core of the crate. Recovering a game from a
//! noisy transcription is a pipeline:
//!
//! ```text
//! raw text ── clean_input ── normalize ───┬─ extract_metadata (independent)
//!            (normalize.rs)               │  (metadata.rs)
//!                                         v
//!                              strip_annotations (segment.rs)
//!                                         │
//!              ┌──────────────────────────┼──────────────────────────┐
//!              v                          v                          v
//!       stripped-direct            numbered-pairs               flat-stream
//!       (oracle load, then         (anchors + shape             (move grammar
//!        token replay)              filter)                      scan)
//!              │                          │                          │
//!              └───────── replay each on its own oracle ────────────┘
//!                          (replay.rs, correct.rs on rejects)
//!                                         │
//!                                         v
//!                        select attempt with most accepted moves
//!                        (recover.rs; ties go to the earlier strategy)
//!                                         │
//!                                         v
//!                        renumber, trim, assemble RecoveryResult
//!                        (reconstruct.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: pure, idempotent canonicalization of raw text (castling
//!   variants, piece-letter fixes, capture colons, guarded hyphen stripping).
//! - `metadata.rs`: opportunistic header-tag and clock-annotation extraction,
//!   independent of move validity.
//! - `segment.rs`: annotation stripping and the three tokenization strategies.
//! - `replay.rs`: the legality-driven state machine; one oracle per attempt,
//!   advanced monotonically, never rolled back.
//! - `correct.rs`: repair of oracle-rejected tokens (skeleton completion,
//!   fuzzy matching, disambiguation insertion, confusion substitutions).
//! - `reconstruct.rs`: sequential renumbering, expected-total trimming, and
//!   outcome assembly.
//! - `recover.rs`: the driver that fans out attempts and picks the winner.
//!
//! ## Determinism
//!
//! Given the same input, options, and oracle, the pipeline output is fully
//! deterministic: strategy order, oracle enumeration order, and the fixed
//! correction order define every tie-break.
//!
//! ## Debugging
//!
//! Set `PGN_SALVAGE_DEBUG=1` to print per-attempt and per-repair traces.

#[path = "pipeline/correct.rs"]
pub(crate) mod correct;
#[path = "pipeline/metadata.rs"]
pub(crate) mod metadata;
#[path = "pipeline/normalize.rs"]
pub(crate) mod normalize;
#[path = "pipeline/reconstruct.rs"]
pub(crate) mod reconstruct;
#[path = "pipeline/recover.rs"]
pub(crate) mod recover;
#[path = "pipeline/replay.rs"]
pub(crate) mod replay;
#[path = "pipeline/segment.rs"]
pub(crate) mod segment;

pub use correct::{CorrectionSet, Substitution};
