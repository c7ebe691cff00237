//! The rules-oracle seam.
//!
//! The recovery pipeline never reasons about chess legality itself; it asks an
//! oracle. The oracle is the external collaborator of this crate: anything that
//! can enumerate legal moves, apply a SAN token, and load a move-text blob can
//! drive the pipeline. The trait is deliberately small:
//!
//! ```text
//! start()/from_board() ──▶ fresh state
//! legal_moves()        ──▶ canonical SAN strings for the current position
//! apply()              ──▶ advance one ply, or fail with state intact
//! history()            ──▶ canonical SAN of every applied move, in order
//! load_movetext()      ──▶ strict all-or-nothing load of a full blob
//! ```
//!
//! `Clone` is part of the contract: the correction engine validates candidate
//! repairs against disposable copies of the live state, and each recovery
//! attempt owns its own oracle instance for its whole lifetime.
//!
//! The default adapter wraps `shakmaty`. It is the only module that knows the
//! oracle is shakmaty; the pipeline is generic over the trait.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Position};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    /// The token did not parse as SAN, or no legal move matches it (including
    /// ambiguous piece moves lacking a disambiguator).
    #[error("illegal or unparseable move `{0}`")]
    IllegalMove(String),
    /// The board-state encoding was rejected.
    #[error("invalid board encoding: {0}")]
    InvalidBoard(String),
    /// A token inside a full move-text blob failed to apply.
    #[error("move-text rejected at `{0}`")]
    MalformedMovetext(String),
}

/// Authoritative move legality and application.
pub trait RulesOracle: Clone {
    /// Fresh game at the standard starting position.
    fn start() -> Self;

    /// Fresh game from a board-state encoding (FEN for the default adapter).
    fn from_board(encoding: &str) -> Result<Self, OracleError>;

    /// Every currently legal move as a canonical SAN string, including check
    /// and mate suffixes. Enumeration order must be deterministic; it defines
    /// the corrector's first-match tie-breaks.
    fn legal_moves(&self) -> Vec<String>;

    /// Apply one SAN token. On failure the position and history are
    /// unchanged. The recorded history entry is the canonical rendering of
    /// the applied move, not the raw token.
    fn apply(&mut self, token: &str) -> Result<(), OracleError>;

    /// Ordered canonical history of applied moves.
    fn history(&self) -> &[String];

    /// Strict load of a whole move-text blob: move-number and termination
    /// tokens are skipped, every remaining token must apply cleanly.
    fn load_movetext(text: &str) -> Result<Self, OracleError>;
}

/// Default oracle backed by `shakmaty`.
#[derive(Debug, Clone)]
pub struct ShakmatyOracle {
    position: Chess,
    history: Vec<String>,
}

impl RulesOracle for ShakmatyOracle {
    fn start() -> Self {
        ShakmatyOracle { position: Chess::default(), history: Vec::new() }
    }

    fn from_board(encoding: &str) -> Result<Self, OracleError> {
        let fen: Fen = encoding.parse().map_err(|err| OracleError::InvalidBoard(format!("{err}")))?;
        let position = fen
            .into_position(CastlingMode::Standard)
            .map_err(|err| OracleError::InvalidBoard(format!("{err}")))?;
        Ok(ShakmatyOracle { position, history: Vec::new() })
    }

    fn legal_moves(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|mv| SanPlus::from_move(self.position.clone(), mv).to_string())
            .collect()
    }

    fn apply(&mut self, token: &str) -> Result<(), OracleError> {
        let san: SanPlus = token.parse().map_err(|_| OracleError::IllegalMove(token.to_string()))?;
        let mv = san.san.to_move(&self.position).map_err(|_| OracleError::IllegalMove(token.to_string()))?;
        let canonical = SanPlus::from_move_and_play_unchecked(&mut self.position, &mv);
        self.history.push(canonical.to_string());
        Ok(())
    }

    fn history(&self) -> &[String] {
        &self.history
    }

    fn load_movetext(text: &str) -> Result<Self, OracleError> {
        let mut oracle = Self::start();
        for raw in text.split_whitespace() {
            if regex!(r"^\d+\.+$").is_match(raw) {
                continue;
            }
            if matches!(raw, "1-0" | "0-1" | "1/2-1/2" | "*") {
                continue;
            }
            // Tolerate glued move numbers ("12.Nf3").
            let token = regex!(r"^\d+\.+").replace(raw, "");
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            oracle.apply(token).map_err(|_| OracleError::MalformedMovetext(raw.to_string()))?;
        }
        Ok(oracle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_has_twenty_moves() {
        let oracle = ShakmatyOracle::start();
        assert_eq!(oracle.legal_moves().len(), 20);
        assert!(oracle.history().is_empty());
    }

    #[test]
    fn apply_records_canonical_history() {
        let mut oracle = ShakmatyOracle::start();
        oracle.apply("e4").unwrap();
        oracle.apply("e5").unwrap();
        oracle.apply("Nf3").unwrap();
        assert_eq!(oracle.history(), &["e4", "e5", "Nf3"]);
    }

    #[test]
    fn apply_failure_leaves_state_intact() {
        let mut oracle = ShakmatyOracle::start();
        let before = oracle.legal_moves();
        assert!(oracle.apply("Ke4").is_err());
        assert!(oracle.apply("not a move").is_err());
        assert_eq!(oracle.legal_moves(), before);
        assert!(oracle.history().is_empty());
    }

    #[test]
    fn canonical_history_carries_check_suffix() {
        let mut oracle = ShakmatyOracle::from_board("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").unwrap();
        oracle.apply("Qf8").unwrap();
        assert_eq!(oracle.history(), &["Qf8+"]);
    }

    #[test]
    fn load_movetext_skips_numbers_and_termination() {
        let oracle = ShakmatyOracle::load_movetext("1. e4 e5 2.Nf3 Nc6 1/2-1/2").unwrap();
        assert_eq!(oracle.history(), &["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn load_movetext_is_strict() {
        assert!(ShakmatyOracle::load_movetext("1. e4 banana").is_err());
    }

    #[test]
    fn from_board_rejects_garbage() {
        assert!(ShakmatyOracle::from_board("not a fen").is_err());
    }
}
