//! Token normalization.
//!
//! Transcription sources disagree wildly on how the same move is written:
//! castling arrives as `0-0`, `00`, `o-o` or even Cyrillic `О-О`; knights as
//! `Kn`/`Kt`; captures as `:`; piece moves with a spurious hyphen (`N-f3`).
//! This module canonicalizes all of that with a pure, deterministic string
//! transform.
//!
//! Two properties are load-bearing for the rest of the pipeline:
//!
//! - **Idempotence**: `normalize(normalize(x)) == normalize(x)` for every
//!   input. Later stages re-normalize individual tokens, so a second pass must
//!   be a no-op.
//! - **No global state**: castling hyphens survive the generic hyphen strip
//!   via two sentinel substrings scoped to this module. The sentinels embed a
//!   control character, which cannot occur in legitimate notation.

/// Stands in for `O-O` while generic hyphens are stripped.
const SHORT_CASTLE_SENTINEL: &str = "\u{1}OO\u{1}";
/// Stands in for `O-O-O` while generic hyphens are stripped.
const LONG_CASTLE_SENTINEL: &str = "\u{1}OOO\u{1}";

/// Pre-normalization cleanup of transport noise: markdown fences, bold
/// markers, and `##` headings (vision-service responses), non-breaking
/// spaces, CR line endings.
pub(crate) fn clean_input(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let cleaned = regex!(r"(?i)```pgn\s*").replace_all(input, "");
    cleaned
        .replace("```", "")
        .replace("**", "")
        .replace("##", "")
        .replace('\u{a0}', " ")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

/// Canonicalize notation variants in `text`. Pure and idempotent.
pub(crate) fn normalize(text: &str) -> String {
    // Castling written with zeros.
    let mut s = regex!(r"0\s*-\s*0\s*-\s*0").replace_all(text, "O-O-O").into_owned();
    s = regex!(r"0\s*-\s*0").replace_all(&s, "O-O").into_owned();

    // Castling written with lowercase or Cyrillic letters.
    s = regex!(r"(?i)[oО]\s*-\s*[oО]\s*-\s*[oО]").replace_all(&s, "O-O-O").into_owned();
    s = regex!(r"(?i)[oО]\s*-\s*[oО]").replace_all(&s, "O-O").into_owned();

    // Spaced-out capital forms.
    s = regex!(r"\bO\s*-\s*O\s*-\s*O\b").replace_all(&s, "O-O-O").into_owned();
    s = regex!(r"\bO\s*-\s*O\b").replace_all(&s, "O-O").into_owned();

    // Hyphenless digit castling.
    s = regex!(r"\b00\b").replace_all(&s, "O-O").into_owned();
    s = regex!(r"\b000\b").replace_all(&s, "O-O-O").into_owned();

    // Non-standard piece letters, only when a move body follows (so prose
    // like "Knight" is left alone).
    s = regex!(r"(?i)\bKn([a-h1-8x-])").replace_all(&s, "N$1").into_owned();
    s = regex!(r"(?i)\bKt([a-h1-8x-])").replace_all(&s, "N$1").into_owned();
    s = regex!(r"(?i)\bKi([a-h1-8x-])").replace_all(&s, "K$1").into_owned();

    // Captures written with a colon.
    s = s.replace(':', "x");

    // Generic hyphen strip (`N-f3` -> `Nf3`), castling guarded by sentinels.
    s = s.replace("O-O-O", LONG_CASTLE_SENTINEL).replace("O-O", SHORT_CASTLE_SENTINEL);
    s = s.replace('-', "");
    s.replace(LONG_CASTLE_SENTINEL, "O-O-O").replace(SHORT_CASTLE_SENTINEL, "O-O")
}
