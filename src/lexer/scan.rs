// src/lexer/scan.rs
// Streaming-DFA scanner driven by the packed tables in the Language record.

use super::{
    LexTables,
    tokens::{INVALID_TOKEN, TokenKind, keyword_kind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
}

#[inline]
fn keep_kind(k: TokenKind) -> bool {
    !k.is_trivia()
}

fn slice_dbg(src: &[u8], i: usize) -> (usize, String) {
    let lo = i.saturating_sub(16);
    let hi = (i + 16).min(src.len());
    let mut s = String::new();
    for &b in &src[lo..hi] {
        s.push(
            if b.is_ascii_graphic() || b == b' ' || b == b'\n' || b == b'\t' || b == b'\r' {
                b as char
            } else {
                '·'
            },
        );
    }
    (lo, s)
}

/// Keywords come out of the DFA as identifiers; fix them up by spelling.
pub fn retag_keywords_in_place(src: &str, tokens: &mut [Token]) {
    for t in tokens.iter_mut() {
        if t.kind == TokenKind::Ident {
            if let Some(k) = keyword_kind(&src[t.start..t.start + t.len]) {
                t.kind = k;
            }
        }
    }
}

/// Deterministic scanner that mirrors the streaming-emit encoding of the DFA.
/// Returns kept tokens (whitespace/comments filtered out).
pub fn lex(tables: &LexTables, input: &str) -> Result<Vec<Token>, String> {
    let bytes = input.as_bytes();
    let n = bytes.len();

    let mut out: Vec<Token> = Vec::new();

    let mut state = tables.start as usize;
    let mut tok_start: usize = 0;

    for i in 0..n {
        let b = bytes[i];
        let (next, emit) = tables.step(state, b);

        // Reject as-soon-as we see it; include a little context.
        if next == tables.reject {
            let (ctx_lo, ctx) = slice_dbg(bytes, i);
            return Err(format!(
                "fell into REJECT at byte {i} (char {:?}, 0x{:02X}) from state={state}; \
                 context [{}..{}):\n{}",
                b as char,
                b,
                ctx_lo,
                ctx_lo + ctx.len(),
                ctx
            ));
        }

        // If this edge "emits", a token just ended BEFORE consuming b.
        if emit {
            let kind_u16 = tables.token_map[state];
            if kind_u16 == INVALID_TOKEN {
                return Err(format!("emit from non-accepting state={state} at i={i}"));
            }
            let Some(kind) = TokenKind::from_u16(kind_u16) else {
                return Err(format!("unknown token kind {kind_u16} in token_map"));
            };
            if keep_kind(kind) {
                out.push(Token {
                    kind,
                    start: tok_start,
                    len: i - tok_start,
                });
            }
            // The emitting edge already transitions as if we consumed `b`,
            // so the next token starts at `i`.
            tok_start = i;
        }

        state = next as usize;
    }

    // End-of-input: if final state is accepting, emit the final token to `n`.
    let end_kind = tables.token_map[state];
    if end_kind != INVALID_TOKEN {
        let Some(kind) = TokenKind::from_u16(end_kind) else {
            return Err(format!("unknown token kind {end_kind} in token_map"));
        };
        if keep_kind(kind) {
            out.push(Token {
                kind,
                start: tok_start,
                len: n - tok_start,
            });
        }
        retag_keywords_in_place(input, &mut out);
        return Ok(out);
    }

    if n == 0 {
        return Ok(out);
    }

    if state == tables.reject as usize {
        return Err("ended in REJECT".into());
    }

    // Non-accepting but not reject (e.g., unterminated block comment or string).
    Err(format!(
        "ended in non-accepting state={state} (unterminated token?)"
    ))
}
