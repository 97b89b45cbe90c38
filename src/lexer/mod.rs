// src/lexer/mod.rs
pub mod dfa;
pub mod scan;
pub mod tokens;

pub use scan::{Token, lex};
pub use tokens::{INVALID_TOKEN, TokenKind};

use dfa::StreamingDfa;

/// Packed lexer description carried by the Language record.
///
/// One row of 256 cells per DFA state; each cell is `(emit << 15) | next`.
pub struct LexTables {
    pub n_states: u32,
    pub next_emit: Vec<[u16; 256]>,
    pub token_map: Vec<u16>, // state -> TokenKind as u16, or INVALID_TOKEN
    pub start: u16,
    pub reject: u16,
}

impl LexTables {
    pub fn from_dfa(d: &StreamingDfa) -> Self {
        let n_states = d.next.len();
        let mut next_emit = Vec::with_capacity(n_states);
        for s in 0..n_states {
            let mut row = [0u16; 256];
            for b in 0..256 {
                let nx = d.next[s][b];
                let emit = if nx.emit { 1u16 } else { 0u16 };
                row[b] = (emit << 15) | (nx.state & 0x7FFF);
            }
            next_emit.push(row);
        }
        Self {
            n_states: n_states as u32,
            next_emit,
            token_map: d.token_map.to_vec(),
            start: d.start,
            reject: d.reject,
        }
    }

    #[inline]
    pub fn step(&self, state: usize, byte: u8) -> (u16, bool) {
        let cell = self.next_emit[state][byte as usize];
        (cell & 0x7FFF, cell & 0x8000 != 0)
    }
}
