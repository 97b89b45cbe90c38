// src/parser/tables.rs
// Packed action/goto tables. One u16 per cell: 2-bit action kind in the top
// bits, 14-bit payload (state or production index) below.

pub const PAYLOAD_MAX: u16 = 0x3FFF;
pub const GOTO_NONE: u16 = u16::MAX;

const KIND_ERROR: u16 = 0;
const KIND_SHIFT: u16 = 1;
const KIND_REDUCE: u16 = 2;
const KIND_ACCEPT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Error,
    Shift(u16),
    Reduce(u16),
    Accept,
}

impl Action {
    #[inline]
    pub fn pack(self) -> u16 {
        match self {
            Action::Error => KIND_ERROR << 14,
            Action::Shift(s) => (KIND_SHIFT << 14) | (s & PAYLOAD_MAX),
            Action::Reduce(p) => (KIND_REDUCE << 14) | (p & PAYLOAD_MAX),
            Action::Accept => KIND_ACCEPT << 14,
        }
    }

    #[inline]
    pub fn unpack(cell: u16) -> Action {
        let payload = cell & PAYLOAD_MAX;
        match cell >> 14 {
            KIND_SHIFT => Action::Shift(payload),
            KIND_REDUCE => Action::Reduce(payload),
            KIND_ACCEPT => Action::Accept,
            _ => Action::Error,
        }
    }
}

/// Parse action table (state x terminal) and goto table (state x non-terminal).
pub struct ParseTables {
    pub n_states: u32,
    pub n_terminals: u16,
    pub n_nonterminals: u16,
    pub action: Vec<u16>, // n_states * n_terminals, row-major, packed actions
    pub goto: Vec<u16>,   // n_states * n_nonterminals, GOTO_NONE where empty
    pub start_state: u16,
}

impl ParseTables {
    #[inline]
    pub fn action(&self, state: u16, terminal: u16) -> Action {
        let i = state as usize * self.n_terminals as usize + terminal as usize;
        Action::unpack(self.action[i])
    }

    #[inline]
    pub fn goto_state(&self, state: u16, nonterminal: u16) -> Option<u16> {
        let i = state as usize * self.n_nonterminals as usize + nonterminal as usize;
        let g = self.goto[i];
        if g == GOTO_NONE { None } else { Some(g) }
    }
}
