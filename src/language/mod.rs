// src/language/mod.rs
// The Language Descriptor: one immutable record carrying everything a host
// needs to drive lexing and parsing for ghostlang.

pub mod io;

use anyhow::{Result, bail};
use hashbrown::HashMap;

use crate::{
    grammar::{self, NodeName},
    lexer::{
        LexTables,
        dfa::StreamingDfa,
        tokens::{ALL_KINDS, INVALID_TOKEN, N_TERMINALS, TokenKind},
    },
    parser::{
        build,
        tables::{Action, GOTO_NONE, ParseTables},
    },
};

/// Protocol number between this descriptor and hosts.
pub const ABI_VERSION: u32 = 15;
/// Oldest host protocol the descriptor's layout is still compatible with.
pub const MIN_COMPATIBLE_ABI_VERSION: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolVisibility {
    /// Appears in trees under its own name (rules, identifier/number/string).
    Named,
    /// Literal tokens: keywords, punctuation, operators.
    Anonymous,
    /// Internal machinery: hidden rules, trivia, end-of-input.
    Auxiliary,
}

#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: String,
    pub visibility: SymbolVisibility,
    pub terminal: bool,
}

#[derive(Debug, Clone)]
pub struct ProductionInfo {
    /// LHS as a symbol id (non-terminal range).
    pub lhs: u16,
    pub rhs_len: u8,
    /// Symbol the reduction creates a node under; None means spliced.
    pub node: Option<u16>,
    /// Field id per RHS child, aligned with the production's RHS.
    pub fields: Vec<Option<u16>>,
    pub prec: Option<u8>,
}

/// The immutable Language Descriptor. Built once, never mutated; the pointer
/// handed out by `tree_sitter_ghostlang` refers to a process-lifetime value
/// of this type.
pub struct Language {
    pub abi_version: u32,
    /// 0 = end-of-input, then terminals, non-terminals, alias symbols.
    pub symbols: Vec<SymbolInfo>,
    /// Field names; ids are 1-based (0 means "no field").
    pub fields: Vec<String>,
    pub lexer: LexTables,
    pub parse: ParseTables,
    pub productions: Vec<ProductionInfo>,
    /// Symbol id of the first non-terminal.
    pub nonterminal_base: u16,
}

impl Language {
    pub fn symbol_name(&self, sym: u16) -> &str {
        self.symbols
            .get(sym as usize)
            .map_or("", |s| s.name.as_str())
    }

    pub fn field_name(&self, id: u16) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.fields.get(id as usize - 1).map(|s| s.as_str())
    }

    pub fn field_id(&self, name: &str) -> Option<u16> {
        self.fields
            .iter()
            .position(|f| f == name)
            .map(|i| i as u16 + 1)
    }

    pub fn is_named(&self, sym: u16) -> bool {
        self.symbols
            .get(sym as usize)
            .is_some_and(|s| s.visibility == SymbolVisibility::Named)
    }

    /// Range-check every cross-reference in the record: actions, gotos,
    /// production metadata, and the lexer tables.
    pub fn validate(&self) -> Result<()> {
        let n_states = self.parse.n_states as usize;
        let n_symbols = self.symbols.len() as u16;
        let n_prods = self.productions.len() as u16;
        let n_nts = self.parse.n_nonterminals;

        if self.symbols.is_empty() || !self.symbols[0].terminal {
            bail!("symbol table must start with the end-of-input symbol");
        }
        if self.nonterminal_base != N_TERMINALS {
            bail!("non-terminal base does not follow the terminal range");
        }

        let expect_actions = n_states * self.parse.n_terminals as usize;
        if self.parse.action.len() != expect_actions {
            bail!(
                "action table has {} cells, expected {expect_actions}",
                self.parse.action.len()
            );
        }
        for (i, &cell) in self.parse.action.iter().enumerate() {
            match Action::unpack(cell) {
                Action::Shift(s) if (s as usize) >= n_states => {
                    bail!("action cell {i}: shift to missing state {s}")
                }
                Action::Reduce(p) if p >= n_prods => {
                    bail!("action cell {i}: reduce by missing production {p}")
                }
                _ => {}
            }
        }

        let expect_gotos = n_states * n_nts as usize;
        if self.parse.goto.len() != expect_gotos {
            bail!(
                "goto table has {} cells, expected {expect_gotos}",
                self.parse.goto.len()
            );
        }
        for (i, &g) in self.parse.goto.iter().enumerate() {
            if g != GOTO_NONE && (g as usize) >= n_states {
                bail!("goto cell {i}: missing state {g}");
            }
        }

        for (i, p) in self.productions.iter().enumerate() {
            if p.lhs < self.nonterminal_base || p.lhs >= self.nonterminal_base + n_nts {
                bail!("production {i}: lhs symbol {} out of range", p.lhs);
            }
            if let Some(n) = p.node {
                if n >= n_symbols {
                    bail!("production {i}: node symbol {n} out of range");
                }
            }
            if p.fields.len() != p.rhs_len as usize {
                bail!("production {i}: field labels not aligned with rhs");
            }
            for f in p.fields.iter().flatten() {
                if *f == 0 || *f as usize > self.fields.len() {
                    bail!("production {i}: field id {f} out of range");
                }
            }
        }

        let lex_states = self.lexer.n_states as usize;
        if self.lexer.next_emit.len() != lex_states || self.lexer.token_map.len() != lex_states {
            bail!("lexer tables disagree on state count");
        }
        if self.lexer.start as usize >= lex_states || self.lexer.reject as usize >= lex_states {
            bail!("lexer start/reject state out of range");
        }
        for (s, row) in self.lexer.next_emit.iter().enumerate() {
            for &cell in row.iter() {
                if ((cell & 0x7FFF) as usize) >= lex_states {
                    bail!("lexer state {s}: transition to missing state");
                }
            }
        }
        for (s, &tk) in self.lexer.token_map.iter().enumerate() {
            if tk != INVALID_TOKEN && TokenKind::from_u16(tk).is_none() {
                bail!("lexer state {s}: token_map names unknown kind {tk}");
            }
        }

        Ok(())
    }
}

fn terminal_visibility(k: TokenKind) -> SymbolVisibility {
    use TokenKind::*;
    match k {
        Ident | Number | String => SymbolVisibility::Named,
        White | LineComment | BlockComment => SymbolVisibility::Auxiliary,
        _ => SymbolVisibility::Anonymous,
    }
}

/// Assemble the full descriptor: lexer tables from the hand-built DFA, parse
/// tables from the baked grammar, plus symbol/field/production metadata.
pub fn build_language() -> Result<Language> {
    let g = grammar::ghostlang::grammar()?;
    let parse = build::build_tables(&g)?;
    let lexer = LexTables::from_dfa(&StreamingDfa::new());

    let mut symbols = Vec::with_capacity(
        1 + ALL_KINDS.len() + g.nonterminals.len() + g.aliases.len(),
    );
    symbols.push(SymbolInfo {
        name: "end".into(),
        visibility: SymbolVisibility::Auxiliary,
        terminal: true,
    });
    for &k in ALL_KINDS {
        symbols.push(SymbolInfo {
            name: k.display_name().into(),
            visibility: terminal_visibility(k),
            terminal: true,
        });
    }
    let nonterminal_base = symbols.len() as u16;
    for name in &g.nonterminals {
        symbols.push(SymbolInfo {
            name: (*name).into(),
            visibility: if name.starts_with('_') {
                SymbolVisibility::Auxiliary
            } else {
                SymbolVisibility::Named
            },
            terminal: false,
        });
    }
    let alias_base = symbols.len() as u16;
    for name in &g.aliases {
        symbols.push(SymbolInfo {
            name: (*name).into(),
            visibility: SymbolVisibility::Named,
            terminal: false,
        });
    }

    // Field ids in first-use order, 1-based.
    let mut fields: Vec<String> = Vec::new();
    let mut field_ids: HashMap<&'static str, u16> = HashMap::new();
    let mut productions = Vec::with_capacity(g.productions.len());
    for p in &g.productions {
        let field_of = |name: &'static str, fields: &mut Vec<String>, ids: &mut HashMap<&'static str, u16>| {
            *ids.entry(name).or_insert_with(|| {
                fields.push(name.to_string());
                fields.len() as u16
            })
        };
        let fields_resolved: Vec<Option<u16>> = p
            .fields
            .iter()
            .copied()
            .map(|f| f.map(|name| field_of(name, &mut fields, &mut field_ids)))
            .collect();
        let node = match p.node {
            NodeName::Hidden => None,
            NodeName::Rule => Some(nonterminal_base + p.lhs),
            NodeName::Alias(a) => {
                let idx = g
                    .aliases
                    .iter()
                    .position(|n| *n == a)
                    .ok_or_else(|| anyhow::anyhow!("alias `{a}` missing from alias table"))?;
                Some(alias_base + idx as u16)
            }
        };
        productions.push(ProductionInfo {
            lhs: nonterminal_base + p.lhs,
            rhs_len: p.rhs.len() as u8,
            node,
            fields: fields_resolved,
            prec: p.prec,
        });
    }

    let lang = Language {
        abi_version: ABI_VERSION,
        symbols,
        fields,
        lexer,
        parse,
        productions,
        nonterminal_base,
    };
    lang.validate()?;
    Ok(lang)
}
