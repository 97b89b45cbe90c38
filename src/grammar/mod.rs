// src/grammar/mod.rs
// Grammar data model: symbols, productions (with node naming, field labels,
// and precedence), and a small builder the baked grammar is written against.

pub mod ghostlang;

use anyhow::{Result, bail};
use hashbrown::{HashMap, HashSet};

use crate::lexer::tokens::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// One right-hand-side slot as written in the baked grammar: a terminal or a
/// non-terminal by name, optionally labeled with a field.
#[derive(Clone, Copy)]
pub enum Part {
    T(TokenKind),
    N(&'static str),
    TF(TokenKind, &'static str),
    NF(&'static str, &'static str),
}

/// Resolved grammar symbol. Terminals carry the TokenKind discriminant,
/// non-terminals an index into `Grammar::nonterminals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GSym {
    Term(u16),
    NonTerm(u16),
}

/// How a production shows up in syntax trees: as a node named after its LHS,
/// as a node under an alias name, or spliced into the parent (hidden rules).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeName {
    Rule,
    Alias(&'static str),
    Hidden,
}

#[derive(Debug, Clone)]
pub struct Production {
    pub lhs: u16,
    pub rhs: Vec<GSym>,
    pub node: NodeName,
    pub fields: Vec<Option<&'static str>>, // aligned with rhs
    pub prec: Option<u8>,
}

pub struct Grammar {
    pub start: &'static str,
    pub nonterminals: Vec<&'static str>,
    pub productions: Vec<Production>,
    pub aliases: Vec<&'static str>,
    pub term_prec: HashMap<u16, (u8, Assoc)>,
}

impl Grammar {
    pub fn start_nt(&self) -> u16 {
        // validated by finish()
        self.nonterminals
            .iter()
            .position(|n| *n == self.start)
            .unwrap_or(0) as u16
    }

    /// Effective precedence of a production: explicit, else that of its last
    /// terminal (the yacc default).
    pub fn prod_prec(&self, p: &Production) -> Option<u8> {
        if p.prec.is_some() {
            return p.prec;
        }
        p.rhs.iter().rev().find_map(|s| match s {
            GSym::Term(t) => self.term_prec.get(t).map(|(lvl, _)| *lvl),
            GSym::NonTerm(_) => None,
        })
    }
}

pub struct GrammarBuilder {
    start: &'static str,
    nonterminals: Vec<&'static str>,
    nt_index: HashMap<&'static str, u16>,
    productions: Vec<Production>,
    aliases: Vec<&'static str>,
    term_prec: HashMap<u16, (u8, Assoc)>,
}

impl GrammarBuilder {
    pub fn new(start: &'static str) -> Self {
        let mut b = Self {
            start,
            nonterminals: Vec::new(),
            nt_index: HashMap::new(),
            productions: Vec::new(),
            aliases: Vec::new(),
            term_prec: HashMap::new(),
        };
        b.nt_id(start);
        b
    }

    fn nt_id(&mut self, name: &'static str) -> u16 {
        if let Some(&id) = self.nt_index.get(name) {
            return id;
        }
        let id = self.nonterminals.len() as u16;
        self.nonterminals.push(name);
        self.nt_index.insert(name, id);
        id
    }

    pub fn term_prec(&mut self, kind: TokenKind, level: u8, assoc: Assoc) {
        self.term_prec.insert(kind as u16, (level, assoc));
    }

    fn add(
        &mut self,
        lhs: &'static str,
        parts: &[Part],
        node: NodeName,
        prec: Option<u8>,
    ) {
        let lhs_id = self.nt_id(lhs);
        let mut rhs = Vec::with_capacity(parts.len());
        let mut fields = Vec::with_capacity(parts.len());
        for p in parts {
            let (sym, field) = match *p {
                Part::T(k) => (GSym::Term(k as u16), None),
                Part::TF(k, f) => (GSym::Term(k as u16), Some(f)),
                Part::N(n) => (GSym::NonTerm(self.nt_id(n)), None),
                Part::NF(n, f) => (GSym::NonTerm(self.nt_id(n)), Some(f)),
            };
            rhs.push(sym);
            fields.push(field);
        }
        self.productions.push(Production {
            lhs: lhs_id,
            rhs,
            node,
            fields,
            prec,
        });
    }

    /// Plain rule. Underscore-prefixed rules are hidden (spliced in trees).
    pub fn rule(&mut self, lhs: &'static str, parts: &[Part]) {
        let node = if lhs.starts_with('_') {
            NodeName::Hidden
        } else {
            NodeName::Rule
        };
        self.add(lhs, parts, node, None);
    }

    pub fn rule_prec(&mut self, lhs: &'static str, parts: &[Part], prec: u8) {
        let node = if lhs.starts_with('_') {
            NodeName::Hidden
        } else {
            NodeName::Rule
        };
        self.add(lhs, parts, node, Some(prec));
    }

    /// Rule whose node is created under `alias` instead of the LHS name.
    pub fn alias(&mut self, lhs: &'static str, alias: &'static str, parts: &[Part]) {
        if !self.aliases.contains(&alias) {
            self.aliases.push(alias);
        }
        self.add(lhs, parts, NodeName::Alias(alias), None);
    }

    pub fn finish(self) -> Result<Grammar> {
        // Every referenced non-terminal must have at least one production.
        let mut has_prod: HashSet<u16> = HashSet::new();
        for p in &self.productions {
            has_prod.insert(p.lhs);
        }
        for p in &self.productions {
            for s in &p.rhs {
                if let GSym::NonTerm(nt) = s {
                    if !has_prod.contains(nt) {
                        bail!(
                            "non-terminal `{}` is referenced but has no production",
                            self.nonterminals[*nt as usize]
                        );
                    }
                }
            }
        }
        if !has_prod.contains(&0) {
            bail!("start rule `{}` has no production", self.start);
        }
        if self.productions.len() >= crate::parser::tables::PAYLOAD_MAX as usize {
            bail!("too many productions to pack into action cells");
        }
        Ok(Grammar {
            start: self.start,
            nonterminals: self.nonterminals,
            productions: self.productions,
            aliases: self.aliases,
            term_prec: self.term_prec,
        })
    }
}
