// src/parser/driver.rs
// Minimal host for the descriptor: checks the ABI version, runs the LR
// automaton off the packed tables, and builds a syntax tree with spliced
// auxiliary rules, alias nodes, and field labels.

use anyhow::{Result, anyhow, bail};

use super::{build::END, tables::Action};
use crate::{
    language::{Language, MIN_COMPATIBLE_ABI_VERSION},
    lexer::{TokenKind, scan},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub symbol: u16,
    pub field: Option<u16>,
    pub start: usize,
    pub end: usize,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub root: Node,
}

impl Node {
    /// Tree-sitter style s-expression over named nodes, with field labels.
    pub fn sexp(&self, lang: &Language) -> String {
        let mut out = String::new();
        self.write_sexp(lang, &mut out);
        out
    }

    fn write_sexp(&self, lang: &Language, out: &mut String) {
        if !lang.is_named(self.symbol) {
            return;
        }
        if !out.is_empty() && !out.ends_with('(') {
            out.push(' ');
        }
        if let Some(f) = self.field {
            if let Some(name) = lang.field_name(f) {
                out.push_str(name);
                out.push_str(": ");
            }
        }
        out.push('(');
        out.push_str(lang.symbol_name(self.symbol));
        for c in &self.children {
            c.write_sexp(lang, out);
        }
        out.push(')');
    }
}

/// Tokens the recovery path skips to before retrying.
fn is_sync(sym: u16) -> bool {
    sym == TokenKind::Semicolon as u16 || sym == TokenKind::RBrace as u16
}

pub struct Parser<'l> {
    lang: &'l Language,
}

impl<'l> Parser<'l> {
    /// Rejects descriptors whose ABI version this host does not speak.
    pub fn new(lang: &'l Language) -> Result<Self> {
        if lang.abi_version < MIN_COMPATIBLE_ABI_VERSION
            || lang.abi_version > crate::language::ABI_VERSION
        {
            bail!(
                "descriptor speaks ABI version {}, host supports {}..={}",
                lang.abi_version,
                MIN_COMPATIBLE_ABI_VERSION,
                crate::language::ABI_VERSION
            );
        }
        Ok(Self { lang })
    }

    pub fn parse(&self, src: &str) -> Result<Tree> {
        let lang = self.lang;
        let tokens = scan::lex(&lang.lexer, src).map_err(|e| anyhow!(e))?;

        // (terminal symbol, start, end); end-of-input sentinel last
        let mut input: Vec<(u16, usize, usize)> = tokens
            .iter()
            .map(|t| (t.kind as u16, t.start, t.start + t.len))
            .collect();
        input.push((END, src.len(), src.len()));

        let mut states: Vec<u16> = vec![lang.parse.start_state];
        let mut frames: Vec<Vec<Node>> = Vec::new();
        let mut first_error: Option<usize> = None;

        let mut i = 0usize;
        loop {
            let (sym, tstart, tend) = input[i];
            match lang.parse.action(*states.last().ok_or_else(stack_underflow)?, sym) {
                Action::Shift(next) => {
                    frames.push(vec![Node {
                        symbol: sym,
                        field: None,
                        start: tstart,
                        end: tend,
                        children: Vec::new(),
                    }]);
                    states.push(next);
                    i += 1;
                }
                Action::Reduce(p) => {
                    let info = &lang.productions[p as usize];
                    let n = info.rhs_len as usize;
                    if frames.len() < n || states.len() <= n {
                        return Err(stack_underflow());
                    }
                    let popped: Vec<Vec<Node>> = frames.split_off(frames.len() - n);
                    states.truncate(states.len() - n);

                    let mut children: Vec<Node> = Vec::new();
                    for (j, mut group) in popped.into_iter().enumerate() {
                        if let Some(f) = info.fields[j] {
                            for node in group.iter_mut() {
                                node.field = Some(f);
                            }
                        }
                        children.extend(group);
                    }

                    let entry = match info.node {
                        Some(name_sym) => {
                            let (start, end) = match (children.first(), children.last()) {
                                (Some(f), Some(l)) => (f.start, l.end),
                                _ => (tstart, tstart),
                            };
                            vec![Node {
                                symbol: name_sym,
                                field: None,
                                start,
                                end,
                                children,
                            }]
                        }
                        None => children,
                    };

                    let top = *states.last().ok_or_else(stack_underflow)?;
                    let nt = info.lhs - lang.nonterminal_base;
                    let next = lang
                        .parse
                        .goto_state(top, nt)
                        .ok_or_else(|| anyhow!("corrupt tables: missing goto"))?;
                    states.push(next);
                    frames.push(entry);
                }
                Action::Accept => break,
                Action::Error => {
                    first_error.get_or_insert(tstart);
                    // Panic-mode recovery: skip to a sync token, pop states
                    // until one of them can act on it, then retry.
                    while i < input.len() - 1 && !is_sync(input[i].0) {
                        i += 1;
                    }
                    if input[i].0 == END {
                        break;
                    }
                    let sync = input[i].0;
                    while states.len() > 1
                        && matches!(
                            lang.parse.action(*states.last().ok_or_else(stack_underflow)?, sync),
                            Action::Error
                        )
                    {
                        states.pop();
                        frames.pop();
                    }
                    if matches!(
                        lang.parse.action(*states.last().ok_or_else(stack_underflow)?, sync),
                        Action::Error
                    ) {
                        // Nothing on the stack handles the sync token either;
                        // drop it and keep scanning.
                        i += 1;
                        if i >= input.len() {
                            break;
                        }
                    }
                }
            }
        }

        if let Some(pos) = first_error {
            bail!("syntax error at byte {pos}");
        }

        let mut roots = frames.pop().ok_or_else(stack_underflow)?;
        if roots.len() != 1 || !frames.is_empty() {
            bail!("corrupt tables: parse did not reduce to a single root");
        }
        let root = roots.pop().ok_or_else(stack_underflow)?;
        Ok(Tree { root })
    }
}

fn stack_underflow() -> anyhow::Error {
    anyhow!("corrupt tables: parse stack underflow")
}
