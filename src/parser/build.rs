// src/parser/build.rs
// SLR(1) table construction: LR(0) item sets with kernel interning, then
// FOLLOW-driven reduce placement with precedence conflict resolution.

use anyhow::{Result, bail};
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use super::tables::{Action, GOTO_NONE, PAYLOAD_MAX, ParseTables};
use crate::{
    grammar::{Assoc, GSym, Grammar},
    lexer::tokens::{N_TERMINALS, TokenKind},
};

/// Terminal column 0 is the end-of-input symbol.
pub const END: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Item {
    prod: u16,
    dot: u16,
}

fn term_name(t: u16) -> &'static str {
    if t == END {
        "end"
    } else {
        TokenKind::from_u16(t).map_or("?", |k| k.display_name())
    }
}

struct Builder<'g> {
    g: &'g Grammar,
    // grammar productions plus the augmented start production at the end
    rhs: Vec<Vec<GSym>>,
    lhs: Vec<u16>,
    aug: u16,
    prods_of: HashMap<u16, Vec<u16>>,
    nullable: HashSet<u16>,
    first: Vec<HashSet<u16>>,
    follow: Vec<HashSet<u16>>,
}

impl<'g> Builder<'g> {
    fn new(g: &'g Grammar) -> Self {
        let n_nts = g.nonterminals.len() as u16;
        let mut rhs: Vec<Vec<GSym>> = g.productions.iter().map(|p| p.rhs.clone()).collect();
        let mut lhs: Vec<u16> = g.productions.iter().map(|p| p.lhs).collect();
        let aug = rhs.len() as u16;
        rhs.push(vec![GSym::NonTerm(g.start_nt())]);
        lhs.push(n_nts); // virtual start symbol

        let mut prods_of: HashMap<u16, Vec<u16>> = HashMap::new();
        for (i, &l) in lhs.iter().enumerate() {
            prods_of.entry(l).or_default().push(i as u16);
        }

        let mut b = Self {
            g,
            rhs,
            lhs,
            aug,
            prods_of,
            nullable: HashSet::new(),
            first: vec![HashSet::new(); n_nts as usize + 1],
            follow: vec![HashSet::new(); n_nts as usize + 1],
        };
        b.compute_nullable();
        b.compute_first();
        b.compute_follow();
        b
    }

    fn compute_nullable(&mut self) {
        loop {
            let mut changed = false;
            for (p, rhs) in self.rhs.iter().enumerate() {
                let l = self.lhs[p];
                if self.nullable.contains(&l) {
                    continue;
                }
                let all = rhs.iter().all(|s| match s {
                    GSym::Term(_) => false,
                    GSym::NonTerm(n) => self.nullable.contains(n),
                });
                if all {
                    self.nullable.insert(l);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn compute_first(&mut self) {
        loop {
            let mut changed = false;
            for (p, rhs) in self.rhs.iter().enumerate() {
                let l = self.lhs[p] as usize;
                for s in rhs {
                    match s {
                        GSym::Term(t) => {
                            if self.first[l].insert(*t) {
                                changed = true;
                            }
                            break;
                        }
                        GSym::NonTerm(n) => {
                            let add: Vec<u16> =
                                self.first[*n as usize].iter().copied().collect();
                            for t in add {
                                if self.first[l].insert(t) {
                                    changed = true;
                                }
                            }
                            if !self.nullable.contains(n) {
                                break;
                            }
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn first_of_seq(&self, seq: &[GSym]) -> (HashSet<u16>, bool) {
        let mut out = HashSet::new();
        for s in seq {
            match s {
                GSym::Term(t) => {
                    out.insert(*t);
                    return (out, false);
                }
                GSym::NonTerm(n) => {
                    out.extend(self.first[*n as usize].iter().copied());
                    if !self.nullable.contains(n) {
                        return (out, false);
                    }
                }
            }
        }
        (out, true)
    }

    fn compute_follow(&mut self) {
        self.follow[self.g.start_nt() as usize].insert(END);
        loop {
            let mut changed = false;
            for (p, rhs) in self.rhs.iter().enumerate() {
                let l = self.lhs[p] as usize;
                for (i, s) in rhs.iter().enumerate() {
                    let GSym::NonTerm(n) = s else { continue };
                    let n = *n as usize;
                    let (firsts, tail_nullable) = self.first_of_seq(&rhs[i + 1..]);
                    for t in firsts {
                        if self.follow[n].insert(t) {
                            changed = true;
                        }
                    }
                    if tail_nullable {
                        let add: Vec<u16> = self.follow[l].iter().copied().collect();
                        for t in add {
                            if self.follow[n].insert(t) {
                                changed = true;
                            }
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn closure(&self, kernel: &[Item]) -> Vec<Item> {
        let mut seen: HashSet<Item> = kernel.iter().copied().collect();
        let mut work: Vec<Item> = kernel.to_vec();
        while let Some(it) = work.pop() {
            let rhs = &self.rhs[it.prod as usize];
            if let Some(GSym::NonTerm(n)) = rhs.get(it.dot as usize) {
                if let Some(ps) = self.prods_of.get(n) {
                    for &p in ps {
                        let item = Item { prod: p, dot: 0 };
                        if seen.insert(item) {
                            work.push(item);
                        }
                    }
                }
            }
        }
        let mut out: Vec<Item> = seen.into_iter().collect();
        out.sort();
        out
    }
}

// Sort key giving terminals before non-terminals, each in id order, so state
// numbering is deterministic.
fn sym_key(s: GSym) -> (u8, u16) {
    match s {
        GSym::Term(t) => (0, t),
        GSym::NonTerm(n) => (1, n),
    }
}

fn fmt_prod(g: &Grammar, p: u16) -> String {
    let prod = &g.productions[p as usize];
    let mut s = format!("{} ->", g.nonterminals[prod.lhs as usize]);
    for sym in &prod.rhs {
        match sym {
            GSym::Term(t) => s.push_str(&format!(" '{}'", term_name(*t))),
            GSym::NonTerm(n) => s.push_str(&format!(" {}", g.nonterminals[*n as usize])),
        }
    }
    s
}

/// Resolve a shift/reduce pair through declared precedence, shift winning on
/// a strictly higher terminal level, reduce on a strictly lower one, and
/// associativity breaking ties.
fn resolve(
    g: &Grammar,
    state: u16,
    terminal: u16,
    shift: Action,
    reduce_prod: u16,
) -> Result<Action> {
    let tp = g.term_prec.get(&terminal).copied();
    let pp = g.prod_prec(&g.productions[reduce_prod as usize]);
    match (tp, pp) {
        (Some((tl, assoc)), Some(pl)) => {
            if tl > pl {
                Ok(shift)
            } else if tl < pl {
                Ok(Action::Reduce(reduce_prod))
            } else {
                match assoc {
                    Assoc::Left => Ok(Action::Reduce(reduce_prod)),
                    Assoc::Right => Ok(shift),
                }
            }
        }
        _ => bail!(
            "state {state}: unresolved shift/reduce conflict on '{}' (reduce {})",
            term_name(terminal),
            fmt_prod(g, reduce_prod)
        ),
    }
}

fn set_action(
    g: &Grammar,
    row: &mut [u16],
    state: u16,
    terminal: u16,
    incoming: Action,
) -> Result<()> {
    let cell = &mut row[terminal as usize];
    let existing = Action::unpack(*cell);
    let merged = match (existing, incoming) {
        (Action::Error, a) => a,
        (a, b) if a == b => a,
        (Action::Shift(_), Action::Reduce(p)) => resolve(g, state, terminal, existing, p)?,
        (Action::Reduce(p), s @ Action::Shift(_)) => resolve(g, state, terminal, s, p)?,
        (Action::Reduce(a), Action::Reduce(b)) => bail!(
            "state {state}: reduce/reduce conflict on '{}' between {} and {}",
            term_name(terminal),
            fmt_prod(g, a),
            fmt_prod(g, b)
        ),
        (a, b) => bail!(
            "state {state}: conflicting actions {a:?} / {b:?} on '{}'",
            term_name(terminal)
        ),
    };
    *cell = merged.pack();
    Ok(())
}

/// Build the SLR(1) action and goto tables for `g`. Unresolved conflicts are
/// hard errors naming the state, lookahead, and productions involved.
pub fn build_tables(g: &Grammar) -> Result<ParseTables> {
    let b = Builder::new(g);
    let n_nts = g.nonterminals.len();

    // Explore the LR(0) automaton, interning kernels.
    let mut kernels: HashMap<Vec<Item>, u16> = HashMap::new();
    let mut states: Vec<Vec<Item>> = Vec::new();
    let start_kernel = vec![Item { prod: b.aug, dot: 0 }];
    kernels.insert(start_kernel.clone(), 0);
    states.push(start_kernel);

    // per state: (symbol, target) transitions and completed productions
    let mut edges: Vec<Vec<(GSym, u16)>> = Vec::new();
    let mut completed: Vec<Vec<u16>> = Vec::new();

    let mut i = 0usize;
    while i < states.len() {
        let cl = b.closure(&states[i]);
        let mut by_sym: HashMap<GSym, Vec<Item>> = HashMap::new();
        let mut done: Vec<u16> = Vec::new();
        for it in &cl {
            match b.rhs[it.prod as usize].get(it.dot as usize) {
                Some(&sym) => by_sym.entry(sym).or_default().push(Item {
                    prod: it.prod,
                    dot: it.dot + 1,
                }),
                None => done.push(it.prod),
            }
        }
        done.sort_unstable();

        let mut keys: Vec<GSym> = by_sym.keys().copied().collect();
        keys.sort_by_key(|s| sym_key(*s));

        let mut out_edges = Vec::with_capacity(keys.len());
        for sym in keys {
            let mut kernel = by_sym.remove(&sym).unwrap_or_default();
            kernel.sort();
            kernel.dedup();
            let next = states.len() as u16;
            let id = *kernels.entry(kernel.clone()).or_insert_with(|| {
                states.push(kernel);
                next
            });
            out_edges.push((sym, id));
        }
        edges.push(out_edges);
        completed.push(done);
        i += 1;
    }

    let n_states = states.len();
    if n_states > PAYLOAD_MAX as usize {
        bail!("{n_states} parser states exceed the packed-cell payload range");
    }
    log::debug!(
        "lr(0) automaton: {n_states} states, {} productions",
        g.productions.len()
    );

    // Fill rows in parallel; each row resolves its own conflicts.
    let rows: Vec<(Vec<u16>, Vec<u16>)> = (0..n_states)
        .into_par_iter()
        .map(|s| -> Result<(Vec<u16>, Vec<u16>)> {
            let state = s as u16;
            let mut action = vec![Action::Error.pack(); N_TERMINALS as usize];
            let mut goto = vec![GOTO_NONE; n_nts];

            for &(sym, to) in &edges[s] {
                match sym {
                    GSym::Term(t) => {
                        set_action(g, &mut action, state, t, Action::Shift(to))?;
                    }
                    GSym::NonTerm(n) => goto[n as usize] = to,
                }
            }
            for &p in &completed[s] {
                if p == b.aug {
                    set_action(g, &mut action, state, END, Action::Accept)?;
                    continue;
                }
                let lhs = b.lhs[p as usize] as usize;
                let mut lookaheads: Vec<u16> = b.follow[lhs].iter().copied().collect();
                lookaheads.sort_unstable();
                for t in lookaheads {
                    set_action(g, &mut action, state, t, Action::Reduce(p))?;
                }
            }
            Ok((action, goto))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut action = Vec::with_capacity(n_states * N_TERMINALS as usize);
    let mut goto = Vec::with_capacity(n_states * n_nts);
    for (a, gt) in rows {
        action.extend_from_slice(&a);
        goto.extend_from_slice(&gt);
    }

    Ok(ParseTables {
        n_states: n_states as u32,
        n_terminals: N_TERMINALS,
        n_nonterminals: n_nts as u16,
        action,
        goto,
        start_state: 0,
    })
}
