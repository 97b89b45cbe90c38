// src/language/io.rs
use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use super::{Language, ProductionInfo, SymbolInfo, SymbolVisibility};
use crate::{
    lexer::LexTables,
    parser::tables::ParseTables,
};

fn vis_to_u8(v: SymbolVisibility) -> u8 {
    match v {
        SymbolVisibility::Named => 0,
        SymbolVisibility::Anonymous => 1,
        SymbolVisibility::Auxiliary => 2,
    }
}

fn vis_from_u8(v: u8) -> Result<SymbolVisibility, String> {
    Ok(match v {
        0 => SymbolVisibility::Named,
        1 => SymbolVisibility::Anonymous,
        2 => SymbolVisibility::Auxiliary,
        _ => return Err(format!("bad symbol visibility {v}")),
    })
}

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct LanguageDisk {
    abi_version: u32,
    symbols: Vec<(String, u8, bool)>,
    fields: Vec<String>,
    nonterminal_base: u16,

    lex_n_states: u32,
    #[serde_as(as = "Vec<[_; 256]>")]
    lex_next_emit: Vec<[u16; 256]>,
    lex_token_map: Vec<u16>,
    lex_start: u16,
    lex_reject: u16,

    n_states: u32,
    n_terminals: u16,
    n_nonterminals: u16,
    start_state: u16,
    action: Vec<u16>,
    goto: Vec<u16>,

    productions: Vec<ProdDisk>,
}

#[derive(Serialize, Deserialize)]
struct ProdDisk {
    lhs: u16,
    rhs_len: u8,
    node: Option<u16>,
    fields: Vec<u16>, // 0 = no field
    prec: Option<u8>,
}

impl From<&Language> for LanguageDisk {
    fn from(l: &Language) -> Self {
        Self {
            abi_version: l.abi_version,
            symbols: l
                .symbols
                .iter()
                .map(|s| (s.name.clone(), vis_to_u8(s.visibility), s.terminal))
                .collect(),
            fields: l.fields.clone(),
            nonterminal_base: l.nonterminal_base,
            lex_n_states: l.lexer.n_states,
            lex_next_emit: l.lexer.next_emit.clone(),
            lex_token_map: l.lexer.token_map.clone(),
            lex_start: l.lexer.start,
            lex_reject: l.lexer.reject,
            n_states: l.parse.n_states,
            n_terminals: l.parse.n_terminals,
            n_nonterminals: l.parse.n_nonterminals,
            start_state: l.parse.start_state,
            action: l.parse.action.clone(),
            goto: l.parse.goto.clone(),
            productions: l
                .productions
                .iter()
                .map(|p| ProdDisk {
                    lhs: p.lhs,
                    rhs_len: p.rhs_len,
                    node: p.node,
                    fields: p.fields.iter().map(|f| f.unwrap_or(0)).collect(),
                    prec: p.prec,
                })
                .collect(),
        }
    }
}

impl LanguageDisk {
    fn into_language(self) -> Result<Language, String> {
        let mut symbols = Vec::with_capacity(self.symbols.len());
        for (name, vis, terminal) in self.symbols {
            symbols.push(SymbolInfo {
                name,
                visibility: vis_from_u8(vis)?,
                terminal,
            });
        }
        let productions = self
            .productions
            .into_iter()
            .map(|p| ProductionInfo {
                lhs: p.lhs,
                rhs_len: p.rhs_len,
                node: p.node,
                fields: p
                    .fields
                    .iter()
                    .map(|&f| if f == 0 { None } else { Some(f) })
                    .collect(),
                prec: p.prec,
            })
            .collect();
        Ok(Language {
            abi_version: self.abi_version,
            symbols,
            fields: self.fields,
            lexer: LexTables {
                n_states: self.lex_n_states,
                next_emit: self.lex_next_emit,
                token_map: self.lex_token_map,
                start: self.lex_start,
                reject: self.lex_reject,
            },
            parse: ParseTables {
                n_states: self.n_states,
                n_terminals: self.n_terminals,
                n_nonterminals: self.n_nonterminals,
                action: self.action,
                goto: self.goto,
                start_state: self.start_state,
            },
            productions,
            nonterminal_base: self.nonterminal_base,
        })
    }
}

pub fn save_json(path: &std::path::Path, l: &Language) -> std::io::Result<()> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &LanguageDisk::from(l))?;
    w.flush()
}

pub fn load_json_bytes(data: &[u8]) -> Result<Language, String> {
    serde_json::from_slice::<LanguageDisk>(data)
        .map_err(|e| format!("Failed to parse descriptor JSON: {e}"))?
        .into_language()
}

// -------------------- Compact binary --------------------

const BIN_MAGIC: &[u8; 8] = b"GLDESC01";
const NODE_NONE: u16 = u16::MAX;
const PREC_NONE: u8 = u8::MAX;

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}
fn put_str(out: &mut Vec<u8>, s: &str) {
    put_u16(out, s.len() as u16);
    out.extend_from_slice(s.as_bytes());
}

/// Canonical byte serialization of the whole record. Doubles as the
/// fingerprint the immutability conformance check compares.
pub fn to_bin_bytes(l: &Language) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(BIN_MAGIC);
    put_u32(&mut out, l.abi_version);

    put_u16(&mut out, l.symbols.len() as u16);
    for s in &l.symbols {
        out.push(vis_to_u8(s.visibility));
        out.push(s.terminal as u8);
        put_str(&mut out, &s.name);
    }

    put_u16(&mut out, l.fields.len() as u16);
    for f in &l.fields {
        put_str(&mut out, f);
    }
    put_u16(&mut out, l.nonterminal_base);

    put_u32(&mut out, l.lexer.n_states);
    put_u16(&mut out, l.lexer.start);
    put_u16(&mut out, l.lexer.reject);
    for row in &l.lexer.next_emit {
        for &cell in row.iter() {
            put_u16(&mut out, cell);
        }
    }
    for &tk in &l.lexer.token_map {
        put_u16(&mut out, tk);
    }

    put_u32(&mut out, l.parse.n_states);
    put_u16(&mut out, l.parse.n_terminals);
    put_u16(&mut out, l.parse.n_nonterminals);
    put_u16(&mut out, l.parse.start_state);
    for &a in &l.parse.action {
        put_u16(&mut out, a);
    }
    for &g in &l.parse.goto {
        put_u16(&mut out, g);
    }

    put_u16(&mut out, l.productions.len() as u16);
    for p in &l.productions {
        put_u16(&mut out, p.lhs);
        out.push(p.rhs_len);
        put_u16(&mut out, p.node.unwrap_or(NODE_NONE));
        out.push(p.prec.unwrap_or(PREC_NONE));
        for f in &p.fields {
            put_u16(&mut out, f.unwrap_or(0));
        }
    }
    out
}

pub fn save_bin(path: &std::path::Path, l: &Language) -> std::io::Result<()> {
    let bytes = to_bin_bytes(l);
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    w.write_all(&bytes)?;
    w.flush()
}

#[inline]
fn take_u8(buf: &mut &[u8]) -> Result<u8, String> {
    if buf.is_empty() {
        return Err("truncated u8".into());
    }
    let v = buf[0];
    *buf = &buf[1..];
    Ok(v)
}

#[inline]
fn take_u16(buf: &mut &[u8]) -> Result<u16, String> {
    if buf.len() < 2 {
        return Err("truncated u16".into());
    }
    let mut le = [0u8; 2];
    le.copy_from_slice(&buf[..2]);
    *buf = &buf[2..];
    Ok(u16::from_le_bytes(le))
}

#[inline]
fn take_u32(buf: &mut &[u8]) -> Result<u32, String> {
    if buf.len() < 4 {
        return Err("truncated u32".into());
    }
    let mut le = [0u8; 4];
    le.copy_from_slice(&buf[..4]);
    *buf = &buf[4..];
    Ok(u32::from_le_bytes(le))
}

fn take_str(buf: &mut &[u8]) -> Result<String, String> {
    let len = take_u16(buf)? as usize;
    if buf.len() < len {
        return Err("truncated string".into());
    }
    let (s, rest) = buf.split_at(len);
    *buf = rest;
    String::from_utf8(s.to_vec()).map_err(|e| format!("bad utf-8 in descriptor: {e}"))
}

pub fn load_bin_bytes(mut data: &[u8]) -> Result<Language, String> {
    if data.len() < 8 {
        return Err("bin too short".into());
    }
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&data[..8]);
    if &magic != BIN_MAGIC {
        return Err("bad magic in descriptor .bin".into());
    }
    data = &data[8..];

    let abi_version = take_u32(&mut data)?;

    let n_symbols = take_u16(&mut data)? as usize;
    let mut symbols = Vec::with_capacity(n_symbols);
    for _ in 0..n_symbols {
        let visibility = vis_from_u8(take_u8(&mut data)?)?;
        let terminal = take_u8(&mut data)? != 0;
        let name = take_str(&mut data)?;
        symbols.push(SymbolInfo {
            name,
            visibility,
            terminal,
        });
    }

    let n_fields = take_u16(&mut data)? as usize;
    let mut fields = Vec::with_capacity(n_fields);
    for _ in 0..n_fields {
        fields.push(take_str(&mut data)?);
    }
    let nonterminal_base = take_u16(&mut data)?;

    let lex_n_states = take_u32(&mut data)?;
    let lex_start = take_u16(&mut data)?;
    let lex_reject = take_u16(&mut data)?;
    let mut next_emit = Vec::with_capacity(lex_n_states as usize);
    for _ in 0..lex_n_states {
        let mut row = [0u16; 256];
        for cell in row.iter_mut() {
            *cell = take_u16(&mut data)?;
        }
        next_emit.push(row);
    }
    let mut token_map = Vec::with_capacity(lex_n_states as usize);
    for _ in 0..lex_n_states {
        token_map.push(take_u16(&mut data)?);
    }

    let n_states = take_u32(&mut data)?;
    let n_terminals = take_u16(&mut data)?;
    let n_nonterminals = take_u16(&mut data)?;
    let start_state = take_u16(&mut data)?;
    let n_action = (n_states as usize)
        .checked_mul(n_terminals as usize)
        .ok_or("action size overflow")?;
    let mut action = Vec::with_capacity(n_action);
    for _ in 0..n_action {
        action.push(take_u16(&mut data)?);
    }
    let n_goto = (n_states as usize)
        .checked_mul(n_nonterminals as usize)
        .ok_or("goto size overflow")?;
    let mut goto = Vec::with_capacity(n_goto);
    for _ in 0..n_goto {
        goto.push(take_u16(&mut data)?);
    }

    let n_prods = take_u16(&mut data)? as usize;
    let mut productions = Vec::with_capacity(n_prods);
    for _ in 0..n_prods {
        let lhs = take_u16(&mut data)?;
        let rhs_len = take_u8(&mut data)?;
        let node = match take_u16(&mut data)? {
            NODE_NONE => None,
            n => Some(n),
        };
        let prec = match take_u8(&mut data)? {
            PREC_NONE => None,
            p => Some(p),
        };
        let mut prod_fields = Vec::with_capacity(rhs_len as usize);
        for _ in 0..rhs_len {
            let f = take_u16(&mut data)?;
            prod_fields.push(if f == 0 { None } else { Some(f) });
        }
        productions.push(ProductionInfo {
            lhs,
            rhs_len,
            node,
            fields: prod_fields,
            prec,
        });
    }

    Ok(Language {
        abi_version,
        symbols,
        fields,
        lexer: LexTables {
            n_states: lex_n_states,
            next_emit,
            token_map,
            start: lex_start,
            reject: lex_reject,
        },
        parse: ParseTables {
            n_states,
            n_terminals,
            n_nonterminals,
            action,
            goto,
            start_state,
        },
        productions,
        nonterminal_base,
    })
}
