//! Conformance checks for the descriptor contract: symbol presence, handle
//! stability, immutability, thread safety, and ABI acceptance.

use tree_sitter_ghostlang::{
    ABI_VERSION, MIN_COMPATIBLE_ABI_VERSION, Parser, language,
    language::{build_language, io},
    tree_sitter_ghostlang,
};

#[test]
fn handle_is_non_null() {
    let handle = tree_sitter_ghostlang();
    assert!(!handle.is_null());
}

#[test]
fn handle_is_stable_across_calls() {
    let a = tree_sitter_ghostlang();
    let b = tree_sitter_ghostlang();
    assert_eq!(a, b, "repeated calls must return the same handle");
}

#[test]
fn handle_is_one_value_across_threads() {
    let mut joins = Vec::new();
    for _ in 0..16 {
        joins.push(std::thread::spawn(|| tree_sitter_ghostlang() as usize));
    }
    let addrs: Vec<usize> = joins.into_iter().map(|j| j.join().unwrap()).collect();
    assert!(addrs.iter().all(|&a| a != 0));
    assert!(
        addrs.iter().all(|&a| a == addrs[0]),
        "all threads must observe the same handle"
    );
}

#[test]
fn record_is_immutable_across_parses() {
    let lang = unsafe { &*tree_sitter_ghostlang() };
    let before = io::to_bin_bytes(lang);

    let parser = Parser::new(lang).unwrap();
    let _ = parser.parse("var x = 1;").unwrap();
    let _ = parser.parse("function f(a) { return a * a; }").unwrap();
    let _ = parser.parse("var broken = ;"); // syntax error path
    let _ = parser.parse("while (x) { x = x - 1; }").unwrap();

    let after = io::to_bin_bytes(lang);
    assert_eq!(before, after, "parsing must not mutate the descriptor");
}

#[test]
fn host_accepts_abi_version() {
    let lang = language();
    assert!(lang.abi_version >= MIN_COMPATIBLE_ABI_VERSION);
    assert!(lang.abi_version <= ABI_VERSION);
    assert!(Parser::new(lang).is_ok());
}

#[test]
fn minimal_parse_through_exported_handle() {
    let lang = unsafe { &*tree_sitter_ghostlang() };
    let parser = Parser::new(lang).unwrap();
    let tree = parser.parse("var x = 1;").unwrap();

    let root = &tree.root;
    assert!((root.symbol as usize) < lang.symbols.len());
    assert!(lang.is_named(root.symbol));
    assert_eq!(lang.symbol_name(root.symbol), "source_file");
}

#[test]
fn descriptor_invariants_hold() {
    let lang = language();
    lang.validate().unwrap();
    assert!(!lang.symbols.is_empty());
    assert!(!lang.productions.is_empty());
    assert!(lang.parse.n_states > 0);
}

#[test]
fn symbol_zero_is_end_of_input_terminal() {
    let lang = language();
    assert!(lang.symbols[0].terminal, "symbol 0 must be a terminal");
    assert_eq!(lang.symbols[0].name, "end");
    lang.validate().unwrap();
}

#[test]
fn validate_rejects_nonterminal_symbol_zero() {
    let mut fresh = build_language().unwrap();
    fresh.symbols[0].terminal = false;
    assert!(fresh.validate().is_err());
}

#[test]
fn fresh_build_matches_published_record() {
    // The published handle and a from-scratch build must describe the same
    // language, byte for byte.
    let fresh = build_language().unwrap();
    assert_eq!(io::to_bin_bytes(language()), io::to_bin_bytes(&fresh));
}

#[test]
fn binary_roundtrip_preserves_record() {
    let lang = language();
    let bytes = io::to_bin_bytes(lang);
    let reloaded = io::load_bin_bytes(&bytes).unwrap();
    reloaded.validate().unwrap();
    assert_eq!(bytes, io::to_bin_bytes(&reloaded));
}

#[test]
fn json_roundtrip_preserves_record() {
    let lang = language();
    let path = std::env::temp_dir().join("ghostlang_tables_test.json");
    io::save_json(&path, lang).unwrap();
    let data = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let reloaded = io::load_json_bytes(&data).unwrap();
    reloaded.validate().unwrap();
    assert_eq!(io::to_bin_bytes(lang), io::to_bin_bytes(&reloaded));
}
