// src/bin/fuzz_lex.rs
// Generate big random-but-valid inputs and run the scanner over them.
// Extras:
//   - FUZZ_ITERS=n            number of generated cases (default 50)
//   - FUZZ_SEED=n             fixed seed for reproducibility
//   - FUZZ_INPUT=path         replay a saved case instead of generating
//   - FUZZ_SAVE=1 / FUZZ_DIR  save generated cases that fail

use std::{env, fs, path::PathBuf, time::Instant};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tree_sitter_ghostlang::{language, lexer::scan};

const IDENTS: &[&str] = &["foo", "bar", "baz", "qux", "value", "idx", "n", "print"];
const KEYWORDS: &[&str] = &[
    "function", "var", "if", "else", "while", "for", "return", "true", "false", "null",
];
const OPS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "==", "!=", "<", "<=", ">", ">=", "&&", "||", "!",
];
const PUNCT: &[&str] = &["(", ")", "{", "}", "[", "]", ",", ";", "."];

fn gen_source(rng: &mut StdRng, n_tokens: usize) -> String {
    let mut out = String::new();
    for _ in 0..n_tokens {
        match rng.random_range(0..8u32) {
            0 => out.push_str(IDENTS[rng.random_range(0..IDENTS.len())]),
            1 => out.push_str(KEYWORDS[rng.random_range(0..KEYWORDS.len())]),
            2 => out.push_str(&format!("{}", rng.random_range(0..100_000u32))),
            3 => out.push_str(&format!(
                "{}.{}",
                rng.random_range(0..1000u32),
                rng.random_range(0..1000u32)
            )),
            4 => out.push_str(&format!("\"s{}\"", rng.random_range(0..1000u32))),
            5 => out.push_str(OPS[rng.random_range(0..OPS.len())]),
            6 => out.push_str(PUNCT[rng.random_range(0..PUNCT.len())]),
            _ => match rng.random_range(0..3u32) {
                0 => out.push_str(&format!("// line {}\n", rng.random_range(0..100u32))),
                1 => out.push_str(&format!("/* blk {} */", rng.random_range(0..100u32))),
                _ => out.push('\n'),
            },
        }
        // always separate tokens so adjacent picks cannot glue into one
        out.push(' ');
    }
    out
}

fn check_case(src: &str) -> Result<usize, String> {
    let lang = language();
    let tokens = scan::lex(&lang.lexer, src)?;

    let mut prev_end = 0usize;
    for t in &tokens {
        if t.len == 0 {
            return Err(format!("empty token at {}", t.start));
        }
        if t.start < prev_end {
            return Err(format!("overlapping token at {}", t.start));
        }
        prev_end = t.start + t.len;
        if prev_end > src.len() {
            return Err(format!("token past end of input at {}", t.start));
        }
    }
    Ok(tokens.len())
}

fn main() {
    if let Ok(path) = env::var("FUZZ_INPUT") {
        let src = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
        match check_case(&src) {
            Ok(n) => println!("[fuzz_lex] replay OK: {n} tokens"),
            Err(e) => panic!("[fuzz_lex] replay FAILED: {e}"),
        }
        return;
    }

    let iters: usize = env::var("FUZZ_ITERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);
    let seed: u64 = env::var("FUZZ_SEED")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| rand::rng().random());
    println!("[fuzz_lex] seed={seed} iters={iters}");

    let save = env::var("FUZZ_SAVE").is_ok_and(|v| v == "1");
    let dir = PathBuf::from(env::var("FUZZ_DIR").unwrap_or_else(|_| "fuzz_cases".into()));

    let mut rng = StdRng::seed_from_u64(seed);
    let t0 = Instant::now();
    let mut total_tokens = 0usize;
    for i in 0..iters {
        let n = rng.random_range(1_000..20_000);
        let src = gen_source(&mut rng, n);
        match check_case(&src) {
            Ok(n) => total_tokens += n,
            Err(e) => {
                if save {
                    let _ = fs::create_dir_all(&dir);
                    let p = dir.join(format!("case_{seed}_{i}.ghost"));
                    let _ = fs::write(&p, &src);
                    eprintln!("[fuzz_lex] saved failing case to {}", p.display());
                }
                panic!("[fuzz_lex] case {i} FAILED: {e}");
            }
        }
    }
    println!(
        "[fuzz_lex] OK: {iters} cases, {total_tokens} tokens in {:?}",
        t0.elapsed()
    );
}
