// src/bin/gen_tables.rs
// Offline dump of the ghostlang descriptor tables, for inspecting table
// growth when the grammar changes. The files mirror the in-process record
// exactly; nothing at runtime reads them back.

use std::{fs, path::Path};

use tree_sitter_ghostlang::language::{self, io};

fn main() -> std::io::Result<()> {
    println!("[gen_tables] building ghostlang descriptor...");
    let lang = match language::build_language() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("[gen_tables] descriptor build failed: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "[gen_tables] {} symbols, {} fields, {} productions, {} parse states, {} lex states",
        lang.symbols.len(),
        lang.fields.len(),
        lang.productions.len(),
        lang.parse.n_states,
        lang.lexer.n_states,
    );

    let out_dir = Path::new("tables");
    fs::create_dir_all(out_dir)?;

    let bin_path = out_dir.join("ghostlang_tables.bin");
    io::save_bin(&bin_path, &lang)?;
    let bytes = io::to_bin_bytes(&lang).len();
    println!(
        "[gen_tables] wrote {} bytes (~{:.1} KiB) → {}",
        bytes,
        bytes as f64 / 1024.0,
        bin_path.display()
    );

    let json_path = out_dir.join("ghostlang_tables.json");
    io::save_json(&json_path, &lang)?;
    println!("[gen_tables] wrote {}", json_path.display());
    Ok(())
}
