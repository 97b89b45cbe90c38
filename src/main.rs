// src/main.rs
use tree_sitter_ghostlang::{Parser, language, lexer::scan};

fn main() {
    // A tiny sample covering declarations, control flow, and expressions.
    let src = r#"
        function greet(name) {
            var msg = "hello, "; // prefix
            if (name != null) {
                print(msg, name);
            } else {
                print(msg, "world");
            }
        }
        var count = 2 + 3 * 4;
    "#;

    let lang = language();

    match scan::lex(&lang.lexer, src) {
        Ok(tokens) => {
            println!("TOKENS:");
            for t in tokens {
                let lexeme = &src.as_bytes()[t.start..t.start + t.len];
                println!("{:?}  {:?}", t.kind, String::from_utf8_lossy(lexeme));
            }
        }
        Err(e) => {
            eprintln!("lex error: {e}");
            return;
        }
    }

    let parser = match Parser::new(lang) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("host rejected descriptor: {e}");
            return;
        }
    };
    match parser.parse(src) {
        Ok(tree) => println!("\nTREE:\n{}", tree.root.sexp(lang)),
        Err(e) => eprintln!("parse error: {e:?}"),
    }
}
