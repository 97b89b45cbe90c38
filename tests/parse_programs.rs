//! End-to-end parses through the descriptor tables, asserting tree shapes.

use tree_sitter_ghostlang::{Parser, Tree, language};

fn parse(src: &str) -> Tree {
    let lang = language();
    let parser = Parser::new(lang).unwrap();
    parser
        .parse(src)
        .unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"))
}

fn sexp(src: &str) -> String {
    parse(src).root.sexp(language())
}

#[test]
fn empty_source() {
    assert_eq!(sexp(""), "(source_file)");
}

#[test]
fn variable_declaration() {
    assert_eq!(
        sexp("var x = 1;"),
        "(source_file (variable_declaration name: (identifier) value: (number)))"
    );
}

#[test]
fn root_spans_whole_input() {
    let tree = parse("var x = 1;");
    assert_eq!(tree.root.start, 0);
    assert_eq!(tree.root.end, 10);
}

#[test]
fn assignment_and_binary_expression() {
    assert_eq!(
        sexp("x = y + 1;"),
        "(source_file (expression_statement (assignment_expression \
         left: (identifier) right: (binary_expression left: (identifier) right: (number)))))"
    );
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(
        sexp("var x = 2 + 3 * 4;"),
        "(source_file (variable_declaration name: (identifier) \
         value: (binary_expression left: (number) \
         right: (binary_expression left: (number) right: (number)))))"
    );
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(
        sexp("var c = (1 + 2) * 3;"),
        "(source_file (variable_declaration name: (identifier) \
         value: (binary_expression \
         left: (parenthesized_expression (binary_expression left: (number) right: (number))) \
         right: (number))))"
    );
}

#[test]
fn dangling_else_attaches_to_inner_if() {
    assert_eq!(
        sexp("if (a) if (b) c(); else d();"),
        "(source_file (if_statement condition: (identifier) \
         consequence: (if_statement condition: (identifier) \
         consequence: (expression_statement (call_expression \
         function: (identifier) arguments: (arguments))) \
         alternative: (expression_statement (call_expression \
         function: (identifier) arguments: (arguments))))))"
    );
}

#[test]
fn function_declaration_with_parameters() {
    assert_eq!(
        sexp("function f(a, b) { return a; }"),
        "(source_file (function_declaration name: (identifier) \
         parameters: (parameters (identifier) (identifier)) \
         body: (block (return_statement value: (identifier)))))"
    );
}

#[test]
fn while_with_index_and_member() {
    assert_eq!(
        sexp("while (i < n) { a[i] = a.b; }"),
        "(source_file (while_statement \
         condition: (binary_expression left: (identifier) right: (identifier)) \
         body: (block (expression_statement (assignment_expression \
         left: (index_expression object: (identifier) index: (identifier)) \
         right: (member_expression object: (identifier) property: (identifier)))))))"
    );
}

#[test]
fn for_statement_full_header() {
    assert_eq!(
        sexp("for (var i = 0; i < 10; i = i + 1) { f(i); }"),
        "(source_file (for_statement \
         initializer: (variable_declaration name: (identifier) value: (number)) \
         condition: (binary_expression left: (identifier) right: (number)) \
         update: (assignment_expression left: (identifier) \
         right: (binary_expression left: (identifier) right: (number))) \
         body: (block (expression_statement (call_expression \
         function: (identifier) arguments: (arguments (identifier)))))))"
    );
}

#[test]
fn literal_kinds() {
    assert_eq!(
        sexp("var a = [1, true, null, \"s\"];"),
        "(source_file (variable_declaration name: (identifier) \
         value: (array (number) (boolean) (null) (string))))"
    );
}

#[test]
fn unary_operators() {
    assert_eq!(
        sexp("var b = !x && -y;"),
        "(source_file (variable_declaration name: (identifier) \
         value: (binary_expression \
         left: (unary_expression operand: (identifier)) \
         right: (unary_expression operand: (identifier)))))"
    );
}

#[test]
fn comments_are_trivia() {
    assert_eq!(
        sexp("// leading\nvar x = /* inline */ 1; // trailing"),
        "(source_file (variable_declaration name: (identifier) value: (number)))"
    );
}

#[test]
fn keywords_do_not_lex_as_identifiers() {
    let lang = language();
    let parser = Parser::new(lang).unwrap();
    // `var` in expression position is a syntax error, not an identifier.
    assert!(parser.parse("x = var;").is_err());
}

#[test]
fn syntax_errors_are_reported() {
    let lang = language();
    let parser = Parser::new(lang).unwrap();
    assert!(parser.parse("var = 1;").is_err());
    assert!(parser.parse("x + ;").is_err());
    assert!(parser.parse("if (x { y(); }").is_err());
    assert!(parser.parse("function () {}").is_err());
}

#[test]
fn chained_assignment_is_right_associative() {
    assert_eq!(
        sexp("x = y = z;"),
        "(source_file (expression_statement (assignment_expression \
         left: (identifier) right: (assignment_expression \
         left: (identifier) right: (identifier)))))"
    );
}

#[test]
fn postfix_chains_compose() {
    assert_eq!(
        sexp("f(1)(2)[3].m();"),
        "(source_file (expression_statement (call_expression \
         function: (member_expression object: (index_expression \
         object: (call_expression function: (call_expression \
         function: (identifier) arguments: (arguments (number))) \
         arguments: (arguments (number))) index: (number)) \
         property: (identifier)) arguments: (arguments))))"
    );
}

#[test]
fn member_access_on_parenthesized_number() {
    // `1.x` is a lexical error (see the scanner tests); the parenthesized
    // form is the supported spelling.
    assert_eq!(
        sexp("var y = (1).x;"),
        "(source_file (variable_declaration name: (identifier) \
         value: (member_expression object: (parenthesized_expression (number)) \
         property: (identifier))))"
    );
}

#[test]
fn recovery_terminates_on_unbalanced_braces() {
    let lang = language();
    let parser = Parser::new(lang).unwrap();
    assert!(parser.parse("}}}}").is_err());
    assert!(parser.parse("var x = ; var y = ;").is_err());
}

#[test]
fn recovery_survives_garbage_between_statements() {
    let lang = language();
    let parser = Parser::new(lang).unwrap();
    // Still an error, but the driver must not loop or panic while
    // resynchronizing past the bad statement.
    let err = parser.parse("var x = ; var y = 2;").unwrap_err();
    assert!(err.to_string().contains("syntax error"));
}
