// src/grammar/ghostlang.rs
// The ghostlang grammar: C-style statements over stratified expressions.
//
// Expression precedence is encoded by stratification, so the only explicit
// precedence pair is the dangling-else resolution: the short `if` production
// sits below the `else` terminal, making the table builder shift.

use anyhow::Result;

use super::{Assoc, Grammar, GrammarBuilder, Part::*};
use crate::lexer::tokens::TokenKind::*;

pub fn grammar() -> Result<Grammar> {
    let mut g = GrammarBuilder::new("source_file");

    // dangling else: shift wins over reducing the short if
    g.term_prec(KwElse, 2, Assoc::Right);

    // ---- items ----
    g.rule("source_file", &[N("_items")]);
    g.rule("_items", &[N("_items"), N("_item")]);
    g.rule("_items", &[]);
    g.rule("_item", &[N("function_declaration")]);
    g.rule("_item", &[N("_statement")]);

    g.rule(
        "function_declaration",
        &[
            T(KwFunction),
            TF(Ident, "name"),
            NF("parameters", "parameters"),
            NF("block", "body"),
        ],
    );
    g.rule("parameters", &[T(LParen), T(RParen)]);
    g.rule("parameters", &[T(LParen), N("_params"), T(RParen)]);
    g.rule("_params", &[T(Ident)]);
    g.rule("_params", &[N("_params"), T(Comma), T(Ident)]);

    // ---- statements ----
    g.rule("block", &[T(LBrace), N("_stmts"), T(RBrace)]);
    g.rule("_stmts", &[N("_stmts"), N("_statement")]);
    g.rule("_stmts", &[]);

    g.rule("_statement", &[N("variable_declaration")]);
    g.rule("_statement", &[N("expression_statement")]);
    g.rule("_statement", &[N("if_statement")]);
    g.rule("_statement", &[N("while_statement")]);
    g.rule("_statement", &[N("for_statement")]);
    g.rule("_statement", &[N("return_statement")]);
    g.rule("_statement", &[N("block")]);

    g.rule(
        "variable_declaration",
        &[
            T(KwVar),
            TF(Ident, "name"),
            T(Assign),
            NF("_expression", "value"),
            T(Semicolon),
        ],
    );
    g.rule(
        "variable_declaration",
        &[T(KwVar), TF(Ident, "name"), T(Semicolon)],
    );

    g.rule("expression_statement", &[N("_expression"), T(Semicolon)]);

    g.rule_prec(
        "if_statement",
        &[
            T(KwIf),
            T(LParen),
            NF("_expression", "condition"),
            T(RParen),
            NF("_statement", "consequence"),
        ],
        1,
    );
    g.rule(
        "if_statement",
        &[
            T(KwIf),
            T(LParen),
            NF("_expression", "condition"),
            T(RParen),
            NF("_statement", "consequence"),
            T(KwElse),
            NF("_statement", "alternative"),
        ],
    );

    g.rule(
        "while_statement",
        &[
            T(KwWhile),
            T(LParen),
            NF("_expression", "condition"),
            T(RParen),
            NF("_statement", "body"),
        ],
    );

    g.rule(
        "for_statement",
        &[
            T(KwFor),
            T(LParen),
            NF("_for_init", "initializer"),
            NF("_expression", "condition"),
            T(Semicolon),
            NF("_expression", "update"),
            T(RParen),
            NF("_statement", "body"),
        ],
    );
    g.rule("_for_init", &[N("variable_declaration")]);
    g.rule("_for_init", &[N("expression_statement")]);

    g.rule(
        "return_statement",
        &[T(KwReturn), NF("_expression", "value"), T(Semicolon)],
    );
    g.rule("return_statement", &[T(KwReturn), T(Semicolon)]);

    // ---- expressions (stratified) ----
    g.rule("_expression", &[N("assignment_expression")]);
    g.rule("_expression", &[N("_or")]);

    g.rule(
        "assignment_expression",
        &[
            NF("_postfix", "left"),
            T(Assign),
            NF("_expression", "right"),
        ],
    );

    g.rule("_or", &[N("_and")]);
    g.alias(
        "_or",
        "binary_expression",
        &[NF("_or", "left"), TF(OrOr, "operator"), NF("_and", "right")],
    );

    g.rule("_and", &[N("_cmp")]);
    g.alias(
        "_and",
        "binary_expression",
        &[NF("_and", "left"), TF(AndAnd, "operator"), NF("_cmp", "right")],
    );

    g.rule("_cmp", &[N("_add")]);
    for op in [EqEq, Neq, Lt, Le, Gt, Ge] {
        g.alias(
            "_cmp",
            "binary_expression",
            &[NF("_cmp", "left"), TF(op, "operator"), NF("_add", "right")],
        );
    }

    g.rule("_add", &[N("_mul")]);
    for op in [Plus, Minus] {
        g.alias(
            "_add",
            "binary_expression",
            &[NF("_add", "left"), TF(op, "operator"), NF("_mul", "right")],
        );
    }

    g.rule("_mul", &[N("_unary")]);
    for op in [Star, Slash, Percent] {
        g.alias(
            "_mul",
            "binary_expression",
            &[NF("_mul", "left"), TF(op, "operator"), NF("_unary", "right")],
        );
    }

    g.rule("_unary", &[N("_postfix")]);
    for op in [Not, Minus] {
        g.alias(
            "_unary",
            "unary_expression",
            &[TF(op, "operator"), NF("_unary", "operand")],
        );
    }

    g.rule("_postfix", &[N("_primary")]);
    g.rule("_postfix", &[N("call_expression")]);
    g.rule("_postfix", &[N("index_expression")]);
    g.rule("_postfix", &[N("member_expression")]);

    g.rule(
        "call_expression",
        &[NF("_postfix", "function"), NF("arguments", "arguments")],
    );
    g.rule("arguments", &[T(LParen), T(RParen)]);
    g.rule("arguments", &[T(LParen), N("_args"), T(RParen)]);
    g.rule("_args", &[N("_expression")]);
    g.rule("_args", &[N("_args"), T(Comma), N("_expression")]);

    g.rule(
        "index_expression",
        &[
            NF("_postfix", "object"),
            T(LBracket),
            NF("_expression", "index"),
            T(RBracket),
        ],
    );
    g.rule(
        "member_expression",
        &[NF("_postfix", "object"), T(Dot), TF(Ident, "property")],
    );

    g.rule("_primary", &[T(Ident)]);
    g.rule("_primary", &[T(Number)]);
    g.rule("_primary", &[T(String)]);
    g.rule("_primary", &[N("boolean")]);
    g.rule("_primary", &[N("null")]);
    g.rule("_primary", &[N("array")]);
    g.rule("_primary", &[N("parenthesized_expression")]);

    g.rule("boolean", &[T(KwTrue)]);
    g.rule("boolean", &[T(KwFalse)]);
    g.rule("null", &[T(KwNull)]);
    g.rule("array", &[T(LBracket), T(RBracket)]);
    g.rule("array", &[T(LBracket), N("_args"), T(RBracket)]);
    g.rule(
        "parenthesized_expression",
        &[T(LParen), N("_expression"), T(RParen)],
    );

    g.finish()
}
