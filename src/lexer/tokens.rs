// src/lexer/tokens.rs

/// Terminal kinds for the ghostlang grammar.
///
/// Discriminants are the stable numeric identities published in the
/// descriptor's symbol table; 0 is reserved for the end-of-input symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenKind {
    Ident = 1,
    Number = 2,
    String = 3,

    // trivia (filtered before parsing)
    White = 4,
    LineComment = 5,
    BlockComment = 6,

    // keywords (retagged from Ident after scanning)
    KwFunction = 7,
    KwVar = 8,
    KwIf = 9,
    KwElse = 10,
    KwWhile = 11,
    KwFor = 12,
    KwReturn = 13,
    KwTrue = 14,
    KwFalse = 15,
    KwNull = 16,

    // punctuation
    LParen = 17,
    RParen = 18,
    LBrace = 19,
    RBrace = 20,
    LBracket = 21,
    RBracket = 22,
    Comma = 23,
    Semicolon = 24,
    Dot = 25,

    // operators
    Plus = 26,
    Minus = 27,
    Star = 28,
    Slash = 29,
    Percent = 30,
    Assign = 31,
    EqEq = 32,
    Neq = 33,
    Lt = 34,
    Le = 35,
    Gt = 36,
    Ge = 37,
    AndAnd = 38,
    OrOr = 39,
    Not = 40,
}

/// Number of terminal columns in the action table: end-of-input (0) plus the
/// 40 kinds above.
pub const N_TERMINALS: u16 = 41;

pub const INVALID_TOKEN: u16 = u16::MAX;

pub const ALL_KINDS: &[TokenKind] = &[
    TokenKind::Ident,
    TokenKind::Number,
    TokenKind::String,
    TokenKind::White,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::KwFunction,
    TokenKind::KwVar,
    TokenKind::KwIf,
    TokenKind::KwElse,
    TokenKind::KwWhile,
    TokenKind::KwFor,
    TokenKind::KwReturn,
    TokenKind::KwTrue,
    TokenKind::KwFalse,
    TokenKind::KwNull,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::Comma,
    TokenKind::Semicolon,
    TokenKind::Dot,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Percent,
    TokenKind::Assign,
    TokenKind::EqEq,
    TokenKind::Neq,
    TokenKind::Lt,
    TokenKind::Le,
    TokenKind::Gt,
    TokenKind::Ge,
    TokenKind::AndAnd,
    TokenKind::OrOr,
    TokenKind::Not,
];

impl TokenKind {
    #[inline]
    pub fn from_u16(v: u16) -> Option<TokenKind> {
        ALL_KINDS.iter().copied().find(|k| *k as u16 == v)
    }

    /// Symbol-table name for this terminal.
    pub fn display_name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident => "identifier",
            Number => "number",
            String => "string",
            White => "whitespace",
            LineComment => "line_comment",
            BlockComment => "block_comment",
            KwFunction => "function",
            KwVar => "var",
            KwIf => "if",
            KwElse => "else",
            KwWhile => "while",
            KwFor => "for",
            KwReturn => "return",
            KwTrue => "true",
            KwFalse => "false",
            KwNull => "null",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Semicolon => ";",
            Dot => ".",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Assign => "=",
            EqEq => "==",
            Neq => "!=",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            AndAnd => "&&",
            OrOr => "||",
            Not => "!",
        }
    }

    /// Whitespace and comments never reach the parser.
    #[inline]
    pub fn is_trivia(self) -> bool {
        use TokenKind::*;
        matches!(self, White | LineComment | BlockComment)
    }
}

/// Keyword lookup used by the post-scan retag pass. The DFA lexes keywords as
/// plain identifiers; the scanner retags them by spelling.
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match text {
        "function" => KwFunction,
        "var" => KwVar,
        "if" => KwIf,
        "else" => KwElse,
        "while" => KwWhile,
        "for" => KwFor,
        "return" => KwReturn,
        "true" => KwTrue,
        "false" => KwFalse,
        "null" => KwNull,
        _ => return None,
    })
}
