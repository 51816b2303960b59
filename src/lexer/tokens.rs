use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fn", TokenKind::Fn);
        map.insert("return", TokenKind::Return);
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map.insert("void", TokenKind::Void);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map.insert("while", TokenKind::While);
        map.insert("type", TokenKind::TypeDef);
        map.insert("iface", TokenKind::Iface);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Illegal,
    EOF,

    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,

    Assignment, // =
    Define,     // :=
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Plus,
    Dash,
    Slash,
    Star,

    PlusPlus,
    MinusMinus,

    Question,
    Dot,
    Comma,
    Semicolon,
    Colon,
    DoubleColon,

    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,

    // Reserved
    Fn,
    Return,
    Let,
    Const,
    True,
    False,
    Null,
    Void,
    If,
    Else,
    For,
    While,
    TypeDef,
    Iface,
}

impl TokenKind {
    /// The bare source form of the token, used inside type-mismatch messages.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::EOF => "EOF",
            TokenKind::Identifier => "IDENT",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Assignment => "=",
            TokenKind::Define => ":=",
            TokenKind::Equals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Question => "?",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::Fn => "fn",
            TokenKind::Return => "return",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Void => "void",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::TypeDef => "type",
            TokenKind::Iface => "iface",
        }
    }

    /// The form used in "Expected X, got Y" diagnostics.
    pub fn human_readable(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "illegal token",
            TokenKind::EOF => "EOF",
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Assignment => "'='",
            TokenKind::Define => "':='",
            TokenKind::Equals => "'=='",
            TokenKind::Not => "'!'",
            TokenKind::NotEquals => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEquals => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEquals => "'>='",
            TokenKind::Or => "'||'",
            TokenKind::And => "'&&'",
            TokenKind::Plus => "'+'",
            TokenKind::Dash => "'-'",
            TokenKind::Slash => "'/'",
            TokenKind::Star => "'*'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Question => "'?'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::DoubleColon => "'::'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenCurly => "'{'",
            TokenKind::CloseCurly => "'}'",
            TokenKind::Fn => "'fn'",
            TokenKind::Return => "'return'",
            TokenKind::Let => "'let'",
            TokenKind::Const => "'const'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Void => "'void'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::For => "'for'",
            TokenKind::While => "'while'",
            TokenKind::TypeDef => "'type'",
            TokenKind::Iface => "'iface'",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: usize,
    pub col: usize,
    pub file: Option<Rc<String>>,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.human_readable())
    }
}
