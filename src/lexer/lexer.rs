use std::rc::Rc;

use regex::Regex;

use crate::{
    errors::errors::{ParseError, ParseErrorKind},
    MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
    source: String,
    pos: usize,
    line: usize,
    col: usize,
    file: Option<Rc<String>>,
    last_was_illegal: bool,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        Lexer {
            tokens: vec![],
            errors: vec![],
            source,
            pos: 0,
            line: 1,
            col: 1,
            file: file.map(Rc::new),
            last_was_illegal: false,
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    pub fn file(&self) -> Option<Rc<String>> {
        self.file.clone()
    }

    pub fn push(&mut self, token: Token) {
        self.last_was_illegal = token.kind == TokenKind::Illegal;
        self.tokens.push(token);
    }

    /// Advances past `text`, keeping the line and column counters in step.
    pub fn advance_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn error(&mut self, kind: ParseErrorKind) {
        self.errors
            .push(ParseError::new(kind, self.line, self.col, self.file.clone()));
    }
}

fn pattern_table() -> Vec<RegexPattern> {
    vec![
        RegexPattern { regex: Regex::new("\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("//.*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("(?s)/\\*.*?\\*/").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("(?s)/\\*.*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("\"(?:\\\\[^\\n]|[^\"\\\\\\n])*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("\"").unwrap(), handler: unclosed_string_handler },
        RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new("\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new("\\+\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++") },
        RegexPattern { regex: Regex::new("--").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--") },
        RegexPattern { regex: Regex::new("::").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DoubleColon, "::") },
        RegexPattern { regex: Regex::new(":=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Define, ":=") },
        RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("\\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?") },
        RegexPattern { regex: Regex::new("\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
    ]
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    lexer.advance_str(&matched);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let (line, col) = lexer.position();
    let file = lexer.file();

    if let Some(kind) = RESERVED_LOOKUP.get(matched.as_str()) {
        lexer.push(MK_TOKEN!(*kind, matched.clone(), line, col, file));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, matched.clone(), line, col, file));
    }

    lexer.advance_str(&matched);
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let (line, col) = lexer.position();
    let file = lexer.file();

    let kind = if matched.contains('.') {
        TokenKind::FloatLiteral
    } else {
        TokenKind::IntLiteral
    };
    lexer.push(MK_TOKEN!(kind, matched.clone(), line, col, file));
    lexer.advance_str(&matched);
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let raw = &matched[1..matched.len() - 1];
    let (line, col) = lexer.position();
    let file = lexer.file();

    let mut result = String::new();
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('0') => result.push('\0'),
            Some('x') => {
                let mut hex = String::new();
                let mut lookahead = chars.clone();
                for _ in 0..2 {
                    match lookahead.next() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(c);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u8::from_str_radix(&hex, 16) {
                    Ok(value) => result.push(value as char),
                    Err(_) => lexer.error(ParseErrorKind::InvalidEscapeSequence),
                }
            }
            Some(other) => {
                // Unknown escape, kept verbatim
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    lexer.push(MK_TOKEN!(TokenKind::StringLiteral, result, line, col, file));
    lexer.advance_str(&matched);
}

fn unclosed_string_handler(lexer: &mut Lexer, _regex: &Regex) {
    let rest = lexer.remainder();
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let matched = rest[..line_end].to_string();

    let (line, col) = lexer.position();
    let file = lexer.file();
    lexer.error(ParseErrorKind::UnclosedStringLiteral);
    lexer.push(MK_TOKEN!(
        TokenKind::StringLiteral,
        matched[1..].to_string(),
        line,
        col,
        file
    ));
    lexer.advance_str(&matched);
}

/// Turns source text into a token stream terminated by an EOF token.
///
/// Lexing never aborts: unrecognizable characters become `Illegal` tokens
/// (reported once per run of them) and the collected diagnostics are
/// returned alongside the tokens, to be seeded into the parser's error list.
pub fn tokenize(source: String, file: Option<String>) -> (Vec<Token>, Vec<ParseError>) {
    let mut lex = Lexer::new(source, file);
    let patterns = pattern_table();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            if let Some(found) = pattern.regex.find(lex.remainder()) {
                if found.start() == 0 {
                    (pattern.handler)(&mut lex, &pattern.regex);
                    matched = true;
                    break;
                }
            }
        }

        if !matched {
            let ch = lex.remainder().chars().next().unwrap();
            let (line, col) = lex.position();
            let file = lex.file();
            if !lex.last_was_illegal {
                lex.error(ParseErrorKind::IllegalToken);
            }
            lex.push(MK_TOKEN!(TokenKind::Illegal, ch.to_string(), line, col, file));
            lex.advance_str(&ch.to_string());
        }
    }

    let (line, col) = lex.position();
    let file = lex.file();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), line, col, file));
    (lex.tokens, lex.errors)
}
