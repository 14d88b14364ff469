//! Splits a link template into literal text and tokenized actions.

use super::error::ParseError;

const LEFT: &str = "{{";
const RIGHT: &str = "}}";
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A lone `.`
    Dot,
    /// `.Now.Format` lexes as one chain of `["Now", "Format"]`.
    Chain(Vec<String>),
    /// Function names and keywords.
    Ident(String),
    Str(String),
    Int(i64),
    Pipe,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Text(String),
    Action { offset: usize, tokens: Vec<Token> },
}

pub fn lex(src: &str) -> Result<Vec<Item>, ParseError> {
    let mut items = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    loop {
        let Some(found) = src[pos..].find(LEFT) else {
            let text = trim_start_if(&src[pos..], trim_next);
            if !text.is_empty() {
                items.push(Item::Text(text.to_string()));
            }
            return Ok(items);
        };

        let start = pos + found;
        let mut cursor = start + LEFT.len();
        let trim_left = is_trim_marker(&src[cursor..]);
        if trim_left {
            cursor += 1;
        }

        let mut text = trim_start_if(&src[pos..start], trim_next);
        if trim_left {
            text = text.trim_end();
        }
        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }

        let body = if trim_left {
            skip_space(src, cursor)
        } else {
            cursor
        };
        let (end, trim_right) = if src[body..].starts_with(COMMENT_OPEN) {
            comment(src, start, body)?
        } else {
            let mut scanner = Scanner {
                src,
                pos: cursor,
                action_start: start,
            };
            let (tokens, trim_right) = scanner.action()?;
            items.push(Item::Action {
                offset: start,
                tokens,
            });
            (scanner.pos, trim_right)
        };

        pos = end;
        trim_next = trim_right;
    }
}

fn trim_start_if(text: &str, trim: bool) -> &str {
    if trim { text.trim_start() } else { text }
}

/// `{{- ` needs whitespace after the dash, otherwise `{{-3}}` is a number.
fn is_trim_marker(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn skip_space(src: &str, from: usize) -> usize {
    src[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(src.len(), |n| from + n)
}

/// Consumes `/* ... */` and the closing delimiter, returning the position
/// after it and whether it trims the following text.
fn comment(src: &str, start: usize, body: usize) -> Result<(usize, bool), ParseError> {
    let open = body + COMMENT_OPEN.len();
    let Some(close) = src[open..].find(COMMENT_CLOSE) else {
        return Err(ParseError::new(start, "unclosed comment"));
    };

    let after = open + close + COMMENT_CLOSE.len();
    if src[after..].starts_with(RIGHT) {
        return Ok((after + RIGHT.len(), false));
    }

    let rest = &src[after..];
    let trimmed = rest.trim_start();
    if rest.len() != trimmed.len() && trimmed.starts_with("-}}") {
        let end = src.len() - trimmed.len() + "-}}".len();
        return Ok((end, true));
    }

    Err(ParseError::new(start, "comment ends before closing delimiter"))
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    action_start: usize,
}

impl Scanner<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.action_start, reason)
    }

    /// Tokenizes up to and including the closing delimiter.
    fn action(&mut self) -> Result<(Vec<Token>, bool), ParseError> {
        let mut tokens = Vec::new();

        loop {
            let before = self.pos;
            self.pos = skip_space(self.src, self.pos);
            let spaced = self.pos > before;

            if spaced && self.rest().starts_with("-}}") {
                self.pos += "-}}".len();
                return Ok((tokens, true));
            }
            if self.rest().starts_with(RIGHT) {
                self.pos += RIGHT.len();
                return Ok((tokens, false));
            }

            let Some(c) = self.peek() else {
                return Err(self.error("unclosed action"));
            };

            let token = match c {
                '|' => {
                    self.bump();
                    Token::Pipe
                }
                '(' => {
                    self.bump();
                    Token::LParen
                }
                ')' => {
                    self.bump();
                    Token::RParen
                }
                '"' => self.quoted()?,
                '`' => self.raw()?,
                '.' => self.dot()?,
                '$' => return Err(self.error("variables are not supported")),
                '-' | '0'..='9' => self.number()?,
                c if is_ident_start(c) => Token::Ident(self.ident()),
                c => return Err(self.error(format!("unexpected {c:?} in action"))),
            };
            tokens.push(token);
        }
    }

    fn ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn dot(&mut self) -> Result<Token, ParseError> {
        let mut chain = Vec::new();

        while self.peek() == Some('.') {
            let next = self.rest()[1..].chars().next();
            if !next.is_some_and(is_ident_start) {
                break;
            }
            self.bump();
            chain.push(self.ident());
        }

        if chain.is_empty() {
            self.bump();
            if self.peek().is_some_and(|c| c == '.' || is_ident_char(c)) {
                return Err(self.error("bad character after '.'"));
            }
            return Ok(Token::Dot);
        }
        if self.peek() == Some('.') {
            return Err(self.error("bad field name after '.'"));
        }
        Ok(Token::Chain(chain))
    }

    fn number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek().is_some_and(is_ident_char) || self.peek() == Some('.') {
            while self.peek().is_some_and(|c| c == '.' || is_ident_char(c)) {
                self.bump();
            }
        }

        let literal = &self.src[start..self.pos];
        literal
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| self.error(format!("bad number syntax: {literal:?}")))
    }

    fn quoted(&mut self) -> Result<Token, ParseError> {
        self.bump();
        let mut value = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated quoted string")),
                Some('"') => return Ok(Token::Str(value)),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(other) => {
                            return Err(self.error(format!("unknown escape sequence \\{other}")));
                        }
                        None => return Err(self.error("unterminated quoted string")),
                    };
                    value.push(escaped);
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn raw(&mut self) -> Result<Token, ParseError> {
        self.bump();
        let Some(len) = self.rest().find('`') else {
            return Err(self.error("unterminated raw quoted string"));
        };
        let value = self.rest()[..len].to_string();
        self.pos += len + 1;
        Ok(Token::Str(value))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
