//! Builds the template tree and runs the static checks.
//!
//! Every value a template can reach has a type known at parse time, so
//! unknown fields and functions, wrong argument counts and non-string
//! arguments are reported here, when a link is saved, rather than on the
//! first redirect that happens to hit them.

use super::ast::{Branch, Command, Head, Node, Operand, Pipeline};
use super::error::{ExecError, ParseError};
use super::lexer::{Item, Token, lex};
use super::registry::{Field, Function, Kind, TimeMethod};

/// Deepest nesting of blocks and parenthesized pipelines accepted.
const MAX_DEPTH: usize = 100;

const DEPTH_EXCEEDED: &str = "max expression depth exceeded";

pub fn parse(src: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser {
        items: lex(src)?.into_iter(),
        depth: 0,
    };

    let (nodes, end) = parser.list(Kind::Context)?;
    match end {
        End::Eof => Ok(nodes),
        End::End { offset } => Err(ParseError::new(offset, "unexpected {{end}}")),
        End::Else { offset, .. } => Err(ParseError::new(offset, "unexpected {{else}}")),
    }
}

/// What stopped a node list.
enum End {
    Eof,
    End { offset: usize },
    Else { offset: usize, rest: Vec<Token> },
}

struct Parser {
    items: std::vec::IntoIter<Item>,
    depth: usize,
}

impl Parser {
    fn list(&mut self, dot: Kind) -> Result<(Vec<Node>, End), ParseError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let (offset, tokens) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { offset, tokens } => (offset, tokens),
            };

            match keyword(&tokens) {
                Some("end") => {
                    if tokens.len() > 1 {
                        return Err(ParseError::new(offset, "unexpected tokens in {{end}}"));
                    }
                    return Ok((nodes, End::End { offset }));
                }
                Some("else") => {
                    let rest = tokens[1..].to_vec();
                    return Ok((nodes, End::Else { offset, rest }));
                }
                Some("if") => nodes.push(self.branch(offset, &tokens[1..], dot, false)?),
                Some("with") => nodes.push(self.branch(offset, &tokens[1..], dot, true)?),
                _ => {
                    let (pipeline, _) = TokenStream::new(offset, &tokens, self.depth).pipeline(dot, "command")?;
                    nodes.push(Node::Action(pipeline));
                }
            }
        }

        Ok((nodes, End::Eof))
    }

    fn branch(
        &mut self,
        offset: usize,
        tokens: &[Token],
        dot: Kind,
        with: bool,
    ) -> Result<Node, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::new(offset, DEPTH_EXCEEDED));
        }
        self.depth += 1;

        let name = if with { "with" } else { "if" };
        let (pipeline, kind) = TokenStream::new(offset, tokens, self.depth).pipeline(dot, name)?;

        let (then, end) = self.list(if with { kind } else { dot })?;
        let otherwise = match end {
            End::Eof => return Err(ParseError::new(offset, format!("unexpected EOF in {name}"))),
            End::End { .. } => Vec::new(),
            End::Else { rest, .. } if rest.is_empty() => {
                let (otherwise, end) = self.list(dot)?;
                match end {
                    End::End { .. } => otherwise,
                    End::Eof => {
                        return Err(ParseError::new(offset, format!("unexpected EOF in {name}")));
                    }
                    End::Else { offset, .. } => {
                        return Err(ParseError::new(offset, "expected end; found {{else}}"));
                    }
                }
            }
            // `{{else if ...}}` shares the closing `{{end}}` of the outer block.
            End::Else { offset, rest } if !with && keyword(&rest) == Some("if") => {
                vec![self.branch(offset, &rest[1..], dot, false)?]
            }
            End::Else { offset, .. } => {
                return Err(ParseError::new(offset, "unexpected tokens after {{else}}"));
            }
        };

        self.depth -= 1;
        let branch = Branch {
            pipeline,
            then,
            otherwise,
        };
        Ok(if with {
            Node::With(branch)
        } else {
            Node::If(branch)
        })
    }
}

fn keyword(tokens: &[Token]) -> Option<&str> {
    match tokens.first() {
        Some(Token::Ident(word)) if matches!(word.as_str(), "if" | "else" | "end" | "with") => {
            Some(word.as_str())
        }
        _ => None,
    }
}

struct TokenStream<'t> {
    offset: usize,
    tokens: &'t [Token],
    pos: usize,
    /// Enclosing blocks and parens.
    depth: usize,
}

impl<'t> TokenStream<'t> {
    fn new(offset: usize, tokens: &'t [Token], depth: usize) -> Self {
        Self {
            offset,
            tokens,
            pos: 0,
            depth,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.offset, reason)
    }

    /// Parses a whole action body as one pipeline.
    fn pipeline(mut self, dot: Kind, context: &str) -> Result<(Pipeline, Kind), ParseError> {
        if self.tokens.is_empty() {
            return Err(self.error(format!("missing value for {context}")));
        }
        self.commands(dot, false)
    }

    /// Parses `cmd | cmd ...` up to the end of the action, or up to the
    /// matching `)` when `nested`.
    fn commands(&mut self, dot: Kind, nested: bool) -> Result<(Pipeline, Kind), ParseError> {
        let mut commands = Vec::new();
        let mut piped = None;

        loop {
            let (command, kind) = self.command(dot, piped)?;
            commands.push(command);
            piped = Some(kind);

            match self.next() {
                Some(Token::Pipe) => continue,
                Some(Token::RParen) if nested => break,
                None if !nested => break,
                Some(Token::RParen) => return Err(self.error("unexpected right paren")),
                None => return Err(self.error("unclosed left paren")),
                Some(token) => return Err(self.error(format!("unexpected {token:?} in operand"))),
            }
        }

        let pipeline = Pipeline {
            offset: self.offset,
            commands,
        };
        Ok((pipeline, piped.unwrap_or(Kind::Unknown)))
    }

    fn command(&mut self, dot: Kind, piped: Option<Kind>) -> Result<(Command, Kind), ParseError> {
        // A chain in head position receives the command's arguments, so it
        // is checked once those are known.
        let (head, head_kind) = match self.next() {
            None | Some(Token::Pipe) | Some(Token::RParen) => {
                return Err(self.error("missing command"));
            }
            Some(Token::Ident(name)) => match Function::lookup(name) {
                Some(function) => (Head::Func(function), Kind::String),
                None => return Err(self.error(format!("function {name:?} not defined"))),
            },
            Some(Token::Chain(names)) => (Head::Operand(Operand::Chain(names.clone())), Kind::Unknown),
            Some(token) => {
                let (operand, kind) = self.operand(token, dot)?;
                (Head::Operand(operand), kind)
            }
        };

        let mut args = Vec::new();
        let mut kinds = Vec::new();
        while let Some(token) = self.peek() {
            if matches!(token, Token::Pipe | Token::RParen) {
                break;
            }
            self.pos += 1;
            let (operand, kind) = self.operand(token, dot)?;
            args.push(operand);
            kinds.push(kind);
        }
        kinds.extend(piped);

        let kind = self.check(&head, head_kind, dot, &kinds)?;
        Ok((Command { head, args }, kind))
    }

    fn operand(&mut self, token: &Token, dot: Kind) -> Result<(Operand, Kind), ParseError> {
        let parsed = match token {
            Token::Dot => (Operand::Dot, dot),
            Token::Chain(names) => {
                let kind = chain_kind(dot, names, 0).map_err(|e| self.error(e.to_string()))?;
                (Operand::Chain(names.clone()), kind)
            }
            Token::Str(s) => (Operand::Str(s.clone()), Kind::String),
            Token::Int(n) => (Operand::Int(*n), Kind::Int),
            Token::LParen => {
                if self.depth >= MAX_DEPTH {
                    return Err(self.error(DEPTH_EXCEEDED));
                }
                self.depth += 1;
                let (pipeline, kind) = self.commands(dot, true)?;
                self.depth -= 1;
                (Operand::Pipeline(Box::new(pipeline)), kind)
            }
            Token::Ident(name) => {
                let reason = match Function::lookup(name) {
                    Some(function) => ExecError::ArgCount {
                        name: function.name().to_string(),
                        want: function.arity(),
                        got: 0,
                    }
                    .to_string(),
                    None => format!("function {name:?} not defined"),
                };
                return Err(self.error(reason));
            }
            Token::Pipe | Token::RParen => return Err(self.error("missing operand")),
        };
        Ok(parsed)
    }

    /// Checks a command's head against the kinds of its arguments, the
    /// piped value last, and returns the kind it produces.
    fn check(
        &self,
        head: &Head,
        head_kind: Kind,
        dot: Kind,
        args: &[Kind],
    ) -> Result<Kind, ParseError> {
        let err = |e: ExecError| self.error(e.to_string());

        match head {
            Head::Func(function) => {
                if args.len() != function.arity() {
                    return Err(err(ExecError::ArgCount {
                        name: function.name().to_string(),
                        want: function.arity(),
                        got: args.len(),
                    }));
                }
                check_strings(args).map_err(err)?;
                Ok(head_kind)
            }
            Head::Operand(Operand::Chain(names)) => {
                let kind = chain_kind(dot, names, args.len()).map_err(err)?;
                check_strings(args).map_err(err)?;
                Ok(kind)
            }
            Head::Operand(operand) if !args.is_empty() => {
                Err(err(ExecError::NotAFunction(operand.describe())))
            }
            Head::Operand(_) => Ok(head_kind),
        }
    }
}

/// Kind reached by following `names` from a value of kind `dot`, where the
/// last step is given `nargs` arguments.
fn chain_kind(dot: Kind, names: &[String], nargs: usize) -> Result<Kind, ExecError> {
    let mut kind = dot;

    for (i, name) in names.iter().enumerate() {
        let given = if i + 1 == names.len() { nargs } else { 0 };
        let unknown = |kind: Kind| ExecError::UnknownField {
            field: name.clone(),
            kind: kind.name(),
        };

        kind = match kind {
            Kind::Unknown => return Ok(Kind::Unknown),
            Kind::Context => {
                let field = Field::lookup(name).ok_or_else(|| unknown(kind))?;
                if given > 0 {
                    return Err(ExecError::NotAFunction(format!(".{name}")));
                }
                field.kind()
            }
            Kind::Time => {
                let method = TimeMethod::lookup(name).ok_or_else(|| unknown(kind))?;
                if method.arity() != given {
                    return Err(ExecError::ArgCount {
                        name: name.clone(),
                        want: method.arity(),
                        got: given,
                    });
                }
                method.kind()
            }
            Kind::String | Kind::Int => return Err(unknown(kind)),
        };
    }

    Ok(kind)
}

fn check_strings(args: &[Kind]) -> Result<(), ExecError> {
    match args
        .iter()
        .find(|kind| !matches!(kind, Kind::String | Kind::Unknown))
    {
        Some(kind) => Err(ExecError::WrongType {
            expected: Kind::String.name(),
            got: kind.name(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(src: &str) -> String {
        parse(src).unwrap_err().reason
    }

    #[test]
    fn test_parses_plain_text() {
        assert_eq!(
            parse("http://example.com/").unwrap(),
            vec![Node::Text("http://example.com/".into())]
        );
    }

    #[test]
    fn test_parses_pipeline() {
        let nodes = parse("{{.Path | PathEscape}}").unwrap();
        let Node::Action(pipeline) = &nodes[0] else {
            panic!("expected action, got {nodes:?}");
        };
        assert_eq!(pipeline.commands.len(), 2);
        assert_eq!(
            pipeline.commands[0].head,
            Head::Operand(Operand::Chain(vec!["Path".into()]))
        );
        assert_eq!(pipeline.commands[1].head, Head::Func(Function::PathEscape));
    }

    #[test]
    fn test_parses_blocks() {
        let nodes = parse("{{if .Path}}a{{else if .User}}b{{else}}c{{end}}").unwrap();
        let Node::If(branch) = &nodes[0] else {
            panic!("expected if, got {nodes:?}");
        };
        assert_eq!(branch.then, vec![Node::Text("a".into())]);
        assert!(matches!(branch.otherwise[0], Node::If(_)));

        assert!(parse("{{with .Path}}/{{.}}{{end}}").is_ok());
        assert!(parse("{{with .Now}}{{.Format \"2006\"}}{{end}}").is_ok());
        assert!(parse("{{with .Path}}{{else}}{{.Path}}{{end}}").is_ok());
    }

    #[test]
    fn test_unbalanced_blocks() {
        assert!(reason("{{if .Path}}x").contains("unexpected EOF"));
        assert!(reason("x{{end}}").contains("unexpected {{end}}"));
        assert!(reason("{{else}}").contains("unexpected {{else}}"));
        assert!(reason("{{if .Path}}{{else}}{{else}}{{end}}").contains("expected end"));
        assert!(parse("{{with .Path}}{{else if .User}}{{end}}").is_err());
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(reason("{{Nope .Path}}"), "function \"Nope\" not defined");
        assert_eq!(reason("{{.Host}}"), "can't evaluate field Host in type context");
        assert_eq!(reason("{{.Path.Len}}"), "can't evaluate field Len in type string");
        assert_eq!(reason("{{.Now.Nope}}"), "can't evaluate field Nope in type time");
        assert_eq!(
            reason("{{with .Path}}{{.Now}}{{end}}"),
            "can't evaluate field Now in type string"
        );
    }

    #[test]
    fn test_argument_checks() {
        assert_eq!(
            reason("{{PathEscape}}"),
            "wrong number of args for PathEscape: want 1 got 0"
        );
        assert_eq!(
            reason("{{.Path | TrimSuffix}}"),
            "wrong number of args for TrimSuffix: want 2 got 1"
        );
        assert_eq!(
            reason("{{.Now.Format}}"),
            "wrong number of args for Format: want 1 got 0"
        );
        assert_eq!(
            reason("{{PathEscape .Now}}"),
            "wrong type for value; expected string; got time"
        );
        assert_eq!(
            reason("{{.Path | .Path}}"),
            "can't give argument to non-function .Path"
        );
        assert_eq!(
            reason("{{\"a\" \"b\"}}"),
            "can't give argument to non-function \"a\""
        );
        assert!(parse("{{.Path | TrimSuffix \"/\"}}").is_ok());
        assert!(parse("{{TrimSuffix .Path \"/\"}}").is_ok());
        assert!(parse("{{.Now.Format \"01-02-2006\" | PathEscape}}").is_ok());
    }

    #[test]
    fn test_parenthesized_pipeline() {
        assert!(parse("{{PathEscape (TrimSuffix .Path \"/\")}}").is_ok());
        assert!(parse("{{(.Now.Year)}}").is_ok());
        assert_eq!(
            reason("{{PathEscape (.Now.Year)}}"),
            "wrong type for value; expected string; got int"
        );
        assert!(reason("{{PathEscape (.Path}}").contains("unclosed left paren"));
        assert!(reason("{{.Path)}}").contains("unexpected right paren"));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let nested = |d: usize| format!("{{{{{}.Path{}}}}}", "(".repeat(d), ")".repeat(d));
        assert!(parse(&nested(MAX_DEPTH)).is_ok());
        assert_eq!(reason(&nested(MAX_DEPTH + 1)), "max expression depth exceeded");
        assert_eq!(reason(&nested(10_000)), "max expression depth exceeded");

        let blocks = |d: usize| format!("{}x{}", "{{if .Path}}".repeat(d), "{{end}}".repeat(d));
        assert!(parse(&blocks(MAX_DEPTH)).is_ok());
        assert_eq!(reason(&blocks(10_000)), "max expression depth exceeded");

        // blocks and parens share one budget
        let mixed = format!(
            "{}{{{{{}.Path{}}}}}{}",
            "{{if .Path}}".repeat(60),
            "(".repeat(60),
            ")".repeat(60),
            "{{end}}".repeat(60)
        );
        assert_eq!(reason(&mixed), "max expression depth exceeded");
    }

    #[test]
    fn test_empty_actions() {
        assert!(reason("{{}}").contains("missing value"));
        assert!(reason("{{if}}{{end}}").contains("missing value for if"));
        assert!(reason("{{.Path |}}").contains("missing command"));
    }
}
