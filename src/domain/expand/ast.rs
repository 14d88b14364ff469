//! Parsed template tree.

use super::registry::Function;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    /// `{{pipeline}}`, printed into the output.
    Action(Pipeline),
    If(Branch),
    /// Like `If`, but `then` runs with `.` bound to the pipeline value.
    With(Branch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub pipeline: Pipeline,
    pub then: Vec<Node>,
    /// `{{else}}` body; an `{{else if}}` chain nests another `If` here.
    pub otherwise: Vec<Node>,
}

/// `cmd | cmd | ...`; each command receives the previous result as its
/// last argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub offset: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub head: Head,
    pub args: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Head {
    Func(Function),
    Operand(Operand),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Dot,
    Chain(Vec<String>),
    Str(String),
    Int(i64),
    Pipeline(Box<Pipeline>),
}

impl Operand {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Operand::Dot => ".".to_string(),
            Operand::Chain(names) => format!(".{}", names.join(".")),
            Operand::Str(s) => format!("{s:?}"),
            Operand::Int(n) => n.to_string(),
            Operand::Pipeline(_) => "(pipeline)".to_string(),
        }
    }
}
