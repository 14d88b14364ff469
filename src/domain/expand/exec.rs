//! Evaluates a parsed template against an expansion context.

use super::ExpansionContext;
use super::ast::{Branch, Command, Head, Node, Operand, Pipeline};
use super::error::ExecError;
use super::go_time;
use super::registry::{Field, Kind, TimeMethod, Value};

pub fn execute(nodes: &[Node], ctx: &ExpansionContext) -> Result<String, ExecError> {
    let mut state = State {
        ctx,
        out: String::new(),
    };
    state.walk(nodes, &Value::Context)?;
    Ok(state.out)
}

struct State<'a> {
    ctx: &'a ExpansionContext,
    out: String,
}

impl State<'_> {
    fn walk(&mut self, nodes: &[Node], dot: &Value) -> Result<(), ExecError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action(pipeline) => {
                    let value = self.pipeline(pipeline, dot)?;
                    self.print(&value)?;
                }
                Node::If(branch) => self.branch(branch, dot, false)?,
                Node::With(branch) => self.branch(branch, dot, true)?,
            }
        }
        Ok(())
    }

    fn branch(&mut self, branch: &Branch, dot: &Value, with: bool) -> Result<(), ExecError> {
        let value = self.pipeline(&branch.pipeline, dot)?;
        match (value.is_true(), with) {
            (true, true) => self.walk(&branch.then, &value),
            (true, false) => self.walk(&branch.then, dot),
            (false, _) => self.walk(&branch.otherwise, dot),
        }
    }

    fn print(&mut self, value: &Value) -> Result<(), ExecError> {
        match value {
            Value::Str(s) => self.out.push_str(s),
            Value::Int(n) => self.out.push_str(&n.to_string()),
            Value::Time(t) => self.out.push_str(&go_time::to_default_string(t)),
            Value::Context => return Err(ExecError::Unprintable(Kind::Context.name())),
        }
        Ok(())
    }

    fn pipeline(&self, pipeline: &Pipeline, dot: &Value) -> Result<Value, ExecError> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.command(command, dot, piped)?);
        }
        Ok(piped.unwrap_or(Value::Context))
    }

    fn command(
        &self,
        command: &Command,
        dot: &Value,
        piped: Option<Value>,
    ) -> Result<Value, ExecError> {
        let mut args = command
            .args
            .iter()
            .map(|arg| self.operand(arg, dot))
            .collect::<Result<Vec<_>, _>>()?;
        args.extend(piped);

        match &command.head {
            Head::Func(function) => Ok(Value::Str(function.call(&strings(args)?)?)),
            Head::Operand(Operand::Chain(names)) => self.chain(names, dot, args),
            Head::Operand(operand) if !args.is_empty() => {
                Err(ExecError::NotAFunction(operand.describe()))
            }
            Head::Operand(operand) => self.operand(operand, dot),
        }
    }

    fn operand(&self, operand: &Operand, dot: &Value) -> Result<Value, ExecError> {
        match operand {
            Operand::Dot => Ok(dot.clone()),
            Operand::Chain(names) => self.chain(names, dot, Vec::new()),
            Operand::Str(s) => Ok(Value::Str(s.clone())),
            Operand::Int(n) => Ok(Value::Int(*n)),
            Operand::Pipeline(pipeline) => self.pipeline(pipeline, dot),
        }
    }

    /// Follows `names` from `dot`, passing `args` to the last step.
    fn chain(&self, names: &[String], dot: &Value, args: Vec<Value>) -> Result<Value, ExecError> {
        let mut value = dot.clone();
        let mut args = Some(args);

        for (i, name) in names.iter().enumerate() {
            let step_args = if i + 1 == names.len() {
                args.take().unwrap_or_default()
            } else {
                Vec::new()
            };
            value = self.step(&value, name, step_args)?;
        }

        Ok(value)
    }

    fn step(&self, value: &Value, name: &str, args: Vec<Value>) -> Result<Value, ExecError> {
        let unknown = || ExecError::UnknownField {
            field: name.to_string(),
            kind: value.kind().name(),
        };

        match value {
            Value::Context => {
                let field = Field::lookup(name).ok_or_else(unknown)?;
                if !args.is_empty() {
                    return Err(ExecError::NotAFunction(format!(".{name}")));
                }
                match field {
                    Field::Now => Ok(Value::Time(self.ctx.now())),
                    Field::Path => Ok(Value::Str(self.ctx.path().to_string())),
                    Field::User => Ok(Value::Str(self.ctx.user()?.to_string())),
                }
            }
            Value::Time(t) => {
                let method = TimeMethod::lookup(name).ok_or_else(unknown)?;
                if args.len() != method.arity() {
                    return Err(ExecError::ArgCount {
                        name: name.to_string(),
                        want: method.arity(),
                        got: args.len(),
                    });
                }
                Ok(method.call(t, &strings(args)?))
            }
            Value::Str(_) | Value::Int(_) => Err(unknown()),
        }
    }
}

fn strings(values: Vec<Value>) -> Result<Vec<String>, ExecError> {
    values
        .into_iter()
        .map(|value| match value {
            Value::Str(s) => Ok(s),
            other => Err(ExecError::WrongType {
                expected: Kind::String.name(),
                got: other.kind().name(),
            }),
        })
        .collect()
}
