use crate::{
    Datum, Error, Frame, Result, Term, TermType,
    writer::{Backtrace, Context},
};
use std::collections::BTreeMap;

/// The node addressed by the frames, everything it prints gets underlined.
fn is_target(frames: Option<&[Frame]>) -> bool {
    matches!(frames, Some([]))
}

/// Remaining frames for the positional child `position`, if the path goes through it.
fn follow_pos(frames: Option<&[Frame]>, position: usize) -> Option<&[Frame]> {
    match frames {
        Some([Frame::Pos(head), rest @ ..]) if *head == position => Some(rest),
        _ => None,
    }
}

/// Remaining frames for the named child `key`, if the path goes through it.
fn follow_opt<'f>(frames: Option<&'f [Frame]>, key: &str) -> Option<&'f [Frame]> {
    match frames {
        Some([Frame::Opt(head), rest @ ..]) if head == key => Some(rest),
        _ => None,
    }
}

/// Literals in receiver position (or at the root) need the `r.expr(...)` wrapper.
fn needs_wrapper(index: usize, parent: Option<TermType>) -> bool {
    index == 0 && !parent.is_some_and(TermType::is_prefix)
}

fn camel_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '_' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(next) => result.extend(next.to_uppercase()),
            None => result.push(c),
        }
    }
    result
}

fn spaces(len: usize) -> String {
    " ".repeat(len)
}

fn term_name(term_type: TermType) -> Result<&'static str> {
    term_type
        .name()
        .ok_or_else(|| Error::msg(format!("Unknown term type {}", term_type.0)))
}

fn var_id(term: &Term) -> Result<i64> {
    let id = match term {
        Term::Datum(datum) => datum.as_i64(),
        _ => None,
    };
    id.ok_or_else(|| Error::msg("Expected an integer variable id"))
}

fn var_ids(term: &Term) -> Result<Vec<i64>> {
    match term {
        Term::Array(items)
        | Term::Call {
            term_type: TermType::MAKE_ARRAY,
            args: items,
            ..
        } => items.iter().map(var_id).collect(),
        Term::Datum(Datum::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_i64()
                    .ok_or_else(|| Error::msg("Expected an integer variable id"))
            })
            .collect(),
        _ => Err(Error::msg("Expected the parameters list of a function")),
    }
}

/// Printer turning a [`Term`] tree back into query builder source, with a caret
/// mask under the sub expression addressed by a frame path.
///
/// A `frames` value of `None` means nothing is underlined. `Some(&[])` means the
/// current node is the target. Otherwise the head selects which child receives
/// the rest of the path, the other children get `None`.
pub trait TermWriter {
    fn as_dyn(&self) -> &dyn TermWriter;

    /// Columns added by each nested block.
    fn indent_width(&self) -> usize {
        4
    }

    /// Method chains longer than this are wrapped before the next call.
    fn line_width(&self) -> usize {
        80
    }

    /// Render the whole tree starting from the root.
    fn write_backtrace(&self, term: &Term, frames: Option<&[Frame]>) -> Result<Backtrace> {
        let mut context = Context::new(0);
        let mut out = Backtrace::default();
        self.write_term(&mut context, &mut out, term, 0, None, frames)?;
        Ok(out)
    }

    /// Render any node, `index` is its position inside `parent`.
    fn write_term(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        term: &Term,
        index: usize,
        parent: Option<TermType>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        match term {
            Term::Datum(datum @ (Datum::Array(..) | Datum::Object(..))) => self.write_term(
                context,
                out,
                &Term::from(datum.clone()),
                index,
                parent,
                frames,
            ),
            Term::Datum(datum) => self.write_datum(context, out, datum, index, parent, frames),
            Term::Array(items) => self.write_array(context, out, items, index, parent, frames),
            Term::Object(fields) => {
                self.write_object(context, out, fields, index, parent, frames, false)
            }
            Term::Call {
                term_type,
                args,
                optargs,
            } => {
                let term_type = *term_type;
                match term_type {
                    TermType::MAKE_ARRAY => {
                        self.write_array(context, out, args, index, parent, frames)
                    }
                    TermType::MAKE_OBJ => {
                        self.write_object(context, out, optargs, index, parent, frames, false)
                    }
                    TermType::TABLE
                    | TermType::TABLE_CREATE
                    | TermType::TABLE_DROP
                    | TermType::TABLE_LIST => {
                        self.write_table(context, out, term_type, args, optargs, frames)
                    }
                    TermType::GET_FIELD | TermType::BRACKET => {
                        self.write_field_access(context, out, term_type, args, frames)
                    }
                    TermType::FUNC => self.write_func(context, out, args, frames),
                    TermType::VAR => self.write_var(out, args, frames),
                    TermType::IMPLICIT_VAR => self.write_implicit_var(out, frames),
                    TermType::FUNCALL => self.write_funcall(context, out, args, frames),
                    TermType::WAIT | TermType::RECONFIGURE | TermType::REBALANCE
                        if args.is_empty() =>
                    {
                        self.write_prefix_call(context, out, term_type, args, optargs, frames)
                    }
                    TermType::MAP if args.len() > 2 => {
                        self.write_prefix_call(context, out, term_type, args, optargs, frames)
                    }
                    t if t.is_prefix() => {
                        self.write_prefix_call(context, out, term_type, args, optargs, frames)
                    }
                    _ => self.write_method_call(context, out, term_type, args, optargs, frames),
                }
            }
        }
    }

    /// Render a scalar literal.
    fn write_datum(
        &self,
        _context: &mut Context,
        out: &mut Backtrace,
        datum: &Datum,
        index: usize,
        parent: Option<TermType>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let mark = out.mark();
        if let Datum::Binary(..) = datum {
            out.push_str("r.binary(<Buffer>)");
        } else {
            let wrapper = needs_wrapper(index, parent);
            if wrapper {
                out.push_str("r.expr(");
            }
            match datum {
                Datum::Null => out.push_str("null"),
                Datum::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
                Datum::Number(v) => out.push_str(&v.to_string()),
                Datum::String(v) => {
                    out.push_str("\"");
                    out.push_str(v);
                    out.push_str("\"");
                }
                _ => {
                    return Err(Error::msg(format!(
                        "Cannot print {:?} as a scalar literal",
                        datum
                    )));
                }
            }
            if wrapper {
                out.push_str(")");
            }
        }
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render `[a, b, c]`.
    fn write_array(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        items: &[Term],
        index: usize,
        parent: Option<TermType>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let mark = out.mark();
        let wrapper = needs_wrapper(index, parent);
        if wrapper {
            out.push_str("r.expr(");
        }
        out.push_str("[");
        for (i, item) in items.iter().enumerate() {
            if i != 0 {
                out.push_str(", ");
            }
            self.write_term(
                context,
                out,
                item,
                i,
                Some(TermType::MAKE_ARRAY),
                follow_pos(frames, i),
            )?;
        }
        out.push_str("]");
        if wrapper {
            out.push_str(")");
        }
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render a key/value block, one field per line. Option names are camel cased.
    fn write_object(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        fields: &BTreeMap<String, Term>,
        index: usize,
        parent: Option<TermType>,
        frames: Option<&[Frame]>,
        optargs: bool,
    ) -> Result<()> {
        let mark = out.mark();
        let wrapper = !optargs && needs_wrapper(index, parent);
        if wrapper {
            out.push_str("r.expr(");
        }
        if fields.is_empty() {
            out.push_str("{}");
        } else {
            out.push_str("{\n");
            let mut nested = context.nested(self.indent_width());
            for (i, (key, value)) in fields.iter().enumerate() {
                out.push_str(&spaces(nested.indent));
                if optargs {
                    out.push_str(&camel_case(key));
                } else {
                    out.push_str(key);
                }
                out.push_str(": ");
                self.write_term(
                    &mut nested,
                    out,
                    value,
                    i + 1,
                    Some(TermType::MAKE_OBJ),
                    follow_opt(frames, key),
                )?;
                if i + 1 != fields.len() {
                    out.push_str(",\n");
                }
            }
            out.push_str("\n");
            out.push_str(&spaces(context.column()));
            out.push_str("}");
        }
        if wrapper {
            out.push_str(")");
        }
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render the named options of a call, `separate` when arguments precede them.
    fn write_optargs(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        optargs: &BTreeMap<String, Term>,
        separate: bool,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        if optargs.is_empty() {
            return Ok(());
        }
        if separate {
            out.push_str(", ");
        }
        let frames = frames.filter(|v| matches!(v.first(), Some(Frame::Opt(..))));
        self.write_object(context, out, optargs, 1, None, frames, true)
    }

    /// Render the positional arguments from `skip` onward, comma separated.
    ///
    /// Frames address arguments by their position in `args`, `shift` only
    /// changes the index the children see.
    fn write_args(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        parent: TermType,
        args: &[Term],
        skip: usize,
        shift: usize,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        for (i, arg) in args.iter().enumerate().skip(skip) {
            if i != skip {
                out.push_str(", ");
            }
            self.write_term(
                context,
                out,
                arg,
                i + shift,
                Some(parent),
                follow_pos(frames, i),
            )?;
        }
        Ok(())
    }

    /// Render `r.name(args..., optargs)`, or `r.name` for constants.
    fn write_prefix_call(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        term_type: TermType,
        args: &[Term],
        optargs: &BTreeMap<String, Term>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let name = term_name(term_type)?;
        let mark = out.mark();
        out.push_str("r.");
        out.push_str(name);
        if !term_type.is_constant() {
            out.push_str("(");
            self.write_args(context, out, term_type, args, 0, 0, frames)?;
            self.write_optargs(context, out, optargs, !args.is_empty(), frames)?;
            out.push_str(")");
        }
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render `<receiver>.name(args..., optargs)`.
    ///
    /// When the last line of the receiver exceeds the line width, the call moves
    /// to a new line indented one level deeper than the chain start.
    fn write_method_call(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        term_type: TermType,
        args: &[Term],
        optargs: &BTreeMap<String, Term>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let name = term_name(term_type)?;
        let Some(receiver) = args.first() else {
            return Err(Error::msg(format!("`{}` is called without a receiver", name)));
        };
        let mark = out.mark();
        self.write_term(
            context,
            out,
            receiver,
            0,
            Some(term_type),
            follow_pos(frames, 0),
        )?;
        let last_line = out.since(mark).rsplit('\n').next().unwrap_or_default();
        if last_line.trim_start().chars().count() > self.line_width() {
            if context.extra == 0 {
                context.extra += self.indent_width();
            }
            out.push_str("\n");
            out.push_str(&spaces(context.column()));
        }
        out.push_str(".");
        out.push_str(name);
        out.push_str("(");
        let mut nested = context.nested(0);
        self.write_args(&mut nested, out, term_type, args, 1, 0, frames)?;
        self.write_optargs(&mut nested, out, optargs, args.len() > 1, frames)?;
        out.push_str(")");
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render table operations, `r.table(...)` unless chained from a database.
    fn write_table(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        term_type: TermType,
        args: &[Term],
        optargs: &BTreeMap<String, Term>,
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        if let Some(Term::Call {
            term_type: TermType::DB,
            ..
        }) = args.first()
        {
            return self.write_method_call(context, out, term_type, args, optargs, frames);
        }
        let name = term_name(term_type)?;
        let mark = out.mark();
        out.push_str("r.");
        out.push_str(name);
        out.push_str("(");
        self.write_args(context, out, term_type, args, 0, 1, frames)?;
        self.write_optargs(context, out, optargs, !args.is_empty(), frames)?;
        out.push_str(")");
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render `<receiver>(<field>)`.
    fn write_field_access(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        term_type: TermType,
        args: &[Term],
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let [target, field, ..] = args else {
            return Err(Error::msg(format!(
                "`{}` expects a receiver and a field",
                term_type
            )));
        };
        let mark = out.mark();
        self.write_term(
            context,
            out,
            target,
            0,
            Some(term_type),
            follow_pos(frames, 0),
        )?;
        out.push_str("(");
        self.write_term(
            context,
            out,
            field,
            1,
            Some(term_type),
            follow_pos(frames, 1),
        )?;
        out.push_str(")");
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render an anonymous function.
    ///
    /// Single parameter functions using only `r.row` print their body alone.
    fn write_func(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        args: &[Term],
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let [params, body, ..] = args else {
            return Err(Error::msg("`func` expects a parameters list and a body"));
        };
        let ids = var_ids(params)?;
        let mark = out.mark();
        if ids.len() == 1 && body.has_implicit_var() {
            self.write_term(
                context,
                out,
                body,
                1,
                Some(TermType::FUNC),
                follow_pos(frames, 1),
            )?;
        } else {
            out.push_str("function(");
            let params = ids
                .iter()
                .map(|id| format!("var_{}", id))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&params);
            out.push_str(") {\n");
            let mut nested = context.nested(self.indent_width());
            out.push_str(&spaces(nested.indent));
            out.push_str("return ");
            self.write_term(
                &mut nested,
                out,
                body,
                1,
                Some(TermType::FUNC),
                follow_pos(frames, 1),
            )?;
            out.push_str("\n");
            out.push_str(&spaces(context.column()));
            out.push_str("}");
        }
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render a bound variable as `var_<id>`.
    fn write_var(
        &self,
        out: &mut Backtrace,
        args: &[Term],
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let id = args
            .first()
            .ok_or_else(|| Error::msg("`var` expects a variable id"))
            .and_then(var_id)?;
        let mark = out.mark();
        out.push_str(&format!("var_{}", id));
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render the implicit row variable.
    fn write_implicit_var(&self, out: &mut Backtrace, frames: Option<&[Frame]>) -> Result<()> {
        let mark = out.mark();
        out.push_str("r.row");
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }

    /// Render a function application.
    ///
    /// The function comes first in `args`, it is printed last: `value.do(f)` for a
    /// single value, `r.do(a, b, f)` otherwise.
    fn write_funcall(
        &self,
        context: &mut Context,
        out: &mut Backtrace,
        args: &[Term],
        frames: Option<&[Frame]>,
    ) -> Result<()> {
        let Some((function, values)) = args.split_first() else {
            return Err(Error::msg("`do` expects a function"));
        };
        let mark = out.mark();
        if let [value] = values {
            self.write_term(
                context,
                out,
                value,
                0,
                Some(TermType::FUNCALL),
                follow_pos(frames, 1),
            )?;
            out.push_str(".do(");
        } else {
            out.push_str("r.do(");
            for (i, value) in values.iter().enumerate() {
                self.write_term(
                    context,
                    out,
                    value,
                    i + 1,
                    Some(TermType::FUNCALL),
                    follow_pos(frames, i + 1),
                )?;
                out.push_str(", ");
            }
        }
        self.write_term(
            context,
            out,
            function,
            0,
            Some(TermType::FUNCALL),
            follow_pos(frames, 0),
        )?;
        out.push_str(")");
        if is_target(frames) {
            out.underline(mark);
        }
        Ok(())
    }
}

/// Default printer: 4 columns indentation, 80 columns soft line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReqlWriter {
    pub indent: usize,
    pub line_width: usize,
}

impl ReqlWriter {
    pub const fn new() -> Self {
        Self {
            indent: 4,
            line_width: 80,
        }
    }
}

impl Default for ReqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TermWriter for ReqlWriter {
    fn as_dyn(&self) -> &dyn TermWriter {
        self
    }
    fn indent_width(&self) -> usize {
        self.indent
    }
    fn line_width(&self) -> usize {
        self.line_width
    }
}

/// Render `term` with the default printer.
pub fn backtrace(term: &Term, frames: Option<&[Frame]>) -> Result<Backtrace> {
    ReqlWriter::new().write_backtrace(term, frames)
}
