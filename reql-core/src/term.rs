use crate::{Datum, TermType};
use std::collections::BTreeMap;

/// A query expression as sent to the server.
///
/// Trees are built by the query DSL and only read by the backtrace printer.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Literal value.
    Datum(Datum),
    /// Literal array whose elements may be queries themselves.
    Array(Vec<Term>),
    /// Literal object whose values may be queries themselves.
    Object(BTreeMap<String, Term>),
    /// Operation with positional arguments and named options.
    Call {
        term_type: TermType,
        args: Vec<Term>,
        optargs: BTreeMap<String, Term>,
    },
}

impl Term {
    pub fn call(term_type: TermType, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Call {
            term_type,
            args: args.into_iter().collect(),
            optargs: BTreeMap::new(),
        }
    }

    /// Add a named option, no effect on literals.
    pub fn optarg(mut self, key: impl Into<String>, value: impl Into<Term>) -> Self {
        if let Term::Call { optargs, .. } = &mut self {
            optargs.insert(key.into(), value.into());
        }
        self
    }

    pub fn term_type(&self) -> TermType {
        match self {
            Term::Datum(..) => TermType::DATUM,
            Term::Array(..) => TermType::MAKE_ARRAY,
            Term::Object(..) => TermType::MAKE_OBJ,
            Term::Call { term_type, .. } => *term_type,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether the tree references the implicit row variable (`r.row`).
    pub fn has_implicit_var(&self) -> bool {
        match self {
            Term::Datum(..) => false,
            Term::Array(items) => items.iter().any(Term::has_implicit_var),
            Term::Object(fields) => fields.values().any(Term::has_implicit_var),
            Term::Call {
                term_type: TermType::IMPLICIT_VAR,
                ..
            } => true,
            Term::Call { args, optargs, .. } => {
                args.iter().any(Term::has_implicit_var)
                    || optargs.values().any(Term::has_implicit_var)
            }
        }
    }
}

impl From<Datum> for Term {
    fn from(value: Datum) -> Self {
        match value {
            Datum::Array(items) => Term::Array(items.into_iter().map(Term::from).collect()),
            Datum::Object(fields) => Term::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Term::from(v)))
                    .collect(),
            ),
            datum => Term::Datum(datum),
        }
    }
}

macro_rules! impl_term_from_datum {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Term {
                fn from(value: $source) -> Self {
                    Term::Datum(value.into())
                }
            }
        )+
    };
}
impl_term_from_datum!(bool, &str, String, i32, i64, u32, u64, usize, f64);

impl From<Vec<Term>> for Term {
    fn from(value: Vec<Term>) -> Self {
        Term::Array(value)
    }
}

/// One step of the path locating a sub expression inside a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Positional argument (or array element).
    Pos(usize),
    /// Named option (or object field).
    Opt(String),
}

impl From<usize> for Frame {
    fn from(value: usize) -> Self {
        Frame::Pos(value)
    }
}

impl From<&str> for Frame {
    fn from(value: &str) -> Self {
        Frame::Opt(value.to_owned())
    }
}

impl From<String> for Frame {
    fn from(value: String) -> Self {
        Frame::Opt(value)
    }
}
