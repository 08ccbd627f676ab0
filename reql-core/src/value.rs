use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// A decoded value, either produced by the server inside a batch or written as a
/// literal inside a query.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Datum {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Binary(Box<[u8]>),
    Array(Vec<Datum>),
    Object(BTreeMap<String, Datum>),
}

impl Datum {
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(v) => Some(*v),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Number(v) => Some(*v),
            _ => None,
        }
    }
    /// Integral numbers only, `1.5` is not an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Number(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_array(&self) -> Option<&[Datum]> {
        match self {
            Datum::Array(v) => Some(v),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&BTreeMap<String, Datum>> {
        match self {
            Datum::Object(v) => Some(v),
            _ => None,
        }
    }
    /// Field lookup on an object.
    pub fn get(&self, key: &str) -> Option<&Datum> {
        self.as_object().and_then(|v| v.get(key))
    }
}

impl Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => f.write_str("null"),
            Datum::Bool(v) => write!(f, "{}", v),
            Datum::Number(v) => write!(f, "{}", v),
            Datum::String(v) => write!(f, "\"{}\"", v),
            Datum::Binary(v) => write!(f, "<binary, {} bytes>", v.len()),
            Datum::Array(v) => {
                f.write_str("[")?;
                for (i, item) in v.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Datum::Object(v) => {
                f.write_str("{")?;
                for (i, (key, item)) in v.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! impl_from_number {
    ($($source:ty),+) => {
        $(
            impl From<$source> for Datum {
                fn from(value: $source) -> Self {
                    Datum::Number(value as f64)
                }
            }
        )+
    };
}
impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::String(value.to_owned())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::String(value)
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(value: Vec<T>) -> Self {
        Datum::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        value.map_or(Datum::Null, Into::into)
    }
}

impl<K: Into<String>, V: Into<Datum>> FromIterator<(K, V)> for Datum {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Datum::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
