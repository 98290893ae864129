//! Per-call request options.

use std::fmt;

use crate::cancel::CancelHandle;

/// A scalar query parameter value. `Display` yields its on-wire form.
///
/// Floats render the way a JavaScript number converts to a string:
/// `1` for `1.0`, `1e+21`, `1e-7`, `Infinity`, `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(value) => f.write_str(value),
            QueryValue::Int(value) => write!(f, "{value}"),
            QueryValue::UInt(value) => write!(f, "{value}"),
            QueryValue::Float(value) => f.write_str(ryu_js::Buffer::new().format(*value)),
            QueryValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Str(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Str(value.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f32> for QueryValue {
    fn from(value: f32) -> Self {
        QueryValue::Float(f64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

macro_rules! query_value_from_int {
    ($variant:ident, $wide:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::$variant(<$wide>::from(value))
                }
            }
        )+
    };
}

query_value_from_int!(Int, i64: i8, i16, i32, i64);
query_value_from_int!(UInt, u64: u8, u16, u32, u64);

impl From<usize> for QueryValue {
    fn from(value: usize) -> Self {
        QueryValue::UInt(value as u64)
    }
}

/// Options for a single request.
///
/// Headers given here win over the client's defaults. Params are appended to
/// the query string in insertion order. A body is never sent with GET.
#[derive(Debug, Clone)]
pub struct RequestOptions<B = ()> {
    pub body: Option<B>,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, QueryValue)>,
    pub cancel: Option<CancelHandle>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B> Default for RequestOptions<B> {
    fn default() -> Self {
        Self {
            body: None,
            headers: Vec::new(),
            params: Vec::new(),
            cancel: None,
        }
    }
}

impl<B> RequestOptions<B> {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append `key` only when `value` is present.
    pub fn param_opt<V: Into<QueryValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn cancel_with(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }

    /// Attach a JSON body, replacing any previous one.
    pub fn body<T>(self, body: T) -> RequestOptions<T> {
        RequestOptions {
            body: Some(body),
            headers: self.headers,
            params: self.params,
            cancel: self.cancel,
        }
    }
}
