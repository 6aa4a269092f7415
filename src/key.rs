use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::EmitError;

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// An opaque, process-unique key token.
///
/// Symbols compare and hash by their internal id only; the optional label is
/// purely descriptive. Two symbols are equal only if one was cloned or copied
/// from the other.
///
/// # Example
/// ```
/// use keyed_events::Symbol;
///
/// let a = Symbol::new();
/// let b = Symbol::labeled("shutdown");
/// assert_ne!(a, b);
/// assert_eq!(b, b);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    id: u64,
    label: Option<&'static str>,
}

impl Symbol {
    /// Mint a fresh anonymous symbol.
    pub fn new() -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            label: None,
        }
    }

    /// Mint a fresh symbol carrying a descriptive label.
    ///
    /// The label does not participate in equality: two symbols with the same
    /// label are still distinct keys.
    pub fn labeled(label: &'static str) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            label: Some(label),
        }
    }

    /// The descriptive label, if one was given at mint time.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "Symbol({label})"),
            None => write!(f, "Symbol(#{})", self.id),
        }
    }
}

/// An identifier under which listeners are grouped.
///
/// Keys come in exactly three shapes: text, integer, or opaque [`Symbol`].
/// Typed construction goes through the `From` impls; untyped values (for
/// callers working with raw JSON) go through `TryFrom<&Value>`, which rejects
/// everything that is not a string or an integer number.
///
/// # Example
/// ```
/// use keyed_events::{EmitError, EventKey};
/// use serde_json::json;
///
/// let by_name = EventKey::from("user_created");
/// let by_id = EventKey::from(42i64);
/// assert_ne!(by_name, by_id);
///
/// assert_eq!(EventKey::try_from(&json!("ping")), Ok(EventKey::from("ping")));
/// assert_eq!(EventKey::try_from(&json!(1.5)), Err(EmitError::InvalidKey));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A textual key.
    Name(String),
    /// An integer key.
    Id(i64),
    /// An opaque symbol key.
    Sym(Symbol),
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for EventKey {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<u32> for EventKey {
    fn from(id: u32) -> Self {
        Self::Id(i64::from(id))
    }
}

impl From<Symbol> for EventKey {
    fn from(sym: Symbol) -> Self {
        Self::Sym(sym)
    }
}

impl From<&EventKey> for EventKey {
    fn from(key: &EventKey) -> Self {
        key.clone()
    }
}

impl TryFrom<&Value> for EventKey {
    type Error = EmitError;

    /// Convert an untyped value into a key.
    ///
    /// Accepts strings and integer numbers; everything else (floats, bools,
    /// null, arrays, objects) fails with [`EmitError::InvalidKey`].
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => Ok(Self::Name(name.clone())),
            Value::Number(n) => n.as_i64().map(Self::Id).ok_or(EmitError::InvalidKey),
            _ => Err(EmitError::InvalidKey),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Id(id) => write!(f, "{id}"),
            Self::Sym(sym) => write!(f, "{sym}"),
        }
    }
}
