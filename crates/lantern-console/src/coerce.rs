//! Argument type coercion.
//!
//! Raw argument strings become strongly-typed [`Value`]s through a
//! resolution pipeline: null sentinels, default sentinels, custom registered
//! coercions, enum parsing, then a generic `FromStr`-style fallback.
//! Hosts can register their own coercions per [`TypeKey`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use lantern_types::color::Color;
use lantern_types::error::{LanternError, Result};
use lantern_types::key::Key;

/// Sentinel accepted for both "null" and "default" values.
const TILDE: &str = "~";

// ---------------------------------------------------------------------------
// Enum descriptors
// ---------------------------------------------------------------------------

/// Description of a host-defined enumeration: a case-preserved name plus the
/// ordered (variant-name, value) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    pub name: String,
    pub variants: Vec<(String, i64)>,
}

impl EnumSpec {
    pub fn new(name: impl Into<String>, variants: Vec<(String, i64)>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            variants,
        })
    }

    /// Resolve a raw string to `(value, label)`: case-insensitive variant
    /// name first, then an integer parse through the underlying values.
    pub fn parse(&self, raw: &str) -> Option<(i64, String)> {
        for (name, value) in &self.variants {
            if name.eq_ignore_ascii_case(raw) {
                return Some((*value, name.clone()));
            }
        }
        raw.parse::<i64>().ok().map(|v| {
            let label = self
                .variants
                .iter()
                .find(|(_, value)| *value == v)
                .map_or_else(|| v.to_string(), |(name, _)| name.clone());
            (v, label)
        })
    }
}

// ---------------------------------------------------------------------------
// Parameter types and values
// ---------------------------------------------------------------------------

/// The closed set of parameter types a command may declare.
#[derive(Debug, Clone)]
pub enum ParamType {
    Bool,
    /// Three-state boolean: explicit true/false, or "toggle" via the null
    /// sentinels. The caller decides what toggling means.
    ToggleBool,
    Int,
    Float,
    Str,
    Color,
    Key,
    KeyList,
    Enum(Rc<EnumSpec>),
}

impl ParamType {
    /// Human-readable type name used in help text and coercion errors.
    pub fn friendly_name(&self) -> String {
        match self {
            Self::Bool => "boolean".to_string(),
            Self::ToggleBool => "toggle".to_string(),
            Self::Int => "integer".to_string(),
            Self::Float => "number".to_string(),
            Self::Str => "string".to_string(),
            Self::Color => "color".to_string(),
            Self::Key => "key".to_string(),
            Self::KeyList => "key list".to_string(),
            Self::Enum(spec) => spec.name.clone(),
        }
    }

    /// The key used to look up custom coercions for this type.
    pub fn type_key(&self) -> TypeKey {
        match self {
            Self::Bool => TypeKey::Bool,
            Self::ToggleBool => TypeKey::ToggleBool,
            Self::Int => TypeKey::Int,
            Self::Float => TypeKey::Float,
            Self::Str => TypeKey::Str,
            Self::Color => TypeKey::Color,
            Self::Key => TypeKey::Key,
            Self::KeyList => TypeKey::KeyList,
            Self::Enum(spec) => TypeKey::Enum(spec.name.clone()),
        }
    }

    /// Null/empty representation, for types that have one.
    fn null_value(&self) -> Option<Value> {
        match self {
            Self::ToggleBool => Some(Value::Toggle(None)),
            Self::Str => Some(Value::Str(String::new())),
            _ => None,
        }
    }

    /// Zero-value/default-constructed instance of this type.
    fn default_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::ToggleBool => Value::Toggle(None),
            Self::Int => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Str => Value::Str(String::new()),
            Self::Color => Value::Color(Color::rgba(0.0, 0.0, 0.0, 0.0)),
            Self::Key => Value::Key(Key::A),
            Self::KeyList => Value::Keys(Vec::new()),
            Self::Enum(spec) => {
                let (value, label) = spec
                    .variants
                    .first()
                    .map_or((0, "0".to_string()), |(name, value)| {
                        (*value, name.clone())
                    });
                Value::Enum { value, label }
            },
        }
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    /// `None` means "toggle".
    Toggle(Option<bool>),
    Int(i64),
    Float(f64),
    Str(String),
    Color(Color),
    Key(Key),
    Keys(Vec<Key>),
    Enum { value: i64, label: String },
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_toggle(&self) -> Option<Option<bool>> {
        match self {
            Self::Toggle(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<Key> {
        match self {
            Self::Key(k) => Some(*k),
            _ => None,
        }
    }

    pub fn as_keys(&self) -> Option<&[Key]> {
        match self {
            Self::Keys(keys) => Some(keys),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i64> {
        match self {
            Self::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Toggle(None) => write!(f, "~"),
            Self::Toggle(Some(b)) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Color(c) => write!(f, "({}, {}, {}, {})", c.r, c.g, c.b, c.a),
            Self::Key(k) => write!(f, "{k}"),
            Self::Keys(keys) => {
                let names: Vec<String> = keys.iter().map(Key::to_string).collect();
                write!(f, "{}", names.join(","))
            },
            Self::Enum { label, .. } => write!(f, "{label}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Coercion registry
// ---------------------------------------------------------------------------

/// Identity of a coercible type, for custom-coercion registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Bool,
    ToggleBool,
    Int,
    Float,
    Str,
    Color,
    Key,
    KeyList,
    Enum(String),
}

/// A registered coercion function.
pub type CoerceFn = Box<dyn Fn(&str) -> Result<Value>>;

/// Maps parameter types to parser functions. Ships with built-in rules for
/// booleans, toggle booleans, and colors; hosts may register more.
pub struct TypeCoercionRegistry {
    custom: HashMap<TypeKey, CoerceFn>,
}

impl TypeCoercionRegistry {
    /// Create a registry with the built-in coercions pre-registered.
    pub fn new() -> Self {
        let mut reg = Self {
            custom: HashMap::new(),
        };
        reg.register(TypeKey::Bool, Box::new(|raw| parse_bool(raw).map(Value::Bool)), false);
        reg.register(
            TypeKey::ToggleBool,
            Box::new(|raw| parse_bool(raw).map(|b| Value::Toggle(Some(b)))),
            false,
        );
        reg.register(TypeKey::Color, Box::new(|raw| Ok(Value::Color(parse_color(raw)))), false);
        reg
    }

    /// Register a custom coercion for `key`. When a coercion already exists
    /// and `override_existing` is false the call is a silent no-op.
    pub fn register(&mut self, key: TypeKey, f: CoerceFn, override_existing: bool) {
        if !override_existing && self.custom.contains_key(&key) {
            return;
        }
        self.custom.insert(key, f);
    }

    /// Convert a raw argument string into a value of the target type.
    ///
    /// Resolution order, first match wins: null sentinel (nullable types),
    /// default sentinel, custom coercion, enum parse, generic fallback.
    pub fn coerce(&self, raw: &str, target: &ParamType) -> Result<Value> {
        // 1. Null sentinel for nullable targets.
        if let Some(null) = target.null_value()
            && (raw == TILDE || raw.eq_ignore_ascii_case("null"))
        {
            return Ok(null);
        }

        // 2. Default sentinel.
        if raw == TILDE || raw.eq_ignore_ascii_case("default") {
            return Ok(target.default_value());
        }

        // 3. Custom coercion for the exact type.
        if let Some(f) = self.custom.get(&target.type_key()) {
            return f(raw);
        }

        // 4. Enum parse.
        if let ParamType::Enum(spec) = target {
            return spec
                .parse(raw)
                .map(|(value, label)| Value::Enum { value, label })
                .ok_or_else(|| coercion_error(raw, target));
        }

        // 5. Generic fallback.
        self.fallback(raw, target)
    }

    fn fallback(&self, raw: &str, target: &ParamType) -> Result<Value> {
        match target {
            ParamType::Bool => parse_bool(raw).map(Value::Bool),
            ParamType::ToggleBool => parse_bool(raw).map(|b| Value::Toggle(Some(b))),
            ParamType::Int => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| coercion_error(raw, target)),
            ParamType::Float => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| coercion_error(raw, target)),
            ParamType::Str => Ok(Value::Str(raw.to_string())),
            ParamType::Color => Ok(Value::Color(parse_color(raw))),
            ParamType::Key => raw.parse::<Key>().map(Value::Key),
            ParamType::KeyList => Key::parse_list(raw).map(Value::Keys),
            ParamType::Enum(_) => Err(coercion_error(raw, target)),
        }
    }
}

impl Default for TypeCoercionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn coercion_error(raw: &str, target: &ParamType) -> LanternError {
    LanternError::Coercion {
        raw: raw.to_string(),
        target: target.friendly_name(),
    }
}

/// Boolean parse accepting `0`/`1` alongside the native textual forms.
fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "1" => Ok(true),
        "0" => Ok(false),
        _ if raw.eq_ignore_ascii_case("true") => Ok(true),
        _ if raw.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(LanternError::Coercion {
            raw: raw.to_string(),
            target: "boolean".to_string(),
        }),
    }
}

/// Color parse: web hex first, then a comma list of up to four float
/// components. Component lists with any value above 1.0 are read on the
/// 0-255 scale and normalized. Unset green/blue default to 0, unset alpha
/// to 1. Total failure falls back to black.
fn parse_color(raw: &str) -> Color {
    if let Some(c) = Color::from_hex(raw) {
        return c;
    }

    let parts: Vec<f32> = raw
        .split(',')
        .map(str::trim)
        .take(4)
        .filter_map(|p| p.parse::<f32>().ok())
        .collect();
    if parts.is_empty() {
        return Color::BLACK;
    }

    let scale = if parts.iter().any(|&v| v > 1.0) {
        255.0
    } else {
        1.0
    };
    let channel = |i: usize, fallback: f32| -> f32 {
        parts.get(i).map_or(fallback, |&v| v / scale)
    };
    Color::rgba(
        channel(0, 0.0),
        channel(1, 0.0),
        channel(2, 0.0),
        channel(3, 1.0),
    )
}
