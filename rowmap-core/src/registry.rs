use std::sync::Arc;

use hashbrown::HashMap;
use lazy_static::lazy_static;

use crate::option::ZeroPkPolicy;
use crate::value::Value;

/// Per-tag value semantics: row binding, key canonicalization, and join
/// equality for one logical type.
///
/// Codecs never panic on unexpected input; an inconvertible source value
/// simply leaves the target field at its default.
pub trait TypeCodec: Send + Sync {
    /// The logical type tag this codec is registered under.
    fn type_name(&self) -> &'static str;

    /// Coerces a raw column value into the tag's canonical [`Value`]
    /// variant. `None` means "leave the field untouched" — both for NULL
    /// input and for source kinds the tag does not accept.
    fn bind(&self, raw: &Value) -> Option<Value>;

    /// Canonical string form of a primary-key component. Returns the empty
    /// string when the value is semantically absent for this tag; such a
    /// component suppresses the whole row.
    fn pk_id(&self, value: &Value, zero_pk: ZeroPkPolicy) -> String;

    /// Join equality for relation matching. Absent operands never match.
    fn equal(&self, x: &Value, y: &Value) -> bool;
}

/// Tag-indexed codec catalog.
///
/// A default catalog covering every built-in tag is available through
/// [`default_registry`]; callers that need custom tags build their own and
/// hand it to `map_rows_in`.
pub struct TypeRegistry {
    entries: HashMap<&'static str, Arc<dyn TypeCodec>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registry pre-populated with every built-in codec.
    pub fn with_defaults() -> Self {
        let mut registry = TypeRegistry::new();
        registry.register(Arc::new(UuidCodec));
        registry.register(Arc::new(ZeroUuidCodec));
        registry.register(Arc::new(StringCodec));
        registry.register(Arc::new(Int32Codec));
        registry.register(Arc::new(Int64Codec));
        registry.register(Arc::new(Float32Codec));
        registry.register(Arc::new(Float64Codec));
        registry.register(Arc::new(BoolCodec));
        registry.register(Arc::new(TimestampCodec));
        registry.register(Arc::new(DateCodec));
        registry.register(Arc::new(ZeroStringCodec));
        registry.register(Arc::new(ZeroIntCodec));
        registry.register(Arc::new(ZeroFloatCodec));
        registry.register(Arc::new(ZeroBoolCodec));
        registry
    }

    pub fn register(&mut self, codec: Arc<dyn TypeCodec>) {
        self.entries.insert(codec.type_name(), codec);
    }

    pub fn lookup(&self, tag: &str) -> Option<&Arc<dyn TypeCodec>> {
        self.entries.get(tag)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::with_defaults()
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: Arc<TypeRegistry> = Arc::new(TypeRegistry::with_defaults());
}

/// Shared process-wide registry with the built-in codecs.
pub fn default_registry() -> Arc<TypeRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

fn numeric_pk_id<T: PartialEq + Default + ToString>(value: Option<T>, zero_pk: ZeroPkPolicy) -> String {
    match value {
        Some(v) if v == T::default() && zero_pk == ZeroPkPolicy::TreatAsAbsent => String::new(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// `uuid` — nullable UUID carried as `Option<Uuid>`; the nil UUID is
/// treated as absent.
pub struct UuidCodec;

impl TypeCodec for UuidCodec {
    fn type_name(&self) -> &'static str {
        "uuid"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        raw.to_uuid().map(Value::Uuid)
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        match value.to_uuid() {
            Some(u) if !u.is_nil() => u.to_string(),
            _ => String::new(),
        }
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        uuid_equal(x, y)
    }
}

/// `zerouuid` — UUID with an in-band zero value, carried as a plain
/// `Uuid`. Shares canonical form and equality with `uuid` so the two tags
/// compare across each other in either order.
pub struct ZeroUuidCodec;

impl TypeCodec for ZeroUuidCodec {
    fn type_name(&self) -> &'static str {
        "zerouuid"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        raw.to_uuid().map(Value::Uuid)
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        match value.to_uuid() {
            Some(u) if !u.is_nil() => u.to_string(),
            _ => String::new(),
        }
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        uuid_equal(x, y)
    }
}

fn uuid_equal(x: &Value, y: &Value) -> bool {
    match (x.to_uuid(), y.to_uuid()) {
        (Some(a), Some(b)) => !a.is_nil() && !b.is_nil() && a == b,
        _ => false,
    }
}

/// `string` — UTF-8 text; the empty string never participates in keys or
/// joins.
pub struct StringCodec;

impl TypeCodec for StringCodec {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw.to_text() {
            Some(s) if !s.is_empty() => Some(Value::Text(s)),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        value.to_text().unwrap_or_default()
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_text(), y.to_text()) {
            (Some(a), Some(b)) => !a.is_empty() && !b.is_empty() && a == b,
            _ => false,
        }
    }
}

macro_rules! integer_codec {
    ($name:ident, $tag:literal) => {
        #[doc = concat!("`", $tag, "` — signed integer; zero is a non-key under the default policy.")]
        pub struct $name;

        impl TypeCodec for $name {
            fn type_name(&self) -> &'static str {
                $tag
            }

            fn bind(&self, raw: &Value) -> Option<Value> {
                raw.to_i64().map(Value::Int)
            }

            fn pk_id(&self, value: &Value, zero_pk: ZeroPkPolicy) -> String {
                numeric_pk_id(value.to_i64(), zero_pk)
            }

            fn equal(&self, x: &Value, y: &Value) -> bool {
                match (x.to_i64(), y.to_i64()) {
                    (Some(a), Some(b)) => a != 0 && b != 0 && a == b,
                    _ => false,
                }
            }
        }
    };
}

integer_codec!(Int32Codec, "int32");
integer_codec!(Int64Codec, "int64");

macro_rules! float_codec {
    ($name:ident, $tag:literal) => {
        #[doc = concat!("`", $tag, "` — IEEE float; zero is a non-key under the default policy.")]
        pub struct $name;

        impl TypeCodec for $name {
            fn type_name(&self) -> &'static str {
                $tag
            }

            fn bind(&self, raw: &Value) -> Option<Value> {
                raw.to_f64().map(Value::Float)
            }

            fn pk_id(&self, value: &Value, zero_pk: ZeroPkPolicy) -> String {
                numeric_pk_id(value.to_f64(), zero_pk)
            }

            fn equal(&self, x: &Value, y: &Value) -> bool {
                match (x.to_f64(), y.to_f64()) {
                    (Some(a), Some(b)) => a != 0.0 && b != 0.0 && a == b,
                    _ => false,
                }
            }
        }
    };
}

float_codec!(Float32Codec, "float32");
float_codec!(Float64Codec, "float64");

/// `bool` — booleans never participate in primary keys.
pub struct BoolCodec;

impl TypeCodec for BoolCodec {
    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Bool(_) | Value::Text(_) => raw.to_bool().map(Value::Bool),
            _ => None,
        }
    }

    fn pk_id(&self, _value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        String::new()
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_bool(), y.to_bool()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// `timestamp` — instant with second precision; accepts a native instant
/// or a textual layout, compares by unix seconds.
pub struct TimestampCodec;

impl TypeCodec for TimestampCodec {
    fn type_name(&self) -> &'static str {
        "timestamp"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Timestamp(_) | Value::Text(_) => raw.to_timestamp().map(Value::Timestamp),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        match value.to_timestamp() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        }
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_timestamp(), y.to_timestamp()) {
            (Some(a), Some(b)) => a.timestamp() == b.timestamp(),
            _ => false,
        }
    }
}

/// `date` — calendar date; compared by its canonical `%Y-%m-%d` form.
pub struct DateCodec;

impl TypeCodec for DateCodec {
    fn type_name(&self) -> &'static str {
        "date"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Date(_) | Value::Timestamp(_) | Value::Text(_) => raw.to_date().map(Value::Date),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        match value.to_date() {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => String::new(),
        }
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_date(), y.to_date()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// `zerostring` — nullable text stored via sentinel (`Option<String>`);
/// NULL is absent, the empty string is a value.
pub struct ZeroStringCodec;

impl TypeCodec for ZeroStringCodec {
    fn type_name(&self) -> &'static str {
        "zerostring"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Text(s) => Some(Value::Text(s.clone())),
            Value::Bytes(b) => Some(Value::Text(String::from_utf8_lossy(b).into_owned())),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        value.to_text().unwrap_or_default()
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_text(), y.to_text()) {
            (Some(a), Some(b)) => !a.is_empty() && !b.is_empty() && a == b,
            _ => false,
        }
    }
}

/// `zeroint` — nullable integer stored via sentinel (`Option<i64>`); NULL
/// is absent, zero is a comparable value.
pub struct ZeroIntCodec;

impl TypeCodec for ZeroIntCodec {
    fn type_name(&self) -> &'static str {
        "zeroint"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Int(_) | Value::Text(_) => raw.to_i64().map(Value::Int),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, zero_pk: ZeroPkPolicy) -> String {
        numeric_pk_id(value.to_i64(), zero_pk)
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_i64(), y.to_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// `zerofloat` — nullable float stored via sentinel (`Option<f64>`).
pub struct ZeroFloatCodec;

impl TypeCodec for ZeroFloatCodec {
    fn type_name(&self) -> &'static str {
        "zerofloat"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Int(_) | Value::Float(_) | Value::Text(_) => raw.to_f64().map(Value::Float),
            _ => None,
        }
    }

    fn pk_id(&self, value: &Value, zero_pk: ZeroPkPolicy) -> String {
        numeric_pk_id(value.to_f64(), zero_pk)
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_f64(), y.to_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// `zerobool` — nullable boolean stored via sentinel (`Option<bool>`);
/// never a key.
pub struct ZeroBoolCodec;

impl TypeCodec for ZeroBoolCodec {
    fn type_name(&self) -> &'static str {
        "zerobool"
    }

    fn bind(&self, raw: &Value) -> Option<Value> {
        match raw {
            Value::Bool(_) | Value::Text(_) => raw.to_bool().map(Value::Bool),
            _ => None,
        }
    }

    fn pk_id(&self, _value: &Value, _zero_pk: ZeroPkPolicy) -> String {
        String::new()
    }

    fn equal(&self, x: &Value, y: &Value) -> bool {
        match (x.to_bool(), y.to_bool()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
