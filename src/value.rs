//! Resolved scalars and the ladder that produces them from reflected values.

use std::collections::{BTreeMap, HashMap};

use facet::Facet;
use facet_core::{Def, Shape};
use facet_reflect::Peek;
use serde::{Deserialize, Deserializer};

use crate::{
    duration::Duration,
    error::{HclErrorKind, Result},
    map,
};

/// A scalar resolved out of the object graph, ready for the emitter.
///
/// Absence is not a variant: the ladder returns `None` for it, so an absent
/// value can never reach the emitter.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Explicit `null`, only reachable through free-form values.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer of any width.
    Integer(i128),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// A list of values.
    List(Vec<Value>),
    /// A nested key/value mapping, kept in key order.
    Map(BTreeMap<String, Value>),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value.into())
    }
}

/// A free-form value such as a task driver's `config`, kept as JSON text.
///
/// The job schema cannot know what a driver accepts, so these values stay
/// untyped until encoding, where they resolve structurally.
#[derive(Facet, Clone, Debug, Default, PartialEq, Eq)]
pub struct Untyped {
    json: String,
}

impl Untyped {
    /// Captures an already decoded JSON value.
    pub fn new(value: &serde_json::Value) -> Self {
        Self {
            json: value.to_string(),
        }
    }

    /// The captured JSON value.
    pub fn value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.json)
    }
}

impl From<serde_json::Value> for Untyped {
    fn from(value: serde_json::Value) -> Self {
        Self::new(&value)
    }
}

impl<'de> Deserialize<'de> for Untyped {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(|v| Untyped::new(&v))
    }
}

/// Resolves a reflected value into a scalar.
///
/// `optional` turns zero values (`""`, `0`, `false`, empty lists, zero
/// durations) into absence. The encoder cannot tell "explicitly set to zero"
/// from "never set" for value types, so optional zero values are always
/// dropped. Smart pointers (`Box`, `Arc`, `Rc`) resolve to what they point at.
pub(crate) fn resolve(peek: Peek, optional: bool, path: &str) -> Result<Option<Value>> {
    let peek = peek.innermost_peek();

    if let Ok(opt) = peek.into_option() {
        return match opt.value() {
            Some(inner) => resolve(inner, optional, path),
            None => Ok(None),
        };
    }

    if let Ok(s) = peek.get::<String>() {
        return Ok(unless_zero(optional, s.is_empty(), || Value::String(s.clone())));
    }
    if let Ok(b) = peek.get::<bool>() {
        return Ok(unless_zero(optional, !*b, || Value::Bool(*b)));
    }
    if let Some(n) = integer(peek) {
        return Ok(unless_zero(optional, n == 0, || Value::Integer(n)));
    }
    if let Ok(d) = peek.get::<Duration>() {
        return Ok(unless_zero(optional, d.is_zero(), || {
            Value::String(d.to_string())
        }));
    }
    if let Ok(v) = peek.get::<f64>() {
        return Ok(unless_zero(optional, *v == 0.0, || Value::Float(*v)));
    }
    if let Ok(v) = peek.get::<f32>() {
        return Ok(unless_zero(optional, *v == 0.0, || Value::Float(f64::from(*v))));
    }
    if let Ok(u) = peek.get::<Untyped>() {
        let json = u.value().map_err(|e| HclErrorKind::Reflect {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        return Ok(Some(from_json(json)));
    }

    match peek.shape().def {
        Def::List { .. } => resolve_list(peek, optional, path),
        Def::Map { .. } => {
            let map = peek.into_map().map_err(|e| reflect_error(path, e))?;
            map::resolve_value_map(map, path)
        }
        _ => Err(unsupported(path, peek.shape()).into()),
    }
}

fn resolve_list(peek: Peek, optional: bool, path: &str) -> Result<Option<Value>> {
    let list = peek.into_list().map_err(|e| reflect_error(path, e))?;

    let mut items = Vec::new();
    for item in list.iter() {
        // Elements are values in their own right, never optional.
        if let Some(value) = resolve(item, false, path)? {
            items.push(value);
        }
    }

    Ok(unless_zero(optional, items.is_empty(), || Value::List(items)))
}

fn unless_zero(optional: bool, is_zero: bool, value: impl FnOnce() -> Value) -> Option<Value> {
    if optional && is_zero { None } else { Some(value()) }
}

fn integer(peek: Peek) -> Option<i128> {
    macro_rules! try_int {
        ($($ty:ty),*) => {
            $(
                if let Ok(v) = peek.get::<$ty>() {
                    return Some(i128::from(*v));
                }
            )*
        };
    }

    try_int!(i8, i16, i32, i64, u8, u16, u32, u64);
    if let Ok(v) = peek.get::<isize>() {
        return Some(*v as i128);
    }
    if let Ok(v) = peek.get::<usize>() {
        return Some(*v as i128);
    }
    None
}

/// Whether values of this shape resolve through the ladder alone.
///
/// Used to decide, from declared types, whether a field or map entry is a
/// scalar or something the walker has to descend into.
pub(crate) fn is_scalar_shape(shape: &'static Shape) -> bool {
    let leaves = [
        String::SHAPE,
        bool::SHAPE,
        i8::SHAPE,
        i16::SHAPE,
        i32::SHAPE,
        i64::SHAPE,
        isize::SHAPE,
        u8::SHAPE,
        u16::SHAPE,
        u32::SHAPE,
        u64::SHAPE,
        usize::SHAPE,
        f32::SHAPE,
        f64::SHAPE,
        Duration::SHAPE,
        Untyped::SHAPE,
        Vec::<String>::SHAPE,
        HashMap::<String, String>::SHAPE,
    ];
    leaves.iter().any(|leaf| *leaf == shape)
}

/// The type a declared shape stands for once options and pointers are looked through.
pub(crate) fn declared_shape(shape: &'static Shape) -> &'static Shape {
    match shape.def {
        Def::Option(opt) => declared_shape(opt.t),
        Def::Pointer(ptr) => match ptr.pointee() {
            Some(pointee) => declared_shape(pointee),
            None => shape,
        },
        _ => shape,
    }
}

/// Converts a free-form JSON value, recursing through arrays and objects.
pub(crate) fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else {
                Value::Float(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect(),
        ),
    }
}

pub(crate) fn unsupported(path: &str, shape: &'static Shape) -> HclErrorKind {
    HclErrorKind::UnsupportedValue {
        path: path.to_string(),
        type_name: shape.to_string(),
    }
}

pub(crate) fn reflect_error(path: &str, e: impl std::fmt::Display) -> HclErrorKind {
    HclErrorKind::Reflect {
        path: path.to_string(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved<'a, T: Facet<'a>>(value: &'a T, optional: bool) -> Option<Value> {
        resolve(Peek::new(value), optional, "test").unwrap()
    }

    #[test]
    fn optional_zero_values_are_absent() {
        assert_eq!(resolved(&String::new(), true), None);
        assert_eq!(resolved(&0i64, true), None);
        assert_eq!(resolved(&false, true), None);
        assert_eq!(resolved(&Duration::ZERO, true), None);
        assert_eq!(resolved(&Vec::<String>::new(), true), None);
        assert_eq!(resolved(&None::<String>, false), None);
    }

    #[test]
    fn required_zero_values_are_kept() {
        assert_eq!(resolved(&String::new(), false), Some(Value::from("")));
        assert_eq!(resolved(&0u64, false), Some(Value::Integer(0)));
        assert_eq!(resolved(&false, false), Some(Value::Bool(false)));
        assert_eq!(
            resolved(&Vec::<String>::new(), false),
            Some(Value::List(vec![]))
        );
    }

    #[test]
    fn options_resolve_their_content() {
        assert_eq!(resolved(&Some(50i8), true), Some(Value::Integer(50)));
        assert_eq!(resolved(&Some(String::new()), true), None);
        assert_eq!(
            resolved(&Some(Duration::from_secs(90)), true),
            Some(Value::from("1m30s"))
        );
    }

    #[test]
    fn free_form_values_resolve_structurally() {
        let untyped = Untyped::from(serde_json::json!({
            "ports": ["http", "grpc"],
            "count": 2,
            "ratio": 0.5,
            "nothing": null,
        }));

        let Some(Value::Map(map)) = resolved(&untyped, true) else {
            panic!("expected a map");
        };
        assert_eq!(
            map["ports"],
            Value::List(vec![Value::from("http"), Value::from("grpc")])
        );
        assert_eq!(map["count"], Value::Integer(2));
        assert_eq!(map["ratio"], Value::Float(0.5));
        assert_eq!(map["nothing"], Value::Null);
    }

    #[test]
    fn scalar_shapes_are_recognized() {
        assert!(is_scalar_shape(String::SHAPE));
        assert!(is_scalar_shape(Duration::SHAPE));
        assert!(is_scalar_shape(Vec::<String>::SHAPE));

        #[derive(Facet)]
        struct Block {
            name: String,
        }
        assert!(!is_scalar_shape(Block::SHAPE));
    }

    #[test]
    fn declared_shapes_look_through_wrappers() {
        assert_eq!(declared_shape(Option::<String>::SHAPE), String::SHAPE);
        assert_eq!(declared_shape(Box::<u32>::SHAPE), u32::SHAPE);
        assert_eq!(
            declared_shape(Option::<std::sync::Arc<Duration>>::SHAPE),
            Duration::SHAPE
        );
        assert_eq!(declared_shape(Vec::<String>::SHAPE), Vec::<String>::SHAPE);
    }

    #[test]
    fn pointers_resolve_their_pointee() {
        assert_eq!(
            resolved(&Box::new("redis".to_string()), false),
            Some(Value::from("redis"))
        );
        assert_eq!(resolved(&std::rc::Rc::new(3u16), false), Some(Value::Integer(3)));
        assert_eq!(resolved(&std::sync::Arc::new(0u16), true), None);
    }
}
