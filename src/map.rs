//! Encoding of map-typed fields.
//!
//! A map is written in one of three shapes, chosen from its declared value
//! type:
//!
//! * label-keyed blocks, when values are structs: one `key "entry" { ... }`
//!   block per entry;
//! * a sorted attribute block, when values are scalars: one `key { ... }`
//!   block with an attribute per entry;
//! * a nested value, when the map sits in an attribute position.

use std::collections::BTreeMap;

use facet_core::{Def, Shape, Type, UserType};
use facet_reflect::{Peek, PeekMap};

use crate::{
    body::Body,
    emit,
    error::{HclErrorKind, Result},
    value::{self, Value},
    walk::Walker,
};

/// How a map's entries are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapShape {
    /// One block per entry, labelled with the entry key.
    LabelledBlocks,
    /// One wrapper block, one attribute per entry in key order.
    SortedAttributes,
}

/// Picks the shape for maps whose values have the given type.
///
/// `Option` and smart pointer value types are classified by what they hold.
pub fn classify(value_shape: &'static Shape) -> Option<MapShape> {
    let value_shape = value::declared_shape(value_shape);
    if value::is_scalar_shape(value_shape) {
        return Some(MapShape::SortedAttributes);
    }
    match value_shape.ty {
        Type::User(UserType::Struct(_)) => Some(MapShape::LabelledBlocks),
        _ => match value_shape.def {
            Def::List { .. } | Def::Map { .. } => Some(MapShape::SortedAttributes),
            _ => None,
        },
    }
}

impl Walker {
    /// Writes a non-empty map held by a block-role field.
    ///
    /// The shape comes from the map's declared value type, so every entry of
    /// one map is written the same way.
    pub(crate) fn walk_map(
        &mut self,
        parent: &mut Body,
        key: &str,
        map_shape: &'static Shape,
        map: PeekMap,
    ) -> Result<()> {
        let Def::Map(map_def) = map_shape.def else {
            return Err(value::unsupported(&self.path(), map_shape).into());
        };
        let Some(shape) = classify((map_def.v)()) else {
            return Err(value::unsupported(&self.path(), (map_def.v)()).into());
        };

        let mut entries = Vec::with_capacity(map.len());
        for (k, v) in map.iter() {
            let name = self.map_key(k)?;
            if is_absent(v) {
                log::debug!("Dropping absent map entry {}.{name}", self.path());
                continue;
            }
            entries.push((name, v));
        }
        if entries.is_empty() {
            return Ok(());
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        if parent.has_content() {
            parent.append_newline();
        }

        match shape {
            MapShape::LabelledBlocks => {
                for (label, entry) in entries {
                    log::trace!("Map entry {key} \"{label}\"");
                    let body = parent.append_block(key, vec![label.clone()]);
                    self.enter(&label);
                    let walked = self.walk(body, "", entry, false);
                    self.leave();
                    walked?;
                }
            }
            MapShape::SortedAttributes => {
                let body = parent.append_block(key, vec![]);
                for (name, entry) in entries {
                    self.enter(&name);
                    let resolved = value::resolve(entry, false, &self.path());
                    self.leave();
                    match resolved? {
                        Some(Value::Null) | None => {
                            log::debug!("Dropping empty map entry {key}.{name}");
                        }
                        Some(value) => emit::set_attribute(body, &name, value),
                    }
                }
            }
        }

        Ok(())
    }

    fn map_key(&self, key: Peek) -> Result<String> {
        match key.get::<String>() {
            Ok(s) => Ok(s.clone()),
            Err(_) => Err(value::unsupported(&self.path(), key.shape()).into()),
        }
    }
}

/// Whether a map entry is an `Option` holding nothing.
fn is_absent(entry: Peek) -> bool {
    entry
        .innermost_peek()
        .into_option()
        .is_ok_and(|opt| opt.value().is_none())
}

/// Resolves a map in an attribute position into a nested value.
///
/// Entries resolving to nothing are left out; an empty result is absent.
pub(crate) fn resolve_value_map(map: PeekMap, path: &str) -> Result<Option<Value>> {
    let mut entries = BTreeMap::new();
    for (k, v) in map.iter() {
        let Ok(key) = k.get::<String>() else {
            return Err(HclErrorKind::UnsupportedValue {
                path: path.to_string(),
                type_name: k.shape().to_string(),
            }
            .into());
        };
        let entry_path = format!("{path}.{key}");
        if let Some(value) = value::resolve(v, false, &entry_path)? {
            entries.insert(key.clone(), value);
        }
    }

    if entries.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Map(entries)))
    }
}
