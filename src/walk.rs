//! Recursive descent over a reflected value graph.

use std::{collections::HashMap, rc::Rc};

use facet_core::{Def, Shape, StructType, Type, UserType};
use facet_reflect::{Peek, PeekStruct};

use crate::{
    body::Body,
    descriptor::{self, FieldDescriptor, Role},
    emit,
    error::{HclErrorKind, Result},
    value::{self, Value},
};

/// Key of the root block whose `name` attribute doubles as its label.
const ROOT_KEY: &str = "job";
/// Field labelling the root block when the type declares no label.
const ROOT_LABEL_FIELD: &str = "name";

/// What the walker does with a value, decided from its declared shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    /// `Option<T>`: nothing when `None`, the content otherwise.
    Optional,
    /// Resolved by the value ladder and written as an attribute.
    Scalar,
    /// A struct, written as a block.
    Record,
    /// A list, written as one sibling per element under the same key.
    Sequence,
    /// A map, written in one of the map shapes.
    Map,
    /// No rule applies.
    Unsupported,
}

pub(crate) fn classify(shape: &'static Shape) -> Node {
    match shape.def {
        Def::Option { .. } => Node::Optional,
        Def::List { .. } => Node::Sequence,
        Def::Map { .. } => Node::Map,
        _ if value::is_scalar_shape(shape) => Node::Scalar,
        _ => match shape.ty {
            Type::User(UserType::Struct(_)) => Node::Record,
            _ => Node::Unsupported,
        },
    }
}

/// Walks one value graph into a [`Body`].
pub(crate) struct Walker {
    segments: Vec<String>,
    /// Records currently being written; zero while at the top of the graph.
    depth: usize,
    /// Field descriptors, read once per struct type.
    descriptors: HashMap<*const Shape, Rc<[FieldDescriptor]>>,
}

impl Walker {
    pub(crate) fn new(root_key: &str) -> Self {
        Self {
            segments: vec![root_key.to_string()],
            depth: 0,
            descriptors: HashMap::new(),
        }
    }

    /// Writes `peek` into `parent` under `key`.
    ///
    /// An empty `key` writes a struct's fields straight into `parent`, which
    /// is how map entries fill the block made for them.
    pub(crate) fn walk(
        &mut self,
        parent: &mut Body,
        key: &str,
        peek: Peek,
        optional: bool,
    ) -> Result<()> {
        let peek = peek.innermost_peek();
        let shape = peek.shape();

        match classify(shape) {
            Node::Optional => {
                let opt = peek.into_option().map_err(|e| self.reflect_error(e))?;
                match opt.value() {
                    Some(inner) => self.walk(parent, key, inner, optional),
                    None => Ok(()),
                }
            }
            Node::Scalar => {
                if let Some(value) = value::resolve(peek, optional, &self.path())? {
                    emit::set_attribute(parent, key, value);
                }
                Ok(())
            }
            Node::Record => {
                let Type::User(UserType::Struct(ty)) = &shape.ty else {
                    return Err(value::unsupported(&self.path(), shape).into());
                };
                self.walk_record(parent, key, shape, ty, peek)
            }
            Node::Sequence => {
                let list = peek.into_list().map_err(|e| self.reflect_error(e))?;
                for (i, item) in list.iter().enumerate() {
                    self.enter(&format!("[{i}]"));
                    let walked = self.walk(parent, key, item, optional);
                    self.leave();
                    walked?;
                }
                Ok(())
            }
            Node::Map => {
                let map = peek.into_map().map_err(|e| self.reflect_error(e))?;
                if map.len() == 0 {
                    return Ok(());
                }
                self.walk_map(parent, key, shape, map)
            }
            Node::Unsupported => Err(value::unsupported(&self.path(), shape).into()),
        }
    }

    fn walk_record(
        &mut self,
        parent: &mut Body,
        key: &str,
        shape: &'static Shape,
        ty: &'static StructType,
        peek: Peek,
    ) -> Result<()> {
        let record = peek.into_struct().map_err(|e| self.reflect_error(e))?;
        let fields = self.descriptors(shape, ty)?;

        if parent.has_content() {
            parent.append_newline();
        }

        // Every record at the top of the graph is a root, including each
        // element of a root sequence.
        let fallback = if self.depth == 0 {
            root_label_fallback(key, &fields)
        } else {
            None
        };

        let mut label = None;
        for field in fields.iter().filter(|f| f.role == Role::Label).chain(fallback.as_ref()) {
            let field_peek = record
                .field(field.index)
                .map_err(|e| self.reflect_error(format!("{e:?}")))?;
            self.enter(field.name);
            let resolved = value::resolve(field_peek, false, &self.path());
            let path = self.path();
            self.leave();

            label = match resolved? {
                Some(Value::String(s)) if !s.is_empty() => Some(s),
                Some(Value::String(_)) | None => None,
                Some(_) => return Err(HclErrorKind::LabelNotString { path }.into()),
            };
        }

        log::trace!("Entering block {key} {label:?}");
        let body = if key.is_empty() {
            parent
        } else {
            parent.append_block(key, label.into_iter().collect())
        };

        self.depth += 1;
        let written = self.walk_fields(body, &record, &fields, fallback);
        self.depth -= 1;
        written
    }

    fn walk_fields(
        &mut self,
        body: &mut Body,
        record: &PeekStruct,
        fields: &[FieldDescriptor],
        fallback: Option<FieldDescriptor>,
    ) -> Result<()> {
        for field in fields {
            if field.role == Role::Label || fallback.is_some_and(|f| f.index == field.index) {
                continue;
            }

            let field_peek = record
                .field(field.index)
                .map_err(|e| self.reflect_error(format!("{e:?}")))?;

            self.enter(field.name);
            let walked = match field.role {
                Role::Block => self.walk(body, field.name, field_peek, field.optional),
                _ => match value::resolve(field_peek, field.optional, &self.path()) {
                    Ok(Some(value)) => {
                        emit::set_attribute(body, field.name, value);
                        Ok(())
                    }
                    Ok(None) => {
                        log::debug!("Omitting empty attribute {}", self.path());
                        Ok(())
                    }
                    Err(e) => Err(e),
                },
            };
            self.leave();
            walked?;
        }

        Ok(())
    }

    /// Descriptors of a struct type, read from its attributes on first use.
    fn descriptors(
        &mut self,
        shape: &'static Shape,
        ty: &'static StructType,
    ) -> Result<Rc<[FieldDescriptor]>> {
        let id: *const Shape = shape;
        if let Some(fields) = self.descriptors.get(&id) {
            return Ok(Rc::clone(fields));
        }

        let fields: Rc<[FieldDescriptor]> = descriptor::descriptors(shape, ty)?.into();
        self.descriptors.insert(id, Rc::clone(&fields));
        Ok(fields)
    }

    pub(crate) fn enter(&mut self, segment: &str) {
        self.segments.push(segment.to_string());
    }

    pub(crate) fn leave(&mut self) {
        self.segments.pop();
    }

    /// Dotted path of the value being walked, e.g. `job.group[0].task[1].config`.
    pub(crate) fn path(&self) -> String {
        let mut path = String::new();
        for segment in &self.segments {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }

    fn reflect_error(&self, e: impl std::fmt::Display) -> HclErrorKind {
        value::reflect_error(&self.path(), e)
    }
}

/// The root `job` block is labelled by its `name` field when the type
/// declares no label; that field is then not written as an attribute.
fn root_label_fallback(key: &str, fields: &[FieldDescriptor]) -> Option<FieldDescriptor> {
    if key != ROOT_KEY || fields.iter().any(|f| f.role == Role::Label) {
        return None;
    }
    fields
        .iter()
        .find(|f| f.name == ROOT_LABEL_FIELD && f.role == Role::Attribute)
        .copied()
}
