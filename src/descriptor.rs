//! Encode instructions read from a struct's `#[facet(...)]` field attributes.

use facet_core::{FieldAttribute, Shape, StructType};

use crate::error::{HclErrorKind, Result};

/// How a field lands in the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// `key = value` inside the enclosing block.
    Attribute,
    /// A nested block (or one block per element of a sequence or map).
    Block,
    /// The label of the enclosing block.
    Label,
}

impl Role {
    fn keyword(self) -> &'static str {
        match self {
            Role::Attribute => "attribute",
            Role::Block => "block",
            Role::Label => "label",
        }
    }
}

/// One field's encode instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Output key, which is the field name.
    pub name: &'static str,
    /// What the field becomes.
    pub role: Role,
    /// Whether zero values are dropped.
    pub optional: bool,
    /// Position of the field in the struct's declaration.
    pub index: usize,
}

/// Reads the descriptors of every annotated field, in declaration order.
///
/// Fields without a role are not part of the document and are left out. A
/// field naming two different roles is an error.
pub fn descriptors(
    shape: &'static Shape,
    ty: &'static StructType,
) -> Result<Vec<FieldDescriptor>> {
    let mut out = Vec::with_capacity(ty.fields.len());
    let mut has_label = false;

    for (index, field) in ty.fields.iter().enumerate() {
        let mut role: Option<Role> = None;
        let mut optional = false;

        for keyword in field.attributes.iter().flat_map(role_keywords) {
            let declared = match keyword {
                "attribute" => Role::Attribute,
                "block" => Role::Block,
                "label" => Role::Label,
                "optional" => {
                    optional = true;
                    continue;
                }
                other => {
                    return Err(HclErrorKind::UnknownFieldRole {
                        type_name: shape.to_string(),
                        field: field.name,
                        role: other.to_string(),
                    }
                    .into());
                }
            };

            match role {
                Some(first) if first != declared => {
                    return Err(HclErrorKind::ConflictingRoles {
                        type_name: shape.to_string(),
                        field: field.name,
                        first: first.keyword(),
                        second: declared.keyword(),
                    }
                    .into());
                }
                _ => role = Some(declared),
            }
        }

        let role = match (role, optional) {
            (Some(role), _) => role,
            (None, true) => Role::Attribute,
            (None, false) => {
                log::trace!("Field {} carries no hcl role, skipping", field.name);
                continue;
            }
        };

        if role == Role::Label {
            if has_label {
                return Err(HclErrorKind::DuplicateLabel {
                    type_name: shape.to_string(),
                }
                .into());
            }
            has_label = true;
        }

        out.push(FieldDescriptor {
            name: field.name.trim_start_matches("r#"),
            role,
            optional,
            index,
        });
    }

    Ok(out)
}

/// The keywords of one `#[facet(...)]` entry; a grouped entry is split on commas.
fn role_keywords(attribute: &FieldAttribute) -> Vec<&'static str> {
    match attribute {
        FieldAttribute::Arbitrary(raw) => {
            let raw: &'static str = *raw;
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}
