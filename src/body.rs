//! The append-only document model the walker fills in.
//!
//! Attribute values are [`hcl::Expression`]s. Bodies and blocks are kept
//! here rather than as [`hcl::Body`] because the layout needs blank lines
//! between some sibling blocks and not others, and attribute keys are
//! written verbatim even where they are not valid identifiers.

use std::fmt;

pub use hcl::Expression;

use crate::error::Result;

/// An ordered sequence of attributes, blocks and blank lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    elements: Vec<Element>,
}

/// One entry of a [`Body`].
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// `key = expression`.
    Attribute(Attribute),
    /// `type "label" { ... }`.
    Block(Block),
    /// An empty line separating sections.
    Newline,
}

/// A `key = expression` assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Left-hand side, written as-is.
    pub key: String,
    /// Right-hand side.
    pub expr: Expression,
}

/// A nested block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Block type, e.g. `group`.
    pub ident: String,
    /// Labels following the type.
    pub labels: Vec<String>,
    /// Block contents.
    pub body: Body,
}

impl Body {
    /// Creates an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Whether the body holds any attribute or block. Blank lines do not count.
    pub fn has_content(&self) -> bool {
        self.elements
            .iter()
            .any(|e| !matches!(e, Element::Newline))
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.elements.iter().filter_map(|e| match e {
            Element::Attribute(a) => Some(a),
            _ => None,
        })
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.elements.iter().filter_map(|e| match e {
            Element::Block(b) => Some(b),
            _ => None,
        })
    }

    /// Appends an attribute.
    pub fn push_attribute(&mut self, key: impl Into<String>, expr: Expression) {
        self.elements.push(Element::Attribute(Attribute {
            key: key.into(),
            expr,
        }));
    }

    /// Appends a block and returns its body for filling in.
    pub fn append_block(&mut self, ident: impl Into<String>, labels: Vec<String>) -> &mut Body {
        self.elements.push(Element::Block(Block {
            ident: ident.into(),
            labels,
            body: Body::new(),
        }));
        match self.elements.last_mut() {
            Some(Element::Block(block)) => &mut block.body,
            _ => unreachable!("a block was just pushed"),
        }
    }

    /// Appends a blank line.
    pub fn append_newline(&mut self) {
        self.elements.push(Element::Newline);
    }

    /// Renders the body as HCL text.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        crate::format::write_body(&mut out, self, 0)?;
        Ok(out)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
