#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use std::io::Write;

use facet_core::Facet;
use facet_reflect::Peek;

mod body;
pub mod descriptor;
mod duration;
pub mod emit;
mod error;
mod format;
pub mod job;
pub mod map;
pub mod stdio;
mod value;
mod walk;

pub use body::{Attribute, Block, Body, Element, Expression};
pub use duration::Duration;
pub use error::{HclError, HclErrorKind, Result};
pub use value::{Untyped, Value};

use walk::Walker;

/// Encodes `value` as a block named `key` and returns the document tree.
///
/// An empty `key` writes the value's fields at the top level instead.
pub fn to_body<'a, T: Facet<'a>>(key: &str, value: &'a T) -> Result<Body> {
    log::trace!("Encoding {} under `{key}`", T::SHAPE);

    let mut body = Body::new();
    Walker::new(key).walk(&mut body, key, Peek::new(value), false)?;
    Ok(body)
}

/// Encodes `value` as a block named `key` and renders it as HCL text.
///
/// ```
/// use facet::Facet;
///
/// #[derive(Facet)]
/// struct Task {
///     #[facet(label)]
///     name: String,
///     #[facet(attribute, optional)]
///     driver: String,
/// }
///
/// let task = Task {
///     name: "redis".to_string(),
///     driver: "docker".to_string(),
/// };
/// let hcl = facet_hcl::to_string("task", &task).unwrap();
/// assert_eq!(hcl, "task \"redis\" {\n  driver = \"docker\"\n}\n");
/// ```
pub fn to_string<'a, T: Facet<'a>>(key: &str, value: &'a T) -> Result<String> {
    to_body(key, value)?.render()
}

/// Encodes `value` as a block named `key` into `writer`.
///
/// Nothing is written when encoding fails.
pub fn to_writer<'a, W: Write, T: Facet<'a>>(writer: &mut W, key: &str, value: &'a T) -> Result<()> {
    let text = to_string(key, value)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Converts a Nomad job in JSON form (`{"Job": {...}}`) to its HCL job
/// specification.
pub fn json_to_hcl(input: &[u8]) -> Result<String> {
    let wrapper = job::JobWrapper::from_json(input)?;
    log::debug!("Decoded job {:?}", wrapper.job.id);
    to_string("job", &wrapper.job)
}
