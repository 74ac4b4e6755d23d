use facet::Facet;
use serde::Deserialize;

/// Restricts the nodes a job, group or task may be placed on.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Constraint {
    #[serde(rename = "LTarget")]
    #[facet(attribute, optional)]
    pub attribute: String,
    #[serde(rename = "RTarget")]
    #[facet(attribute, optional)]
    pub value: String,
    #[serde(rename = "Operand")]
    #[facet(attribute, optional)]
    pub operator: String,
}

/// A weighted placement preference.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Affinity {
    #[serde(rename = "LTarget")]
    #[facet(attribute, optional)]
    pub attribute: String,
    #[serde(rename = "RTarget")]
    #[facet(attribute, optional)]
    pub value: String,
    #[serde(rename = "Operand")]
    #[facet(attribute, optional)]
    pub operator: String,
    #[serde(rename = "Weight")]
    #[facet(attribute, optional)]
    pub weight: Option<i8>,
}

/// Spreads allocations over the values of a node attribute.
#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Spread {
    #[facet(attribute, optional)]
    pub attribute: Option<String>,
    #[facet(attribute, optional)]
    pub weight: Option<i8>,
    #[serde(rename = "SpreadTarget", deserialize_with = "super::nullable")]
    #[facet(block)]
    pub target: Vec<SpreadTarget>,
}

#[derive(Facet, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct SpreadTarget {
    #[facet(label)]
    pub value: String,
    #[facet(attribute, optional)]
    pub percent: u8,
}
