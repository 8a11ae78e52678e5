//! The spatial feature-store collaborator.

use std::collections::HashMap;

use async_trait::async_trait;
use geo::{Centroid, Coord, Geometry};

use crate::{SpatialReference, TransportError};

/// Attribute query against one feature collection.
///
/// # Examples
///
/// ```
/// use campus_search_core::{FeatureQuery, SpatialReference};
///
/// let query = FeatureQuery::new("1=1")
///     .with_out_fields(["NAME"])
///     .with_geometry(SpatialReference::WGS84)
///     .with_limit(5);
/// assert!(query.return_geometry);
/// assert_eq!(query.limit, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureQuery {
    /// Attribute-query `WHERE` clause.
    pub where_clause: String,
    /// Attributes to return.
    pub out_fields: Vec<String>,
    /// Attributes to sort by.
    pub order_by: Vec<String>,
    /// Whether geometry should be returned.
    pub return_geometry: bool,
    /// Coordinate system for returned geometry.
    pub out_sr: Option<SpatialReference>,
    /// Maximum number of features.
    pub limit: Option<usize>,
}

impl FeatureQuery {
    /// Query features matching `where_clause`, returning all attributes and no
    /// geometry.
    pub fn new(where_clause: impl Into<String>) -> Self {
        Self {
            where_clause: where_clause.into(),
            out_fields: Vec::new(),
            order_by: Vec::new(),
            return_geometry: false,
            out_sr: None,
            limit: None,
        }
    }

    /// Restrict the returned attributes.
    #[must_use]
    pub fn with_out_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sort results by `fields`.
    #[must_use]
    pub fn with_order_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Return geometry projected to `out_sr`.
    #[must_use]
    pub const fn with_geometry(mut self, out_sr: SpatialReference) -> Self {
        self.return_geometry = true;
        self.out_sr = Some(out_sr);
        self
    }

    /// Cap the number of returned features.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl AttributeValue {
    /// Render the value as display text; `None` for nulls and blank text.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(value) => Some(value.to_string()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// A feature returned by a [`FeatureStore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Attribute values keyed by field name.
    pub attributes: HashMap<String, AttributeValue>,
    /// Geometry, when requested and present.
    pub geometry: Option<Geometry<f64>>,
}

impl Feature {
    /// Display text of attribute `field`.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        self.attributes.get(field).and_then(AttributeValue::to_text)
    }

    /// Attribute `field` exactly as stored, surrounding whitespace included.
    ///
    /// `None` for missing, null and blank values. Use this where the value
    /// is compared against the store again.
    #[must_use]
    pub fn stored_text(&self, field: &str) -> Option<String> {
        match self.attributes.get(field)? {
            AttributeValue::Text(value) => (!value.trim().is_empty()).then(|| value.clone()),
            other => other.to_text(),
        }
    }

    /// A single coordinate standing in for the geometry.
    ///
    /// Points are returned as-is; lines and polygons use their centroid.
    #[must_use]
    pub fn representative_point(&self) -> Option<Coord<f64>> {
        match self.geometry.as_ref()? {
            Geometry::Point(point) => Some(point.0),
            other => other.centroid().map(|point| point.0),
        }
    }
}

/// A named spatial feature collection.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Return the features matching `query`.
    async fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, TransportError>;
}
