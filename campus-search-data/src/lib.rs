//! HTTP backends for campus search.
//!
//! The [`arcgis`] module implements the geocoder and feature-store
//! collaborators of `campus-search-core` against ArcGIS REST services.

#![forbid(unsafe_code)]

pub mod arcgis;

pub use arcgis::{
    ArcGisFeatureStore, ArcGisGeocoder, DEFAULT_USER_AGENT, HttpClientConfig, ProviderBuildError,
};
