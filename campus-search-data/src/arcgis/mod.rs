//! ArcGIS REST implementations of the geocoder and feature-store traits.
//!
//! # Architecture
//!
//! [`ArcGisGeocoder`] serves every geocoding source in a catalogue: the
//! service to call is taken from the [`campus_search_core::SourceDescriptor`]
//! passed to each request. [`ArcGisFeatureStore`] is bound to one feature
//! layer. Both share the request plumbing in `client`, which maps transport
//! failures and the error envelope ArcGIS returns inside HTTP 200 responses
//! onto [`campus_search_core::TransportError`].
//!
//! # Example
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//! use campus_search_data::{ArcGisFeatureStore, ArcGisGeocoder, HttpClientConfig};
//!
//! let config = HttpClientConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("campus-map/2.0");
//! let geocoder = Arc::new(ArcGisGeocoder::with_config(config.clone())?);
//! let buildings = Arc::new(ArcGisFeatureStore::with_config(
//!     "https://maps.example.org/arcgis/rest/services/Campus/MapServer/0",
//!     config,
//! )?);
//! # let _ = (geocoder, buildings);
//! # Ok::<(), campus_search_data::ProviderBuildError>(())
//! ```

mod client;
mod feature_layer;
mod geocoder;
mod wire;

pub use client::{DEFAULT_USER_AGENT, HttpClientConfig, ProviderBuildError};
pub use feature_layer::ArcGisFeatureStore;
pub use geocoder::ArcGisGeocoder;
