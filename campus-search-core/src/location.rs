//! The device-location collaborator.

use async_trait::async_trait;
use geo::Coord;

use crate::LocationError;

/// Access to the current position of the user's device.
#[async_trait]
pub trait LocationCapability: Send + Sync {
    /// Return the current WGS84 position.
    async fn current_position(&self) -> Result<Coord<f64>, LocationError>;
}

/// A capability that always answers the same way.
///
/// Useful where the position is known up front, such as a coordinate passed
/// on the command line, or where no device location exists at all.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLocation {
    answer: Result<Coord<f64>, LocationError>,
}

impl StaticLocation {
    /// Always report `position`.
    #[must_use]
    pub const fn at(position: Coord<f64>) -> Self {
        Self {
            answer: Ok(position),
        }
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn failing(error: LocationError) -> Self {
        Self { answer: Err(error) }
    }
}

#[async_trait]
impl LocationCapability for StaticLocation {
    async fn current_position(&self) -> Result<Coord<f64>, LocationError> {
        self.answer.clone()
    }
}
