use redis::geo::{RadiusSearchResult, Unit};

use super::RedisCommands;
use crate::common::StorageResult;
use crate::redis::types::{GeoLocation, GeoRadiusQuery};

impl RedisCommands<'_> {
    /// Add one named point, returning 1 if it was new
    pub fn geo_add(&self, key: &str, location: &GeoLocation) -> StorageResult<i64> {
        self.query(
            redis::cmd("GEOADD")
                .arg(key)
                .arg(location.longitude)
                .arg(location.latitude)
                .arg(&location.name),
        )
    }

    /// Members within `query.radius` of a center point
    ///
    /// Coordinates and distance are filled in only when the query asks for them.
    pub fn geo_radius(
        &self,
        key: &str,
        longitude: f64,
        latitude: f64,
        query: &GeoRadiusQuery,
    ) -> StorageResult<Vec<GeoLocation>> {
        let results: Vec<RadiusSearchResult> = self.query(
            redis::cmd("GEORADIUS")
                .arg(key)
                .arg(longitude)
                .arg(latitude)
                .arg(query.radius)
                .arg(Unit::from(query.unit))
                .arg(query.options()),
        )?;
        Ok(results.into_iter().map(GeoLocation::from).collect())
    }
}
