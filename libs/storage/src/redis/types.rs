//! Value types passed to and returned by the sorted-set and geo commands

use redis::geo::{RadiusOptions, RadiusOrder, RadiusSearchResult, Unit};

/// A sorted-set member with its score
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

impl From<(String, f64)> for ScoredMember {
    fn from((member, score): (String, f64)) -> Self {
        Self { member, score }
    }
}

/// Score bounds for the `*BYSCORE` commands
///
/// Bounds use the server syntax: `"-inf"`, `"+inf"`, `"(5"` for exclusive.
/// A `LIMIT` clause is sent only when `offset` or `count` is non-zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: String,
    pub max: String,
    pub offset: i64,
    pub count: i64,
}

impl ScoreRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
            ..Self::default()
        }
    }

    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.offset = offset;
        self.count = count;
        self
    }

    pub(crate) fn limit_args(&self) -> Option<(i64, i64)> {
        (self.offset != 0 || self.count != 0).then_some((self.offset, self.count))
    }
}

/// Distance unit for geo queries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeoUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl From<GeoUnit> for Unit {
    fn from(unit: GeoUnit) -> Self {
        match unit {
            GeoUnit::Meters => Unit::Meters,
            GeoUnit::Kilometers => Unit::Kilometers,
            GeoUnit::Miles => Unit::Miles,
            GeoUnit::Feet => Unit::Feet,
        }
    }
}

/// Result ordering for geo queries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeoSort {
    /// Whatever order the server returns
    #[default]
    Unsorted,
    /// Nearest first
    Asc,
    /// Farthest first
    Desc,
}

/// A named point, optionally carrying its distance from a query center
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoLocation {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub dist: Option<f64>,
}

impl GeoLocation {
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            name: name.into(),
            longitude,
            latitude,
            dist: None,
        }
    }
}

impl From<RadiusSearchResult> for GeoLocation {
    fn from(result: RadiusSearchResult) -> Self {
        let (longitude, latitude) = result
            .coord
            .map(|coord| (coord.longitude, coord.latitude))
            .unwrap_or_default();
        Self {
            name: result.name,
            longitude,
            latitude,
            dist: result.dist,
        }
    }
}

/// Parameters of a `GEORADIUS` query
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoRadiusQuery {
    pub radius: f64,
    pub unit: GeoUnit,
    pub with_coord: bool,
    pub with_dist: bool,
    /// Return at most this many results (0 = all)
    pub count: usize,
    pub sort: GeoSort,
}

impl GeoRadiusQuery {
    pub fn new(radius: f64, unit: GeoUnit) -> Self {
        Self {
            radius,
            unit,
            ..Self::default()
        }
    }

    pub(crate) fn options(&self) -> RadiusOptions {
        let mut options = RadiusOptions::default();
        if self.with_coord {
            options = options.with_coord();
        }
        if self.with_dist {
            options = options.with_dist();
        }
        if self.count > 0 {
            options = options.limit(self.count);
        }
        match self.sort {
            GeoSort::Unsorted => options,
            GeoSort::Asc => options.order(RadiusOrder::Asc),
            GeoSort::Desc => options.order(RadiusOrder::Desc),
        }
    }
}
