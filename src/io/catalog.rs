use crate::types::{Acquisition, StackError, StackResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use geo_types::{Coord, LineString, Polygon};
use serde::Deserialize;

/// GeoJSON search response from the catalog collaborator.
/// This represents the root FeatureCollection directly.
#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "features")]
    pub features: Vec<SearchFeature>,
}

#[derive(Debug, Deserialize)]
pub struct SearchFeature {
    #[serde(rename = "geometry")]
    pub geometry: GeoJsonGeometry,
    #[serde(rename = "properties")]
    pub properties: SceneProperties,
}

#[derive(Debug, Deserialize)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    #[serde(rename = "coordinates")]
    pub coordinates: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct SceneProperties {
    #[serde(rename = "sceneName")]
    pub scene_name: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "pathNumber")]
    pub path_number: u32,
    #[serde(rename = "polarization")]
    pub polarization: String,
    #[serde(rename = "platform")]
    pub platform: String,
}

impl GeoJsonGeometry {
    /// Convert to a planar polygon. Scene footprints are always simple
    /// polygons; anything else in the footprint slot is a format error.
    pub fn to_polygon(&self) -> StackResult<Polygon<f64>> {
        if self.geometry_type != "Polygon" {
            return Err(StackError::Catalog(format!(
                "Expected Polygon footprint, got {}",
                self.geometry_type
            )));
        }

        let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(self.coordinates.clone())
            .map_err(|e| StackError::Catalog(format!("Malformed polygon coordinates: {}", e)))?;
        let mut rings = rings.into_iter();
        let exterior = rings
            .next()
            .ok_or_else(|| StackError::Catalog("Polygon footprint has no rings".to_string()))?;
        let exterior = ring_to_line_string(exterior)?;
        let interiors = rings
            .map(ring_to_line_string)
            .collect::<StackResult<Vec<_>>>()?;

        Ok(Polygon::new(exterior, interiors))
    }
}

fn ring_to_line_string(ring: Vec<Vec<f64>>) -> StackResult<LineString<f64>> {
    let coords = ring
        .into_iter()
        .map(|position| {
            if position.len() < 2 {
                return Err(StackError::Catalog(
                    "Polygon ring position is not a lon/lat pair".to_string(),
                ));
            }
            Ok(Coord {
                x: position[0],
                y: position[1],
            })
        })
        .collect::<StackResult<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

/// The catalog emits RFC 3339 timestamps in some product families and
/// naive fractional-second timestamps (implicitly UTC) in others
fn parse_timestamp(raw: &str) -> StackResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| StackError::Catalog(format!("Unparsable start time {}: {}", raw, e)))
}

impl SearchFeature {
    pub fn to_acquisition(&self) -> StackResult<Acquisition> {
        Ok(Acquisition {
            scene_name: self.properties.scene_name.clone(),
            start_time: parse_timestamp(&self.properties.start_time)?,
            footprint: self.geometry.to_polygon()?,
            relative_orbit: self.properties.path_number,
            polarization: self.properties.polarization.parse()?,
            platform: self.properties.platform.parse()?,
        })
    }
}

/// Parse a catalog search response into acquisition records
pub fn parse_search_results(json: &str) -> StackResult<Vec<Acquisition>> {
    let results: SearchResults = serde_json::from_str(json)
        .map_err(|e| StackError::Catalog(format!("Malformed search response: {}", e)))?;

    let acquisitions = results
        .features
        .iter()
        .map(SearchFeature::to_acquisition)
        .collect::<StackResult<Vec<_>>>()?;

    log::info!("Parsed {} acquisitions from search response", acquisitions.len());
    Ok(acquisitions)
}

/// Reference-footprint documents arrive as a bare Geometry, a Feature,
/// or a FeatureCollection depending on which tool produced them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FootprintDocument {
    Feature(FootprintFeature),
    Collection(FootprintCollection),
    Geometry(GeoJsonGeometry),
}

#[derive(Debug, Deserialize)]
struct FootprintFeature {
    #[serde(rename = "geometry")]
    geometry: GeoJsonGeometry,
}

#[derive(Debug, Deserialize)]
struct FootprintCollection {
    #[serde(rename = "features")]
    features: Vec<FootprintFeature>,
}

/// Parse the reference footprint from a GeoJSON document. For a
/// FeatureCollection the first feature carries the footprint.
pub fn parse_reference_footprint(json: &str) -> StackResult<Polygon<f64>> {
    let document: FootprintDocument = serde_json::from_str(json)
        .map_err(|e| StackError::Catalog(format!("Malformed footprint document: {}", e)))?;

    match document {
        FootprintDocument::Geometry(geometry) => geometry.to_polygon(),
        FootprintDocument::Feature(feature) => feature.geometry.to_polygon(),
        FootprintDocument::Collection(collection) => collection
            .features
            .first()
            .ok_or_else(|| {
                StackError::Catalog("Footprint collection has no features".to_string())
            })?
            .geometry
            .to_polygon(),
    }
}
