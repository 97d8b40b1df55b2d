//! Street centerline GeoJSON, loaded once at startup.

use {
    crate::domain::LatLon,
    serde::Deserialize,
    serde_json::Value,
    std::{fs, path::Path},
};

#[derive(Debug, thiserror::Error)]
pub enum StreetError {
    #[error("cannot read street file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("street file is not a GeoJSON FeatureCollection: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Value,
}

/// One centerline. Geometry is kept verbatim so it can be echoed back to the map.
#[derive(Debug, Clone)]
pub struct StreetSegment {
    pub geometry: Value,
    /// Mean of the LineString vertices. None when the geometry has no usable vertices.
    pub centroid: Option<LatLon>,
}

impl StreetSegment {
    pub fn new(geometry: Value) -> Self {
        let centroid = line_centroid(&geometry);
        Self { geometry, centroid }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StreetCatalog {
    pub segments: Vec<StreetSegment>,
}

impl StreetCatalog {
    pub fn load(path: &Path) -> Result<Self, StreetError> {
        let text = fs::read_to_string(path).map_err(|source| StreetError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_geojson_str(&text)?;

        let unusable = catalog.segments.iter().filter(|s| s.centroid.is_none()).count();
        log::info!(
            "Loaded {} street segments from {} ({} without LineString vertices)",
            catalog.segments.len(),
            path.display(),
            unusable
        );
        Ok(catalog)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self, StreetError> {
        let raw: RawCollection = serde_json::from_str(text)?;
        let segments = raw
            .features
            .into_iter()
            .map(|f| StreetSegment::new(f.geometry))
            .collect();
        Ok(Self { segments })
    }
}

// GeoJSON positions are [lon, lat].
fn line_centroid(geometry: &Value) -> Option<LatLon> {
    let coords = geometry.get("coordinates")?.as_array()?;
    let vertices: Option<Vec<LatLon>> = coords
        .iter()
        .map(|c| {
            let pair = c.as_array()?;
            Some(LatLon::new(pair.get(1)?.as_f64()?, pair.first()?.as_f64()?))
        })
        .collect();
    LatLon::mean_of(&vertices?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_vertex_mean_in_lat_lon_order() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"LineString","coordinates":[[-122.45,37.77],[-122.44,37.78]]}}
        ]}"#;
        let catalog = StreetCatalog::from_geojson_str(text).unwrap();
        let c = catalog.segments[0].centroid.unwrap();
        assert!((c.lat - 37.775).abs() < 1e-12);
        assert!((c.lon + 122.445).abs() < 1e-12);
    }

    #[test]
    fn multi_line_geometry_has_no_centroid() {
        let text = r#"{"features":[
            {"geometry":{"type":"MultiLineString","coordinates":[[[-122.45,37.77],[-122.44,37.78]]]}},
            {"geometry":null}
        ]}"#;
        let catalog = StreetCatalog::from_geojson_str(text).unwrap();
        assert_eq!(catalog.segments.len(), 2);
        assert!(catalog.segments.iter().all(|s| s.centroid.is_none()));
    }

    #[test]
    fn not_a_collection_is_rejected() {
        assert!(StreetCatalog::from_geojson_str(r#"{"type":"Feature"}"#).is_err());
    }
}
