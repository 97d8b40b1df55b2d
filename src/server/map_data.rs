//! Mock map layers. The city's parking regulation API returns empty objects, so regulations
//! are assigned at random to real street centerlines around campus.

use {
    crate::{
        config::CampusConfig,
        data::StreetCatalog,
        domain::{
            Regulation,
            regulation::{color_for_hours, max_hours},
        },
    },
    rand::{Rng, seq::IteratorRandom},
    serde_json::{Map, Value, json},
    strum::IntoEnumIterator,
};

/// `[lat, lon]`, the shape the map component expects
pub type TicketPoint = [f64; 2];

/// GeoJSON FeatureCollection of in-bounds street segments with a random regulation each.
/// `with_color` adds the hex color the map paints the segment with.
pub fn street_feature_collection<R: Rng + ?Sized>(
    streets: &StreetCatalog,
    campus: &CampusConfig,
    with_color: bool,
    rng: &mut R,
) -> Value {
    let features: Vec<Value> = streets
        .segments
        .iter()
        .filter(|s| s.centroid.is_some_and(|c| campus.bounds.contains(&c)))
        .filter_map(|segment| {
            let regulation = Regulation::iter().choose(&mut *rng)?;
            let mut properties = regulation_properties(regulation, campus);
            if with_color {
                let color = color_for_hours(max_hours(&properties));
                properties.insert("color".to_string(), Value::from(color));
            }

            Some(json!({
                "type": "Feature",
                "geometry": segment.geometry,
                "properties": properties,
            }))
        })
        .collect();

    log::info!("Generated {} street segments around campus", features.len());

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn regulation_properties(regulation: Regulation, campus: &CampusConfig) -> Map<String, Value> {
    let hours = regulation.max_hours();
    let (begin, end) = if hours > 0 {
        (campus.hrs_begin, campus.hrs_end)
    } else {
        ("", "")
    };

    let mut properties = Map::new();
    properties.insert("regulation".into(), Value::from(regulation.to_string()));
    properties.insert("days".into(), Value::from(campus.regulated_days));
    properties.insert("hrs_begin".into(), Value::from(begin));
    properties.insert("hrs_end".into(), Value::from(end));
    properties.insert("max_hours".into(), Value::from(hours));
    properties
}

/// Random ticket locations in a square around the campus center.
pub fn ticket_points<R: Rng + ?Sized>(campus: &CampusConfig, rng: &mut R) -> Vec<TicketPoint> {
    let spray = &campus.tickets;
    (0..spray.count)
        .map(|_| {
            let lat = spray.center.lat + (rng.r#gen::<f64>() - 0.5) * spray.spread_deg;
            let lon = spray.center.lon + (rng.r#gen::<f64>() - 0.5) * spray.spread_deg;
            [lat, lon]
        })
        .collect()
}
