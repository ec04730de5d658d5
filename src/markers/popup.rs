//! Popup content for business markers.
//!
//! Content is plain data; the presentation layer decides fonts and boxes.
//! It is rebuilt on every reconcile pass so stale ratings or open/closed
//! states never linger on a marker.

use crate::core::geo::LatLng;
use crate::entity::BusinessEntity;

#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub category: String,
    pub rating_line: String,
    pub distance_line: String,
    pub status_line: Option<String>,
    pub address: Option<String>,
}

impl PopupContent {
    /// Assembles popup content for one entity, with the distance measured
    /// from the user's position.
    pub fn build(entity: &BusinessEntity, user_position: &LatLng) -> Self {
        let title = if entity.verified {
            format!("{} ✓", entity.name)
        } else {
            entity.name.clone()
        };

        let rating_line = if entity.review_count > 0 {
            format!(
                "{} {:.1} ({})",
                stars(entity.rating),
                entity.rating,
                entity.review_count
            )
        } else {
            "no reviews yet".to_string()
        };

        let distance = user_position.distance_to(&entity.safe_position());

        let status_line = entity.is_open.map(|open| {
            let state = if open { "open" } else { "closed" };
            match &entity.hours {
                Some(hours) => format!("{state} · {hours}"),
                None => state.to_string(),
            }
        });

        Self {
            title,
            category: entity.category.clone(),
            rating_line,
            distance_line: format_distance(distance),
            status_line,
            address: entity.address.clone(),
        }
    }
}

/// Five-star strip with half-star rounding, e.g. 4.3 -> "★★★★☆".
fn stars(rating: f64) -> String {
    let filled = (rating.clamp(0.0, 5.0) + 0.5) as usize;
    let mut s = String::with_capacity(5 * 3);
    for i in 0..5 {
        s.push(if i < filled { '★' } else { '☆' });
    }
    s
}

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
