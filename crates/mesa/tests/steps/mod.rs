pub mod favorites_steps;
pub mod search_steps;

use mesa_api::{LatLng, Place};

pub fn place(id: &str) -> Place {
    Place::new(id, id.replace('-', " "), "Ciudad de México", LatLng::new(19.43, -99.13))
        .with_types(["restaurant", "food"])
}
