//! Domain types for Mesa
//!
//! Shared by the engine (`mesa`), the core traits (`mesa-core`) and the
//! provider crates. Everything here is plain data plus the error taxonomy.

pub mod error;
pub mod favorite;
pub mod filter;
pub mod identity;
pub mod place;

pub use error::{AuthError, GatewayError, PersistenceError};
pub use favorite::Favorite;
pub use filter::{CuisineType, FilterSet, UnknownCuisine};
pub use identity::Identity;
pub use place::{
    DayTime, Geometry, LatLng, OpeningHours, OpeningPeriod, Place, PlacePhoto, PlaceReview,
    Viewport,
};
