pub mod travel;

pub use travel::{EventType, TravelRecord};
