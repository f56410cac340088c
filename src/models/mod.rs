pub mod station;
pub mod temperature;

pub use station::{StationStats, StationSummary};
pub use temperature::{decode_temperature, format_x10, x10_to_celsius};
