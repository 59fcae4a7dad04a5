pub mod cost;
pub mod emissions;
pub mod irradiance;
pub mod lifecycle;
pub mod pv_yield;
pub mod seasonal;
pub mod sizing;
pub mod units;
