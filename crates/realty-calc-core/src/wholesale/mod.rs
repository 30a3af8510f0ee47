pub mod analysis;
pub mod exit;
pub mod rehab;
