pub mod points;
pub mod snapshots;
