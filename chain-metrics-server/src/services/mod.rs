mod health;
mod series;
mod snapshots;

pub use health::health;
pub use series::normalize;
pub use snapshots::{list as list_snapshots, record as record_snapshot, trend};
