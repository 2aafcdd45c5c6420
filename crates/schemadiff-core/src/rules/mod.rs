pub mod integrity;
pub mod invariants;

pub use integrity::check_snapshot;
