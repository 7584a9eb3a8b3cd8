pub mod drain;
pub mod enqueue;
pub mod reconcile;
pub mod status;
