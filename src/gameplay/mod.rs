//! Gameplay controllers that drive entity transforms.

pub mod patrol;

pub use patrol::{PatrolConfig, PatrolController, PatrolState};
