// notemaker-common: shared types and pure pipeline stages for Note Maker

pub mod batch;
pub mod extract;
pub mod types;
