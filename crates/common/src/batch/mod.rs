// Edit batches: compilation from extracted elements and local simulation.

pub mod compile;
pub mod simulate;

pub use compile::{compile, BODY_START};
pub use simulate::{BatchError, BodyModel, EditError};
