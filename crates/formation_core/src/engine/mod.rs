// Assignment engine: move descriptors and the pure transitions over them

pub mod assignment;
pub mod moves;

pub use assignment::apply_move;
pub use moves::{MoveDescriptor, MoveOutcome};
