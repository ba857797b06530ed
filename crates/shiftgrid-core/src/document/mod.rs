//! Schedule document state and logic (UI-agnostic).

mod eval;
mod io;
mod ops;
mod state;

pub use io::{mode_for_type, type_for_mode};
pub use state::{Document, ValueCache};
