//! The selection and navigation engine.

mod actions;
mod keyboard;
mod reducer;

pub use actions::Action;
pub use keyboard::{Key, KeyEvent, KeyboardModifiers};
pub use reducer::{ReduceContext, reduce};
