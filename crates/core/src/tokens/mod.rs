//! Operator-facing token display

pub mod view;

pub use view::{UnmaskedToken, UnmaskedTokenView};
