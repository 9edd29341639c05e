//! Domain value types

pub mod audit;
pub mod credential;
pub mod exchange;
pub mod history;
pub mod operation;
pub mod target;
pub mod token;

pub use audit::*;
pub use credential::*;
pub use exchange::*;
pub use history::*;
pub use operation::*;
pub use target::*;
pub use token::*;
