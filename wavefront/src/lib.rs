pub mod error;
pub mod find;
pub mod grid;
pub mod util;

pub use error::*;
pub use find::*;
pub use grid::*;
