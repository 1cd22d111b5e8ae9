pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{NumError, Result};
pub use tolerance::Tolerance;
