pub mod config;
pub mod error;
pub mod storage;
pub mod traits;

pub use error::*;
pub use traits::*;
