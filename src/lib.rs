pub mod diagnostics;
pub mod error;
pub mod fitting;
pub mod geometry;
pub mod io;
pub mod math;
pub mod resolve;
pub mod segmentation;

pub use error::{EllifitError, Result};
