pub mod polyline;
pub mod sample;

pub use sample::CurveSample;
