pub mod harmonic;
pub mod order;

pub use harmonic::{fit_harmonics, mean_radius, HarmonicModel};
pub use order::{find_order, FitTolerance, MAX_HARMONIC_ORDER};
