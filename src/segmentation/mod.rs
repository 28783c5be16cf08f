pub mod assembler;
pub mod segment;

pub use assembler::{
    fit_composite, fit_curve, fit_fragment, fit_single_piece, fit_symmetric, form_vertices,
    CompositeFit, CurveFit, FitResult, OrderChoice, SegmentOutcome, SegmentationMode,
};
pub use segment::Segment;
