use thiserror::Error;

/// Top-level error type for the ellifit engine.
#[derive(Debug, Error)]
pub enum EllifitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised while deriving curve geometry from a vertex sequence.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("closed curve needs at least {needed} vertices, got {got}")]
    TooFewVertices { needed: usize, got: usize },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("traversal order breaks down at vertex {index}: angles are not monotonic")]
    NonMonotonicAngles { index: usize },
}

/// Errors raised by the harmonic fit and the adaptive order search.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("harmonic order must be at least 1, got {0}")]
    InvalidOrder(usize),

    #[error("order {order} needs at least {needed} samples, segment has {got}")]
    InsufficientSamples {
        order: usize,
        needed: usize,
        got: usize,
    },

    #[error(
        "order search exhausted at J = {best_order} (Ea = {area_error:.4}, Em = {max_error:.4})"
    )]
    OrderSearchExhausted {
        /// Best order found before the ceiling, by smallest area error.
        best_order: usize,
        area_error: f64,
        max_error: f64,
    },

    #[error("numeric instability: {0}")]
    NumericInstability(String),
}

/// Errors raised while parsing vertex or coefficient files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, got {got} fields")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("missing field: {0}")]
    MissingField(&'static str),
}

/// Errors raised while resolving extraction targets from a scene selection.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no mesh or mesh transform specified")]
    NoMeshSelected,

    #[error("multiple meshes or mesh transforms specified ({0})")]
    MultipleMeshes(usize),

    #[error("no bone or bone transform specified")]
    NoBoneSelected,

    #[error("multiple bones or bone transforms specified ({0})")]
    MultipleBones(usize),

    #[error("no scene node named `{0}`")]
    NameNotFound(String),
}

/// Convenience type alias for results using [`EllifitError`].
pub type Result<T> = std::result::Result<T, EllifitError>;
