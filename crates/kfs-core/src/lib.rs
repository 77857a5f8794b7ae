//! Shared types for turning Kalman fitter step logs into merged report grids.

pub mod config;
pub mod errors;
pub mod keys;
pub mod records;
pub mod serde;

pub use config::{ReportConfig, DEFAULT_MAX_SURFACES, DEFAULT_SENTINEL};
pub use errors::{ErrorInfo, KfsError};
pub use keys::{Slot, StepKey, SurfaceKey, TrackKey};
pub use records::{
    AnnotationStore, LogRecords, StepRecord, StepStore, SurfaceAnnotation, SurfaceSteps,
    TrackAnnotations, TrackSurfaces,
};
pub use self::serde::{stable_hash_string, to_canonical_json_bytes};
