//! Motion primitives for batch viewpoint evaluation.

mod library;

pub use library::{
    ControlAction, MotionPrimitive, PrimitiveLibrary, PrimitiveLibraryConfig, PrimitiveState,
};
