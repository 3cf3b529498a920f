//! Small shared helpers: colors, vectors, export and timing.
pub mod color;
pub mod exporter;
pub mod profiler;
pub mod vector;
