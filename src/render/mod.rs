//! Rendering module
//!
//! The frame loop draws through the `Canvas`/`SurfaceProvider` traits, so the
//! platform layer only has to supply a back buffer. `RecordingSurface` is
//! the headless implementation used by the demo binary and the tests.

pub mod fps;
pub mod frame;
pub mod map;
pub mod surface;

pub use fps::FpsHistory;
pub use frame::{FrameReport, GameFrame};
pub use map::Map;
pub use surface::{Canvas, CommandList, DrawCommand, RecordingSurface, SurfaceProvider, TextStyle};
