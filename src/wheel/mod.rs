//! Wheel Selection Engine
//!
//! Two components, consumed in dependency order:
//! - segments: partitions the choice list into equal arcs and maps angles
//!   back to segments
//! - spin: drives the randomized, eased rotation and resolves the winner
//!   against the same pointer convention the renderer uses
//!
//! The engine is single-threaded and caller-driven: the presentation layer
//! calls `SpinController::tick` with a monotonic millisecond clock and reads
//! `SpinState` snapshots back. The controller owns no timers, so dropping it
//! mid-spin abandons the spin without ever publishing a winner.

pub mod segments;
pub mod spin;

pub use segments::{Segment, WheelLayout, POINTER_ANGLE};
pub use spin::{Phase, SpinController, SpinState, SpinTuning};
