//! Geodetic value types shared by every crate.

pub mod accuracy;
pub mod coordinate;
pub mod ellipsoid;
pub mod epoch;
pub mod frame;
pub mod identifiers;

pub use accuracy::AccuracyClass;
pub use coordinate::{Coordinate, CoordinateSystem, Geodetic, ProjectionMethod};
pub use ellipsoid::Ellipsoid;
pub use epoch::{Epoch, EpochRequest};
pub use frame::{FrameDescriptor, FrameKind};
pub use identifiers::{FrameId, ModelRef};
