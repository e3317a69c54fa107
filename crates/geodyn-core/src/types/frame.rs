//! Frame descriptors: static vs. dynamic reference frames.

use serde::{Deserialize, Serialize};

use super::coordinate::CoordinateSystem;
use super::ellipsoid::Ellipsoid;
use super::epoch::Epoch;
use super::identifiers::{FrameId, ModelRef};

/// Static or dynamic, with dynamic-only data carried inside the variant so a
/// static frame cannot hold an epoch or a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameKind {
    Static,
    Dynamic {
        /// Epoch at which published coordinates need no propagation.
        reference_epoch: Epoch,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deformation_model: Option<ModelRef>,
    },
}

/// In-memory description of a reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDescriptor {
    pub id: FrameId,
    pub name: String,
    pub kind: FrameKind,
    /// Geodetic realization the frame's coordinates refer to. Frames sharing
    /// a datum (e.g. geographic and projected views of WGS 84) differ only by
    /// conversions, never by a datum shift.
    pub datum: FrameId,
    pub ellipsoid: Ellipsoid,
    pub coordinate_system: CoordinateSystem,
}

impl FrameDescriptor {
    pub fn new_static(
        id: impl Into<FrameId>,
        datum: impl Into<FrameId>,
        ellipsoid: Ellipsoid,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            kind: FrameKind::Static,
            datum: datum.into(),
            ellipsoid,
            coordinate_system,
        }
    }

    pub fn new_dynamic(
        id: impl Into<FrameId>,
        datum: impl Into<FrameId>,
        ellipsoid: Ellipsoid,
        coordinate_system: CoordinateSystem,
        reference_epoch: Epoch,
        deformation_model: Option<ModelRef>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            kind: FrameKind::Dynamic {
                reference_epoch,
                deformation_model,
            },
            datum: datum.into(),
            ellipsoid,
            coordinate_system,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, FrameKind::Dynamic { .. })
    }

    pub fn reference_epoch(&self) -> Option<Epoch> {
        match &self.kind {
            FrameKind::Static => None,
            FrameKind::Dynamic {
                reference_epoch, ..
            } => Some(*reference_epoch),
        }
    }

    pub fn deformation_model(&self) -> Option<&ModelRef> {
        match &self.kind {
            FrameKind::Static => None,
            FrameKind::Dynamic {
                deformation_model, ..
            } => deformation_model.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_frames_expose_no_epoch_or_model() {
        let f = FrameDescriptor::new_static(
            "EPSG:4326",
            "WGS84",
            Ellipsoid::Wgs84,
            CoordinateSystem::Geographic2d,
        );
        assert!(!f.is_dynamic());
        assert_eq!(f.reference_epoch(), None);
        assert_eq!(f.deformation_model(), None);
    }

    #[test]
    fn dynamic_frames_expose_epoch_and_model() {
        let f = FrameDescriptor::new_dynamic(
            "EPSG:8255",
            "NAD83(CSRS)v7",
            Ellipsoid::Grs80,
            CoordinateSystem::Geographic3d,
            Epoch::from_decimal_year(2010.0),
            Some(ModelRef::from("NAD83CSRS-VG")),
        )
        .with_name("NAD83(CSRS)v7");
        assert!(f.is_dynamic());
        assert_eq!(f.reference_epoch(), Some(Epoch::from_decimal_year(2010.0)));
        assert_eq!(f.deformation_model().map(ModelRef::as_str), Some("NAD83CSRS-VG"));
        assert_eq!(f.name, "NAD83(CSRS)v7");
    }
}
