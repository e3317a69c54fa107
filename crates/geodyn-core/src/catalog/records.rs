//! Serialized catalog records and their validation into descriptors.

use serde::{Deserialize, Serialize};

use crate::errors::GeodynError;
use crate::models::HelmertTransform;
use crate::types::{CoordinateSystem, Ellipsoid, Epoch, FrameDescriptor, FrameId, FrameKind, ModelRef};

/// Flat, serializable form of a frame as it appears in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Defaults to the frame's own id.
    #[serde(default)]
    pub datum: Option<String>,
    pub ellipsoid: Ellipsoid,
    pub coordinate_system: CoordinateSystem,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub reference_epoch: Option<f64>,
    #[serde(default)]
    pub deformation_model: Option<String>,
}

/// A whole catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub frames: Vec<FrameRecord>,
    pub datum_shifts: Vec<HelmertTransform>,
}

impl TryFrom<FrameRecord> for FrameDescriptor {
    type Error = GeodynError;

    fn try_from(record: FrameRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: &str| GeodynError::InvalidFrame {
            id: record.id.clone(),
            reason: reason.to_string(),
        };

        let kind = if record.dynamic {
            let epoch = record
                .reference_epoch
                .ok_or_else(|| invalid("dynamic frame requires a reference epoch"))?;
            if !epoch.is_finite() {
                return Err(invalid("reference epoch must be finite"));
            }
            FrameKind::Dynamic {
                reference_epoch: Epoch::from_decimal_year(epoch),
                deformation_model: record.deformation_model.clone().map(ModelRef::from),
            }
        } else {
            if record.reference_epoch.is_some() {
                return Err(invalid("static frame cannot carry a reference epoch"));
            }
            if record.deformation_model.is_some() {
                return Err(invalid("static frame cannot carry a deformation model"));
            }
            FrameKind::Static
        };

        let id = FrameId::from(record.id.as_str());
        Ok(FrameDescriptor {
            name: record.name.clone().unwrap_or_else(|| record.id.clone()),
            datum: record.datum.clone().map(FrameId::from).unwrap_or_else(|| id.clone()),
            id,
            kind,
            ellipsoid: record.ellipsoid,
            coordinate_system: record.coordinate_system,
        })
    }
}
