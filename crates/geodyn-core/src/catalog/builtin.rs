//! Built-in frames and datum transformations.
//!
//! Helmert values: IERS ITRF2020 -> ITRF2014 (epoch 2015.0) and NRCan
//! ITRF2014 -> NAD83(CSRS) (epoch 2010.0).

use crate::models::{HelmertParams, HelmertTransform, RotationConvention};
use crate::types::{CoordinateSystem, Ellipsoid, Epoch, FrameDescriptor, ModelRef, ProjectionMethod};

pub(super) fn frames() -> Vec<FrameDescriptor> {
    let itrf2014_epoch = Epoch::from_decimal_year(2010.0);
    let itrf2020_epoch = Epoch::from_decimal_year(2015.0);
    vec![
        FrameDescriptor::new_dynamic(
            "EPSG:7912",
            "ITRF2014",
            Ellipsoid::Grs80,
            CoordinateSystem::Geographic3d,
            itrf2014_epoch,
            Some(ModelRef::from("ITRF2014-VG")),
        )
        .with_name("ITRF2014"),
        FrameDescriptor::new_dynamic(
            "EPSG:7789",
            "ITRF2014",
            Ellipsoid::Grs80,
            CoordinateSystem::Geocentric,
            itrf2014_epoch,
            Some(ModelRef::from("ITRF2014-VG")),
        )
        .with_name("ITRF2014 (geocentric)"),
        FrameDescriptor::new_dynamic(
            "EPSG:9989",
            "ITRF2020",
            Ellipsoid::Grs80,
            CoordinateSystem::Geographic3d,
            itrf2020_epoch,
            Some(ModelRef::from("ITRF2020-VG")),
        )
        .with_name("ITRF2020"),
        FrameDescriptor::new_dynamic(
            "EPSG:8255",
            "NAD83(CSRS)v7",
            Ellipsoid::Grs80,
            CoordinateSystem::Geographic3d,
            Epoch::from_decimal_year(2010.0),
            Some(ModelRef::from("NAD83CSRS-VG")),
        )
        .with_name("NAD83(CSRS)v7"),
        FrameDescriptor::new_static(
            "EPSG:4326",
            "WGS84",
            Ellipsoid::Wgs84,
            CoordinateSystem::Geographic2d,
        )
        .with_name("WGS 84"),
        FrameDescriptor::new_static(
            "EPSG:4979",
            "WGS84",
            Ellipsoid::Wgs84,
            CoordinateSystem::Geographic3d,
        )
        .with_name("WGS 84 (3D)"),
        FrameDescriptor::new_static(
            "EPSG:3857",
            "WGS84",
            Ellipsoid::Wgs84,
            CoordinateSystem::Projected(ProjectionMethod::WebMercator),
        )
        .with_name("WGS 84 / Pseudo-Mercator"),
    ]
}

pub(super) fn datum_shifts() -> Vec<HelmertTransform> {
    vec![
        HelmertTransform::new(
            "ITRF2020",
            "ITRF2014",
            HelmertParams {
                tx: -0.0014,
                ty: -0.0009,
                tz: 0.0014,
                scale: -0.42,
                ..Default::default()
            },
        )
        .with_rates(
            HelmertParams {
                ty: -0.0001,
                tz: 0.0002,
                ..Default::default()
            },
            Epoch::from_decimal_year(2015.0),
        )
        .with_accuracy(0.003)
        .with_name("ITRF2020 to ITRF2014 (IERS)"),
        HelmertTransform::new(
            "ITRF2014",
            "NAD83(CSRS)v7",
            HelmertParams {
                tx: 1.0053,
                ty: -1.9092,
                tz: -0.5416,
                rx: -26.7814,
                ry: 0.4203,
                rz: -10.9321,
                scale: 0.37,
            },
        )
        .with_rates(
            HelmertParams {
                tx: 0.0008,
                ty: -0.0006,
                tz: -0.0014,
                rx: -0.0667,
                ry: 0.7574,
                rz: 0.0513,
                scale: -0.07,
            },
            Epoch::from_decimal_year(2010.0),
        )
        .with_convention(RotationConvention::CoordinateFrame)
        .with_accuracy(0.01)
        .with_name("ITRF2014 to NAD83(CSRS)v7 (NRCan)"),
        HelmertTransform::null("WGS84", "ITRF2014")
            .with_accuracy(1.0)
            .with_name("WGS 84 to ITRF2014 (null)"),
    ]
}
