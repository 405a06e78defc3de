//! CSV persistence of samples and estimation results

use crate::common::types::{DetectionSample, EstimatedObstacle, PlanarPoint, PoseSample};
use crate::error::StoreError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct PoseRow {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Heading")]
    heading: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct DetectionRow {
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Heading")]
    heading: f64,
    #[serde(rename = "Distance")]
    distance: f64,
}

#[derive(Debug, Serialize)]
struct PathRow {
    easting: f64,
    northing: f64,
    heading: f64,
}

#[derive(Debug, Serialize)]
struct EstimateRow {
    easting: f64,
    northing: f64,
    heading: f64,
    distance: f64,
}

const POSE_HEADER: [&str; 3] = ["Latitude", "Longitude", "Heading"];
const DETECTION_HEADER: [&str; 4] = ["Latitude", "Longitude", "Heading", "Distance"];
const PATH_HEADER: [&str; 3] = ["Easting (m)", "Northing (m)", "Heading (°)"];
const ESTIMATE_HEADER: [&str; 4] = ["Easting (m)", "Northing (m)", "Heading (°)", "Distance (cm)"];

/// Write `header` then one record per row. The header is written even when
/// there are no rows.
fn write_rows<P, T, I>(path: P, header: &[&str], rows: I) -> Result<(), StoreError>
where
    P: AsRef<Path>,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write pose samples as `Latitude,Longitude,Heading`
pub fn write_poses<P: AsRef<Path>>(path: P, poses: &[PoseSample]) -> Result<(), StoreError> {
    write_rows(
        path,
        &POSE_HEADER,
        poses.iter().map(|p| PoseRow {
            latitude: p.latitude,
            longitude: p.longitude,
            heading: p.heading,
        }),
    )
}

pub fn read_poses<P: AsRef<Path>>(path: P) -> Result<Vec<PoseSample>, StoreError> {
    let rows: Vec<PoseRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|r| PoseSample {
            latitude: r.latitude,
            longitude: r.longitude,
            heading: r.heading,
        })
        .collect())
}

/// Write detection samples as `Latitude,Longitude,Heading,Distance`
pub fn write_detections<P: AsRef<Path>>(
    path: P,
    detections: &[DetectionSample],
) -> Result<(), StoreError> {
    write_rows(
        path,
        &DETECTION_HEADER,
        detections.iter().map(|d| DetectionRow {
            latitude: d.latitude,
            longitude: d.longitude,
            heading: d.heading,
            distance: d.range,
        }),
    )
}

pub fn read_detections<P: AsRef<Path>>(path: P) -> Result<Vec<DetectionSample>, StoreError> {
    let rows: Vec<DetectionRow> = read_rows(path)?;
    Ok(rows
        .into_iter()
        .map(|r| DetectionSample {
            latitude: r.latitude,
            longitude: r.longitude,
            heading: r.heading,
            range: r.distance,
        })
        .collect())
}

/// Write a path series with its math-convention headings
pub fn write_path<P: AsRef<Path>>(
    path: P,
    points: &[PlanarPoint],
    headings: &[f64],
) -> Result<(), StoreError> {
    write_rows(
        path,
        &PATH_HEADER,
        points.iter().zip(headings).map(|(p, &heading)| PathRow {
            easting: p.easting,
            northing: p.northing,
            heading,
        }),
    )
}

/// Write estimated obstacles as `Easting (m),Northing (m),Heading (°),Distance (cm)`
pub fn write_estimates<P: AsRef<Path>>(
    path: P,
    obstacles: &[EstimatedObstacle],
) -> Result<(), StoreError> {
    write_rows(
        path,
        &ESTIMATE_HEADER,
        obstacles.iter().map(|o| EstimateRow {
            easting: o.position.easting,
            northing: o.position.northing,
            heading: o.heading,
            distance: o.range,
        }),
    )
}
