use obstacle_mapper::common::types::{DetectionSample, PoseSample};
use obstacle_mapper::config::MapperConfig;
use obstacle_mapper::estimation::ObstacleMapper;
use obstacle_mapper::telemetry::TelemetryBatch;

fn main() {
    println!("Running obstacle mapper on a sample batch...");

    // A short drive north with one "no fix" sample and two readings
    let batch = TelemetryBatch {
        poses: vec![
            PoseSample { latitude: 0.0, longitude: 0.0, heading: 0.0 },
            PoseSample { latitude: 12.97160, longitude: 77.59460, heading: 0.0 },
            PoseSample { latitude: 12.97165, longitude: 77.59460, heading: 2.0 },
            PoseSample { latitude: 12.97170, longitude: 77.59461, heading: 5.0 },
        ],
        detections: vec![
            DetectionSample { latitude: 12.97165, longitude: 77.59460, heading: 90.0, range: 25.0 },
            DetectionSample { latitude: 12.97170, longitude: 77.59461, heading: 275.0, range: 18.0 },
        ],
    };

    let mapper = ObstacleMapper::new(MapperConfig::new());
    let report = match mapper.run(batch) {
        Ok(report) => report,
        Err(e) => {
            println!("Estimation failed: {}", e);
            return;
        }
    };

    println!("Zone: {}", report.zone);
    println!("Origin: ({:.3}, {:.3})", report.origin.easting, report.origin.northing);

    for (point, heading) in report.relative_path.iter().zip(&report.path_headings) {
        println!(
            "Path: easting={:.3}, northing={:.3}, heading={:.1}",
            point.easting, point.northing, heading
        );
    }

    for obstacle in &report.relative_obstacles {
        println!(
            "Obstacle: easting={:.3}, northing={:.3}, heading={:.1}, distance={}",
            obstacle.position.easting, obstacle.position.northing, obstacle.heading, obstacle.range
        );
    }

    println!("Dropped {} samples without fix", report.no_fix);
}
