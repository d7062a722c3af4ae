//! Tests for ct-output.

use ct_core::{GeoPoint, LaneId, SimPosition, VehicleId};
use ct_engine::VehicleObservation;
use ct_track::LaneState;

fn observation(vehicle: &str, lane: &str, speed_mps: f64) -> VehicleObservation {
    VehicleObservation {
        vehicle:   VehicleId::from(vehicle),
        position:  SimPosition::new(10.0, 20.5),
        speed_mps,
        road:      "e1".into(),
        lane:      LaneId::from(lane),
    }
}

fn lane(count: u64, status: u8) -> LaneState {
    LaneState { count, status }
}

#[cfg(test)]
mod recorder_tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::{TIMESTAMP_FORMAT, TelemetryRecorder, speed_kmh};

    #[test]
    fn speed_converted_and_rounded() {
        assert_eq!(speed_kmh(10.0), 36.0);
        assert_eq!(speed_kmh(13.8889), 50.0);
        assert_eq!(speed_kmh(1.23456), 4.44);
        assert_eq!(speed_kmh(0.0), 0.0);
    }

    #[test]
    fn one_record_per_vehicle_per_step() {
        let mut rec = TelemetryRecorder::new();
        // step 1: two vehicles, step 2: one, step 3: three
        let active = [2usize, 1, 3];
        for (step, &n) in active.iter().enumerate() {
            for i in 0..n {
                rec.record(step as f64, &observation(&format!("v{i}"), "e1_0", 1.0), GeoPoint::default(), lane(1, 0));
            }
            rec.end_step();
        }
        assert_eq!(rec.record_count(), 6);
        assert_eq!(rec.steps(), 3);
    }

    #[test]
    fn record_captures_lane_state_and_geo() {
        let mut rec = TelemetryRecorder::new();
        rec.record(4.0, &observation("v1", "e1_0", 5.0), GeoPoint::new(-88.0, 30.7), lane(1200, 1));
        let r = &rec.records()[0];
        assert_eq!(r.sim_time, 4.0);
        assert_eq!(r.vehicle.as_str(), "v1");
        assert_eq!(r.speed_kmh, 18.0);
        assert_eq!((r.lane_count, r.lane_status), (1200, 1));
        assert_eq!(r.geo, GeoPoint::new(-88.0, 30.7));
    }

    #[test]
    fn record_stamps_wall_clock_time() {
        let mut rec = TelemetryRecorder::new();
        rec.record(4.0, &observation("v1", "e1_0", 5.0), GeoPoint::default(), lane(1, 0));
        let stamp = &rec.records()[0].timestamp;
        assert_eq!(stamp.len(), "2024-01-15 12:00:00".len());
        assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn finalize_stamps_average_on_every_row() {
        let mut rec = TelemetryRecorder::new();
        rec.record(1.0, &observation("a", "l", 1.0), GeoPoint::default(), lane(1, 0));
        rec.record(1.0, &observation("b", "l", 1.0), GeoPoint::default(), lane(2, 0));
        let table = rec.finalize(15.5);
        assert_eq!(table.len(), 2);
        assert_eq!(table.average_dwell(), 15.5);
        assert!(table.rows().iter().all(|r| r.avg_dwell_secs == 15.5));
    }

    #[test]
    fn empty_phase_gives_empty_table() {
        let table = TelemetryRecorder::new().finalize(0.0);
        assert!(table.is_empty());
    }
}

#[cfg(test)]
mod timestamp_tests {
    use chrono::{TimeZone, Utc};

    use crate::format_timestamp;

    #[test]
    fn eastern_standard_time() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-01-15 12:00:00");
    }

    #[test]
    fn eastern_daylight_time() {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 16, 30, 5).unwrap();
        assert_eq!(format_timestamp(at), "2024-07-01 12:30:05");
    }

    #[test]
    fn date_rolls_back_across_midnight() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 2, 15, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-02-29 21:15:00");
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;
    use crate::writer::OutputWriter;
    use crate::{COLUMNS, CsvWriter, TelemetryRecorder, export_csv};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn headers_correct() {
        let dir = tmp();
        let path = dir.path().join("output1.csv");
        let mut w = CsvWriter::create(&path).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, COLUMNS);
    }

    #[test]
    fn exported_rows_read_back() {
        let dir = tmp();
        let path = dir.path().join("output1.csv");
        let mut rec = TelemetryRecorder::new();
        let stamp = || "2024-07-01 12:30:05".to_owned();
        rec.record_at(stamp(), 3.0, &observation("veh0", "e1_0", 10.0), GeoPoint::new(-88.5, 30.25), lane(7, 0));
        rec.record_at(stamp(), 4.0, &observation("veh0", "e1_1", 0.0), GeoPoint::new(-88.5, 30.25), lane(1000, 1));
        export_csv(&path, &rec.finalize(15.5)).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "2024-07-01 12:30:05");
        assert_eq!(&rows[0][1], "veh0");
        assert_eq!(&rows[0][2], "[10, 20.5]");
        assert_eq!(&rows[0][3], "[-88.5, 30.25]");
        assert_eq!(&rows[0][4], "36");
        assert_eq!(&rows[0][5], "e1");
        assert_eq!(&rows[0][6], "e1_0");
        assert_eq!(&rows[1][7], "1");
        assert_eq!(&rows[1][8], "1000");
        assert_eq!(&rows[1][9], "15.5");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::create(&dir.path().join("o.csv")).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_error() {
        let dir = tmp();
        let path = dir.path().join("no/such/dir/o.csv");
        assert!(CsvWriter::create(&path).is_err());
    }
}
