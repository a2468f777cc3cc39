//! End-to-end refresh-cycle tests: ingest, evaluation, snapshot publishing.

use time::OffsetDateTime;

use roomsense_store::{HistoryBatch, LiveReading, SensorStore};
use roomsense_types::{Room, Sample, SensorKind, Value};

fn ts(secs: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000 + secs).unwrap()
}

fn rooms() -> Vec<Room> {
    vec![
        Room::new("Conference-Space", "multisensor_115", 67.392),
        Room::new("Focus-Space", "multisensor_109", 162.24),
        Room::new("Hallway", "multisensor_112", 0.0),
    ]
}

fn live(entity: &str, kind: SensorKind, value: f64) -> LiveReading {
    LiveReading {
        entity_id: entity.to_string(),
        kind,
        value: Value::Known(value),
    }
}

fn ramp(entity: &str, kind: SensorKind, start: f64, step: f64, n: i64) -> HistoryBatch {
    HistoryBatch {
        entity_id: entity.to_string(),
        kind,
        samples: (0..n)
            .map(|i| Sample::new(start + step * i as f64, ts(i * 600)))
            .collect(),
    }
}

#[tokio::test]
async fn degenerate_sensor_does_not_block_the_tick() {
    let store = SensorStore::new(rooms());
    let now = ts(3600);

    // One sensor's history collapses onto a single instant (undefined fit);
    // a healthy sensor in another room must still be fully evaluated.
    let collapsed = HistoryBatch {
        entity_id: "multisensor_115".to_string(),
        kind: SensorKind::Iaq,
        samples: vec![Sample::new(80.0, ts(0)), Sample::new(90.0, ts(0))],
    };

    store
        .refresh(
            vec![
                live("multisensor_115", SensorKind::Iaq, 85.0),
                live("multisensor_109", SensorKind::NoiseLevel, 95.0),
            ],
            vec![
                collapsed,
                ramp("multisensor_109", SensorKind::NoiseLevel, 40.0, 5.0, 6),
            ],
            now,
        )
        .await;

    let snap = store.snapshot();

    // The degenerate sensor keeps its current-value evaluation
    let iaq = snap
        .room("multisensor_115")
        .unwrap()
        .sensor(SensorKind::Iaq)
        .unwrap();
    assert_eq!(iaq.current, Value::Known(85.0));
    assert!(iaq.warnings.is_empty());

    // The healthy sensor elsewhere produced its warning
    let noise = snap
        .room("multisensor_109")
        .unwrap()
        .sensor(SensorKind::NoiseLevel)
        .unwrap();
    assert_eq!(
        noise.warnings,
        vec![
            "Noise levels are high. Consider reducing the noise or moving to a quieter space."
                .to_string()
        ]
    );
}

#[tokio::test]
async fn occupancy_estimates_flow_into_warnings() {
    let store = SensorStore::new(rooms());
    let now = ts(0);

    // CO2 high enough that the estimated headcount itself breaches the
    // occupancy comfort bound: surplus 3450 ppm in 67.392 m³ is
    // round(232.5 / 18) = 13 people
    store
        .refresh(
            vec![live("multisensor_115", SensorKind::Co2, 4000.0)],
            Vec::new(),
            now,
        )
        .await;

    let snap = store.snapshot();
    let room = snap.room("Conference-Space").unwrap();
    assert_eq!(room.current(SensorKind::Occupancy), Value::Known(13.0));

    let occupancy = room.sensor(SensorKind::Occupancy).unwrap();
    assert_eq!(
        occupancy.warnings,
        vec!["Too many people in the room. Consider moving to a less crowded room.".to_string()]
    );
}

#[tokio::test]
async fn partial_data_leaves_other_rooms_untouched() {
    let store = SensorStore::new(rooms());

    store
        .refresh(
            vec![live("multisensor_115", SensorKind::Temperature, 24.0)],
            Vec::new(),
            ts(0),
        )
        .await;

    let snap = store.snapshot();
    // Rooms without data this tick still appear, with unknown currents
    let untouched = snap.room("Focus-Space").unwrap();
    assert_eq!(untouched.current(SensorKind::Temperature), Value::Unknown);
    assert_eq!(
        untouched
            .sensor(SensorKind::Temperature)
            .unwrap()
            .warnings
            .len(),
        0
    );
    // Unknown values never warn
    assert_eq!(untouched.current(SensorKind::Occupancy), Value::Known(0.0));
}

#[tokio::test]
async fn synthetic_fallback_looks_like_a_normal_refresh() {
    let store = SensorStore::new(rooms());
    let noon = OffsetDateTime::from_unix_timestamp(1_700_049_600).unwrap();

    store.refresh_synthetic(noon).await;

    let snap = store.snapshot();
    assert_eq!(snap.taken_at, noon);
    for room in &snap.rooms {
        // Every channel is populated the way a real tick would leave it
        for kind in SensorKind::ALL {
            let state = room.sensor(kind).unwrap();
            assert!(state.current.is_known());
            assert_eq!(state.history.len(), 24);
        }
        // Occupancy was recomputed from the synthetic CO2, not left at the
        // generator's raw value, for rooms that have a volume
        let people = room.current(SensorKind::Occupancy).as_f64().unwrap();
        assert!(people >= 0.0);
        assert_eq!(people.fract(), 0.0);
    }
}

#[tokio::test]
async fn repeated_refreshes_replace_history_not_append() {
    let store = SensorStore::new(rooms());

    store
        .refresh(
            Vec::new(),
            vec![ramp("multisensor_115", SensorKind::Co2, 500.0, 10.0, 4)],
            ts(2400),
        )
        .await;
    store
        .refresh(
            Vec::new(),
            vec![ramp("multisensor_115", SensorKind::Co2, 500.0, 10.0, 6)],
            ts(3600),
        )
        .await;

    let snap = store.snapshot();
    let co2 = snap
        .room("multisensor_115")
        .unwrap()
        .sensor(SensorKind::Co2)
        .unwrap();
    // The sources re-deliver the full day each tick; the series must not
    // double up
    assert_eq!(co2.history.len(), 6);
}
