//! Properties of the time-series bucketing transform.

use sunergy::energy_data::{process_data, Period};

/// `count` hourly rows starting 2025-03-01T00:00, consumption = row index.
fn hourly_input(count: usize) -> String {
    let mut text = String::from("timestamp,consumption,generation\n");
    for i in 0..count {
        let day = 1 + i / 24;
        let hour = i % 24;
        text.push_str(&format!(
            "2025-03-{:02}T{:02}:00:00,{}.0,{}.5\n",
            day,
            hour,
            i + 1,
            i + 1
        ));
    }
    text
}

#[test]
fn test_hour_window_follows_the_literal_index_rule() {
    // For n=30 the rule `index > n - 24` admits 1-based rows 7..=30.
    let dataset = process_data(&hourly_input(30)).unwrap();

    assert_eq!(dataset.hour.len(), 24);
    // Row 7 carries hour-of-day 6 and consumption 7.0.
    assert_eq!(dataset.hour.labels[0], "6:00");
    assert_eq!(dataset.hour.consumption[0], 7.0);
    // Row 30 wraps into the next day at hour 5.
    assert_eq!(dataset.hour.labels[23], "5:00");
    assert_eq!(dataset.hour.consumption[23], 30.0);
}

#[test]
fn test_hour_window_takes_everything_when_short() {
    let dataset = process_data(&hourly_input(5)).unwrap();
    assert_eq!(dataset.hour.len(), 5);
    assert_eq!(dataset.hour.labels[0], "0:00");
}

#[test]
fn test_day_bucket_repeats_labels_without_dedup() {
    // Hourly cadence: the last 7 rows of a 30-row file all fall on the
    // same days, so weekday labels repeat point by point.
    let dataset = process_data(&hourly_input(30)).unwrap();

    assert_eq!(dataset.day.len(), 7);
    let distinct: std::collections::HashSet<&String> = dataset.day.labels.iter().collect();
    assert!(distinct.len() < dataset.day.len());
}

#[test]
fn test_week_bucket_keeps_first_reading_per_label() {
    let raw = "timestamp,consumption,generation\n\
               2025-07-01T08:00:00,11.0,1.0\n\
               2025-07-02T08:00:00,99.0,9.0\n\
               2025-07-08T08:00:00,22.0,2.0\n";
    let dataset = process_data(raw).unwrap();

    assert_eq!(dataset.week.labels, vec!["W1", "W2"]);
    assert_eq!(dataset.week.consumption, vec![11.0, 22.0]);
    assert_eq!(dataset.week.generation, vec![1.0, 2.0]);
}

#[test]
fn test_month_bucket_has_one_entry_per_distinct_month() {
    let raw = "timestamp,consumption,generation\n\
               2025-01-05T00:00:00,1.0,0.1\n\
               2025-01-20T00:00:00,2.0,0.2\n\
               2025-02-03T00:00:00,3.0,0.3\n\
               2025-02-28T00:00:00,4.0,0.4\n\
               2025-03-01T00:00:00,5.0,0.5\n";
    let dataset = process_data(raw).unwrap();

    assert_eq!(dataset.month.labels, vec!["Jan", "Feb", "Mar"]);
    // First reading per month wins; later ones are dropped, not averaged.
    assert_eq!(dataset.month.consumption, vec![1.0, 3.0, 5.0]);
    assert_eq!(dataset.month.generation, vec![0.1, 0.3, 0.5]);
}

#[test]
fn test_month_bucket_scans_beyond_the_windowed_range() {
    // 60 daily rows: the hour/day/week windows only see the tail, but the
    // month bucket still records the first month.
    let mut raw = String::from("timestamp,consumption,generation\n");
    for i in 0..60u32 {
        let month = 4 + i / 30;
        let day = 1 + i % 30;
        raw.push_str(&format!("2025-{:02}-{:02}T12:00:00,{}.0,0.0\n", month, day, i + 1));
    }
    let dataset = process_data(&raw).unwrap();

    assert_eq!(dataset.month.labels, vec!["Apr", "May"]);
    assert_eq!(dataset.month.consumption[0], 1.0);
}

#[test]
fn test_all_series_keep_labels_and_readings_in_lock_step() {
    let dataset = process_data(&hourly_input(100)).unwrap();
    for period in Period::ALL {
        let series = dataset.series(period);
        assert_eq!(series.labels.len(), series.consumption.len());
        assert_eq!(series.labels.len(), series.generation.len());
    }
}
