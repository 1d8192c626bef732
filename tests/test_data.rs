use demand_forecast::data::{DataLoader, DemandRecord, DemandSeries};
use demand_forecast::error::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_series_sorted_by_calendar_month() {
    let records = vec![
        DemandRecord::new("QUINOA", 2023, 5, 120.0),
        DemandRecord::new("QUINOA", 2022, 11, 90.0),
        DemandRecord::new("QUINOA", 2023, 1, 100.0),
        DemandRecord::new("QUINOA", 2022, 12, 95.0),
    ];

    let series = DemandSeries::from_records(&records).unwrap();

    assert_eq!(series.len(), 4);
    assert_eq!(series.values(), vec![90.0, 95.0, 100.0, 120.0]);

    let dates = series.dates();
    for window in dates.windows(2) {
        assert!(window[0] < window[1]);
    }
    // Every point lands on the first of its month
    assert!(series.points().iter().all(|(date, _)| {
        use chrono::Datelike;
        date.day() == 1
    }));
}

#[test]
fn test_series_keeps_duplicate_months() {
    let records = vec![
        DemandRecord::new("RICE", 2023, 3, 50.0),
        DemandRecord::new("RICE", 2023, 2, 40.0),
        DemandRecord::new("RICE", 2023, 3, 55.0),
    ];

    let series = DemandSeries::from_records(&records).unwrap();

    // Both March rows survive, in input order, after the February row
    assert_eq!(series.len(), 3);
    assert_eq!(series.values(), vec![40.0, 50.0, 55.0]);
    assert_eq!(series.dates()[1], series.dates()[2]);
}

#[test]
fn test_series_empty_input() {
    let series = DemandSeries::from_records(&[]).unwrap();
    assert!(series.is_empty());
    assert_eq!(series.len(), 0);
    assert!(series.last_date().is_none());
    assert!(series.mean().is_err());
}

#[test]
fn test_series_rejects_invalid_month() {
    let records = vec![DemandRecord::new("RICE", 2023, 13, 50.0)];
    let result = DemandSeries::from_records(&records);

    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_series_statistics() {
    let records: Vec<DemandRecord> = (1..=4)
        .map(|m| DemandRecord::new("RICE", 2023, m, m as f64 * 10.0))
        .collect();
    let series = DemandSeries::from_records(&records).unwrap();

    assert_eq!(series.mean().unwrap(), 25.0);
    let std_dev = series.std_dev().unwrap();
    assert!(std_dev > 12.0 && std_dev < 13.0);
}

#[test]
fn test_loader_normalizes_headers() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, " product ,YEAR, month ,DEMAND (TN)").unwrap();
    writeln!(file, " quinoa ,2023,1,100.5").unwrap();
    writeln!(file, "rice,2023,2,80.25").unwrap();

    let records = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].product, "QUINOA");
    assert_eq!(records[0].year, 2023);
    assert_eq!(records[0].month, 1);
    assert_eq!(records[0].demand, 100.5);
    assert_eq!(records[1].product, "RICE");
}

#[test]
fn test_loader_drops_invalid_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "PRODUCT,YEAR,MONTH,DEMAND").unwrap();
    writeln!(file, "QUINOA,2023,1,100.0").unwrap();
    writeln!(file, "QUINOA,2023,13,90.0").unwrap();
    writeln!(file, "QUINOA,abc,3,80.0").unwrap();
    writeln!(file, "QUINOA,2023,4,not-a-number").unwrap();
    writeln!(file, "QUINOA,2023,5,70.0").unwrap();

    let records = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].month, 1);
    assert_eq!(records[1].month, 5);
}

#[test]
fn test_loader_missing_columns() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "PRODUCT,YEAR,MONTH").unwrap();
    writeln!(file, "QUINOA,2023,1").unwrap();

    let result = DataLoader::from_csv(file.path());

    match result {
        Err(ForecastError::DataError(message)) => {
            assert!(message.contains("DEMAND"));
        }
        other => panic!("expected DataError, got {:?}", other),
    }
}

#[test]
fn test_loader_no_valid_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "PRODUCT,YEAR,MONTH,DEMAND").unwrap();
    writeln!(file, "QUINOA,2023,99,100.0").unwrap();

    let result = DataLoader::from_csv(file.path());
    assert!(matches!(result, Err(ForecastError::DataError(_))));
}

#[test]
fn test_loader_missing_file() {
    let result = DataLoader::from_csv("/nonexistent/demand.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}
