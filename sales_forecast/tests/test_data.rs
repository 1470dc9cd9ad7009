use pretty_assertions::assert_eq;
use sales_forecast::data::DataLoader;
use sales_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "Row ID,Order Date,Region,Segment,Category,Sub-Category,Sales,Quantity,Discount,Profit";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = write_csv(&[
        "1,11/8/2016,South,Consumer,Furniture,Bookcases,261.96,2,0,41.9136",
        "2,11/8/2016,South,Consumer,Furniture,Chairs,731.94,3,0,219.582",
        "3,6/12/2016,West,Corporate,Office Supplies,Labels,14.62,2,0,6.8714",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data.dropped_rows(), 0);

    let first = &data.records()[0];
    assert_eq!(first.order_date.to_string(), "2016-11-08");
    assert_eq!(first.sub_category, "Bookcases");
    assert_eq!(first.quantity, 2);
    assert_eq!(data.regions(), vec!["South", "West"]);
    assert_eq!(data.segments(), vec!["Consumer", "Corporate"]);
}

#[test]
fn test_rows_with_missing_values_are_dropped() {
    let file = write_csv(&[
        "1,2016-01-04,Central,Consumer,Technology,Phones,100.0,1,0.2,10.0",
        "2,2016-01-05,,Consumer,Technology,Phones,50.0,1,0.2,5.0",
        "3,2016-01-06,East,Consumer,Technology,Phones,,1,0.2,5.0",
        "4,,East,Consumer,Technology,Phones,20.0,1,0.2,5.0",
        "5,2016-02-01,East,Home Office,Technology,Accessories,80.0,4,0.0,20.0",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data.dropped_rows(), 3);
}

#[test]
fn test_fractional_quantity_counts_as_unreadable() {
    let file = write_csv(&[
        "1,2016-01-04,Central,Consumer,Technology,Phones,100.0,2.7,0.2,10.0",
        "2,2016-01-05,Central,Consumer,Technology,Phones,50.0,3.0,0.2,5.0",
        "3,2016-01-06,East,Consumer,Technology,Phones,20.0,1.5,0.2,5.0",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data.dropped_rows(), 2);
    assert_eq!(data.records()[0].quantity, 3);
}

#[test]
fn test_missing_column_is_fatal() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Order Date,Region,Segment,Sub-Category,Sales,Profit,Discount").unwrap();
    writeln!(file, "2016-01-04,Central,Consumer,Phones,100.0,10.0,0.2").unwrap();

    let err = DataLoader::from_csv(file.path()).unwrap_err();
    match err {
        ForecastError::MissingColumn(name) => assert_eq!(name, "Quantity"),
        other => panic!("Expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_unparseable_date_is_fatal() {
    let file = write_csv(&[
        "1,2016-01-04,Central,Consumer,Technology,Phones,100.0,1,0.2,10.0",
        "2,soon,Central,Consumer,Technology,Phones,100.0,1,0.2,10.0",
    ]);

    let err = DataLoader::from_csv(file.path()).unwrap_err();
    match err {
        ForecastError::DateParse { row, value } => {
            assert_eq!(row, 2);
            assert_eq!(value, "soon");
        }
        other => panic!("Expected DateParse, got {other:?}"),
    }
}

#[test]
fn test_missing_file() {
    let result = DataLoader::from_csv("nonexistent_superstore.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}
