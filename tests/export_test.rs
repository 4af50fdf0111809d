use gss_dashboard::downloader::{ExportFormat, to_csv, to_xlsx};
use gss_dashboard::{CrossTab, CrossTabRow, XColumn, YColumn};

fn table() -> CrossTab {
    let row = |x: &str, y: &str, count| CrossTabRow {
        x_value: x.to_string(),
        y_value: y.to_string(),
        count,
    };
    CrossTab {
        x: XColumn::Satjob,
        y: YColumn::Region,
        x_categories: vec!["very satisfied".into(), "a little dissat".into()],
        y_categories: vec!["pacific".into(), "e. nor. central".into()],
        rows: vec![
            row("very satisfied", "pacific", 4),
            row("very satisfied", "e. nor. central", 0),
            row("a little dissat", "pacific", 1),
            row("a little dissat", "e. nor. central", 2),
        ],
    }
}

#[test]
fn csv_has_header_and_long_rows() {
    let csv = to_csv(&table());
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "satjob,region,Count",
            "very satisfied,pacific,4",
            "very satisfied,e. nor. central,0",
            "a little dissat,pacific,1",
            "a little dissat,e. nor. central,2",
        ]
    );
}

#[test]
fn csv_quotes_awkward_values() {
    let mut t = table();
    t.rows.truncate(1);
    t.rows[0].x_value = "agree, mostly".to_string();
    t.rows[0].y_value = "the \"south\"".to_string();
    assert_eq!(
        to_csv(&t),
        "satjob,region,Count\n\"agree, mostly\",\"the \"\"south\"\"\",4\n"
    );
}

#[test]
fn xlsx_is_a_zip_archive() {
    let bytes = to_xlsx(&table()).expect("workbook");
    assert_eq!(&bytes[..2], b"PK");
    assert_eq!(ExportFormat::Xlsx.export(&table()).expect("workbook")[..2], *b"PK");
    assert_eq!(ExportFormat::Csv.extension(), "csv");
}
