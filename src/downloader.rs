use crate::crosstab::CrossTab;
use crate::error::Result;
use crate::selection::Categorical;

/// Convert a cross-tab to CSV format
///
/// The header names the two selected columns followed by `Count`; each
/// long-format row becomes one line. Fields containing commas, quotes or
/// newlines are quoted.
///
/// # Arguments
/// * `table` - The cross-tab to export
///
/// # Returns
/// * `String` - CSV content
///
/// # Examples
/// ```
/// use gss_dashboard::crosstab::{CompleteCases, cross_tabulate};
/// use gss_dashboard::downloader::to_csv;
/// use gss_dashboard::selection::{XColumn, YColumn};
///
/// let table = cross_tabulate(&CompleteCases::default(), XColumn::Satjob, YColumn::Sex);
/// assert_eq!(to_csv(&table), "satjob,sex,Count\n");
/// ```
pub fn to_csv(table: &CrossTab) -> String {
    let mut csv_content = String::new();

    csv_content.push_str(table.x.name());
    csv_content.push(',');
    csv_content.push_str(table.y.name());
    csv_content.push_str(",Count\n");

    for row in &table.rows {
        csv_content.push_str(&escape(&row.x_value));
        csv_content.push(',');
        csv_content.push_str(&escape(&row.y_value));
        csv_content.push(',');
        csv_content.push_str(&row.count.to_string());
        csv_content.push('\n');
    }

    csv_content
}

fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Convert a cross-tab to XLSX format
///
/// Same layout as [`to_csv`], written with `rust_xlsxwriter` into an
/// in-memory workbook.
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an error
pub fn to_xlsx(table: &CrossTab) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    worksheet.write_string_with_format(0, 0, table.x.name(), &bold)?;
    worksheet.write_string_with_format(0, 1, table.y.name(), &bold)?;
    worksheet.write_string_with_format(0, 2, "Count", &bold)?;

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_string(r, 0, &row.x_value)?;
        worksheet.write_string(r, 1, &row.y_value)?;
        worksheet.write_number(r, 2, row.count as f64)?;
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Download formats offered for the interactive chart's data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Serialize a cross-tab in this format.
    pub fn export(self, table: &CrossTab) -> Result<Vec<u8>> {
        match self {
            ExportFormat::Csv => Ok(to_csv(table).into_bytes()),
            ExportFormat::Xlsx => to_xlsx(table),
        }
    }
}
