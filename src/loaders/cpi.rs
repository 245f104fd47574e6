/// SSB Norwegian consumer price index
///
/// One sheet, newest year first, with a header row, one row per year holding the annual
/// figure, twelve monthly figures and an annual average column, then two footer rows.
use calamine::{Data, Range};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::dataset::Dataset;
use crate::load_error::LoadError;
use crate::table::{Table, Value};
use crate::workbook::headered_table;

/// Trailing note rows below the data
pub const CPI_FOOTER_ROWS: usize = 2;

/// Annual-average column dropped before the monthly reshape
pub const CPI_ANNUAL_AVERAGE_COLUMN: &str = "Årsgj.snitt2";

pub const CPI_ANNUAL_COLUMNS: [&str; 2] = ["Year", "CPI_Annual"];

pub const CPI_MONTH_CODES: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

pub const CPI_MONTHLY_COLUMNS: [&str; 2] = ["Date", "CPI_Monthly"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CpiFrequency {
    Annual,
    #[default]
    Monthly,
}

impl CpiFrequency {
    pub fn dataset(&self) -> Dataset {
        match self {
            CpiFrequency::Annual => Dataset::CpiAnnual,
            CpiFrequency::Monthly => Dataset::CpiMonthly,
        }
    }
}

impl fmt::Display for CpiFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpiFrequency::Annual => f.write_str("Annual"),
            CpiFrequency::Monthly => f.write_str("Monthly"),
        }
    }
}

impl FromStr for CpiFrequency {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annual" => Ok(CpiFrequency::Annual),
            "monthly" => Ok(CpiFrequency::Monthly),
            _ => Err(LoadError::InvalidArgument(format!(
                "Select a valid frequency: Monthly or Annual (got '{s}')"
            ))),
        }
    }
}

pub fn reshape_cpi(range: &Range<Data>, frequency: CpiFrequency) -> Result<Table, LoadError> {
    let dataset = frequency.dataset();
    let mut table = headered_table(range, 0);
    table.drop_last_rows(CPI_FOOTER_ROWS);
    table.reverse_rows();
    debug!(%dataset, years = table.len(), "Trimmed CPI footer");

    match frequency {
        CpiFrequency::Annual => annual(table, dataset),
        CpiFrequency::Monthly => monthly(table, dataset),
    }
}

fn annual(table: Table, dataset: Dataset) -> Result<Table, LoadError> {
    let to_load_error = |e| LoadError::from_table(dataset, e);

    let mut annual = table.select_first(2).map_err(to_load_error)?;
    annual
        .set_columns(&CPI_ANNUAL_COLUMNS)
        .map_err(to_load_error)?;
    annual.map_column(0, |row, cell| year(dataset, row, cell).map(Value::Int))?;
    Ok(annual)
}

/// Flatten one row per year into one row per month, year-major then month-minor
fn monthly(table: Table, dataset: Dataset) -> Result<Table, LoadError> {
    let to_load_error = |e| LoadError::from_table(dataset, e);

    let mut wide = table
        .drop_column(CPI_ANNUAL_AVERAGE_COLUMN)
        .map_err(to_load_error)?;
    if wide.width() != CPI_MONTH_CODES.len() + 1 {
        return Err(LoadError::layout(
            dataset,
            format!(
                "expected a year column and 12 month columns, found {} columns",
                wide.width()
            ),
        ));
    }
    let mut names = vec!["Year"];
    names.extend(CPI_MONTH_CODES);
    wide.set_columns(&names).map_err(to_load_error)?;

    let mut long = Table::new(CPI_MONTHLY_COLUMNS).map_err(to_load_error)?;
    for (row_idx, row) in wide.rows().iter().enumerate() {
        let year = year(dataset, row_idx, &row[0])?;
        for (month, value) in (1..=12u32).zip(&row[1..]) {
            let date = i32::try_from(year)
                .ok()
                .and_then(|y| NaiveDate::from_ymd_opt(y, month, 1))
                .ok_or_else(|| LoadError::InvalidData {
                    dataset,
                    row: row_idx,
                    column: "Year".to_string(),
                    msg: format!("year {year} out of range"),
                })?;
            long.push_row(vec![Value::Date(date), value.clone()])
                .map_err(to_load_error)?;
        }
    }
    Ok(long)
}

fn year(dataset: Dataset, row: usize, cell: &Value) -> Result<i64, LoadError> {
    cell.as_i64().ok_or_else(|| LoadError::InvalidData {
        dataset,
        row,
        column: "Year".to_string(),
        msg: format!("expected an integer year, got '{cell}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_error::Stage;
    use crate::workbook::fixtures::{grid, s};

    fn header() -> Vec<Data> {
        let mut row = vec![Data::Empty, s("Årsgjennomsnitt")];
        row.extend(CPI_MONTH_CODES.iter().map(|m| s(&format!("M{m}"))));
        row.push(s(CPI_ANNUAL_AVERAGE_COLUMN));
        row
    }

    fn year_row(year: i64) -> Vec<Data> {
        let mut row = vec![Data::Int(year), Data::Float(year as f64 / 10.0)];
        row.extend((1..=12).map(|m| Data::Int(year * 100 + m)));
        row.push(Data::Float(year as f64 / 10.0 + 0.5));
        row
    }

    /// Newest year first, then two footer rows
    fn cpi_sheet(years_newest_first: &[i64]) -> Range<Data> {
        let mut rows = vec![header()];
        rows.extend(years_newest_first.iter().map(|y| year_row(*y)));
        rows.push(vec![s("Kilde: Statistisk sentralbyrå")]);
        rows.push(vec![s("2 Årsgjennomsnitt")]);
        grid(rows)
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!("Annual".parse::<CpiFrequency>().unwrap(), CpiFrequency::Annual);
        assert_eq!("monthly".parse::<CpiFrequency>().unwrap(), CpiFrequency::Monthly);
        assert_eq!(CpiFrequency::default(), CpiFrequency::Monthly);
    }

    #[test]
    fn test_frequency_unknown_is_invalid_argument() {
        let err = "Unknown".parse::<CpiFrequency>().unwrap_err();
        assert!(matches!(err, LoadError::InvalidArgument(_)));
        assert_eq!(err.stage(), Stage::Argument);
    }

    #[test]
    fn test_annual_drops_footer_and_ascends() {
        let range = cpi_sheet(&[2022, 2021, 2020]);
        let table = reshape_cpi(&range, CpiFrequency::Annual).unwrap();

        assert_eq!(table.columns(), &["Year", "CPI_Annual"]);
        assert_eq!(table.len(), 3);
        let years: Vec<i64> = table.column("Year").unwrap().filter_map(Value::as_i64).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        assert_eq!(table.value(0, "CPI_Annual"), Some(&Value::Float(202.0)));
    }

    #[test]
    fn test_monthly_two_years() {
        let range = cpi_sheet(&[2021, 2020]);
        let table = reshape_cpi(&range, CpiFrequency::Monthly).unwrap();

        assert_eq!(table.columns(), &["Date", "CPI_Monthly"]);
        assert_eq!(table.len(), 24);
        assert_eq!(
            table.rows()[0],
            vec![
                Value::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                Value::Int(202001)
            ]
        );
        assert_eq!(
            table.rows()[23],
            vec![
                Value::Date(NaiveDate::from_ymd_opt(2021, 12, 1).unwrap()),
                Value::Int(202112)
            ]
        );
    }

    #[test]
    fn test_monthly_order_is_year_major() {
        let range = cpi_sheet(&[2003, 2002, 2001]);
        let table = reshape_cpi(&range, CpiFrequency::Monthly).unwrap();
        let dates: Vec<NaiveDate> = table.column("Date").unwrap().filter_map(Value::as_date).collect();

        let mut expected = Vec::new();
        for year in 2001..=2003 {
            for month in 1..=12 {
                expected.push(NaiveDate::from_ymd_opt(year, month, 1).unwrap());
            }
        }
        assert_eq!(dates, expected);
    }

    #[test]
    fn test_monthly_requires_annual_average_column() {
        let range = grid(vec![
            vec![Data::Empty, s("Årsgjennomsnitt")],
            vec![Data::Int(2020), Data::Float(1.0)],
            vec![s("footer")],
            vec![s("footer")],
        ]);
        let err = reshape_cpi(&range, CpiFrequency::Monthly).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { dataset: Dataset::CpiMonthly, ref column } if column == CPI_ANNUAL_AVERAGE_COLUMN
        ));
    }

    #[test]
    fn test_monthly_wrong_width_is_layout_error() {
        let range = grid(vec![
            vec![Data::Empty, s("Årsgjennomsnitt"), s("M01"), s(CPI_ANNUAL_AVERAGE_COLUMN)],
            vec![Data::Int(2020), Data::Float(1.0), Data::Float(1.1), Data::Float(1.0)],
            vec![s("footer")],
            vec![s("footer")],
        ]);
        let err = reshape_cpi(&range, CpiFrequency::Monthly).unwrap_err();
        assert_eq!(err.stage(), Stage::Layout);
    }

    #[test]
    fn test_non_numeric_year_is_parse_error() {
        let mut rows = vec![header(), year_row(2020)];
        rows[1][0] = s("twenty");
        rows.push(vec![s("footer")]);
        rows.push(vec![s("footer")]);
        let err = reshape_cpi(&grid(rows), CpiFrequency::Annual).unwrap_err();
        assert_eq!(err.stage(), Stage::Parse);
    }

    #[test]
    fn test_year_beyond_i32_is_invalid_data() {
        let huge = (1i64 << 32) + 2020;
        let range = cpi_sheet(&[huge]);
        let err = reshape_cpi(&range, CpiFrequency::Monthly).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidData { dataset: Dataset::CpiMonthly, row: 0, ref column, .. } if column == "Year"
        ));
        assert_eq!(err.stage(), Stage::Parse);
    }
}
