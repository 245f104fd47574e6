// Sheet builders for the integration tests. The crate keeps the same helpers in
// `workbook::fixtures`, but that module is `#[cfg(test)]` and not visible from tests/.

use calamine::{Data, Range};

/// Build a sheet anchored at A1 from rows of cells
pub fn grid(rows: Vec<Vec<Data>>) -> Range<Data> {
    let height = rows.len().max(1) as u32;
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(1).max(1) as u32;
    let mut range = Range::new((0, 0), (height - 1, width - 1));
    for (r, row) in rows.into_iter().enumerate() {
        for (c, cell) in row.into_iter().enumerate() {
            range.set_value((r as u32, c as u32), cell);
        }
    }
    range
}

pub fn s(text: &str) -> Data {
    Data::String(text.to_string())
}
