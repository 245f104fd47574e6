/// Print a workbook's sheet names and raw rows with absolute row numbers
///
/// Used to check the skip offsets and column positions the loaders rely on against a
/// new export of a source file.
use clap::Parser;
use salmon_data_loader::dataset::Dataset;
use salmon_data_loader::table::Value;
use salmon_data_loader::workbook;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "examine-workbook")]
#[command(about = "Show the raw layout of a source workbook", long_about = None)]
struct Cli {
    /// Path to the .xls or .xlsx file
    file: PathBuf,

    /// Sheet to examine (default: first sheet)
    sheet: Option<String>,

    /// Dataset the file belongs to, used only to label errors
    #[arg(long, default_value = "fish-pool")]
    dataset: Dataset,

    /// Number of rows to print
    #[arg(long, default_value = "40")]
    rows: usize,

    /// Number of columns to print per row
    #[arg(long, default_value = "10")]
    columns: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("Opening workbook: {}", cli.file.display());
    let mut wb = workbook::open(cli.dataset, &cli.file)?;

    println!("\nSheet names:");
    let names = calamine::Reader::sheet_names(&wb);
    for (i, name) in names.iter().enumerate() {
        println!("  {i}: {name}");
    }

    let range = match &cli.sheet {
        Some(sheet) => workbook::worksheet(&mut wb, cli.dataset, sheet)?,
        None => workbook::first_worksheet(&mut wb, cli.dataset)?,
    };

    let sheet_name = cli.sheet.clone().or_else(|| names.first().cloned()).unwrap_or_default();
    println!("\n\nExamining sheet: {sheet_name}");
    println!("{}", "=".repeat(100));
    println!("Used area starts at {:?}, ends at {:?}", range.start(), range.end());
    println!("{}", "=".repeat(100));

    // Row numbers are absolute so they line up with the loaders' skip counts
    let Some((end_row, end_col)) = range.end() else {
        println!("Sheet is empty");
        return Ok(());
    };
    let last_col = (end_col as usize).min(cli.columns.saturating_sub(1));
    for row_idx in 0..=(end_row as usize).min(cli.rows.saturating_sub(1)) {
        let row: Vec<Value> = (0..=last_col)
            .map(|col| {
                range
                    .get_value((row_idx as u32, col as u32))
                    .map(Value::from)
                    .unwrap_or_default()
            })
            .collect();
        if row.iter().all(Value::is_empty) {
            println!("Row {row_idx:3}: (blank)");
            continue;
        }
        print!("Row {row_idx:3}: ");
        for cell in &row {
            if cell.is_empty() {
                print!("[empty] ");
            } else {
                print!("[{cell}] ");
            }
        }
        println!();
    }

    Ok(())
}
