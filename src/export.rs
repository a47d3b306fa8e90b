use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Reader, Xlsx, open_workbook};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};

use crate::types::{AuctionRecord, PropertyType};

pub const SHEET_NAME: &str = "Remates Inmuebles";

pub const COLUMNS: usize = 10;

pub const HEADERS: [&str; COLUMNS] = [
    "Fecha_Remate",
    "Hora",
    "Juzgado",
    "Rol",
    "Tipo_Inmueble",
    "Comuna",
    "Direccion",
    "Precio_Minimo",
    "Email_Contacto",
    "Descripcion_Completa",
];

const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("Failed to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("Unexpected header row: {0:?}")]
    UnexpectedHeader(Vec<String>),
    #[error("Invalid value in row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// Where the workbook goes. Both parts fall back to defaults when unset.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub output_dir: Option<PathBuf>,
    pub file_name: Option<String>,
}

impl ExportOptions {
    pub fn path_for(&self, today: NaiveDate) -> PathBuf {
        let file_name = self
            .file_name
            .clone()
            .unwrap_or_else(|| default_file_name(today));

        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

pub fn default_file_name(today: NaiveDate) -> String {
    format!("remates_inmuebles_{}.xlsx", today.format("%Y%m%d"))
}

/// Longest display length per column, header included, padded and capped.
pub fn column_widths(records: &[AuctionRecord]) -> [usize; COLUMNS] {
    let mut widths = HEADERS.map(|h| h.chars().count());

    for record in records {
        for (width, value) in widths.iter_mut().zip(record.to_row()) {
            *width = (*width).max(value.chars().count());
        }
    }

    widths.map(|w| (w + COLUMN_PADDING).min(MAX_COLUMN_WIDTH))
}

/// Writes one sheet with a bold header row. Returns `None` without touching
/// the filesystem when there is nothing to write.
pub fn write_records(
    records: &[AuctionRecord],
    options: &ExportOptions,
    today: NaiveDate,
) -> Result<Option<PathBuf>, ExportError> {
    if records.is_empty() {
        log::warn!("No auctions to save");
        return Ok(None);
    }

    if let Some(dir) = &options.output_dir
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let path = options.path_for(today);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record.to_row().into_iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }

    for (col, width) in column_widths(records).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(&path)?;

    log::info!("Saved {} auctions to {}", records.len(), path.display());
    Ok(Some(path))
}

/// Loads a workbook written by [`write_records`].
pub fn read_records(path: &Path) -> Result<Vec<AuctionRecord>, ExportError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(SHEET_NAME)?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    if header != HEADERS {
        return Err(ExportError::UnexpectedHeader(header));
    }

    rows.enumerate()
        .map(|(i, row)| {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            parse_row(i + 2, &cells)
        })
        .collect()
}

fn parse_row(row: usize, cells: &[String]) -> Result<AuctionRecord, ExportError> {
    let invalid = |reason: String| ExportError::InvalidRow { row, reason };

    let [
        date,
        time,
        court,
        roll,
        property_type,
        comuna,
        address,
        min_price,
        email,
        description,
    ] = cells
    else {
        return Err(invalid(format!(
            "expected {} cells, found {}",
            COLUMNS,
            cells.len()
        )));
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| invalid(format!("date '{}': {}", date, e)))?;
    let property_type = property_type
        .parse::<PropertyType>()
        .map_err(|e| invalid(e.to_string()))?;

    Ok(AuctionRecord {
        date,
        time: time.clone(),
        court: court.clone(),
        roll: roll.clone(),
        property_type,
        comuna: comuna.clone(),
        address: address.clone(),
        min_price: min_price.clone(),
        email: email.clone(),
        description: description.clone(),
    })
}
