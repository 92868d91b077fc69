//! XLSX export.
//!
//! One worksheet. Per chassis a block of slot columns; each slot takes four
//! columns (channel number, KIP name, two spacers) and 16 channel rows, or 32
//! when the slot uses a channel above 15. Descriptions go into cell notes.
//! Points in slots past `XlsxMeta::slots` or on channels past 31 have no cell;
//! they are logged and counted.

use std::path::Path;

use chrono::{Datelike, NaiveDateTime, Timelike};
use log::info;
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Note, Workbook, Worksheet, XlsxError,
};

use super::{display_name, warn_outside, GridLayout};
use crate::domain::io_map::IoMap;
use crate::error::RenderError;

const FIRST_BLOCK_ROW: u32 = 3;
const FIRST_SLOT_COL: u16 = 3;
const COLS_PER_SLOT: u16 = 4;
const SHORT_SLOT_CHANNELS: u32 = 16;
const LONG_SLOT_CHANNELS: u32 = 32;
/// Excel's last column is 16383; the last slot's block must end there.
pub const MAX_XLSX_SLOTS: u32 = (16_384 - FIRST_SLOT_COL as u32) / COLS_PER_SLOT as u32;

#[derive(Debug, Clone)]
pub struct XlsxMeta {
    pub created: NaiveDateTime,
    /// Name of the export the table was built from.
    pub source_name: String,
    /// Slot columns per chassis block.
    pub slots: u32,
}

struct Formats {
    bold: Format,
    datetime: Format,
    slot_header: Format,
    channel_number: Format,
    content: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            bold: Format::new().set_bold(),
            datetime: Format::new()
                .set_num_format("yyyy-mm-dd hh:mm:ss")
                .set_align(FormatAlign::Left),
            slot_header: Format::new()
                .set_bold()
                .set_font_color(Color::Gray)
                .set_align(FormatAlign::Center)
                .set_border_top(FormatBorder::Thin)
                .set_border_bottom(FormatBorder::Thin),
            channel_number: Format::new()
                .set_align(FormatAlign::Center)
                .set_border_left(FormatBorder::Thin)
                .set_border_right(FormatBorder::Thin),
            content: Format::new().set_align(FormatAlign::CenterAcross),
        }
    }
}

/// Write the workbook. Returns how many points had no cell.
pub fn write_xlsx(map: &IoMap, out_path: &Path, meta: &XlsxMeta) -> Result<usize, RenderError> {
    if meta.slots > MAX_XLSX_SLOTS {
        return Err(RenderError::TooManySlots {
            slots: meta.slots,
            max: MAX_XLSX_SLOTS,
        });
    }
    let layout = GridLayout {
        slots: meta.slots,
        channels: LONG_SLOT_CHANNELS,
    };
    let omitted = warn_outside(map, layout, "xlsx");

    let formats = Formats::new();
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Created at")?;
        let created = excel_datetime(&meta.created)?;
        sheet.write_datetime_with_format(0, 1, &created, &formats.datetime)?;
        sheet.write_string(1, 0, "Original input file name")?;
        sheet.write_string(1, 1, &meta.source_name)?;

        let mut row = FIRST_BLOCK_ROW;
        for chassis in map.chassis_ids() {
            row += 2;
            sheet.write_string(row, 0, "CHASSIS")?;
            sheet.write_string_with_format(row, 1, chassis, &formats.bold)?;
            row += 1;

            let mut block_rows = SHORT_SLOT_CHANNELS;
            for slot in 0..meta.slots {
                let col = slot_column(slot);
                let rows = write_slot(sheet, &formats, map, chassis, slot, row, col)?;
                block_rows = block_rows.max(rows);
            }
            row += block_rows + 2;
        }
    }

    workbook.read_only_recommended();
    workbook.save(out_path)?;
    info!("xlsx written to '{}'", out_path.display());
    Ok(omitted)
}

fn excel_datetime(created: &NaiveDateTime) -> Result<ExcelDateTime, XlsxError> {
    // Out-of-range years become 0 and are rejected by `from_ymd`.
    let year = u16::try_from(created.year()).unwrap_or(0);
    ExcelDateTime::from_ymd(year, created.month() as u8, created.day() as u8)?.and_hms(
        created.hour() as u16,
        created.minute() as u8,
        created.second(),
    )
}

/// `slot` must be below `MAX_XLSX_SLOTS`.
fn slot_column(slot: u32) -> u16 {
    FIRST_SLOT_COL + (slot as u16) * COLS_PER_SLOT
}

/// Channel rows a slot needs.
fn slot_channels(map: &IoMap, chassis: &str, slot: u32) -> u32 {
    match map.max_channel(chassis, slot) {
        Some(max) if max >= SHORT_SLOT_CHANNELS => LONG_SLOT_CHANNELS,
        _ => SHORT_SLOT_CHANNELS,
    }
}

fn write_slot(
    sheet: &mut Worksheet,
    formats: &Formats,
    map: &IoMap,
    chassis: &str,
    slot: u32,
    row: u32,
    col: u16,
) -> Result<u32, RenderError> {
    sheet.write_string_with_format(row, col + 1, "SLOT", &formats.slot_header)?;
    sheet.write_number_with_format(row, col + 2, slot, &formats.slot_header)?;
    sheet.write_blank(row, col + 3, &formats.slot_header)?;
    for offset in 1..=3 {
        sheet.write_blank(row + 1, col + offset, &formats.slot_header)?;
    }
    sheet.write_blank(row, col, &formats.channel_number)?;
    sheet.write_blank(row + 1, col, &formats.channel_number)?;

    let channels = slot_channels(map, chassis, slot);
    for channel in 0..channels {
        let cell_row = row + channel + 2;
        sheet.write_number_with_format(cell_row, col, channel, &formats.channel_number)?;
        let name = display_name(map, chassis, slot, channel);
        sheet.write_string_with_format(cell_row, col + 1, &name, &formats.content)?;
        if let Some(description) = map
            .description(chassis, slot, channel)
            .filter(|text| !text.is_empty())
        {
            sheet.insert_note(cell_row, col + 1, &Note::new(description))?;
        }
    }

    sheet.set_column_width(col, 2.30)?;
    sheet.set_column_width(col + 1, 23)?;
    Ok(channels)
}
