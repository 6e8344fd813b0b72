use super::tables::{
    ActivityRow, ResultRow, ACTIVITY_COLUMNS, ACTIVITY_SHEET, RESULTS_SHEET, RESULT_COLUMNS,
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

/// Two sheets: per-cell results, then the evaluator activity row.
pub(crate) fn render_workbook(
    results: &[ResultRow],
    activity: &ActivityRow,
) -> Result<Vec<u8>, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(RESULTS_SHEET)?;
        write_header(sheet, &RESULT_COLUMNS, &header)?;
        for (index, row) in results.iter().enumerate() {
            let line = index as u32 + 1;
            sheet.write_string(line, 0, &row.worker)?;
            sheet.write_string(line, 1, &row.role)?;
            sheet.write_string(line, 2, &row.competency)?;
            sheet.write_number(line, 3, row.score)?;
            sheet.write_string(line, 4, &row.sub_unit)?;
            sheet.write_string(line, 5, &row.organizational_unit)?;
            sheet.write_string(line, 6, &row.timestamp)?;
        }
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(ACTIVITY_SHEET)?;
        write_header(sheet, &ACTIVITY_COLUMNS, &header)?;
        for (col, value) in activity.values().into_iter().enumerate() {
            sheet.write_string(1, col as u16, value)?;
        }
    }

    workbook.save_to_buffer()
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
        sheet.set_column_width(col as u16, 22)?;
    }
    Ok(())
}
