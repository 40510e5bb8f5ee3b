use crate::analytics::reporting::SchoolReport;
use crate::error::{DashboardError, DashboardResult};
use csv::{Writer, WriterBuilder};
use std::borrow::Cow;
use std::io::Write;

/// Characters that make a spreadsheet treat a cell as a formula
const FORMULA_PREFIXES: [char; 6] = ['=', '+', '-', '@', '\t', '\r'];

/// Prefixes formula-like text with `'` so spreadsheets never evaluate it.
/// Signed numbers such as `-5.00` pass through unchanged.
pub fn neutralize_formula(value: &str) -> Cow<'_, str> {
    if value.starts_with(FORMULA_PREFIXES) && value.parse::<f64>().is_err() {
        Cow::Owned(format!("'{}", value))
    } else {
        Cow::Borrowed(value)
    }
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut Writer<W>, fields: &[S]) -> csv::Result<()> {
    writer.write_record(fields.iter().map(|f| neutralize_formula(f.as_ref()).into_owned()))
}

/// Sections are separated by one blank line. csv writes an empty record as
/// `""`, so the line break goes straight into the flushed buffer.
fn end_section(writer: &mut Writer<Vec<u8>>) -> DashboardResult<()> {
    writer.flush()?;
    // csv::Writer has no get_mut; reclaim the buffer and rewrap it
    let taken = std::mem::replace(writer, WriterBuilder::new().flexible(true).from_writer(Vec::new()));
    let mut bytes = taken
        .into_inner()
        .map_err(|e| DashboardError::Export(e.to_string()))?;
    bytes.push(b'\n');
    *writer = WriterBuilder::new().flexible(true).from_writer(bytes);
    Ok(())
}

fn number(value: f64) -> String {
    format!("{:.2}", value)
}

/// Serializes a report as sectioned CSV for spreadsheet import
pub fn report_to_csv(report: &SchoolReport) -> DashboardResult<String> {
    // sections have different widths
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    write_row(&mut writer, &["Report", report.school.name.as_str()])?;
    write_row(&mut writer, &["Period".to_string(), report.range.describe()])?;
    write_row(&mut writer, &["Generated".to_string(), report.generated_on.to_string()])?;
    end_section(&mut writer)?;

    write_row(&mut writer, &["Summary"])?;
    write_row(&mut writer, &["Total recycled (kg)".to_string(), number(report.recycling.total_kg)])?;
    write_row(
        &mut writer,
        &["Total CO2 saved (kg)".to_string(), number(report.recycling.total_co2_kg)],
    )?;
    write_row(
        &mut writer,
        &["Recycling entries".to_string(), report.recycling.entry_count.to_string()],
    )?;
    for summary in [&report.water, &report.energy] {
        let kind = summary.consumption_type;
        write_row(
            &mut writer,
            &[
                format!("{} consumption ({})", kind.label(), kind.unit()),
                number(summary.total_consumption),
            ],
        )?;
        write_row(
            &mut writer,
            &[format!("{} cost", kind.label()), number(summary.total_cost)],
        )?;
    }
    end_section(&mut writer)?;

    write_row(&mut writer, &["Recycling entries"])?;
    write_row(&mut writer, &["Date", "Material", "Quantity (kg)", "CO2 saved (kg)"])?;
    for entry in &report.recycling_entries {
        write_row(
            &mut writer,
            &[
                entry.date.to_string(),
                entry.material.clone(),
                number(entry.quantity),
                number(entry.co2_saved),
            ],
        )?;
    }
    end_section(&mut writer)?;

    write_row(&mut writer, &["Consumption entries"])?;
    write_row(&mut writer, &["Month", "Type", "Consumption", "Cost"])?;
    for entry in &report.consumption_entries {
        write_row(
            &mut writer,
            &[
                entry.month.to_string(),
                entry.consumption_type.as_str().to_string(),
                number(entry.consumption),
                number(entry.cost),
            ],
        )?;
    }
    end_section(&mut writer)?;

    write_row(&mut writer, &["Materials"])?;
    write_row(&mut writer, &["Material", "Quantity (kg)", "CO2 saved (kg)", "Share (%)"])?;
    for material in &report.materials {
        write_row(
            &mut writer,
            &[
                material.material.clone(),
                number(material.kg),
                number(material.co2_kg),
                format!("{:.1}", material.share_percent),
            ],
        )?;
    }
    end_section(&mut writer)?;

    write_row(&mut writer, &["Goals"])?;
    write_row(
        &mut writer,
        &["Type", "Goal (%)", "Previous month", "Latest month", "Reduction (%)", "Status"],
    )?;
    for goal in &report.goals {
        let row = match report.progress_for(goal.consumption_type) {
            Some(progress) => vec![
                goal.consumption_type.as_str().to_string(),
                number(goal.reduction_percentage),
                progress.previous_month.to_string(),
                progress.latest_month.to_string(),
                number(progress.reduction_percent),
                progress.status.as_str().to_string(),
            ],
            None => vec![
                goal.consumption_type.as_str().to_string(),
                number(goal.reduction_percentage),
                String::new(),
                String::new(),
                String::new(),
                "no_data".to_string(),
            ],
        };
        write_row(&mut writer, &row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Export(e.to_string()))
}
