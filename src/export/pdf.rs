//! A4 report rendering.
//!
//! The report is first laid out as a flat list of [`Block`]s, then drawn
//! top to bottom with page breaks inserted whenever the cursor reaches the
//! bottom margin. Text stays real PDF text; the chart is embedded as a raster.

use crate::analytics::reporting::SchoolReport;
use crate::error::{DashboardError, DashboardResult};
use crate::export::chart::ChartBitmap;
use crate::format::{format_amount, format_change, format_cost, format_kg};
use crate::materials::material_label;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

pub const MAX_TABLE_ROWS: usize = 10;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const CHART_DPI: f32 = 150.0;
const TABLE_COLUMNS_MM: [f32; 4] = [0.0, 35.0, 95.0, 135.0];

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    Text(String),
    /// Cells aligned on the fixed table columns
    Row { cells: Vec<String>, header: bool },
    Chart,
    Gap,
}

fn row(cells: [String; 4]) -> Block {
    Block::Row {
        cells: cells.to_vec(),
        header: false,
    }
}

fn header(cells: [&str; 4]) -> Block {
    Block::Row {
        cells: cells.iter().map(|c| c.to_string()).collect(),
        header: true,
    }
}

fn truncation_note(total: usize) -> Option<Block> {
    (total > MAX_TABLE_ROWS).then(|| Block::Text(format!("... and {} more", total - MAX_TABLE_ROWS)))
}

/// Lays out the report. `with_chart` reserves a slot for the chart image.
pub fn layout(report: &SchoolReport, with_chart: bool) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(format!("Sustainability report: {}", report.school.name)),
        Block::Text(format!("Period: {}", report.range.describe())),
        Block::Text(format!("Generated: {}", report.generated_on)),
        Block::Gap,
        Block::Heading("Summary".to_string()),
        Block::Text(format!(
            "Recycled: {} in {} entries",
            format_kg(report.recycling.total_kg),
            report.recycling.entry_count
        )),
        Block::Text(format!("CO2 saved: {}", format_kg(report.recycling.total_co2_kg))),
    ];

    for summary in [&report.water, &report.energy] {
        let kind = summary.consumption_type;
        blocks.push(Block::Text(format!(
            "{}: {} ({}), last change {}",
            kind.label(),
            format_amount(summary.total_consumption, kind.unit()),
            format_cost(summary.total_cost),
            format_change(summary.latest_change_percent)
        )));
    }

    for progress in &report.goal_progress {
        blocks.push(Block::Text(format!(
            "{} goal {:.0}%: reduced {:.1}% ({})",
            progress.consumption_type.label(),
            progress.goal_percent,
            progress.reduction_percent,
            progress.status.label()
        )));
    }
    blocks.push(Block::Gap);

    if with_chart {
        blocks.push(Block::Heading("Monthly recycling".to_string()));
        blocks.push(Block::Chart);
        blocks.push(Block::Gap);
    }

    blocks.push(Block::Heading("Recycling entries".to_string()));
    blocks.push(header(["Date", "Material", "Quantity", "CO2 saved"]));
    for entry in report.recycling_entries.iter().take(MAX_TABLE_ROWS) {
        blocks.push(row([
            entry.date.to_string(),
            material_label(&entry.material),
            format_kg(entry.quantity),
            format_kg(entry.co2_saved),
        ]));
    }
    blocks.extend(truncation_note(report.recycling_entries.len()));
    blocks.push(Block::Gap);

    blocks.push(Block::Heading("Consumption entries".to_string()));
    blocks.push(header(["Month", "Type", "Consumption", "Cost"]));
    for entry in report.consumption_entries.iter().take(MAX_TABLE_ROWS) {
        let kind = entry.consumption_type;
        blocks.push(row([
            entry.month.to_string(),
            kind.label().to_string(),
            format_amount(entry.consumption, kind.unit()),
            format_cost(entry.cost),
        ]));
    }
    blocks.extend(truncation_note(report.consumption_entries.len()));

    blocks
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> DashboardResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(PageWriter {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.cursor - needed >= MARGIN_MM {
            return;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * 0.5;
        self.ensure_space(height);
        self.cursor -= height;
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.cursor), font);
    }

    fn row(&mut self, cells: &[String], bold: bool) {
        let size = 10.0;
        self.ensure_space(size * 0.5);
        self.cursor -= size * 0.5;
        let font = if bold { &self.bold } else { &self.regular };
        for (cell, offset) in cells.iter().zip(TABLE_COLUMNS_MM) {
            self.layer
                .use_text(cell.as_str(), size, Mm(MARGIN_MM + offset), Mm(self.cursor), font);
        }
    }

    fn chart(&mut self, chart: &ChartBitmap) -> DashboardResult<()> {
        let rgb = printpdf::image_crate::RgbImage::from_raw(
            chart.width,
            chart.height,
            chart.pixels.clone(),
        )
        .ok_or_else(|| DashboardError::Export("chart buffer has the wrong size".to_string()))?;
        let image = Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(rgb));

        let height_mm = chart.height as f32 / CHART_DPI * 25.4;
        self.ensure_space(height_mm);
        self.cursor -= height_mm;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(self.cursor)),
                dpi: Some(CHART_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn finish(self) -> DashboardResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(err: printpdf::Error) -> DashboardError {
    DashboardError::Export(format!("could not build PDF: {}", err))
}

/// Renders the report as PDF bytes. The chart is drawn only when given.
pub fn report_to_pdf(report: &SchoolReport, chart: Option<&ChartBitmap>) -> DashboardResult<Vec<u8>> {
    let mut writer = PageWriter::new(&format!("Report {}", report.school.name))?;

    for block in layout(report, chart.is_some()) {
        match block {
            Block::Title(text) => writer.text(&text, 18.0, true),
            Block::Heading(text) => writer.text(&text, 13.0, true),
            Block::Text(text) => writer.text(&text, 10.0, false),
            Block::Row { cells, header } => writer.row(&cells, header),
            Block::Chart => {
                if let Some(chart) = chart {
                    writer.chart(chart)?;
                }
            }
            Block::Gap => writer.cursor -= 4.0,
        }
    }

    writer.finish()
}
