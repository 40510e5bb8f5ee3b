use crate::analytics::reporting::MonthlyRecycling;
use crate::error::{DashboardError, DashboardResult};
use plotters::prelude::*;
use std::path::Path;

const BAR_COLOR: RGBColor = RGBColor(46, 139, 87);

/// Styling for the monthly recycling chart
#[derive(Clone, Debug)]
pub struct ChartOptions {
    /// Caption drawn above the plot
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: "Monthly recycling (kg)".to_string(),
            width: 800,
            height: 400,
        }
    }
}

/// An RGB8 raster, row-major, three bytes per pixel
#[derive(Clone, Debug, PartialEq)]
pub struct ChartBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ChartBitmap {
    pub fn save_png(&self, path: &Path) -> DashboardResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
        .map_err(|e| DashboardError::Export(format!("could not write chart: {}", e)))
    }
}

/// Rasterizes one bar per month. An empty series is an error since there is
/// nothing to scale the axis against.
pub fn render_monthly_recycling(
    series: &[MonthlyRecycling],
    options: &ChartOptions,
) -> DashboardResult<ChartBitmap> {
    if series.is_empty() {
        return Err(DashboardError::Export(
            "no recycling entries to chart".to_string(),
        ));
    }
    if options.width == 0 || options.height == 0 {
        return Err(DashboardError::Export(format!(
            "invalid chart size {}x{}",
            options.width, options.height
        )));
    }

    let mut pixels = vec![255u8; options.width as usize * options.height as usize * 3];
    draw_bars(series, options, &mut pixels)
        .map_err(|e| DashboardError::Export(format!("could not draw chart: {}", e)))?;

    Ok(ChartBitmap {
        width: options.width,
        height: options.height,
        pixels,
    })
}

fn draw_bars(
    series: &[MonthlyRecycling],
    options: &ChartOptions,
    pixels: &mut [u8],
) -> Result<(), Box<dyn std::error::Error>> {
    let root =
        BitMapBackend::with_buffer(pixels, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_kg = series.iter().map(|m| m.kg).fold(0.0, f64::max);
    let y_max = if max_kg > 0.0 { max_kg * 1.1 } else { 1.0 };
    let labels: Vec<String> = series.iter().map(|m| m.month.label()).collect();
    let count = series.len() as i32;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d((0..count).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(series.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) => labels.get(*idx as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("kg")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .margin(8)
            .data(series.iter().enumerate().map(|(i, m)| (i as i32, m.kg))),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series_is_an_error() {
        let result = render_monthly_recycling(&[], &ChartOptions::default());
        assert!(matches!(result, Err(DashboardError::Export(_))));
    }

    #[test]
    fn test_zero_size_is_an_error() {
        let series = vec![MonthlyRecycling {
            month: "2024-01".parse().unwrap(),
            kg: 10.0,
            co2_kg: 11.0,
        }];
        let options = ChartOptions {
            width: 0,
            ..ChartOptions::default()
        };
        assert!(render_monthly_recycling(&series, &options).is_err());
    }

    fn quarter() -> Vec<MonthlyRecycling> {
        [("2024-01", 10.0), ("2024-02", 25.5), ("2024-03", 4.0)]
            .into_iter()
            .map(|(month, kg)| MonthlyRecycling {
                month: month.parse().unwrap(),
                kg,
                co2_kg: kg * 1.1,
            })
            .collect()
    }

    #[test]
    fn test_renders_bars_into_bitmap() {
        let chart = render_monthly_recycling(&quarter(), &ChartOptions::default()).unwrap();
        assert_eq!((chart.width, chart.height), (800, 400));
        assert_eq!(chart.pixels.len(), 800 * 400 * 3);
        assert!(chart.pixels.iter().any(|&byte| byte != 255));
    }

    #[test]
    fn test_save_png_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let options = ChartOptions {
            width: 320,
            height: 200,
            ..ChartOptions::default()
        };
        render_monthly_recycling(&quarter(), &options)
            .unwrap()
            .save_png(&path)
            .unwrap();

        let png = image::open(&path).unwrap();
        assert_eq!(image::GenericImageView::dimensions(&png), (320, 200));
    }

    #[test]
    fn test_default_options() {
        let options = ChartOptions::default();
        assert_eq!((options.width, options.height), (800, 400));
    }
}
