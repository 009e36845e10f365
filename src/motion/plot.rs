use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::motion::buffer::GroupSnapshot;
use crate::motion::channel::SeriesColor;
use crate::motion::MotionError;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    /// Caption, tick labels and legend; needs a system font.
    pub show_labels: bool,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            foreground: WHITE,
            show_labels: true,
        }
    }
}
fn rgb(color: SeriesColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}
/// Renders a group snapshot the way the live chart shows it, as PNG bytes.
pub fn render_group_png(
    snapshot: &GroupSnapshot,
    style: PlotStyle,
) -> Result<Vec<u8>, MotionError> {
    if snapshot.is_empty() {
        return Err(MotionError::Plot(format!(
            "group '{}' has no samples",
            snapshot.group_name
        )));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x0, x1) = snapshot.bounds.x;
        let (y0, y1) = snapshot.bounds.y;
        let fg = style.foreground;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if style.show_labels {
            builder
                .caption(
                    snapshot.group_name.as_str(),
                    ("sans-serif", 20).into_font().color(&fg),
                )
                .set_label_area_size(LabelAreaPosition::Left, 45)
                .set_label_area_size(LabelAreaPosition::Bottom, 40);
        }
        let mut chart = builder.build_cartesian_2d(x0 as f64..x1 as f64, y0..y1)?;
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&fg.mix(0.1));
        if style.show_labels {
            mesh.x_desc("Sample").y_desc("Value");
        } else {
            mesh.disable_x_axis().disable_y_axis();
        }
        mesh.draw()?;
        for series in &snapshot.series {
            let color = rgb(series.color);
            let points = series
                .points
                .iter()
                .map(|p| (p.sequence() as f64, p.value()));
            chart
                .draw_series(LineSeries::new(points, &color))?
                .label(series.name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        if style.show_labels {
            chart
                .configure_series_labels()
                .border_style(&fg.mix(0.2))
                .background_style(&style.background)
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, MotionError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| MotionError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Attitude, ChannelBufferSet, GroupSelector, MotionReading};
    #[test]
    fn empty_group_is_an_error() {
        let buffers = ChannelBufferSet::with_capacity(8).unwrap();
        let snapshot = GroupSelector::default().snapshot(&buffers);
        assert!(matches!(
            render_group_png(&snapshot, PlotStyle::default()),
            Err(MotionError::Plot(_))
        ));
    }
    #[test]
    fn renders_png_bytes() {
        let mut buffers = ChannelBufferSet::with_capacity(32).unwrap();
        for i in 0..40 {
            let t = i as f64 * 0.04;
            buffers.append(&MotionReading::at_rest(t, Attitude::from_euler(t.sin(), t.cos(), 0.0)));
        }
        let snapshot = GroupSelector::default().snapshot(&buffers);
        let style = PlotStyle {
            show_labels: false,
            ..PlotStyle::default()
        };
        let png = render_group_png(&snapshot, style).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
