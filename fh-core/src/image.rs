//! Chart rendering: the traces as a titled line chart with a legend,
//! either as a raster image or as SVG.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::{trace::TraceSet, Size};

/// The region of the plane shown in a chart.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Both axes span [-6, 6].
pub const DEFAULT_VIEW: View = View {
    x: (-6.0, 6.0),
    y: (-6.0, 6.0),
};

impl View {
    fn contains(&self, (x, y): (f64, f64)) -> bool {
        (self.x.0..=self.x.1).contains(&x) && (self.y.0..=self.y.1).contains(&y)
    }
}

const GRID: RGBColor = RGBColor(211, 211, 211);

/// Settings for rendering a trace set into a chart.
pub struct Renderer {
    pub view: View,
    /// Width of plotted lines, in pixels.
    pub line_width: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer {
            view: DEFAULT_VIEW,
            line_width: 2,
        }
    }
}

impl Renderer {
    /// Render the chart into an image.
    pub fn render(&self, size: Size, traces: &TraceSet) -> Result<image::DynamicImage, String> {
        let (width, height) = dimensions(size)?;
        let mut buffer = vec![0u8; size.width * size.height * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, size, traces)
                .map_err(|err| format!("error: drawing chart: {}", err))?;
        }
        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| format!("error: buffer does not hold {} * {} pixels", width, height))?;
        Ok(img.into())
    }

    /// Render the chart as an SVG document.
    pub fn render_svg(&self, size: Size, traces: &TraceSet) -> Result<String, String> {
        let (width, height) = dimensions(size)?;
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
            self.draw(&root, size, traces)
                .map_err(|err| format!("error: drawing chart: {}", err))?;
        }
        Ok(svg)
    }

    /// Draw the chart: formula as caption, unit grid, zero lines,
    /// one line per trace in depth order, and the legend.
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        size: Size,
        traces: &TraceSet,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let View { x, y } = self.view;
        let side = size.width.min(size.height) as f64;
        let caption_font = (side / 28.0).max(10.0);
        let label_font = (side / 55.0).max(9.0);

        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("f(x) = {}", traces.function.formula()),
                ("sans-serif", caption_font),
            )
            .margin((side / 80.0) as u32)
            .x_label_area_size((side / 16.0).max(20.0) as u32)
            .y_label_area_size((side / 16.0).max(20.0) as u32)
            .build_cartesian_2d(x.0..x.1, y.0..y.1)?;

        chart
            .configure_mesh()
            .x_labels((x.1 - x.0) as usize + 1)
            .y_labels((y.1 - y.0) as usize + 1)
            .bold_line_style(GRID.stroke_width(1))
            .max_light_lines(0)
            .label_style(("sans-serif", label_font))
            .draw()?;

        let axis = BLACK.stroke_width(1);
        chart.draw_series(LineSeries::new([(0.0, y.0), (0.0, y.1)], axis))?;
        chart.draw_series(LineSeries::new([(x.0, 0.0), (x.1, 0.0)], axis))?;

        for trace in &traces.traces {
            let c = trace.color;
            let style = RGBColor(c.r, c.g, c.b).stroke_width(self.line_width);
            let mut pieces = trace
                .runs(&traces.xs)
                .into_iter()
                .flat_map(|run| visible_pieces(&self.view, &run));
            // The first piece carries the legend entry, even when nothing is visible.
            let first = pieces.next().unwrap_or_default();
            chart
                .draw_series(LineSeries::new(first, style))?
                .label(trace.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            for piece in pieces {
                chart.draw_series(LineSeries::new(piece, style))?;
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85).filled())
            .border_style(BLACK.stroke_width(1))
            .label_font(("sans-serif", label_font))
            .draw()?;

        root.present()?;
        Ok(())
    }
}

fn dimensions(size: Size) -> Result<(u32, u32), String> {
    if size.width == 0 || size.height == 0 {
        return Err(format!(
            "error: empty image size {} * {}",
            size.width, size.height
        ));
    }
    Ok((size.width as u32, size.height as u32))
}

/// Cut a run of finite points down to the polylines that lie inside the view.
///
/// Line series are not clipped to the plotting area when drawn,
/// so segments crossing the boundary are cut at the boundary.
fn visible_pieces(view: &View, run: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut pieces: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for pair in run.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        match clip_segment(view, from, to) {
            None => {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
            }
            Some((start, end)) => {
                // Continue the polyline if this segment starts where the last one ended.
                if current.last() != Some(&start) {
                    if !current.is_empty() {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.push(start);
                }
                current.push(end);
            }
        }
        if !view.contains(to) && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// The part of the segment inside the view, if any (Liang–Barsky).
fn clip_segment(view: &View, from: (f64, f64), to: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, from.0 - view.x.0),
        (dx, view.x.1 - from.0),
        (-dy, from.1 - view.y.0),
        (dy, view.y.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    // Rounding can land a cut point a hair outside; pull it back onto the boundary.
    let at = |t: f64| {
        (
            (from.0 + t * dx).clamp(view.x.0, view.x.1),
            (from.1 + t * dy).clamp(view.y.0, view.y.1),
        )
    };
    let start = if t0 == 0.0 { from } else { at(t0) };
    let end = if t1 == 1.0 { to } else { at(t1) };
    if [start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
        Some((start, end))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{trace, Function, Params};

    fn rational_with_pole() -> TraceSet {
        let params = Params {
            a: 1.0,
            b: 0.0,
            c: 1.0,
            d: 1.0,
        };
        trace::compute(Function::Rational, params, 5)
    }

    #[test]
    fn renders_requested_size() {
        let set = trace::compute(Function::Plus, Params::default(), 3);
        let image = Renderer::default()
            .render(Size { width: 400, height: 300 }, &set)
            .unwrap();
        assert_eq!(image.width(), 400);
        assert_eq!(image.height(), 300);
    }

    #[test]
    fn rejects_empty_size() {
        let set = trace::compute(Function::Plus, Params::default(), 0);
        assert!(Renderer::default().render(Size::square(0), &set).is_err());
        assert!(Renderer::default().render_svg(Size::square(0), &set).is_err());
    }

    #[test]
    fn raster_has_title_text() {
        let image = Renderer::default()
            .render(Size::square(800), &rational_with_pole())
            .unwrap()
            .to_rgb8();
        // The caption band sits above the plotting area; text is the only
        // dark ink there.
        let dark = (0..image.width())
            .flat_map(|x| (0..30).map(move |y| (x, y)))
            .filter(|(x, y)| {
                let image::Rgb([r, g, b]) = *image.get_pixel(*x, *y);
                r < 100 && g < 100 && b < 100
            })
            .count();
        assert!(dark > 0, "no caption text drawn");
    }

    #[test]
    fn raster_draws_every_trace_color() {
        let set = trace::compute(Function::Affine, Params { a: 1.0, b: 0.5, ..Params::default() }, 3);
        let image = Renderer::default()
            .render(Size::square(600), &set)
            .unwrap()
            .to_rgb8();
        for trace in &set.traces {
            let c = trace.color;
            let want = image::Rgb([c.r, c.g, c.b]);
            assert!(
                image.pixels().any(|p| *p == want),
                "depth {} not drawn",
                trace.depth
            );
        }
    }

    #[test]
    fn svg_has_caption_and_legend() {
        let set = rational_with_pole();
        let svg = Renderer::default().render_svg(Size::square(600), &set).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("f(x) = (a + b·x) / (c + d·x)"));
        for trace in &set.traces {
            assert!(svg.contains(&trace.label), "missing legend {}", trace.label);
        }
    }

    #[test]
    fn pole_does_not_fail() {
        let params = Params {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
        };
        let set = trace::compute(Function::Rational, params, 10);
        assert!(Renderer::default().render(Size::square(200), &set).is_ok());
    }

    #[test]
    fn clipping() {
        let view = DEFAULT_VIEW;
        assert_eq!(
            clip_segment(&view, (-10.0, 1.0), (10.0, 1.0)),
            Some(((-6.0, 1.0), (6.0, 1.0)))
        );
        assert_eq!(clip_segment(&view, (-10.0, -10.0), (-7.0, 20.0)), None);
        assert_eq!(
            clip_segment(&view, (2.0, 2.0), (3.0, 3.0)),
            Some(((2.0, 2.0), (3.0, 3.0)))
        );
        assert!(clip_segment(&view, (5.0, -1e300), (5.0, 1e300)).is_some());
    }

    #[test]
    fn pieces_split_where_the_curve_leaves_the_view() {
        let run = [(0.0, 0.0), (1.0, 5.0), (2.0, 10.0), (3.0, 20.0), (4.0, 5.0), (5.0, 0.0)];
        let pieces = visible_pieces(&DEFAULT_VIEW, &run);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0][..2], [(0.0, 0.0), (1.0, 5.0)]);
        assert_eq!(pieces[0].len(), 3);
        assert_eq!(*pieces[1].last().unwrap(), (5.0, 0.0));
        for point in pieces.iter().flatten() {
            assert!(DEFAULT_VIEW.contains(*point), "{:?}", point);
        }
    }
}
