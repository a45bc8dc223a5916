//! Rendering of the migration map for a single year.
//!
//! [`render`] builds a [`Scene`]: a plain description of everything on the map for the selected
//! year, in drawing order. [`Scene::to_svg`] then draws it with plotters. Keeping the two steps
//! apart means the contents of a map can be checked without parsing any image output.
//!
//! Layers are drawn back to front as follows:
//!
//! 1. city boundary outlines (unfilled)
//! 2. flow segments, coloured and sized by class
//! 3. city centroid markers
//! 4. city names
//! 5. the legend
//! 6. the title
use crate::city::CityMap;
use crate::classify::{Colour, FlowClass};
use crate::flow::ClassifiedSegment;
use crate::geometry::cities_extent;
use crate::model::parameters::FigureParameters;
use anyhow::Result;
use geo::{Coord, LineString, Point, Rect};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// The title of the legend
pub const LEGEND_TITLE: &str = "Migration Index";

/// The font family for all text
const FONT_FAMILY: &str = "sans-serif";

/// Proportion of the map extent left blank on each side
const EXTENT_PADDING: f64 = 0.05;

/// A city name, drawn centred on the city
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Where the label is centred
    pub position: Point<f64>,
    /// The text of the label
    pub text: String,
}

/// One row of the legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// The class the row describes
    pub class: FlowClass,
    /// The intensity range of the class
    pub label: &'static str,
}

/// Everything drawn on the map for one year
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// The selected year
    pub year: u32,
    /// The full title, including the year
    pub title: String,
    /// Exterior rings of every city boundary
    pub outlines: Vec<LineString<f64>>,
    /// The flows for the selected year
    pub segments: Vec<ClassifiedSegment>,
    /// City centroids
    pub markers: Vec<Point<f64>>,
    /// City names
    pub labels: Vec<Label>,
    /// The legend rows, in ascending order of intensity
    pub legend: Vec<LegendEntry>,
    /// The area of the map plane covered by the cities
    pub extent: Rect<f64>,
}

/// Build the scene for the given year.
///
/// Only segments whose year is exactly `year` are included. A year with no flows gives a scene
/// with no segments, but with all the cities and the legend.
///
/// # Arguments
///
/// * `year` - The selected year
/// * `segments` - Segments for all years
/// * `cities` - All cities
/// * `title` - Title of the map, to which the year is appended
pub fn render(year: u32, segments: &[ClassifiedSegment], cities: &CityMap, title: &str) -> Scene {
    let segments = segments
        .iter()
        .filter(|segment| segment.year == year)
        .copied()
        .collect();

    let outlines = cities
        .values()
        .flat_map(|city| city.boundary.iter().map(|polygon| polygon.exterior().clone()))
        .collect();

    let legend = FlowClass::LEGEND
        .iter()
        .filter_map(|&class| Some(LegendEntry {
            class,
            label: class.label()?,
        }))
        .collect();

    Scene {
        year,
        title: format!("{title} - Year {year}"),
        outlines,
        segments,
        markers: cities.values().map(|city| city.centroid).collect(),
        labels: cities
            .values()
            .map(|city| Label {
                position: city.centroid,
                text: city.id.to_string(),
            })
            .collect(),
        legend,
        extent: cities_extent(cities)
            .unwrap_or_else(|| Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 })),
    }
}

/// Grow `extent` so that it has the given aspect ratio, with some padding around it.
///
/// The result is centred on the centre of `extent`.
pub fn fit_extent(extent: Rect<f64>, width: u32, height: u32) -> Rect<f64> {
    let mut w = extent.width().max(1.0) * (1.0 + 2.0 * EXTENT_PADDING);
    let mut h = extent.height().max(1.0) * (1.0 + 2.0 * EXTENT_PADDING);

    let aspect = f64::from(width.max(1)) / f64::from(height.max(1));
    if w / h < aspect {
        w = h * aspect;
    } else {
        h = w / aspect;
    }

    let centre = extent.center();
    Rect::new(
        Coord {
            x: centre.x - w / 2.0,
            y: centre.y - h / 2.0,
        },
        Coord {
            x: centre.x + w / 2.0,
            y: centre.y + h / 2.0,
        },
    )
}

fn rgb(colour: Colour) -> RGBColor {
    RGBColor(colour.r, colour.g, colour.b)
}

fn text_style(size: u32, pos: Pos) -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, f64::from(size)).into_font())
        .pos(pos)
        .color(&BLACK)
}

impl Scene {
    /// Draw the scene as an SVG document
    pub fn to_svg(&self, figure: &FigureParameters) -> Result<String> {
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (figure.width, figure.height)).into_drawing_area();
            self.draw(&root, figure)?;
            root.present()?;
        }

        Ok(svg)
    }

    /// Draw the scene onto a drawing area
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, figure: &FigureParameters) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        // Space taken up by the margins and the title
        let (width, height) = root.dim_in_pixel();
        let plot_width = width.saturating_sub(2 * figure.margin);
        let plot_height = height.saturating_sub(2 * figure.margin + 2 * figure.title_font_size);
        let extent = fit_extent(self.extent, plot_width, plot_height);

        let mut chart = ChartBuilder::on(root)
            .margin(figure.margin)
            .margin_top(figure.margin + 2 * figure.title_font_size)
            .build_cartesian_2d(extent.min().x..extent.max().x, extent.min().y..extent.max().y)?;

        chart.draw_series(self.outlines.iter().map(|ring| {
            let points: Vec<_> = ring.coords().map(|c| (c.x, c.y)).collect();
            PathElement::new(points, BLACK.stroke_width(1))
        }))?;

        chart.draw_series(self.segments.iter().map(|segment| {
            let style = rgb(segment.class.colour()).stroke_width(figure.stroke_width(segment.width));
            PathElement::new(
                vec![
                    (segment.origin.x(), segment.origin.y()),
                    (segment.destination.x(), segment.destination.y()),
                ],
                style,
            )
        }))?;

        chart.draw_series(
            self.markers
                .iter()
                .map(|point| Circle::new((point.x(), point.y()), figure.marker_size, RED.filled())),
        )?;

        let label_style = text_style(figure.label_font_size, Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(self.labels.iter().map(|label| {
            Text::new(
                label.text.clone(),
                (label.position.x(), label.position.y()),
                label_style.clone(),
            )
        }))?;

        self.draw_legend(root, figure)?;

        root.draw(&Text::new(
            self.title.as_str(),
            ((width / 2) as i32, figure.margin as i32),
            text_style(figure.title_font_size, Pos::new(HPos::Center, VPos::Top)),
        ))?;

        Ok(())
    }

    /// Draw the legend in the lower-left corner of the drawing area
    fn draw_legend<DB>(&self, root: &DrawingArea<DB, Shift>, figure: &FigureParameters) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        const SAMPLE_LENGTH: i32 = 30;
        const PADDING: i32 = 10;

        let font_size = figure.legend_font_size as i32;
        let row_height = font_size * 3 / 2;
        let rows = self.legend.len() as i32 + 1;
        let longest = self
            .legend
            .iter()
            .map(|entry| entry.label.len())
            .chain([LEGEND_TITLE.len()])
            .max()
            .unwrap_or_default() as i32;

        let (_, height) = root.dim_in_pixel();
        let left = figure.margin as i32 + PADDING;
        let bottom = height as i32 - figure.margin as i32 - PADDING;
        let top = bottom - rows * row_height - 2 * PADDING;
        let right = left + 3 * PADDING + SAMPLE_LENGTH + longest * font_size * 3 / 5;

        root.draw(&Rectangle::new([(left, top), (right, bottom)], WHITE.filled()))?;
        root.draw(&Rectangle::new(
            [(left, top), (right, bottom)],
            BLACK.stroke_width(1),
        ))?;

        let title_style = text_style(figure.legend_font_size, Pos::new(HPos::Center, VPos::Center));
        let row_centre = |row: i32| top + PADDING + row * row_height + row_height / 2;
        root.draw(&Text::new(
            LEGEND_TITLE,
            ((left + right) / 2, row_centre(0)),
            title_style,
        ))?;

        let entry_style = text_style(figure.legend_font_size, Pos::new(HPos::Left, VPos::Center));
        for (row, entry) in (1..).zip(&self.legend) {
            let y = row_centre(row);
            let sample_start = left + PADDING;
            let style =
                rgb(entry.class.colour()).stroke_width(figure.stroke_width(entry.class.width()));
            root.draw(&PathElement::new(
                vec![(sample_start, y), (sample_start + SAMPLE_LENGTH, y)],
                style,
            ))?;
            root.draw(&Text::new(
                entry.label,
                (sample_start + SAMPLE_LENGTH + PADDING, y),
                entry_style.clone(),
            ))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{cities, segments};
    use float_cmp::approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_render_single_flow(cities: CityMap) {
        let all = [ClassifiedSegment::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            2020,
            150.0,
            Default::default(),
        )];

        let scene = render(2020, &all, &cities, "Flows");
        assert_eq!(scene.title, "Flows - Year 2020");
        assert_eq!(scene.segments.len(), 1);
        let segment = scene.segments[0];
        assert_eq!(segment.origin, Point::new(0.0, 0.0));
        assert_eq!(segment.destination, Point::new(10.0, 0.0));
        assert_eq!(segment.class, FlowClass::Neutral);
        assert!(approx_eq!(f64, segment.width, 0.3));

        assert!(render(2019, &all, &cities, "Flows").segments.is_empty());
    }

    #[rstest]
    fn test_render_filters_by_year(cities: CityMap, segments: Vec<ClassifiedSegment>) {
        let scene = render(2020, &segments, &cities, "Flows");
        assert_eq!(scene.segments.len(), 3);
        assert!(scene.segments.iter().all(|s| s.year == 2020));
        assert_eq!(
            scene.segments.iter().map(|s| s.class).collect::<Vec<_>>(),
            [FlowClass::Neutral, FlowClass::Low, FlowClass::Undefined]
        );

        let scene = render(2021, &segments, &cities, "Flows");
        assert_eq!(scene.segments.len(), 1);
        assert_eq!(scene.segments[0].class, FlowClass::High);
        assert!(approx_eq!(f64, scene.segments[0].width, 2.5));
    }

    #[rstest]
    fn test_render_missing_year(cities: CityMap, segments: Vec<ClassifiedSegment>) {
        let scene = render(1999, &segments, &cities, "Flows");
        assert!(scene.segments.is_empty());
        assert_eq!(scene.outlines.len(), 3);
        assert_eq!(scene.markers.len(), 3);
        assert_eq!(
            scene.labels.iter().map(|l| l.text.as_str()).collect::<Vec<_>>(),
            ["A", "B", "C"]
        );
        assert_eq!(
            scene.legend.iter().map(|e| e.label).collect::<Vec<_>>(),
            ["0-300", "300-1000", "1000-2500", "2500-9000"]
        );
    }

    #[rstest]
    fn test_render_idempotent(cities: CityMap, segments: Vec<ClassifiedSegment>) {
        let first = render(2020, &segments, &cities, "Flows");
        let second = render(2020, &segments, &cities, "Flows");
        assert_eq!(first, second);

        let figure = FigureParameters::default();
        assert_eq!(first.to_svg(&figure).unwrap(), second.to_svg(&figure).unwrap());
    }

    #[rstest]
    fn test_to_svg(cities: CityMap, segments: Vec<ClassifiedSegment>) {
        let svg = render(2020, &segments, &cities, "Flows")
            .to_svg(&FigureParameters::default())
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Flows - Year 2020"));
        assert!(svg.contains(LEGEND_TITLE));
        for text in ["A", "B", "C", "0-300", "2500-9000"] {
            assert!(svg.contains(&format!("\n{text}\n</text>")), "Missing text: {text}");
        }
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[rstest]
    fn test_to_svg_title_on_top(cities: CityMap, segments: Vec<ClassifiedSegment>) {
        let svg = render(2020, &segments, &cities, "Flows")
            .to_svg(&FigureParameters::default())
            .unwrap();
        let title_at = svg.find("\nFlows - Year 2020\n").unwrap();
        assert!(title_at > svg.rfind("<polyline").unwrap());
        assert!(title_at > svg.rfind("<circle").unwrap());
        assert!(title_at > svg.find(&format!("\n{LEGEND_TITLE}\n")).unwrap());
        assert_eq!(svg.rfind("<text"), svg[..title_at].rfind("<text"));
    }

    #[rstest]
    fn test_to_svg_font_size_in_points(cities: CityMap) {
        // 24pt is 19.35px
        let svg = render(2020, &[], &cities, "Flows")
            .to_svg(&FigureParameters::default())
            .unwrap();
        assert!(svg.contains("font-size=\"19.35"));
    }

    #[rstest]
    fn test_to_svg_empty_scene(cities: CityMap) {
        let svg = render(2020, &[], &cities, "Flows")
            .to_svg(&FigureParameters::default())
            .unwrap();
        assert!(svg.contains(LEGEND_TITLE));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[rstest]
    #[case(100, 100)]
    #[case(200, 100)]
    #[case(100, 300)]
    fn test_fit_extent_aspect(#[case] width: u32, #[case] height: u32) {
        let extent = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 20.0 });
        let fitted = fit_extent(extent, width, height);
        assert!(approx_eq!(
            f64,
            fitted.width() / fitted.height(),
            f64::from(width) / f64::from(height),
            epsilon = 1e-9
        ));
        assert!(fitted.min().x <= 0.0 && fitted.min().y < 0.0);
        assert!(fitted.max().x >= 10.0 && fitted.max().y > 20.0);
        assert_eq!(fitted.center(), extent.center());
    }
}
