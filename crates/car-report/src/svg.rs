//! Standalone SVG rendering of a [`PlotSpec`].

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::palette::color;
use crate::render::{Chart, NoData, PlotSpec, RenderIssue};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 56.0;
const TICKS: usize = 5;
const GRID_COLOR: &str = "#e0e0e0";
const AXIS_COLOR: &str = "#333333";
const ISSUE_COLOR: &str = "#b00020";

/// Maps data coordinates into the plot area.
struct Frame {
    x_max: f64,
    y_max: f64,
}

impl Frame {
    fn width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn left() -> f64 {
        MARGIN_LEFT
    }

    fn right() -> f64 {
        WIDTH - MARGIN_RIGHT
    }

    fn top() -> f64 {
        MARGIN_TOP
    }

    fn bottom() -> f64 {
        HEIGHT - MARGIN_BOTTOM
    }

    fn x(&self, time: f64) -> f64 {
        Self::left() + time / self.x_max * Self::width()
    }

    fn y(&self, value: f64) -> f64 {
        Self::bottom() - value / self.y_max * Self::height()
    }
}

/// Write `spec` as an SVG document.
pub fn write_svg<W: Write>(spec: &PlotSpec, writer: W) -> Result<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS));
    root.push_attribute(("width", coord(WIDTH).as_str()));
    root.push_attribute(("height", coord(HEIGHT).as_str()));
    root.push_attribute((
        "viewBox",
        format!("0 0 {} {}", coord(WIDTH), coord(HEIGHT)).as_str(),
    ));
    root.push_attribute(("font-family", "sans-serif"));
    xml.write_event(Event::Start(root))?;

    write_rect(&mut xml, 0.0, 0.0, WIDTH, HEIGHT, &[("fill", "white")])?;
    match spec {
        PlotSpec::Chart(chart) => write_chart(&mut xml, chart)?,
        PlotSpec::NoData(no_data) => write_placeholder(&mut xml, no_data)?,
    }

    xml.write_event(Event::End(BytesEnd::new("svg")))?;
    Ok(())
}

/// Render to an in-memory SVG string.
pub fn svg_string(spec: &PlotSpec) -> Result<String> {
    let mut buffer = Vec::new();
    write_svg(spec, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_chart<W: Write>(xml: &mut Writer<W>, chart: &Chart) -> Result<()> {
    let frame = Frame {
        x_max: chart.x_max(),
        y_max: chart.y_max,
    };

    write_text(
        xml,
        WIDTH / 2.0,
        28.0,
        &[("text-anchor", "middle"), ("font-size", "16")],
        &chart.title,
    )?;
    write_issues(xml, &chart.issues, MARGIN_LEFT, 46.0)?;

    if chart.show_grid {
        for i in 0..=TICKS {
            let x = frame.x(frame.x_max * i as f64 / TICKS as f64);
            let y = frame.y(frame.y_max * i as f64 / TICKS as f64);
            write_line(xml, (x, Frame::top()), (x, Frame::bottom()), GRID_COLOR, None)?;
            write_line(xml, (Frame::left(), y), (Frame::right(), y), GRID_COLOR, None)?;
        }
    }
    write_axes(xml, &frame, chart)?;

    for series in &chart.series {
        let points = series
            .points
            .iter()
            .map(|&(t, v)| format!("{},{}", coord(frame.x(t)), coord(frame.y(v))))
            .collect::<Vec<_>>()
            .join(" ");
        let mut polyline = BytesStart::new("polyline");
        polyline.push_attribute(("points", points.as_str()));
        polyline.push_attribute(("fill", "none"));
        polyline.push_attribute(("stroke", color(series.style.color)));
        polyline.push_attribute(("stroke-width", "2"));
        if let Some(dash) = series.style.dash.dasharray() {
            polyline.push_attribute(("stroke-dasharray", dash));
        }
        xml.write_event(Event::Start(polyline))?;
        write_element_text(xml, "title", &series.label)?;
        xml.write_event(Event::End(BytesEnd::new("polyline")))?;
    }

    write_legend(xml, chart)?;
    write_compositions(xml, chart)?;
    Ok(())
}

fn write_axes<W: Write>(xml: &mut Writer<W>, frame: &Frame, chart: &Chart) -> Result<()> {
    let origin = (Frame::left(), Frame::bottom());
    write_line(xml, origin, (Frame::right(), Frame::bottom()), AXIS_COLOR, None)?;
    write_line(xml, origin, (Frame::left(), Frame::top()), AXIS_COLOR, None)?;

    for i in 0..=TICKS {
        let t = frame.x_max * i as f64 / TICKS as f64;
        let v = frame.y_max * i as f64 / TICKS as f64;
        write_text(
            xml,
            frame.x(t),
            Frame::bottom() + 18.0,
            &[("text-anchor", "middle"), ("font-size", "11")],
            &tick(t),
        )?;
        write_text(
            xml,
            Frame::left() - 8.0,
            frame.y(v) + 4.0,
            &[("text-anchor", "end"), ("font-size", "11")],
            &tick(v),
        )?;
    }

    write_text(
        xml,
        Frame::left() + Frame::width() / 2.0,
        HEIGHT - 14.0,
        &[("text-anchor", "middle"), ("font-size", "13")],
        &chart.x_label,
    )?;
    let y_center = Frame::top() + Frame::height() / 2.0;
    let rotate = format!("rotate(-90 20 {})", coord(y_center));
    write_text(
        xml,
        20.0,
        y_center,
        &[
            ("text-anchor", "middle"),
            ("font-size", "13"),
            ("transform", rotate.as_str()),
        ],
        &chart.y_label,
    )
}

/// Line samples and labels, upper left of the plot area.
fn write_legend<W: Write>(xml: &mut Writer<W>, chart: &Chart) -> Result<()> {
    let x0 = Frame::left() + 12.0;
    for (i, series) in chart.series.iter().enumerate() {
        let y = Frame::top() + 16.0 + i as f64 * 18.0;
        write_line(
            xml,
            (x0, y),
            (x0 + 24.0, y),
            color(series.style.color),
            series.style.dash.dasharray(),
        )?;
        write_text(
            xml,
            x0 + 30.0,
            y + 4.0,
            &[("font-size", "12")],
            &series.label,
        )?;
    }
    Ok(())
}

/// Composition lines, lower right of the plot area.
fn write_compositions<W: Write>(xml: &mut Writer<W>, chart: &Chart) -> Result<()> {
    let lines: Vec<String> = chart.compositions.iter().map(|c| c.line()).collect();
    if lines.is_empty() {
        return Ok(());
    }
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let box_width = longest as f64 * 6.2 + 16.0;
    let box_height = lines.len() as f64 * 16.0 + 10.0;
    let right = Frame::right() - 8.0;
    let bottom = Frame::bottom() - 8.0;

    write_rect(
        xml,
        right - box_width,
        bottom - box_height,
        box_width,
        box_height,
        &[
            ("fill", "white"),
            ("fill-opacity", "0.85"),
            ("stroke", "#999999"),
        ],
    )?;
    for (i, line) in lines.iter().enumerate() {
        let y = bottom - box_height + 20.0 + i as f64 * 16.0;
        write_text(
            xml,
            right - 8.0,
            y,
            &[("text-anchor", "end"), ("font-size", "11")],
            line,
        )?;
    }
    Ok(())
}

fn write_placeholder<W: Write>(xml: &mut Writer<W>, no_data: &NoData) -> Result<()> {
    let center = WIDTH / 2.0;
    write_text(
        xml,
        center,
        HEIGHT / 2.0 - 12.0,
        &[
            ("text-anchor", "middle"),
            ("font-size", "22"),
            ("fill", "#777777"),
        ],
        "No data",
    )?;
    write_text(
        xml,
        center,
        HEIGHT / 2.0 + 14.0,
        &[("text-anchor", "middle"), ("font-size", "13")],
        &no_data.message,
    )?;
    write_issues(xml, &no_data.issues, MARGIN_LEFT, HEIGHT / 2.0 + 44.0)
}

fn write_issues<W: Write>(
    xml: &mut Writer<W>,
    issues: &[RenderIssue],
    x: f64,
    y: f64,
) -> Result<()> {
    for (i, issue) in issues.iter().enumerate() {
        write_text(
            xml,
            x,
            y + i as f64 * 14.0,
            &[("font-size", "11"), ("fill", ISSUE_COLOR)],
            &format!("Omitted {issue}"),
        )?;
    }
    Ok(())
}

fn write_line<W: Write>(
    xml: &mut Writer<W>,
    from: (f64, f64),
    to: (f64, f64),
    stroke: &str,
    dash: Option<&str>,
) -> Result<()> {
    let mut line = BytesStart::new("line");
    line.push_attribute(("x1", coord(from.0).as_str()));
    line.push_attribute(("y1", coord(from.1).as_str()));
    line.push_attribute(("x2", coord(to.0).as_str()));
    line.push_attribute(("y2", coord(to.1).as_str()));
    line.push_attribute(("stroke", stroke));
    if let Some(dash) = dash {
        line.push_attribute(("stroke-dasharray", dash));
    }
    xml.write_event(Event::Empty(line))?;
    Ok(())
}

fn write_rect<W: Write>(
    xml: &mut Writer<W>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    attrs: &[(&str, &str)],
) -> Result<()> {
    let mut rect = BytesStart::new("rect");
    rect.push_attribute(("x", coord(x).as_str()));
    rect.push_attribute(("y", coord(y).as_str()));
    rect.push_attribute(("width", coord(width).as_str()));
    rect.push_attribute(("height", coord(height).as_str()));
    for &attr in attrs {
        rect.push_attribute(attr);
    }
    xml.write_event(Event::Empty(rect))?;
    Ok(())
}

fn write_text<W: Write>(
    xml: &mut Writer<W>,
    x: f64,
    y: f64,
    attrs: &[(&str, &str)],
    content: &str,
) -> Result<()> {
    let mut text = BytesStart::new("text");
    text.push_attribute(("x", coord(x).as_str()));
    text.push_attribute(("y", coord(y).as_str()));
    for &attr in attrs {
        text.push_attribute(attr);
    }
    xml.write_event(Event::Start(text))?;
    xml.write_event(Event::Text(BytesText::new(content)))?;
    xml.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}

fn write_element_text<W: Write>(xml: &mut Writer<W>, name: &str, content: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(content)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn coord(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

fn tick(value: f64) -> String {
    if value >= 10.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
