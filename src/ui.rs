use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph,
        Row, Table, Tabs, Widget, Wrap,
    },
};
use std::collections::HashMap;

use crate::dataset::Value;
use crate::domain::EdaConfig;
use crate::model::{Model, StatusKind, Tab, UIData};
use crate::views::{
    BarSeries, CorrelationMatrix, DTypeRow, DataGrid, DerivedView, DescribeRow, HeatmapGrid,
    Histogram, MissingRow, ScatterSeries,
};

pub const COLUMN_WIDTH_MARGIN: usize = 1;
pub const HEATMAP_CELL_WIDTH: usize = 9;
const BAR_SCALE: f64 = 1000.0;

#[derive(Debug)]
pub struct TableUI {
    max_column_width: usize,
}

impl TableUI {
    pub fn new(config: &EdaConfig) -> Self {
        Self {
            max_column_width: config.max_column_width,
        }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [tabs_area, selector_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(Self::tabs(uidata), tabs_area);
        frame.render_widget(Self::selector(uidata), selector_area);
        self.render_body(uidata, body_area, frame.buffer_mut());
        self.render_statusline(uidata, status_area, frame);

        if uidata.show_popup {
            Self::render_popup(&uidata.popup_message, frame);
        }
    }

    fn tabs(uidata: &UIData) -> Tabs<'static> {
        let titles = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, t)| format!("{} {}", idx + 1, t.title()))
            .collect::<Vec<String>>();
        let title = if uidata.dataset.is_empty() {
            Line::from(" EDA Dashboard ".bold())
        } else {
            Line::from(vec![
                " EDA Dashboard ".bold(),
                "- ".into(),
                Span::from(uidata.dataset.clone()).yellow(),
                " ".into(),
            ])
        };
        Tabs::new(titles)
            .select(uidata.tab.index())
            .block(Block::bordered().title(title.centered()))
            .highlight_style(Style::new().bold().yellow())
    }

    fn field_span(uidata: &UIData, idx: Option<usize>) -> Span<'static> {
        idx.and_then(|i| uidata.fields.get(i))
            .map(|f| Span::from(f.clone()).bold().cyan())
            .unwrap_or_else(|| Span::from("-"))
    }

    fn selector(uidata: &UIData) -> Paragraph<'static> {
        let line = match uidata.tab {
            Tab::Distribution | Tab::Bar => Line::from(vec![
                " Variable ".into(),
                "<Left/Right>".blue(),
                ": ".into(),
                Self::field_span(uidata, uidata.selected_field),
            ]),
            Tab::Scatter => Line::from(vec![
                " X ".into(),
                "<Left/Right>".blue(),
                ": ".into(),
                Self::field_span(uidata, uidata.selected_field),
                "   Y ".into(),
                "<[/]>".blue(),
                ": ".into(),
                Self::field_span(uidata, uidata.selected_field_y),
            ]),
            Tab::Heatmap => {
                let mut spans: Vec<Span> = vec![" Columns ".into(), "<Space>".blue(), ": ".into()];
                for (idx, name) in uidata.fields.iter().enumerate() {
                    let marker = match uidata.heatmap_selection.iter().position(|&s| s == idx) {
                        Some(pos) => format!("[{}]", pos + 1),
                        None => "[ ]".to_string(),
                    };
                    let span = Span::from(format!("{marker} {name} "));
                    spans.push(if idx == uidata.heatmap_cursor {
                        span.reversed()
                    } else {
                        span
                    });
                }
                Line::from(spans)
            }
            _ => Line::from(vec![
                " Open ".into(),
                "<o>".blue(),
                " Copy ".into(),
                "<y>".blue(),
                " Help ".into(),
                "<?>".blue(),
                " Quit ".into(),
                "<q>".blue(),
            ]),
        };
        Paragraph::new(line)
    }

    fn render_body(&self, uidata: &UIData, area: Rect, buf: &mut Buffer) {
        let Some(view) = &uidata.view else {
            let message = uidata.view_message.clone().unwrap_or_default();
            let style = match uidata.status_kind {
                StatusKind::Error => Style::new().red(),
                _ => Style::new().yellow(),
            };
            Paragraph::new(Line::from(Span::styled(message, style)))
                .block(Block::bordered())
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        };

        let offset = uidata.offset_row;
        match view {
            DerivedView::Data(grid) => self.render_grid(grid, offset, area, buf),
            DerivedView::Summary(rows) => Self::render_summary(rows, offset, area, buf),
            DerivedView::Types(rows) => Self::render_types(rows, offset, area, buf),
            DerivedView::Missing(rows) => Self::render_missing(rows, offset, area, buf),
            DerivedView::Correlation(m) => Self::render_correlation(m, offset, area, buf),
            DerivedView::Histogram(h) => Self::render_histogram(h, area, buf),
            DerivedView::Bar(b) => Self::render_bars(b, offset, area, buf),
            DerivedView::Scatter(s) => Self::render_scatter(s, area, buf),
            DerivedView::Heatmap(g) => Self::render_heatmap(g, offset, area, buf),
        }
    }

    fn get_visible_name(name: &str, width: usize) -> String {
        if width < 3 {
            return String::new();
        }
        if name.chars().count() > width {
            let mut reduced: String = name.chars().take(width - 3).collect();
            reduced.push_str("...");
            return reduced;
        }
        name.to_string()
    }

    fn column_width(&self, name: &str, data: &[String]) -> usize {
        let widest = data.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        (name.chars().count().max(widest) + COLUMN_WIDTH_MARGIN).min(self.max_column_width)
    }

    fn render_grid(&self, grid: &DataGrid, offset: usize, area: Rect, buf: &mut Buffer) {
        let visible_rows = (area.height as usize).saturating_sub(3);
        let rbegin = offset.min(grid.nrows());
        let rend = (rbegin + visible_rows).min(grid.nrows());

        let columns = std::iter::once(&grid.index).chain(grid.columns.iter());
        let widths: Vec<usize> = columns
            .clone()
            .map(|c| self.column_width(&c.name, &c.data[rbegin..rend]))
            .collect();

        let header = Row::new(
            columns
                .clone()
                .zip(widths.iter())
                .map(|(c, &w)| Cell::from(Self::get_visible_name(&c.name, w)))
                .collect::<Vec<Cell>>(),
        )
        .style(Style::new().bold().underlined());

        let rows = (rbegin..rend).map(|r| {
            Row::new(
                columns
                    .clone()
                    .zip(widths.iter())
                    .enumerate()
                    .map(|(idx, (c, &w))| {
                        let cell = Cell::from(Self::get_visible_name(&c.data[r], w));
                        if idx == 0 { cell.dark_gray() } else { cell }
                    })
                    .collect::<Vec<Cell>>(),
            )
        });

        let title = Line::from(vec![
            " No. of Rows: ".into(),
            grid.nrows().to_string().bold(),
            "  No. of Columns: ".into(),
            grid.ncols().to_string().bold(),
            " ".into(),
        ]);
        Widget::render(
            Table::new(rows, widths.iter().map(|&w| Constraint::Length(w as u16)))
                .header(header)
                .block(Block::bordered().title(title)),
            area,
            buf,
        );
    }

    fn report_table<'a>(
        title: &'a str,
        header: Vec<&'a str>,
        rows: Vec<Vec<String>>,
        offset: usize,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let ncols = header.len();
        let mut widths = header.iter().map(|h| h.chars().count()).collect::<Vec<usize>>();
        for row in rows.iter() {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.chars().count());
            }
        }
        let rows = rows.into_iter().skip(offset).map(|row| {
            Row::new(
                row.into_iter()
                    .enumerate()
                    .map(|(idx, c)| {
                        let cell = Cell::from(c);
                        if idx == 0 { cell.bold() } else { cell }
                    })
                    .collect::<Vec<Cell>>(),
            )
        });
        Widget::render(
            Table::new(
                rows,
                widths
                    .iter()
                    .take(ncols)
                    .map(|&w| Constraint::Length(w as u16 + 1)),
            )
            .header(Row::new(header).style(Style::new().bold().underlined()))
            .block(Block::bordered().title(title)),
            area,
            buf,
        );
    }

    fn render_summary(rows: &[DescribeRow], offset: usize, area: Rect, buf: &mut Buffer) {
        if rows.is_empty() {
            Paragraph::new("No numeric columns to summarise.")
                .block(Block::bordered().title(" Summary "))
                .render(area, buf);
            return;
        }
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.field.clone(),
                    r.count.to_string(),
                    format_num(r.mean),
                    format_num(r.std),
                    format_num(r.min),
                    format_num(r.q25),
                    format_num(r.q50),
                    format_num(r.q75),
                    format_num(r.max),
                ]
            })
            .collect();
        Self::report_table(
            " Summary ",
            vec!["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"],
            data,
            offset,
            area,
            buf,
        );
    }

    fn render_types(rows: &[DTypeRow], offset: usize, area: Rect, buf: &mut Buffer) {
        let data = rows
            .iter()
            .map(|r| vec![r.field.clone(), r.dtype.clone(), r.kind.as_str().to_string()])
            .collect();
        Self::report_table(
            " Data Types ",
            vec!["", "Data Types", "Kind"],
            data,
            offset,
            area,
            buf,
        );
    }

    fn render_missing(rows: &[MissingRow], offset: usize, area: Rect, buf: &mut Buffer) {
        let data = rows
            .iter()
            .map(|r| vec![r.field.clone(), r.missing.to_string(), format!("{:.2}", r.percentage)])
            .collect();
        Self::report_table(
            " Missing Values ",
            vec!["", "Missing Values", "Percentage"],
            data,
            offset,
            area,
            buf,
        );
    }

    fn render_correlation(m: &CorrelationMatrix, offset: usize, area: Rect, buf: &mut Buffer) {
        if m.fields.is_empty() {
            Paragraph::new("No numeric columns for a correlation matrix.")
                .block(Block::bordered().title(" Correlation Matrix "))
                .render(area, buf);
            return;
        }
        let label_width = m.fields.iter().map(|f| f.chars().count()).max().unwrap_or(0) + 1;
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(m.fields.iter().map(|f| {
                    Cell::from(Self::get_visible_name(f, HEATMAP_CELL_WIDTH - 1))
                }))
                .collect::<Vec<Cell>>(),
        )
        .style(Style::new().bold());
        let rows = m
            .fields
            .iter()
            .zip(m.values.iter())
            .skip(offset)
            .map(|(name, values)| {
                Row::new(
                    std::iter::once(Cell::from(name.clone()).bold())
                        .chain(values.iter().map(|&v| {
                            Cell::from(format!("{:>7}", format_corr(v)))
                                .style(intensity_style(v, -1.0, 1.0))
                        }))
                        .collect::<Vec<Cell>>(),
                )
            });
        let widths = std::iter::once(Constraint::Length(label_width as u16)).chain(
            m.fields
                .iter()
                .map(|_| Constraint::Length(HEATMAP_CELL_WIDTH as u16)),
        );
        Widget::render(
            Table::new(rows, widths)
                .header(header)
                .block(Block::bordered().title(" Correlation Matrix ")),
            area,
            buf,
        );
    }

    fn render_histogram(h: &Histogram, area: Rect, buf: &mut Buffer) {
        let counts = h.counts();
        let title = format!(" Distribution of {} ", h.field);
        let block = Block::bordered().title(title).title_bottom(
            Line::from(format!(" missing: {} ", h.missing)).right_aligned(),
        );
        if counts.is_empty() {
            Paragraph::new("No values to bin.").block(block).render(area, buf);
            return;
        }
        let bar_width = bar_width(area.width, counts.len());
        let bars = counts
            .iter()
            .map(|(label, count)| {
                Bar::default()
                    .value(*count as u64)
                    .label(Line::from(Self::get_visible_name(label, bar_width as usize)))
            })
            .collect::<Vec<Bar>>();
        BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::new().cyan())
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }

    fn render_bars(b: &BarSeries, offset: usize, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title(format!(" Bar Chart of {} ", b.field));
        let max = b
            .bars
            .iter()
            .filter_map(|(_, v)| v.as_number())
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));

        let bar_width: u16 = 7;
        let visible = (area.width.saturating_sub(2) / (bar_width + 1)).max(1) as usize;
        let bars = b
            .bars
            .iter()
            .skip(offset)
            .take(visible)
            .map(|(label, value)| {
                let negative = value.as_number().is_some_and(|v| v < 0.0);
                let bar = Bar::default()
                    .value(bar_height(value, max))
                    .text_value(format_value(value))
                    .label(Line::from(Self::get_visible_name(label, bar_width as usize)));
                // Negative values are drawn by magnitude in red.
                if negative { bar.style(Style::new().red()) } else { bar }
            })
            .collect::<Vec<Bar>>();
        BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(1)
            .bar_style(Style::new().cyan())
            .max(BAR_SCALE as u64)
            .data(BarGroup::default().bars(&bars))
            .render(area, buf);
    }

    fn render_scatter(s: &ScatterSeries, area: Rect, buf: &mut Buffer) {
        let xs = AxisMapping::from_values(s.points.iter().map(|p| &p.0));
        let ys = AxisMapping::from_values(s.points.iter().map(|p| &p.1));
        let points = s
            .points
            .iter()
            .filter_map(|(x, y)| Some((xs.position(x)?, ys.position(y)?)))
            .collect::<Vec<(f64, f64)>>();

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Scatter)
            .style(Style::new().cyan())
            .data(&points);
        Chart::new(vec![dataset])
            .block(Block::bordered().title(format!(" {} vs {} ", s.y_field, s.x_field)))
            .x_axis(
                Axis::default()
                    .title(s.x_field.clone())
                    .bounds(xs.bounds())
                    .labels(xs.labels()),
            )
            .y_axis(
                Axis::default()
                    .title(s.y_field.clone())
                    .bounds(ys.bounds())
                    .labels(ys.labels()),
            )
            .render(area, buf);
    }

    fn render_heatmap(g: &HeatmapGrid, offset: usize, area: Rect, buf: &mut Buffer) {
        let visible_rows = (area.height as usize).saturating_sub(3);
        let (lo, hi) = g.range.unwrap_or((0.0, 1.0));
        let label_width = g.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) + 1;
        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(g.fields.iter().map(|f| {
                    Cell::from(Self::get_visible_name(f, HEATMAP_CELL_WIDTH - 1))
                }))
                .collect::<Vec<Cell>>(),
        )
        .style(Style::new().bold());
        let rows = g
            .rows
            .iter()
            .zip(g.cells.iter())
            .skip(offset)
            .take(visible_rows)
            .map(|(label, cells)| {
                Row::new(
                    std::iter::once(Cell::from(label.clone()).dark_gray())
                        .chain(cells.iter().map(|v| match v {
                            Some(v) => Cell::from(format!("{:>8}", format_num(*v)))
                                .style(intensity_style(*v, lo, hi)),
                            None => Cell::from(""),
                        }))
                        .collect::<Vec<Cell>>(),
                )
            });
        let widths = std::iter::once(Constraint::Length(label_width as u16)).chain(
            g.fields
                .iter()
                .map(|_| Constraint::Length(HEATMAP_CELL_WIDTH as u16)),
        );
        Widget::render(
            Table::new(rows, widths)
                .header(header)
                .block(Block::bordered().title(" Heatmap of Selected Variables ")),
            area,
            buf,
        );
    }

    fn render_statusline(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        if uidata.active_cmdinput {
            let prompt = " Open CSV: ";
            let line = Line::from(vec![
                prompt.bold(),
                Span::from(uidata.cmdinput.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let x = area.x + (prompt.len() + uidata.cmdinput.cursor_pos) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
            return;
        }
        let style = match uidata.status_kind {
            StatusKind::Info => Style::new().blue(),
            StatusKind::Success => Style::new().green(),
            StatusKind::Warning => Style::new().yellow(),
            StatusKind::Error => Style::new().red().bold(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {}", uidata.status_message),
                style,
            ))),
            area,
        );
    }

    fn render_popup(message: &str, frame: &mut Frame) {
        let area = frame.area();
        let width = (message.lines().map(|l| l.len()).max().unwrap_or(0) as u16 + 4).min(area.width);
        let height = (message.lines().count() as u16 + 2).min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(Text::from(message.to_string()))
                .block(Block::bordered().title(" Help ".bold()).title_bottom(" <Esc> ")),
            popup,
        );
    }
}

/// Maps values of one scatter axis to chart coordinates. Text values sit on an
/// ordinal axis in order of first appearance.
struct AxisMapping {
    categories: Vec<String>,
    positions: HashMap<String, usize>,
    min: f64,
    max: f64,
}

impl AxisMapping {
    fn from_values<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        let mut mapping = AxisMapping {
            categories: Vec::new(),
            positions: HashMap::new(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        };
        for value in values {
            match value {
                Value::Number(v) if v.is_finite() => {
                    mapping.min = mapping.min.min(*v);
                    mapping.max = mapping.max.max(*v);
                }
                Value::Text(s) if !mapping.positions.contains_key(s) => {
                    mapping.positions.insert(s.clone(), mapping.categories.len());
                    mapping.categories.push(s.clone());
                }
                _ => {}
            }
        }
        mapping
    }

    fn position(&self, value: &Value) -> Option<f64> {
        match value {
            Value::Number(v) if v.is_finite() => Some(*v),
            Value::Text(s) => self.positions.get(s).map(|&p| p as f64),
            _ => None,
        }
    }

    fn bounds(&self) -> [f64; 2] {
        if !self.categories.is_empty() {
            return [-0.5, self.categories.len() as f64 - 0.5];
        }
        if self.min > self.max {
            return [0.0, 1.0];
        }
        if self.min == self.max {
            return [self.min - 0.5, self.max + 0.5];
        }
        [self.min, self.max]
    }

    fn labels(&self) -> Vec<String> {
        if !self.categories.is_empty() {
            if self.categories.len() <= 8 {
                return self.categories.clone();
            }
            return vec![
                self.categories[0].clone(),
                self.categories[self.categories.len() - 1].clone(),
            ];
        }
        let [lo, hi] = self.bounds();
        vec![format_num(lo), format_num((lo + hi) / 2.0), format_num(hi)]
    }
}

fn bar_height(value: &Value, max: f64) -> u64 {
    match value.as_number() {
        Some(v) if v.is_finite() && max > 0.0 => (v.abs() / max * BAR_SCALE).round() as u64,
        _ => 0,
    }
}

fn bar_width(total_width: u16, nbars: usize) -> u16 {
    let inner = total_width.saturating_sub(2) as usize;
    ((inner / nbars.max(1)).saturating_sub(1)).clamp(1, 12) as u16
}

fn format_num(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    let abs = n.abs();
    if abs != 0.0 && !(1e-3..1e7).contains(&abs) {
        format!("{n:.3e}")
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n:.4}")
    }
}

fn format_corr(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.3}")
    }
}

fn format_value(v: &Value) -> String {
    match v {
        Value::Number(n) => format_num(*n),
        other => other.to_string(),
    }
}

/// Diverging red to blue scale, red at `lo`, white in the middle, blue at `hi`.
fn intensity_style(v: f64, lo: f64, hi: f64) -> Style {
    if v.is_nan() {
        return Style::new().dark_gray();
    }
    let t = if hi > lo {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let (r, g, b) = if t < 0.5 {
        let s = t / 0.5;
        (178.0 + 69.0 * s, 24.0 + 223.0 * s, 43.0 + 204.0 * s)
    } else {
        let s = (t - 0.5) / 0.5;
        (247.0 - 214.0 * s, 247.0 - 145.0 * s, 247.0 - 75.0 * s)
    };
    Style::new()
        .bg(Color::Rgb(r as u8, g as u8, b as u8))
        .fg(Color::Black)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_by_magnitude() {
        assert_eq!(bar_height(&Value::Number(5.0), 10.0), 500);
        assert_eq!(bar_height(&Value::Number(-10.0), 10.0), 1000);
        assert_eq!(bar_height(&Value::Text("foo".into()), 10.0), 0);
        assert_eq!(bar_height(&Value::Missing, 10.0), 0);
        assert_eq!(bar_height(&Value::Number(0.0), 0.0), 0);
    }

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(TableUI::get_visible_name("gc_content", 20), "gc_content");
        assert_eq!(TableUI::get_visible_name("gc_content", 6), "gc_...");
        assert_eq!(TableUI::get_visible_name("gc_content", 2), "");
    }

    #[test]
    fn numbers_are_formatted_compactly() {
        assert_eq!(format_num(3.0), "3");
        assert_eq!(format_num(0.4123456), "0.4123");
        assert_eq!(format_num(f64::NAN), "NaN");
        assert_eq!(format_num(12345678.0), "1.235e7");
    }

    #[test]
    fn text_axis_is_ordinal() {
        let values = vec![
            Value::Text("b".into()),
            Value::Text("a".into()),
            Value::Missing,
            Value::Text("b".into()),
        ];
        let axis = AxisMapping::from_values(values.iter());
        assert_eq!(axis.labels(), vec!["b", "a"]);
        assert_eq!(axis.position(&values[1]), Some(1.0));
        assert_eq!(axis.position(&values[2]), None);
        assert_eq!(axis.bounds(), [-0.5, 1.5]);
    }

    #[test]
    fn numeric_axis_spans_values() {
        let values = vec![Value::Number(2.0), Value::Number(-1.0)];
        let axis = AxisMapping::from_values(values.iter());
        assert_eq!(axis.bounds(), [-1.0, 2.0]);
        assert_eq!(axis.position(&values[0]), Some(2.0));
    }
}
