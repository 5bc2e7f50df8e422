//! Every view the dashboard can show, each computed fresh from a `&Table`.

pub mod charts;
pub mod reports;
pub mod stats;

pub use charts::{
    BarSeries, CorrelationMatrix, HeatmapGrid, Histogram, ScatterSeries, bar_series,
    correlation_matrix, default_heatmap_selection, heatmap_subset, histogram, scatter_series,
};
pub use reports::{
    DTypeRow, DataGrid, DescribeRow, MissingRow, data_grid, describe, dtype_report,
    missing_report,
};

pub enum DerivedView {
    Data(DataGrid),
    Summary(Vec<DescribeRow>),
    Types(Vec<DTypeRow>),
    Missing(Vec<MissingRow>),
    Correlation(CorrelationMatrix),
    Histogram(Histogram),
    Bar(BarSeries),
    Scatter(ScatterSeries),
    Heatmap(HeatmapGrid),
}

fn tsv_line<I, S>(cells: I) -> String
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    cells
        .into_iter()
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join("\t")
}

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl DerivedView {
    /// Tab separated rendering used for clipboard export.
    pub fn to_tsv(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        match self {
            DerivedView::Data(grid) => {
                lines.push(tsv_line(
                    std::iter::once(grid.index.name.as_str())
                        .chain(grid.columns.iter().map(|c| c.name.as_str())),
                ));
                for row in 0..grid.nrows() {
                    lines.push(tsv_line(
                        std::iter::once(grid.index.data[row].as_str())
                            .chain(grid.columns.iter().map(|c| c.data[row].as_str())),
                    ));
                }
            }
            DerivedView::Summary(rows) => {
                lines.push(tsv_line([
                    "", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
                ]));
                for r in rows {
                    lines.push(tsv_line([
                        r.field.clone(),
                        r.count.to_string(),
                        r.mean.to_string(),
                        r.std.to_string(),
                        r.min.to_string(),
                        r.q25.to_string(),
                        r.q50.to_string(),
                        r.q75.to_string(),
                        r.max.to_string(),
                    ]));
                }
            }
            DerivedView::Types(rows) => {
                lines.push(tsv_line(["", "Data Types"]));
                for r in rows {
                    lines.push(tsv_line([r.field.as_str(), r.dtype.as_str()]));
                }
            }
            DerivedView::Missing(rows) => {
                lines.push(tsv_line(["", "Missing Values", "Percentage"]));
                for r in rows {
                    lines.push(tsv_line([
                        r.field.clone(),
                        r.missing.to_string(),
                        r.percentage.to_string(),
                    ]));
                }
            }
            DerivedView::Correlation(m) => {
                lines.push(tsv_line(
                    std::iter::once("").chain(m.fields.iter().map(|f| f.as_str())),
                ));
                for (name, row) in m.fields.iter().zip(m.values.iter()) {
                    lines.push(tsv_line(
                        std::iter::once(name.clone()).chain(row.iter().map(|v| v.to_string())),
                    ));
                }
            }
            DerivedView::Histogram(h) => {
                lines.push(tsv_line([h.field.as_str(), "count"]));
                for (label, count) in h.counts() {
                    lines.push(tsv_line([label, count.to_string()]));
                }
            }
            DerivedView::Bar(b) => {
                lines.push(tsv_line(["", b.field.as_str()]));
                for (label, value) in b.bars.iter() {
                    lines.push(tsv_line([label.clone(), value.to_string()]));
                }
            }
            DerivedView::Scatter(s) => {
                lines.push(tsv_line(["", s.x_field.as_str(), s.y_field.as_str()]));
                for (label, (x, y)) in s.labels.iter().zip(s.points.iter()) {
                    lines.push(tsv_line([label.clone(), x.to_string(), y.to_string()]));
                }
            }
            DerivedView::Heatmap(g) => {
                lines.push(tsv_line(
                    std::iter::once("").chain(g.fields.iter().map(|f| f.as_str())),
                ));
                for (label, row) in g.rows.iter().zip(g.cells.iter()) {
                    lines.push(tsv_line(
                        std::iter::once(label.clone()).chain(row.iter().map(|v| cell(*v))),
                    ));
                }
            }
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{ASSEMBLIES, table};

    #[test]
    fn missing_report_as_tsv() {
        let t = table(ASSEMBLIES);
        let view = DerivedView::Missing(missing_report(&t).unwrap());
        assert_eq!(
            view.to_tsv(),
            "\tMissing Values\tPercentage\nlength\t0\t0\ngc_content\t1\t33.33\nn_count\t0\t0"
        );
    }

    #[test]
    fn data_grid_as_tsv() {
        let t = table("id,x,s\na,1,foo\nb,,bar\n");
        let view = DerivedView::Data(data_grid(&t).unwrap());
        assert_eq!(view.to_tsv(), "id\tx\ts\na\t1\tfoo\nb\t∅\tbar");
    }

    #[test]
    fn heatmap_as_tsv_leaves_missing_blank() {
        let t = table("id,x,s\na,1,foo\nb,,bar\n");
        let fields = vec!["x".to_string(), "s".to_string()];
        let view = DerivedView::Heatmap(heatmap_subset(&t, &fields).unwrap());
        assert_eq!(view.to_tsv(), "\tx\ts\na\t1\t\nb\t\t");
    }
}
