use polars::prelude::*;
use std::collections::HashMap;
use tracing::trace;

use super::stats;
use crate::dataset::{Table, Value};
use crate::domain::EdaError;

/// Pearson correlation between every pair of numeric fields.
#[derive(Clone, Debug)]
pub struct CorrelationMatrix {
    pub fields: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row][column]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumericBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HistogramBins {
    Numeric(Vec<NumericBin>),
    Categorical(Vec<(String, usize)>),
}

#[derive(Clone, Debug)]
pub struct Histogram {
    pub field: String,
    pub bins: HistogramBins,
    /// Missing or non-finite cells, not part of any bin.
    pub missing: usize,
}

impl Histogram {
    /// Bin labels and counts in axis order.
    pub fn counts(&self) -> Vec<(String, usize)> {
        match &self.bins {
            HistogramBins::Numeric(bins) => bins
                .iter()
                .map(|b| (format!("{}-{}", format_bound(b.start), format_bound(b.end)), b.count))
                .collect(),
            HistogramBins::Categorical(values) => values.clone(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, c)| c).sum()
    }
}

#[derive(Clone, Debug)]
pub struct BarSeries {
    pub field: String,
    pub bars: Vec<(String, Value)>,
}

#[derive(Clone, Debug)]
pub struct ScatterSeries {
    pub x_field: String,
    pub y_field: String,
    pub labels: Vec<String>,
    pub points: Vec<(Value, Value)>,
}

#[derive(Clone, Debug)]
pub struct HeatmapGrid {
    pub fields: Vec<String>,
    pub rows: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
    pub range: Option<(f64, f64)>,
}

fn format_bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}

/// Numeric and boolean fields correlated pairwise over the rows where both are
/// present. Undefined pairs are NaN, the diagonal is 1.
pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix, EdaError> {
    let fields: Vec<String> = table
        .fields()
        .iter()
        .filter(|f| f.is_quantitative())
        .map(|f| f.name.clone())
        .collect();
    let n = fields.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let mut values = vec![vec![1.0; n]; n];
    if !pairs.is_empty() {
        let exprs: Vec<Expr> = pairs
            .iter()
            .map(|&(i, j)| {
                let a = col(fields[i].as_str()).cast(DataType::Float64);
                let b = col(fields[j].as_str()).cast(DataType::Float64);
                let both = a.clone().is_not_null().and(b.clone().is_not_null());
                pearson_corr(a.filter(both.clone()), b.filter(both)).alias(format!("{i}_{j}"))
            })
            .collect();
        let corr = table.lazy().select(exprs).collect()?;
        for &(i, j) in pairs.iter() {
            let r = stats::first_f64(&corr, &format!("{i}_{j}"))?;
            let r = if r.is_finite() { r.clamp(-1.0, 1.0) } else { f64::NAN };
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    trace!("Correlation matrix over {n} fields");
    Ok(CorrelationMatrix { fields, values })
}

pub fn histogram(table: &Table, field: &str) -> Result<Histogram, EdaError> {
    let f = table.field(field)?;
    if f.is_numeric() {
        let numbers = table.numbers(field)?;
        let values: Vec<f64> = numbers
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect();
        // Infinite values cannot be binned and are counted with the missing ones.
        let missing = numbers.len() - values.len();
        return Ok(Histogram {
            field: field.to_string(),
            bins: HistogramBins::Numeric(numeric_bins(&values)),
            missing,
        });
    }

    let mut order: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut missing = 0;
    for value in table.values(field)? {
        if value.is_missing() {
            missing += 1;
            continue;
        }
        let key = value.to_string();
        match positions.get(&key) {
            Some(&idx) => order[idx].1 += 1,
            None => {
                positions.insert(key.clone(), order.len());
                order.push((key, 1));
            }
        }
    }
    Ok(Histogram {
        field: field.to_string(),
        bins: HistogramBins::Categorical(order),
        missing,
    })
}

fn numeric_bins(values: &[f64]) -> Vec<NumericBin> {
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };
    if min == max {
        return vec![NumericBin {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let nbins = stats::bin_count(values.len());
    let width = (max - min) / nbins as f64;
    let mut bins: Vec<NumericBin> = (0..nbins)
        .map(|i| NumericBin {
            start: min + width * i as f64,
            end: if i + 1 == nbins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(nbins - 1);
        bins[idx].count += 1;
    }
    bins
}

pub fn bar_series(table: &Table, field: &str) -> Result<BarSeries, EdaError> {
    let values = table.values(field)?;
    Ok(BarSeries {
        field: field.to_string(),
        bars: table.row_labels().iter().cloned().zip(values).collect(),
    })
}

pub fn scatter_series(table: &Table, x: &str, y: &str) -> Result<ScatterSeries, EdaError> {
    let xs = table.values(x)?;
    let ys = table.values(y)?;
    Ok(ScatterSeries {
        x_field: x.to_string(),
        y_field: y.to_string(),
        labels: table.row_labels().to_vec(),
        points: xs.into_iter().zip(ys).collect(),
    })
}

/// Selected columns as a row by field intensity grid, in selection order.
pub fn heatmap_subset(table: &Table, fields: &[String]) -> Result<HeatmapGrid, EdaError> {
    if fields.is_empty() {
        return Err(EdaError::EmptySelection);
    }
    let columns: Vec<Vec<Option<f64>>> = fields
        .iter()
        .map(|name| table.numbers(name))
        .collect::<Result<_, _>>()?;

    let cells: Vec<Vec<Option<f64>>> = (0..table.height())
        .map(|row| columns.iter().map(|c| c[row]).collect())
        .collect();
    let range = columns
        .iter()
        .flatten()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        });

    Ok(HeatmapGrid {
        fields: fields.to_vec(),
        rows: table.row_labels().to_vec(),
        cells,
        range,
    })
}

/// Initial heatmap selection as field positions: the first `n` fields, or all
/// of them if fewer.
pub fn default_heatmap_selection(table: &Table, n: usize) -> Vec<usize> {
    (0..table.fields().len().min(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{ASSEMBLIES, table};

    const MIXED: &str = "\
id,a,b,name,c
r1,1,2,foo,5
r2,2,4,bar,3
r3,3,6,foo,
r4,4,8,baz,-1
";

    #[test]
    fn correlation_excludes_text_fields() {
        let t = table(MIXED);
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.fields, vec!["a", "b", "c"]);
        assert!(!m.fields.contains(&"name".to_string()));
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let t = table(MIXED);
        let m = correlation_matrix(&t).unwrap();
        for i in 0..m.fields.len() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.fields.len() {
                let (a, b) = (m.get(i, j), m.get(j, i));
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_counts_booleans_as_zero_or_one() {
        let t = table("id,x,flag,name\na,1,true,p\nb,2,false,q\nc,3,true,r\nd,4,false,s\n");
        let m = correlation_matrix(&t).unwrap();
        assert_eq!(m.fields, vec!["x", "flag"]);
        assert!((m.get(0, 1) + 1.0 / 5.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(m.get(1, 1), 1.0);
    }

    #[test]
    fn correlation_with_one_complete_pair_is_nan() {
        let t = table("id,x,y\na,1,\nb,2,5\nc,,6\n");
        let m = correlation_matrix(&t).unwrap();
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 0).is_nan());
    }

    #[test]
    fn correlation_of_constant_field_is_nan() {
        let t = table("id,x,k\na,1,7\nb,2,7\nc,3,7\n");
        let m = correlation_matrix(&t).unwrap();
        assert!(m.get(0, 1).is_nan());
        assert_eq!(m.get(1, 1), 1.0);
    }

    #[test]
    fn numeric_histogram_bins_every_value() {
        let t = table("id,x\na,1\nb,2\nc,2\nd,3\ne,4\nf,\ng,5\nh,6\ni,10\n");
        let h = histogram(&t, "x").unwrap();
        assert_eq!(h.missing, 1);
        let HistogramBins::Numeric(bins) = &h.bins else {
            panic!("expected numeric bins");
        };
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins.last().unwrap().end, 10.0);
        assert_eq!(h.total(), 8);
        assert_eq!(bins.last().unwrap().count, 1);
    }

    #[test]
    fn infinite_values_count_as_missing() {
        let t = table("id,x\na,1\nb,inf\nc,3\n");
        let h = histogram(&t, "x").unwrap();
        assert_eq!(h.missing, 1);
        assert_eq!(h.total(), 2);
        assert_eq!(h.total() + h.missing, t.height());
    }

    #[test]
    fn constant_column_has_one_bin() {
        let t = table("id,x\na,3\nb,3\n");
        let h = histogram(&t, "x").unwrap();
        assert_eq!(
            h.bins,
            HistogramBins::Numeric(vec![NumericBin {
                start: 3.0,
                end: 3.0,
                count: 2
            }])
        );
    }

    #[test]
    fn text_histogram_counts_in_first_seen_order() {
        let t = table(MIXED);
        let h = histogram(&t, "name").unwrap();
        assert_eq!(
            h.counts(),
            vec![
                ("foo".to_string(), 2),
                ("bar".to_string(), 1),
                ("baz".to_string(), 1)
            ]
        );
    }

    #[test]
    fn histogram_rejects_unknown_field() {
        let t = table(MIXED);
        assert!(matches!(
            histogram(&t, "id"),
            Err(EdaError::UnknownField(_))
        ));
    }

    #[test]
    fn bar_series_has_one_bar_per_row() {
        let t = table(ASSEMBLIES);
        let bars = bar_series(&t, "length").unwrap();
        assert_eq!(bars.bars.len(), 3);
        assert_eq!(bars.bars[1], ("asm_2".to_string(), Value::Number(900.0)));
    }

    #[test]
    fn scatter_points_match_source_cells() {
        let t = table(MIXED);
        let s = scatter_series(&t, "a", "name").unwrap();
        assert_eq!(s.points.len(), t.height());
        let xs = t.values("a").unwrap();
        let ys = t.values("name").unwrap();
        for (i, (x, y)) in s.points.iter().enumerate() {
            assert_eq!(x, &xs[i]);
            assert_eq!(y, &ys[i]);
        }
        assert_eq!(s.points[2], (Value::Number(3.0), Value::Text("foo".into())));
    }

    #[test]
    fn heatmap_requires_a_selection() {
        let t = table(MIXED);
        assert!(matches!(
            heatmap_subset(&t, &[]),
            Err(EdaError::EmptySelection)
        ));
    }

    #[test]
    fn heatmap_keeps_selection_order() {
        let t = table(MIXED);
        let fields = vec!["c".to_string(), "a".to_string()];
        let grid = heatmap_subset(&t, &fields).unwrap();
        assert_eq!(grid.fields, fields);
        assert_eq!(grid.cells.len(), 4);
        assert!(grid.cells.iter().all(|r| r.len() == 2));
        assert_eq!(grid.cells[2], vec![None, Some(3.0)]);
        assert_eq!(grid.range, Some((-1.0, 5.0)));
    }

    #[test]
    fn heatmap_rejects_unknown_field() {
        let t = table(MIXED);
        let fields = vec!["a".to_string(), "zzz".to_string()];
        assert!(matches!(
            heatmap_subset(&t, &fields),
            Err(EdaError::UnknownField(_))
        ));
    }

    #[test]
    fn heatmap_defaults_to_first_four_fields() {
        let t = table(MIXED);
        assert_eq!(default_heatmap_selection(&t, 4), vec![0, 1, 2, 3]);
        let t = table(ASSEMBLIES);
        assert_eq!(default_heatmap_selection(&t, 4), vec![0, 1, 2]);
    }
}
