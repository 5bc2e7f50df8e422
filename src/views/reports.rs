use polars::prelude::*;
use rayon::prelude::*;
use tracing::trace;

use super::stats;
use crate::dataset::{FieldKind, Table};
use crate::domain::EdaError;

#[derive(Clone, Debug)]
pub struct ColumnView {
    pub name: String,
    pub data: Vec<String>,
}

/// The full table, every cell as display text.
#[derive(Clone, Debug)]
pub struct DataGrid {
    pub name: String,
    pub index: ColumnView,
    pub columns: Vec<ColumnView>,
}

impl DataGrid {
    pub fn nrows(&self) -> usize {
        self.index.data.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }
}

#[derive(Clone, Debug)]
pub struct DescribeRow {
    pub field: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Clone, Debug)]
pub struct MissingRow {
    pub field: String,
    pub missing: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug)]
pub struct DTypeRow {
    pub field: String,
    pub dtype: String,
    pub kind: FieldKind,
}

pub fn data_grid(table: &Table) -> Result<DataGrid, EdaError> {
    // Each column is converted in its own rayon task.
    let columns: Result<Vec<ColumnView>, EdaError> = table
        .fields()
        .par_iter()
        .map(|f| {
            Ok(ColumnView {
                name: f.name.clone(),
                data: table.display_strings(&f.name)?,
            })
        })
        .collect();

    Ok(DataGrid {
        name: table.name().to_string(),
        index: ColumnView {
            name: table.index_name().to_string(),
            data: table.row_labels().to_vec(),
        },
        columns: columns?,
    })
}

/// Count, mean, std, min, quartiles and max of every numeric field.
pub fn describe(table: &Table) -> Result<Vec<DescribeRow>, EdaError> {
    let numeric: Vec<&str> = table
        .fields()
        .iter()
        .filter(|f| f.is_numeric())
        .map(|f| f.name.as_str())
        .collect();
    trace!("Describe {} numeric fields", numeric.len());
    if numeric.is_empty() {
        return Ok(Vec::new());
    }

    // One aggregation pass; output columns are named `<field position>_<stat>`.
    let exprs: Vec<Expr> = numeric
        .iter()
        .enumerate()
        .flat_map(|(i, name)| {
            let c = col(*name).cast(DataType::Float64);
            let quartile = |q: f64| c.clone().quantile(lit(q), QuantileMethod::Linear);
            [
                c.clone().mean().alias(format!("{i}_mean")),
                c.clone().std(1).alias(format!("{i}_std")),
                c.clone().min().alias(format!("{i}_min")),
                quartile(0.25).alias(format!("{i}_q25")),
                quartile(0.5).alias(format!("{i}_q50")),
                quartile(0.75).alias(format!("{i}_q75")),
                c.clone().max().alias(format!("{i}_max")),
            ]
        })
        .collect();
    let summary = table.lazy().select(exprs).collect()?;

    numeric
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let stat = |s: &str| stats::first_f64(&summary, &format!("{i}_{s}"));
            Ok(DescribeRow {
                field: name.to_string(),
                count: table.height() - table.null_count(name)?,
                mean: stat("mean")?,
                std: stat("std")?,
                min: stat("min")?,
                q25: stat("q25")?,
                q50: stat("q50")?,
                q75: stat("q75")?,
                max: stat("max")?,
            })
        })
        .collect()
}

/// Missing count and percentage per field. An empty table yields NaN percentages.
pub fn missing_report(table: &Table) -> Result<Vec<MissingRow>, EdaError> {
    let nrows = table.height() as f64;
    table
        .fields()
        .par_iter()
        .map(|f| {
            let missing = table.null_count(&f.name)?;
            Ok(MissingRow {
                field: f.name.clone(),
                missing,
                percentage: stats::round2(missing as f64 / nrows * 100.0),
            })
        })
        .collect()
}

pub fn dtype_report(table: &Table) -> Vec<DTypeRow> {
    table
        .fields()
        .iter()
        .map(|f| DTypeRow {
            field: f.name.clone(),
            dtype: f.dtype.to_string(),
            kind: f.kind,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{ASSEMBLIES, table};

    #[test]
    fn missing_report_for_assemblies() {
        let t = table(ASSEMBLIES);
        let report = missing_report(&t).unwrap();
        let fields: Vec<&str> = report.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["length", "gc_content", "n_count"]);

        assert_eq!(report[1].missing, 1);
        assert_eq!(report[1].percentage, 33.33);
        assert_eq!(report[0].missing, 0);
        assert_eq!(report[0].percentage, 0.0);
        assert_eq!(report[2].percentage, 0.0);
    }

    #[test]
    fn missing_report_counts_text_fields() {
        let t = table("id,name,x\na,foo,1\nb,,2\nc,,3\nd,bar,\n");
        let report = missing_report(&t).unwrap();
        assert_eq!(report[0].missing, 2);
        assert_eq!(report[0].percentage, 50.0);
        assert_eq!(report[1].missing, 1);
        assert_eq!(report[1].percentage, 25.0);
    }

    #[test]
    fn missing_report_on_empty_table_is_nan() {
        let t = table("id,x,y\n");
        let report = missing_report(&t).unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|r| r.missing == 0 && r.percentage.is_nan()));
    }

    #[test]
    fn describe_skips_non_numeric_fields() {
        let t = table("id,x,name,y\na,1,foo,10\nb,2,bar,20\nc,3,baz,\nd,4,qux,40\n");
        let summary = describe(&t).unwrap();
        let fields: Vec<&str> = summary.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["x", "y"]);

        let x = &summary[0];
        assert_eq!(x.count, 4);
        assert_eq!(x.mean, 2.5);
        assert!((x.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(x.min, 1.0);
        assert_eq!(x.q25, 1.75);
        assert_eq!(x.q50, 2.5);
        assert_eq!(x.q75, 3.25);
        assert_eq!(x.max, 4.0);

        assert_eq!(summary[1].count, 3);
        assert_eq!(summary[1].q50, 20.0);
    }

    #[test]
    fn describe_leaves_out_boolean_fields() {
        let t = table("id,x,flag\na,1,true\nb,2,false\n");
        let summary = describe(&t).unwrap();
        let fields: Vec<&str> = summary.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["x"]);
    }

    #[test]
    fn describe_single_value_has_nan_std() {
        let t = table("id,x\na,5\n");
        let summary = describe(&t).unwrap();
        assert_eq!(summary[0].count, 1);
        assert_eq!(summary[0].mean, 5.0);
        assert!(summary[0].std.is_nan());
    }

    #[test]
    fn dtype_report_lists_every_field() {
        let t = table("id,n,x,s\na,1,1.5,foo\n");
        let report = dtype_report(&t);
        let kinds: Vec<FieldKind> = report.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![FieldKind::Numeric, FieldKind::Numeric, FieldKind::Text]
        );
        assert_eq!(report[0].dtype, "i64");
        assert_eq!(report[1].dtype, "f64");
        assert_eq!(report[2].dtype, "str");
    }

    #[test]
    fn data_grid_shows_missing_cells() {
        let t = table(ASSEMBLIES);
        let grid = data_grid(&t).unwrap();
        assert_eq!(grid.nrows(), 3);
        assert_eq!(grid.ncols(), 3);
        assert_eq!(grid.index.name, "id");
        assert_eq!(grid.columns[1].name, "gc_content");
        assert_eq!(grid.columns[1].data[1], "∅");
        assert_eq!(grid.columns[0].data[0], "1200");
    }
}
