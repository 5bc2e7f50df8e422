use polars::prelude::*;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{EdaError, LoadError};

// Markers that load as missing, on top of the empty field.
const NA_VALUES: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Boolean,
    Text,
}

impl FieldKind {
    pub fn of(dtype: &DataType) -> Self {
        if Self::is_numeric_type(dtype) {
            FieldKind::Numeric
        } else if matches!(dtype, DataType::Boolean) {
            FieldKind::Boolean
        } else {
            FieldKind::Text
        }
    }

    fn is_numeric_type(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
    pub kind: FieldKind,
}

impl Field {
    fn new(name: &str, dtype: &DataType) -> Self {
        Field {
            name: name.to_string(),
            dtype: dtype.clone(),
            kind: FieldKind::of(dtype),
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == FieldKind::Numeric
    }

    /// Numeric or boolean; booleans count as 0/1 in correlations.
    pub fn is_quantitative(&self) -> bool {
        self.kind != FieldKind::Text
    }
}

/// A single cell as chart views see it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => write!(f, "∅"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A loaded CSV dataset. The first CSV column is kept apart as row labels,
/// every other column is a field. Immutable once built.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    index_name: String,
    index: Vec<String>,
    frame: DataFrame,
    fields: Vec<Field>,
}

impl Table {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        Self::check_file(path)?;
        let start_time = Instant::now();

        let frame = LazyCsvReader::new(PlPath::Local(path.into()))
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_null_values(Some(Self::null_values()))
            .finish()?
            .collect()?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        let table = Self::from_frame(name, frame)?;
        info!(
            "Loading {} took {}ms ...",
            path.display(),
            start_time.elapsed().as_millis()
        );
        Ok(table)
    }

    /// Parse CSV content that is already in memory.
    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<Self, LoadError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_null_values(Some(Self::null_values())))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Self::from_frame(name.to_string(), frame)
    }

    fn from_frame(name: String, frame: DataFrame) -> Result<Self, LoadError> {
        let Some(first) = frame.get_columns().first() else {
            return Err(LoadError::NoColumns);
        };
        let index_name = first.name().to_string();
        let labels = first.cast(&DataType::String)?;
        let index = labels
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("").to_string())
            .collect::<Vec<String>>();

        let frame = frame.drop(&index_name)?;
        let fields = frame
            .get_columns()
            .iter()
            .map(|c| Field::new(c.name().as_str(), c.dtype()))
            .collect::<Vec<Field>>();
        for f in fields.iter() {
            debug!("Field: \"{}\", {:?}, {:?}", f.name, f.dtype, f.kind);
        }

        Ok(Table {
            name,
            index_name,
            index,
            frame,
            fields,
        })
    }

    fn null_values() -> NullValues {
        NullValues::AllColumns(NA_VALUES.into_iter().map(PlSmallStr::from_static).collect())
    }

    fn check_file(path: &Path) -> Result<(), LoadError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => LoadError::PermissionDenied(path.to_path_buf()),
            _ => LoadError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(LoadError::NotAFile(path.to_path_buf()));
        }
        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(()),
            _ => Err(LoadError::UnknownFileType(path.to_path_buf())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn row_labels(&self) -> &[String] {
        &self.index
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The selectable column names, in file order.
    pub fn field_list(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn field(&self, name: &str) -> Result<&Field, EdaError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| EdaError::UnknownField(name.to_string()))
    }

    pub fn null_count(&self, name: &str) -> Result<usize, EdaError> {
        self.field(name)?;
        Ok(self.frame.column(name)?.null_count())
    }

    /// Numeric cells of a field, booleans as 0/1; text fields yield only `None`.
    pub fn numbers(&self, name: &str) -> Result<Vec<Option<f64>>, EdaError> {
        let field = self.field(name)?;
        if !field.is_quantitative() {
            return Ok(vec![None; self.height()]);
        }
        let col = self.frame.column(name)?.cast(&DataType::Float64)?;
        Ok(col
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Lazy handle on the field columns for polars expressions.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    pub fn values(&self, name: &str) -> Result<Vec<Value>, EdaError> {
        let field = self.field(name)?;
        if field.is_numeric() {
            return Ok(self
                .numbers(name)?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, Value::Number))
                .collect());
        }
        let col = self.frame.column(name)?.cast(&DataType::String)?;
        Ok(col
            .str()?
            .into_iter()
            .map(|v| v.map_or(Value::Missing, |s| Value::Text(s.to_string())))
            .collect())
    }

    /// Display strings of a field, missing cells as `∅` and line breaks folded.
    pub fn display_strings(&self, name: &str) -> Result<Vec<String>, EdaError> {
        self.field(name)?;
        let col = self.frame.column(name)?.cast(&DataType::String)?;
        Ok(col
            .str()?
            .into_iter()
            .map(|v| match v {
                Some(s) => s.replace("\r\n", " ↵ ").replace('\n', " ↵ "),
                None => String::from("∅"),
            })
            .collect())
    }
}
