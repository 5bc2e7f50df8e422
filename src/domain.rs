use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

pub const DEFAULT_DATASET: &str = "assemblies.csv";

pub const HELP_TEXT: &str = "\
 edav - exploratory data analysis

 Tab / BackTab   next / previous view
 1 .. 9          jump to view
 Left / Right    change selected field (X axis)
 [ / ]           change Y field (scatter)
 Up / Down       scroll, move heatmap cursor
 PgUp / PgDn     scroll a page
 g / G           jump to top / bottom
 Space           toggle field (heatmap)
 o               open a CSV file
 y               copy current view to clipboard
 ?               show this help
 q               quit";

/// Why a dataset could not be turned into a table.
#[derive(Debug)]
pub enum LoadError {
    FileNotFound(PathBuf),
    PermissionDenied(PathBuf),
    NotAFile(PathBuf),
    UnknownFileType(PathBuf),
    NoColumns,
    Io(Error),
    Parse(PolarsError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::FileNotFound(p) => write!(f, "file not found: {}", p.display()),
            LoadError::PermissionDenied(p) => write!(f, "permission denied: {}", p.display()),
            LoadError::NotAFile(p) => write!(f, "not a file: {}", p.display()),
            LoadError::UnknownFileType(p) => {
                write!(f, "not a CSV file: {}", p.display())
            }
            LoadError::NoColumns => write!(f, "the CSV data has no columns"),
            LoadError::Io(e) => write!(f, "could not read data: {e}"),
            LoadError::Parse(e) => write!(f, "could not parse CSV: {e}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<Error> for LoadError {
    fn from(err: Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<PolarsError> for LoadError {
    fn from(err: PolarsError) -> Self {
        LoadError::Parse(err)
    }
}

#[derive(Debug)]
pub enum EdaError {
    Load(LoadError),
    EmptySelection,
    UnknownField(String),
    NothingToPlot,
    IoError(Error),
    PolarsError(PolarsError),
}

impl fmt::Display for EdaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdaError::Load(e) => write!(f, "Error: {e}"),
            EdaError::EmptySelection => {
                write!(f, "Please select at least one column to generate the heatmap.")
            }
            EdaError::UnknownField(name) => write!(f, "Unknown column \"{name}\""),
            EdaError::NothingToPlot => write!(f, "The dataset has no columns to plot."),
            EdaError::IoError(e) => write!(f, "I/O error: {e}"),
            EdaError::PolarsError(e) => write!(f, "Data error: {e}"),
        }
    }
}

impl std::error::Error for EdaError {}

impl From<LoadError> for EdaError {
    fn from(err: LoadError) -> Self {
        EdaError::Load(err)
    }
}

impl From<Error> for EdaError {
    fn from(err: Error) -> Self {
        EdaError::IoError(err)
    }
}

impl From<PolarsError> for EdaError {
    fn from(err: PolarsError) -> Self {
        EdaError::PolarsError(err)
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct EdaConfig {
    pub event_poll_time: u64,
    pub default_dataset: PathBuf,
    pub heatmap_default_fields: usize,
    pub max_column_width: usize,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            default_dataset: PathBuf::from(DEFAULT_DATASET),
            heatmap_default_fields: 4,
            max_column_width: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    NextTab,
    PreviousTab,
    SelectTab(usize),
    NextField,
    PreviousField,
    NextFieldY,
    PreviousFieldY,
    ToggleField,
    MoveUp(usize),
    MoveDown(usize),
    MoveBeginning,
    MoveEnd,
    Copy,
    Help,
    Exit,
    Open,
    RawKey(KeyEvent),
    Resize(usize, usize),
}
