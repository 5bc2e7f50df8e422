use arboard::Clipboard;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, trace};

use crate::dataset::Table;
use crate::domain::{EdaConfig, EdaError, HELP_TEXT, LoadError, Message};
use crate::inputter::{InputResult, Inputter};
use crate::views::{self, DerivedView};

// Rows taken by tabs, selector line, table header and status line.
pub const UI_CHROME_HEIGHT: usize = 8;

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    VIEW,
    POPUP,
    CMDINPUT,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Data,
    Summary,
    Types,
    Missing,
    Correlation,
    Distribution,
    Bar,
    Scatter,
    Heatmap,
}

impl Tab {
    pub const ALL: [Tab; 9] = [
        Tab::Data,
        Tab::Summary,
        Tab::Types,
        Tab::Missing,
        Tab::Correlation,
        Tab::Distribution,
        Tab::Bar,
        Tab::Scatter,
        Tab::Heatmap,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Data => "Data",
            Tab::Summary => "Summary",
            Tab::Types => "Types",
            Tab::Missing => "Missing",
            Tab::Correlation => "Correlation",
            Tab::Distribution => "Distribution",
            Tab::Bar => "Bar",
            Tab::Scatter => "Scatter",
            Tab::Heatmap => "Heatmap",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn step(&self, delta: isize) -> Tab {
        let n = Tab::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(n);
        Tab::ALL[idx as usize]
    }
}

/// What the session currently holds. Views are only computed when loaded.
pub enum Session {
    Empty,
    Loaded(Table),
    Failed(String),
}

#[derive(Debug, Default, Clone)]
struct Selection {
    histogram: usize,
    bar: usize,
    scatter_x: usize,
    scatter_y: usize,
    heatmap: Vec<usize>, // Field indices in the order they were selected
    heatmap_cursor: usize,
}

impl Selection {
    fn for_table(table: &Table, heatmap_default_fields: usize) -> Self {
        Selection {
            heatmap: views::default_heatmap_selection(table, heatmap_default_fields),
            ..Selection::default()
        }
    }
}

pub struct UIData {
    pub dataset: String,
    pub tab: Tab,
    pub view: Option<DerivedView>,
    pub view_message: Option<String>,
    pub fields: Vec<String>,
    pub selected_field: Option<usize>,
    pub selected_field_y: Option<usize>,
    pub heatmap_selection: Vec<usize>,
    pub heatmap_cursor: usize,
    pub offset_row: usize,
    pub show_popup: bool,
    pub popup_message: String,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub status_message: String,
    pub status_kind: StatusKind,
    pub last_update: Instant,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            dataset: String::new(),
            tab: Tab::Data,
            view: None,
            view_message: None,
            fields: Vec::new(),
            selected_field: None,
            selected_field_y: None,
            heatmap_selection: Vec::new(),
            heatmap_cursor: 0,
            offset_row: 0,
            show_popup: false,
            popup_message: String::new(),
            cmdinput: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
            status_kind: StatusKind::Info,
            last_update: Instant::now(),
        }
    }
}

pub struct Model {
    config: EdaConfig,
    pub status: Status,
    modus: Modus,
    session: Session,
    tab: Tab,
    selection: Selection,
    offset_row: usize,
    page_size: usize,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    last_input: InputResult,
    status_message: String,
    status_kind: StatusKind,
}

impl Model {
    pub fn init(config: &EdaConfig, ui_height: usize) -> Self {
        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::VIEW,
            session: Session::Empty,
            tab: Tab::Data,
            selection: Selection::default(),
            offset_row: 0,
            page_size: ui_height.saturating_sub(UI_CHROME_HEIGHT).max(1),
            uidata: UIData::empty(),
            clipboard: None,
            input: Inputter::default(),
            last_input: InputResult::default(),
            status_message: "Started edav!".to_string(),
            status_kind: StatusKind::Info,
        };
        model.refresh();
        model
    }

    /// Load the configured default dataset. Failure leaves the session without
    /// a table; only opening another file or quitting remain possible.
    pub fn load_default(&mut self) -> Result<(), EdaError> {
        let path = self.config.default_dataset.clone();
        match Table::load(&path) {
            Ok(table) => {
                self.replace_table(table);
                self.set_status(
                    StatusKind::Info,
                    "Using default dataset. Open your own CSV file with 'o' to analyse different data.",
                );
                Ok(())
            }
            Err(e) => {
                error!("Could not load default dataset {}: {e}", path.display());
                self.fail("Error: Could not load default file. Please open a CSV file.");
                Err(e.into())
            }
        }
    }

    /// Replace the session table with a CSV file chosen by the user.
    pub fn open_file(&mut self, path: &Path) -> Result<(), EdaError> {
        let result = Table::load(path);
        self.finish_open(result)
    }

    pub fn open_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), EdaError> {
        let result = Table::from_bytes(name, bytes);
        self.finish_open(result)
    }

    fn finish_open(&mut self, result: Result<Table, LoadError>) -> Result<(), EdaError> {
        match result {
            Ok(table) => {
                info!("Opened {}", table.name());
                self.replace_table(table);
                self.set_status(StatusKind::Success, "File successfully loaded!");
                Ok(())
            }
            Err(e) => {
                error!("Loading failed: {e}");
                let err = EdaError::from(e);
                self.fail(err.to_string());
                Err(err)
            }
        }
    }

    fn replace_table(&mut self, table: Table) {
        self.selection = Selection::for_table(&table, self.config.heatmap_default_fields);
        self.offset_row = 0;
        self.session = Session::Loaded(table);
        self.refresh();
    }

    fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.session = Session::Failed(message.clone());
        self.set_status(StatusKind::Error, message);
        self.refresh();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.session {
            Session::Loaded(table) => Some(table),
            _ => None,
        }
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    fn set_status(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_kind = kind;
        self.uidata.status_message = self.status_message.clone();
        self.uidata.status_kind = kind;
        self.uidata.last_update = Instant::now();
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), EdaError> {
        let Some(message) = message else {
            return Ok(());
        };
        trace!("Handle {message:?} in {:?}", self.modus);

        match (self.modus, message) {
            (_, Message::Quit) if self.modus != Modus::CMDINPUT => self.quit(),
            (_, Message::Resize(_, height)) => {
                self.page_size = height.saturating_sub(UI_CHROME_HEIGHT).max(1);
            }
            (Modus::CMDINPUT, Message::RawKey(key)) => {
                self.last_input = self.input.read(key);
                if self.last_input.finished {
                    self.modus = Modus::VIEW;
                    if !self.last_input.canceled {
                        let entered = self.last_input.input.clone();
                        self.open_entered_path(&entered);
                    }
                    self.input.clear();
                    self.last_input = InputResult::default();
                }
            }
            (Modus::POPUP, Message::Exit | Message::Help) => self.modus = Modus::VIEW,
            (Modus::POPUP, _) => {}
            (Modus::VIEW, msg) => self.handle_view_message(msg),
            (Modus::CMDINPUT, _) => {}
        }
        self.refresh();
        Ok(())
    }

    fn handle_view_message(&mut self, message: Message) {
        match message {
            Message::NextTab => self.select_tab(self.tab.step(1)),
            Message::PreviousTab => self.select_tab(self.tab.step(-1)),
            Message::SelectTab(idx) => {
                if let Some(tab) = Tab::ALL.get(idx) {
                    self.select_tab(*tab);
                }
            }
            Message::NextField => self.move_field(1),
            Message::PreviousField => self.move_field(-1),
            Message::NextFieldY => self.move_field_y(1),
            Message::PreviousFieldY => self.move_field_y(-1),
            Message::ToggleField => self.toggle_heatmap_field(),
            Message::MoveUp(size) => self.move_up(size),
            Message::MoveDown(size) => self.move_down(size),
            Message::MoveBeginning => {
                self.offset_row = 0;
                self.selection.heatmap_cursor = 0;
            }
            Message::MoveEnd => {
                if self.tab == Tab::Heatmap {
                    self.selection.heatmap_cursor = self.field_count().saturating_sub(1);
                } else {
                    self.offset_row = self.max_offset();
                }
            }
            Message::Copy => self.copy_view(),
            Message::Help => {
                self.modus = Modus::POPUP;
            }
            Message::Open => {
                self.input.clear();
                self.last_input = self.input.get();
                self.modus = Modus::CMDINPUT;
            }
            Message::Exit | Message::Quit | Message::RawKey(_) | Message::Resize(..) => {}
        }
    }

    fn open_entered_path(&mut self, entered: &str) {
        let entered = entered.trim();
        if entered.is_empty() {
            return;
        }
        match shellexpand::full(entered) {
            Ok(expanded) => {
                let path = PathBuf::from(expanded.as_ref());
                // Failure is already recorded in the session and the status line.
                let _ = self.open_file(&path);
            }
            Err(e) => self.set_status(StatusKind::Error, format!("Error: {e}")),
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            self.tab = tab;
            self.offset_row = 0;
        }
    }

    fn field_count(&self) -> usize {
        self.table().map(|t| t.fields().len()).unwrap_or(0)
    }

    fn step_index(idx: usize, delta: isize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (idx as isize + delta).rem_euclid(len as isize) as usize
    }

    fn move_field(&mut self, delta: isize) {
        let n = self.field_count();
        let sel = &mut self.selection;
        match self.tab {
            Tab::Distribution => sel.histogram = Self::step_index(sel.histogram, delta, n),
            Tab::Bar => sel.bar = Self::step_index(sel.bar, delta, n),
            Tab::Scatter => sel.scatter_x = Self::step_index(sel.scatter_x, delta, n),
            Tab::Heatmap => sel.heatmap_cursor = Self::step_index(sel.heatmap_cursor, delta, n),
            _ => {}
        }
    }

    fn move_field_y(&mut self, delta: isize) {
        if self.tab == Tab::Scatter {
            let n = self.field_count();
            self.selection.scatter_y = Self::step_index(self.selection.scatter_y, delta, n);
        }
    }

    fn toggle_heatmap_field(&mut self) {
        if self.tab != Tab::Heatmap || self.field_count() == 0 {
            return;
        }
        let cursor = self.selection.heatmap_cursor;
        let selected = &mut self.selection.heatmap;
        match selected.iter().position(|&idx| idx == cursor) {
            Some(pos) => {
                selected.remove(pos);
            }
            None => selected.push(cursor),
        }
    }

    fn move_up(&mut self, size: usize) {
        if self.tab == Tab::Heatmap {
            self.selection.heatmap_cursor = self.selection.heatmap_cursor.saturating_sub(size);
        } else {
            self.offset_row = self.offset_row.saturating_sub(size);
        }
    }

    fn move_down(&mut self, size: usize) {
        if self.tab == Tab::Heatmap {
            let last = self.field_count().saturating_sub(1);
            self.selection.heatmap_cursor = (self.selection.heatmap_cursor + size).min(last);
        } else {
            self.offset_row = (self.offset_row + size).min(self.max_offset());
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn max_offset(&self) -> usize {
        let rows = match &self.uidata.view {
            Some(DerivedView::Data(grid)) => grid.nrows(),
            Some(DerivedView::Summary(rows)) => rows.len(),
            Some(DerivedView::Types(rows)) => rows.len(),
            Some(DerivedView::Missing(rows)) => rows.len(),
            Some(DerivedView::Correlation(m)) => m.fields.len(),
            Some(DerivedView::Histogram(h)) => h.counts().len(),
            Some(DerivedView::Bar(b)) => b.bars.len(),
            Some(DerivedView::Heatmap(g)) => g.rows.len(),
            Some(DerivedView::Scatter(_)) | None => 0,
        };
        rows.saturating_sub(1)
    }

    fn copy_view(&mut self) {
        let Some(view) = &self.uidata.view else {
            self.set_status(StatusKind::Warning, "Nothing to copy.");
            return;
        };
        let text = view.to_tsv();
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    trace!("Clipboard unavailable: {:?}", e);
                    self.set_status(StatusKind::Error, format!("Clipboard unavailable: {e}"));
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(text) {
                Ok(_) => {
                    let title = self.tab.title();
                    self.set_status(StatusKind::Success, format!("Copied {title} view to clipboard."));
                }
                Err(e) => self.set_status(StatusKind::Error, format!("Error copying to clipboard: {e}")),
            }
        }
    }

    /// Selected fields as names, for views that take a selection.
    fn field_name(table: &Table, idx: usize) -> Option<String> {
        table.fields().get(idx).map(|f| f.name.clone())
    }

    fn compute_view(&self, table: &Table) -> Result<DerivedView, EdaError> {
        let sel = &self.selection;
        let no_fields = || EdaError::NothingToPlot;
        let view = match self.tab {
            Tab::Data => DerivedView::Data(views::data_grid(table)?),
            Tab::Summary => DerivedView::Summary(views::describe(table)?),
            Tab::Types => DerivedView::Types(views::dtype_report(table)),
            Tab::Missing => DerivedView::Missing(views::missing_report(table)?),
            Tab::Correlation => DerivedView::Correlation(views::correlation_matrix(table)?),
            Tab::Distribution => {
                let field = Self::field_name(table, sel.histogram).ok_or_else(no_fields)?;
                DerivedView::Histogram(views::histogram(table, &field)?)
            }
            Tab::Bar => {
                let field = Self::field_name(table, sel.bar).ok_or_else(no_fields)?;
                DerivedView::Bar(views::bar_series(table, &field)?)
            }
            Tab::Scatter => {
                let x = Self::field_name(table, sel.scatter_x).ok_or_else(no_fields)?;
                let y = Self::field_name(table, sel.scatter_y).ok_or_else(no_fields)?;
                DerivedView::Scatter(views::scatter_series(table, &x, &y)?)
            }
            Tab::Heatmap => {
                let fields: Vec<String> = sel
                    .heatmap
                    .iter()
                    .filter_map(|&idx| Self::field_name(table, idx))
                    .collect();
                DerivedView::Heatmap(views::heatmap_subset(table, &fields)?)
            }
        };
        Ok(view)
    }

    /// Recompute the active view from the current table and selections.
    fn refresh(&mut self) {
        let start_time = Instant::now();
        let (dataset, fields, view, view_message) = match &self.session {
            Session::Loaded(table) => {
                let (view, view_message) = match self.compute_view(table) {
                    Ok(view) => (Some(view), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                (table.name().to_string(), table.field_list(), view, view_message)
            }
            Session::Failed(message) => (String::new(), Vec::new(), None, Some(message.clone())),
            Session::Empty => (String::new(), Vec::new(), None, None),
        };
        trace!(
            "Recomputed {} view in {}us",
            self.tab.title(),
            start_time.elapsed().as_micros()
        );

        let has_fields = !fields.is_empty();
        let sel = &self.selection;
        let (selected_field, selected_field_y) = match self.tab {
            Tab::Distribution if has_fields => (Some(sel.histogram), None),
            Tab::Bar if has_fields => (Some(sel.bar), None),
            Tab::Scatter if has_fields => (Some(sel.scatter_x), Some(sel.scatter_y)),
            _ => (None, None),
        };

        self.uidata = UIData {
            dataset,
            tab: self.tab,
            view,
            view_message,
            fields,
            selected_field,
            selected_field_y,
            heatmap_selection: sel.heatmap.clone(),
            heatmap_cursor: sel.heatmap_cursor,
            offset_row: self.offset_row,
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            cmdinput: self.last_input.clone(),
            active_cmdinput: self.modus == Modus::CMDINPUT,
            status_message: self.status_message.clone(),
            status_kind: self.status_kind,
            last_update: Instant::now(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::ASSEMBLIES;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn model() -> Model {
        let mut model = Model::init(&EdaConfig::default(), 40);
        model
            .open_bytes("assemblies.csv", ASSEMBLIES.as_bytes().to_vec())
            .unwrap();
        model
    }

    fn send(model: &mut Model, message: Message) {
        model.update(Some(message)).unwrap();
    }

    fn key(model: &mut Model, code: KeyCode) {
        send(model, Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn starts_without_views() {
        let model = Model::init(&EdaConfig::default(), 40);
        assert!(matches!(model.session(), Session::Empty));
        assert!(model.get_uidata().view.is_none());
    }

    #[test]
    fn loaded_table_shows_data_grid() {
        let model = model();
        let ui = model.get_uidata();
        assert_eq!(ui.dataset, "assemblies.csv");
        assert_eq!(ui.fields, vec!["length", "gc_content", "n_count"]);
        assert!(matches!(ui.view, Some(DerivedView::Data(_))));
        assert_eq!(ui.status_kind, StatusKind::Success);
    }

    #[test]
    fn tabs_wrap_around() {
        let mut model = model();
        send(&mut model, Message::PreviousTab);
        assert_eq!(model.get_uidata().tab, Tab::Heatmap);
        send(&mut model, Message::NextTab);
        assert_eq!(model.get_uidata().tab, Tab::Data);
        send(&mut model, Message::SelectTab(3));
        assert!(matches!(
            model.get_uidata().view,
            Some(DerivedView::Missing(_))
        ));
    }

    #[test]
    fn field_selection_drives_histogram() {
        let mut model = model();
        send(&mut model, Message::SelectTab(Tab::Distribution.index()));
        send(&mut model, Message::NextField);
        let ui = model.get_uidata();
        assert_eq!(ui.selected_field, Some(1));
        match &ui.view {
            Some(DerivedView::Histogram(h)) => {
                assert_eq!(h.field, "gc_content");
                assert_eq!(h.missing, 1);
            }
            _ => panic!("expected histogram"),
        }
    }

    #[test]
    fn scatter_uses_both_selected_fields() {
        let mut model = model();
        send(&mut model, Message::SelectTab(Tab::Scatter.index()));
        send(&mut model, Message::NextFieldY);
        send(&mut model, Message::NextFieldY);
        send(&mut model, Message::PreviousField);
        match &model.get_uidata().view {
            Some(DerivedView::Scatter(s)) => {
                assert_eq!(s.x_field, "n_count");
                assert_eq!(s.y_field, "n_count");
                assert_eq!(s.points.len(), 3);
            }
            _ => panic!("expected scatter"),
        }
    }

    #[test]
    fn empty_heatmap_selection_warns_instead_of_rendering() {
        let mut model = model();
        send(&mut model, Message::SelectTab(Tab::Heatmap.index()));
        assert_eq!(model.get_uidata().heatmap_selection, vec![0, 1, 2]);
        for _ in 0..3 {
            send(&mut model, Message::ToggleField);
            send(&mut model, Message::MoveDown(1));
        }
        let ui = model.get_uidata();
        assert!(ui.heatmap_selection.is_empty());
        assert!(ui.view.is_none());
        assert_eq!(
            ui.view_message.as_deref(),
            Some("Please select at least one column to generate the heatmap.")
        );

        // The rest of the dashboard stays usable.
        send(&mut model, Message::SelectTab(0));
        assert!(model.get_uidata().view.is_some());
    }

    #[test]
    fn heatmap_follows_selection_order() {
        let mut model = model();
        send(&mut model, Message::SelectTab(Tab::Heatmap.index()));
        send(&mut model, Message::ToggleField);
        send(&mut model, Message::ToggleField);
        match &model.get_uidata().view {
            Some(DerivedView::Heatmap(g)) => {
                assert_eq!(g.fields, vec!["gc_content", "n_count", "length"]);
            }
            _ => panic!("expected heatmap"),
        }
    }

    #[test]
    fn failed_open_stops_views() {
        let mut model = model();
        let res = model.open_bytes("broken.csv", Vec::new());
        assert!(matches!(res, Err(EdaError::Load(_))));
        assert!(matches!(model.session(), Session::Failed(_)));
        assert!(model.get_uidata().view.is_none());
        assert_eq!(model.get_uidata().status_kind, StatusKind::Error);

        send(&mut model, Message::SelectTab(Tab::Summary.index()));
        assert!(model.get_uidata().view.is_none());
    }

    #[test]
    fn missing_default_dataset_halts_session() {
        let config = EdaConfig::default().with_default_dataset(PathBuf::from("no/such/file.csv"));
        let mut model = Model::init(&config, 40);
        assert!(model.load_default().is_err());
        assert!(model.table().is_none());
        assert_eq!(
            model.get_uidata().status_message,
            "Error: Could not load default file. Please open a CSV file."
        );
    }

    #[test]
    fn default_dataset_loads_from_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/assemblies.csv");
        let config = EdaConfig::default().with_default_dataset(path);
        let mut model = Model::init(&config, 40);
        model.load_default().unwrap();
        assert_eq!(model.table().map(|t| t.height()), Some(8));
        assert_eq!(model.get_uidata().status_kind, StatusKind::Info);
    }

    #[test]
    fn open_prompt_reads_raw_keys() {
        let mut model = model();
        send(&mut model, Message::Open);
        assert!(model.raw_keyevents());
        key(&mut model, KeyCode::Char('x'));
        assert_eq!(model.get_uidata().cmdinput.input, "x");
        key(&mut model, KeyCode::Esc);
        assert!(!model.raw_keyevents());
        assert!(model.table().is_some());
    }

    #[test]
    fn open_prompt_reports_missing_file() {
        let mut model = model();
        send(&mut model, Message::Open);
        for c in "missing.csv".chars() {
            key(&mut model, KeyCode::Char(c));
        }
        key(&mut model, KeyCode::Enter);
        assert!(matches!(model.session(), Session::Failed(_)));
        assert!(model.get_uidata().status_message.contains("file not found"));
    }

    #[test]
    fn scrolling_is_bounded_by_view_rows() {
        let mut model = model();
        send(&mut model, Message::MoveDown(10));
        assert_eq!(model.get_uidata().offset_row, 2);
        send(&mut model, Message::MoveUp(1));
        assert_eq!(model.get_uidata().offset_row, 1);
        send(&mut model, Message::MoveBeginning);
        assert_eq!(model.get_uidata().offset_row, 0);
    }

    #[test]
    fn heatmap_rows_scroll() {
        let mut model = model();
        send(&mut model, Message::SelectTab(Tab::Heatmap.index()));
        send(&mut model, Message::MoveEnd);
        assert_eq!(model.get_uidata().offset_row, 2);
        send(&mut model, Message::MoveUp(1));
        assert_eq!(model.get_uidata().offset_row, 1);
    }

    #[test]
    fn help_popup_toggles() {
        let mut model = model();
        send(&mut model, Message::Help);
        assert!(model.get_uidata().show_popup);
        send(&mut model, Message::NextTab);
        assert_eq!(model.get_uidata().tab, Tab::Data);
        send(&mut model, Message::Exit);
        assert!(!model.get_uidata().show_popup);
    }

    #[test]
    fn quit_sets_status() {
        let mut model = model();
        send(&mut model, Message::Quit);
        assert_eq!(model.status, Status::QUITTING);
    }
}
