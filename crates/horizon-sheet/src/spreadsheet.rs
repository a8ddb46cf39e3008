//! The spreadsheet controller.
//!
//! [`Spreadsheet`] owns the state store of one grid instance and wires the
//! reducer, the commit tracker, the clipboard and the host callbacks
//! together. Every input goes through [`Spreadsheet::dispatch`], which
//! produces at most one state transition; host signals fire synchronously
//! after the transition is in place.
//!
//! # Example
//!
//! ```
//! use horizon_sheet::{Cell, Matrix, MemoryClipboard, Point, Spreadsheet};
//! use horizon_sheet::engine::{Action, Key, KeyEvent};
//!
//! let data = Matrix::from_rows(vec![vec![Cell::new("A"), Cell::new("B")]]);
//! let sheet = Spreadsheet::builder(data)
//!     .clipboard(MemoryClipboard::new())
//!     .build();
//!
//! sheet.on_activate().connect(|point| println!("active: {point}"));
//!
//! sheet.dispatch(Action::Activate(Point::ORIGIN));
//! sheet.key_down(KeyEvent::plain(Key::ArrowRight));
//! assert_eq!(sheet.state().active, Some(Point::new(0, 1)));
//! ```

use std::sync::{Arc, Weak};

use horizon_sheet_core::logging::targets;
use horizon_sheet_core::{ConnectionGuard, PerfSpan, Signal, StateChange, Store};
use parking_lot::Mutex;

use crate::clipboard::{
    ClipboardBackend, ClipboardEvent, ClipboardEvents, Permission, SystemClipboard, pipeline,
};
use crate::commit::{BindingResolver, CommitTracker, bindings_for_changes};
use crate::config::SpreadsheetConfig;
use crate::engine::{Action, KeyEvent, ReduceContext, reduce};
use crate::error::SheetResult;
use crate::formula::{ComputedValue, FormulaParser, FormulaResolver, ValueExtractor};
use crate::model::{Cell, CellContext, CellValue, DataEditor, Matrix, Point, PointRange, TextEditor};
use crate::state::{CellDimensions, CommitEvent, Mode, StoreState};

/// Host-facing notifications.
#[derive(Default)]
struct HostSignals {
    change: Signal<Matrix<Cell>>,
    mode_change: Signal<Mode>,
    select: Signal<Vec<Point>>,
    activate: Signal<Point>,
    commit: Signal<CommitEvent>,
}

struct Inner {
    store: Store<StoreState>,
    tracker: Mutex<CommitTracker>,
    config: SpreadsheetConfig,
    formula: FormulaResolver,
    bindings: Option<Arc<dyn BindingResolver>>,
    extractor: Arc<dyn ValueExtractor>,
    clipboard: Mutex<Box<dyn ClipboardBackend>>,
    signals: HostSignals,
}

impl Inner {
    #[tracing::instrument(skip_all, target = "horizon_sheet", level = "trace", fields(action = action.name()))]
    fn dispatch(&self, action: Action) -> bool {
        let _span = PerfSpan::new("dispatch");
        let resolved = self.resolve_bindings(&action);
        let ctx = ReduceContext::new(&self.config)
            .with_bindings(resolved.as_ref().map(|r| r as &dyn BindingResolver));
        self.store.update(|prev| {
            let patch = reduce(prev, &action, &ctx)?;
            let next = prev.apply(patch);
            Some(self.tracker.lock().settle(prev, next))
        })
    }

    /// Runs the host binding resolver for a cell edit.
    ///
    /// Host collaborators may read the sheet, so they never run while the
    /// store is locked.
    fn resolve_bindings(&self, action: &Action) -> Option<ResolvedBindings> {
        let resolver = self.bindings.as_deref()?;
        let Action::SetCellData { point, cell } = action else {
            return None;
        };
        let data = self.store.with_state(|state| state.data.clone());
        let bindings = resolver.bindings_for_cell(cell, &data.set(*point, cell.clone()));
        Some(ResolvedBindings(bindings))
    }

    fn copy(&self, cut: bool) -> bool {
        let text = self.store.with_state(|state| {
            pipeline::copy_text(state, &self.formula, self.extractor.as_ref(), &self.config)
        });
        let Some(text) = text else {
            return false;
        };
        if let Err(err) = self.clipboard.lock().write_text(&text) {
            tracing::warn!(target: targets::CLIPBOARD, error = %err, "clipboard write failed");
            return false;
        }
        self.dispatch(if cut { Action::Cut } else { Action::Copy })
    }

    fn paste(&self) -> bool {
        let text = self.clipboard.lock().read_text();
        match text {
            Ok(text) => self.dispatch(Action::Paste(text)),
            Err(err) => {
                tracing::debug!(target: targets::CLIPBOARD, error = %err, "clipboard read failed");
                false
            }
        }
    }

    fn handle_clipboard_event(&self, event: &ClipboardEvent) {
        horizon_sheet_core::sheet_trace!(?event, "clipboard event");
        match event {
            ClipboardEvent::Copy => self.copy(false),
            ClipboardEvent::Cut => self.copy(true),
            ClipboardEvent::Paste(Some(text)) => self.dispatch(Action::Paste(text.clone())),
            ClipboardEvent::Paste(None) => self.paste(),
        };
    }

    /// Emits the host signals for every field the transition changed.
    fn notify_host(&self, change: &StateChange<StoreState>) {
        let (prev, next) = (&change.previous, &change.current);
        let signals = &self.signals;

        if !prev.data.ptr_eq(&next.data) {
            signals.change.emit(next.data.clone());
        }
        if prev.mode != next.mode {
            signals.mode_change.emit(next.mode);
        }
        if prev.selected != next.selected {
            signals.select.emit(next.selected_points());
        }
        if prev.active != next.active
            && let Some(active) = next.active
        {
            signals.activate.emit(active);
        }
        let same_commit = match (&prev.last_commit, &next.last_commit) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if !same_commit && let Some(commit) = &next.last_commit {
            signals.commit.emit(CommitEvent {
                changes: commit.to_vec(),
                bindings: bindings_for_changes(self.bindings.as_deref(), commit, &next.data),
            });
        }
    }
}

/// Bindings computed ahead of a state transition.
struct ResolvedBindings(Vec<Point>);

impl BindingResolver for ResolvedBindings {
    fn bindings_for_cell(&self, _: &Cell, _: &Matrix<Cell>) -> Vec<Point> {
        self.0.clone()
    }
}

/// One mounted spreadsheet grid.
///
/// Dropping the spreadsheet unmounts it.
pub struct Spreadsheet {
    inner: Arc<Inner>,
    events: Option<Arc<ClipboardEvents>>,
    mounted: Mutex<Vec<ConnectionGuard>>,
}

impl Spreadsheet {
    /// A spreadsheet over `data` with default collaborators.
    pub fn new(data: Matrix<Cell>) -> Self {
        Self::builder(data).build()
    }

    pub fn builder(data: Matrix<Cell>) -> SpreadsheetBuilder {
        SpreadsheetBuilder::new(data)
    }

    /// Subscribes to the store and the clipboard event source.
    ///
    /// Mounting an already mounted spreadsheet does nothing.
    pub fn mount(&self) {
        let mut mounted = self.mounted.lock();
        if !mounted.is_empty() {
            return;
        }

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        mounted.push(self.inner.store.subscribe(move |change| {
            if let Some(inner) = weak.upgrade() {
                inner.notify_host(change);
            }
        }));

        if let Some(events) = &self.events {
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            mounted.push(events.listen(move |event| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_clipboard_event(event);
                }
            }));
        }
        horizon_sheet_core::sheet_debug!(listeners = mounted.len(), "spreadsheet mounted");
    }

    /// Releases every subscription taken by [`mount`](Self::mount).
    pub fn unmount(&self) {
        let released: Vec<ConnectionGuard> = self.mounted.lock().drain(..).collect();
        if !released.is_empty() {
            horizon_sheet_core::sheet_debug!(listeners = released.len(), "spreadsheet unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        !self.mounted.lock().is_empty()
    }

    /// Applies one action. Returns whether the state changed.
    pub fn dispatch(&self, action: Action) -> bool {
        self.inner.dispatch(action)
    }

    pub fn key_down(&self, event: KeyEvent) -> bool {
        self.dispatch(Action::KeyDown(event))
    }

    /// Replaces the data, keeping selection and mode where still valid.
    pub fn set_data(&self, data: Matrix<Cell>) -> bool {
        self.dispatch(Action::SetData(data))
    }

    /// Copies the selection to the clipboard.
    ///
    /// Clipboard failures leave the state untouched and return `false`.
    pub fn copy(&self) -> bool {
        self.inner.copy(false)
    }

    /// Copies the selection and marks it as cut. Source cells are not
    /// cleared; that decision is left to the host.
    pub fn cut(&self) -> bool {
        self.inner.copy(true)
    }

    /// Pastes the clipboard text at the active cell.
    pub fn paste(&self) -> bool {
        self.inner.paste()
    }

    /// Starts a paste that waits for an asynchronous permission check.
    pub fn begin_paste(&self) -> PasteRequest {
        PasteRequest {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> StoreState {
        self.inner.store.get_state()
    }

    pub fn config(&self) -> &SpreadsheetConfig {
        &self.inner.config
    }

    /// The value of a cell as copied and displayed.
    pub fn computed_value(&self, point: Point) -> CellValue {
        self.inner.store.with_state(|state| {
            self.inner
                .extractor
                .get_value(&state.data, point, &self.inner.formula)
        })
    }

    /// The text shown for a cell, through its viewer if it has one.
    pub fn display_value(&self, point: Point) -> String {
        self.inner.store.with_state(|state| {
            let value = self
                .inner
                .extractor
                .get_value(&state.data, point, &self.inner.formula);
            let cell = state.data.get(point);
            match cell.and_then(|cell| cell.data_viewer.as_ref()) {
                Some(viewer) => viewer.render(&CellContext {
                    point,
                    cell,
                    value: &value,
                }),
                None => value.to_string(),
            }
        })
    }

    /// Feeds editor input to the active cell through its editor.
    ///
    /// Cells without an editor override take the input as their text value.
    pub fn edit_active(&self, input: &str) -> bool {
        let edited = self.inner.store.with_state(|state| {
            let point = state.active?;
            let cell = state.data.get(point);
            let value = cell.map(|cell| cell.value.clone()).unwrap_or_default();
            let ctx = CellContext {
                point,
                cell,
                value: &value,
            };
            let next = match cell.and_then(|cell| cell.data_editor.as_ref()) {
                Some(editor) => editor.apply(&ctx, input),
                None => TextEditor.apply(&ctx, input),
            };
            Some((point, next))
        });
        match edited {
            Some((point, cell)) => self.dispatch(Action::SetCellData { point, cell }),
            None => false,
        }
    }

    /// Exports computed values as CSV.
    pub fn to_csv(&self) -> SheetResult<String> {
        let values = self.inner.store.with_state(|state| {
            state.data.map(|_, point| {
                self.inner
                    .extractor
                    .get_value(&state.data, point, &self.inner.formula)
            })
        });
        values.to_csv(self.inner.config.csv_delimiter_byte())
    }

    /// Pixel rectangle of `range`, from measured dimensions and defaults.
    pub fn range_dimensions(&self, range: &PointRange) -> CellDimensions {
        self.inner
            .store
            .with_state(|state| state.range_dimensions(range, &self.inner.config))
    }

    /// Fires with the new data whenever it changes.
    pub fn on_change(&self) -> &Signal<Matrix<Cell>> {
        &self.inner.signals.change
    }

    /// Fires when the mode switches between view and edit.
    pub fn on_mode_change(&self) -> &Signal<Mode> {
        &self.inner.signals.mode_change
    }

    /// Fires with the selected points whenever the selection changes.
    pub fn on_select(&self) -> &Signal<Vec<Point>> {
        &self.inner.signals.select
    }

    /// Fires with the new active point.
    pub fn on_activate(&self) -> &Signal<Point> {
        &self.inner.signals.activate
    }

    /// Fires for every commit: closed edits, clears and pastes.
    pub fn on_commit(&self) -> &Signal<CommitEvent> {
        &self.inner.signals.commit
    }
}

impl Drop for Spreadsheet {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Spreadsheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spreadsheet")
            .field("config", &self.inner.config)
            .field("formula", &self.inner.formula)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

/// A pending paste waiting for clipboard permission.
///
/// Completing the request consumes it, so its result enters the state
/// update path exactly once. A request that outlives its spreadsheet
/// completes as a no-op.
#[must_use = "a paste request does nothing until completed"]
pub struct PasteRequest {
    inner: Weak<Inner>,
}

impl PasteRequest {
    /// Finishes the paste.
    ///
    /// With permission granted, `text` is pasted, or the clipboard backend
    /// is read when no text is supplied. A denied permission changes
    /// nothing.
    pub fn complete(self, permission: Permission, text: Option<String>) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            tracing::debug!(target: targets::CLIPBOARD, "paste completed after unmount");
            return false;
        };
        match (permission, text) {
            (Permission::Denied, _) => {
                tracing::debug!(target: targets::CLIPBOARD, "clipboard permission denied");
                false
            }
            (Permission::Granted, Some(text)) => inner.dispatch(Action::Paste(text)),
            (Permission::Granted, None) => inner.paste(),
        }
    }
}

impl std::fmt::Debug for PasteRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteRequest")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Builder for [`Spreadsheet`].
pub struct SpreadsheetBuilder {
    data: Matrix<Cell>,
    config: SpreadsheetConfig,
    formula_parser: Option<Arc<dyn FormulaParser>>,
    bindings: Option<Arc<dyn BindingResolver>>,
    extractor: Arc<dyn ValueExtractor>,
    clipboard: Option<Box<dyn ClipboardBackend>>,
    events: Option<Arc<ClipboardEvents>>,
}

impl SpreadsheetBuilder {
    pub fn new(data: Matrix<Cell>) -> Self {
        Self {
            data,
            config: SpreadsheetConfig::default(),
            formula_parser: None,
            bindings: None,
            extractor: Arc::new(ComputedValue),
            clipboard: None,
            events: None,
        }
    }

    pub fn config(mut self, config: SpreadsheetConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the engine that evaluates formula cells.
    pub fn formula_parser<P>(mut self, parser: P) -> Self
    where
        P: FormulaParser + 'static,
    {
        self.formula_parser = Some(Arc::new(parser));
        self
    }

    /// Sets the resolver for formula dependencies.
    pub fn binding_resolver<B>(mut self, resolver: B) -> Self
    where
        B: BindingResolver + 'static,
    {
        self.bindings = Some(Arc::new(resolver));
        self
    }

    /// Replaces how cell values are computed for display and copy.
    pub fn value_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ValueExtractor + 'static,
    {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Sets the clipboard backend. Defaults to the system clipboard.
    pub fn clipboard<C>(mut self, clipboard: C) -> Self
    where
        C: ClipboardBackend + 'static,
    {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    /// Sets the source of clipboard gestures to listen to while mounted.
    pub fn clipboard_events(mut self, events: Arc<ClipboardEvents>) -> Self {
        self.events = Some(events);
        self
    }

    /// Builds and mounts the spreadsheet.
    ///
    /// An invalid configuration is replaced by the defaults.
    pub fn build(self) -> Spreadsheet {
        let config = match self.config.validate() {
            Ok(()) => self.config,
            Err(err) => {
                horizon_sheet_core::sheet_warn!(error = %err, "invalid spreadsheet config, using defaults");
                SpreadsheetConfig::default()
            }
        };
        let formula = FormulaResolver::new(config.formula_prefix, self.formula_parser);
        let clipboard = self
            .clipboard
            .unwrap_or_else(|| Box::new(SystemClipboard::new()));
        let inner = Arc::new(Inner {
            store: Store::new(StoreState::new(self.data)),
            tracker: Mutex::new(CommitTracker::new()),
            config,
            formula,
            bindings: self.bindings,
            extractor: self.extractor,
            clipboard: Mutex::new(clipboard),
            signals: HostSignals::default(),
        });
        let sheet = Spreadsheet {
            inner,
            events: self.events,
            mounted: Mutex::new(Vec::new()),
        };
        sheet.mount();
        sheet
    }
}

static_assertions::assert_impl_all!(Spreadsheet: Send, Sync);
static_assertions::assert_impl_all!(PasteRequest: Send, Sync);
