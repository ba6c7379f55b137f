//! Table page controller.
//!
//! Owns the grid state (rows, cursor, selection, sort, pagination, search),
//! the page mode and the toasts. Operations that need the backend return a
//! [`Request`]; the dispatcher runs it and feeds the [`Completion`] back
//! through [`TablePage::complete`].
//!
use std::collections::BTreeMap;
use std::time::Instant;

use crate::app::forms::{CreateForm, FormOutcome, UpdateForm};
use crate::app::toast::{ToastId, Toasts};
use crate::grid::{self, SortColumn, SortState};
use crate::model::{BookRecord, FormValues, PageCursor, QueryParams, TableListData};

pub const MSG_ADDING: &str = "Adding…";
pub const MSG_ADDED: &str = "Added";
pub const MSG_ADD_FAILED: &str = "Add failed, please retry!";
pub const MSG_UPDATING: &str = "Saving…";
pub const MSG_UPDATED: &str = "Saved";
pub const MSG_UPDATE_FAILED: &str = "Save failed, please retry!";
pub const MSG_REMOVING: &str = "Deleting…";
pub const MSG_REMOVED: &str = "Deleted, refreshing";
pub const MSG_REMOVE_FAILED: &str = "Delete failed, please retry";
pub const MSG_LIST_FAILED: &str = "Loading books failed, please retry";
pub const MSG_VIEW_DETAILS: &str = "See the book's website for full details";

/// Entries of the bulk-operations toolbar menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BulkAction {
    Remove,
    Approve,
}

impl BulkAction {
    pub const ALL: [BulkAction; 2] = [BulkAction::Remove, BulkAction::Approve];

    pub fn label(self) -> &'static str {
        match self {
            BulkAction::Remove => "Delete selected",
            BulkAction::Approve => "Approve selected",
        }
    }
}

/// What the page is currently showing on top of the grid. At most one overlay at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageMode {
    Idle,
    BulkMenu { selected: usize },
    Create(CreateForm),
    /// The form holds the snapshot of the record being edited.
    Update(UpdateForm),
    Search { query: String },
    Help,
}

/// Work for the service layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    List { seq: u64, params: QueryParams },
    Add { toast: ToastId, fields: FormValues },
    Update { toast: ToastId, fields: FormValues },
    Remove { toast: ToastId, keys: Vec<u64> },
}

impl Request {
    /// Loading toast of a mutation. List requests carry none.
    pub fn toast(&self) -> Option<ToastId> {
        match self {
            Request::List { .. } => None,
            Request::Add { toast, .. } | Request::Update { toast, .. } | Request::Remove { toast, .. } => {
                Some(*toast)
            }
        }
    }
}

/// Settled result of a [`Request`]. Errors are already logged and reduced to a flag.
#[derive(Clone, Debug, PartialEq)]
pub enum Completion {
    Listed { seq: u64, data: Option<TableListData> },
    Added { toast: ToastId, ok: bool },
    Updated { toast: ToastId, ok: bool },
    Removed { toast: ToastId, ok: bool },
}

pub struct TablePage {
    /// Rows of the current page, in display order.
    pub rows: Vec<BookRecord>,
    /// Rows as the backend returned them; the base for re-sorting.
    loaded: Vec<BookRecord>,
    pub cursor: usize,
    /// Selected rows keyed by record `key`; survives page changes.
    pub selection: BTreeMap<u64, BookRecord>,
    pub sort: Option<SortState>,
    pub pager: PageCursor,
    /// Active name filter sent with every list request.
    pub name_filter: Option<String>,
    pub mode: PageMode,
    pub toasts: Toasts,
    /// A list request is in flight.
    pub loading: bool,
    fetch_seq: u64,
    /// Loading toast of the last submit from the open create/update modal.
    modal_submit: Option<ToastId>,
}

impl TablePage {
    pub fn new(page_size: u64) -> Self {
        Self {
            rows: Vec::new(),
            loaded: Vec::new(),
            cursor: 0,
            selection: BTreeMap::new(),
            sort: None,
            pager: PageCursor::new(page_size),
            name_filter: None,
            mode: PageMode::Idle,
            toasts: Toasts::new(),
            loading: false,
            fetch_seq: 0,
            modal_submit: None,
        }
    }

    // ----- list / pagination -------------------------------------------------

    /// Parameters for the next list request.
    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            name: self.name_filter.clone(),
            page_size: Some(self.pager.page_size),
            current_page: Some(self.pager.current),
            ..Default::default()
        }
    }

    /// Ask for the current page again. Older in-flight list responses become stale.
    pub fn reload(&mut self) -> Request {
        self.fetch_seq += 1;
        self.loading = true;
        Request::List {
            seq: self.fetch_seq,
            params: self.query_params(),
        }
    }

    pub fn next_page(&mut self) -> Option<Request> {
        if !self.pager.has_next() {
            return None;
        }
        self.pager.current += 1;
        self.cursor = 0;
        Some(self.reload())
    }

    pub fn prev_page(&mut self) -> Option<Request> {
        if !self.pager.has_prev() {
            return None;
        }
        self.pager.current -= 1;
        self.cursor = 0;
        Some(self.reload())
    }

    fn apply_list(&mut self, data: TableListData) {
        self.pager.absorb(&data.pagination);
        self.loaded = data.list;
        self.resort();
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
    }

    fn resort(&mut self) {
        self.rows = self.loaded.clone();
        if let Some(sort) = self.sort {
            grid::sort_rows(&mut self.rows, sort);
        }
    }

    /// Cycle sorting on `column` over the loaded rows.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort = SortState::cycle(self.sort, column);
        let current_key = self.current_row().map(|r| r.key);
        self.resort();
        if let Some(key) = current_key
            && let Some(idx) = self.rows.iter().position(|r| r.key == key)
        {
            self.cursor = idx;
        }
    }

    // ----- cursor / selection ------------------------------------------------

    pub fn current_row(&self) -> Option<&BookRecord> {
        self.rows.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.rows.len() {
            self.cursor += 1;
        }
    }

    pub fn toggle_select_current(&mut self) {
        if let Some(row) = self.rows.get(self.cursor) {
            if self.selection.remove(&row.key).is_none() {
                self.selection.insert(row.key, row.clone());
            }
        }
    }

    /// Select every row on the page, or clear them if all are already selected.
    pub fn toggle_select_page(&mut self) {
        let all = !self.rows.is_empty() && self.rows.iter().all(|r| self.selection.contains_key(&r.key));
        for row in &self.rows {
            if all {
                self.selection.remove(&row.key);
            } else {
                self.selection.insert(row.key, row.clone());
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, key: u64) -> bool {
        self.selection.contains_key(&key)
    }

    pub fn selected_keys(&self) -> Vec<u64> {
        self.selection.keys().copied().collect()
    }

    /// Count and price total of the selected rows.
    pub fn selection_summary(&self) -> (usize, f64) {
        (self.selection.len(), grid::price_total(self.selection.values()))
    }

    // ----- modes -------------------------------------------------------------

    pub fn open_create(&mut self) {
        if self.mode == PageMode::Idle {
            self.mode = PageMode::Create(CreateForm::new());
            self.modal_submit = None;
        }
    }

    /// Open the update modal for `values`. Empty values leave the page idle.
    pub fn open_update(&mut self, values: FormValues) -> bool {
        if self.mode != PageMode::Idle {
            return false;
        }
        match UpdateForm::open(values) {
            Some(form) => {
                self.mode = PageMode::Update(form);
                self.modal_submit = None;
                true
            }
            None => false,
        }
    }

    /// Open the update modal for the row under the cursor.
    pub fn open_update_current(&mut self) -> bool {
        match self.current_row().map(BookRecord::form_values) {
            Some(values) => self.open_update(values),
            None => false,
        }
    }

    /// The edit snapshot, if the update modal is open.
    pub fn edit_snapshot(&self) -> Option<FormValues> {
        match &self.mode {
            PageMode::Update(form) => Some(form.values()),
            _ => None,
        }
    }

    pub fn open_bulk_menu(&mut self) {
        if self.mode == PageMode::Idle && !self.selection.is_empty() {
            self.mode = PageMode::BulkMenu { selected: 0 };
        }
    }

    pub fn start_search(&mut self) {
        if self.mode == PageMode::Idle {
            let query = self.name_filter.clone().unwrap_or_default();
            self.mode = PageMode::Search { query };
        }
    }

    /// Apply the typed search as the name filter and fetch from page one.
    pub fn apply_search(&mut self, query: &str) -> Request {
        let q = query.trim();
        self.name_filter = if q.is_empty() { None } else { Some(q.to_string()) };
        self.pager.current = 1;
        self.cursor = 0;
        self.mode = PageMode::Idle;
        self.reload()
    }

    pub fn open_help(&mut self) {
        if self.mode == PageMode::Idle {
            self.mode = PageMode::Help;
        }
    }

    pub fn close_overlay(&mut self) {
        self.mode = PageMode::Idle;
        self.modal_submit = None;
    }

    /// The "view details" action: an informational message only.
    pub fn view_details(&mut self) {
        if self.current_row().is_some() {
            self.toasts.warning(MSG_VIEW_DETAILS);
        }
    }

    // ----- actions -----------------------------------------------------------

    /// Route a create-form outcome: submit sends the request, cancel closes the modal.
    pub fn on_create_form(&mut self, outcome: FormOutcome) -> Option<Request> {
        match outcome {
            FormOutcome::Submit(fields) => {
                let request = self.submit_create(fields);
                self.modal_submit = request.toast();
                Some(request)
            }
            FormOutcome::Cancel => {
                self.close_overlay();
                None
            }
        }
    }

    /// Route an update-form outcome. Cancel also drops the snapshot.
    pub fn on_update_form(&mut self, outcome: FormOutcome) -> Option<Request> {
        match outcome {
            FormOutcome::Submit(fields) => {
                let request = self.submit_update(fields);
                self.modal_submit = request.toast();
                Some(request)
            }
            FormOutcome::Cancel => {
                self.close_overlay();
                None
            }
        }
    }

    pub fn submit_create(&mut self, fields: FormValues) -> Request {
        let toast = self.toasts.loading(MSG_ADDING);
        Request::Add { toast, fields }
    }

    pub fn submit_update(&mut self, fields: FormValues) -> Request {
        let toast = self.toasts.loading(MSG_UPDATING);
        Request::Update { toast, fields }
    }

    /// Remove every selected row right away. With nothing selected, no request is made.
    pub fn remove_selected(&mut self) -> Option<Request> {
        if matches!(self.mode, PageMode::BulkMenu { .. }) {
            self.mode = PageMode::Idle;
        }
        if self.selection.is_empty() {
            return None;
        }
        let toast = self.toasts.loading(MSG_REMOVING);
        Some(Request::Remove {
            toast,
            keys: self.selected_keys(),
        })
    }

    /// Activate a bulk menu entry.
    pub fn run_bulk(&mut self, action: BulkAction) -> Option<Request> {
        match action {
            BulkAction::Remove => self.remove_selected(),
            BulkAction::Approve => {
                tracing::debug!(selected = self.selection.len(), "bulk approve has no handler");
                self.mode = PageMode::Idle;
                None
            }
        }
    }

    /// Settle a finished request. Returns the grid reload to issue, if any.
    pub fn complete(&mut self, completion: Completion) -> Option<Request> {
        match completion {
            Completion::Listed { seq, data } => {
                if seq != self.fetch_seq {
                    tracing::debug!(seq, latest = self.fetch_seq, "dropping stale list response");
                    return None;
                }
                self.loading = false;
                match data {
                    Some(data) => self.apply_list(data),
                    None => {
                        self.toasts.error(MSG_LIST_FAILED);
                    }
                }
                None
            }
            Completion::Added { toast, ok } => {
                self.toasts.hide(toast);
                if !ok {
                    self.toasts.error(MSG_ADD_FAILED);
                    return None;
                }
                self.toasts.success(MSG_ADDED);
                let reload = self.reload();
                if matches!(self.mode, PageMode::Create(_)) {
                    self.close_submitted_modal(toast);
                }
                Some(reload)
            }
            Completion::Updated { toast, ok } => {
                self.toasts.hide(toast);
                if !ok {
                    self.toasts.error(MSG_UPDATE_FAILED);
                    return None;
                }
                self.toasts.success(MSG_UPDATED);
                if matches!(self.mode, PageMode::Update(_)) {
                    self.close_submitted_modal(toast);
                }
                Some(self.reload())
            }
            Completion::Removed { toast, ok } => {
                self.toasts.hide(toast);
                if !ok {
                    self.toasts.error(MSG_REMOVE_FAILED);
                    return None;
                }
                self.toasts.success(MSG_REMOVED);
                self.selection.clear();
                Some(self.reload())
            }
        }
    }

    /// Close the open modal only if `toast` belongs to its own submit.
    fn close_submitted_modal(&mut self, toast: ToastId) {
        if self.modal_submit == Some(toast) {
            self.close_overlay();
        } else {
            tracing::debug!("late completion left the open modal alone");
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.toasts.prune(now);
    }
}
