//! Board Configuration
//!
//! Options the page passes to the board as JSON in
//! `<script type="application/json" id="kanban-dnd-config">`.
//! Every field is optional; missing ones take the defaults below.

use serde::Deserialize;
use web_sys::Document;

use kanban_dragdrop::{SortableOptions, StartRule};

use crate::error::{BoardError, BoardResult};

/// Id of the element holding the JSON config
pub const CONFIG_ELEMENT_ID: &str = "kanban-dnd-config";

const DEFAULT_FILTER: &str = ".btn, a, input, select, textarea";
const DEFAULT_HANDLE: &str = ".drag-handle";

/// Which part of a card may start a drag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DragRestriction {
    /// Whole card, except interactive controls matching `filter`
    FilterExcludedControls {
        #[serde(default = "default_filter")]
        filter: String,
        #[serde(default = "default_true", rename = "preventOnFilter")]
        prevent_on_filter: bool,
    },
    /// Only the handle element inside the card
    HandleElement {
        #[serde(default = "default_handle")]
        handle: String,
    },
}

impl Default for DragRestriction {
    fn default() -> Self {
        DragRestriction::FilterExcludedControls {
            filter: default_filter(),
            prevent_on_filter: true,
        }
    }
}

fn default_filter() -> String {
    DEFAULT_FILTER.to_string()
}

fn default_handle() -> String {
    DEFAULT_HANDLE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardConfig {
    /// Selector for status columns
    pub column_selector: String,
    /// Selector for task cards inside a column
    pub card_selector: String,
    /// Column attribute holding its status
    pub status_attribute: String,
    /// Card attribute holding its task id
    pub task_id_attribute: String,
    /// Drag group shared by all columns
    pub group: String,
    pub animation_ms: u32,
    pub ghost_class: String,
    pub chosen_class: String,
    pub drag_restriction: DragRestriction,
    /// Keep `?query` on the form action
    pub preserve_query_string: bool,
    /// Publish `window.initKanbanDnd`
    pub expose_init_function: bool,
    pub log_level: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            column_selector: ".kanban-column".to_string(),
            card_selector: ".task-card".to_string(),
            status_attribute: "data-status".to_string(),
            task_id_attribute: "data-task-id".to_string(),
            group: "kanban-tasks".to_string(),
            animation_ms: 150,
            ghost_class: "sortable-ghost".to_string(),
            chosen_class: "sortable-chosen".to_string(),
            drag_restriction: DragRestriction::default(),
            preserve_query_string: true,
            expose_init_function: true,
            log_level: "info".to_string(),
        }
    }
}

impl BoardConfig {
    /// Cards dragged by a handle, plain path as form target, no global init function
    pub fn handle_variant() -> Self {
        Self {
            ghost_class: "task-card-ghost".to_string(),
            drag_restriction: DragRestriction::HandleElement { handle: default_handle() },
            preserve_query_string: false,
            expose_init_function: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> BoardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config from the text of the config element: defaults when it is
    /// missing or blank, and also when it does not parse (the error is
    /// handed back so it can be logged once logging is up).
    pub fn parse_or_default(json: Option<&str>) -> (Self, Option<BoardError>) {
        match json {
            Some(json) if !json.trim().is_empty() => match Self::from_json(json) {
                Ok(config) => (config, None),
                Err(err) => (Self::default(), Some(err)),
            },
            _ => (Self::default(), None),
        }
    }

    /// Read the page's config element
    pub fn load(document: &Document) -> (Self, Option<BoardError>) {
        let json = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        Self::parse_or_default(json.as_deref())
    }

    pub fn to_sortable_options(&self) -> SortableOptions {
        let start_rule = match &self.drag_restriction {
            DragRestriction::FilterExcludedControls { filter, prevent_on_filter } => StartRule::Filter {
                selector: filter.clone(),
                prevent_default: *prevent_on_filter,
            },
            DragRestriction::HandleElement { handle } => StartRule::Handle(handle.clone()),
        };
        SortableOptions {
            group: self.group.clone(),
            draggable: self.card_selector.clone(),
            animation_ms: self.animation_ms,
            ghost_class: self.ghost_class.clone(),
            chosen_class: self.chosen_class.clone(),
            start_rule,
        }
    }
}
