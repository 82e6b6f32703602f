//! Board Controller
//!
//! Binds drag behaviour to the status columns of a server-rendered board
//! and turns cross-column drops into a move submission.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;
use web_sys::Element;

use kanban_dragdrop::{self as dragdrop, SortEnd, SortableOptions};

use crate::commands;
use crate::config::BoardConfig;
use crate::dom;
use crate::error::{BoardError, BoardResult};
use crate::models::MoveIntent;

/// Global name page scripts call to (re)initialize the board
pub const INIT_FUNCTION: &str = "initKanbanDnd";

/// Drag support the board is built on
pub trait DragCapability {
    fn is_available(&self) -> bool;

    /// Bind columns into one group; returns how many were newly bound
    fn bind(&self, columns: &[Element], on_end: Rc<dyn Fn(SortEnd)>) -> usize;
}

/// Pointer-driven drag from `kanban-dragdrop`
pub struct PointerDrag {
    options: Rc<SortableOptions>,
}

impl PointerDrag {
    pub fn new(options: SortableOptions) -> Self {
        Self { options: Rc::new(options) }
    }
}

impl DragCapability for PointerDrag {
    fn is_available(&self) -> bool {
        dragdrop::is_supported()
    }

    fn bind(&self, columns: &[Element], on_end: Rc<dyn Fn(SortEnd)>) -> usize {
        let dnd = dragdrop::create_dnd_signals();
        let bound = columns
            .iter()
            .filter(|column| dragdrop::attach_container(dnd, &self.options, column))
            .count();
        // Already-registered columns keep the listeners of their first binding
        if bound > 0 {
            dragdrop::bind_global_pointerup(dnd, Rc::clone(&self.options), move |ev| on_end(ev));
        }
        bound
    }
}

/// Sends a move to the server
pub type SubmitMove = Rc<dyn Fn(&MoveIntent, &BoardConfig) -> BoardResult<()>>;

pub struct BoardController<D: DragCapability> {
    config: Rc<BoardConfig>,
    drag: D,
    submit: SubmitMove,
}

impl BoardController<PointerDrag> {
    pub fn with_pointer_drag(config: BoardConfig) -> Self {
        let drag = PointerDrag::new(config.to_sortable_options());
        Self::new(config, drag)
    }
}

impl<D: DragCapability + 'static> BoardController<D> {
    pub fn new(config: BoardConfig, drag: D) -> Self {
        Self {
            config: Rc::new(config),
            drag,
            submit: Rc::new(commands::post_move),
        }
    }

    /// Replace how moves are sent (form POST by default)
    pub fn with_submit(mut self, submit: SubmitMove) -> Self {
        self.submit = submit;
        self
    }

    /// Bind every column on the page. Returns the number of newly bound
    /// columns; 0 without drag support or without columns.
    pub fn initialize(&self) -> BoardResult<usize> {
        if !self.drag.is_available() {
            tracing::debug!("drag-and-drop unavailable, board left static");
            return Ok(0);
        }

        let document = dom::document()?;
        let columns = dom::query_all(&document, &self.config.column_selector)?;
        Ok(self.bind_columns(&columns))
    }

    fn bind_columns(&self, columns: &[Element]) -> usize {
        if columns.is_empty() {
            tracing::debug!(selector = %self.config.column_selector, "no kanban columns on page");
            return 0;
        }

        let config = Rc::clone(&self.config);
        let submit = Rc::clone(&self.submit);
        let bound = self.drag.bind(
            columns,
            Rc::new(move |ev: SortEnd| {
                handle_drop(&config, DropAttrs::read(&config, &ev), &*submit);
            }),
        );
        tracing::info!(bound, found = columns.len(), group = %self.config.group, "kanban columns bound");
        bound
    }

    /// Initialize once the DOM is ready
    pub fn mount(self) -> BoardResult<()> {
        let document = dom::document()?;
        dom::on_dom_ready(&document, move || {
            if let Err(err) = self.initialize() {
                tracing::error!(%err, "kanban board initialization failed");
            }
        })
    }
}

/// Attribute values of a drop, read off the columns and the card
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DropAttrs {
    task_id: Option<String>,
    from_status: Option<String>,
    to_status: Option<String>,
}

impl DropAttrs {
    fn read(config: &BoardConfig, ev: &SortEnd) -> Self {
        Self {
            task_id: ev.item.get_attribute(&config.task_id_attribute),
            from_status: ev.from.get_attribute(&config.status_attribute),
            to_status: ev.to.get_attribute(&config.status_attribute),
        }
    }
}

/// Drop callback: submit the move when the card changed status.
/// Returns whether a move was submitted.
fn handle_drop(
    config: &BoardConfig,
    attrs: DropAttrs,
    submit: &dyn Fn(&MoveIntent, &BoardConfig) -> BoardResult<()>,
) -> bool {
    let Some(intent) = MoveIntent::from_drop(attrs.task_id, attrs.from_status, attrs.to_status) else {
        tracing::debug!("drop did not change a task's status");
        return false;
    };

    if let Err(err) = submit(&intent, config) {
        tracing::error!(%err, task_id = %intent.task_id, "failed to submit task move");
    }
    true
}

/// Publish `window.initKanbanDnd(options?)` for page scripts.
/// Without options the page config is used; an options object replaces it.
pub fn expose_init_function(defaults: BoardConfig) -> BoardResult<()> {
    let window = dom::window()?;
    let init = Closure::<dyn Fn(JsValue)>::new(move |options: JsValue| {
        let config = if options.is_undefined() || options.is_null() {
            defaults.clone()
        } else {
            match serde_wasm_bindgen::from_value::<BoardConfig>(options) {
                Ok(config) => config,
                Err(err) => {
                    let err = BoardError::from(err);
                    tracing::error!(%err, "{}() ignored", INIT_FUNCTION);
                    return;
                }
            }
        };

        if let Err(err) = BoardController::with_pointer_drag(config).initialize() {
            tracing::error!(%err, "kanban board initialization failed");
        }
    });

    js_sys::Reflect::set(&window, &INIT_FUNCTION.into(), init.as_ref())?;
    init.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn attrs(task_id: &str, from: &str, to: &str) -> DropAttrs {
        DropAttrs {
            task_id: Some(task_id.to_string()),
            from_status: Some(from.to_string()),
            to_status: Some(to.to_string()),
        }
    }

    fn recording_submit(sent: Rc<RefCell<Vec<MoveIntent>>>) -> impl Fn(&MoveIntent, &BoardConfig) -> BoardResult<()> {
        move |intent, _config| {
            sent.borrow_mut().push(intent.clone());
            Ok(())
        }
    }

    struct CountingDrag {
        bind_calls: Cell<usize>,
    }

    impl DragCapability for CountingDrag {
        fn is_available(&self) -> bool {
            true
        }

        fn bind(&self, columns: &[Element], _on_end: Rc<dyn Fn(SortEnd)>) -> usize {
            self.bind_calls.set(self.bind_calls.get() + 1);
            columns.len()
        }
    }

    struct NoDrag {
        bind_calls: Cell<usize>,
    }

    impl DragCapability for NoDrag {
        fn is_available(&self) -> bool {
            false
        }

        fn bind(&self, _columns: &[Element], _on_end: Rc<dyn Fn(SortEnd)>) -> usize {
            self.bind_calls.set(self.bind_calls.get() + 1);
            0
        }
    }

    #[test]
    fn test_initialize_without_drag_support_is_noop() {
        let controller = BoardController::new(BoardConfig::default(), NoDrag { bind_calls: Cell::new(0) });
        assert_eq!(controller.initialize().unwrap(), 0);
        assert_eq!(controller.drag.bind_calls.get(), 0);
    }

    #[test]
    fn test_no_columns_binds_nothing() {
        let controller = BoardController::new(BoardConfig::default(), CountingDrag { bind_calls: Cell::new(0) });
        assert_eq!(controller.bind_columns(&[]), 0);
        assert_eq!(controller.drag.bind_calls.get(), 0);
    }

    #[test]
    fn test_cross_column_drop_submits_once() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let submit = recording_submit(Rc::clone(&sent));

        assert!(handle_drop(&BoardConfig::default(), attrs("42", "todo", "done"), &submit));

        let sent = sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].task_id, "42");
        assert_eq!(sent[0].to_status, "done");
    }

    #[test]
    fn test_reorder_within_column_submits_nothing() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let submit = recording_submit(Rc::clone(&sent));

        assert!(!handle_drop(&BoardConfig::default(), attrs("42", "todo", "todo"), &submit));
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_drop_of_card_without_id_submits_nothing() {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let submit = recording_submit(Rc::clone(&sent));
        let no_id = DropAttrs { task_id: None, ..attrs("", "todo", "done") };

        assert!(!handle_drop(&BoardConfig::default(), no_id, &submit));
        assert!(sent.borrow().is_empty());
    }

    #[test]
    fn test_failed_submit_still_counts_as_attempt() {
        let failing = |_: &MoveIntent, _: &BoardConfig| -> BoardResult<()> { Err(BoardError::NoBody) };
        assert!(handle_drop(&BoardConfig::default(), attrs("7", "backlog", "to_do"), &failing));
    }

    #[test]
    fn test_pointer_drag_uses_config_options() {
        let drag = BoardController::with_pointer_drag(BoardConfig::handle_variant()).drag;
        assert_eq!(drag.options.draggable, ".task-card");
        assert_eq!(drag.options.ghost_class, "task-card-ghost");
    }
}
