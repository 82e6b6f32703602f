//! Kanban DragDrop
//!
//! Sortable-style drag-and-drop between list containers using pointer events.
//! Containers registered under the same group exchange items; the dragged
//! element is moved live through the DOM and a single `SortEnd` is reported
//! on release. Uses movement threshold to distinguish click from drag.

mod geometry;

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent, Node, PointerEvent};

pub use geometry::{exceeds_threshold, flip_offset, insert_side, InsertSide, DRAG_THRESHOLD_PX};

/// Attribute marking a container as a member of a drag group
pub const GROUP_ATTR: &str = "data-dnd-group";

/// Clicks are swallowed this long after a drop
const CLICK_SUPPRESS_MS: u32 = 100;

/// Controls whose press must keep its default action (focus, open, type)
const FORM_CONTROL_TAGS: [&str; 5] = ["INPUT", "SELECT", "TEXTAREA", "BUTTON", "OPTION"];

/// Where a drag may begin inside an item
#[derive(Clone, Debug, PartialEq)]
pub enum StartRule {
    /// Anywhere except on descendants matching the selector
    Filter { selector: String, prevent_default: bool },
    /// Only on a descendant matching the selector
    Handle(String),
    Anywhere,
}

/// Options shared by every container of a group
#[derive(Clone, Debug, PartialEq)]
pub struct SortableOptions {
    /// Items move freely between containers of one group
    pub group: String,
    /// Selector for draggable children
    pub draggable: String,
    /// Sibling animation duration, 0 disables
    pub animation_ms: u32,
    /// Class on the item while it is dragged
    pub ghost_class: String,
    /// Class on the item from press until release
    pub chosen_class: String,
    pub start_rule: StartRule,
}

/// Completed drag, reported once on release
#[derive(Clone, Debug)]
pub struct SortEnd {
    /// Container the item was picked up from
    pub from: Element,
    /// Container the item was released in
    pub to: Element,
    pub item: Element,
    pub old_index: usize,
    pub new_index: usize,
}

/// Item pressed but not yet dragged
#[derive(Clone, Debug)]
pub struct PendingDrag {
    pub item: Element,
    pub origin: Element,
    pub start_x: i32,
    pub start_y: i32,
}

/// Item being dragged
#[derive(Clone, Debug)]
pub struct ActiveDrag {
    pub item: Element,
    pub origin: Element,
    pub old_index: usize,
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Pending item (pointerdown but not yet dragging)
    pub pending_read: ReadSignal<Option<PendingDrag>, LocalStorage>,
    pub pending_write: WriteSignal<Option<PendingDrag>, LocalStorage>,
    pub dragging_read: ReadSignal<Option<ActiveDrag>, LocalStorage>,
    pub dragging_write: WriteSignal<Option<ActiveDrag>, LocalStorage>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
}

pub fn create_dnd_signals() -> DndSignals {
    let (pending_read, pending_write) = signal_local(None::<PendingDrag>);
    let (dragging_read, dragging_write) = signal_local(None::<ActiveDrag>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    DndSignals {
        pending_read,
        pending_write,
        dragging_read,
        dragging_write,
        drag_just_ended_read,
        drag_just_ended_write,
    }
}

/// Whether the environment can drive drag-and-drop at all
pub fn is_supported() -> bool {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    js_sys::Reflect::has(&doc, &"onpointerdown".into()).unwrap_or(false)
}

/// Attribute selector matching every container of a group
pub fn group_selector(group: &str) -> String {
    let escaped = group.replace('\\', "\\\\").replace('"', "\\\"");
    format!("[{}=\"{}\"]", GROUP_ATTR, escaped)
}

/// Whether a container carrying `existing` as its group attribute may join a group.
/// A container belongs to one group for the page's lifetime.
pub fn can_register(existing: Option<&str>) -> bool {
    existing.is_none()
}

/// Whether pressing an element with this tag must keep its default action
pub fn is_form_control(tag_name: &str) -> bool {
    FORM_CONTROL_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(tag_name))
}

/// Register a container into the options' group and bind its pointerdown.
/// Returns false when the container already belongs to a group.
pub fn attach_container(dnd: DndSignals, options: &Rc<SortableOptions>, container: &Element) -> bool {
    if !can_register(container.get_attribute(GROUP_ATTR).as_deref()) {
        return false;
    }
    if container.set_attribute(GROUP_ATTR, &options.group).is_err() {
        return false;
    }

    let on_pointerdown = Closure::<dyn FnMut(PointerEvent)>::new(make_on_pointerdown(
        dnd,
        Rc::clone(options),
        container.clone(),
    ));
    let bound = container
        .add_event_listener_with_callback("pointerdown", on_pointerdown.as_ref().unchecked_ref())
        .is_ok();
    on_pointerdown.forget();
    bound
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_write.set(None);
    dnd.pending_write.set(None);
    dnd.drag_just_ended_write.set(true);
    lock_text_selection(false);

    let clear = dnd.drag_just_ended_write;
    Timeout::new(CLICK_SUPPRESS_MS, move || clear.set(false)).forget();
}

/// Create pointerdown handler for a container.
/// Records a pending drag for the pressed item with start position.
pub fn make_on_pointerdown(
    dnd: DndSignals,
    options: Rc<SortableOptions>,
    container: Element,
) -> impl Fn(PointerEvent) + 'static {
    move |ev: PointerEvent| {
        if ev.button() != 0 {
            return;
        }
        let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Some(item) = owning_item(&target, &options.draggable, &container) else {
            return;
        };

        match &options.start_rule {
            StartRule::Filter { selector, prevent_default } => {
                if let Some(filtered) = filtered_by(&target, selector, &item) {
                    let control = is_form_control(&target.tag_name()) || is_form_control(&filtered.tag_name());
                    if *prevent_default && !control {
                        ev.prevent_default();
                    }
                    return;
                }
            }
            StartRule::Handle(handle) => {
                if filtered_by(&target, handle, &item).is_none() {
                    return;
                }
            }
            StartRule::Anywhere => {}
        }

        let _ = item.class_list().add_1(&options.chosen_class);
        dnd.pending_write.set(Some(PendingDrag {
            item,
            origin: container.clone(),
            start_x: ev.client_x(),
            start_y: ev.client_y(),
        }));
    }
}

/// Bind document pointermove - starts drag if moved enough, then follows the pointer
pub fn bind_global_pointermove(dnd: DndSignals, options: Rc<SortableOptions>) {
    let on_pointermove = Closure::<dyn FnMut(PointerEvent)>::new(move |ev: PointerEvent| {
        if let Some(active) = dnd.dragging_read.get_untracked() {
            // Keep the browser from selecting text under the pointer
            ev.prevent_default();
            follow_pointer(&active, &options, ev.client_x(), ev.client_y());
            return;
        }

        let Some(pending) = dnd.pending_read.get_untracked() else {
            return;
        };
        if exceeds_threshold((pending.start_x, pending.start_y), (ev.client_x(), ev.client_y())) {
            start_drag(dnd, &options, pending);
        }
    });

    listen_on_document("pointermove", &on_pointermove, false);
    on_pointermove.forget();
}

/// Bind global pointerup handler for drop detection; a cancelled pointer
/// ends the drag where the item currently sits.
/// Also binds the group's pointermove and post-drop click suppression.
pub fn bind_global_pointerup<F>(dnd: DndSignals, options: Rc<SortableOptions>, on_end: F)
where
    F: Fn(SortEnd) + 'static,
{
    let opts = Rc::clone(&options);
    let on_pointerup = Closure::<dyn FnMut(PointerEvent)>::new(move |_ev: PointerEvent| {
        if let Some(pending) = dnd.pending_read.get_untracked() {
            // Released before the threshold: the click fires naturally
            let _ = pending.item.class_list().remove_1(&opts.chosen_class);
            dnd.pending_write.set(None);
        }

        let Some(active) = dnd.dragging_read.get_untracked() else {
            return;
        };
        let _ = active.item.class_list().remove_2(&opts.ghost_class, &opts.chosen_class);
        end_drag(&dnd);

        if let Some(to) = active.item.parent_element() {
            let new_index = index_in(&to, &active.item, &opts.draggable);
            on_end(SortEnd {
                from: active.origin,
                to,
                item: active.item,
                old_index: active.old_index,
                new_index,
            });
        }
    });

    listen_on_document("pointerup", &on_pointerup, false);
    listen_on_document("pointercancel", &on_pointerup, false);
    on_pointerup.forget();

    bind_click_suppressor(dnd);
    bind_global_pointermove(dnd, options);
}

fn bind_click_suppressor(dnd: DndSignals) {
    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
        if dnd.drag_just_ended_read.get_untracked() {
            ev.prevent_default();
            ev.stop_propagation();
        }
    });
    listen_on_document("click", &on_click, true);
    on_click.forget();
}

fn listen_on_document<T: ?Sized + WasmClosure>(event: &str, callback: &Closure<T>, capture: bool) {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback_and_bool(
            event,
            callback.as_ref().unchecked_ref(),
            capture,
        );
    }
}

fn start_drag(dnd: DndSignals, options: &SortableOptions, pending: PendingDrag) {
    let old_index = index_in(&pending.origin, &pending.item, &options.draggable);
    let _ = pending.item.class_list().add_1(&options.ghost_class);
    lock_text_selection(true);
    dnd.pending_write.set(None);
    dnd.dragging_write.set(Some(ActiveDrag {
        item: pending.item,
        origin: pending.origin,
        old_index,
    }));
}

/// Move the dragged item to wherever the pointer currently points inside the group
/// Keep the page from selecting text while an item is dragged
fn lock_text_selection(locked: bool) {
    let Some(win) = web_sys::window() else {
        return;
    };
    if locked {
        if let Ok(Some(selection)) = win.get_selection() {
            let _ = selection.remove_all_ranges();
        }
    }
    let Some(body) = win.document().and_then(|doc| doc.body()) else {
        return;
    };
    let style = body.style();
    for property in ["user-select", "-webkit-user-select"] {
        let _ = if locked {
            style.set_property(property, "none")
        } else {
            style.remove_property(property).map(|_| ())
        };
    }
}

fn follow_pointer(active: &ActiveDrag, options: &SortableOptions, x: i32, y: i32) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(under) = doc.element_from_point(x as f32, y as f32) else {
        return;
    };
    let Some(container) = under.closest(&group_selector(&options.group)).ok().flatten() else {
        return;
    };
    let item = &active.item;

    let hovered = under
        .closest(&options.draggable)
        .ok()
        .flatten()
        .filter(|card| !same_node(card, item))
        .filter(|card| is_child_of(card, &container));

    let reference = match hovered {
        Some(card) => {
            let rect = card.get_bounding_client_rect();
            match insert_side(f64::from(y), rect.top(), rect.height()) {
                InsertSide::Before => Some(card),
                InsertSide::After => card.next_element_sibling(),
            }
        }
        // Empty space of the column the item already sits in
        None if is_child_of(item, &container) => return,
        None => None,
    };

    if already_placed(item, &container, reference.as_ref()) {
        return;
    }
    relocate(item, &container, reference.as_ref(), options);
}

fn already_placed(item: &Element, container: &Element, reference: Option<&Element>) -> bool {
    if !is_child_of(item, container) {
        return false;
    }
    match (reference, item.next_element_sibling()) {
        (Some(r), _) if same_node(r, item) => true,
        (Some(r), Some(next)) => same_node(r, &next),
        (None, None) => true,
        _ => false,
    }
}

/// Insert the item and animate every displaced sibling back from its old box
fn relocate(item: &Element, container: &Element, reference: Option<&Element>, options: &SortableOptions) {
    let mut affected = draggable_children(container, &options.draggable);
    if let Some(source) = item.parent_element().filter(|s| !same_node(s, container)) {
        affected.extend(draggable_children(&source, &options.draggable));
    }
    let before: Vec<(f64, f64)> = affected.iter().map(position).collect();

    if container.insert_before(item, reference.map(node)).is_err() {
        return;
    }
    if options.animation_ms == 0 {
        return;
    }

    for (el, old) in affected.iter().zip(before) {
        if let Some(offset) = flip_offset(old, position(el)) {
            animate(el, offset, options.animation_ms);
        }
    }
}

fn animate(el: &Element, (dx, dy): (f64, f64), duration_ms: u32) {
    let Some(el) = el.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = el.style();
    let _ = style.set_property("transition", "none");
    let _ = style.set_property("transform", &format!("translate({}px, {}px)", dx, dy));
    // Force layout so the inverted position is painted before the transition
    let _ = el.offset_width();
    let _ = style.set_property("transition", &format!("transform {}ms", duration_ms));
    let _ = style.set_property("transform", "");

    let el = el.clone();
    Timeout::new(duration_ms, move || {
        let style = el.style();
        let _ = style.remove_property("transition");
        let _ = style.remove_property("transform");
    })
    .forget();
}

fn position(el: &Element) -> (f64, f64) {
    let rect = el.get_bounding_client_rect();
    (rect.left(), rect.top())
}

/// The draggable item under `target` that is a direct child of `container`
fn owning_item(target: &Element, draggable: &str, container: &Element) -> Option<Element> {
    let item = target.closest(draggable).ok().flatten()?;
    is_child_of(&item, container).then_some(item)
}

/// Element matching `selector` that `target` sits on (or inside), within `item`
fn filtered_by(target: &Element, selector: &str, item: &Element) -> Option<Element> {
    target
        .closest(selector)
        .ok()
        .flatten()
        .filter(|found| item.contains(Some(node(found))))
}

fn draggable_children(container: &Element, draggable: &str) -> Vec<Element> {
    let children = container.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .filter(|child| child.matches(draggable).unwrap_or(false))
        .collect()
}

fn index_in(container: &Element, item: &Element, draggable: &str) -> usize {
    draggable_children(container, draggable)
        .iter()
        .position(|child| same_node(child, item))
        .unwrap_or(0)
}

fn is_child_of(el: &Element, container: &Element) -> bool {
    el.parent_element().is_some_and(|p| same_node(&p, container))
}

fn same_node(a: &Element, b: &Element) -> bool {
    a.is_same_node(Some(node(b)))
}

fn node(el: &Element) -> &Node {
    el
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_selector() {
        assert_eq!(group_selector("kanban-tasks"), "[data-dnd-group=\"kanban-tasks\"]");
    }

    #[test]
    fn test_group_selector_escapes_quotes() {
        assert_eq!(group_selector("a\"b"), "[data-dnd-group=\"a\\\"b\"]");
        assert_eq!(group_selector("a\\b"), "[data-dnd-group=\"a\\\\b\"]");
    }

    #[test]
    fn test_container_joins_only_one_group() {
        assert!(can_register(None));
        assert!(!can_register(Some("kanban-tasks")));
        assert!(!can_register(Some("other")));
    }

    #[test]
    fn test_form_controls_keep_default_press() {
        assert!(is_form_control("SELECT"));
        assert!(is_form_control("input"));
        assert!(is_form_control("TEXTAREA"));
        assert!(is_form_control("BUTTON"));
        assert!(!is_form_control("A"));
        assert!(!is_form_control("DIV"));
        assert!(!is_form_control("SPAN"));
    }

    #[test]
    fn test_start_rules_compare_by_value() {
        let filter = StartRule::Filter { selector: "a, input".to_string(), prevent_default: true };
        assert_eq!(filter, StartRule::Filter { selector: "a, input".to_string(), prevent_default: true });
        assert_ne!(filter, StartRule::Handle("a, input".to_string()));
    }
}
