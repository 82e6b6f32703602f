//! DOM Helpers
//!
//! Lookups shared by the board and the move form.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::{BoardError, BoardResult};

pub fn window() -> BoardResult<Window> {
    web_sys::window().ok_or(BoardError::NoWindow)
}

pub fn document() -> BoardResult<Document> {
    window()?.document().ok_or(BoardError::NoDocument)
}

pub fn body(document: &Document) -> BoardResult<HtmlElement> {
    document.body().ok_or(BoardError::NoBody)
}

/// All elements matching `selector`, in document order
pub fn query_all(document: &Document, selector: &str) -> BoardResult<Vec<Element>> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// `document.readyState` before the DOM is parsed
fn is_loading(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Run `f` once the DOM is parsed: right away unless the document is still loading
pub fn on_dom_ready<F>(document: &Document, f: F) -> BoardResult<()>
where
    F: FnOnce() + 'static,
{
    if !is_loading(&document.ready_state()) {
        f();
        return Ok(());
    }
    let callback = Closure::once_into_js(f);
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    Ok(())
}
