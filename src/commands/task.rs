//! Task Commands
//!
//! Moving a task is a plain form POST back to the current page; the server
//! answers with a redirect or a re-rendered board, so nothing is read back.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlFormElement, HtmlInputElement};

use crate::config::BoardConfig;
use crate::dom;
use crate::error::{BoardError, BoardResult};
use crate::models::MoveIntent;

// ========================
// Wire fields
// ========================

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";
pub const TASK_ID_FIELD: &str = "task_id";
pub const STATUS_FIELD: &str = "status";

/// Form target for the current location
pub fn form_action(pathname: &str, search: &str, preserve_query: bool) -> String {
    if preserve_query {
        format!("{}{}", pathname, search)
    } else {
        pathname.to_string()
    }
}

/// Hidden POST form carrying one move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveForm {
    pub action: String,
    pub fields: [(&'static str, String); 3],
}

impl MoveForm {
    pub fn new(intent: &MoveIntent, csrf_token: String, action: String) -> Self {
        Self {
            action,
            fields: [
                (CSRF_FIELD, csrf_token),
                (TASK_ID_FIELD, intent.task_id.clone()),
                (STATUS_FIELD, intent.to_status.clone()),
            ],
        }
    }

    /// Attach to `<body>` and submit; the page navigates away afterwards
    pub fn submit(&self, document: &Document) -> BoardResult<()> {
        let form: HtmlFormElement = document
            .create_element("form")?
            .dyn_into()
            .map_err(|_| BoardError::Dom("created element is not a form".to_string()))?;
        form.set_method("POST");
        form.set_action(&self.action);
        form.style().set_property("display", "none")?;

        for (name, value) in &self.fields {
            let input: HtmlInputElement = document
                .create_element("input")?
                .dyn_into()
                .map_err(|_| BoardError::Dom("created element is not an input".to_string()))?;
            input.set_type("hidden");
            input.set_name(name);
            input.set_value(value);
            form.append_child(&input)?;
        }

        dom::body(document)?.append_child(&form)?;
        form.submit()?;
        Ok(())
    }
}

/// Anti-forgery token rendered into the page, "" when absent
pub fn read_csrf_token(document: &Document) -> String {
    document
        .query_selector(&format!("input[name=\"{}\"]", CSRF_FIELD))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

/// Submit a move to the page the board was rendered on
pub fn post_move(intent: &MoveIntent, config: &BoardConfig) -> BoardResult<()> {
    let window = dom::window()?;
    let document = window.document().ok_or(BoardError::NoDocument)?;
    let location = window.location();
    let action = form_action(&location.pathname()?, &location.search()?, config.preserve_query_string);

    let token = read_csrf_token(&document);
    if token.is_empty() {
        tracing::warn!("no {} input on page, posting move without token", CSRF_FIELD);
    }

    let form = MoveForm::new(intent, token, action);
    tracing::info!(
        task_id = %intent.task_id,
        from = %intent.from_status,
        to = %intent.to_status,
        action = %form.action,
        "submitting task move"
    );
    form.submit(&document)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(task_id: &str, to: &str) -> MoveIntent {
        MoveIntent {
            task_id: task_id.to_string(),
            from_status: "todo".to_string(),
            to_status: to.to_string(),
        }
    }

    #[test]
    fn test_form_action_keeps_query() {
        assert_eq!(form_action("/dashboard/tasks/", "?owner=me", true), "/dashboard/tasks/?owner=me");
        assert_eq!(form_action("/dashboard/tasks/", "", true), "/dashboard/tasks/");
    }

    #[test]
    fn test_form_action_drops_query() {
        assert_eq!(form_action("/dashboard/tasks/", "?owner=me", false), "/dashboard/tasks/");
    }

    #[test]
    fn test_move_form_fields() {
        let form = MoveForm::new(&intent("42", "done"), "tok".to_string(), "/dashboard/tasks/".to_string());
        assert_eq!(form.action, "/dashboard/tasks/");
        assert_eq!(
            form.fields,
            [
                ("csrfmiddlewaretoken", "tok".to_string()),
                ("task_id", "42".to_string()),
                ("status", "done".to_string()),
            ]
        );
    }

    #[test]
    fn test_move_form_without_token_still_carries_field() {
        let form = MoveForm::new(&intent("42", "done"), String::new(), "/".to_string());
        assert_eq!(form.fields[0], (CSRF_FIELD, String::new()));
    }
}
