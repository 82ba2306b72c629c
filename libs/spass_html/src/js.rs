//! Generation of the inline JavaScript calls used as event handlers.
//! The functions called are defined in `spass_forms.js`.

use itertools::Itertools;

/// Escape `s` for use inside a single-quoted JavaScript string.
pub fn js_string_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            _ => out.push(c),
        }
    }
    out
}

/// `'s'`
pub fn js_string(s: &str) -> String {
    format!("'{}'", js_string_escape(s))
}

/// An object literal with string keys and values: `{'a':'1','b':'2'}`.
pub fn js_object<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    format!("{{{}}}",
            pairs.into_iter()
            .map(|(k, v)| format!("{}:{}", js_string(k), js_string(v)))
            .join(","))
}

/// Handler setting the whole selection of the listing in form
/// `form_id`, then submitting it.
pub fn choice_call<'a>(form_id: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>)
                       -> String {
    format!("entryChoiceSetSelection({}, {});", js_string(form_id), js_object(pairs))
}

/// Handler adding or removing `value` from the selected values of
/// `column`, then submitting the form.
pub fn multi_choice_call(form_id: &str, column: &str, value: &str) -> String {
    format!("entryMultiChoiceSetSelection({}, {}, {});",
            js_string(form_id), js_string(column), js_string(value))
}
