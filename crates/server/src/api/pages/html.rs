//! Hand-written HTML building blocks shared by the page handlers.

use std::collections::BTreeMap;

use axum::response::Html;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps `body` in the site layout. `title` is escaped here; `body` must
/// already be safe HTML.
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Startup Organizer</title>
</head>
<body>
<nav>
<a href="/blog/">Blog</a>
<a href="/startup/">Startups</a>
<a href="/tag/">Tags</a>
</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

pub fn link(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(href), escape(text))
}

/// `<ul>` of `items`, or `empty` in a paragraph when there are none.
pub fn list(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("<p>{}</p>", escape(empty));
    }
    let items: String = items.iter().map(|item| format!("<li>{item}</li>")).collect();
    format!("<ul>{items}</ul>")
}

/// Field errors of a rejected form submission.
#[derive(Debug, Default)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new(errors: BTreeMap<String, Vec<String>>) -> Self {
        FormErrors(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn render(messages: &[String]) -> String {
        let items: String = messages
            .iter()
            .map(|message| format!("<li>{}</li>", escape(message)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }

    pub fn for_field(&self, name: &str) -> String {
        match self.0.get(name) {
            Some(messages) => Self::render(messages),
            None => String::new(),
        }
    }

    /// Errors for keys that no rendered field owns, such as `tags.name`.
    pub fn others(&self, fields: &[&str]) -> String {
        let messages: Vec<String> = self
            .0
            .iter()
            .filter(|(key, _)| !fields.contains(&key.as_str()))
            .flat_map(|(key, messages)| {
                messages.iter().map(move |message| format!("{key}: {message}"))
            })
            .collect();
        if messages.is_empty() {
            String::new()
        } else {
            Self::render(&messages)
        }
    }
}

pub fn input(label: &str, name: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}</label>
<input type="{kind}" name="{name}" id="id_{name}" value="{value}"></p>"#,
        errors = errors.for_field(name),
        label = escape(label),
        value = escape(value),
    )
}

pub fn textarea(label: &str, name: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}</label>
<textarea name="{name}" id="id_{name}">{value}</textarea></p>"#,
        errors = errors.for_field(name),
        label = escape(label),
        value = escape(value),
    )
}

/// Checkbox per `(value, label)` option; options in `selected` are checked.
pub fn checkboxes(
    label: &str,
    name: &str,
    options: &[(String, String)],
    selected: &[String],
    errors: &FormErrors,
) -> String {
    let boxes: String = options
        .iter()
        .map(|(value, text)| {
            let checked = if selected.contains(value) { " checked" } else { "" };
            format!(
                r#"<label><input type="checkbox" name="{name}" value="{value}"{checked}> {text}</label>"#,
                value = escape(value),
                text = escape(text),
            )
        })
        .collect();
    format!(
        "<fieldset>{errors}<legend>{label}</legend>{boxes}</fieldset>",
        errors = errors.for_field(name),
        label = escape(label),
    )
}

pub fn select(
    label: &str,
    name: &str,
    options: &[(String, String)],
    selected: &str,
    errors: &FormErrors,
) -> String {
    let choices: String = options
        .iter()
        .map(|(value, text)| {
            let marker = if value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{marker}>{text}</option>"#,
                value = escape(value),
                text = escape(text),
            )
        })
        .collect();
    format!(
        r#"<p>{errors}<label for="id_{name}">{label}</label>
<select name="{name}" id="id_{name}">{choices}</select></p>"#,
        errors = errors.for_field(name),
        label = escape(label),
    )
}

pub fn form(action: &str, fields: &str, submit: &str) -> String {
    format!(
        r#"<form action="{action}" method="post">
{fields}
<button type="submit">{submit}</button>
</form>"#,
        action = escape(action),
        submit = escape(submit),
    )
}

/// Confirmation page body for deleting `record`.
pub fn confirm_delete(action: &str, record: &str, cancel: &str) -> String {
    format!(
        r#"<p>Are you sure you want to delete {record}?</p>
<form action="{action}" method="post">
<button type="submit">Yes, delete</button>
<a href="{cancel}">No, take me back</a>
</form>"#,
        record = escape(record),
        action = escape(action),
        cancel = escape(cancel),
    )
}
