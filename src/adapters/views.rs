//! Server-rendered page for the allocation form.
//!
//! Two-step flow without client scripts: the list editor posts back to `/`
//! (add and remove buttons), and once both lists have entries a rating grid
//! appears so the same form can be sent to `/calculate`.

use crate::domain::model::{AllocationResult, RatingKind, RatingMatrix, NEUTRAL_RATING};
use std::fmt::Write;

pub struct PageView<'a> {
    pub agents: &'a [String],
    pub chores: &'a [String],
    pub ratings: Option<&'a RatingMatrix>,
    pub kind: RatingKind,
    pub result: Option<&'a AllocationResult>,
}

impl<'a> PageView<'a> {
    pub fn empty(kind: RatingKind) -> Self {
        Self {
            agents: &[],
            chores: &[],
            ratings: None,
            kind,
            result: None,
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::new();
    html.push_str(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Chore Allocation</title>\n<style>\n\
         body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\n\
         .result{padding:1rem;border-radius:6px;margin-bottom:1.5rem;background:#eef6ee}\n\
         .result-error{background:#fbeaea}\n\
         .result-pending{background:#fff7e0}\n\
         table{border-collapse:collapse}td,th{padding:.25rem .5rem;border:1px solid #ccc}\n\
         pre{background:#f4f4f4;padding:.75rem;overflow:auto}\n\
         .default-btn{position:absolute;left:-9999px}\n\
         </style>\n</head>\n<body>\n<h1>Chore Allocation</h1>\n",
    );

    if let Some(result) = view.result {
        render_result(&mut html, result);
    }

    html.push_str("<form id=\"allocation-form\" method=\"post\" action=\"/calculate\">\n");
    // Enter 送出的是表單裡第一個 submit，所以要排在所有 Remove 之前
    html.push_str(
        "<button type=\"submit\" class=\"default-btn\" formaction=\"/\" \
         tabindex=\"-1\" aria-hidden=\"true\">Update</button>\n",
    );
    render_list(&mut html, "Agents", "agents", "agent", view.agents);
    render_list(&mut html, "Chores", "chores", "chore", view.chores);

    if let Some(prefix) = view.kind.field_name() {
        if !view.agents.is_empty() && !view.chores.is_empty() {
            render_rating_grid(&mut html, prefix, view);
        }
    }

    html.push_str(
        "<p><button type=\"submit\" class=\"submit-btn\">Calculate Allocation</button></p>\n\
         </form>\n</body>\n</html>\n",
    );
    html
}

fn render_result(html: &mut String, result: &AllocationResult) {
    let status = escape_html(&result.status);
    let _ = writeln!(html, "<section class=\"result result-{}\">", status);
    let _ = writeln!(html, "<h2>Result: {}</h2>", status);
    if !result.message.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape_html(&result.message));
    }
    let _ = writeln!(
        html,
        "<p>{} agent(s), {} chore(s)</p>",
        result.agents_count, result.chores_count
    );
    if let Some(response) = &result.api_response {
        let pretty = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
        let _ = writeln!(html, "<pre>{}</pre>", escape_html(&pretty));
    }
    html.push_str("</section>\n");
}

fn render_list(html: &mut String, title: &str, field: &str, singular: &str, items: &[String]) {
    let _ = writeln!(html, "<section id=\"{}-section\">\n<h2>{}</h2>", field, title);

    if items.is_empty() {
        let _ = writeln!(html, "<p id=\"{}-empty\">No {} yet.</p>", field, field);
    } else {
        let _ = writeln!(html, "<ul id=\"{}-list\">", field);
        for (index, item) in items.iter().enumerate() {
            let _ = writeln!(
                html,
                "<li><span>{value}</span><input type=\"hidden\" name=\"{field}\" value=\"{value}\">\
                 <button type=\"submit\" class=\"remove-btn\" formaction=\"/\" \
                 name=\"remove_{singular}\" value=\"{index}\">Remove</button></li>",
                value = escape_html(item),
                field = field,
                singular = singular,
                index = index,
            );
        }
        html.push_str("</ul>\n");
    }

    let _ = writeln!(
        html,
        "<p><input type=\"text\" id=\"{singular}-input\" name=\"new_{singular}\" \
         placeholder=\"Add {singular}\"> <button type=\"submit\" formaction=\"/\">Add</button></p>\n\
         </section>",
        singular = singular,
    );
}

fn render_rating_grid(html: &mut String, prefix: &str, view: &PageView<'_>) {
    let _ = writeln!(
        html,
        "<section class=\"{kind}-section\">\n<h2>{title} values</h2>",
        kind = view.kind.label(),
        title = capitalize(view.kind.label()),
    );
    if let Some(hint) = view.kind.scale_hint() {
        let _ = writeln!(html, "<p class=\"scale-hint\">{}</p>", escape_html(hint));
    }
    html.push_str("<table>\n");

    html.push_str("<tr><th></th>");
    for chore in view.chores {
        let _ = write!(html, "<th>{}</th>", escape_html(chore));
    }
    html.push_str("</tr>\n");

    for agent in view.agents {
        let _ = write!(html, "<tr><th>{}</th>", escape_html(agent));
        for chore in view.chores {
            let value = view
                .ratings
                .and_then(|m| m.get(agent))
                .and_then(|row| row.get(chore))
                .copied()
                .unwrap_or(NEUTRAL_RATING);
            let name = format!("{}[{}][{}]", prefix, agent, chore);
            let _ = write!(
                html,
                "<td><input type=\"number\" min=\"1\" max=\"10\" name=\"{}\" value=\"{}\"></td>",
                escape_html(&name),
                value
            );
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</section>\n");
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
