//! The interactive page: side menu of forms, one active form, message area.
//!
//! Stateless by construction: every submit carries the full set of raw
//! values, so the page is re-rendered from the request alone. The export
//! control re-posts the same values and the dispatch is re-run.

use std::collections::HashMap;
use std::fmt::Write as _;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::{outcome_status, pdf_attachment};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::APP_NAME;
use crate::forms::{FieldSpec, FormDefinition, FormId};
use crate::pipeline::{self, export_result, DispatchOutcome, FieldWarning, RawInput};

const PAGE_TITLE: &str = "Health Prediction Assistant";
const PAGE_SUBTITLE: &str = "Powered by Machine Learning";

/// Forms with this many fields or more are laid out three per row.
const WIDE_FORM_THRESHOLD: usize = 13;

/// `GET /`
pub async fn index(State(ctx): State<ApiContext>) -> Html<String> {
    let form = ctx.core.form(FormId::default());
    Html(render_page(form, &RawInput::new(), &[], None))
}

/// `GET /forms/:slug`
pub async fn show(State(ctx): State<ApiContext>, Path(slug): Path<String>) -> Response {
    match ctx.form_by_slug(&slug) {
        Some(form) => Html(render_page(form, &RawInput::new(), &[], None)).into_response(),
        None => not_found(&slug),
    }
}

/// `POST /forms/:slug/predict`
pub async fn predict(
    State(ctx): State<ApiContext>,
    Path(slug): Path<String>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let Some(form) = ctx.form_by_slug(&slug) else {
        return Ok(not_found(&slug));
    };
    let report = pipeline::run(form, &raw, ctx.core.model_for(form.id)?);
    let html = render_page(form, &raw, &report.warnings, Some(&report.outcome));
    Ok((outcome_status(&report.outcome), Html(html)).into_response())
}

/// `POST /forms/:slug/export`
///
/// Returns the PDF when the values still produce a result; otherwise the
/// page comes back with the warning, as Predict would show it.
pub async fn export(
    State(ctx): State<ApiContext>,
    Path(slug): Path<String>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let Some(form) = ctx.form_by_slug(&slug) else {
        return Ok(not_found(&slug));
    };
    let report = pipeline::run(form, &raw, ctx.core.model_for(form.id)?);

    match &report.outcome {
        DispatchOutcome::Success { result } => {
            let doc = export_result(&result.message)?;
            tracing::info!(form = %form.id, bytes = doc.bytes.len(), "Result exported");
            Ok(pdf_attachment(doc))
        }
        outcome => {
            let html = render_page(form, &raw, &report.warnings, Some(outcome));
            Ok((outcome_status(outcome), Html(html)).into_response())
        }
    }
}

/// Unknown slug on a page route: a plain page with the menu, not JSON.
fn not_found(slug: &str) -> Response {
    tracing::debug!(slug, "Page requested for unknown form");
    (StatusCode::NOT_FOUND, Html(render_not_found(slug))).into_response()
}

// ═══════════════════════════════════════════════════════════
// HTML rendering — self-contained page (no external assets)
// ═══════════════════════════════════════════════════════════

fn render_page(
    form: &FormDefinition,
    raw: &RawInput,
    warnings: &[FieldWarning],
    outcome: Option<&DispatchOutcome>,
) -> String {
    let columns = if form.field_count() >= WIDE_FORM_THRESHOLD { 3 } else { 2 };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{app_name}</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#fafaf9;color:#1c1917;display:flex;min-height:100vh}}
nav{{width:240px;background:#f0f2f6;padding:24px 16px;flex-shrink:0}}
nav h2{{font-size:1.1rem;margin:0 0 4px}}
nav p{{color:#78716c;font-size:.8rem;margin:0 0 20px}}
nav a{{display:block;padding:10px 12px;border-radius:8px;color:#1c1917;text-decoration:none;margin-bottom:4px}}
nav a.active{{background:#2DD4BF;color:#fff;font-weight:600}}
main{{flex:1;padding:32px;max-width:960px}}
h1{{font-size:1.6rem;margin:0 0 8px}}
.caption{{color:#78716c;margin:0 0 20px}}
.grid{{display:grid;grid-template-columns:repeat({columns},1fr);gap:16px}}
label{{display:block;font-size:.85rem;margin-bottom:4px}}
input,select{{width:100%;padding:8px;border:1px solid #d6d3d1;border-radius:6px;font-size:.95rem}}
.field-warning{{color:#b45309;font-size:.8rem;margin-top:4px}}
.btn{{padding:10px 20px;border:none;border-radius:8px;font-size:1rem;font-weight:600;cursor:pointer;margin-top:20px;background:#2DD4BF;color:#fff}}
.success{{background:#f0fdf4;border:1px solid #bbf7d0;border-radius:8px;padding:16px;margin-top:20px}}
.warning{{background:#fffbeb;border:1px solid #fde68a;border-radius:8px;padding:16px;margin-top:20px}}
</style>
</head>
<body>
<nav>
  <h2>{title}</h2>
  <p>{subtitle}</p>
{menu}</nav>
<main>
  <h1>{heading}</h1>
{caption}  <form method="post" action="/forms/{slug}/predict">
    <div class="grid">
{fields}    </div>
    <button class="btn" type="submit">Predict</button>
  </form>
{message}</main>
</body>
</html>"##,
        app_name = escape_html(APP_NAME),
        title = PAGE_TITLE,
        subtitle = PAGE_SUBTITLE,
        columns = columns,
        menu = render_menu(Some(form.id)),
        heading = escape_html(form.heading),
        caption = form
            .caption
            .map(|c| format!("  <p class=\"caption\">{}</p>\n", escape_html(c)))
            .unwrap_or_default(),
        slug = form.id.slug(),
        fields = render_fields(form, raw, warnings),
        message = outcome
            .map(|o| render_message(form, raw, o))
            .unwrap_or_default(),
    )
}

fn render_not_found(slug: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{app_name}</title>
</head>
<body style="font-family:sans-serif;padding:32px">
  <h1>Form not found</h1>
  <p>There is no form called &quot;{slug}&quot;.</p>
  <p><a href="/">Back to {title}</a></p>
  <ul>
{menu}  </ul>
</body>
</html>"##,
        app_name = escape_html(APP_NAME),
        slug = escape_html(slug),
        title = PAGE_TITLE,
        menu = render_menu(None)
            .lines()
            .map(|line| format!("    <li>{}</li>\n", line.trim()))
            .collect::<String>(),
    )
}

fn render_menu(active: Option<FormId>) -> String {
    let mut out = String::new();
    for id in FormId::ALL {
        let class = if Some(id) == active { " class=\"active\"" } else { "" };
        let _ = writeln!(
            out,
            "  <a href=\"/forms/{}\"{}>{}</a>",
            id.slug(),
            class,
            escape_html(id.menu_title())
        );
    }
    out
}

fn render_fields(form: &FormDefinition, raw: &RawInput, warnings: &[FieldWarning]) -> String {
    let mut out = String::new();
    for spec in &form.fields {
        let entered = raw.get(&spec.name).map(String::as_str).unwrap_or("");
        let name = escape_html(&spec.name);

        let _ = writeln!(out, "      <div>");
        let _ = writeln!(out, "        <label for=\"{name}\">{name}</label>");
        let _ = writeln!(out, "        {}", render_control(spec, &name, entered));
        if let Some(w) = warnings.iter().find(|w| w.field == spec.name) {
            let _ = writeln!(
                out,
                "        <div class=\"field-warning\">{}</div>",
                escape_html(&w.message)
            );
        }
        let _ = writeln!(out, "      </div>");
    }
    out
}

fn render_control(spec: &FieldSpec, name: &str, entered: &str) -> String {
    if spec.is_numeric() {
        return format!(
            "<input id=\"{name}\" name=\"{name}\" type=\"text\" inputmode=\"decimal\" value=\"{}\">",
            escape_html(entered)
        );
    }

    let mut options = String::new();
    for choice in spec.choices() {
        let selected = if choice.label == entered { " selected" } else { "" };
        let label = escape_html(choice.label);
        let _ = write!(options, "<option value=\"{label}\"{selected}>{label}</option>");
    }
    format!("<select id=\"{name}\" name=\"{name}\">{options}</select>")
}

fn render_message(form: &FormDefinition, raw: &RawInput, outcome: &DispatchOutcome) -> String {
    match outcome {
        DispatchOutcome::Success { result } => format!(
            r#"  <div class="success">{message}
    <form method="post" action="/forms/{slug}/export">
{hidden}      <button class="btn" type="submit">Download PDF</button>
    </form>
  </div>
"#,
            message = escape_html(&result.message),
            slug = form.id.slug(),
            hidden = render_hidden(form, raw),
        ),
        other => format!(
            "  <div class=\"warning\">{}</div>\n",
            escape_html(other.message())
        ),
    }
}

/// Declared fields as hidden inputs, so export re-submits exactly what
/// produced the result.
fn render_hidden(form: &FormDefinition, raw: &RawInput) -> String {
    let mut out = String::new();
    for spec in &form.fields {
        if let Some(value) = raw.get(&spec.name) {
            let _ = writeln!(
                out,
                "      <input type=\"hidden\" name=\"{}\" value=\"{}\">",
                escape_html(&spec.name),
                escape_html(value)
            );
        }
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
