//! Server-rendered HTML for the advisor pages.
//!
//! Model output is Markdown; it is rendered with pulldown-cmark and any raw
//! HTML it contains is escaped rather than passed through.

use std::fmt::Write;

use pulldown_cmark::escape::{escape_href, escape_html};
use pulldown_cmark::{html, Event, Options, Parser, Tag};

use crate::jobs::{JobRecord, JobSearchError, JobSource};
use crate::llm_client::CompletionError;
use crate::workflow::{AnalysisReport, JobsReport, Phase};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.panel { background-color: #000000; padding: 15px; border-radius: 10px; font-size: 16px; color: white; }
.notice { padding: 12px 15px; border-radius: 8px; margin: 1rem 0; }
.success { background: #e6f4ea; color: #1e4620; }
.warning { background: #fff4e5; color: #663c00; }
.error { background: #fdecea; color: #611a15; }
.job { border-bottom: 1px solid #ddd; padding: 0.75rem 0; }
.job ul { margin: 0.25rem 0; }
#busy { display: none; position: fixed; inset: 0; background: rgba(255,255,255,0.92); padding: 20vh 2rem; text-align: center; }
#busy li { list-style: none; margin: 0.4rem 0; }
"#;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = escape_html(&mut out, text);
    out
}

fn is_web_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("https://") || url.starts_with("http://")
}

/// Only http(s) links are rendered as anchors.
fn safe_href(url: &str) -> Option<String> {
    if !is_web_url(url) {
        return None;
    }
    let url = url.trim();
    let mut href = String::with_capacity(url.len());
    let _ = escape_href(&mut href, url);
    Some(href)
}

/// Links and images whose destination is not http(s) keep only their text.
fn markdown_to_html(markdown: &str) -> String {
    // One entry per open link or image: whether its tags are emitted.
    let mut open_links: Vec<bool> = Vec::new();
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH)
        .filter_map(move |event| match event {
            Event::Html(raw) => Some(Event::Text(raw)),
            Event::Start(tag @ (Tag::Link(..) | Tag::Image(..))) => {
                let keep = match &tag {
                    Tag::Link(_, dest, _) | Tag::Image(_, dest, _) => is_web_url(dest),
                    _ => true,
                };
                open_links.push(keep);
                keep.then_some(Event::Start(tag))
            }
            Event::End(tag @ (Tag::Link(..) | Tag::Image(..))) => {
                let keep = open_links.pop().unwrap_or(true);
                keep.then_some(Event::End(tag))
            }
            other => Some(other),
        });
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Overlay shown while a form submission is in flight, listing the phases it goes through.
fn busy_overlay(phases: &[Phase]) -> String {
    let mut items = String::new();
    for phase in phases {
        let _ = write!(items, "<li>{}</li>", escape(phase.label()));
    }
    format!(
        r#"<div id="busy" role="status" aria-live="polite"><h2>Working on it</h2><ul>{items}</ul></div>
<script>
document.querySelectorAll("form[data-busy]").forEach(function (form) {{
  form.addEventListener("submit", function () {{ document.getElementById("busy").style.display = "block"; }});
}});
</script>"#
    )
}

fn upload_form() -> String {
    format!(
        r#"<form action="/analyze" method="post" enctype="multipart/form-data" data-busy>
<label for="resume">Upload your Resume (PDF)</label>
<input id="resume" name="resume" type="file" accept=".pdf,application/pdf" required>
<button type="submit">Analyze Resume</button>
</form>
{}"#,
        busy_overlay(&Phase::ANALYSIS)
    )
}

pub fn index_page() -> String {
    let body = format!(
        r#"<h1>AI Resume Analyzer &amp; Career Growth Advisor</h1>
<p>Upload your resume and get career insights plus live job recommendations from LinkedIn &amp; Naukri.</p>
{}"#,
        upload_form()
    );
    page("AI Resume Analyzer + Job Finder", &body)
}

fn analysis_panel(heading: &str, outcome: &Result<String, CompletionError>) -> String {
    let content = match outcome {
        Ok(text) if text.trim().is_empty() => {
            r#"<div class="notice warning">The model returned no text for this section.</div>"#
                .to_string()
        }
        Ok(text) => format!(r#"<div class="panel">{}</div>"#, markdown_to_html(text)),
        Err(e) => format!(
            r#"<div class="notice error">This analysis failed: {}</div>"#,
            escape(&e.to_string())
        ),
    };
    format!("<hr>\n<h2>{}</h2>\n{content}\n", escape(heading))
}

pub fn analysis_page(report: &AnalysisReport) -> String {
    let mut body = String::from("<h1>AI Resume Analyzer &amp; Career Growth Advisor</h1>\n");
    body.push_str(&analysis_panel("Resume Summary", &report.summary));
    body.push_str(&analysis_panel("Skill Gaps & Missing Areas", &report.gaps));
    body.push_str(&analysis_panel(
        "Future Roadmap & Preparation Strategy",
        &report.roadmap,
    ));

    let failures = [&report.summary, &report.gaps, &report.roadmap]
        .iter()
        .filter(|r| !matches!(r, Ok(text) if !text.trim().is_empty()))
        .count();
    if failures == 0 {
        body.push_str(r#"<div class="notice success">Analysis completed successfully!</div>"#);
    } else {
        let _ = write!(
            body,
            r#"<div class="notice warning">Analysis finished with {failures} failed section(s).</div>"#
        );
    }
    let _ = write!(
        body,
        r#"<p><small>{} characters read from your resume, analyzed {}.</small></p>"#,
        report.resume_chars,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    match &report.summary {
        Ok(summary) if !summary.trim().is_empty() => {
            let _ = write!(
                body,
                r#"<form action="/jobs" method="post" data-busy>
<input type="hidden" name="summary" value="{}">
<button type="submit">Fetch Matching Jobs Now</button>
</form>
{}"#,
                escape(summary),
                busy_overlay(&Phase::JOB_SEARCH)
            );
        }
        _ => body.push_str(
            r#"<div class="notice warning">Job search needs a resume summary. Upload the resume again to retry.</div>"#,
        ),
    }

    body.push_str(r#"<p><a href="/">Analyze another resume</a></p>"#);
    page("Resume Analysis", &body)
}

fn job_card(job: &JobRecord) -> String {
    let text_or_unknown = |value: &Option<String>| {
        value
            .as_deref()
            .map(escape)
            .unwrap_or_else(|| "Unknown".to_string())
    };
    let link = match job.url.as_deref().and_then(safe_href) {
        Some(href) => format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">View Job</a>"#),
        None => "No link provided".to_string(),
    };
    format!(
        r#"<div class="job"><strong>{}</strong> at <em>{}</em><ul><li>{}</li><li>{link}</li></ul></div>"#,
        text_or_unknown(&job.title),
        text_or_unknown(&job.company),
        text_or_unknown(&job.location),
    )
}

fn jobs_panel(source: JobSource, outcome: &Result<Vec<JobRecord>, JobSearchError>) -> String {
    let mut out = format!("<hr>\n<h2>Top {source} Jobs</h2>\n");
    match outcome {
        Ok(jobs) if jobs.is_empty() => {
            let _ = write!(out, r#"<div class="notice warning">No {source} jobs found.</div>"#);
        }
        Ok(jobs) => {
            for job in jobs {
                out.push_str(&job_card(job));
            }
        }
        Err(e) => {
            let _ = write!(
                out,
                r#"<div class="notice error">{source} job search failed: {}</div>"#,
                escape(&e.to_string())
            );
        }
    }
    out
}

pub fn jobs_page(report: &JobsReport) -> String {
    let mut body = String::from("<h1>Matching Jobs</h1>\n");
    let _ = write!(
        body,
        r#"<div class="notice success">Extracted job keywords: {}</div>"#,
        escape(&report.keywords)
    );
    body.push_str(&jobs_panel(JobSource::LinkedIn, &report.linkedin));
    body.push_str(&jobs_panel(JobSource::Naukri, &report.naukri));
    body.push_str(r#"<p><a href="/">Analyze another resume</a></p>"#);
    page("Matching Jobs", &body)
}

pub fn error_page(code: &str, message: &str) -> String {
    let body = format!(
        r#"<h1>Something went wrong</h1>
<div class="notice error"><strong>{}</strong>: {}</div>
<p><a href="/">Back to upload</a></p>"#,
        escape(code),
        escape(message)
    );
    page("Error", &body)
}
