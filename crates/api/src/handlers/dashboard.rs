//! Read-only HTML dashboard.
//!
//! Renders the agent catalog and the job list server-side. The page reloads
//! itself every few seconds; runs are submitted through the JSON API.

use std::fmt::Write;

use agentdeck_core::job::JobRecord;
use agentdeck_core::types::Timestamp;
use axum::extract::State;
use axum::response::Html;

use crate::engine::AgentDescriptor;
use crate::state::AppState;

/// Seconds between automatic page reloads.
const REFRESH_SECS: u32 = 5;

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let agents = state.dispatcher.list_agents().await;
    let mut jobs = state.registry.list().await;
    jobs.reverse();
    Html(render(&agents, &jobs))
}

fn render(agents: &[AgentDescriptor], jobs: &[JobRecord]) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!doctype html>\n<html><head><meta charset=\"utf-8\">");
    let _ = write!(
        page,
        "<meta http-equiv=\"refresh\" content=\"{REFRESH_SECS}\"><title>Agent Control Center</title>"
    );
    page.push_str("</head><body>\n<h1>Agent Control Center</h1>\n");

    page.push_str("<h2>Agents</h2>\n<table>\n<tr><th>Name</th><th>Description</th><th>Overrides</th><th>Warm</th></tr>\n");
    for agent in agents {
        let _ = writeln!(
            page,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&agent.name),
            escape(&agent.description),
            yes_no(agent.supports_overrides),
            yes_no(agent.warm),
        );
    }
    page.push_str("</table>\n");

    page.push_str("<h2>Jobs</h2>\n");
    if jobs.is_empty() {
        page.push_str("<p>No jobs yet.</p>\n");
    } else {
        page.push_str("<table>\n<tr><th>Job</th><th>Agent</th><th>Status</th><th>Submitted</th><th>Finished</th><th>Detail</th></tr>\n");
        for job in jobs {
            let detail = match (&job.result, &job.error) {
                (_, Some(error)) => error.clone(),
                (Some(result), None) => result.to_string(),
                (None, None) => String::new(),
            };
            let _ = writeln!(
                page,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                job.id,
                escape(&job.agent_name),
                job.status,
                format_time(Some(job.created_at)),
                format_time(job.finished_at),
                escape(&detail),
            );
        }
        page.push_str("</table>\n");
    }

    page.push_str("</body></html>\n");
    page
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn format_time(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// Minimal HTML escaping for text content.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
