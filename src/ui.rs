use crate::calendar::Heatmap;
use crate::date_key::DateKey;
use crate::models::{AggregateStats, TaskWithStats};
use std::fmt::Write;

pub fn render_index(
    today: DateKey,
    rows: &[TaskWithStats],
    totals: &AggregateStats,
    heatmap: &Heatmap,
) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &today.to_string())
        .replace("{{RATE}}", &totals.completion_rate.to_string())
        .replace("{{WINS}}", &totals.total_completed.to_string())
        .replace("{{LOSSES}}", &totals.total_failed.to_string())
        .replace("{{LOGGED_DAYS}}", &totals.logged_days.to_string())
        .replace("{{ACTIVE}}", &totals.active_tasks.to_string())
        .replace("{{HEATMAP}}", &render_heatmap(heatmap))
        // User text goes in last so titles never get placeholder substitution.
        .replace("{{TASKS}}", &render_rows(rows))
}

fn render_rows(rows: &[TaskWithStats]) -> String {
    if rows.is_empty() {
        return r#"<p class="empty">No active protocols.</p>"#.to_string();
    }

    let mut html = String::new();
    for row in rows {
        let _ = write!(
            html,
            r#"<li class="task{done}">
  <form method="post" action="/tasks/{id}/toggle"><button class="check" aria-label="{label}">{mark}</button></form>
  <span class="title">{title}</span>
  <span class="meta">{current}d streak &middot; best {longest} &middot; {rate}%</span>
</li>
"#,
            done = if row.done_today { " done" } else { "" },
            id = escape_html(&row.task.id),
            label = if row.done_today { "Mark as not done" } else { "Mark as done" },
            mark = if row.done_today { "&#10003;" } else { "" },
            title = escape_html(&row.task.title),
            current = row.stats.current_streak,
            longest = row.stats.longest_streak,
            rate = row.stats.completion_rate,
        );
    }
    html
}

fn render_heatmap(heatmap: &Heatmap) -> String {
    let mut html = String::new();
    for _ in 0..heatmap.leading_blanks {
        html.push_str(r#"<i class="cell pad"></i>"#);
    }
    for cell in &heatmap.cells {
        let _ = write!(
            html,
            r#"<i class="cell l{}" title="{}"></i>"#,
            cell.intensity, cell.date
        );
    }
    html
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
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

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Relentless</title>
  <style>
    :root {
      --bg: #09090b;
      --panel: #18181b;
      --line: #27272a;
      --ink: #e4e4e7;
      --muted: #71717a;
      --win: #10b981;
      --loss: #be123c;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: ui-monospace, "SFMono-Regular", Menlo, monospace;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      display: grid;
      gap: 28px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
      letter-spacing: -0.04em;
    }

    .subtitle,
    .meta,
    .empty {
      color: var(--muted);
      font-size: 0.8rem;
    }

    .add {
      display: flex;
      gap: 8px;
    }

    .add input {
      flex: 1;
      background: var(--panel);
      border: 1px solid var(--line);
      color: var(--ink);
      padding: 12px;
    }

    button {
      background: var(--win);
      border: none;
      color: var(--bg);
      padding: 12px 18px;
      font-weight: 700;
      cursor: pointer;
    }

    ul {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .task {
      display: grid;
      grid-template-columns: auto 1fr auto;
      align-items: center;
      gap: 14px;
      padding: 14px;
      border: 1px solid var(--line);
      background: var(--panel);
    }

    .task form {
      margin: 0;
    }

    .check {
      width: 24px;
      height: 24px;
      padding: 0;
      background: transparent;
      border: 2px solid var(--muted);
      color: var(--bg);
    }

    .task.done .check {
      background: var(--win);
      border-color: var(--win);
    }

    .task.done .title {
      color: var(--win);
    }

    .totals {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
    }

    .totals div {
      border: 1px solid var(--line);
      padding: 16px;
    }

    .totals strong {
      display: block;
      font-size: 1.6rem;
    }

    .wins {
      color: var(--win);
    }

    .losses {
      color: var(--loss);
    }

    .heatmap {
      display: grid;
      grid-template-rows: repeat(7, 12px);
      grid-auto-flow: column;
      grid-auto-columns: 12px;
      gap: 3px;
      overflow-x: auto;
    }

    .cell {
      border: 1px solid var(--line);
    }

    .cell.pad {
      border: none;
    }

    .l0 { background: var(--panel); }
    .l1 { background: #022c22; }
    .l2 { background: #064e3b; }
    .l3 { background: #059669; }
    .l4 { background: #34d399; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>RELENTLESS.</h1>
      <p class="subtitle">Daily protocol for {{DATE}}</p>
    </header>

    <form class="add" method="post" action="/tasks">
      <input name="title" placeholder="What must be done?" autocomplete="off" required />
      <button type="submit">Add</button>
    </form>

    <ul>
{{TASKS}}
    </ul>

    <section class="totals">
      <div><span class="meta">Consistency</span><strong>{{RATE}}%</strong></div>
      <div><span class="meta">Wins</span><strong class="wins">{{WINS}}</strong></div>
      <div><span class="meta">Losses</span><strong class="losses">{{LOSSES}}</strong></div>
      <div><span class="meta">Logged days</span><strong>{{LOGGED_DAYS}}</strong></div>
      <div><span class="meta">Active protocols</span><strong>{{ACTIVE}}</strong></div>
    </section>

    <section>
      <p class="meta">Consistency heatmap &middot; last 365 days</p>
      <div class="heatmap">{{HEATMAP}}</div>
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::heatmap;
    use crate::log::CompletionLog;
    use crate::models::{Task, TaskStats};

    #[test]
    fn titles_are_escaped() {
        assert_eq!(escape_html(r#"<b>"x" & y</b>"#), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }

    #[test]
    fn index_fills_every_placeholder() {
        let today = DateKey::from_ymd(2026, 10, 19).unwrap();
        let task = Task::create("Cold <shower>", 0).unwrap();
        let rows = vec![TaskWithStats {
            task: task.clone(),
            stats: TaskStats {
                current_streak: 4,
                ..TaskStats::default()
            },
            done_today: true,
        }];
        let map = heatmap(&[task], &CompletionLog::new(), today);

        let html = render_index(today, &rows, &AggregateStats::default(), &map);
        assert!(!html.contains("{{"));
        assert!(html.contains("2026-10-19"));
        assert!(html.contains("Cold &lt;shower&gt;"));
        assert!(html.contains("4d streak"));
        assert_eq!(html.matches(r#"class="cell l"#).count(), 365);
    }

    #[test]
    fn empty_roster_shows_placeholder() {
        let today = DateKey::from_ymd(2026, 10, 19).unwrap();
        let map = heatmap(&[], &CompletionLog::new(), today);
        let html = render_index(today, &[], &AggregateStats::default(), &map);
        assert!(html.contains("No active protocols."));
    }
}
