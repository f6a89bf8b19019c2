use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::insight::{Recommendation, Recommendations};
use crate::suite::{PairOutcome, PairStatus, SuiteReport};

pub const HTML_FILE: &str = "report.html";

/// Where the compared images live, so the page can link to them.
pub struct ImageSources<'a> {
    pub reference_dir: &'a Path,
    pub test_dir: &'a Path,
}

fn status_badge(status: PairStatus) -> &'static str {
    match status {
        PairStatus::Pass => r#"<span class="badge pass">PASS</span>"#,
        PairStatus::Minor => r#"<span class="badge minor">MINOR</span>"#,
        PairStatus::Warning => r#"<span class="badge warn">WARN</span>"#,
        PairStatus::Critical => r#"<span class="badge crit">CRIT</span>"#,
        PairStatus::Error => r#"<span class="badge err">ERR</span>"#,
    }
}

fn created_at() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (s, m, h) = (secs % 60, (secs / 60) % 60, (secs / 3600) % 24);
    let (y, mo, d) = epoch_days_to_ymd(secs / 86400);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{m:02}:{s:02}Z")
}

fn pair_row(outcome: &PairOutcome, sources: &ImageSources<'_>, out_dir: &Path) -> String {
    let file = format!("{}.png", outcome.id);
    let reference = image_cell(
        "reference",
        &outcome.id,
        &sources.reference_dir.join(&file),
        out_dir,
    );
    let test = image_cell("test", &outcome.id, &sources.test_dir.join(&file), out_dir);
    let difference = outcome
        .report
        .as_ref()
        .and_then(|r| r.comparison.diff_map.as_ref())
        .and_then(|d| d.path.as_deref())
        .map_or_else(
            || r#"<div class="missing">no difference map</div>"#.to_string(),
            |path| image_cell("difference", &outcome.id, path, out_dir),
        );

    let details = match &outcome.report {
        Some(report) => {
            let i = &report.insights;
            let pixels = report
                .comparison
                .pixel_difference
                .map_or_else(|| "n/a".to_string(), |p| format!("{}%", p.percentage_different));
            let insights: String = i
                .specific_insights
                .iter()
                .map(|ins| format!("<li>{}</li>", html_escape(&ins.message)))
                .collect();
            format!(
                r#"<div class="grade">{grade}</div><div>{score} / 100</div><div class="meta">{pixels} pixels differ</div><ul>{insights}</ul>"#,
                grade = html_escape(&i.grade.to_string()),
                score = i.overall_score,
            )
        }
        None => format!(
            r#"<div class="missing">{}</div>"#,
            html_escape(outcome.error.as_deref().unwrap_or("analysis failed"))
        ),
    };

    format!(
        r#"        <tr>
          <td class="name">{name} {badge}{details}</td>
          <td>{reference}</td>
          <td>{test}</td>
          <td>{difference}</td>
        </tr>
"#,
        name = html_escape(&outcome.id),
        badge = status_badge(outcome.status),
    )
}

fn recommendation_list(label: &str, items: &[Recommendation]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let lis: String = items
        .iter()
        .map(|r| {
            format!(
                "<li><strong>{}</strong> ({}) {}</li>",
                html_escape(&r.title),
                html_escape(&r.estimated_time),
                html_escape(&r.description)
            )
        })
        .collect();
    format!("<h3>{label}</h3><ul>{lis}</ul>")
}

fn recommendations_html(r: &Recommendations) -> String {
    [
        recommendation_list("Immediate", &r.immediate),
        recommendation_list("Short term", &r.short_term),
        recommendation_list("Long term", &r.long_term),
        recommendation_list("Preventive", &r.preventive),
    ]
    .concat()
}

fn build_html(report: &SuiteReport, sources: &ImageSources<'_>, out_dir: &Path) -> String {
    let s = &report.summary;
    let mut summary = format!(
        "{} pairs, {} passed, {} failed ({} critical, {} warning, {} errored), {} minor",
        s.tally.total,
        s.tally.passed,
        s.failed,
        s.tally.critical,
        s.tally.warning,
        s.tally.errored,
        s.tally.minor
    );
    if let Some(avg) = s.average_score {
        summary.push_str(&format!(" &middot; average score {avg}"));
    }
    if !s.missing.is_empty() || !s.new.is_empty() {
        summary.push_str(&format!(
            " &middot; {} missing, {} without reference",
            s.missing.len(),
            s.new.len()
        ));
    }

    // Failures first, then the rest in ID order.
    let mut rows: Vec<&PairOutcome> = report.results.iter().collect();
    rows.sort_by_key(|r| !r.status.is_failure());
    let body_rows: String = rows
        .iter()
        .map(|r| pair_row(r, sources, out_dir))
        .collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>vrtlens report</title>
  <style>
    :root {{ color-scheme: light; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
      margin: 0; padding: 24px;
      background: #f6f7f9; color: #1f2933;
    }}
    h1 {{ margin: 0 0 8px; font-size: 22px; }}
    h3 {{ margin: 12px 0 4px; font-size: 15px; }}
    .meta {{ margin-bottom: 16px; color: #52606d; font-size: 14px; }}
    table {{ width: 100%; border-collapse: collapse; background: #fff; box-shadow: 0 2px 6px rgba(0,0,0,0.05); }}
    th, td {{ border: 1px solid #e4e7eb; padding: 8px; vertical-align: top; text-align: left; }}
    th {{ background: #f0f4f8; font-weight: 600; font-size: 14px; }}
    td img {{ max-width: 100%; height: auto; display: block; background: #fff; }}
    td {{ width: 25%; }}
    td.name {{ font-size: 13px; word-break: break-word; }}
    td.name ul {{ padding-left: 16px; margin: 4px 0; }}
    .grade {{ font-size: 24px; font-weight: 700; margin-top: 6px; }}
    .missing {{ color: #c81e1e; font-style: italic; font-size: 13px; }}
    .badge {{ font-size: 11px; padding: 1px 6px; border-radius: 3px; font-weight: 600; }}
    .badge.pass {{ background: #dcfce7; color: #166534; }}
    .badge.minor {{ background: #e0f2fe; color: #075985; }}
    .badge.warn {{ background: #fef3c7; color: #92400e; }}
    .badge.crit, .badge.err {{ background: #fee2e2; color: #991b1b; }}
    .recommendations {{ background: #fff; padding: 8px 16px; margin-bottom: 16px; box-shadow: 0 2px 6px rgba(0,0,0,0.05); }}
    .empty {{ text-align: center; padding: 48px; color: #52606d; font-size: 16px; }}
  </style>
</head>
<body>
  <h1>vrtlens report</h1>
  <div class="meta">Generated at {created_at} &middot; {summary}</div>
  <div class="recommendations">{recommendations}</div>
  {content}
</body>
</html>"##,
        created_at = created_at(),
        recommendations = recommendations_html(&report.recommendations),
        content = if body_rows.is_empty() {
            r#"<div class="empty">No image pairs were compared.</div>"#.to_string()
        } else {
            format!(
                r#"<table>
    <thead>
      <tr>
        <th>Pair</th>
        <th>Reference</th>
        <th>Test</th>
        <th>Difference</th>
      </tr>
    </thead>
    <tbody>
{body_rows}    </tbody>
  </table>"#
            )
        }
    )
}

/// Image source relative to the report when possible, else a `file://` URL.
fn image_src(path: &Path, out_dir: &Path) -> String {
    match path.strip_prefix(out_dir) {
        Ok(rel) => url_encode(&rel.to_string_lossy().replace('\\', "/")),
        Err(_) => format!(
            "file://{}",
            url_encode(&path.to_string_lossy().replace('\\', "/"))
        ),
    }
}

fn image_cell(kind: &str, id: &str, path: &Path, out_dir: &Path) -> String {
    if !path.exists() {
        return format!(r#"<div class="missing">no {kind}</div>"#);
    }
    let src = image_src(path, out_dir);
    let escaped = html_escape(id);
    format!(r#"<img src="{src}" alt="{kind} {escaped}" loading="lazy" />"#)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn url_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                String::from(b as char)
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_ymd(mut days: u64) -> (u64, u64, u64) {
    // Civil calendar algorithm (Howard Hinnant)
    days += 719468;
    let era = days / 146097;
    let doe = days - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Write `dir/report.html` for a suite run and return its path.
pub fn write(report: &SuiteReport, sources: &ImageSources<'_>, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let html = build_html(report, sources, dir);
    let out_path = dir.join(HTML_FILE);
    std::fs::write(&out_path, html)
        .with_context(|| format!("Failed to write {}", out_path.display()))?;
    Ok(out_path)
}
