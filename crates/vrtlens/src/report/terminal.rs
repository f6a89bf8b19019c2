use std::io::Write;
use std::time::Duration;

use crate::analyze::ImageAnalysis;
use crate::engine::Report;
use crate::insight::{Grade, Recommendation, Recommendations, Severity};
use crate::suite::{PairOutcome, PairStatus, SuiteSummary};

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Five-column status label with its ANSI colour.
pub fn status_label(status: PairStatus) -> &'static str {
    match status {
        PairStatus::Pass => "\x1b[32m PASS\x1b[0m",
        PairStatus::Minor => "\x1b[36mMINOR\x1b[0m",
        PairStatus::Warning => "\x1b[33m WARN\x1b[0m",
        PairStatus::Critical => "\x1b[31m CRIT\x1b[0m",
        PairStatus::Error => "\x1b[31m  ERR\x1b[0m",
    }
}

fn grade_color(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus | Grade::A => "\x1b[32m",
        Grade::B | Grade::C => "\x1b[33m",
        Grade::D | Grade::F => "\x1b[31m",
    }
}

/// One-line detail for a pair: mismatch percentage or dimensions, then grade.
fn pair_detail(outcome: &PairOutcome) -> String {
    let Some(report) = &outcome.report else {
        return outcome.error.clone().unwrap_or_default();
    };
    let c = &report.comparison;
    let diff = match (&c.pixel_difference, &c.dimension_mismatch) {
        (Some(p), _) => format!("{}% pixels", p.percentage_different),
        (None, Some(m)) => format!(
            "dimensions changed: {}x{} -> {}x{}",
            m.reference.0, m.reference.1, m.test.0, m.test.1
        ),
        (None, None) => "no pixel comparison".to_string(),
    };
    format!(
        "{diff}, grade {} ({})",
        report.insights.grade, report.insights.overall_score
    )
}

/// Print a single pair result line.
pub fn print_line(outcome: &PairOutcome, elapsed: Duration) {
    clear_line();
    println!(
        "  {}  {}  ({})  \x1b[2m{}\x1b[0m",
        status_label(outcome.status),
        outcome.id,
        pair_detail(outcome),
        format_duration(elapsed)
    );
}

/// Show analysis progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Analysing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "\x1b[31mhigh\x1b[0m",
        Severity::Medium => "\x1b[33mmed \x1b[0m",
        Severity::Low => "\x1b[2mlow \x1b[0m",
    }
}

fn score_cell(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.1}"))
}

/// Print the grade block for one comparison.
pub fn print_report(report: &Report) {
    let i = &report.insights;
    let c = &report.comparison;
    let [pixel, structure, color, layout] = c.scores();

    println!();
    println!(
        "Grade:       {}{}\x1b[0m  {}  ({})",
        grade_color(i.grade),
        i.grade,
        i.overall_score,
        i.grade_description
    );
    println!(
        "Confidence:  {:?} ({} of 4 scores)",
        i.confidence, i.available_scores
    );
    println!();
    println!("  Pixel       {:>6}", score_cell(pixel));
    println!("  Structure   {:>6}", score_cell(structure));
    println!("  Colour      {:>6}", score_cell(color));
    println!("  Layout      {:>6}", score_cell(layout));

    if let Some(p) = &c.pixel_difference {
        println!();
        println!(
            "{} of {} pixels differ ({}%)",
            p.different_pixels, p.total_pixels, p.percentage_different
        );
    }
    if let Some(m) = &c.dimension_mismatch {
        println!(
            "Dimensions changed: {}x{} -> {}x{}",
            m.reference.0, m.reference.1, m.test.0, m.test.1
        );
    }
    if !c.region_summary.is_empty() {
        let parts: Vec<String> = c
            .region_summary
            .iter()
            .map(|(kind, n)| format!("{n} {}", kind.label()))
            .collect();
        println!("Changed regions: {}", parts.join(", "));
    }
    if let Some(d) = &c.diff_map {
        match (&d.path, &d.message) {
            (Some(path), _) => println!("Difference map: {}", path.display()),
            (None, Some(msg)) => println!("Difference map not written: {msg}"),
            (None, None) => {}
        }
    }

    if !i.specific_insights.is_empty() {
        println!();
        println!("\x1b[1mInsights:\x1b[0m");
        for insight in &i.specific_insights {
            println!("  {}  {}", severity_tag(insight.severity), insight.message);
            println!("        \x1b[2m{}\x1b[0m", insight.recommendation);
        }
    }

    if !c.skipped.is_empty() {
        println!();
        println!("Skipped:");
        for s in &c.skipped {
            println!("  {s}");
        }
    }
}

/// Print the per-image profile for `vrtlens analyze`.
pub fn print_analysis(name: &str, a: &ImageAnalysis) {
    println!("{name}  {}x{}, {} channels", a.width, a.height, a.channels);

    if let Some(c) = &a.color {
        println!();
        println!("\x1b[1mColour\x1b[0m");
        println!("  brightness {}  contrast {}", c.brightness, c.contrast);
        for d in &c.dominant_colors {
            println!("  {}  {}%", d.hex, d.percentage);
        }
    }
    if let Some(s) = &a.structure {
        println!();
        println!("\x1b[1mStructure\x1b[0m");
        println!(
            "  edges {} ({}%)  complexity {}",
            s.edge_count, s.edge_density, s.complexity
        );
        println!(
            "  symmetry h {}  v {}  overall {}",
            s.symmetry.horizontal, s.symmetry.vertical, s.symmetry.overall
        );
    }
    if let Some(l) = &a.layout {
        println!();
        println!("\x1b[1mLayout\x1b[0m");
        for row in l.regions.values().chunks(3) {
            println!("  {:>5.1} {:>5.1} {:>5.1}", row[0], row[1], row[2]);
        }
        println!(
            "  balance {}  rule of thirds {:?}",
            l.balance.overall, l.rule_of_thirds
        );
        println!(
            "  whitespace {}%  content density {}%",
            l.whitespace_percentage, l.content_density
        );
    }
}

/// Print an actionable list of pair IDs grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(results: &[PairOutcome], summary: &SuiteSummary) {
    let ids = |s: PairStatus| -> Vec<&str> {
        results
            .iter()
            .filter(|r| r.status == s)
            .map(|r| r.id.as_str())
            .collect()
    };
    let critical = ids(PairStatus::Critical);
    let warning = ids(PairStatus::Warning);
    let errored = ids(PairStatus::Error);
    let missing: Vec<&str> = summary.missing.iter().map(String::as_str).collect();
    let new: Vec<&str> = summary.new.iter().map(String::as_str).collect();

    let sections = [
        ("Critical", critical),
        ("Warning", warning),
        ("Errored", errored),
        ("Missing test image", missing),
        ("No reference", new),
    ];
    if sections.iter().all(|(_, ids)| ids.is_empty()) {
        return;
    }

    clear_line();
    println!();
    println!("Actionable pairs:");
    for (label, ids) in sections {
        if !ids.is_empty() {
            println!();
            println!("  {label} ({}):", ids.len());
            for id in ids {
                println!("    {id}");
            }
        }
    }
}

/// Print the final summary.
pub fn print_summary(summary: &SuiteSummary, elapsed: Duration) {
    let t = &summary.tally;
    clear_line();
    println!();
    print!(
        "Pairs:      {} total, \x1b[32m{} passed\x1b[0m, \x1b[31m{} failed\x1b[0m",
        t.total, t.passed, summary.failed
    );
    if t.minor > 0 {
        print!(", \x1b[36m{} minor\x1b[0m", t.minor);
    }
    println!();
    if summary.failed > 0 {
        println!(
            "            {} critical, {} warning, {} errored",
            t.critical, t.warning, t.errored
        );
    }
    if let Some(avg) = summary.average_score {
        println!("Score:      {avg} average");
    }
    if !summary.categories.is_empty() {
        let parts: Vec<String> = summary
            .categories
            .iter()
            .map(|(cat, n)| format!("{cat:?} {n}").to_lowercase())
            .collect();
        println!("Insights:   {}", parts.join(", "));
    }
    println!("Time:       {}", format_duration(elapsed));
}

fn print_bucket(label: &str, items: &[Recommendation]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("  {label}:");
    for r in items {
        println!("    \x1b[1m{}\x1b[0m  \x1b[2m({})\x1b[0m", r.title, r.estimated_time);
        println!("      {}", r.description);
    }
}

pub fn print_recommendations(r: &Recommendations) {
    println!();
    println!("\x1b[1mRecommendations:\x1b[0m");
    print_bucket("Immediate", &r.immediate);
    print_bucket("Short term", &r.short_term);
    print_bucket("Long term", &r.long_term);
    print_bucket("Preventive", &r.preventive);
}
