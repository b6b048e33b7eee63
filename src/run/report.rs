use std::error::Error;

use super::{AttributionReport, Scope};
use crate::attribution::summary::{AttributionSummary, Bucket};
use crate::report_helpers::{apply_top, max_width, pad_right, print_json_stdout, separator};

/// Print the report as a table or JSON, keeping at most `top`
/// contributors (0 keeps all). Totals always cover everyone.
pub fn output(mut report: AttributionReport, top: usize, json: bool) -> Result<(), Box<dyn Error>> {
    let total = report.summary.contributors.len();
    apply_top(&mut report.summary.contributors, top);
    if json {
        print_json_stdout(&report)
    } else {
        print_report(&report, total);
        Ok(())
    }
}

fn scope_title(scope: &Scope) -> String {
    match scope {
        Scope::SinglePr {
            repository,
            number,
            title,
            ..
        } => {
            if title.is_empty() {
                format!("{repository}#{number}")
            } else {
                format!("{repository}#{number}: {title}")
            }
        }
        Scope::PrList {
            repository,
            requested,
            analyzed,
        } => format!(
            "{repository}: {} of {} pull requests",
            analyzed.len(),
            requested.len()
        ),
        Scope::DateRange {
            repositories,
            since,
            until,
            pull_requests,
        } => format!(
            "{}: {pull_requests} pull requests merged {since}..{until}",
            repositories.join(", ")
        ),
        Scope::LocalRange {
            path,
            range,
            commits,
        } => format!("{path} {range}: {commits} commits"),
    }
}

pub fn print_report(report: &AttributionReport, total_contributors: usize) {
    let summary = &report.summary;

    println!("Line Attribution - {}", scope_title(&report.scope));
    if let Scope::SinglePr { url, merged_at, .. } = &report.scope {
        if !url.is_empty() {
            println!("{url}");
        }
        match merged_at {
            Some(at) => println!("merged {}", at.format("%Y-%m-%d %H:%M UTC")),
            None => println!("not merged"),
        }
    }

    if summary.contributors.is_empty() {
        println!();
        println!("No lines attributed.");
        print_skipped(report);
        return;
    }

    print_contributors(summary, total_contributors);
    println!();
    print_buckets(summary);

    let c = &report.commits;
    println!();
    println!(
        "Commits: {} ({} human, {} AI, {} pair, {} excluded)",
        c.total(),
        c.human,
        c.ai,
        c.pair,
        c.excluded
    );
    print_skipped(report);
}

fn print_contributors(summary: &AttributionSummary, total_contributors: usize) {
    let name_w = max_width(
        summary.contributors.iter().map(|c| c.identity.as_str()),
        11,
    );
    // name + 2 + adds(9) + 1 + dels(9) + 1 + pair(8) + 1 + total(9) + 1 + share(6) + ai(4)
    let width = (name_w + 51).max(60);
    let sep = separator(width);

    println!("{sep}");
    println!(
        " {}  {:>9} {:>9} {:>8} {:>9} {:>6}",
        pad_right("Contributor", name_w),
        "Added",
        "Deleted",
        "Pair",
        "Total",
        "Share"
    );
    println!("{sep}");
    for c in &summary.contributors {
        println!(
            " {}  {:>9} {:>9} {:>8} {:>9} {:>5}%{}",
            pad_right(&c.identity, name_w),
            format!("+{}", c.additions + c.pair_additions),
            format!("-{}", c.deletions + c.pair_deletions),
            c.pair_lines,
            c.total_lines,
            c.percentage,
            if c.is_ai { "  AI" } else { "" }
        );
    }
    println!("{sep}");
    println!(
        " {}  {:>9} {:>9} {:>8} {:>9}",
        pad_right("Total", name_w),
        format!("+{}", summary.total_additions),
        format!("-{}", summary.total_deletions),
        summary.pair_contributions.total_edit_lines,
        summary.total_edit_lines
    );
    if summary.contributors.len() < total_contributors {
        println!(
            " ({} of {total_contributors} contributors shown)",
            summary.contributors.len()
        );
    }
}

fn print_buckets(summary: &AttributionSummary) {
    let sep = separator(48);
    println!(
        " {:<8} {:>9} {:>9} {:>9} {:>5} {:>6}",
        "Group", "Added", "Deleted", "Lines", "Share", "People"
    );
    println!("{sep}");
    let rows: [(&str, &Bucket); 3] = [
        ("Human", &summary.human_contributions),
        ("AI", &summary.ai_contributions),
        ("Pair", &summary.pair_contributions),
    ];
    for (label, b) in rows {
        println!(
            " {:<8} {:>9} {:>9} {:>9} {:>4}% {:>6}",
            label,
            format!("+{}", b.total_additions),
            format!("-{}", b.total_deletions),
            b.total_edit_lines,
            b.percentage,
            b.people_count
        );
    }
}

fn print_skipped(report: &AttributionReport) {
    if report.skipped.is_empty() {
        return;
    }
    println!();
    println!("Skipped ({}):", report.skipped.len());
    for s in &report.skipped {
        match s.pull_request {
            Some(n) => println!("  {}#{n}: {}", s.repository, s.reason),
            None => println!("  {}: {}", s.repository, s.reason),
        }
    }
}
