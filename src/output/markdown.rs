//! Markdown report generation
//!
//! This module generates a human-readable audit report of a crawl,
//! including run information, totals, problem lists and a per-page table.

use crate::crawler::{CrawlOutcome, PageRecord};
use crate::output::stats::CrawlSummary;
use crate::output::{OutputError, OutputResult};
use std::path::Path;

/// Maximum number of rows per problem list
const MAX_LIST_ROWS: usize = 50;

/// Writes the markdown report for an outcome
///
/// # Arguments
///
/// * `outcome` - The crawl outcome
/// * `config_hash` - Hash of the configuration file, if the crawl used one
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn write_markdown_report(
    outcome: &CrawlOutcome,
    config_hash: Option<&str>,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(outcome, config_hash);

    std::fs::write(output_path, markdown).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })?;

    tracing::info!("Report written to {}", output_path.display());
    Ok(())
}

/// Formats a crawl outcome as markdown
///
/// # Arguments
///
/// * `outcome` - The crawl outcome
/// * `config_hash` - Hash of the configuration file, if the crawl used one
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(outcome: &CrawlOutcome, config_hash: Option<&str>) -> String {
    let summary = CrawlSummary::from_outcome(outcome);
    let mut md = String::new();

    push_run_information(&mut md, &summary, config_hash);
    push_totals(&mut md, &summary);
    push_problems(&mut md, outcome);
    push_failed_urls(&mut md, outcome);
    push_page_table(&mut md, &outcome.pages);

    md
}

fn push_run_information(md: &mut String, summary: &CrawlSummary, config_hash: Option<&str>) {
    md.push_str("# Linkscope Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at));
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        summary.duration_seconds,
        summary.duration_seconds as f64 / 60.0
    ));
    md.push_str(&format!("- **Status**: {}\n", summary.status.as_str()));
    if let Some(hash) = config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');
}

fn push_totals(md: &mut String, summary: &CrawlSummary) {
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Crawled**: {}\n", summary.pages_crawled));
    md.push_str(&format!("- **Failed URLs**: {}\n", summary.pages_failed));
    md.push_str(&format!("- **Orphan Pages**: {}\n", summary.orphan_count));
    md.push_str(&format!("- **Broken Links**: {}\n", summary.broken_link_count));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n",
        summary.success_rate()
    ));
    match summary.average_score {
        Some(average) => md.push_str(&format!("- **Average SEO Score**: {:.1}%\n\n", average)),
        None => md.push_str("- **Average SEO Score**: n/a\n\n"),
    }

    if !summary.depth_breakdown.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &summary.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !summary.score_levels.is_empty() {
        md.push_str("## Score Levels\n\n");
        md.push_str("| Level | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (level, count) in summary.score_levels.iter().rev() {
            md.push_str(&format!("| {} | {} |\n", level, count));
        }
        md.push('\n');
    }
}

fn push_url_list(md: &mut String, title: &str, urls: impl Iterator<Item = String>) {
    let urls: Vec<String> = urls.collect();
    if urls.is_empty() {
        return;
    }

    md.push_str(&format!("### {} ({})\n\n", title, urls.len()));
    for url in urls.iter().take(MAX_LIST_ROWS) {
        md.push_str(&format!("- {}\n", url));
    }
    if urls.len() > MAX_LIST_ROWS {
        md.push_str(&format!("\n... and {} more\n", urls.len() - MAX_LIST_ROWS));
    }
    md.push('\n');
}

fn push_problems(md: &mut String, outcome: &CrawlOutcome) {
    let pages = &outcome.pages;
    let has_problems = pages.iter().any(|p| {
        p.link_graph.is_orphan
            || p.metrics.is_noindex
            || p.metrics.h1.is_none()
            || p.metrics.description.is_none()
            || !p.link_graph.broken_links_on_page.is_empty()
    });
    if !has_problems {
        return;
    }

    md.push_str("## Problems\n\n");

    push_url_list(
        md,
        "Orphan Pages",
        outcome.orphans().map(|p| p.url.to_string()),
    );
    push_url_list(
        md,
        "Noindex Pages",
        pages
            .iter()
            .filter(|p| p.metrics.is_noindex)
            .map(|p| p.url.to_string()),
    );
    push_url_list(
        md,
        "Missing H1",
        pages
            .iter()
            .filter(|p| p.metrics.h1.is_none())
            .map(|p| p.url.to_string()),
    );
    push_url_list(
        md,
        "Missing Meta Description",
        pages
            .iter()
            .filter(|p| p.metrics.description.is_none())
            .map(|p| format!("{} (fallback: \"{}\")", p.url, p.metrics.summary)),
    );
    push_url_list(
        md,
        "Pages With Broken Links",
        pages
            .iter()
            .filter(|p| !p.link_graph.broken_links_on_page.is_empty())
            .map(|p| {
                let targets: Vec<&str> = p
                    .link_graph
                    .broken_links_on_page
                    .iter()
                    .map(|u| u.as_str())
                    .collect();
                format!("{} → {}", p.url, targets.join(", "))
            }),
    );
}

fn push_failed_urls(md: &mut String, outcome: &CrawlOutcome) {
    if outcome.failed_urls.is_empty() {
        return;
    }

    md.push_str("## Failed URLs\n\n");
    md.push_str("| URL | Reason |\n");
    md.push_str("|-----|--------|\n");
    for failed in &outcome.failed_urls {
        md.push_str(&format!("| {} | {} |\n", failed.url, failed.reason));
    }
    md.push('\n');
}

fn push_page_table(md: &mut String, pages: &[PageRecord]) {
    if pages.is_empty() {
        return;
    }

    md.push_str("## Pages\n\n");
    md.push_str("| URL | Depth | Score | Level | Link Equity | Load Time | Tags |\n");
    md.push_str("|-----|-------|-------|-------|-------------|-----------|------|\n");
    for page in pages {
        let score = page.seo_score();
        let load_time = page
            .metrics
            .load_time_ms
            .map(|ms| format!("{} ms", ms))
            .unwrap_or_else(|| "-".to_string());
        let tags = if page.metrics.tags.is_empty() {
            "-".to_string()
        } else {
            page.metrics.tags.join(", ")
        };
        md.push_str(&format!(
            "| {} | {} | {}/{} | {} | {} | {} | {} |\n",
            page.url,
            page.depth,
            score.score,
            score.max_score,
            score.level,
            page.link_graph.internal_link_equity,
            load_time,
            tags
        ));
    }
    md.push('\n');
}
