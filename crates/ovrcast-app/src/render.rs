// Plain-text and JSON output.
//
// Text output is aligned columns for a terminal; JSON is the serde form of
// the library types, pretty-printed.

use std::fmt::Write;

use ovrcast_baseball::ledger::InvestmentReport;
use ovrcast_baseball::{LookupOutcome, PlayerReport, RankedEntry};
use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max(header.len())
}

fn tier_cell(tier: Option<u32>) -> String {
    tier.map_or_else(|| "-".to_string(), |t| t.to_string())
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

fn player_block(out: &mut String, report: &PlayerReport) {
    let _ = writeln!(out, "{} ({}, {})", report.name, report.team, report.archetype);
    let _ = writeln!(
        out,
        "  score {:.4}  raw {}  market {}  final {}  value {}",
        report.score.total,
        report.rating.raw_tier,
        tier_cell(report.rating.market_tier),
        report.rating.final_tier,
        report.value
    );
    for c in &report.score.components {
        let _ = writeln!(
            out,
            "    {:<12} {:>8.4} x {:.2} = {:>7.4}",
            c.label, c.value, c.weight, c.contribution
        );
    }
}

pub fn lookup_text(outcomes: &[LookupOutcome]) -> String {
    let mut out = String::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match outcome {
            LookupOutcome::NotFound { query } => {
                let _ = writeln!(out, "{query}: not found");
            }
            LookupOutcome::Found { reports, .. } => {
                for report in reports {
                    player_block(&mut out, report);
                }
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

pub fn ranking_text(entries: &[RankedEntry]) -> String {
    if entries.is_empty() {
        return "no eligible players\n".to_string();
    }
    let width = name_width(entries.iter().map(|e| e.name.as_str()), "NAME");
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<width$}  {:<4}  {:<7}  {:>4}  {:>6}",
        "RANK", "NAME", "TEAM", "TYPE", "TIER", "VALUE"
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:<4}  {:<7}  {:>4}  {:>6}",
            e.rank,
            e.name,
            e.team,
            e.archetype.display_str(),
            e.final_tier,
            e.value
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Investment report
// ---------------------------------------------------------------------------

pub fn report_text(report: &InvestmentReport) -> String {
    let width = name_width(report.lines.iter().map(|l| l.player.as_str()), "PLAYER");
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>4}  {:>4}  {:>8}  {:>8}  {:>8}",
        "PLAYER", "QTY", "TIER", "COST", "FLOOR", "MARGIN"
    );
    for l in &report.lines {
        let _ = writeln!(
            out,
            "{:<width$}  {:>4}  {:>4}  {:>8}  {:>8}  {:>+8}",
            l.player,
            l.quantity,
            tier_cell(l.rating.map(|r| r.final_tier)),
            l.cost,
            l.floor_value,
            l.floor_margin
        );
    }
    let _ = writeln!(
        out,
        "{:<width$}  {:>4}  {:>4}  {:>8}  {:>8}  {:>+8}",
        "TOTAL", "", "", report.total_cost, report.total_floor_value, report.total_floor_margin
    );
    if report.not_found > 0 {
        let _ = writeln!(out, "{} player(s) not found in season stats", report.not_found);
    }
    out
}
