//! Statistics finisher: per-contributor records, human/AI/pair buckets
//! and percentages computed from a finished [`Ledger`].

use serde::Serialize;

use super::classify::AiEmails;
use super::ledger::Ledger;

/// One contributor's share of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionRecord {
    pub identity: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    pub pair_additions: u64,
    pub pair_deletions: u64,
    pub total_lines: u64,
    pub pair_lines: u64,
    pub solo_lines: u64,
    /// Share of all edit lines in the run.
    pub percentage: u32,
    /// Share of this contributor's own lines produced in pair commits.
    pub pair_percentage: u32,
    pub solo_percentage: u32,
    pub is_ai: bool,
}

/// Aggregate lines for the human, AI or pair group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_edit_lines: u64,
    pub percentage: u32,
    /// Always 0 for the pair bucket: pair lines are credited to people.
    pub people_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributionSummary {
    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_edit_lines: u64,
    /// Sorted by `total_lines` descending; ties keep first-seen order.
    pub contributors: Vec<ContributionRecord>,
    pub human_contributions: Bucket,
    pub ai_contributions: Bucket,
    pub pair_contributions: Bucket,
}

/// Finish a run: build records, sort them and compute the buckets.
///
/// Contributors are split into human and AI by their resolved email
/// against `ai_emails`; a contributor without an email counts as human.
pub fn summarize(ledger: &Ledger, ai_emails: &AiEmails) -> AttributionSummary {
    let totals = ledger.totals();
    let grand_total = totals.total();

    let line_totals: Vec<u64> = ledger.iter().map(|c| c.lines.total()).collect();
    let shares = percentages(&line_totals, grand_total);

    let mut contributors: Vec<ContributionRecord> = ledger
        .iter()
        .zip(shares)
        .map(|(c, percentage)| {
            let total_lines = c.lines.total();
            let pair_lines = c.lines.pair();
            let solo_lines = c.lines.solo();
            let own = percentages(&[pair_lines, solo_lines], total_lines);
            ContributionRecord {
                identity: c.identity.clone(),
                name: c.name.clone(),
                email: c.email.clone(),
                additions: c.lines.additions,
                deletions: c.lines.deletions,
                pair_additions: c.lines.pair_additions,
                pair_deletions: c.lines.pair_deletions,
                total_lines,
                pair_lines,
                solo_lines,
                percentage,
                pair_percentage: own[0],
                solo_percentage: own[1],
                is_ai: c.email.as_deref().is_some_and(|e| ai_emails.contains(e)),
            }
        })
        .collect();

    // Stable: equal totals stay in first-seen order.
    contributors.sort_by(|a, b| b.total_lines.cmp(&a.total_lines));

    let mut human = Bucket::default();
    let mut ai = Bucket::default();
    for c in &contributors {
        let bucket = if c.is_ai { &mut ai } else { &mut human };
        bucket.total_additions += c.additions;
        bucket.total_deletions += c.deletions;
        bucket.people_count += 1;
    }
    let mut pair = Bucket {
        total_additions: totals.pair_additions,
        total_deletions: totals.pair_deletions,
        ..Default::default()
    };

    for bucket in [&mut human, &mut ai, &mut pair] {
        bucket.total_edit_lines = bucket.total_additions + bucket.total_deletions;
    }
    let bucket_shares = percentages(
        &[
            human.total_edit_lines,
            ai.total_edit_lines,
            pair.total_edit_lines,
        ],
        grand_total,
    );
    human.percentage = bucket_shares[0];
    ai.percentage = bucket_shares[1];
    pair.percentage = bucket_shares[2];

    AttributionSummary {
        total_additions: totals.additions + totals.pair_additions,
        total_deletions: totals.deletions + totals.pair_deletions,
        total_edit_lines: grand_total,
        contributors,
        human_contributions: human,
        ai_contributions: ai,
        pair_contributions: pair,
    }
}

/// `round(100 × part / whole)`, or 0 when `whole` is 0.
pub fn percentage(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

/// Rounded percentages of `parts` against `whole`.
///
/// When the parts sum to `whole`, independent rounding can overshoot 100
/// (two halves both rounding up). The overshoot is taken back one point at
/// a time from the values that were rounded up the most, later entries
/// first on ties, so the result never sums above 100 and each value stays
/// within one point of its exact share.
pub fn percentages(parts: &[u64], whole: u64) -> Vec<u32> {
    if whole == 0 {
        return vec![0; parts.len()];
    }

    let exact: Vec<f64> = parts
        .iter()
        .map(|&p| p as f64 * 100.0 / whole as f64)
        .collect();
    let mut rounded: Vec<u32> = parts.iter().map(|&p| percentage(p, whole)).collect();

    let sum: u32 = rounded.iter().sum();
    if sum <= 100 {
        return rounded;
    }

    let mut order: Vec<usize> = (0..parts.len()).collect();
    order.sort_by(|&a, &b| {
        let up_a = f64::from(rounded[a]) - exact[a];
        let up_b = f64::from(rounded[b]) - exact[b];
        up_b.partial_cmp(&up_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.cmp(&a))
    });

    for &idx in order.iter().take((sum - 100) as usize) {
        rounded[idx] -= 1;
    }
    rounded
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
