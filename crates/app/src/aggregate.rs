use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::util::time::window_length_days;
use adoption_core::{AdoptionMetrics, TimeRange};

/// One usage observation for one subject. The token-summing policy
/// (input/output/cache) is the producer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSample {
    pub subject: String,
    pub ts: String,
    pub total_tokens: u64,
}

#[derive(Default)]
struct SubjectAccumulator {
    total_tokens: u64,
    active_days: BTreeSet<NaiveDate>,
}

impl SubjectAccumulator {
    fn add(&mut self, day: NaiveDate, tokens: u64) {
        self.total_tokens = self.total_tokens.saturating_add(tokens);
        self.active_days.insert(day);
    }

    fn finalize(self, window: &TimeRange, as_of: NaiveDate) -> Result<AdoptionMetrics> {
        let Some(last_active) = self.active_days.iter().next_back().copied() else {
            // Nothing inside the window: floor metrics, with the silence
            // spanning at least the whole window.
            return Ok(AdoptionMetrics {
                total_tokens: 0,
                days_active: 0,
                days_since_last_active: window_length_days(window)?,
            });
        };
        let days_since_last_active = (as_of - last_active).num_days().max(0) as u32;
        Ok(AdoptionMetrics {
            total_tokens: self.total_tokens,
            days_active: self.active_days.len() as u32,
            days_since_last_active,
        })
    }
}

fn parse_window(window: &TimeRange) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = DateTime::parse_from_rfc3339(&window.start)?.with_timezone(&Utc);
    let end = DateTime::parse_from_rfc3339(&window.end)?.with_timezone(&Utc);
    Ok((start, end))
}

/// Collapse one subject's samples into the metrics record the scorer consumes.
/// Samples outside the half-open window are ignored; `as_of` anchors
/// days-since-last-active.
pub fn aggregate_metrics(
    samples: &[UsageSample],
    window: &TimeRange,
    as_of: NaiveDate,
) -> Result<AdoptionMetrics> {
    let (start, end) = parse_window(window)?;
    let mut acc = SubjectAccumulator::default();
    for sample in samples {
        let ts = DateTime::parse_from_rfc3339(&sample.ts)?.with_timezone(&Utc);
        if ts < start || ts >= end {
            continue;
        }
        acc.add(ts.date_naive(), sample.total_tokens);
    }
    acc.finalize(window, as_of)
}

/// Per-subject aggregation over a mixed sample stream. Every subject that
/// appears in `samples` gets an entry, even when all of its samples fall
/// outside the window.
pub fn aggregate_by_subject(
    samples: &[UsageSample],
    window: &TimeRange,
    as_of: NaiveDate,
) -> Result<BTreeMap<String, AdoptionMetrics>> {
    let (start, end) = parse_window(window)?;
    let mut accumulators: BTreeMap<String, SubjectAccumulator> = BTreeMap::new();
    for sample in samples {
        let ts = DateTime::parse_from_rfc3339(&sample.ts)?.with_timezone(&Utc);
        let acc = accumulators.entry(sample.subject.clone()).or_default();
        if ts < start || ts >= end {
            continue;
        }
        acc.add(ts.date_naive(), sample.total_tokens);
    }
    let mut metrics = BTreeMap::new();
    for (subject, acc) in accumulators {
        metrics.insert(subject, acc.finalize(window, as_of)?);
    }
    Ok(metrics)
}
