//! Reset computation for recurring budgets.
//!
//! The engine is a pure function of a [`RecurrenceRule`] and reference
//! instants. It holds only the calendar it evaluates dates in, so a single
//! value can be shared freely across threads.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::period::{BudgetPeriod, Phase};
use crate::calendar::{Calendar, Instant};

/// Days looked back before falling back to a walk from the start date when
/// locating the current period.
const LOOKBACK_DAYS: i64 = 31;

/// Result of a next-reset query. `Never` sorts after every instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NextReset {
    At(Instant),
    Never,
}

impl NextReset {
    pub fn instant(self) -> Option<Instant> {
        match self {
            NextReset::At(instant) => Some(instant),
            NextReset::Never => None,
        }
    }

    pub fn is_never(self) -> bool {
        matches!(self, NextReset::Never)
    }

    /// Integral form used by storage layers; `Never` maps to `i64::MAX`.
    pub fn to_millis(self) -> i64 {
        match self {
            NextReset::At(instant) => instant.millis(),
            NextReset::Never => i64::MAX,
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        if millis == i64::MAX {
            NextReset::Never
        } else {
            NextReset::At(Instant::from_millis(millis))
        }
    }
}

/// The recurrence-relevant slice of a budget.
///
/// Preconditions (enforced by [`BudgetDraft`](super::BudgetDraft)): `start_date`
/// and `end_date` sit on local midnight and `end_date >= start_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub period: BudgetPeriod,
    pub start_date: Instant,
    pub end_date: Option<Instant>,
    pub repeating: bool,
}

impl RecurrenceRule {
    pub fn new(period: BudgetPeriod, start_date: Instant) -> Self {
        Self {
            period,
            start_date,
            end_date: None,
            repeating: true,
        }
    }

    pub fn ending(mut self, end_date: Instant) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn once(mut self) -> Self {
        self.repeating = false;
        self
    }
}

/// Span between the most recent reset and the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: Instant,
    pub next_reset: NextReset,
}

impl PeriodWindow {
    pub fn contains(&self, instant: Instant) -> bool {
        instant >= self.start && NextReset::At(instant) < self.next_reset
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrenceEngine {
    calendar: Calendar,
}

impl RecurrenceEngine {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// The next reset strictly after the start of `from`'s local day, clamped
    /// to the end date. Non-repeating and ended rules never reset.
    pub fn next_reset(&self, rule: &RecurrenceRule, from: Instant) -> NextReset {
        if !rule.repeating {
            return NextReset::Never;
        }
        if let Some(end) = rule.end_date {
            if from >= end {
                return NextReset::Never;
            }
        }

        let candidate = rule
            .period
            .next_candidate(&self.calendar, rule.start_date, from);
        let at = self.calendar.midnight_of(candidate.date);
        trace!(
            period = rule.period.label(),
            first = candidate.phase == Phase::First,
            from = from.millis(),
            candidate = at.millis(),
            "computed reset candidate"
        );

        match rule.end_date {
            Some(end) if at > end => NextReset::At(end),
            _ => NextReset::At(at),
        }
    }

    /// `now` has reached the reset computed from `now` itself. Always false for
    /// non-repeating rules.
    pub fn has_reset(&self, rule: &RecurrenceRule, now: Instant) -> bool {
        match self.next_reset(rule, now) {
            NextReset::At(next) => rule.repeating && now >= next,
            NextReset::Never => false,
        }
    }

    /// A reset happened after `last_seen` and no later than `now`.
    pub fn has_reset_since(&self, rule: &RecurrenceRule, last_seen: Instant, now: Instant) -> bool {
        matches!(self.next_reset(rule, last_seen), NextReset::At(next) if now >= next)
    }

    /// All occurrences, starting with the start date itself.
    pub fn occurrences(&self, rule: &RecurrenceRule) -> Occurrences {
        Occurrences {
            engine: *self,
            rule: *rule,
            next: Some(rule.start_date),
        }
    }

    /// Occurrences within `[lo, hi]`, ascending and unique.
    pub fn occurrences_in_range(&self, rule: &RecurrenceRule, lo: Instant, hi: Instant) -> Vec<Instant> {
        if hi < lo {
            return Vec::new();
        }
        let found: Vec<Instant> = self
            .occurrences_from(rule, lo)
            .take_while(|occurrence| *occurrence <= hi)
            .filter(|occurrence| *occurrence >= lo)
            .collect();
        debug!(
            period = rule.period.label(),
            lo = lo.millis(),
            hi = hi.millis(),
            count = found.len(),
            "enumerated occurrences"
        );
        found
    }

    /// The period `now` falls in: the latest occurrence at or before `now` and
    /// the reset that follows it. `None` before the start date.
    pub fn current_period(&self, rule: &RecurrenceRule, now: Instant) -> Option<PeriodWindow> {
        if now < rule.start_date {
            return None;
        }
        let lookback = now.add_days(-LOOKBACK_DAYS).max(rule.start_date);
        let start = self
            .occurrences_in_range(rule, lookback, now)
            .last()
            .copied()
            .or_else(|| {
                self.occurrences_in_range(rule, rule.start_date, now)
                    .last()
                    .copied()
            })?;
        Some(PeriodWindow {
            start,
            next_reset: self.next_reset(rule, now),
        })
    }

    /// Iterator positioned at the first occurrence that can be `>= lo`,
    /// skipping whole periods instead of walking from the start date.
    fn occurrences_from(&self, rule: &RecurrenceRule, lo: Instant) -> Occurrences {
        let mut occurrences = self.occurrences(rule);
        if !rule.repeating || lo <= rule.start_date {
            return occurrences;
        }
        let probe = self.end_of_day(lo.add_days(-1));
        if probe > rule.start_date {
            occurrences.next = self.next_reset(rule, probe).instant();
        }
        occurrences
    }

    /// Occurrence following `current`. Probing from the last millisecond of
    /// `current`'s day keeps the step from re-deriving `current`.
    fn following(&self, rule: &RecurrenceRule, current: Instant) -> Option<Instant> {
        self.next_reset(rule, self.end_of_day(current))
            .instant()
            .filter(|next| *next > current)
    }

    fn end_of_day(&self, instant: Instant) -> Instant {
        self.calendar
            .start_of_day(instant)
            .add_days(1)
            .add_millis(-1)
    }
}

/// Lazy, ascending walk over a rule's occurrences. Finite for non-repeating
/// and end-dated rules.
#[derive(Debug, Clone)]
pub struct Occurrences {
    engine: RecurrenceEngine,
    rule: RecurrenceRule,
    next: Option<Instant>,
}

impl Iterator for Occurrences {
    type Item = Instant;

    fn next(&mut self) -> Option<Instant> {
        let current = self.next?;
        self.next = if self.rule.repeating {
            self.engine.following(&self.rule, current)
        } else {
            None
        };
        Some(current)
    }
}
