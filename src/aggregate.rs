// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure aggregations over entry collections. Nothing here reads or writes storage.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    Budgets, Category, Entry, EntryKind, UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME,
};

pub const DEFAULT_MONTHS: usize = 6;

const MONTH_ABBR_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub total: Decimal,
    pub incomes: Decimal,
    pub expenses: Decimal,
}

/// Sums saturate at `Decimal::MAX`.
pub fn compute_totals<'a, I>(entries: I) -> Totals
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut t = Totals::default();
    for e in entries {
        match e.kind {
            EntryKind::Income => t.incomes = t.incomes.saturating_add(e.amount),
            EntryKind::Expense => t.expenses = t.expenses.saturating_add(e.amount),
        }
    }
    t.total = t.incomes.saturating_sub(t.expenses);
    t
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One row per known category (in store order, even when idle), then one synthetic row per
/// unknown referenced id in first-seen order.
pub fn totals_by_category(categories: &[Category], entries: &[Entry]) -> Vec<CategoryTotals> {
    let mut rows: Vec<CategoryTotals> = categories
        .iter()
        .map(|c| CategoryTotals {
            category_id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();
    let mut index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.category_id.clone(), i))
        .collect();

    for e in entries {
        let idx = match index.get(&e.category_id) {
            Some(i) => *i,
            None => {
                rows.push(CategoryTotals {
                    category_id: e.category_id.clone(),
                    name: UNCATEGORIZED_NAME.to_string(),
                    color: UNCATEGORIZED_COLOR.to_string(),
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                });
                index.insert(e.category_id.clone(), rows.len() - 1);
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        match e.kind {
            EntryKind::Income => row.income = row.income.saturating_add(e.amount),
            EntryKind::Expense => row.expense = row.expense.saturating_add(e.amount),
        }
    }
    rows
}

/// Totals of entries whose date lies within the inclusive bounds.
pub fn compute_totals_for_period(
    entries: &[Entry],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Totals {
    compute_totals(entries.iter().filter(|e| within(e.date, start, end)))
}

pub(crate) fn within(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(s) = start {
        if date < s {
            return false;
        }
    }
    if let Some(e) = end {
        if date > e {
            return false;
        }
    }
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub key: String,
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// `months` buckets ending at the month of `today`, oldest first, zero-filled.
pub fn aggregate_monthly(entries: &[Entry], months: usize, today: NaiveDate) -> Vec<MonthBucket> {
    let current = today.year() * 12 + today.month0() as i32;
    let mut buckets: Vec<MonthBucket> = (0..months)
        .rev()
        .map(|back| {
            let idx = current - back as i32;
            let year = idx.div_euclid(12);
            let month0 = idx.rem_euclid(12) as usize;
            MonthBucket {
                key: format!("{:04}-{:02}", year, month0 + 1),
                label: month_label(year, month0),
                income: Decimal::ZERO,
                expense: Decimal::ZERO,
            }
        })
        .collect();
    let index: HashMap<String, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.key.clone(), i))
        .collect();

    for e in entries {
        let Some(&i) = index.get(&e.month_key()) else {
            continue;
        };
        let bucket = &mut buckets[i];
        match e.kind {
            EntryKind::Income => bucket.income = bucket.income.saturating_add(e.amount),
            EntryKind::Expense => bucket.expense = bucket.expense.saturating_add(e.amount),
        }
    }
    buckets
}

fn month_label(year: i32, month0: usize) -> String {
    format!("{} {:02}", MONTH_ABBR_ES[month0], year.rem_euclid(100))
}

/// Totals for the calendar month containing `today`.
pub fn month_summary(entries: &[Entry], today: NaiveDate) -> Totals {
    compute_totals(
        entries
            .iter()
            .filter(|e| e.date.year() == today.year() && e.date.month() == today.month()),
    )
}

/// Spent expense total for one category.
pub fn spent_in_category(entries: &[Entry], category_id: &str) -> Decimal {
    entries
        .iter()
        .filter(|e| e.kind == EntryKind::Expense && e.category_id == category_id)
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub category_id: String,
    pub name: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: u32,
}

/// Budget progress for every budgeted category, in category order.
pub fn budget_usage(
    categories: &[Category],
    budgets: &Budgets,
    entries: &[Entry],
) -> Vec<BudgetUsage> {
    categories
        .iter()
        .filter_map(|c| {
            let budget = *budgets.get(&c.id)?;
            if budget <= Decimal::ZERO {
                return None;
            }
            let spent = spent_in_category(entries, &c.id);
            let remaining = budget.saturating_sub(spent).max(Decimal::ZERO);
            let pct = spent
                .checked_div(budget)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|p| p.round().min(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::ONE_HUNDRED);
            Some(BudgetUsage {
                category_id: c.id.clone(),
                name: c.name.clone(),
                budget,
                spent,
                remaining,
                percent_used: pct.to_u32().unwrap_or(100),
            })
        })
        .collect()
}
