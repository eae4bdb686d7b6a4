//! Cookie economy: the item catalog, production and purchases.
//!
//! Pure functions over `EconomyState`, fully testable without a frame loop.

use std::fmt;

use tracing::debug;

use crate::config::PRODUCTION_QUANTUM;
use crate::save::SaveRecord;
use crate::time::FixedStep;

/// A producer the player can buy.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Emoji drawn on the purchase button.
    pub emoji: String,
    pub name: String,
    /// Cost of the first unit.
    pub initial_cost: u32,
    /// Cookies per second produced by each owned unit.
    pub cps: u32,
}

impl Item {
    pub fn new(emoji: &str, name: &str, initial_cost: u32, cps: u32) -> Self {
        Self {
            emoji: emoji.to_string(),
            name: name.to_string(),
            initial_cost,
            cps,
        }
    }

    /// Cost of the next unit when `count` are already owned.
    /// Grows linearly: the n-th unit costs n times the first.
    pub fn cost(&self, count: u32) -> u64 {
        self.initial_cost as u64 * (count as u64 + 1)
    }
}

/// Why a purchase was refused. Nothing is mutated in either case.
#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseError {
    InsufficientFunds { cost: u64, available: f64 },
    UnknownItem(usize),
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientFunds { cost, available } => {
                write!(f, "need {cost} cookies, have {}", available.floor())
            }
            PurchaseError::UnknownItem(index) => write!(f, "no item at index {index}"),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Cookies and owned items of one session.
#[derive(Clone, Debug, PartialEq)]
pub struct EconomyState {
    /// Cookies on hand. Fractional because production is credited per quantum.
    pub cookies: f64,
    /// Owned units, indexed like the catalog.
    pub item_counts: Vec<u32>,
    /// Time not yet credited as production.
    production: FixedStep,
}

impl EconomyState {
    /// Fresh economy: no cookies, nothing owned.
    pub fn new(item_kinds: usize) -> Self {
        Self {
            cookies: 0.0,
            item_counts: vec![0; item_kinds],
            production: FixedStep::new(),
        }
    }

    /// Restore from a save record, fitted to a catalog of `item_kinds` entries.
    ///
    /// Returns `None` for records no running game could have written
    /// (negative counts, negative or non-finite cookies).
    pub fn from_record(record: &SaveRecord, item_kinds: usize) -> Option<Self> {
        if !record.cookies.is_finite() || record.cookies < 0.0 {
            return None;
        }
        let mut item_counts = record
            .item_counts
            .iter()
            .map(|&c| u32::try_from(c).ok())
            .collect::<Option<Vec<u32>>>()?;
        item_counts.resize(item_kinds, 0);
        Some(Self {
            cookies: record.cookies,
            item_counts,
            production: FixedStep::new(),
        })
    }

    pub fn to_record(&self) -> SaveRecord {
        SaveRecord {
            cookies: self.cookies,
            item_counts: self
                .item_counts
                .iter()
                .map(|&c| i32::try_from(c).unwrap_or(i32::MAX))
                .collect(),
        }
    }

    /// Production time carried over to the next `accrue`.
    pub fn pending_production_time(&self) -> f64 {
        self.production.remainder()
    }

    /// One manual click on the cookie.
    pub fn click(&mut self) {
        self.cookies += 1.0;
    }

    /// Whether the next unit of `index` is affordable right now.
    pub fn can_afford(&self, catalog: &[Item], index: usize) -> bool {
        match (catalog.get(index), self.item_counts.get(index)) {
            (Some(item), Some(&count)) => self.cookies >= item.cost(count) as f64,
            _ => false,
        }
    }
}

/// Cookies per second from everything owned.
pub fn compute_cps(catalog: &[Item], item_counts: &[u32]) -> u64 {
    catalog
        .iter()
        .zip(item_counts)
        .map(|(item, &count)| item.cps as u64 * count as u64)
        .sum()
}

/// Advance production by `delta` seconds at `cps`.
///
/// Production is credited in whole quanta of `PRODUCTION_QUANTUM` seconds;
/// partial time waits for the next call. Returns the number of quanta credited.
pub fn accrue(state: &mut EconomyState, cps: u64, delta: f64) -> u64 {
    let quanta = state.production.drain(delta, PRODUCTION_QUANTUM);
    if quanta > 0 {
        state.cookies += cps as f64 * PRODUCTION_QUANTUM * quanta as f64;
    }
    quanta
}

/// Buy one unit of `catalog[index]`. Returns the price paid.
pub fn purchase(
    state: &mut EconomyState,
    catalog: &[Item],
    index: usize,
) -> Result<u64, PurchaseError> {
    let (item, count) = match (catalog.get(index), state.item_counts.get(index)) {
        (Some(item), Some(&count)) => (item, count),
        _ => return Err(PurchaseError::UnknownItem(index)),
    };
    let cost = item.cost(count);
    if state.cookies < cost as f64 {
        return Err(PurchaseError::InsufficientFunds {
            cost,
            available: state.cookies,
        });
    }
    state.cookies -= cost as f64;
    state.item_counts[index] += 1;
    debug!(item = %item.name, cost, owned = count + 1, "purchased");
    Ok(cost)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_cost_strictly_increases(initial in 1u32..100_000, count in 0u32..10_000) {
            let item = Item::new("🌾", "farm", initial, 1);
            prop_assert_eq!(item.cost(count), initial as u64 * (count as u64 + 1));
            prop_assert!(item.cost(count + 1) > item.cost(count));
        }

        #[test]
        fn prop_accrue_matches_floor_formula(
            cps in 0u64..10_000,
            pending in 0.0f64..0.1,
            delta in 0.0f64..50.0,
        ) {
            let mut state = EconomyState::new(0);
            state.production.drain(pending, f64::INFINITY);
            let total = state.pending_production_time() + delta;
            let quanta = accrue(&mut state, cps, delta);

            let exact = total / PRODUCTION_QUANTUM;
            let expected_quanta = exact.floor() as u64;
            if (exact - exact.round()).abs() > 1e-9 {
                prop_assert_eq!(quanta, expected_quanta);
            } else {
                // Right on a quantum boundary rounding may land on either side.
                let boundary = exact.round() as u64;
                prop_assert!(quanta == boundary || quanta + 1 == boundary);
            }
            let expected = quanta as f64 * PRODUCTION_QUANTUM * cps as f64;
            prop_assert!((state.cookies - expected).abs() <= 1e-6 * expected.max(1.0));
            prop_assert!(state.pending_production_time() >= 0.0);
            prop_assert!(state.pending_production_time() < PRODUCTION_QUANTUM);
        }

        #[test]
        fn prop_purchase_never_goes_negative(
            cookies in 0.0f64..10_000.0,
            count in 0u32..50,
        ) {
            let catalog = vec![Item::new("🌾", "farm", 10, 1)];
            let mut state = EconomyState::new(1);
            state.cookies = cookies;
            state.item_counts[0] = count;
            let before = state.clone();

            match purchase(&mut state, &catalog, 0) {
                Ok(cost) => {
                    prop_assert!(state.cookies >= 0.0);
                    prop_assert_eq!(state.cookies, before.cookies - cost as f64);
                    prop_assert_eq!(state.item_counts[0], count + 1);
                }
                Err(_) => prop_assert_eq!(state, before),
            }
        }
    }
}
