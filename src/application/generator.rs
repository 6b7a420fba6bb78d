//! Random problem-instance generation with an explicitly injected seed.
//!
//! All randomness flows through a caller-owned [`SplitMix64`]; there is no
//! process-wide generator state. Instances are plain records, read-only once
//! generated, and serializable so demos can dump them for audit.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Small deterministic PRNG (Steele et al.'s SplitMix64). Good enough for
/// illustrative instance data; not for anything cryptographic.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform draw from the half-open range `[lo, hi)`.
    pub fn gen_range(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo < hi);
        lo + self.next_u64() % (hi - lo)
    }
}

/// Knapsack-style inventory instance: per-item values, costs, quantity
/// bounds, and one shared budget.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryInstance {
    pub values: Vec<i64>,
    pub costs: Vec<i64>,
    pub bounds: Vec<i64>,
    pub budget: i64,
}

/// Generate an inventory instance: values and costs in 1..10, quantity
/// bounds in 2..6, budget in 12..40.
pub fn inventory_instance(rng: &mut SplitMix64, num_items: usize) -> InventoryInstance {
    let draw = |rng: &mut SplitMix64, lo: u64, hi: u64| -> Vec<i64> {
        (0..num_items).map(|_| rng.gen_range(lo, hi) as i64).collect()
    };
    let values = draw(rng, 1, 10);
    let costs = draw(rng, 1, 10);
    let budget = rng.gen_range(12, 40) as i64;
    let bounds = draw(rng, 2, 6);
    InventoryInstance {
        values,
        costs,
        bounds,
        budget,
    }
}

/// Set-cover instance: a universe of item ids and one coverage set per
/// supplier.
#[derive(Debug, Clone, Serialize)]
pub struct SupplyInstance {
    pub universe: Vec<u32>,
    pub coverage: Vec<BTreeSet<u32>>,
}

/// Generate a supply instance. The universe is 10 draws over
/// `0..universe_span`, deduplicated; each supplier covers 8 draws from the
/// universe. A supplier may end up covering the whole universe.
pub fn supply_instance(
    rng: &mut SplitMix64,
    universe_span: u32,
    num_suppliers: usize,
) -> SupplyInstance {
    const UNIVERSE_DRAWS: usize = 10;
    const SUPPLIER_DRAWS: usize = 8;

    let universe = draw_universe(rng, universe_span, UNIVERSE_DRAWS);
    let coverage = (0..num_suppliers)
        .map(|_| draw_coverage(rng, &universe, SUPPLIER_DRAWS))
        .collect();
    SupplyInstance { universe, coverage }
}

/// Combined purchase-planning instance: an item universe with prices and
/// quantity bounds, suppliers with coverage sets and per-item cost quotes, a
/// shared budget, and a cap on how many suppliers may be selected.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseInstance {
    pub universe: Vec<u32>,
    pub prices: Vec<i64>,
    pub bounds: Vec<i64>,
    pub budget: i64,
    pub coverage: Vec<BTreeSet<u32>>,
    /// Per supplier: quoted cost for each item it covers.
    pub quotes: Vec<BTreeMap<u32, i64>>,
    pub max_suppliers: i64,
}

impl PurchaseInstance {
    /// Position of an item id within the universe.
    pub fn slot(&self, item: u32) -> Option<usize> {
        self.universe.iter().position(|&u| u == item)
    }
}

/// Generate a purchase instance: universe from 10 draws over 0..16, average
/// item costs in 1..=9, selling prices at 1.2x average cost, quantity bounds
/// in 2..8, budget 100. Each supplier covers 6 draws from the universe and
/// quotes 75%..125% of an item's average cost; at most 3 suppliers may be
/// picked.
pub fn purchase_instance(rng: &mut SplitMix64, num_suppliers: usize) -> PurchaseInstance {
    const UNIVERSE_SPAN: u32 = 16;
    const UNIVERSE_DRAWS: usize = 10;
    const SUPPLIER_DRAWS: usize = 6;
    const BUDGET: i64 = 100;
    const MAX_SUPPLIERS: i64 = 3;

    let universe = draw_universe(rng, UNIVERSE_SPAN, UNIVERSE_DRAWS);
    let average_costs: BTreeMap<u32, i64> = universe
        .iter()
        .map(|&item| (item, rng.gen_range(1, 10) as i64))
        .collect();
    let prices: Vec<i64> = universe
        .iter()
        .map(|item| (1.2 * average_costs[item] as f64) as i64)
        .collect();
    let bounds: Vec<i64> = universe
        .iter()
        .map(|_| rng.gen_range(2, 8) as i64)
        .collect();

    let coverage: Vec<BTreeSet<u32>> = (0..num_suppliers)
        .map(|_| draw_coverage(rng, &universe, SUPPLIER_DRAWS))
        .collect();
    let quotes: Vec<BTreeMap<u32, i64>> = coverage
        .iter()
        .map(|covered| {
            covered
                .iter()
                .map(|&item| {
                    let percent = rng.gen_range(75, 125) as i64;
                    (item, percent * average_costs[&item] / 100 + 1)
                })
                .collect()
        })
        .collect();

    PurchaseInstance {
        universe,
        prices,
        bounds,
        budget: BUDGET,
        coverage,
        quotes,
        max_suppliers: MAX_SUPPLIERS,
    }
}

fn draw_universe(rng: &mut SplitMix64, span: u32, draws: usize) -> Vec<u32> {
    let mut items = BTreeSet::new();
    for _ in 0..draws {
        items.insert(rng.gen_range(0, span as u64) as u32);
    }
    items.into_iter().collect()
}

fn draw_coverage(rng: &mut SplitMix64, universe: &[u32], draws: usize) -> BTreeSet<u32> {
    (0..draws)
        .map(|_| universe[rng.gen_range(0, universe.len() as u64) as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_for_a_fixed_seed() {
        let mut a = SplitMix64::new(10);
        let mut b = SplitMix64::new(10);
        assert_eq!(
            inventory_instance(&mut a, 12).values,
            inventory_instance(&mut b, 12).values
        );
        assert_eq!(
            supply_instance(&mut a, 10, 5).universe,
            supply_instance(&mut b, 10, 5).universe
        );
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SplitMix64::new(1);
        let mut b = SplitMix64::new(2);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn inventory_data_stays_in_documented_ranges() {
        let mut rng = SplitMix64::new(7);
        let inst = inventory_instance(&mut rng, 12);
        assert_eq!(inst.values.len(), 12);
        assert!(inst.values.iter().all(|&v| (1..10).contains(&v)));
        assert!(inst.costs.iter().all(|&w| (1..10).contains(&w)));
        assert!(inst.bounds.iter().all(|&b| (2..6).contains(&b)));
        assert!((12..40).contains(&inst.budget));
    }

    #[test]
    fn supply_coverage_draws_only_universe_items() {
        let mut rng = SplitMix64::new(3);
        let inst = supply_instance(&mut rng, 10, 5);
        assert!(!inst.universe.is_empty());
        assert_eq!(inst.coverage.len(), 5);
        for covered in &inst.coverage {
            assert!(covered.iter().all(|item| inst.universe.contains(item)));
        }
    }

    #[test]
    fn purchase_quotes_exist_exactly_for_covered_items() {
        let mut rng = SplitMix64::new(42);
        let inst = purchase_instance(&mut rng, 5);
        assert_eq!(inst.quotes.len(), inst.coverage.len());
        for (covered, quoted) in inst.coverage.iter().zip(&inst.quotes) {
            assert_eq!(quoted.keys().copied().collect::<BTreeSet<_>>(), *covered);
            assert!(quoted.values().all(|&q| q >= 1));
        }
        assert_eq!(inst.prices.len(), inst.universe.len());
        assert_eq!(inst.bounds.len(), inst.universe.len());
        assert_eq!(inst.budget, 100);
        assert_eq!(inst.max_suppliers, 3);
        assert_eq!(inst.slot(inst.universe[0]), Some(0));
    }
}
