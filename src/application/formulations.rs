//! Model assembly for the three shipped scenarios: knapsack-style inventory
//! selection, set-cover supplier selection, and the combined multi-supplier
//! purchase plan.
//!
//! Every objective is a single minimized signed sum; "maximize profit" is
//! encoded by negating the profit terms at construction time. The metric
//! builders return the expressions the reporter recomputes for display, so
//! displayed cost/profit never depend on the raw objective's sign layout.

use super::generator::{InventoryInstance, PurchaseInstance, SupplyInstance};
use super::reporter::Metric;
use crate::domain::builder::Result;
use crate::domain::{Expression, Model, ModelBuilder, Relation, Sense, VarKey};

/// Inventory selection: integer quantity per item, maximize value minus
/// spend, stay within budget.
pub fn inventory_model(inst: &InventoryInstance) -> Result<Model> {
    let mut builder = ModelBuilder::new();
    for (i, &bound) in inst.bounds.iter().enumerate() {
        builder.declare_integer(VarKey::Index(i as u32), bound)?;
    }

    let objective: Expression = (0..inst.values.len())
        .map(|i| Expression::term((inst.costs[i] - inst.values[i]) as f64, VarKey::Index(i as u32)))
        .sum();
    builder.set_objective(objective, Sense::Minimize)?;

    let spend: Expression = (0..inst.costs.len())
        .map(|i| Expression::term(inst.costs[i] as f64, VarKey::Index(i as u32)))
        .sum();
    builder.add_constraint(spend, Relation::Le, inst.budget as f64, "budget limit")?;

    Ok(builder.build())
}

pub fn inventory_metrics(inst: &InventoryInstance) -> Vec<Metric> {
    let total_cost: Expression = (0..inst.costs.len())
        .map(|i| Expression::term(inst.costs[i] as f64, VarKey::Index(i as u32)))
        .sum();
    let total_value: Expression = (0..inst.values.len())
        .map(|i| Expression::term(inst.values[i] as f64, VarKey::Index(i as u32)))
        .sum();
    vec![
        Metric::new("Total cost", total_cost),
        Metric::new("Total value", total_value),
    ]
}

/// Set cover: one binary selector per supplier, minimize how many are
/// selected, every universe item must be covered by a selected supplier.
pub fn supply_model(inst: &SupplyInstance) -> Result<Model> {
    let mut builder = ModelBuilder::new();
    for j in 0..inst.coverage.len() {
        builder.declare_binary(VarKey::Index(j as u32))?;
    }

    builder.set_objective(supplier_count(inst.coverage.len()), Sense::Minimize)?;

    for (i, &item) in inst.universe.iter().enumerate() {
        let covering: Expression = inst
            .coverage
            .iter()
            .enumerate()
            .filter(|(_, covered)| covered.contains(&item))
            .map(|(j, _)| Expression::term(1.0, VarKey::Index(j as u32)))
            .sum();
        builder.add_constraint(covering, Relation::Ge, 1.0, format!("cover item {}", i))?;
    }

    Ok(builder.build())
}

pub fn supply_metrics(inst: &SupplyInstance) -> Vec<Metric> {
    vec![Metric::new(
        "Suppliers selected",
        supplier_count(inst.coverage.len()),
    )]
}

fn supplier_count(num_suppliers: usize) -> Expression {
    (0..num_suppliers)
        .map(|j| Expression::term(1.0, VarKey::Index(j as u32)))
        .sum()
}

/// Key of the purchased quantity of universe slot `i` from supplier `j`.
pub fn quantity_key(j: usize, i: usize) -> VarKey {
    VarKey::Pair(j as u32, i as u32)
}

/// Key of the binary "supplier `j` is picked" indicator. The second
/// component sits one past the universe so it never collides with a
/// quantity slot.
pub fn selector_key(num_items: usize, j: usize) -> VarKey {
    VarKey::Pair(j as u32, num_items as u32 + 1)
}

/// Combined purchase plan: per-supplier item quantities gated by a binary
/// supplier selector. Quantities only count toward profit, cost, and
/// coverage when their supplier is picked, which is what the bilinear
/// quantity-times-selector terms express.
pub fn purchase_model(inst: &PurchaseInstance) -> Result<Model> {
    let num_items = inst.universe.len();
    let num_suppliers = inst.coverage.len();
    let mut builder = ModelBuilder::new();

    for j in 0..num_suppliers {
        for (i, &bound) in inst.bounds.iter().enumerate() {
            builder.declare_integer(quantity_key(j, i), bound)?;
        }
        builder.declare_binary(selector_key(num_items, j))?;
    }

    // revenue enters negated; spend enters positive; one minimized sum
    let mut objective = Expression::new();
    for (i, &item) in inst.universe.iter().enumerate() {
        for (j, covered) in inst.coverage.iter().enumerate() {
            if covered.contains(&item) {
                objective.add_product(
                    -(inst.prices[i] as f64),
                    quantity_key(j, i),
                    selector_key(num_items, j),
                );
            }
        }
    }
    objective += purchase_spend(inst);
    builder.set_objective(objective, Sense::Minimize)?;

    for (i, &item) in inst.universe.iter().enumerate() {
        let mut covering = Expression::new();
        for (j, covered) in inst.coverage.iter().enumerate() {
            if covered.contains(&item) {
                covering.add_product(1.0, quantity_key(j, i), selector_key(num_items, j));
            }
        }
        builder.add_constraint(covering, Relation::Ge, 1.0, format!("cover item {}", i))?;
    }

    for (i, &item) in inst.universe.iter().enumerate() {
        for (j, covered) in inst.coverage.iter().enumerate() {
            if !covered.contains(&item) {
                builder.add_constraint(
                    Expression::term(1.0, quantity_key(j, i)),
                    Relation::Eq,
                    0.0,
                    format!("supplier{} sells no item{}", j, item),
                )?;
            }
        }
    }

    builder.add_constraint(
        purchase_spend(inst),
        Relation::Le,
        inst.budget as f64,
        "budget",
    )?;

    for (i, &bound) in inst.bounds.iter().enumerate() {
        let from_all_suppliers: Expression = (0..num_suppliers)
            .map(|j| Expression::term(1.0, quantity_key(j, i)))
            .sum();
        builder.add_constraint(
            from_all_suppliers,
            Relation::Le,
            bound as f64,
            format!("bound item {}", i),
        )?;
    }

    let selected: Expression = (0..num_suppliers)
        .map(|j| Expression::term(1.0, selector_key(num_items, j)))
        .sum();
    builder.add_constraint(
        selected,
        Relation::Le,
        inst.max_suppliers as f64,
        "max suppliers",
    )?;

    Ok(builder.build())
}

pub fn purchase_metrics(inst: &PurchaseInstance) -> Vec<Metric> {
    let num_items = inst.universe.len();
    let cost = purchase_spend(inst);

    let mut profit = Expression::new();
    for (i, &price) in inst.prices.iter().enumerate() {
        for j in 0..inst.coverage.len() {
            profit.add_product(price as f64, quantity_key(j, i), selector_key(num_items, j));
        }
    }

    let net = profit.clone() - cost.clone();
    vec![
        Metric::new("Cost", cost),
        Metric::new("Profit", profit),
        Metric::new("Net profit", net),
    ]
}

/// Quoted spend across all suppliers: Σ quote * quantity * selector.
fn purchase_spend(inst: &PurchaseInstance) -> Expression {
    let num_items = inst.universe.len();
    let mut spend = Expression::new();
    for (j, quoted) in inst.quotes.iter().enumerate() {
        for (&item, &quote) in quoted {
            if let Some(i) = inst.slot(item) {
                spend.add_product(quote as f64, quantity_key(j, i), selector_key(num_items, j));
            }
        }
    }
    spend
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::generator::{
        inventory_instance, purchase_instance, supply_instance, SplitMix64,
    };

    #[test]
    fn inventory_model_shape() {
        let mut rng = SplitMix64::new(5);
        let inst = inventory_instance(&mut rng, 12);
        let model = inventory_model(&inst).unwrap();
        assert_eq!(model.num_variables(), 12);
        assert!(!model.is_quadratic());
        assert_eq!(model.constraints().len(), 1);
        assert_eq!(model.constraints()[0].label, "budget limit");
        assert_eq!(model.constraints()[0].relation, Relation::Le);
        assert_eq!(model.constraints()[0].bound, inst.budget as f64);
    }

    #[test]
    fn supply_model_covers_each_universe_item_once() {
        let mut rng = SplitMix64::new(5);
        let inst = supply_instance(&mut rng, 10, 5);
        let model = supply_model(&inst).unwrap();
        assert_eq!(model.num_variables(), 5);
        assert_eq!(model.constraints().len(), inst.universe.len());
        for (i, constraint) in model.constraints().iter().enumerate() {
            assert_eq!(constraint.label, format!("cover item {}", i));
            assert_eq!(constraint.relation, Relation::Ge);
            assert_eq!(constraint.bound, 1.0);
        }
    }

    #[test]
    fn purchase_model_is_quadratic_with_offset_selector_keys() {
        let mut rng = SplitMix64::new(10);
        let inst = purchase_instance(&mut rng, 5);
        let model = purchase_model(&inst).unwrap();
        let n = inst.universe.len();

        assert!(model.is_quadratic());
        // one quantity per (supplier, slot) plus one selector per supplier
        assert_eq!(model.num_variables(), 5 * n + 5);
        for j in 0..5 {
            assert!(model.domain(selector_key(n, j)).unwrap().is_binary());
            assert_eq!(selector_key(n, j), VarKey::Pair(j as u32, n as u32 + 1));
        }

        let labels: Vec<&str> = model.constraints().iter().map(|c| c.label.as_str()).collect();
        assert!(labels.contains(&"budget"));
        assert!(labels.contains(&"max suppliers"));
        assert!(labels.contains(&"cover item 0"));
        assert!(labels.contains(&format!("bound item {}", n - 1).as_str()));

        let uncovered = labels
            .iter()
            .filter(|l| l.starts_with("supplier"))
            .count();
        let expected_uncovered: usize = inst
            .coverage
            .iter()
            .map(|covered| n - covered.len())
            .sum();
        assert_eq!(uncovered, expected_uncovered);
    }

    #[test]
    fn purchase_metrics_tie_out_net_profit() {
        let mut rng = SplitMix64::new(10);
        let inst = purchase_instance(&mut rng, 5);
        let metrics = purchase_metrics(&inst);
        assert_eq!(metrics[0].name, "Cost");
        assert_eq!(metrics[1].name, "Profit");
        assert_eq!(metrics[2].name, "Net profit");
        // net = profit - cost as an expression identity
        let rebuilt = metrics[1].expression.clone() - metrics[0].expression.clone();
        assert_eq!(rebuilt, metrics[2].expression);
    }
}
