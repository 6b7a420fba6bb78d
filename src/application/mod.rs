// Application module: instance generation, scenario formulation, reporting

pub mod formulations;
pub mod generator;
pub mod reporter;

pub use generator::{
    inventory_instance, purchase_instance, supply_instance, InventoryInstance, PurchaseInstance,
    SplitMix64, SupplyInstance,
};
pub use reporter::{
    best_feasible, format_report, recompute_metrics, Metric, MetricValue, Report, VariableValue,
};
