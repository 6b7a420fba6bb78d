// Example: Purchase Planning (set cover + knapsack combined)
//
// Items must be sourced from a capped number of suppliers, each quoting its
// own cost per covered item. Quantities only count when their supplier is
// picked, so profit, spend, and coverage all carry quantity-times-selector
// products. Which purchase plan maximizes net profit within the budget?

use clap::Parser;
use hybriq::application::formulations::{
    purchase_metrics, purchase_model, quantity_key, selector_key,
};
use hybriq::application::generator::{purchase_instance, SplitMix64};
use hybriq::application::reporter::{best_feasible, format_report, recompute_metrics};
use hybriq::domain::Assignment;
use hybriq::solver::{Backend, GatewayFactory};

#[derive(Parser)]
#[command(about = "Combined multi-supplier purchase planning demo")]
struct Args {
    /// Seed for instance generation
    #[arg(long, default_value_t = 10)]
    seed: u64,

    /// Number of suppliers
    #[arg(long, default_value_t = 5)]
    suppliers: usize,

    /// Solver backend: auto, cbc, or highs
    #[arg(long, default_value = "auto")]
    backend: Backend,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SplitMix64::new(args.seed);
    let instance = purchase_instance(&mut rng, args.suppliers);

    println!("------------- Problem set up -------------");
    println!("------------- Inventory -------------");
    println!("Budget: {}", instance.budget);
    println!(
        "Number of elements in the universe: {}",
        instance.universe.len()
    );
    println!("The inventory universe is {:?}", instance.universe);
    println!("The price of each item is {:?}", instance.prices);
    println!("Bound on item quantity is {:?}", instance.bounds);
    println!("------------- Suppliers -------------");
    println!("There are {} suppliers:", instance.coverage.len());
    for (j, (covered, quoted)) in instance.coverage.iter().zip(&instance.quotes).enumerate() {
        println!("Supplier{} {:?}", j, covered);
        println!("Costs: {:?}", quoted.values().collect::<Vec<_>>());
    }

    let model = purchase_model(&instance)?;
    let gateway = GatewayFactory::create(args.backend)?;
    let solutions = gateway.submit(&model, "Combine Demo")?;

    println!("------------- Solution -------------");
    let best = best_feasible(&model, &solutions);
    let metrics = match best {
        Some(assignment) => recompute_metrics(&model, assignment, &purchase_metrics(&instance))?,
        None => Vec::new(),
    };
    let report = format_report(&model, best, metrics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match best {
        None => print!("{}", report),
        Some(assignment) => {
            print_purchase_plan(&instance, assignment, args.suppliers);
            for metric in &report.metrics {
                println!("{}: {}", metric.name, metric.value);
            }
        }
    }
    Ok(())
}

/// Item-by-supplier purchase matrix; quantities from unpicked suppliers
/// count as zero.
fn print_purchase_plan(
    instance: &hybriq::application::generator::PurchaseInstance,
    assignment: &Assignment,
    num_suppliers: usize,
) {
    let num_items = instance.universe.len();
    let choosing: Vec<i64> = (0..num_suppliers)
        .map(|j| assignment.value(selector_key(num_items, j)) as i64)
        .collect();
    println!("Choosing {:?}", choosing);

    print!("{:>6} |", "Item");
    for j in 0..num_suppliers {
        print!(" S{:<4}", j);
    }
    println!();
    for (i, item) in instance.universe.iter().enumerate() {
        print!("{:>6} |", item);
        for (j, &chosen) in choosing.iter().enumerate() {
            let quantity = assignment.value(quantity_key(j, i)) as i64 * chosen;
            print!(" {:<5}", quantity);
        }
        println!();
    }
}
