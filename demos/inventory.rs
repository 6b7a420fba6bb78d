// Example: Inventory Selection (budgeted knapsack)
//
// A shop restocks from a catalog of items, each with a selling value, a
// purchase cost, and a quantity cap. Which quantities maximize value minus
// spend without exceeding the budget?
//
// Decision Variables: x_i ∈ {0, ..., bound_i} for each item
// Minimize: Σ (cost_i − value_i)·x_i   (maximize encoded by negation)
// Subject to: Σ cost_i·x_i ≤ budget

use clap::Parser;
use hybriq::application::formulations::{inventory_metrics, inventory_model};
use hybriq::application::generator::{inventory_instance, SplitMix64};
use hybriq::application::reporter::{best_feasible, format_report, recompute_metrics};
use hybriq::solver::{Backend, GatewayFactory};

#[derive(Parser)]
#[command(about = "Knapsack-style inventory selection demo")]
struct Args {
    /// Seed for instance generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of catalog items
    #[arg(long, default_value_t = 12)]
    items: usize,

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
    let instance = inventory_instance(&mut rng, args.items);

    println!("------------- Problem set up -------------");
    println!("values: {:?}", instance.values);
    println!("costs: {:?}", instance.costs);
    println!("budget limit: {}", instance.budget);
    println!("quantity bounds: {:?}", instance.bounds);

    let model = inventory_model(&instance)?;
    let gateway = GatewayFactory::create(args.backend)?;
    let solutions = gateway.submit(&model, "Inventory Demo")?;

    println!("------------- Solution -------------");
    let best = best_feasible(&model, &solutions);
    let metrics = match best {
        Some(assignment) => recompute_metrics(&model, assignment, &inventory_metrics(&instance))?,
        None => Vec::new(),
    };
    let report = format_report(&model, best, metrics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}
