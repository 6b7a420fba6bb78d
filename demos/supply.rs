// Example: Supplier Selection (set cover)
//
// A universe of items must be sourced from suppliers, each carrying a
// subset of the universe. Which minimal set of suppliers covers everything?
//
// Decision Variables: y_j ∈ {0, 1} for each supplier
// Minimize: Σ y_j
// Subject to: Σ_{j : item ∈ S_j} y_j ≥ 1 for every universe item

use clap::Parser;
use hybriq::application::formulations::{supply_metrics, supply_model};
use hybriq::application::generator::{supply_instance, SplitMix64};
use hybriq::application::reporter::{best_feasible, format_report, recompute_metrics};
use hybriq::domain::VarKey;
use hybriq::solver::{Backend, GatewayFactory};

#[derive(Parser)]
#[command(about = "Set-cover supplier selection demo")]
struct Args {
    /// Seed for instance generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of suppliers
    #[arg(long, default_value_t = 5)]
    suppliers: usize,

    /// Universe items are drawn from 0..span
    #[arg(long, default_value_t = 10)]
    span: u32,

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
    let instance = supply_instance(&mut rng, args.span, args.suppliers);

    println!("------------- Problem set up -------------");
    println!("The universe is {:?}", instance.universe);
    println!(
        "Number of elements in the universe: {}",
        instance.universe.len()
    );
    println!("There are {} collections:", instance.coverage.len());
    for (j, covered) in instance.coverage.iter().enumerate() {
        println!("Supplier{}: {:?}", j, covered);
    }

    let model = supply_model(&instance)?;
    let gateway = GatewayFactory::create(args.backend)?;
    let solutions = gateway.submit(&model, "Supply Demo")?;

    println!("------------- Solution -------------");
    let best = best_feasible(&model, &solutions);
    let metrics = match best {
        Some(assignment) => recompute_metrics(&model, assignment, &supply_metrics(&instance))?,
        None => Vec::new(),
    };
    let report = format_report(&model, best, metrics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", report);
    if let Some(assignment) = best {
        let selected: Vec<String> = (0..instance.coverage.len())
            .filter(|&j| assignment.value(VarKey::Index(j as u32)) > 0.5)
            .map(|j| format!("supplier{}", j))
            .collect();
        println!("Selected suppliers: {:?}", selected);
    }
    Ok(())
}
