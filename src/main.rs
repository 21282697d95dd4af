//! Visual Search - Interactive console
//!
//! Sets up the premade red-vertical search and lets the user step the
//! attention model one iteration at a time, printing the trace as it grows.

use visual_search::core::error::Result;
use visual_search::{ItemSpec, ModelConfig, SearchModel};

use std::io::{self, Write};

const DEFAULT_LURES: u32 = 8;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visual_search=info".into()),
        )
        .init();

    tracing::info!("Visual Search starting...");

    let mut model = SearchModel::new(ModelConfig::default())?;
    let mut label = premade_search(&mut model, false, DEFAULT_LURES)?;
    model.init_search(&label);

    println!("\n=== VISUAL SEARCH ===");
    println!("Parallel and serial attention model");
    println!();
    println!("Commands:");
    println!("  step / s          - Advance the search by one iteration");
    println!("  run / r           - Run the current search to completion");
    println!("  status            - Show counters and outcome");
    println!("  items             - List every item and its state");
    println!("  log               - Print the full trace");
    println!("  reset             - Start the current search over");
    println!("  feature [n]       - Red vertical among n green verticals");
    println!("  conjunction [n]   - Red vertical among green verticals and red horizontals");
    println!("  quit / q          - Exit");
    println!();

    let mut printed = print_new_messages(&model, 0);

    loop {
        print!("[{}] > ", model.iteration());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();

        match command {
            "quit" | "q" => break,
            "step" | "s" => {
                if model.outcome().is_done() {
                    println!("Search is over. Use 'reset' to run it again.");
                    continue;
                }
                model.run_search_step();
                if model.outcome().is_done() {
                    model.analyze_result();
                }
                printed = print_new_messages(&model, printed);
            }
            "run" | "r" => {
                while !model.run_search_step() {}
                model.analyze_result();
                printed = print_new_messages(&model, printed);
                println!("{}", model.summary().summary());
            }
            "status" => display_status(&model),
            "items" => display_items(&model),
            "log" => {
                for message in model.messages() {
                    println!("{}", message);
                }
            }
            "reset" => {
                model.init_search(&label);
                printed = print_new_messages(&model, 0);
            }
            "feature" | "conjunction" => {
                let lures = match argument.map(str::parse::<u32>) {
                    None => DEFAULT_LURES,
                    Some(Ok(n)) => n,
                    Some(Err(_)) => {
                        println!("Usage: {} [number of lures]", command);
                        continue;
                    }
                };
                match premade_search(&mut model, command == "conjunction", lures) {
                    Ok(new_label) => {
                        label = new_label;
                        model.init_search(&label);
                        printed = print_new_messages(&model, 0);
                    }
                    Err(e) => println!("Could not build search: {}", e),
                }
            }
            _ => println!("Unknown command. Available: step, run, status, items, log, reset, feature, conjunction, quit"),
        }
    }

    println!("\nGoodbye! {} iterations on the last search.", model.iteration());
    Ok(())
}

/// Red vertical target among green verticals, plus red horizontals for
/// the conjunction search; lures are split evenly over the kinds
fn premade_search(model: &mut SearchModel, conjunction: bool, lures: u32) -> Result<String> {
    let target = ItemSpec::plain("red", "vertical", 1);
    let (distractors, label) = if conjunction {
        (
            vec![
                ItemSpec::plain("green", "vertical", lures / 2),
                ItemSpec::plain("red", "horizontal", lures / 2),
            ],
            format!("Conjunction search, {} lures", lures / 2 * 2),
        )
    } else {
        (
            vec![ItemSpec::plain("green", "vertical", lures)],
            format!("Feature search, {} lures", lures),
        )
    };
    model.create_simulation(&target, &distractors, None)?;
    Ok(label)
}

/// Print trace messages after index `from`; returns the new count
fn print_new_messages(model: &SearchModel, from: usize) -> usize {
    let messages = model.messages();
    for message in messages.iter().skip(from) {
        println!("{}", message);
    }
    messages.len()
}

fn display_status(model: &SearchModel) {
    println!();
    println!("=== Status (Iteration {}) ===", model.iteration());
    println!("  Outcome: {:?}", model.outcome());
    println!("  Fixation: {}", model.fixation());
    match model.selected() {
        Some(id) => println!("  Attending item {} ({:?})", id, model.timer()),
        None => println!("  Attending nothing"),
    }
    println!(
        "  Viable: {}, Rejected: {}",
        model.viable_ids().len(),
        model.rejected_ids().len()
    );
    println!(
        "  Selections: {}, Eye movements: {}, Auto-rejections: {}",
        model.num_attended(),
        model.num_eye_movements(),
        model.num_auto_rejections()
    );
    if model.outcome().is_done() {
        println!("  Correct: {}", model.correct());
    }
    println!();
}

fn display_items(model: &SearchModel) {
    println!();
    for item in model.search_items() {
        let location = item
            .location
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unplaced".to_string());
        println!(
            "  {:>3} {:<40} at {:<12} integrator {:>8.4}, weight {:.3}{}{}",
            item.id,
            item.name,
            location,
            item.integrator,
            item.distance_weight,
            if item.rejected { " REJECTED" } else { "" },
            if item.currently_selected { " <- attended" } else { "" },
        );
    }
    println!();
}
