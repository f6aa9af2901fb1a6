use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod api;
mod api_trait;
mod mock_api;
mod runner;

use api::HttpMazeApi;
use api_trait::MazeApi;
use mock_api::MockMazeApi;
use runner::Runner;

/// Icarus wakes up in the middle of a labyrinth. In the darkness he can
/// only tell whether his own room has a wall to the top, right, bottom and
/// left; he walks blind, tracking his path so he can back out of dead ends.
#[derive(Parser, Debug)]
#[command(name = "icarus")]
#[command(about = "Start the labyrinth solver")]
struct Args {
    /// Base URL of the daedalus server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// How many labyrinths to solve before asking for the results
    #[arg(long, default_value = "1")]
    times: usize,

    /// Seed for the direction-picking RNG (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Solve in-process mazes instead of talking to a server
    #[arg(long)]
    mock: bool,

    /// Maze width in mock mode
    #[arg(long, default_value = "15")]
    width: usize,

    /// Maze height in mock mode
    #[arg(long, default_value = "10")]
    height: usize,

    /// Braid probability in mock mode
    #[arg(long, default_value = "0.0")]
    braid: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let api: Box<dyn MazeApi> = if args.mock {
        println!(
            "Solving {} times in-process ({}x{}, braid {})",
            args.times, args.width, args.height, args.braid
        );
        Box::new(MockMazeApi::new(
            args.width,
            args.height,
            args.braid,
            args.seed.unwrap_or(0),
        ))
    } else {
        println!("Solving {} times against {}", args.times, args.base_url);
        Box::new(HttpMazeApi::new(args.base_url.clone()))
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let runner = Runner::new(api);
    for round in 1..=args.times {
        match runner.solve_one(&mut rng).await {
            Ok(moves) => println!("Round {}: victory in {} moves", round, moves),
            Err(err) => println!("Round {}: failed: {:#}", round, err),
        }
    }

    let stats = runner.done().await?;
    println!(
        "Labyrinth solved {} times with an avg of {} steps",
        stats.sessions_solved, stats.average_steps
    );
    Ok(())
}
