use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chevalier::{StartSquare, TourBuilder};

#[derive(Parser, Debug)]
#[command(name = "walker", version, about = "Find an open knight's tour by random walks and pivots")]
struct Cli {
    #[arg(long, default_value_t = 8, help = "Number of ranks (rows)")]
    ranks: usize,
    #[arg(long, default_value_t = 8, help = "Number of files (columns)")]
    files: usize,
    #[arg(long, help = "Start square, numbered along rows from the top left; random if omitted")]
    start: Option<usize>,
    #[arg(long, help = "Seed for the first attempt; later attempts count up from it")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), help = "Traversals to try before giving up")]
    attempts: u32,
    #[arg(long, help = "Give up an attempt after this many pivots; unbounded if omitted")]
    max_pivots: Option<usize>,
    #[arg(long, help = "Print the path as a list of squares as well as a board")]
    path: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Log more; repeat for more detail")]
    verbose: u8,
}

impl Cli {
    fn log_filter(&self) -> EnvFilter {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_filter())
        .with_writer(std::io::stderr)
        .init();

    let mut builder = TourBuilder::with_size(cli.ranks, cli.files);
    builder.start(StartSquare::from(cli.start));

    for attempt in 0..cli.attempts {
        if let Some(seed) = cli.seed {
            builder.seed(seed.wrapping_add(u64::from(attempt)));
        }

        let mut launch = match builder.build() {
            Ok(launch) => launch,
            Err(reasons) => {
                for reason in reasons {
                    eprintln!("error: {reason}");
                }
                return ExitCode::FAILURE;
            }
        };

        if attempt == 0 {
            println!("{}x{}: {}", cli.ranks, cli.files, launch.outlook);
            if let Some(note) = launch.note {
                println!("{note}; started on square {} instead", launch.knight.current_square());
            }
        }

        let outcome = match cli.max_pivots {
            Some(max) => launch.knight.traverse_within(max),
            None => launch.knight.traverse(),
        };
        let tour = launch.knight.into_tour();

        match outcome {
            Ok(report) => {
                info!(attempt, moves = report.moves, pivots = report.pivots, "tour found");
                print!("{tour}");
                if cli.path {
                    println!("{:?}", tour.path());
                }
                println!("{}", if tour.is_closed() { "closed tour" } else { "open tour" });
                return ExitCode::SUCCESS;
            }
            Err(error) => {
                warn!(attempt, visited = tour.len(), "{error}");
                if attempt + 1 == cli.attempts {
                    print!("{tour}");
                    if cli.path {
                        println!("{:?}", tour.path());
                    }
                    println!("{error}");
                }
            }
        }
    }

    ExitCode::FAILURE
}
