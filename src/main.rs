//! Sliding-Block Puzzle Solver
//!
//! Solves one of the built-in Klotski-style puzzles with a breadth-first
//! search, prints the initial grid, the solved grid and the shortest move
//! list, and writes the solution to a text file that can be replayed later.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::error;

use klotski::grid::format_moves;
use klotski::{persistence, puzzles, replay, solve, Goal, Symmetry};

/// Finds shortest solutions to sliding-block puzzles.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and save the solution to disk.
    Solve(SolveArgs),
    /// List the built-in puzzles.
    List,
    /// Replay a saved solution and show every frame.
    Replay {
        /// Solution file written by `solve`.
        file: PathBuf,
    },
}

#[derive(Args, Default)]
struct SolveArgs {
    /// Name of the built-in puzzle.
    #[arg(short, long, default_value = "classic")]
    puzzle: String,
    /// Key symmetry (`none` or `horizontal`), defaults to the puzzle's own.
    #[arg(short, long)]
    symmetry: Option<Symmetry>,
    /// Output file, defaults to `<puzzle>_solution.txt`.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve(args)) => run_solve(args),
        Some(Command::List) => {
            run_list();
            Ok(())
        }
        Some(Command::Replay { file }) => run_replay(file),
        None => run_solve(SolveArgs {
            puzzle: puzzles::CLASSIC.name.to_string(),
            ..SolveArgs::default()
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Solves the puzzle, prints the result and saves it to disk.
fn run_solve(args: SolveArgs) -> klotski::Result<()> {
    let puzzle = puzzles::find(&args.puzzle)?;
    let symmetry = args.symmetry.unwrap_or(puzzle.symmetry);
    let initial = puzzle.initial_grid();

    println!("initial grid:\n{initial}");

    let solution = solve(&initial, puzzle.goal(), symmetry)?;

    println!("solved grid:\n{}", solution.grid);
    println!("list of moves ({}):", solution.path.len());
    println!("{}", format_moves(&initial, &solution.path)?);

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_solution.txt", puzzle.name)));
    persistence::save(&output, puzzle.name, &initial, &solution.path)?;
    println!("Wrote {}", output.display());

    Ok(())
}

/// Prints the catalog of built-in puzzles.
fn run_list() {
    for puzzle in puzzles::PUZZLES {
        let grid = puzzle.initial_grid();
        println!(
            "{:<10} {}x{}, {} pieces  {}",
            puzzle.name,
            grid.width(),
            grid.height(),
            grid.pieces().len(),
            puzzle.description
        );
    }
}

/// Loads a saved solution and prints every frame.
fn run_replay(file: PathBuf) -> klotski::Result<()> {
    let saved = persistence::load(&file)?;
    let puzzle = puzzles::find(&saved.puzzle)?;
    let initial = puzzle.initial_grid();
    let moves = saved.moves(&initial)?;
    let frames = replay(&initial, &moves)?;

    for (i, frame) in frames.iter().enumerate() {
        match i {
            0 => println!("initial grid:"),
            _ => println!("move {} ({}):", i, saved.notation[i - 1]),
        }
        println!("{frame}\n");
    }

    let last = frames.last().unwrap_or(&initial);
    if puzzle.goal().is_reached(last) {
        println!("Goal reached in {} moves", moves.len());
    } else {
        println!("Goal not reached after {} moves", moves.len());
    }

    Ok(())
}
