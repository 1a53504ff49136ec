use clap::Parser;

use mincov_rs::cost::{Cost, Cost1};
use mincov_rs::matrix::Matrix;
use mincov_rs::solver::{Solver, SolverConfig};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Board size.
    #[arg(value_name = "INT", default_value = "5")]
    n: usize,

    /// Disable the dominance and essential-column reductions.
    #[clap(long)]
    no_reduce: bool,

    /// Disable lower-bound pruning.
    #[clap(long)]
    no_bound: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    // Minimum dominating set of queens as a covering problem:
    // - one row per square (it has to be attacked or occupied)
    // - one column per square (a queen placed there)
    // - cell (s, q) iff a queen on q attacks or occupies s
    let n = args.n;
    println!("Encoding queen domination with n = {}", n);
    let square = |i: usize, j: usize| i * n + j;

    let mut m = Matrix::<Cost1>::new(n * n, n * n, 1);
    for qi in 0..n {
        for qj in 0..n {
            for si in 0..n {
                for sj in 0..n {
                    let (di, dj) = (qi.abs_diff(si), qj.abs_diff(sj));
                    if qi == si || qj == sj || di == dj {
                        m.insert_elem(square(si, sj), square(qi, qj));
                    }
                }
            }
        }
    }
    println!("m = {:?}", m);

    let config = SolverConfig {
        row_dominance: !args.no_reduce,
        col_dominance: !args.no_reduce,
        essential_col: !args.no_reduce,
        lower_bound: !args.no_bound,
    };
    let mut solver = Solver::with_config(config);
    let solution = solver.solve(&m)?;

    println!("{} queens (cost {})", solution.columns.len(), solution.cost.component(0));
    let mut board = vec![vec!['.'; n]; n];
    for &q in &solution.columns {
        board[q / n][q % n] = 'Q';
    }
    for row in &board {
        println!("{}", row.iter().collect::<String>());
    }
    println!("stats = {:?}", solver.stats());

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
