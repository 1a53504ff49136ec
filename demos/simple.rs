use mincov_rs::cost::Cost1;
use mincov_rs::matrix::Matrix;
use mincov_rs::solver::Solver;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    // Six rows; columns 0 and 1 split them in halves, the rest are pairs.
    let columns: [&[usize]; 6] = [&[0, 1, 2], &[3, 4, 5], &[0, 3], &[1, 4], &[2, 5], &[0, 4]];

    let mut m = Matrix::<Cost1>::new(6, columns.len(), 1);
    for (j, rows) in columns.iter().enumerate() {
        for &i in rows.iter() {
            m.insert_elem(i, j);
        }
    }
    println!("m = {:?}", m);
    print!("{}", m);
    print!("{}", m.snapshot());

    m.backup();
    m.select_col(2);
    println!("after select_col(2):");
    print!("{}", m);
    m.restore();
    println!("after restore: {:?}", m);

    let mut solver = Solver::new();
    let solution = solver.solve(&m)?;
    println!("cost = {}", solution.cost);
    println!("columns = {:?}", solution.columns);
    println!("stats = {:?}", solver.stats());

    Ok(())
}
