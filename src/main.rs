use clap::{App, Arg, ArgMatches};
use colored::*;
use crossbeam::thread;
use log::info;
use rubik_twophase::*;
use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};

const TAB_DIR: &str = "tabs";
const BATCH_SCRAMBLE: usize = 25;

fn tab_checker(v: &str) -> Result<(), String> {
    let mut tabs: Vec<&str> = v.split(',').collect();
    let len = tabs.len();

    tabs.sort_unstable();
    tabs.dedup();
    if len > TAB_INF.len() {
        return Err("too many tables".to_string());
    } else if len != tabs.len() {
        return Err("table duplicate".to_string());
    }
    for tab in tabs {
        match tab.parse::<Id>() {
            Ok(id) if Extractor::infos(id).is_some() => (),
            _ => return Err(format!("invalid table number {}", tab)),
        }
    }
    Ok(())
}

fn new_app() -> App<'static> {
    App::new("Rubik Two-Phase Solver")
        .arg(
            Arg::new("MOVES")
                .validator(parse_moves)
                .conflicts_with_all(&["rand", "new", "batch"])
                .required_unless_present_any(&["rand", "new", "tab", "batch"])
                .help(
                    "Face rotations splited by whitespaces.\n\
                    U, D, F, B, L, R for Up, Down, Front, Back, Left and Right\n\
                    (append 2 for half turn and ' for counterclockwise)",
                ),
        )
        .arg(
            Arg::new("rand")
                .long("rand")
                .short('r')
                .help("<NB> of random moves")
                .require_equals(true)
                .value_name("NB")
                .validator(|arg| arg.parse::<usize>()),
        )
        .arg(
            Arg::new("group")
                .long("group")
                .short('g')
                .help("Allowed moves when the cube is shuffled (1 for G1 moves only)")
                .require_equals(true)
                .value_name("GR")
                .possible_values(["0", "1"]),
        )
        .arg(
            Arg::new("new")
                .long("new")
                .short('n')
                .conflicts_with_all(&["rand", "batch"])
                .help("Start with an unaltered cube"),
        )
        .arg(
            Arg::new("tab")
                .long("tab")
                .short('t')
                .exclusive(true)
                .require_equals(true)
                .validator(tab_checker)
                .value_name("IDS")
                .help("Compute tables (<IDS> from 1 to 7 separated by commas)"),
        )
        .arg(
            Arg::new("batch")
                .long("batch")
                .short('b')
                .conflicts_with("rand")
                .help("Solve <N> random cubes in parallel")
                .require_equals(true)
                .value_name("N")
                .validator(|arg| arg.parse::<usize>()),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Milliseconds spent looking for shorter solutions")
                .require_equals(true)
                .value_name("MS")
                .validator(|arg| arg.parse::<u64>()),
        )
        .arg(
            Arg::new("max-len")
                .long("max-len")
                .help("Stop as soon as a solution of at most <N> moves is found")
                .require_equals(true)
                .value_name("N")
                .validator(|arg| arg.parse::<usize>()),
        )
}

/// Value of an argument clap already validated.
fn parsed<T: std::str::FromStr>(cmd: &ArgMatches, name: &str) -> Option<T> {
    cmd.value_of(name).and_then(|v| v.parse().ok())
}

fn config(cmd: &ArgMatches) -> SolverConfig {
    let mut config = SolverConfig::default();

    if let Some(ms) = parsed(cmd, "timeout") {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(len) = parsed(cmd, "max-len") {
        config = config.with_max_length(len);
    }
    config
}

fn painted(movs: &[Move]) -> String {
    movs.iter()
        .map(|mv| mv.painted())
        .collect::<Vec<String>>()
        .join(" ")
}

fn solve_one(cube: &CubeState, solver: &TwoPhaseSolver) -> Result<(), SolveError> {
    println!("\n{}", cube);
    let solution = solver.try_solve(cube)?;

    println!(
        "{:<10}{}\n{:<10}{}",
        "Phase 1:".bold(),
        painted(&solution.phase1),
        "Phase 2:".bold(),
        painted(&solution.phase2)
    );
    println!(
        "\n{} moves in {:?} (phase 1 {:?}, phase 2 {:?}), {} probes, {} nodes",
        solution.len().to_string().green().bold(),
        solution.total_time(),
        solution.phase1_time,
        solution.phase2_time,
        solution.probes,
        solution.nodes
    );
    Ok(())
}

/// Solves `nb` random cubes, one chunk per available core.
fn solve_batch(nb: usize, group: usize, solver: &TwoPhaseSolver) {
    let mut rng = rand::thread_rng();
    let cubes: Vec<CubeState> = (0..nb)
        .map(|_| CubeState::scramble(&mut rng, BATCH_SCRAMBLE, group).0)
        .collect();
    let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
    let chunk = (nb + workers - 1) / workers;
    let start = Instant::now();

    let solutions: Vec<Solution> = thread::scope(|s| {
        let thrds: Vec<_> = cubes
            .chunks(chunk.max(1))
            .map(|cubes| {
                s.spawn(move |_| {
                    cubes
                        .iter()
                        .map(|cube| solver.solve_detailed(cube))
                        .collect::<Vec<Solution>>()
                })
            })
            .collect();

        thrds
            .into_iter()
            .flat_map(|thrd| thrd.join().unwrap_or_else(|err| std::panic::resume_unwind(err)))
            .collect()
    })
    .unwrap_or_else(|err| std::panic::resume_unwind(err));

    for (i, solution) in solutions.iter().enumerate() {
        let status = if solution.success {
            format!("{:>2} moves", solution.len()).green()
        } else {
            "unsolved".red()
        };
        println!("{:>4}: {}  {}", i + 1, status, solution);
    }

    let solved: Vec<&Solution> = solutions.iter().filter(|s| s.success).collect();
    if !solved.is_empty() {
        let total: usize = solved.iter().map(|s| s.len()).sum();
        println!(
            "\n{}/{} solved, {:.2} moves on average, {:?} overall",
            solved.len(),
            nb,
            total as f64 / solved.len() as f64,
            start.elapsed()
        );
    }
}

fn run(cmd: &ArgMatches) -> Result<(), Box<dyn Error>> {
    if let Some(ids) = cmd.value_of("tab") {
        let ids = ids
            .split(',')
            .map(|id| id.parse::<Id>())
            .collect::<Result<Vec<Id>, _>>()?;
        for file in Tables::table_search(Path::new(TAB_DIR), &ids)? {
            println!("{} {}", "Saved".green(), file.display());
        }
        return Ok(());
    }

    let start = Instant::now();
    let tables = Tables::load_or_build(Path::new(TAB_DIR));
    info!("tables ready in {:?}", start.elapsed());
    let solver = TwoPhaseSolver::new(&tables, config(cmd));
    let group = parsed(cmd, "group").unwrap_or(0);

    if let Some(nb) = parsed(cmd, "batch") {
        solve_batch(nb, group, &solver);
        return Ok(());
    }

    let cube = if cmd.is_present("new") {
        CubeState::new()
    } else if let Some(nb) = parsed(cmd, "rand") {
        let (cube, movs) = CubeState::scramble(&mut rand::thread_rng(), nb, group);
        println!("{:<10}{}", "Scramble:".bold(), painted(&movs));
        println!("{:<10}{}", "Inverse:".bold(), painted(&invert_moves(&movs)));
        cube
    } else {
        CubeState::from_moves(&parse_moves(cmd.value_of("MOVES").unwrap_or_default())?)
    };
    solve_one(&cube, &solver)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cmd = new_app().get_matches();

    if let Err(err) = run(&cmd) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
