use std::path::PathBuf;

use anyhow::Context;
use pathfind::{util::load_map, Algorithm, Outcome, Point, Session};

const USAGE: &str = "usage: pathfind [--algo astar|dijkstra] [--rows N] [--start ROW,COL] \
[--end ROW,COL] [--frames] <map.txt|map.png>";

struct Args {
    algorithm: Algorithm,
    rows: usize,
    start: Option<Point>,
    end: Option<Point>,
    frames: bool,
    map: PathBuf,
}

/// Returns `None` when only the usage was asked for
fn parse_args() -> Result<Option<Args>, anyhow::Error> {
    let mut algorithm = Algorithm::AStar;
    let mut rows = 50;
    let mut start = None;
    let mut end = None;
    let mut frames = false;
    let mut map = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("missing value for {}\n{}", name, USAGE))
        };
        match arg.as_str() {
            "--algo" => algorithm = value("--algo")?.parse()?,
            "--rows" => rows = value("--rows")?.parse().context("--rows expects a number")?,
            "--start" => start = Some(value("--start")?.parse()?),
            "--end" => end = Some(value("--end")?.parse()?),
            "--frames" => frames = true,
            "-h" | "--help" => return Ok(None),
            _ if map.is_none() && !arg.starts_with('-') => map = Some(PathBuf::from(&arg)),
            _ => anyhow::bail!("unexpected argument {}\n{}", arg, USAGE),
        }
    }

    Ok(Some(Args {
        algorithm,
        rows,
        start,
        end,
        frames,
        map: map.with_context(|| format!("no map given\n{}", USAGE))?,
    }))
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args()? else {
        println!("{}", USAGE);
        return Ok(());
    };
    let mut grid = load_map(&args.map, args.rows)?;

    if let Some(start) = args.start {
        grid.set_start(start)?;
    }
    if let Some(end) = args.end {
        grid.set_end(end)?;
    }

    let mut session = Session::with_grid(args.algorithm, grid);

    let mut frame = 0;
    let outcome = session.run(
        |grid| {
            frame += 1;
            if args.frames {
                println!("frame {}\n{}", frame, grid);
            }
        },
        || false,
    )?;

    println!("{}", session.grid());
    if args.frames {
        if let Some(finder) = session.finder() {
            println!("cost from start:\n{}", finder.g_scores());
        }
    }
    match outcome {
        Outcome::Found(result) => println!(
            "{}: path of length {} after {} expansions ({} frames)",
            args.algorithm,
            result.edges(),
            result.expanded,
            frame
        ),
        Outcome::Exhausted => println!("{}: no path ({} frames)", args.algorithm, frame),
        Outcome::Cancelled => println!("{}: cancelled", args.algorithm),
    }

    Ok(())
}
