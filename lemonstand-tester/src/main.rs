mod logic;
mod storage;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use lemonstand_game::{KeyValueStore, MemoryStore, ScoreBook};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    ALL_STRATEGIES, SeedInfo, Strategy, StrategyResult, StrategyTester, resolve_seed_inputs,
};
use storage::FileStore;
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "lemonstand-tester", version = "0.1.0")]
#[command(
    about = "Automated playtesting for Lemonstand - scripted strategies over seeded sessions"
)]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated integers or room codes, or `all`)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Days to play per session
    #[arg(long, default_value_t = 60)]
    days: u32,

    /// Number of iterations per strategy and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Directory for persisted leaderboards; in-memory when omitted
    #[arg(long)]
    scores_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies);
    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;

    let results = if let Some(dir) = args.scores_dir.clone() {
        let store = FileStore::new(dir);
        let results = run_strategies(&args, &strategies, &seed_infos, &store);
        report_leaderboard(&store);
        results
    } else {
        run_strategies(&args, &strategies, &seed_infos, &MemoryStore::new())
    };

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in ALL_STRATEGIES {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🍋 Lemonstand Automated Tester".bright_cyan().bold());
    println!("{}", "==============================".cyan());
}

fn expand_strategies(strategies_arg: &str) -> Vec<Strategy> {
    let mut strategies = Vec::new();
    for token in split_csv(strategies_arg) {
        if token.eq_ignore_ascii_case("all") {
            for strategy in ALL_STRATEGIES {
                if !strategies.contains(&strategy) {
                    strategies.push(strategy);
                }
            }
            continue;
        }
        match Strategy::from_key(&token) {
            Some(strategy) if !strategies.contains(&strategy) => strategies.push(strategy),
            Some(_) => {}
            None => eprintln!("⚠️  Unknown strategy: {}", token.yellow()),
        }
    }
    strategies
}

fn run_strategies<S: KeyValueStore + Clone>(
    args: &Args,
    strategies: &[Strategy],
    seed_infos: &[SeedInfo],
    store: &S,
) -> Vec<StrategyResult> {
    println!("{}", "🧠 Running Strategy Sessions".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = StrategyTester::new(args.days, args.verbose);
    strategies
        .iter()
        .flat_map(|&strategy| tester.run_strategy(strategy, seed_infos, args.iterations, store))
        .collect()
}

fn report_leaderboard(store: &FileStore) {
    let board = ScoreBook::new(store.clone()).load();
    match board.best() {
        Some(best) => println!(
            "🏆 Leaderboard in {}: {} entries, best {} on day {}",
            store.dir().display(),
            board.len(),
            best.score,
            best.day
        ),
        None => println!("🏆 Leaderboard in {} is empty", store.dir().display()),
    }
}

fn write_reports(args: &Args, results: &[StrategyResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Lemonstand Strategy Results\n\n_No strategies executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No strategies executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    let duration = start_time.elapsed();
    writeln!(&mut output_target)?;
    writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn base_args() -> Args {
        Args {
            strategies: "sweet-spot".to_string(),
            list_strategies: false,
            seeds: "1337".to_string(),
            days: 5,
            iterations: 1,
            report: "json".to_string(),
            scores_dir: None,
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "lemonstand-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn sample_result(passed: bool) -> StrategyResult {
        StrategyResult {
            strategy: Strategy::Tycoon,
            seed: 7,
            room_code: "LS-LEMON07".to_string(),
            passed,
            iterations_run: 1,
            successful_iterations: usize::from(passed),
            failures: Vec::new(),
            mean_cash: 10.0,
            mean_score: 1000.0,
            best_score: 1000,
            collapse_runs: 0,
            mean_rejected_commands: 0.0,
            average_duration: Duration::ZERO,
        }
    }

    #[test]
    fn expands_all_strategies_keyword() {
        let expanded = expand_strategies("premium,all");
        assert_eq!(expanded.len(), ALL_STRATEGIES.len());
        assert_eq!(expanded[0], Strategy::Premium);
    }

    #[test]
    fn expand_strategies_skips_unknown_and_duplicates() {
        let expanded = expand_strategies("tycoon,hoarder,tycoon,bargain");
        assert_eq!(expanded, vec![Strategy::Tycoon, Strategy::Bargain]);
    }

    #[test]
    fn maybe_list_strategies_writes_output() {
        let temp = temp_path("list.txt");
        let args = Args {
            list_strategies: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        assert!(maybe_list_strategies(&args).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available strategies"));
        assert!(content.contains("random-walk"));
    }

    #[test]
    fn maybe_list_strategies_returns_false_when_disabled() {
        assert!(!maybe_list_strategies(&base_args()).unwrap());
    }

    #[test]
    fn write_reports_json_empty_results() {
        let temp = temp_path("empty.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.starts_with("[]"));
    }

    #[test]
    fn write_reports_emits_markdown_report() {
        let temp = temp_path("full.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[sample_result(true)], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("# Lemonstand Strategy Results"));
        assert!(content.contains("Tycoon"));
    }

    #[test]
    fn write_reports_console_without_results() {
        let temp = temp_path("console.txt");
        let args = Args {
            report: "console".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("No strategies executed"));
        assert!(content.contains("Total time"));
    }

    #[test]
    fn run_strategies_persists_to_a_shared_directory() {
        let dir = temp_path("scores");
        let store = FileStore::new(&dir);
        let seeds = vec![SeedInfo::from_numeric(3)];
        let results = run_strategies(&base_args(), &[Strategy::Premium], &seeds, &store);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert!(!ScoreBook::new(store).load().is_empty());
        assert!(dir.join("lemonstand.highscores.json").exists());
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        target.write_all(b"ok").unwrap();
        target.flush().unwrap();
    }
}
