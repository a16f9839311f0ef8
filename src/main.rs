use battle_frontier::battle::AutoBattle;
use battle_frontier::dialog::Dialog;
use battle_frontier::facilities::prize_shop::open_shop;
use battle_frontier::session::{start_facility, FrontierContext};
use battle_frontier::{Facility, FrontierConfig, FrontierResult, FrontierRng, FrontierState, Player, PokemonInst};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

const STARTER_PARTY: [&str; 6] = ["Blaziken", "Swampert", "Sceptile", "Gardevoir", "Metagross", "Salamence"];
const STARTER_LEVEL: u8 = 50;
const DEFAULT_SAVE: &str = "frontier.sav";

/// Console front end: numbered menus on stdout, answers on stdin.
struct ConsoleDialog<R: BufRead> {
    input: R,
}

impl<R: BufRead> ConsoleDialog<R> {
    fn read_line(&mut self) -> Option<String> {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead> Dialog for ConsoleDialog<R> {
    fn message(&mut self, text: &str) {
        println!("{}", text);
    }

    /// Blank input or EOF backs out. Anything that isn't a listed number asks again.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        loop {
            println!("{}", prompt);
            for (i, option) in options.iter().enumerate() {
                println!("  {}) {}", i + 1, option);
            }
            let line = self.read_line()?;
            if line.is_empty() {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Some(n - 1),
                _ => println!("Please enter a number from 1 to {}.", options.len()),
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        loop {
            println!("{} (y/n)", prompt);
            let Some(line) = self.read_line() else {
                return false;
            };
            match line.to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" | "" => return false,
                _ => continue,
            }
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let value = iter.next().ok_or_else(|| format!("missing value for {}", flag))?;
        match flag.as_str() {
            "--config" => args.config = Some(PathBuf::from(value)),
            "--save" => args.save = Some(PathBuf::from(value)),
            "--seed" => args.seed = Some(value.parse().map_err(|_| format!("invalid seed: {}", value))?),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn starter_party() -> FrontierResult<Vec<PokemonInst>> {
    Ok(STARTER_PARTY
        .iter()
        .map(|name| PokemonInst::from_name(name, STARTER_LEVEL))
        .collect::<Result<Vec<_>, _>>()?)
}

fn run(args: Args) -> FrontierResult<()> {
    let config = match &args.config {
        Some(path) => FrontierConfig::load(path)?,
        None => FrontierConfig::default(),
    };
    let save_path = args.save.unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE));
    let mut state = FrontierState::load_from(&save_path)?;
    let mut rng = match args.seed {
        Some(seed) => FrontierRng::from_seed(seed),
        None => FrontierRng::new_random(),
    };
    let mut player = Player::new("Red", starter_party()?);
    let mut engine = AutoBattle::new();
    let mut dialog = ConsoleDialog {
        input: io::stdin().lock(),
    };
    tracing::info!(target: "frontier.session", save = %save_path.display(), points = state.battle_points, "frontier opened");

    let facilities: Vec<Facility> = Facility::iter().collect();
    let mut options: Vec<String> = facilities.iter().map(|f| f.name().to_string()).collect();
    options.push("Prize Shop".to_string());
    options.push("Exit".to_string());

    loop {
        dialog.message(&format!("Battle Points: {}", state.battle_points));
        let Some(choice) = dialog.choose("Where would you like to go?", &options) else {
            break;
        };
        let mut ctx = FrontierContext {
            state: &mut state,
            dialog: &mut dialog,
            engine: &mut engine,
            rng: &mut rng,
            config: &config,
            player: &mut player,
        };
        if let Some(&facility) = facilities.get(choice) {
            let summary = start_facility(facility, &mut ctx);
            ctx.say(format!(
                "{}: {} wins, {} BP earned.",
                facility.name(),
                summary.wins,
                summary.bp_earned
            ));
        } else if choice == facilities.len() {
            open_shop(&mut ctx);
        } else {
            break;
        }
        state.save_to(&save_path)?;
    }

    state.save_to(&save_path)?;
    dialog.message("See you again at the Battle Frontier!");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("usage: battle-frontier [--config <path>] [--save <path>] [--seed <n>]");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(args) {
        tracing::error!(%err, "battle frontier stopped");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
