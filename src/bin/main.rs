use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use translator_core::config::Config;
use translator_core::logging::init_tracing;
use translator_core::persistence::{Format, LoadMode};
use translator_core::{Language, Outcome, TranslatorService};

#[derive(Parser)]
#[command(name = "translator", version, about = "Learned translation dictionary with scored entries")]
struct Cli {
    /// Dictionary file used as autosave (overrides TRANSLATOR_AUTOSAVE)
    #[arg(long, global = true)]
    autosave: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up a phrase
    Translate { from: Language, to: Language, text: String },
    /// Rate an existing translation from 1 to 10
    Evaluate {
        from: Language,
        to: Language,
        text: String,
        score: f64,
    },
    /// Add or overwrite a translation
    Add {
        from: Language,
        to: Language,
        text: String,
        translation: String,
        #[arg(long)]
        score: Option<f64>,
    },
    /// Check whether a translation exists
    Exists { from: Language, to: Language, text: String },
    /// Highest rated translations of a language pair
    Best {
        from: Language,
        to: Language,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Lowest rated translations of a language pair
    Worst {
        from: Language,
        to: Language,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Dictionary-wide statistics
    Stats,
    /// Most recent actions, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Save the dictionary to a file
    Save {
        path: PathBuf,
        /// binary or json (default: guessed from the extension)
        #[arg(long)]
        format: Option<Format>,
    },
    /// Load a dictionary file, merging it in unless --replace is given
    Load {
        path: PathBuf,
        #[arg(long)]
        format: Option<Format>,
        #[arg(long)]
        replace: bool,
    },
    /// Write a human-readable report
    Export { path: PathBuf },
    /// Remove every translation and the action history
    Clear,
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::Exists { .. }
                | Command::Best { .. }
                | Command::Worst { .. }
                | Command::Stats
                | Command::History { .. }
                | Command::Save { .. }
                | Command::Export { .. }
        )
    }
}

fn run(service: &mut TranslatorService, command: &Command) -> Outcome {
    match command {
        Command::Translate { from, to, text } => service.translate(*from, *to, text),
        Command::Evaluate { from, to, text, score } => service.evaluate(*from, *to, text, *score),
        Command::Add {
            from,
            to,
            text,
            translation,
            score,
        } => service.add(*from, *to, text, translation, *score),
        Command::Exists { from, to, text } => service.exists(*from, *to, text),
        Command::Best { from, to, limit } => service.best(*from, *to, *limit),
        Command::Worst { from, to, limit } => service.worst(*from, *to, *limit),
        Command::Stats => service.stats(),
        Command::History { limit } => service.history(*limit),
        Command::Save { path, format } => {
            service.save(path, format.unwrap_or_else(|| Format::from_path(path)))
        }
        Command::Load {
            path,
            format,
            replace,
        } => {
            let mode = if *replace { LoadMode::Replace } else { LoadMode::Merge };
            service.load(path, format.unwrap_or_else(|| Format::from_path(path)), mode)
        }
        Command::Export { path } => service.export_readable(path),
        Command::Clear => service.clear(),
    }
}

fn print_outcome(outcome: &Outcome) {
    if outcome.success {
        println!("{}", outcome.message);
    } else {
        eprintln!("{} {}", "error:".red().bold(), outcome.message);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.autosave {
        config.autosave_format = Format::from_path(&path);
        config.autosave_path = path;
    }
    init_tracing(&config.log);

    let mut service = TranslatorService::open(config);
    let outcome = run(&mut service, &cli.command);
    print_outcome(&outcome);

    if outcome.success && cli.command.mutates() {
        let saved = service.autosave();
        if !saved.success {
            print_outcome(&saved);
            return ExitCode::FAILURE;
        }
    }

    if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
