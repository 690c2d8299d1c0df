use clap::Parser;
use schoolroster::config::display_name;
use schoolroster::{Roster, RosterConfig};
use std::io;
use std::path::PathBuf;
use std::process;

mod command;
mod help;
mod shell;

use shell::{Flow, Shell};

/// School roster: look up students, teachers, buses and classrooms
#[derive(Parser)]
#[command(name = "schoolroster", version, about)]
struct Cli {
    /// Directory holding the roster files (default: current directory)
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Config file with file names (default: <data-dir>/roster.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a command line and exit; may be given several times
    #[arg(short = 'e', long = "exec")]
    exec: Vec<String>,

    /// Don't print the command reference on startup
    #[arg(long)]
    no_banner: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => RosterConfig::load(path)?,
        None => RosterConfig::discover(&cli.data_dir)?,
    };
    let roster = Roster::open(&cli.data_dir, &config)?;
    report_loaded(&roster);

    let stdin = io::stdin();
    let mut shell = Shell::new(roster, stdin.lock(), io::stdout());

    if !cli.exec.is_empty() {
        for line in &cli.exec {
            if shell.execute_line(line)? == Flow::Quit {
                break;
            }
        }
        return Ok(());
    }

    let interrupt = shell.interrupt();
    if let Err(e) = ctrlc::set_handler(move || {
        if interrupt.request() {
            println!("\n{}", shell::INTERRUPTED);
            process::exit(0);
        }
        log::info!("Interrupt received, stopping after the current command");
    }) {
        log::warn!("Could not install the Ctrl-C handler: {e}");
    }

    if !cli.no_banner {
        shell.print_help()?;
    }
    shell.run()?;
    Ok(())
}

fn report_loaded(roster: &Roster) {
    if let Some(files) = roster.files() {
        println!(
            "Loaded {} students from {}",
            roster.students().len(),
            display_name(&files.students)
        );
        println!(
            "Loaded {} teachers from {}",
            roster.teachers().len(),
            display_name(&files.teachers)
        );
    }
}
