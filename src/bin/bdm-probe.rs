use anyhow::{Context, Result};
use bdm332::{Dispatcher, SimSeed, SimTarget, BANNER};
use clap::{ArgAction, Parser};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bdm-probe")]
#[command(about = "MC68332 BDM command loop over stdio against a simulated target", long_about = None)]
struct Args {
    /// Seed the simulated target from a JSON file before accepting commands
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Start with the simulated CPU already halted in BDM
    #[arg(long, action = ArgAction::SetTrue)]
    halted: bool,

    /// Simulate a target that never reaches BDM on STOP
    #[arg(long, action = ArgAction::SetTrue)]
    fail_halt: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut sim = SimTarget::new();
    if let Some(path) = &args.seed {
        let seed = SimSeed::load(path).with_context(|| format!("seed {}", path.display()))?;
        sim.apply_seed(&seed)
            .with_context(|| format!("apply seed {}", path.display()))?;
    }
    if args.halted {
        sim.force_halted(true);
    }
    if args.fail_halt {
        sim.set_fail_halt(true);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{BANNER}\r\n")?;
    out.flush()?;

    let mut dispatcher = Dispatcher::new(sim);
    for byte in io::stdin().lock().bytes() {
        if let Some(response) = dispatcher.push_byte(byte?) {
            write!(out, "{response}")?;
            out.flush()?;
        }
    }
    Ok(())
}
