mod session;

use std::env;
use std::io;
use std::process;

use session::{Session, TranscriptProfile};

fn main() -> io::Result<()> {
    let options = parse_options().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!(
            "Usage: autopad-emulator [--profile <eat-meat|open-card|mission>] [--ticks <budget>]"
        );
        process::exit(2);
    });

    let mut session = Session::new(options.profile)?;
    let outcome = session.run(options.tick_budget)?;

    println!(
        "{}: {} ticks ({} ms emulated), {} phase changes, transcript at {}",
        session.script_name(),
        outcome.ticks,
        outcome.emulated_millis(),
        outcome.phase_changes,
        options.profile.log_path(),
    );

    if outcome.done {
        println!("script parked in its terminal phase");
        Ok(())
    } else {
        eprintln!(
            "script still running after {} ticks (stopped in phase `{}`)",
            outcome.ticks, outcome.final_phase
        );
        process::exit(1);
    }
}

struct Options {
    profile: TranscriptProfile,
    tick_budget: u32,
}

fn parse_options() -> Result<Options, String> {
    let mut profile = None;
    let mut tick_budget = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if let Some(value) = arg.strip_prefix("--profile=") {
            profile = Some(TranscriptProfile::from_tag(value)?);
        } else if arg == "--profile" {
            let value = args.next().ok_or("Expected value after --profile")?;
            profile = Some(TranscriptProfile::from_tag(&value)?);
        } else if let Some(value) = arg.strip_prefix("--ticks=") {
            tick_budget = Some(parse_budget(value)?);
        } else if arg == "--ticks" {
            let value = args.next().ok_or("Expected value after --ticks")?;
            tick_budget = Some(parse_budget(&value)?);
        } else if profile.is_none() {
            profile = Some(TranscriptProfile::from_tag(&arg)?);
        } else {
            return Err(format!("Unexpected argument `{arg}`"));
        }
    }

    let profile = profile.unwrap_or(TranscriptProfile::EatMeat);
    let tick_budget = tick_budget.unwrap_or_else(|| profile.default_budget());
    Ok(Options {
        profile,
        tick_budget,
    })
}

fn parse_budget(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("Invalid tick budget `{value}`"))
}
