//! Sushi Neko headless demo
//!
//! Plays scripted sessions with the autopilot and prints every engine command as
//! a JSON line on stdout. Logging goes to stderr (`RUST_LOG=info`).
//!
//! Usage: `sushi-neko [seed] [ticks-between-taps]`

use std::error::Error;
use std::io::{self, Write};

use sushi_neko::Session;
use sushi_neko::consts::SIM_DT;
use sushi_neko::sim::{GamePhase, autopilot};

/// Give up on a run that is still alive after this many ticks (two minutes)
const MAX_DEMO_TICKS: u32 = 120 * 60;
/// Default cadence; slower than one tap per 10 ticks so health eventually runs out
const DEFAULT_TAP_EVERY: u32 = 12;
/// Games played before exiting
const DEMO_RUNS: u32 = 2;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => seed_from_clock(),
    };
    let tap_every = match args.next() {
        Some(arg) => arg.parse::<u32>()?.max(1),
        None => DEFAULT_TAP_EVERY,
    };
    log::info!("Sushi Neko demo (seed {}, tap every {} ticks)", seed, tap_every);

    let mut session = Session::standard(seed)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(&mut session, &mut out)?;

    for run in 0..DEMO_RUNS {
        if run > 0 {
            // Button is bound to restart after a game over
            session.press_play_button();
            emit(&mut session, &mut out)?;
        }
        session.press_play_button();
        play_run(&mut session, tap_every, &mut out)?;

        let game = session.game();
        log::info!(
            "Run {} finished in {:?}: score {}, {} ticks",
            run + 1,
            game.phase,
            game.score,
            game.time_ticks
        );
    }

    out.flush()?;
    Ok(())
}

/// Tap with the autopilot until the game ends or the tick budget runs out
fn play_run(session: &mut Session, tap_every: u32, out: &mut impl Write) -> io::Result<()> {
    for frame in 0..MAX_DEMO_TICKS {
        if session.game().phase == GamePhase::GameOver {
            return Ok(());
        }
        if frame % tap_every == 0 {
            let tap = autopilot::choose_touch(session.game());
            session.touch(&[tap]);
        }
        session.update(SIM_DT);
        emit(session, out)?;
    }

    log::warn!("Still alive after {} ticks, stopping run", MAX_DEMO_TICKS);
    Ok(())
}

fn emit(session: &mut Session, out: &mut impl Write) -> io::Result<()> {
    for command in session.drain_commands() {
        serde_json::to_writer(&mut *out, &command)?;
        writeln!(out)?;
    }
    Ok(())
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
