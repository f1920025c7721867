//! Play a Standard MIDI File on the first available output port.
//!
//! Exit codes: 0 success, 1 I/O failure, 2 malformed file, 3 device failure,
//! 4 usage or internal misuse.

use smfplay::midir::MidirSink;
use smfplay::prelude::*;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: smfplay <file.mid>");
        return ExitCode::from(4);
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smfplay: {err}");
            ExitCode::from(match err {
                Error::Io(_) => 1,
                Error::Read(_) => 2,
                Error::Output(_) => 3,
                Error::State(_) => 4,
            })
        }
    }
}

fn run(path: &str) -> Result<(), Error> {
    let file = MidiFile::open(path)?;
    tracing::info!(
        path,
        format = ?file.header().format(),
        tracks = file.tracks().len(),
        "parsed"
    );

    let timeline = file.into_timeline();
    let mut sink = MidirSink::open("smfplay")?;
    sink.reset()?;

    let mut sink = Scheduler::new(timeline, sink).play()?;
    sink.reset()?;
    sink.close();
    Ok(())
}
