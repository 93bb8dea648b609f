use std::env;

use async_io::block_on;

use crate::config::Settings;
use crate::control;
use crate::library;
use crate::link::{TrackReference, decode_link, encode_duration, encode_link};
use crate::playback::{self, SessionOutcome};

mod args;
mod settings;

use args::Command;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let command = args::parse(&args)?;

    let (settings, problem) = settings::load_settings();
    settings::init_tracing(&settings.log.level);
    if let Some(msg) = problem {
        tracing::warn!("{msg}");
    }

    match command {
        Command::Help => println!("{}", args::USAGE),
        Command::Encode {
            artist,
            title,
            start,
            end,
        } => println!("{}", encode_link(&artist, &title, start, end)),
        Command::Decode(link) => print!("{}", describe(&decode_link(&link)?)),
        Command::Play(link) => {
            let outcome = play(&settings, &link)?;
            println!("{outcome:?}");
        }
        Command::Capture => println!("{}", capture(&settings)?),
        Command::Config => print!("{}", settings.to_toml()?),
    }
    Ok(())
}

fn describe(r: &TrackReference) -> String {
    let time = |t: Option<u64>| t.map(encode_duration).unwrap_or_else(|| "-".to_string());
    format!(
        "artist: {}\ntitle: {}\nstart: {}\nend: {}\n",
        r.artist,
        r.title,
        time(r.start),
        time(r.end)
    )
}

/// Decode, resolve, then hand the file to a playback session.
fn play(settings: &Settings, link: &str) -> Result<SessionOutcome, Box<dyn std::error::Error>> {
    let reference = decode_link(link)?;
    let finder = library::finder(&settings.search)?;
    let path = library::resolve(&finder, &reference.artist, &reference.title)?;
    tracing::info!(path = %path.display(), "resolved");

    let port = block_on(control::connect(&settings.player))?;
    let session = playback::spawn(
        port,
        settings.watchdog.clone(),
        &path,
        reference.start,
        reference.end,
    )?;
    let outcome = session
        .join()
        .map_err(|_| "playback session panicked".to_string())??;
    Ok(outcome)
}

/// Link to the current track, starting at the current position.
fn capture(settings: &Settings) -> Result<String, Box<dyn std::error::Error>> {
    let snapshot = block_on(async {
        let port = control::connect(&settings.player).await?;
        port.snapshot().await
    })?;
    tracing::debug!(track = %snapshot.identity.id, position = snapshot.position, "captured");
    let start = snapshot.position.max(0.0).floor() as u64;
    Ok(TrackReference::new(snapshot.artist, snapshot.title)
        .with_range(Some(start), None)
        .encode())
}
