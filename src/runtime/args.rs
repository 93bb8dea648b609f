use crate::link::decode_duration;

pub const USAGE: &str = "\
usage: tracklink <command>

commands:
  encode ARTIST TITLE [START [END]]   print a link (times as seconds or 1m15s)
  decode LINK                         print the fields of a link
  play LINK                           find the file and play it, stopping at the end time
  capture                             print a link to what the player is on now
  config                              print the effective settings";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Encode {
        artist: String,
        title: String,
        start: Option<u64>,
        end: Option<u64>,
    },
    Decode(String),
    Play(String),
    Capture,
    Config,
    Help,
}

/// A time argument: plain seconds or a duration token.
fn parse_time(arg: &str) -> Result<u64, String> {
    if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) {
        return arg.parse().map_err(|e| format!("{arg:?}: {e}"));
    }
    decode_duration(arg).map_err(|e| e.to_string())
}

pub fn parse(args: &[String]) -> Result<Command, String> {
    let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
    match rest.as_slice() {
        [] | ["help" | "-h" | "--help"] => Ok(Command::Help),
        ["encode", artist, title, times @ ..] if times.len() <= 2 => Ok(Command::Encode {
            artist: artist.to_string(),
            title: title.to_string(),
            start: times.first().map(|t| parse_time(t)).transpose()?,
            end: times.get(1).map(|t| parse_time(t)).transpose()?,
        }),
        ["decode", link] => Ok(Command::Decode(link.to_string())),
        ["play", link] => Ok(Command::Play(link.to_string())),
        ["capture"] => Ok(Command::Capture),
        ["config"] => Ok(Command::Config),
        _ => Err(format!("unrecognized arguments: {}\n\n{USAGE}", rest.join(" "))),
    }
}
