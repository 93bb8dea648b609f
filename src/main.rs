mod config;
mod control;
mod error;
mod library;
mod link;
mod playback;
mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
