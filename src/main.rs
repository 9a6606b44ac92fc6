mod app;
mod audio;
mod config;
mod engine;
mod playlist;
mod runtime;
mod sequencer;
mod session;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
