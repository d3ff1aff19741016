mod app;
mod audio;
mod config;
mod filter;
mod input;
mod library;
mod mpris;
mod playback;
mod runtime;
mod storage;
mod ui;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
