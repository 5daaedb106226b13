mod app;
mod audio;
mod config;
mod generate;
mod library;
mod model;
mod runtime;
mod store;
mod translate;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
