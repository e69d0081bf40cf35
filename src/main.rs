mod catalog;
mod config;
mod device;
mod mpris;
mod player;
mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
