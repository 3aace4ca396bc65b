//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    env_logger::init();
    if let Err(err) = sitecover_cli::run() {
        eprintln!("sitecover: {err}");
        std::process::exit(1);
    }
}
