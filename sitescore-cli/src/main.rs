//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(err) = sitescore_cli::run() {
        eprintln!("sitescore: {err}");
        std::process::exit(1);
    }
}
