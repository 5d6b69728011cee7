//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use wayfarer_cli::CliError;

fn main() {
    wayfarer_cli::init_tracing();
    match wayfarer_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    }
}

#[expect(clippy::print_stderr, reason = "the binary reports failures on stderr")]
fn report(err: &CliError) {
    eprintln!("wayfarer: {err}");
}
