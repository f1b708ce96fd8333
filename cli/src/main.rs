//! The main entrypoint for ctrctl, which just performs global initialization
//! and then calls out into the library.
use anyhow::Result;

fn run() -> Result<()> {
    ctrctl_utils::initialize_tracing();
    tracing::trace!("starting");
    ctrctl_lib::cli::run_from_iter(std::env::args())
}

fn main() {
    if let Err(e) = run() {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
