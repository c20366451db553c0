#[cfg(not(target_os = "linux"))]
compile_error!("pidbox only runs on Linux");

mod cli;
mod core;
mod platform;
mod util;

use std::{env, process};

fn main() {
    util::logging::init();
    let code = cli::commands::dispatch(env::args_os());
    process::exit(code);
}
