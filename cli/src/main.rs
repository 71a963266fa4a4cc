use crate::cli::run_cli;
use um_env_logic::version::get_version;

pub mod cli;

fn main() {
    match run_cli() {
        Ok(()) => {}
        Err(e) => {
            eprintln!("ERROR running um-env-to-yaml ({}):\n{}\n", get_version(), e);
            std::process::exit(1);
        }
    }
}
