use std::process::ExitCode;

fn main() -> ExitCode {
    roomscout_cli::run()
}
