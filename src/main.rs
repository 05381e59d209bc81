use std::process::ExitCode;

fn main() -> ExitCode {
    lomo::cli::run_from(std::env::args_os())
}
