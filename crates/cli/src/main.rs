use std::process::ExitCode;

fn main() -> ExitCode {
    vamela_cli::run()
}
