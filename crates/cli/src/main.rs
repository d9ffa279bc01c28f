use std::process::ExitCode;

fn main() -> ExitCode {
    vquotes_cli::run()
}
