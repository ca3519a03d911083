use minishell::config::Args;
use minishell::{Config, ExecutionStatus, Interpreter, ShellError, logging};

fn main() {
    let args: Args = argh::from_env();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("minishell: {err:#}");
    }

    let mut shell = Interpreter::new(Config::from(&args));

    let code = match &args.command {
        Some(line) => match shell.run_line(line) {
            Ok(status) => status.map_or(0, ExecutionStatus::exit_code),
            Err(err @ ShellError::Parse(_)) => {
                eprintln!("{err}");
                2
            }
            Err(err) => {
                eprintln!("minishell: {err}");
                1
            }
        },
        None => match shell.repl() {
            Ok(code) => code,
            Err(err) => {
                eprintln!("minishell: {err:#}");
                1
            }
        },
    };

    std::process::exit(code);
}
