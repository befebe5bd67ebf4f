use clap::Parser;
use schoolscout::cli::{AppContext, Cli, Commands};
use schoolscout::core::normalize::{DataError, exit_code_for};

fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    let result = match cli.command {
        Commands::Filter(args) => schoolscout::cli_ext::filter_cmd::run(args, &ctx),
        Commands::Show(args) => schoolscout::cli_ext::show_cmd::run(args, &ctx),
        Commands::Values(args) => schoolscout::cli_ext::values_cmd::run(args, &ctx),
        Commands::Init(args) => schoolscout::infra::config::init(args, &ctx),
        Commands::Completions(args) => schoolscout::completion::run(args),
    };

    if let Err(err) = result {
        // Fatal data errors carry dedicated exit codes and diagnostics;
        // everything else is a generic failure.
        let code = err.downcast_ref::<DataError>().map(exit_code_for).unwrap_or(1);
        match err.downcast::<DataError>() {
            Ok(data) => eprintln!("{:?}", miette::Report::new(data)),
            Err(other) => eprintln!("Error: {other:#}"),
        }
        std::process::exit(code);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SCHOOLSCOUT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
