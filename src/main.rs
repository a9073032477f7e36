use linkpack::cli::commands::{CliArgs, Commands};
use linkpack::cli::handlers::{handle_config, handle_deps, handle_link};
use linkpack::util::logging;
use linkpack::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("linkpack v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Link(link_args) => handle_link(link_args, args.quiet, args.verbose).await,
        Commands::Deps(deps_args) => handle_deps(deps_args, args.quiet, args.verbose).await,
        Commands::Config(config_args) => handle_config(config_args, args.verbose),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = logging::config_from_env();
    if let Some(level_str) = &args.log_level {
        config.level = logging::parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    logging::init_logging(config);
}
