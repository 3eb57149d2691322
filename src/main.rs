use clap::Parser;
use tracing_subscriber::EnvFilter;
use walletvault::cli::commands::add::AddOptions;
use walletvault::cli::{output, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Create {
            ref derivation_path,
            ref chain,
        } => walletvault::cli::commands::create::execute(&cli, derivation_path, chain.as_deref()),
        Commands::Add {
            ref id,
            ref private_key,
            ref mnemonic,
            ref derivation_path,
            ref chain,
            ref fields,
            force,
        } => {
            let opts = AddOptions {
                private_key: private_key.as_deref(),
                mnemonic: mnemonic.as_deref(),
                derivation_path: derivation_path.as_deref(),
                chain: chain.as_deref(),
                fields,
                force,
            };
            walletvault::cli::commands::add::execute(&cli, id.as_deref(), &opts)
        }
        Commands::List => walletvault::cli::commands::list::execute(&cli),
        Commands::Show { ref id, reveal } => {
            walletvault::cli::commands::show::execute(&cli, id, reveal)
        }
        Commands::Delete { ref id, force } => {
            walletvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Export { ref id, ref output } => {
            walletvault::cli::commands::export::execute(&cli, id, output.as_deref())
        }
        Commands::Backup { ref output } => {
            walletvault::cli::commands::backup::execute(&cli, output.as_deref())
        }
        Commands::Restore { ref file } => walletvault::cli::commands::restore::execute(&cli, file),
        Commands::Balance { ref id } => walletvault::cli::commands::balance::execute(&cli, id),
        Commands::Shell => walletvault::cli::commands::shell::execute(&cli),
        Commands::Audit { last, ref since } => {
            walletvault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { shell } => walletvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        if e.is_unlock_failure() {
            output::error("Incorrect password or corrupted vault file");
            output::tip("The vault file was left unchanged.");
        } else {
            output::error(&e.to_string());
        }
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr; `WALLETVAULT_LOG` overrides the level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("WALLETVAULT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
