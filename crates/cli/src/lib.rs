//! Command-line front end for `rqgen`.

use clap::{CommandFactory, Parser, Subcommand};

pub mod config;
pub mod fs;
pub mod generate;
pub mod logging;
pub mod query_key;

#[derive(Parser, Debug)]
#[command(
    name = "rqgen",
    version,
    about = "Generate typed react-query query functions from an OpenAPI document"
)]
struct Cli {
    /// Log at debug level regardless of RQGEN_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the TypeScript files for a document
    Generate(generate::GenerateArgs),
    /// Print the query key for a path template and a variables object
    QueryKey(query_key::QueryKeyArgs),
}

/// Build a tokio runtime and run the CLI, returning the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_cli_async(args))
}

pub async fn run_cli_async(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            logging::init_tracing(cli.verbose);
            match cli.command {
                Some(Commands::Generate(args)) => generate::run(args).await,
                Some(Commands::QueryKey(args)) => query_key::run(args),
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}
