use addins::GlobalOptions;
use addins::commands::{run_candidates, run_list, run_points};
use clap::{Parser, Subcommand};
use starbase::{App, AppResult, AppSession};
use tracing_subscriber::EnvFilter;

/// Addins CLI - inspect extension points and the extensions installed under them
#[derive(Parser)]
#[command(name = "addins")]
#[command(about = "Discover and inspect extensions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// List declared extension points
    Points,
    /// List installed extensions
    List {
        /// Only extensions of the extension point with this path
        #[arg(short, long)]
        path: Option<String>,
        /// Include disabled extensions
        #[arg(short, long)]
        all: bool,
    },
    /// List candidate modules found during discovery
    Candidates,
}

/// Application session for the addins CLI
#[derive(Clone)]
struct AddinsSession {
    options: GlobalOptions,
    command: Commands,
}

#[async_trait::async_trait]
impl AppSession for AddinsSession {
    async fn execute(&mut self) -> AppResult {
        match &self.command {
            Commands::Points => run_points(&self.options),
            Commands::List { path, all } => run_list(&self.options, path.clone(), *all),
            Commands::Candidates => run_candidates(&self.options),
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    let session = AddinsSession {
        options: cli.options,
        command: cli.command,
    };

    let exit_code = App::default()
        .run(
            session,
            |mut session| async move { session.execute().await },
        )
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
