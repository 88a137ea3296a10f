use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use devus::areas::repository::Repository;
use devus::error::OpError;

#[derive(Parser)]
#[command(
    name = "gitus",
    version = "0.1.0",
    about = "A miniature source-control engine",
    disable_help_flag = true,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Built-in help generation is disabled: each subcommand answers `--help`
// itself with the exact usage line.
#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", disable_help_flag = true)]
    Init {
        #[arg(long)]
        help: bool,
    },
    #[command(name = "add", disable_help_flag = true)]
    Add {
        #[arg(long)]
        help: bool,
        #[arg(index = 1)]
        pathspec: Option<String>,
    },
    #[command(name = "commit", disable_help_flag = true)]
    Commit {
        #[arg(long)]
        help: bool,
        #[arg(index = 1)]
        message: Option<String>,
        #[arg(index = 2)]
        author: Option<String>,
    },
    #[command(name = "checkout", disable_help_flag = true)]
    Checkout {
        #[arg(long)]
        help: bool,
        #[arg(index = 1)]
        commit_id: Option<String>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let pwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { help } => {
            if help {
                println!("usage: gitus init");
                return Ok(());
            }

            let mut repository = Repository::new(pwd, Box::new(std::io::stdout()))?;
            repository.init()
        }
        Commands::Add { help, pathspec } => {
            if help {
                println!("usage: gitus add <pathspec>");
                return Ok(());
            }
            let pathspec = pathspec
                .ok_or_else(|| OpError::BadArgs("usage: gitus add <pathspec>".to_string()))?;

            let mut repository = Repository::new(pwd, Box::new(std::io::stdout()))?;
            repository.add(&pathspec)
        }
        Commands::Commit {
            help,
            message,
            author,
        } => {
            if help {
                println!("usage: gitus commit <msg> <author>");
                return Ok(());
            }
            let (message, author) = match (message, author) {
                (Some(message), Some(author)) => (message, author),
                _ => {
                    return Err(
                        OpError::BadArgs("usage: gitus commit <msg> <author>".to_string()).into(),
                    );
                }
            };

            let mut repository = Repository::new(pwd, Box::new(std::io::stdout()))?;
            repository.commit(&message, &author)
        }
        Commands::Checkout { help, commit_id } => {
            if help {
                println!("usage: gitus checkout <commitID>");
                return Ok(());
            }
            let commit_id = commit_id
                .ok_or_else(|| OpError::BadArgs("usage: gitus checkout <commitID>".to_string()))?;

            let mut repository = Repository::new(pwd, Box::new(std::io::stdout()))?;
            repository.checkout(&commit_id)
        }
    }
}
