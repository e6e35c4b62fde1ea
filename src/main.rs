use anyhow::Result;
use clap::{Parser, Subcommand};
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::PagerWriter;
use gitlet::artifacts::core::error::RepositoryError;
use gitlet::artifacts::core::logging::init_logging;
use gitlet::artifacts::core::settings::Settings;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "Gitlet keeps snapshots of a working directory in a content-addressed \
    object store under .gitlet, with branches, checkout, reset and three-way merge.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates .gitlet in the current directory or at the specified path, \
        with an initial commit on the master branch."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage the current content of files")]
    Add {
        #[arg(required = true, help = "The files to stage")]
        paths: Vec<String>,
    },
    #[command(name = "commit", about = "Create a new commit from the staging area")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file and, when tracked, remove it from the working tree"
    )]
    Rm {
        #[arg(index = 1)]
        path: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and working tree state")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch, checkout -- <file> restores a file \
        from HEAD and checkout <commit> -- <file> restores a file from any commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch to a commit and check it out"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        let _ = std::io::stdout().flush();
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from_env()?;
    init_logging(&settings)?;

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let pwd = std::env::current_dir()?;

    match &cli.command {
        Commands::Init { path } => {
            let path = path.as_ref().map(PathBuf::from).unwrap_or(pwd);
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()), settings)?;
            repository.init().await?;
        }
        Commands::Add { paths } => {
            let mut repository = open(&pwd, settings)?;
            repository.add(paths).await?;
        }
        Commands::Commit { message } => {
            let mut repository = open(&pwd, settings)?;
            repository.commit(message).await?;
        }
        Commands::Rm { path } => {
            let mut repository = open(&pwd, settings)?;
            repository.rm(path).await?;
        }
        Commands::Log => {
            page_history(&pwd, settings, |repository| repository.log())?;
        }
        Commands::GlobalLog => {
            page_history(&pwd, settings, |repository| repository.global_log())?;
        }
        Commands::Find { message } => {
            let repository = open(&pwd, settings)?;
            repository.find(message)?;
        }
        Commands::Status => {
            let repository = open(&pwd, settings)?;
            repository.status().await?;
        }
        Commands::Checkout { target, file } => {
            let mut repository = open(&pwd, settings)?;

            match (target, file) {
                (Some(branch), None) => repository.checkout_branch(branch).await?,
                (None, Some(file)) => repository.checkout_file(file).await?,
                (Some(commit), Some(file)) => {
                    repository.checkout_file_from_commit(commit, file).await?
                }
                (None, None) => {
                    return Err(RepositoryError::InvalidArguments(
                        "checkout needs a branch, -- <file> or <commit> -- <file>".to_string(),
                    )
                    .into());
                }
            }
        }
        Commands::Branch { name } => {
            let mut repository = open(&pwd, settings)?;
            repository.branch(name).await?;
        }
        Commands::RmBranch { name } => {
            let mut repository = open(&pwd, settings)?;
            repository.rm_branch(name).await?;
        }
        Commands::Reset { commit } => {
            let mut repository = open(&pwd, settings)?;
            repository.reset(commit).await?;
        }
        Commands::Merge { branch } => {
            let mut repository = open(&pwd, settings)?;
            let outcome = repository.merge(branch).await?;
            tracing::debug!(?outcome, "merge finished");
        }
    }

    Ok(())
}

fn open(pwd: &Path, settings: Settings) -> Result<Repository> {
    Repository::open(pwd, Box::new(std::io::stdout()), settings)
}

/// Run a history command through the pager when stdout is interactive
fn page_history(
    pwd: &Path,
    settings: Settings,
    command: impl FnOnce(&Repository) -> Result<()>,
) -> Result<()> {
    if !settings.use_pager || !std::io::stdout().is_terminal() {
        let repository = open(pwd, settings)?;
        return command(&repository);
    }

    let pager = Pager::new();
    let writer = PagerWriter::new(pager.clone());
    let repository = Repository::open(pwd, Box::new(writer), settings)?;

    command(&repository)?;
    minus::page_all(pager)?;

    Ok(())
}
