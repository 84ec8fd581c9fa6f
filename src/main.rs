use anyhow::{Context, Result};
use clap::Parser;
use lc_grasp::{
    config::{GraspConfigBuilder, DEFAULT_BASE_URL, DEFAULT_LOGIN_ATTEMPTS, DEFAULT_LOGIN_INTERVAL},
    grasp::{Grasper, LogProgress},
    session::{Credentials, Session},
    transport::HttpTransport,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Saves your accepted LeetCode CN solutions, with their problem statements.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Book to grasp: all, algorithms, database, shell, concurrency, lcci, lcof
    #[arg(short, long, default_value = "all")]
    book: String,
    /// Query every field the site offers and log at debug level
    #[arg(short, long)]
    debug: bool,
    /// Overwrite problems that were grasped before
    #[arg(short, long)]
    force: bool,
    #[arg(long, default_value = "problems")]
    save_root: PathBuf,
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, default_value_t = DEFAULT_LOGIN_ATTEMPTS)]
    login_attempts: u32,
    #[arg(long, env = "LEETCODE_USERNAME")]
    username: Option<String>,
    #[arg(long, env = "LEETCODE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let credentials = Credentials {
        login: value_or_prompt(args.username, "Please input your username: ")?,
        password: value_or_prompt(args.password, "Please input your password: ")?,
    };

    let mut session = Session::new(HttpTransport::new()?, args.base_url);
    if !session
        .login(&credentials, args.login_attempts, DEFAULT_LOGIN_INTERVAL)
        .await
    {
        anyhow::bail!("could not sign in");
    }

    let config = GraspConfigBuilder::default()
        .save_root(args.save_root)
        .force(args.force)
        .verbose(args.debug)
        .build()?;
    let reports = match Grasper::new(&session, config, LogProgress)
        .grasp_book(&args.book)
        .await
    {
        Ok(reports) => reports,
        Err(e) if e.is_precondition() => vec![],
        Err(e) => return Err(e.into()),
    };

    for report in reports {
        if let Some(book) = report.book {
            info!(
                "BOOK [{book}]: {} listed, {} grasped, {} already saved, {} failed",
                report.listed, report.grasped, report.resumed, report.failed
            );
        }
    }
    session.logout();
    info!("program finished");
    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "lc_grasp=debug" } else { "lc_grasp=info" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}
