use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_types::{Address, BookId, LikeAmount, ReviewId};

#[derive(Parser)]
#[command(name = "folio", about = "Folio: on-chain book reviews", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file; defaults plus FOLIO_* variables when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if matches!(self.command, Command::ServeGateway(_)) {
            "info"
        } else {
            "warn"
        }
    }
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the newest books
    Books,
    /// Show one book with its like total
    Book(BookArgs),
    /// List the newest reviews
    Reviews,
    /// Show an account's like balance
    Balance(BalanceArgs),
    /// Mint likes to an account
    MintLikes(MintLikesArgs),
    /// Publish a book
    AddBook(AddBookArgs),
    /// Publish a review of a book
    AddReview(AddReviewArgs),
    /// Like reviews and distribute the likes in one batch
    Like(LikeArgs),
    /// Serve the content gateway
    ServeGateway(ServeGatewayArgs),
}

#[derive(Args)]
pub struct BookArgs {
    pub id: BookId,
}

#[derive(Args)]
pub struct BalanceArgs {
    pub address: Address,
}

#[derive(Args)]
pub struct MintLikesArgs {
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub amount: LikeAmount,
}

#[derive(Args)]
pub struct AddBookArgs {
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub author: Option<String>,
    /// Cover image file
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddReviewArgs {
    #[arg(long)]
    pub from: Address,
    #[arg(long)]
    pub book: BookId,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
}

#[derive(Args)]
pub struct LikeArgs {
    #[arg(long)]
    pub from: Address,
    /// Review to like; repeat an id to like it more than once
    #[arg(long = "review", required = true, num_args = 1..)]
    pub reviews: Vec<ReviewId>,
}

#[derive(Args)]
pub struct ServeGatewayArgs {
    /// Overrides `bind_addr` from the gateway config
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Keep content in memory instead of proxying to the pinning service
    #[arg(long)]
    pub memory: bool,
    /// Gateway config file (TOML), including the mini-app manifest
    #[arg(long)]
    pub gateway_config: Option<PathBuf>,
}
