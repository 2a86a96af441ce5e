use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use folio_content::{GatewayContentStore, InMemoryContentStore};
use folio_gateway::{FolioGateway, GatewayConfig};
use folio_sdk::{BookDraft, ContentStore, Folio, FolioConfig, ReviewMetadata, SubmissionState};
use serde::Serialize;

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = FolioConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    let out = Output { format: cli.format };

    match cli.command {
        Command::ServeGateway(args) => cmd_serve_gateway(&config, args).await,
        command => {
            let folio = Folio::connect(config)?;
            tracing::debug!(?folio, "client ready");
            run_client(&folio, &out, command).await
        }
    }
}

async fn run_client(folio: &Folio, out: &Output, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Books => cmd_books(folio, out).await,
        Command::Book(args) => cmd_book(folio, out, args).await,
        Command::Reviews => cmd_reviews(folio, out).await,
        Command::Balance(args) => {
            let balance = folio.like_balance(args.address).await?;
            out.emit(&balance, || {
                println!("{} holds {} likes", args.address, balance.to_string().bold())
            })
        }
        Command::MintLikes(args) => {
            let balance = folio.mint_likes(args.from, args.amount).await?;
            out.emit(&serde_json::json!({ "minted": args.amount, "balance": balance }), || {
                println!("{} Minted {} likes", "✓".green().bold(), args.amount);
                println!("  Balance: {}", balance.to_string().bold());
            })
        }
        Command::AddBook(args) => cmd_add_book(folio, out, args).await,
        Command::AddReview(args) => cmd_add_review(folio, out, args).await,
        Command::Like(args) => cmd_like(folio, out, args).await,
        Command::ServeGateway(_) => bail!("serve-gateway does not take a ledger client"),
    }
}

struct Output {
    format: OutputFormat,
}

impl Output {
    /// JSON goes to stdout as one pretty document; text is left to `text`.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => text(),
        }
        Ok(())
    }
}

async fn cmd_books(folio: &Folio, out: &Output) -> anyhow::Result<()> {
    let books = folio.book_shelf().await?;
    out.emit(&books, || {
        if books.is_empty() {
            println!("No books yet.");
        }
        for book in &books {
            println!("{}", render::book_line(book));
        }
    })
}

async fn cmd_book(folio: &Folio, out: &Output, args: BookArgs) -> anyhow::Result<()> {
    let Some(detail) = folio.book_detail(args.id).await? else {
        bail!("book #{} not found", args.id);
    };
    out.emit(&detail, || println!("{}", render::book_detail(&detail)))
}

async fn cmd_reviews(folio: &Folio, out: &Output) -> anyhow::Result<()> {
    let reviews = folio.review_feed().await?;
    out.emit(&reviews, || {
        if reviews.is_empty() {
            println!("No reviews yet.");
        }
        for review in &reviews {
            println!("{}\n", render::review_block(review));
        }
    })
}

async fn cmd_add_book(folio: &Folio, out: &Output, args: AddBookArgs) -> anyhow::Result<()> {
    let mut draft = BookDraft::new(args.name, args.description);
    if let Some(author) = args.author {
        draft = draft.with_author(author);
    }
    if let Some(path) = &args.image {
        let image = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading cover image {}", path.display()))?;
        draft = draft.with_image(image);
    }

    let published = folio.publish_book(args.from, draft).await?;
    out.emit(&published, || {
        match published.book_id() {
            Some(id) => println!("{} Published book {}", "✓".green().bold(), format!("#{id}").yellow()),
            None => println!("{} Book submitted", "✓".green().bold()),
        }
        println!("  Metadata: {}", published.metadata_uri.blue());
        println!("  Tx: {}", published.receipt.tx_hash.dimmed());
    })
}

async fn cmd_add_review(folio: &Folio, out: &Output, args: AddReviewArgs) -> anyhow::Result<()> {
    let review = ReviewMetadata::new(&args.name, &args.description);
    let published = folio.publish_review(args.from, args.book, review).await?;
    out.emit(&published, || {
        match published.review_id() {
            Some(id) => println!(
                "{} Published review {} of book {}",
                "✓".green().bold(),
                format!("#{id}").yellow(),
                format!("#{}", args.book).yellow()
            ),
            None => println!("{} Review submitted", "✓".green().bold()),
        }
        println!("  Metadata: {}", published.metadata_uri.blue());
        println!("  Tx: {}", published.receipt.tx_hash.dimmed());
    })
}

async fn cmd_like(folio: &Folio, out: &Output, args: LikeArgs) -> anyhow::Result<()> {
    let mut session = folio.like_session().await?;
    for review_id in &args.reviews {
        session
            .like_review(*review_id)
            .with_context(|| format!("review #{review_id} is not in the current feed"))?;
    }
    tracing::debug!(staged = session.accumulator().len(), "submitting likes");

    let summary = match folio.submit_likes(&mut session, args.from).await {
        Ok(summary) => summary,
        Err(e) => {
            if let SubmissionState::Unconfirmed(tx_hash) = session.state() {
                let tx_hash = tx_hash.clone();
                return Err(e).with_context(|| {
                    format!("batch {tx_hash} may still land; check it before liking again")
                });
            }
            return Err(e.into());
        }
    };
    out.emit(&summary, || println!("{}", render::distribution(&summary)))
}

async fn cmd_serve_gateway(config: &FolioConfig, args: ServeGatewayArgs) -> anyhow::Result<()> {
    let store: Arc<dyn ContentStore> = if args.memory {
        Arc::new(InMemoryContentStore::new())
    } else {
        let mut store = GatewayContentStore::new(&config.gateway_url, &config.upload_url);
        if let Some(jwt) = &config.upload_jwt {
            store = store.with_jwt(jwt);
        }
        Arc::new(store)
    };

    let mut gateway_config = match &args.gateway_config {
        Some(path) => GatewayConfig::load(path)
            .with_context(|| format!("loading gateway config {}", path.display()))?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        gateway_config.bind_addr = bind;
    }
    println!("Folio gateway on {}", gateway_config.bind_addr.to_string().bold());
    FolioGateway::new(gateway_config, store).serve().await?;
    Ok(())
}
