//! Text rendering for command output.

use colored::Colorize;
use folio_sdk::{
    BookDetail, BookMetadata, DistributionSummary, Resolved, ResolvedBook, ResolvedReview,
};

fn unavailable(error: &str) -> String {
    format!("(metadata unavailable: {error})").red().to_string()
}

fn book_title(metadata: &Resolved<BookMetadata>) -> String {
    match metadata {
        Resolved::Ready(book) => match &book.author {
            Some(author) => format!("{} by {}", book.name.bold(), author),
            None => book.name.bold().to_string(),
        },
        Resolved::Failed(e) => unavailable(e),
        Resolved::Absent => "(no metadata)".dimmed().to_string(),
    }
}

pub fn book_line(book: &ResolvedBook) -> String {
    let line = format!(
        "{}  {}",
        format!("#{}", book.row.book_id).yellow(),
        book_title(&book.metadata)
    );
    match &book.metadata {
        Resolved::Ready(metadata) => format!("{line}\n  {}", metadata.excerpt().dimmed()),
        _ => line,
    }
}

pub fn review_block(item: &ResolvedReview) -> String {
    let header = format!(
        "{} on {} by {}  {} {}",
        format!("review #{}", item.row.review_id).yellow().bold(),
        book_title(&item.book),
        item.row.owner.abbreviate().cyan(),
        "♥".red(),
        item.total_likes(),
    );
    let body = match &item.review {
        Resolved::Ready(review) => format!("  {}\n  {}", review.name.bold(), review.excerpt()),
        Resolved::Failed(e) => format!("  {}", unavailable(e)),
        Resolved::Absent => format!("  {}", "(no metadata)".dimmed()),
    };
    format!("{header}\n{body}")
}

pub fn book_detail(detail: &BookDetail) -> String {
    let mut out = format!(
        "{}  {}\n",
        format!("#{}", detail.book_id).yellow().bold(),
        book_title(&detail.metadata)
    );
    if let Resolved::Ready(book) = &detail.metadata {
        out.push_str(&format!("  {}\n", book.description));
        if let Some(image) = &book.image {
            out.push_str(&format!("  Cover: {}\n", image.blue()));
        }
    }
    out.push_str(&format!("  Metadata: {}\n", detail.book_uri.dimmed()));
    out.push_str(&format!("  Likes: {}", detail.total_likes.to_string().bold()));
    out
}

pub fn distribution(summary: &DistributionSummary) -> String {
    let mut out = format!(
        "{} Distributed {} likes across {} reviews\n  Tx: {}",
        "✓".green().bold(),
        summary.total_amount().to_string().bold(),
        summary.len(),
        summary.tx_hash.dimmed(),
    );
    for line in &summary.lines {
        let owner = |o: Option<folio_sdk::Address>| {
            o.map(|a| a.abbreviate())
                .unwrap_or_else(|| "unknown".into())
        };
        out.push_str(&format!(
            "\n  review #{} (book #{}): {} -> {} to reviewer {}, {} to author {}",
            line.review_id,
            line.book_id,
            line.amount,
            line.review_owner_share,
            owner(line.review_owner).cyan(),
            line.book_owner_share,
            owner(line.book_owner).cyan(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_sdk::{Address, BookId, LikeAmount, ReviewMetadata};
    use serde_json::json;

    fn detail(metadata: Resolved<BookMetadata>) -> BookDetail {
        BookDetail {
            book_id: BookId::from(3),
            book_uri: "ipfs://bafkbook".into(),
            metadata,
            total_likes: LikeAmount::from(12),
        }
    }

    #[test]
    fn detail_shows_metadata_and_likes() {
        let book = BookMetadata::new("Dune", "Spice").with_author("Herbert");
        let text = book_detail(&detail(Resolved::Ready(book)));
        assert!(text.contains("Dune"));
        assert!(text.contains("Herbert"));
        assert!(text.contains("Spice"));
        assert!(text.contains("12"));
    }

    #[test]
    fn detail_survives_failed_metadata() {
        let text = book_detail(&detail(Resolved::Failed("content not found".into())));
        assert!(text.contains("metadata unavailable: content not found"));
        assert!(text.contains("ipfs://bafkbook"));
    }

    #[test]
    fn review_cards_show_an_excerpt() {
        let item = ResolvedReview {
            row: serde_json::from_value(json!({
                "id": "review-1",
                "owner": Address::from_bytes([2; 20]),
                "reviewId": "1",
                "reviewURI": "ipfs://bafkreview",
                "book": {
                    "owner": Address::from_bytes([1; 20]),
                    "bookId": "1",
                    "bookURI": "https://example.com/book.json",
                },
                "likes": [],
            }))
            .unwrap(),
            review: Resolved::Ready(ReviewMetadata::new("Long", &"x".repeat(500))),
            book: Resolved::Absent,
        };
        let text = review_block(&item);
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(!text.contains(&"x".repeat(201)));
        assert!(text.contains("(no metadata)"));
    }

    #[test]
    fn book_lines_show_an_excerpt() {
        let book = ResolvedBook {
            row: serde_json::from_value(json!({
                "id": "book-3",
                "bookId": "3",
                "bookURI": "ipfs://bafkbook",
            }))
            .unwrap(),
            metadata: Resolved::Ready(BookMetadata::new("Dune", "y".repeat(300))),
        };
        let text = book_line(&book);
        assert!(text.contains("#3"));
        assert!(text.contains(&format!("{}...", "y".repeat(120))));
        assert!(!text.contains(&"y".repeat(121)));
    }

    #[test]
    fn distribution_lists_shares() {
        let summary: DistributionSummary = serde_json::from_value(json!({
            "tx_hash": "0xabc",
            "lines": [{
                "book_id": "1",
                "review_id": "10",
                "amount": "5",
                "review_owner": Address::from_bytes([2; 20]),
                "book_owner": null,
                "review_owner_share": "2",
                "book_owner_share": "2",
            }],
        }))
        .unwrap();
        let text = distribution(&summary);
        assert!(text.contains("0xabc"));
        assert!(text.contains("review #10 (book #1): 5"));
        assert!(text.contains("0x020...202"));
        assert!(text.contains("unknown"));
    }
}
