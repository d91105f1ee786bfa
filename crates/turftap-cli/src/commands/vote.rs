//! Vote command

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use turftap_core::vote::{VoteKind, VoteOutcome};
use turftap_core::ListingId;

use super::context::Session;
use super::print_json;

/// Vote subcommands
#[derive(Debug, Subcommand)]
pub enum VoteCommand {
    /// Upvote a ground; repeating it withdraws the vote
    Up {
        /// Listing ID
        id: ListingId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Downvote a ground; repeating it withdraws the vote
    Down {
        /// Listing ID
        id: ListingId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show your vote on a ground
    Show {
        /// Listing ID
        id: ListingId,
    },

    /// List all your votes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the vote command
pub fn execute(cmd: VoteCommand, session: &Session) -> Result<()> {
    let votes = &session.app.votes;

    match cmd {
        VoteCommand::Up { id, json } => cast(session, id, VoteKind::Up, json),
        VoteCommand::Down { id, json } => cast(session, id, VoteKind::Down, json),
        VoteCommand::Show { id } => {
            match votes.get_vote(session.identity(), &id)? {
                Some(kind) => println!("{}", kind),
                None => println!("{}", "no vote".dimmed()),
            }
            Ok(())
        }
        VoteCommand::List { json } => {
            let mine = votes.list_votes(session.identity())?;
            if json {
                return print_json(&mine);
            }
            if mine.is_empty() {
                println!("No votes yet.");
            }
            for vote in mine {
                println!("  {} {}", arrow(Some(vote.vote_kind)), vote.listing_id);
            }
            Ok(())
        }
    }
}

fn cast(session: &Session, id: ListingId, kind: VoteKind, json: bool) -> Result<()> {
    let outcome = session.app.votes.cast(session.identity(), id, kind)?;
    if json {
        return print_json(&outcome);
    }
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &VoteOutcome) {
    println!(
        "{} {} ({} ▲{} ▼{})",
        "✓".green(),
        outcome.change,
        arrow(outcome.user_vote),
        outcome.upvotes,
        outcome.downvotes
    );
}

fn arrow(kind: Option<VoteKind>) -> String {
    match kind {
        Some(VoteKind::Up) => "▲ up".green().to_string(),
        Some(VoteKind::Down) => "▼ down".red().to_string(),
        None => "none".dimmed().to_string(),
    }
}
