//! Comment command
//!
//! Post, edit, delete and read threaded comments.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use turftap_core::comment::{CommentNode, CommentView};
use turftap_core::{CommentId, ListingId};

use super::context::Session;
use super::print_json;

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Comment on a ground
    Add {
        /// Listing ID
        listing: ListingId,

        /// Comment text
        content: String,

        /// Reply to this comment
        #[arg(long)]
        reply_to: Option<CommentId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit your comment
    Edit {
        /// Comment ID
        id: CommentId,

        /// New text
        content: String,
    },

    /// Delete a comment and all replies to it
    Delete {
        /// Comment ID
        id: CommentId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one comment
    Show {
        /// Comment ID
        id: CommentId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the discussion on a ground
    Tree {
        /// Listing ID
        listing: ListingId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the comment command
pub fn execute(cmd: CommentCommand, session: &Session) -> Result<()> {
    let comments = &session.app.comments;

    match cmd {
        CommentCommand::Add {
            listing,
            content,
            reply_to,
            json,
        } => {
            let view = comments.add(session.identity(), listing, &content, reply_to)?;
            if json {
                return print_json(&view);
            }
            println!("{} Comment {} posted", "✓".green(), view.comment.id);
            Ok(())
        }
        CommentCommand::Edit { id, content } => {
            let view = comments.edit(session.identity(), &id, &content)?;
            println!("{} Comment {} updated", "✓".green(), view.comment.id);
            Ok(())
        }
        CommentCommand::Delete { id, yes, json } => {
            if !yes {
                use dialoguer::Confirm;

                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete comment {} and all replies?", id))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("Delete cancelled.");
                    return Ok(());
                }
            }

            let outcome = comments.delete(session.identity(), &id)?;
            if json {
                return print_json(&outcome);
            }
            println!(
                "{} Deleted {} comment(s)",
                "✓".green(),
                outcome.deleted_count
            );
            Ok(())
        }
        CommentCommand::Show { id, json } => {
            let view = comments.get(&id)?;
            if json {
                return print_json(&view);
            }
            print_view(&view, 0);
            Ok(())
        }
        CommentCommand::Tree { listing, json } => {
            let forest = comments.tree(&listing)?;
            if json {
                return print_json(&forest);
            }
            if forest.is_empty() {
                println!("No comments yet.");
                return Ok(());
            }
            print_forest(&forest);
            Ok(())
        }
    }
}

/// Print threads depth-first without recursing
fn print_forest(forest: &[CommentNode]) {
    let mut stack: Vec<(&CommentNode, usize)> = forest.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, depth)) = stack.pop() {
        print_view(&node.view, depth);
        stack.extend(node.replies.iter().rev().map(|r| (r, depth + 1)));
    }
}

fn print_view(view: &CommentView, depth: usize) {
    let indent = "  ".repeat(depth);
    let author = view
        .author
        .as_ref()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| "[unknown]".to_string());
    let edited = if view.comment.is_edited() { " (edited)" } else { "" };
    println!(
        "{}{} {} {}{}",
        indent,
        author.bold(),
        view.comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        view.comment.id.to_string().dimmed(),
        edited.dimmed()
    );
    for line in view.comment.content.lines() {
        println!("{}  {}", indent, line);
    }
}
