//! User command
//!
//! Sign in, inspect users and manage roles.

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use turftap_core::user::{SignInRequest, User};
use turftap_core::Role;

use super::context::{resolve_identity, Session};
use super::print_json;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Sign in, registering on first use
    SignIn {
        /// Display name
        name: String,

        /// Email address
        email: String,

        /// Profile image URL
        #[arg(long)]
        image: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user (defaults to the acting user)
    Show {
        /// User id or email
        user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a user's role (admin only)
    Role {
        /// User id or email
        user: String,

        /// New role (member or admin)
        role: Role,
    },

    /// Top contributors by turftap points
    Top {
        /// Page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Entries per page
        #[arg(long, short)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the user command
pub fn execute(cmd: UserCommand, session: &Session) -> Result<()> {
    match cmd {
        UserCommand::SignIn {
            name,
            email,
            image,
            json,
        } => {
            let user = session.app.users.sign_in(SignInRequest {
                name,
                email,
                profile_image: image,
            })?;
            if json {
                return print_json(&user);
            }
            println!("{} Signed in as {}", "✓".green(), user.name.bold());
            print_user(&user);
            Ok(())
        }
        UserCommand::Show { user, json } => {
            let id = match user {
                Some(who) => resolve_identity(&session.app, &who)?.user_id,
                None => {
                    session
                        .identity()
                        .ok_or_else(|| anyhow!("Pass a user or use --as"))?
                        .user_id
                }
            };
            let user = session.app.users.get(&id)?;
            if json {
                return print_json(&user);
            }
            print_user(&user);

            let submitted = session.app.listings.submitted_by(&user.id)?;
            if !submitted.is_empty() {
                println!("  {}", "Submissions:".bold());
                for listing in submitted {
                    println!("    {} {} [{}]", listing.id.to_string().dimmed(), listing.title, listing.status);
                }
            }
            Ok(())
        }
        UserCommand::Role { user, role } => {
            let target = resolve_identity(&session.app, &user)?.user_id;
            let updated = session
                .app
                .users
                .set_role(session.identity(), &target, role)?;
            println!(
                "{} {} is now {}",
                "✓".green(),
                updated.name.bold(),
                updated.role.to_string().cyan()
            );
            Ok(())
        }
        UserCommand::Top { page, limit, json } => {
            let ranking = session.app.users.top_contributors(page, limit)?;
            if json {
                return print_json(&ranking);
            }
            println!("{}", "Top contributors:".bold().underline());
            let offset = (ranking.page - 1) * limit.unwrap_or(session.config.contributors.default_page_size);
            for (rank, entry) in ranking.items.iter().enumerate() {
                println!(
                    "  {:>3}. {} {}",
                    offset + rank + 1,
                    entry.name,
                    format!("({} pts)", entry.points).dimmed()
                );
            }
            println!(
                "{}",
                format!("Page {} of {}", ranking.page, ranking.total_pages.max(1)).dimmed()
            );
            Ok(())
        }
    }
}

fn print_user(user: &User) {
    println!("  {} {}", "id:".dimmed(), user.id);
    println!("  {} {}", "name:".dimmed(), user.name);
    println!("  {} {}", "email:".dimmed(), user.email);
    println!("  {} {}", "role:".dimmed(), user.role);
    println!("  {} {}", "points:".dimmed(), user.points);
}
