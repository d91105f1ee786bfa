//! Listing command
//!
//! Submit, browse and moderate grounds.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use turftap_core::listing::{
    Listing, ListingQuery, ListingStatus, SortOrder, SubmitListingRequest, UpdateListingRequest,
};
use turftap_core::ListingId;

use super::context::Session;
use super::print_json;

/// Listing subcommands
#[derive(Debug, Subcommand)]
pub enum ListingCommand {
    /// Submit a ground for review
    Submit(SubmitArgs),

    /// Show one ground with its vote counts
    Show {
        /// Listing ID
        id: ListingId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse approved grounds
    Browse {
        /// Sport to look for (matches any category)
        #[arg(long)]
        sport: Option<String>,

        /// City filter
        #[arg(long)]
        city: Option<String>,

        /// State filter
        #[arg(long)]
        state: Option<String>,

        /// Sort order: new or top
        #[arg(long, default_value = "new")]
        sort: SortOrder,

        /// Page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grounds awaiting review (admin only)
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Approve a ground (admin only)
    Approve {
        /// Listing ID
        id: ListingId,
    },

    /// Reject a ground (admin only)
    Reject {
        /// Listing ID
        id: ListingId,

        /// Note for the submitter
        #[arg(long)]
        remarks: Option<String>,
    },

    /// Edit a ground's details (admin only)
    Edit(EditArgs),

    /// Delete a ground with its votes and comments (admin only)
    Delete {
        /// Listing ID
        id: ListingId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cities and states with approved grounds
    Locations {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `listing submit`
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Read the submission from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["title", "description"])]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Sport played, repeatable
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    #[arg(long)]
    pub timings: Option<String>,

    /// Price per hour; marks the ground as paid
    #[arg(long)]
    pub price: Option<u64>,

    /// Image URL, repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SubmitArgs {
    fn into_request(self) -> Result<SubmitListingRequest> {
        if let Some(path) = self.file {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid submission in {}", path.display()));
        }

        let (Some(lat), Some(lng)) = (self.lat, self.lng) else {
            bail!("--lat and --lng are required");
        };
        Ok(SubmitListingRequest {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            categories: self.categories,
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            lat,
            lng,
            timings: self.timings.unwrap_or_default(),
            is_paid: self.price.is_some(),
            price: self.price,
            images: self.images,
        })
    }
}

/// Arguments for `listing edit`; only the given fields change
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Listing ID
    pub id: ListingId,

    /// Read the changes from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["title", "description", "price", "free"])]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Replaces all categories, repeatable
    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    #[arg(long)]
    pub timings: Option<String>,

    /// Price per hour; marks the ground as paid
    #[arg(long, conflicts_with = "free")]
    pub price: Option<u64>,

    /// Mark the ground as free
    #[arg(long)]
    pub free: bool,

    /// Replaces all images, repeatable
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl EditArgs {
    fn into_request(self) -> Result<UpdateListingRequest> {
        if let Some(path) = self.file {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("Invalid update in {}", path.display()));
        }

        let is_paid = if self.free {
            Some(false)
        } else {
            self.price.map(|_| true)
        };
        Ok(UpdateListingRequest {
            title: self.title,
            description: self.description,
            categories: non_empty(self.categories),
            address: self.address,
            city: self.city,
            state: self.state,
            lat: self.lat,
            lng: self.lng,
            timings: self.timings,
            is_paid,
            price: self.price,
            images: non_empty(self.images),
        })
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}

/// Execute the listing command
pub fn execute(cmd: ListingCommand, session: &Session) -> Result<()> {
    let listings = &session.app.listings;

    match cmd {
        ListingCommand::Submit(args) => {
            let json = args.json;
            let listing = listings.submit(session.identity(), args.into_request()?)?;
            if json {
                return print_json(&listing);
            }
            println!(
                "{} Submitted {} for review ({})",
                "✓".green(),
                listing.title.bold(),
                listing.id
            );
            Ok(())
        }
        ListingCommand::Show { id, json } => {
            let listing = listings.get(&id)?;
            if json {
                return print_json(&listing);
            }
            print_listing(&listing);
            println!("  {}", listing.description);
            println!(
                "  {} {}",
                "images:".dimmed(),
                listing.images.join(", ")
            );
            if let Some(remarks) = &listing.remarks {
                println!("  {} {}", "remarks:".dimmed(), remarks);
            }
            if let Some(identity) = session.identity() {
                if let Some(kind) = session.app.votes.get_vote(Some(identity), &id)? {
                    println!("  {} {}", "your vote:".dimmed(), kind);
                }
            }
            let comments = session.app.comments.count_for_listing(&id)?;
            println!("  {} {}", "comments:".dimmed(), comments);
            Ok(())
        }
        ListingCommand::Browse {
            sport,
            city,
            state,
            sort,
            page,
            json,
        } => {
            let mut query = ListingQuery::default().sort(sort).page(page);
            if let Some(sport) = sport {
                query = query.sport(sport);
            }
            if let Some(city) = city {
                query = query.city(city);
            }
            if let Some(state) = state {
                query = query.state(state);
            }

            let results = listings.browse(&query)?;
            if json {
                return print_json(&results);
            }
            if results.items.is_empty() {
                println!("No grounds found.");
                return Ok(());
            }
            for listing in &results.items {
                print_listing(listing);
            }
            println!(
                "{}",
                format!(
                    "Page {} of {} ({} grounds)",
                    results.page, results.total_pages, results.total_items
                )
                .dimmed()
            );
            Ok(())
        }
        ListingCommand::Pending { json } => {
            let pending = listings.pending(session.identity())?;
            if json {
                return print_json(&pending);
            }
            if pending.is_empty() {
                println!("Nothing awaiting review.");
            }
            for listing in &pending {
                print_listing(listing);
            }
            Ok(())
        }
        ListingCommand::Approve { id } => {
            let listing = listings.approve(session.identity(), &id)?;
            println!(
                "{} Approved {}; {} points to the submitter",
                "✓".green(),
                listing.title.bold(),
                session.config.listings.approval_points
            );
            Ok(())
        }
        ListingCommand::Reject { id, remarks } => {
            let listing = listings.reject(session.identity(), &id, remarks)?;
            println!("{} Rejected {}", "✓".green(), listing.title.bold());
            Ok(())
        }
        ListingCommand::Edit(args) => {
            let id = args.id;
            let json = args.json;
            let listing = listings.update(session.identity(), &id, args.into_request()?)?;
            if json {
                return print_json(&listing);
            }
            println!("{} Updated {}", "✓".green(), listing.title.bold());
            print_listing(&listing);
            Ok(())
        }
        ListingCommand::Delete { id, yes, json } => {
            if !yes {
                use dialoguer::Confirm;

                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete ground {} with its votes and comments?", id))
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("Delete cancelled.");
                    return Ok(());
                }
            }

            let removal = listings.delete(session.identity(), &id)?;
            if json {
                return print_json(&removal);
            }
            println!(
                "{} Deleted {} ({} votes, {} comments)",
                "✓".green(),
                removal.listing_id,
                removal.votes_removed,
                removal.comments_removed
            );
            Ok(())
        }
        ListingCommand::Locations { json } => {
            let locations = listings.locations()?;
            if json {
                return print_json(&locations);
            }
            for location in locations {
                println!("  {}, {}", location.city, location.state);
            }
            Ok(())
        }
    }
}

fn print_listing(listing: &Listing) {
    let status = match listing.status {
        ListingStatus::Approved => listing.status.to_string().green(),
        ListingStatus::Pending => listing.status.to_string().yellow(),
        ListingStatus::Rejected => listing.status.to_string().red(),
    };
    let price = if listing.is_paid {
        format!("₹{}/hr", listing.price)
    } else {
        "free".to_string()
    };
    println!(
        "{} {} [{}]",
        listing.title.bold(),
        listing.id.to_string().dimmed(),
        status
    );
    println!(
        "  {}, {} · {} · {} · ▲{} ▼{}",
        listing.location.city,
        listing.location.state,
        listing.categories.join("/"),
        price,
        listing.upvotes,
        listing.downvotes
    );
}
