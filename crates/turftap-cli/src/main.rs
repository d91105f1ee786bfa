//! turftap - community sports ground directory
//!
//! Submit grounds, vote on them and discuss them from the terminal.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create config and data directory, with a first admin
//! turftap init --admin-name "Asha" --admin-email asha@example.com
//!
//! # Sign in and submit a ground
//! turftap user sign-in "Ravi" ravi@example.com
//! turftap --as ravi@example.com listing submit --file ground.json
//!
//! # Vote and comment
//! turftap --as ravi@example.com vote up <listing-id>
//! turftap --as ravi@example.com comment add <listing-id> "Great pitch"
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
