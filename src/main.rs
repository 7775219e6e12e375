//! `bugbook` (bb) - file-backed bug tracker
//!
//! Bugs live in one JSON file partitioned by status; users and project
//! sources sit beside it. No database, no daemon, no network.

use bugbook::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
