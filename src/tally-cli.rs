//! A simple CLI tool for tallying community elections.
//! This uses the server's own tally implementation, and is by definition
//! compatible with the output of our API endpoints.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;

use clap::{Arg, ArgAction, ArgMatches, Command};
use rocket::serde::json::serde_json;

use community_backend::model::{api::election::ElectionResults, common::election::PostTally};

const PROGRAM_NAME: &str = "tally-cli";

const ABOUT_TEXT: &str = "Recompute the tallies of a community election.

EXIT CODES:
     0: Tallies computed.
     1: The results could not be read.";

const RESULTS_PATH: &str = "RESULTS_PATH";

const RESULTS_PATH_HELP: &str = "The path to a JSON dump of an election,\n\
as returned by `GET /elections/<election_id>/results`";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME).about(ABOUT_TEXT).arg(
        Arg::new(RESULTS_PATH)
            .help(RESULTS_PATH_HELP)
            .action(ArgAction::Set)
            .required(true),
    )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode the JSON dump.
    Format(String),
}

/// A friendly representation of the result for a particular candidacy.
#[derive(Debug, PartialEq)]
struct FriendlyResult {
    pub applicant: String,
    pub votes: u64,
    pub percentage: f64,
}

impl Display for FriendlyResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{} ({:.2}%)",
            self.applicant,
            self.votes,
            if self.votes != 1 { "s" } else { "" },
            self.percentage
        )
    }
}

/// The friendly results for one post, most votes first.
#[derive(Debug, PartialEq)]
struct FriendlyTally {
    pub post: String,
    pub total_votes: u64,
    pub results: Vec<FriendlyResult>,
}

impl FriendlyTally {
    fn new(tally: PostTally, results: &ElectionResults) -> Self {
        let mut friendly: Vec<FriendlyResult> = tally
            .entries
            .iter()
            .map(|entry| FriendlyResult {
                applicant: results
                    .candidacy(entry.candidacy_id)
                    .map(|candidacy| candidacy.applicant.clone())
                    .unwrap_or_else(|| format!("candidacy {}", entry.candidacy_id)),
                votes: entry.vote_count,
                percentage: entry.percentage,
            })
            .collect();
        // Most votes first, then by name.
        friendly.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then_with(|| a.applicant.cmp(&b.applicant))
        });

        Self {
            post: tally.post.to_string(),
            total_votes: tally.total_votes,
            results: friendly,
        }
    }
}

/// Load the dump and recompute its tallies.
fn tally(path: &str) -> Result<(ElectionResults, Vec<FriendlyTally>), Error> {
    // Load the file.
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(e.to_string()))?);
    let results: ElectionResults =
        serde_json::from_reader(file).map_err(|e| Error::Format(e.to_string()))?;

    let tallies = results
        .tallies()
        .into_iter()
        .map(|tally| FriendlyTally::new(tally, &results))
        .collect();
    Ok((results, tallies))
}

/// Run the tally, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    let path: &String = args.get_one(RESULTS_PATH).unwrap(); // Required argument is guaranteed to be present.
    match tally(path) {
        Ok((results, tallies)) => {
            println!("Election {}: {}", results.id, results.title);
            if results.is_provisional() {
                println!("Voting has not closed; these tallies are provisional.");
            }
            for tally in tallies {
                println!();
                println!(
                    "{} ({} vote{})",
                    tally.post,
                    tally.total_votes,
                    if tally.total_votes != 1 { "s" } else { "" }
                );
                if tally.results.is_empty() {
                    println!("  no candidates");
                }
                for result in tally.results {
                    println!("  {result}");
                }
            }
            0
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {msg}");
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid JSON: {msg}");
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}
