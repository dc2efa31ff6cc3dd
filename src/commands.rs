//! Poise commands for creating polls, voting, and picking random options.

use log::{info, warn};
use rand::seq::IndexedRandom;

use crate::bot::Data;
use crate::error::{BotError, Result};
use crate::poll::{Poll, PollError};

/// Context type for poll commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

const NO_ACTIVE_POLL: &str = "There's no active poll. Start one with `/poll create`.";

/// Locks the process-wide current poll. A poisoned lock only means a panic
/// happened mid-command; the poll data itself is still usable.
fn lock_poll(ctx: Context<'_>) -> std::sync::MutexGuard<'_, Option<Poll>> {
    ctx.data()
        .poll
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Splits comma-separated user input into trimmed, non-empty option labels.
fn parse_options(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Turns a poll store error into the reply shown to the user.
#[must_use]
pub fn poll_error_reply(err: &PollError) -> String {
    match err {
        PollError::TooFewOptions(_) => {
            "A poll needs at least two comma-separated options.".to_string()
        }
        PollError::DuplicateOption(option) => {
            format!("Option \"{option}\" appears more than once. Each option must be unique.")
        }
        PollError::UnknownOption(option) => {
            format!("\"{option}\" isn't an option in the current poll.")
        }
        PollError::AlreadyVoted(_) => "You already voted on this poll.".to_string(),
    }
}

/// Renders the poll description, per-option counts, and the winner/tie line.
fn render_results(poll: &Poll) -> String {
    let mut out = format!("**{}**", poll.description());

    for (option, count) in poll.tally() {
        out.push_str(&format!("\n{option}: {count}"));
    }

    let winners = poll.results();
    match winners.len() {
        0 => out.push_str("\nNo votes have been cast yet."),
        1 => out.push_str(&format!("\nWinner: **{}**", winners[0])),
        _ => out.push_str(&format!("\nTie between: **{}**", winners.join("**, **"))),
    }

    out
}

/// Create, vote on, and inspect the current poll.
#[poise::command(
    slash_command,
    prefix_command,
    subcommands("create", "vote", "results")
)]
pub async fn poll(ctx: Context<'_>) -> Result<()> {
    ctx.say("Usage: `/poll create`, `/poll vote`, or `/poll results`.")
        .await?;
    Ok(())
}

/// Start a new poll, replacing any existing one.
#[poise::command(slash_command, prefix_command)]
pub async fn create(
    ctx: Context<'_>,
    #[description = "What the poll is about"] description: String,
    #[description = "Comma-separated option labels"]
    #[rest]
    options: String,
) -> Result<()> {
    let labels = parse_options(&options);

    let reply = match Poll::new(description, labels) {
        Ok(new_poll) => {
            info!(
                "{} created poll \"{}\" with {} options",
                ctx.author().tag(),
                new_poll.description(),
                new_poll.options().len()
            );
            let text = format!(
                "Poll created: **{}**\nOptions: {}\nCast your vote with `/poll vote`.",
                new_poll.description(),
                new_poll.options().join(", ")
            );
            *lock_poll(ctx) = Some(new_poll);
            text
        }
        Err(e) => {
            warn!("Rejected poll from {}: {}", ctx.author().tag(), e);
            poll_error_reply(&e)
        }
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Cast your vote in the current poll. One vote per person.
#[poise::command(slash_command, prefix_command)]
pub async fn vote(
    ctx: Context<'_>,
    #[description = "The option to vote for"]
    #[rest]
    option: String,
) -> Result<()> {
    let voter = ctx.author().id.to_string();
    let option = option.trim();

    let reply = match lock_poll(ctx).as_mut() {
        None => NO_ACTIVE_POLL.to_string(),
        Some(current) => match current.cast_vote(option, &voter) {
            Ok(()) => {
                info!("{} voted for \"{}\"", ctx.author().tag(), option);
                format!("Vote for **{option}** recorded.")
            }
            Err(e) => {
                warn!("Rejected vote from {}: {}", ctx.author().tag(), e);
                poll_error_reply(&e)
            }
        },
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Show the current poll's vote counts and leader.
#[poise::command(slash_command, prefix_command)]
pub async fn results(ctx: Context<'_>) -> Result<()> {
    let reply = match lock_poll(ctx).as_ref() {
        None => NO_ACTIVE_POLL.to_string(),
        Some(current) => render_results(current),
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Let the bot pick one of your comma-separated options at random.
#[poise::command(slash_command, prefix_command)]
pub async fn choose(
    ctx: Context<'_>,
    #[description = "Comma-separated options to pick from"]
    #[rest]
    options: String,
) -> Result<()> {
    let labels = parse_options(&options);

    let reply = {
        let mut rng = rand::rng();
        labels.choose(&mut rng).map_or_else(
            || "Give me some comma-separated options to choose from.".to_string(),
            |pick| format!("How about {pick}"),
        )
    };

    ctx.say(reply).await?;
    Ok(())
}

/// Get all bot commands.
#[must_use]
pub fn poll_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![poll(), choose()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voted_poll(votes: &[(&str, &str)]) -> Poll {
        let mut poll = Poll::new(
            "cake or pie?",
            vec!["cake".to_string(), "pie".to_string()],
        )
        .expect("valid poll");
        for (option, voter) in votes {
            poll.cast_vote(option, voter).expect("valid vote");
        }
        poll
    }

    #[test]
    fn parse_splits_and_trims() {
        assert_eq!(
            parse_options("cake, pie ,  ice cream"),
            vec!["cake", "pie", "ice cream"]
        );
    }

    #[test]
    fn parse_drops_empty_segments() {
        assert_eq!(parse_options("cake,, pie,  ,"), vec!["cake", "pie"]);
        assert!(parse_options("  ").is_empty());
        assert!(parse_options("").is_empty());
    }

    #[test]
    fn render_shows_counts_and_winner() {
        let poll = voted_poll(&[("cake", "alice"), ("pie", "bob"), ("cake", "carol")]);
        let text = render_results(&poll);
        assert!(text.contains("**cake or pie?**"));
        assert!(text.contains("cake: 2"));
        assert!(text.contains("pie: 1"));
        assert!(text.contains("Winner: **cake**"));
    }

    #[test]
    fn render_shows_tie() {
        let poll = voted_poll(&[("cake", "alice"), ("pie", "bob")]);
        let text = render_results(&poll);
        assert!(text.contains("Tie between:"));
        assert!(text.contains("cake"));
        assert!(text.contains("pie"));
    }

    #[test]
    fn render_handles_zero_votes() {
        let poll = voted_poll(&[]);
        let text = render_results(&poll);
        assert!(text.contains("cake: 0"));
        assert!(text.contains("pie: 0"));
        assert!(text.contains("No votes have been cast yet."));
    }

    #[test]
    fn error_replies_cover_every_variant() {
        let errors = [
            PollError::TooFewOptions(1),
            PollError::DuplicateOption("cake".to_string()),
            PollError::UnknownOption("soup".to_string()),
            PollError::AlreadyVoted("123".to_string()),
        ];
        for err in errors {
            assert!(!poll_error_reply(&err).is_empty());
        }
    }
}
