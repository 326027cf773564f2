//! Vote tallying for date polls
//!
//! `tally` reduces the votes on a single candidate date to counts and a
//! positivity percentage. `rank_options` orders a poll's candidate dates by
//! those tallies for display.
//!
//! Votes reach this module through the typed [`VoteType`], so every vote is
//! one of the three answers by construction; validating raw strings is the
//! persistence layer's job.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::entities::{Ballot, DateOption, VoteTally, VoteType};

/// Count the votes cast on one candidate date
pub fn tally<I>(votes: I) -> VoteTally
where
    I: IntoIterator,
    I::Item: Ballot,
{
    let (mut yes, mut if_need_be, mut no) = (0u32, 0u32, 0u32);
    for vote in votes {
        match vote.vote_type() {
            VoteType::Yes => yes += 1,
            VoteType::IfNeedBe => if_need_be += 1,
            VoteType::No => no += 1,
        }
    }
    VoteTally::from_counts(yes, if_need_be, no)
}

/// A candidate date with its tally and display rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedOption {
    /// 1-based; options with identical counts share a rank
    pub rank: usize,
    pub option: DateOption,
    pub tally: VoteTally,
}

/// Best first: most yes, then most if-need-be, then fewest no, then earliest date
fn compare(a: &(DateOption, VoteTally), b: &(DateOption, VoteTally)) -> Ordering {
    b.1.yes
        .cmp(&a.1.yes)
        .then_with(|| b.1.if_need_be.cmp(&a.1.if_need_be))
        .then_with(|| a.1.no.cmp(&b.1.no))
        .then_with(|| a.0.date.cmp(&b.0.date))
}

fn same_counts(a: &VoteTally, b: &VoteTally) -> bool {
    a.yes == b.yes && a.if_need_be == b.if_need_be && a.no == b.no
}

/// Order candidate dates best-first and assign competition ranks ("1, 1, 3")
pub fn rank_options(mut options: Vec<(DateOption, VoteTally)>) -> Vec<RankedOption> {
    options.sort_by(compare);

    let mut ranked: Vec<RankedOption> = Vec::with_capacity(options.len());
    for (index, (option, tally)) in options.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(previous) if same_counts(&previous.tally, &tally) => previous.rank,
            _ => index + 1,
        };
        ranked.push(RankedOption { rank, option, tally });
    }
    ranked
}

/// The best-ranked option, if anyone has said yes or if-need-be to it
pub fn leading_option(ranked: &[RankedOption]) -> Option<&RankedOption> {
    ranked
        .first()
        .filter(|top| top.tally.yes + top.tally.if_need_be > 0)
}
