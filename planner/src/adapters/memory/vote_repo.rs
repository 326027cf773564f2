use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{read, write};
use crate::domain::entities::{DateOptionId, NewVote, UserId, Vote};
use crate::domain::ports::VoteRepository;
use crate::error::DomainError;

/// Votes keyed by (option, user); one vote per user per option
#[derive(Default)]
pub struct InMemoryVoteRepository {
    votes: RwLock<HashMap<(DateOptionId, UserId), Vote>>,
}

impl InMemoryVoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoteRepository for InMemoryVoteRepository {
    async fn list_for_option(&self, option_id: &DateOptionId) -> Result<Vec<Vote>, DomainError> {
        let votes = read(&self.votes)?;
        let mut found: Vec<Vote> = votes
            .values()
            .filter(|v| v.option_id == *option_id)
            .cloned()
            .collect();
        found.sort_by_key(|v| v.voted_at);
        Ok(found)
    }

    async fn upsert(&self, new_vote: &NewVote) -> Result<Vote, DomainError> {
        let mut votes = write(&self.votes)?;
        let key = (new_vote.option_id, new_vote.user_id);
        // Changing an answer keeps the vote's identity
        let id = votes.get(&key).map(|v| v.id).unwrap_or_default();
        let vote = Vote {
            id,
            option_id: new_vote.option_id,
            user_id: new_vote.user_id,
            vote_type: new_vote.vote_type,
            voted_at: Utc::now(),
        };
        votes.insert(key, vote.clone());
        Ok(vote)
    }

    async fn delete(
        &self,
        option_id: &DateOptionId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        Ok(write(&self.votes)?.remove(&(*option_id, *user_id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::VoteType;

    #[tokio::test]
    async fn upsert_keeps_one_vote_per_user() {
        let repo = InMemoryVoteRepository::new();
        let option_id = DateOptionId::new();
        let user_id = UserId::new();

        let first = repo
            .upsert(&NewVote {
                option_id,
                user_id,
                vote_type: VoteType::No,
            })
            .await
            .unwrap();
        let second = repo
            .upsert(&NewVote {
                option_id,
                user_id,
                vote_type: VoteType::Yes,
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let votes = repo.list_for_option(&option_id).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote_type, VoteType::Yes);
    }

    #[tokio::test]
    async fn list_filters_by_option() {
        let repo = InMemoryVoteRepository::new();
        let (a, b) = (DateOptionId::new(), DateOptionId::new());
        for option_id in [a, a, b] {
            repo.upsert(&NewVote {
                option_id,
                user_id: UserId::new(),
                vote_type: VoteType::IfNeedBe,
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.list_for_option(&a).await.unwrap().len(), 2);
        assert_eq!(repo.list_for_option(&b).await.unwrap().len(), 1);
        assert!(repo
            .list_for_option(&DateOptionId::new())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn delete_reports_whether_vote_existed() {
        let repo = InMemoryVoteRepository::new();
        let option_id = DateOptionId::new();
        let user_id = UserId::new();
        repo.upsert(&NewVote {
            option_id,
            user_id,
            vote_type: VoteType::Yes,
        })
        .await
        .unwrap();

        assert!(repo.delete(&option_id, &user_id).await.unwrap());
        assert!(!repo.delete(&option_id, &user_id).await.unwrap());
    }
}
