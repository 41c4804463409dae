use crate::models::leaderboard::LeaderboardEntry;

/// Orders the board by score, then total stars, then username, and assigns
/// 1-based ranks in that order.
pub fn assign_ranks(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.total_stars.cmp(&a.total_stars))
            .then_with(|| a.username.cmp(&b.username))
    });

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = Some(index as u32 + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::insights::Grade;

    fn entry(username: &str, score: u8, stars: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            username: username.to_string(),
            score,
            grade: Grade::from_score(score),
            total_stars: stars,
            public_repos: 0,
            followers: 0,
            domain: "Generalist".to_string(),
            rank: None,
        }
    }

    #[test]
    fn test_assign_ranks() {
        let mut board = vec![
            entry("carol", 70, 5),
            entry("alice", 90, 0),
            entry("bob", 70, 50),
            entry("dave", 70, 5),
        ];

        assign_ranks(&mut board);

        let order: Vec<_> = board
            .iter()
            .map(|e| (e.username.as_str(), e.rank.unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![("alice", 1), ("bob", 2), ("carol", 3), ("dave", 4)]
        );
    }
}
