//! Storage backends against the built-in league data.

use database::{
    open_store, DatabaseConfig, FixtureStore, LeagueData, LeagueStore, SqliteStore,
};
use standings::{check_matches, check_table, league_table, reconcile, Column, TableIssue};
use types::{MatchId, MatchResult, MatchStatus, PlayerId, TeamId};

async fn memory_store() -> SqliteStore {
    SqliteStore::connect(&DatabaseConfig::new("sqlite::memory:"))
        .await
        .expect("Failed to open in-memory store")
}

#[tokio::test]
async fn seeded_sqlite_store_returns_the_fixture_records() {
    let store = memory_store().await;
    assert!(store.seed_fixtures().await.unwrap());

    let expected = LeagueData::fixtures();
    assert_eq!(store.teams().await.unwrap(), expected.teams);
    assert_eq!(store.players().await.unwrap(), expected.players);
    assert_eq!(store.matches().await.unwrap(), expected.matches);
    assert_eq!(store.users().await.unwrap(), expected.users);
    assert_eq!(
        store.published_standings().await.unwrap(),
        expected.published_standings
    );
}

#[tokio::test]
async fn seeding_twice_is_a_no_op() {
    let store = memory_store().await;
    assert!(store.seed_fixtures().await.unwrap());
    assert!(!store.seed_fixtures().await.unwrap());
    assert_eq!(store.teams().await.unwrap().len(), 4);
}

#[tokio::test]
async fn saving_a_result_updates_in_place() {
    let store = memory_store().await;
    store.seed_fixtures().await.unwrap();

    let id = MatchId::new("match-5");
    let mut m = store.get_match(&id).await.unwrap().unwrap();
    m.status = MatchStatus::Completed;
    m.result = Some(MatchResult::new(
        1,
        1,
        vec![PlayerId::new("player-7"), PlayerId::new("player-1")],
    ));
    store.save_match(&m).await.unwrap();

    let matches = store.matches().await.unwrap();
    assert_eq!(matches.len(), 6);
    assert_eq!(matches[4], m);
}

#[tokio::test]
async fn users_are_found_by_email() {
    let store = memory_store().await;
    store.seed_fixtures().await.unwrap();

    let user = store
        .find_user_by_email("player1@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.player_id, Some(PlayerId::new("player-1")));
    assert!(store
        .find_user_by_email("missing@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn fixture_results_produce_the_derived_table() {
    let store = FixtureStore::seeded();
    let teams = store.teams().await.unwrap();
    let matches = store.matches().await.unwrap();
    let players = store.players().await.unwrap();

    assert!(check_matches(&matches, &players).is_empty());

    let table = league_table(&teams, &matches);
    let rows: Vec<(&str, u32, u32, u32, u32, u32, u32, i64, u32)> = table
        .iter()
        .map(|row| {
            let s = &row.standing;
            (
                s.team_id.as_str(),
                s.played,
                s.won,
                s.drawn,
                s.lost,
                s.goals_for,
                s.goals_against,
                row.goal_difference,
                row.points,
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("team-1", 2, 2, 0, 0, 7, 2, 5, 6),
            ("team-4", 2, 1, 1, 0, 4, 3, 1, 4),
            ("team-2", 2, 0, 1, 1, 4, 5, -1, 1),
            ("team-3", 2, 0, 0, 2, 1, 6, -5, 0),
        ]
    );
    assert_eq!(table.iter().map(|row| row.points).sum::<u32>(), 11);
}

#[tokio::test]
async fn published_table_disagreements_are_reported() {
    let store = FixtureStore::seeded();
    let published = store.published_standings().await.unwrap();

    assert_eq!(
        check_table(&published),
        vec![
            TableIssue::WinsLossesMismatch { wins: 4, losses: 6 },
            TableIssue::GoalTotalsMismatch {
                goals_for: 22,
                goals_against: 26,
            },
        ]
    );

    let teams = store.teams().await.unwrap();
    let matches = store.matches().await.unwrap();
    let derived = standings::compute_standings(&teams, &matches);
    let discrepancies = reconcile(&published, &derived);
    assert!(discrepancies.iter().any(|d| d.team_id == TeamId::new("team-1")
        && d.column == Column::Played
        && d.published == 3
        && d.derived == 2));
    assert!(!discrepancies
        .iter()
        .any(|d| d.team_id == TeamId::new("team-1") && d.column == Column::Points));
}

#[tokio::test]
async fn both_backends_agree_after_seeding() {
    let sqlite = memory_store().await;
    sqlite.seed_fixtures().await.unwrap();
    let fixtures = open_store(&DatabaseConfig::new("fixtures")).await.unwrap();

    let from_sqlite = league_table(&sqlite.teams().await.unwrap(), &sqlite.matches().await.unwrap());
    let from_fixtures = league_table(
        &fixtures.teams().await.unwrap(),
        &fixtures.matches().await.unwrap(),
    );
    assert_eq!(from_sqlite, from_fixtures);
}
