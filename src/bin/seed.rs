//! Inserts a few sample items into the configured database.

use tracing::info;

use watchlist::{config::Config, db, models::ItemChanges};

fn sample(
    title: &str,
    kind: &str,
    status: &str,
    rating: Option<i64>,
    episodes: Option<(i64, i64)>,
    notes: &str,
) -> ItemChanges {
    ItemChanges {
        title: Some(title.to_string()),
        kind: Some(kind.to_string()),
        status: Some(status.to_string()),
        rating: Some(rating),
        current_episode: Some(episodes.map(|(current, _)| current)),
        total_episodes: Some(episodes.map(|(_, total)| total)),
        notes: Some(Some(notes.to_string())),
    }
}

fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    let pool = db::init_db(&config.db_path).expect("initializing database");

    let samples = [
        sample(
            "Inception",
            "Movie",
            "Completed",
            Some(9),
            None,
            "Mind-bending thriller.",
        ),
        sample(
            "Breaking Bad",
            "TV Show",
            "Watching",
            Some(10),
            Some((3, 62)),
            "Season 1.",
        ),
        sample(
            "The Shawshank Redemption",
            "Movie",
            "Planned",
            None,
            None,
            "Classic to watch.",
        ),
    ];

    for changes in &samples {
        let item = db::create_item(&pool, changes).expect("inserting sample item");
        info!(id = %item.id, title = %item.title, "seeded item");
    }

    println!("Inserted {} sample items.", samples.len());
}
