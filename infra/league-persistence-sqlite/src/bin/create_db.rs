use league_persistence_sqlite::{TABLES, create_db_pool, ensure_schema};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let db_path =
        std::env::var("LEAGUE_DB_PATH").unwrap_or_else(|_| "instance/league.db".to_string());

    let pool = create_db_pool(&db_path)
        .await
        .expect("Failed to open league database");

    ensure_schema(&pool)
        .await
        .expect("Failed to create league tables");

    println!(
        "Created database tables ({}) in {} successfully",
        TABLES.join(", "),
        db_path
    );
}
