use chrono::Utc;
use reports::{CompetitionExport, ExportSource, Session, collect_check_ins, render::render_table};
use scoring::LeaderboardBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "crates/reports/fixtures/sample_export.json".to_string());

    println!("Building leaderboard from: {}", path);

    let export = CompetitionExport::load(path.as_ref()).await?;
    let source = ExportSource::new(&export);

    // Read as the competition owner.
    let session = Session::new(export.competition.owner_id);
    let fetches = collect_check_ins(&source, &session, &export.competition, 4).await?;

    let snapshot =
        LeaderboardBuilder::default().build(&export.competition, &fetches, Utc::now())?;

    print!("{}", render_table(&snapshot));

    Ok(())
}
