//! Report command: print the overview metrics as JSON.

use farda_core::FardaConfig;
use farda_store::{ReportStore, connect};
use serde_json::json;

pub async fn run(config: &FardaConfig) -> anyhow::Result<()> {
    let pool = connect(&config.database).await?;
    let reports = ReportStore::new(pool);

    let overview = reports.overview().await?;
    let by_status = reports.orders_by_status().await?;
    let per_school = reports.per_school().await?;

    let report = json!({
        "overview": overview,
        "orders_by_status": by_status
            .iter()
            .map(|(status, count)| json!({ "status": status.as_str(), "orders": count }))
            .collect::<Vec<_>>(),
        "schools": per_school,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
