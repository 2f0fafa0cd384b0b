use anyhow::Result;
use chrono::Utc;
use sensorprep::{
    config::PipelineConfig,
    persist::JsonObjectStore,
    schema::{SchemaProvider, YamlSchemaProvider},
    transform::DataTransformation,
    validation::BatchValidationRouter,
};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .init();
    info!("startup");

    // ─── 2) configure the run ────────────────────────────────────────
    let raw_data_dir = env::args().nth(1).unwrap_or_else(|| "raw_data".to_string());
    let schema_path = env::args()
        .nth(2)
        .unwrap_or_else(|| "config/schema.yaml".to_string());
    let config = PipelineConfig::for_run_at(Utc::now());
    info!(
        raw = %raw_data_dir,
        schema = %schema_path,
        artifacts = %config.artifact_root().display(),
        "run configured"
    );

    // ─── 3) load the schema once ─────────────────────────────────────
    let schema = YamlSchemaProvider::new(&schema_path).load()?;
    info!(
        columns = schema.expected_column_count(),
        drops = schema.drop_columns.len(),
        outlier_columns = schema.outlier_columns.len(),
        "schema loaded"
    );

    // ─── 4) validate and route the raw batch ─────────────────────────
    let router = BatchValidationRouter::new(&raw_data_dir, &config, &schema);
    let valid_data_dir = router.initiate_data_validation()?;
    info!(valid_dir = %valid_data_dir.display(), "validation complete");

    // ─── 5) merge, clean, split and scale ────────────────────────────
    let transformation =
        DataTransformation::new(&valid_data_dir, config, schema, JsonObjectStore);
    let (train, test, scaler_path) = transformation.initiate_data_transformation()?;
    info!(
        train_shape = ?train.dim(),
        test_shape = ?test.dim(),
        scaler = %scaler_path.display(),
        "all done"
    );
    Ok(())
}
