//! 🧪 End to end: a folder of JSON in, a folder of CSV out.

use std::fs;
use std::path::Path;

use anyhow::Result;
use dimx::app_config::{AppConfig, RuntimeConfig, SinkConfig, SourceConfig};
use dimx::backends::{CsvDirectorySinkConfig, DirectorySourceConfig};

fn read_csv(dir: &Path, table: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(dir.join(format!("{table}.csv")))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn config_for(input: &Path, output: &Path) -> AppConfig {
    AppConfig {
        source_config: SourceConfig::Directory(DirectorySourceConfig {
            input_dir: input.to_path_buf(),
            token_file_name: "token.json".to_string(),
        }),
        sink_config: SinkConfig::CsvDirectory(CsvDirectorySinkConfig {
            output_dir: output.to_path_buf(),
        }),
        runtime: RuntimeConfig {
            show_progress: false,
        },
    }
}

#[tokio::test]
async fn the_one_where_a_folder_of_configs_becomes_a_star_schema() -> Result<()> {
    let workspace = tempfile::tempdir()?;
    let input = workspace.path().join("input");
    let output = workspace.path().join("csv_output");
    fs::create_dir(&input)?;

    fs::write(
        input.join("token.json"),
        r#"{"payTokendev": "dev-s3cr3t", "payTokenuat": "uat-s3cr3t", "payTokenprd": "prd-s3cr3t"}"#,
    )?;
    fs::write(
        input.join("cardif-web_apps.json"),
        r#"{"projects": [{"name": "Payments core", "ms": [{
            "tokenOcp": "payToken",
            "repositoryUrl": "https://git.example/payments/pay-api.git",
            "config": "{\"appName\": \"pay-api\", \"country\": \"CO\", \"ocpLabel\": \"web\", \"resQuotasdev\": {\"cpuLimits\": \"1\", \"replicas\": 3}}"
        }]}]}"#,
    )?;
    fs::write(input.join("broken.json"), "{ nope")?;

    let summary = dimx::run(config_for(&input, &output)).await?;
    assert_eq!(summary.documents_walked, 1);
    assert_eq!(summary.documents_skipped, 1);
    assert_eq!(summary.fact_rows, 3);

    let facts = read_csv(&output, "microservice_properties_directory")?;
    assert_eq!(facts.len(), 4, "header plus dev, qa and master");
    assert_eq!(facts[0][0], "id");
    assert_eq!(facts[0].len(), 14);
    // -- dev quota copied to qa and master, replicas kept as given
    assert!(facts[1..].iter().all(|row| row[2] == "1" && row[6] == "3"));

    let tokens = read_csv(&output, "token_directory")?;
    assert_eq!(
        tokens[1..],
        [
            vec!["1".to_string(), "dev-s3cr3t".to_string(), "payTokendev".to_string()],
            vec!["2".to_string(), "uat-s3cr3t".to_string(), "payTokenuat".to_string()],
            vec!["3".to_string(), "prd-s3cr3t".to_string(), "payTokenprd".to_string()],
        ]
    );

    let app_types = read_csv(&output, "app_type_directory")?;
    assert_eq!(app_types[1], ["1", "Web apps"]);

    let general = read_csv(&output, "app_general_properties")?;
    assert_eq!(general.len(), 4);
    assert_eq!(general[1][0], "1");
    assert_eq!(general[3][0], "3");

    let apps = read_csv(&output, "app_directory")?;
    assert_eq!(apps[1], ["1", "1", "pay-api.git", "https://git.example/payments/pay-api.git"]);

    let runtime = read_csv(&output, "runtime_directory")?;
    assert_eq!(runtime, [["id", "runtime_name", "version_path"]]);
    Ok(())
}

#[tokio::test]
async fn the_one_where_running_twice_writes_identical_tables() -> Result<()> {
    let workspace = tempfile::tempdir()?;
    let input = workspace.path().join("input");
    fs::create_dir(&input)?;
    fs::write(input.join("token.json"), "{}")?;
    fs::write(
        input.join("b-apis.json"),
        r#"{"project": [{"name": "B", "ms": [{"config": {"appName": "b1", "resQuotasmaster": {"cpuLimits": "2"}}}]}]}"#,
    )?;
    fs::write(
        input.join("a-apis.json"),
        r#"{"projects": [{"name": "A", "ms": [{"config": {"appName": "a1", "resQuotasdev": {"cpuLimits": "1"}}}]}]}"#,
    )?;

    let first = workspace.path().join("first");
    let second = workspace.path().join("second");
    dimx::run(config_for(&input, &first)).await?;
    dimx::run(config_for(&input, &second)).await?;

    for table in ["project_directory", "microservice_properties_directory", "app_general_properties"] {
        assert_eq!(read_csv(&first, table)?, read_csv(&second, table)?, "{table} drifted");
    }
    // -- sorted enumeration: a-apis.json is walked first
    assert_eq!(read_csv(&first, "project_directory")?[1], ["1", "A", ""]);
    Ok(())
}

#[tokio::test]
async fn the_one_where_a_missing_token_catalog_ends_the_run() -> Result<()> {
    let workspace = tempfile::tempdir()?;
    let input = workspace.path().join("input");
    fs::create_dir(&input)?;
    let result = dimx::run(config_for(&input, &workspace.path().join("out"))).await;
    assert!(result.is_err());
    Ok(())
}
