//! 🗂️ The relational schema and the step that turns a walk into tables.
//!
//! Column order is fixed by the target database and does not care about our
//! feelings. Every table is produced on every run, including the ones nobody
//! populates yet; those go out with headers only so the loader finds a file.
//!
//! The two boolean catalogs (OpenShift features, pipeline gates) are rebuilt
//! from scratch each run. They are not carried over from previous output.

use crate::common::Table;
use crate::ids::SurrogateIds;
use crate::keys::bool_text;
use crate::walker::{FactRow, GeneralRow, WalkOutput};

pub const PROJECT_DIRECTORY: &[&str] = &["id", "project_name", "project_acronym"];
pub const APPNAME_DIRECTORY: &[&str] = &["id", "app"];
pub const APP_DIRECTORY: &[&str] = &["id", "id_appname", "repo_name", "repo_url"];
pub const ENV_DIRECTORY: &[&str] = &["id", "env"];
pub const COUNTRY_DIRECTORY: &[&str] = &["id", "country"];
pub const LABEL_DIRECTORY: &[&str] = &["id", "app_label"];
pub const APP_TYPE_DIRECTORY: &[&str] = &["id", "app_type"];
pub const PIPELINE_PROPERTIES_DIRECTORY: &[&str] =
    &["id", "securitygate", "unittests", "sonarqube", "qualitygate"];
pub const RUNTIME_DIRECTORY: &[&str] = &["id", "runtime_name", "version_path"];
pub const PERSON_IN_CHARGE: &[&str] = &["id", "nombre", "email"];
pub const SECURITY_CHAMPION: &[&str] = &["id", "nombre", "email"];
pub const TOKEN_DIRECTORY: &[&str] = &["id", "token", "namespace_name"];
pub const OPENSHIFT_PROPERTIES_DIRECTORY: &[&str] =
    &["id", "secrets_enabled", "configmap_enabled", "volume_enabled"];
pub const USAGE_DIRECTORY: &[&str] = &["id", "usage"];
pub const IMAGE_DIRECTORY: &[&str] = &["id", "image_name"];
pub const PATH_DIRECTORY: &[&str] = &["id", "volume_path"];
pub const MICROSERVICE_PROPERTIES_DIRECTORY: &[&str] = &[
    "id",
    "id_usage_directory",
    "cpulimits",
    "cpurequest",
    "memorylimits",
    "memoryrequest",
    "replicas",
    "id_token_directory",
    "id_openshift_properties_directory",
    "id_path_directory",
    "drs_enabled",
    "id_image_directory",
    "token",
    "tokenOcp",
];
pub const DATASTAGE_PROPERTIES_DIRECTORY: &[&str] = &["id"];
pub const DATABASE_PROPERTIES_DIRECTORY: &[&str] = &["id"];
pub const WAS_PROPERTIES_DIRECTORY: &[&str] = &["id", "host", "instance_name", "context_root"];
pub const PIMS_PROPERTIES_DIRECTORY: &[&str] = &["id", "nexus_url"];
pub const APP_GENERAL_PROPERTIES: &[&str] = &[
    "id",
    "id_project_directory",
    "id_app_directory",
    "id_person_in_charge",
    "id_security_champion",
    "id_env_directory",
    "id_country_directory",
    "id_label_directory",
    "id_app_type_directory",
    "id_pipeline_properties_directory",
    "id_runtime_directory",
    "sonarqubepath_exec",
    "id_microservice_directory",
    "id_datastage_properties_directory",
    "id_database_properties_directory",
    "id_was_properties_directory",
    "id_pims_properties_directory",
    "project_name",
    "appName",
    "repositoryUrl",
    "buildConfigurationMode",
    "env",
    "country",
    "ocpLabel",
    "project",
    "baseImageVersion",
];

/// 📜 Every table, by name and header, in the order they are written.
pub const SCHEMA: &[(&str, &[&str])] = &[
    ("project_directory", PROJECT_DIRECTORY),
    ("appname_directory", APPNAME_DIRECTORY),
    ("app_directory", APP_DIRECTORY),
    ("env_directory", ENV_DIRECTORY),
    ("country_directory", COUNTRY_DIRECTORY),
    ("label_directory", LABEL_DIRECTORY),
    ("app_type_directory", APP_TYPE_DIRECTORY),
    ("pipeline_properties_directory", PIPELINE_PROPERTIES_DIRECTORY),
    ("runtime_directory", RUNTIME_DIRECTORY),
    ("person_in_charge", PERSON_IN_CHARGE),
    ("security_champion", SECURITY_CHAMPION),
    ("token_directory", TOKEN_DIRECTORY),
    ("openshift_properties_directory", OPENSHIFT_PROPERTIES_DIRECTORY),
    ("usage_directory", USAGE_DIRECTORY),
    ("image_directory", IMAGE_DIRECTORY),
    ("path_directory", PATH_DIRECTORY),
    ("microservice_properties_directory", MICROSERVICE_PROPERTIES_DIRECTORY),
    ("datastage_properties_directory", DATASTAGE_PROPERTIES_DIRECTORY),
    ("database_properties_directory", DATABASE_PROPERTIES_DIRECTORY),
    ("was_properties_directory", WAS_PROPERTIES_DIRECTORY),
    ("pims_properties_directory", PIMS_PROPERTIES_DIRECTORY),
    ("app_general_properties", APP_GENERAL_PROPERTIES),
];

/// 🏗️ Render a finished walk into the full table set, in [`SCHEMA`] order.
pub fn build_tables(output: &WalkOutput) -> Vec<Table> {
    let dims = &output.dimensions;
    SCHEMA
        .iter()
        .map(|&(name, headers)| {
            let rows = match name {
                "project_directory" => dims
                    .projects
                    .iter()
                    .map(|(project, id)| vec![id.to_string(), project.clone(), String::new()])
                    .collect(),
                "appname_directory" => value_rows(&dims.app_names),
                "app_directory" => dims
                    .app_directories
                    .iter()
                    .map(|((id_appname, repo_url), id)| {
                        vec![
                            id.to_string(),
                            id_appname.to_string(),
                            repo_name(repo_url).to_string(),
                            repo_url.clone(),
                        ]
                    })
                    .collect(),
                "env_directory" => value_rows(&dims.environments),
                "country_directory" => value_rows(&dims.countries),
                "label_directory" => value_rows(&dims.labels),
                "app_type_directory" => value_rows(&dims.app_types),
                "pipeline_properties_directory" => dims.pipeline.records(),
                "token_directory" => dims
                    .tokens
                    .iter()
                    .map(|(token, id)| vec![id.to_string(), token.secret.clone(), token.key.clone()])
                    .collect(),
                "openshift_properties_directory" => dims.openshift.records(),
                "usage_directory" => value_rows(&dims.usages),
                "image_directory" => value_rows(&dims.images),
                "path_directory" => value_rows(&dims.paths),
                "microservice_properties_directory" => output.facts.iter().map(fact_record).collect(),
                "app_general_properties" => output.general.iter().map(general_record).collect(),
                // -- no source data feeds these yet, headers only
                _ => Vec::new(),
            };
            Table::new(name, headers).with_rows(rows)
        })
        .collect()
}

/// 📎 Last path segment of a repository url, e.g. `http://x/svc1.git` → `svc1.git`.
pub fn repo_name(repo_url: &str) -> &str {
    repo_url.rsplit('/').next().unwrap_or_default()
}

fn value_rows(ids: &SurrogateIds<String>) -> Vec<Vec<String>> {
    ids.iter()
        .map(|(value, id)| vec![id.to_string(), value.clone()])
        .collect()
}

fn optional_id(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn fact_record(fact: &FactRow) -> Vec<String> {
    vec![
        fact.id.to_string(),
        fact.id_usage.to_string(),
        fact.quota.cpu_limits.clone(),
        fact.quota.cpu_request.clone(),
        fact.quota.memory_limits.clone(),
        fact.quota.memory_request.clone(),
        fact.quota.replicas.clone(),
        optional_id(fact.id_token),
        fact.id_openshift.to_string(),
        optional_id(fact.id_path),
        fact.drs_enabled.map(|flag| bool_text(flag).to_string()).unwrap_or_default(),
        optional_id(fact.id_image),
        fact.token.secret.clone(),
        fact.token.key.clone(),
    ]
}

fn general_record(row: &GeneralRow) -> Vec<String> {
    vec![
        row.id.to_string(),
        row.id_project.to_string(),
        row.id_app_directory.to_string(),
        String::new(),
        String::new(),
        row.id_env.to_string(),
        row.id_country.to_string(),
        row.id_label.to_string(),
        optional_id(row.id_app_type),
        row.id_pipeline.to_string(),
        String::new(),
        String::new(),
        row.id_microservice.to_string(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        row.project_name.clone(),
        row.app_name.clone(),
        row.repository_url.clone(),
        row.build_configuration_mode.clone(),
        row.env.tag().to_string(),
        row.country.clone(),
        row.label.clone(),
        row.project.clone(),
        row.base_image_version.clone(),
    ]
}
