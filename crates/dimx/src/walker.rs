//! 🚶 The document walker: documents → projects → microservices → environments.
//!
//! 🎬 COLD OPEN. INT. A FOLDER OF JSON FILES. THE NIGHT BEFORE THE DATABASE LOAD
//!
//! Every file has projects. Every project has microservices (`ms`). Every
//! microservice has a `config` that may be an object, a string holding an object,
//! or a disappointment. For each microservice we resolve its dimension ids, then
//! visit `dev`, `qa` and `master` in that order. Any environment that ends up with
//! a quota after fallback produces one fact row and one general-properties row.
//!
//! 🧠 Knowledge graph:
//! - [`Dimensions`] is created once per run and handed to the walker. All
//!   surrogate ids live there; nothing is global.
//! - Fact rows are keyed by their natural key `(file, project, app, env)`.
//! - A document that fails to parse is logged and skipped. The walk goes on. 🦆

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::app_types::AppTypeIndex;
use crate::catalogs::{BoolCatalog, PIPELINE_FIELDS};
use crate::common::RawDocument;
use crate::environment::Environment;
use crate::ids::SurrogateIds;
use crate::keys::{ConfigAccessor, ConfigBlock, truthy};
use crate::quotas::{Quota, QuotaSet};
use crate::tokens::{ResolvedToken, TokenCatalog};

/// 🏷️ Usage assumed when a microservice does not declare one.
pub const DEFAULT_USAGE: &str = "internal";

/// 🌳 Root keys that may hold a document's project list, walked in this order.
pub const PROJECT_ROOT_KEYS: [&str; 2] = ["projects", "project"];

/// 🗃️ Every dimension of the star schema, with its id allocator.
#[derive(Debug, Clone)]
pub struct Dimensions {
    pub projects: SurrogateIds<String>,
    pub app_names: SurrogateIds<String>,
    /// keyed by (app name id, repository url)
    pub app_directories: SurrogateIds<(u64, String)>,
    pub environments: SurrogateIds<String>,
    pub countries: SurrogateIds<String>,
    pub labels: SurrogateIds<String>,
    pub usages: SurrogateIds<String>,
    pub images: SurrogateIds<String>,
    pub paths: SurrogateIds<String>,
    pub app_types: SurrogateIds<String>,
    pub tokens: SurrogateIds<ResolvedToken>,
    pub openshift: BoolCatalog,
    pub pipeline: BoolCatalog,
}

impl Dimensions {
    pub fn new() -> Self {
        Self {
            projects: SurrogateIds::new(),
            app_names: SurrogateIds::new(),
            app_directories: SurrogateIds::new(),
            environments: SurrogateIds::new(),
            countries: SurrogateIds::new(),
            labels: SurrogateIds::new(),
            usages: SurrogateIds::new(),
            images: SurrogateIds::new(),
            paths: SurrogateIds::new(),
            app_types: SurrogateIds::new(),
            tokens: SurrogateIds::new(),
            openshift: BoolCatalog::openshift(),
            pipeline: BoolCatalog::pipeline(),
        }
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new()
    }
}

/// 🔑 What makes a fact row itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub file: String,
    pub project: String,
    pub app_name: String,
    pub env: Environment,
}

/// 📊 One microservice in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRow {
    pub id: u64,
    pub natural_key: NaturalKey,
    pub id_usage: u64,
    pub quota: Quota,
    pub id_token: Option<u64>,
    pub id_openshift: u64,
    pub id_path: Option<u64>,
    pub drs_enabled: Option<bool>,
    pub id_image: Option<u64>,
    pub token: ResolvedToken,
}

/// 📋 The descriptive twin of a fact row, pointing at the same dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralRow {
    pub id: u64,
    pub id_project: u64,
    pub id_app_directory: u64,
    pub id_env: u64,
    pub id_country: u64,
    pub id_label: u64,
    pub id_app_type: Option<u64>,
    pub id_pipeline: u64,
    pub id_microservice: u64,
    pub project_name: String,
    pub app_name: String,
    pub repository_url: String,
    pub build_configuration_mode: String,
    pub env: Environment,
    pub country: String,
    pub label: String,
    pub project: String,
    pub base_image_version: String,
}

/// 🏁 How a single document went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOutcome {
    Walked { fact_rows: usize },
    Skipped,
}

/// 📦 Everything the walk produced, ready for the table writer.
#[derive(Debug, Clone)]
pub struct WalkOutput {
    pub dimensions: Dimensions,
    pub facts: Vec<FactRow>,
    pub general: Vec<GeneralRow>,
    pub documents_walked: usize,
    pub documents_skipped: usize,
}

/// 🧾 Per-microservice attributes shared by all of its environments.
struct MicroserviceProfile {
    project_name: String,
    id_project: u64,
    app_name: String,
    id_app_directory: u64,
    repository_url: String,
    build_configuration_mode: String,
    country: String,
    id_country: u64,
    label: String,
    id_label: u64,
    usage: String,
    base_image_version: String,
    mount_path: String,
    project: String,
    token_base: String,
    openshift_flags: [bool; 3],
    pipeline_gates: [bool; 4],
    drs_enabled: Option<bool>,
}

/// 🚶 Walks documents and accumulates fact rows against a run's [`Dimensions`].
#[derive(Debug)]
pub struct DocumentWalker<'a> {
    dimensions: Dimensions,
    tokens: &'a TokenCatalog,
    app_types: AppTypeIndex,
    fact_ids: SurrogateIds<NaturalKey>,
    facts: Vec<FactRow>,
    general: Vec<GeneralRow>,
    documents_walked: usize,
    documents_skipped: usize,
}

impl<'a> DocumentWalker<'a> {
    /// 🚀 Set up a walk. App types are allocated up front from the candidate
    /// file names, so their ids follow file order rather than row order.
    pub fn new(mut dimensions: Dimensions, tokens: &'a TokenCatalog, app_types: AppTypeIndex) -> Self {
        for app_type in app_types.app_types() {
            dimensions.app_types.get_or_create_str(app_type);
        }
        Self {
            dimensions,
            tokens,
            app_types,
            fact_ids: SurrogateIds::new(),
            facts: Vec::new(),
            general: Vec::new(),
            documents_walked: 0,
            documents_skipped: 0,
        }
    }

    /// 📄 Parse and walk one document. Parse failures are logged, never fatal.
    pub fn walk_document(&mut self, document: &RawDocument) -> DocumentOutcome {
        let parsed = match parse_document(document) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("⚠️ skipping {}: {:#}", document.name, err);
                self.documents_skipped += 1;
                return DocumentOutcome::Skipped;
            }
        };

        let before = self.facts.len();
        for root_key in PROJECT_ROOT_KEYS {
            // -- exact key match at the root, unlike everything below it
            match parsed.get(root_key) {
                Some(Value::Array(projects)) => {
                    for project in projects {
                        self.walk_project(&document.name, project);
                    }
                }
                Some(_) => warn!("⚠️ {}: `{}` is not a list, ignoring it", document.name, root_key),
                None => {}
            }
        }

        self.documents_walked += 1;
        DocumentOutcome::Walked {
            fact_rows: self.facts.len() - before,
        }
    }

    fn walk_project(&mut self, file: &str, project: &Value) {
        let fields = ConfigAccessor::of(project);
        let project_name = fields.text("name").unwrap_or_default();
        let id_project = self.dimensions.projects.get_or_create_str(&project_name);

        for microservice in fields.list("ms") {
            if !microservice.is_object() {
                warn!("⚠️ {}: project '{}' has a non-object `ms` entry, skipping it", file, project_name);
                continue;
            }
            self.walk_microservice(file, &project_name, id_project, microservice);
        }
    }

    fn walk_microservice(&mut self, file: &str, project_name: &str, id_project: u64, microservice: &Value) {
        let fields = ConfigAccessor::of(microservice);
        let origin = format!("{}/{}", file, project_name);
        let config_block = ConfigBlock::decode(fields.get("config"), &origin);
        let config = config_block.accessor();

        let profile = self.profile(project_name, id_project, &fields, &config);
        let quotas = QuotaSet::resolve(&config);

        for env in Environment::ALL {
            let id_env = self.dimensions.environments.get_or_create_str(env.tag());
            let token = self.tokens.resolve(&profile.token_base, env);
            if let Some(quota) = quotas.get(env) {
                self.emit(file, &profile, env, id_env, quota.clone(), token);
            }
        }
    }

    fn profile(
        &mut self,
        project_name: &str,
        id_project: u64,
        fields: &ConfigAccessor<'_>,
        config: &ConfigAccessor<'_>,
    ) -> MicroserviceProfile {
        let dims = &mut self.dimensions;

        let app_name = config.text("appName").unwrap_or_default();
        let id_app_name = dims.app_names.get_or_create_str(&app_name);
        let repository_url = fields.text("repositoryUrl").unwrap_or_default();
        let id_app_directory = dims
            .app_directories
            .get_or_create((id_app_name, repository_url.clone()));
        let country = config.text("country").unwrap_or_default();
        let id_country = dims.countries.get_or_create_str(&country);
        let label = config
            .text("ocpLabel")
            .or_else(|| config.text("label"))
            .unwrap_or_default();
        let id_label = dims.labels.get_or_create_str(&label);

        let mount_path = config
            .list("volumes")
            .first()
            .and_then(|volume| ConfigAccessor::of(volume).text("mountPath"))
            .unwrap_or_default();

        let openshift_flags = [
            any_flagged(config.list("secrets"), "secret"),
            any_flagged(config.list("configMaps"), "configMap"),
            any_flagged(config.list("volumes"), "volume"),
        ];
        let pipeline_gates =
            PIPELINE_FIELDS.map(|gate| config.flag(gate).or_else(|| fields.flag(gate)).unwrap_or(true));

        MicroserviceProfile {
            project_name: project_name.to_string(),
            id_project,
            app_name,
            id_app_directory,
            repository_url,
            build_configuration_mode: fields.text("buildConfigurationMode").unwrap_or_default(),
            country,
            id_country,
            label,
            id_label,
            usage: config.text("usage").unwrap_or_else(|| DEFAULT_USAGE.to_string()),
            base_image_version: config.text("baseImageVersion").unwrap_or_default(),
            mount_path,
            project: config.text("project").unwrap_or_default(),
            token_base: fields.text("tokenOcp").unwrap_or_default(),
            openshift_flags,
            pipeline_gates,
            drs_enabled: config.flag("drsEnabled"),
        }
    }

    fn emit(
        &mut self,
        file: &str,
        profile: &MicroserviceProfile,
        env: Environment,
        id_env: u64,
        quota: Quota,
        token: ResolvedToken,
    ) {
        let natural_key = NaturalKey {
            file: file.to_string(),
            project: profile.project_name.clone(),
            app_name: profile.app_name.clone(),
            env,
        };
        if self.fact_ids.contains(&natural_key) {
            warn!(
                "⚠️ {} already has a fact row for {}/{}/{}, keeping the first one",
                file, profile.project_name, profile.app_name, env
            );
            return;
        }
        let id = self.fact_ids.get_or_create(natural_key.clone());

        let dims = &mut self.dimensions;
        let id_usage = dims.usages.get_or_create_str(&profile.usage);
        let id_image = non_empty(&profile.base_image_version).map(|image| dims.images.get_or_create_str(image));
        let id_path = non_empty(&profile.mount_path).map(|path| dims.paths.get_or_create_str(path));
        let id_token = (!token.is_empty()).then(|| dims.tokens.get_or_create(token.clone()));
        // -- both catalogs are exhaustive, a miss means the flag arrays changed width
        let id_openshift = dims.openshift.id_of(&profile.openshift_flags).unwrap_or(1);
        let id_pipeline = dims.pipeline.id_of(&profile.pipeline_gates).unwrap_or(1);
        let id_app_type = self
            .app_types
            .for_project(&profile.project_name)
            .and_then(|app_type| dims.app_types.get(&app_type.to_string()));

        self.facts.push(FactRow {
            id,
            natural_key,
            id_usage,
            quota,
            id_token,
            id_openshift,
            id_path,
            drs_enabled: profile.drs_enabled,
            id_image,
            token,
        });

        let general_id = self.general.len() as u64 + 1;
        self.general.push(GeneralRow {
            id: general_id,
            id_project: profile.id_project,
            id_app_directory: profile.id_app_directory,
            id_env,
            id_country: profile.id_country,
            id_label: profile.id_label,
            id_app_type,
            id_pipeline,
            id_microservice: id,
            project_name: profile.project_name.clone(),
            app_name: profile.app_name.clone(),
            repository_url: profile.repository_url.clone(),
            build_configuration_mode: profile.build_configuration_mode.clone(),
            env,
            country: profile.country.clone(),
            label: profile.label.clone(),
            project: profile.project.clone(),
            base_image_version: profile.base_image_version.clone(),
        });
    }

    /// 🏁 Hand over everything that was accumulated.
    pub fn finish(self) -> WalkOutput {
        WalkOutput {
            dimensions: self.dimensions,
            facts: self.facts,
            general: self.general,
            documents_walked: self.documents_walked,
            documents_skipped: self.documents_skipped,
        }
    }
}

fn parse_document(document: &RawDocument) -> Result<Value> {
    let parsed: Value = serde_json::from_str(&document.content)
        .with_context(|| format!("💀 '{}' is not valid JSON", document.name))?;
    anyhow::ensure!(
        parsed.is_object(),
        "💀 '{}' is valid JSON but not an object, so it has no projects",
        document.name
    );
    Ok(parsed)
}

/// ✅ True when any element carries a truthy `flag` of its own.
fn any_flagged(items: &[Value], flag: &str) -> bool {
    items
        .iter()
        .any(|item| ConfigAccessor::of(item).get(flag).is_some_and(truthy))
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() { None } else { Some(text) }
}
