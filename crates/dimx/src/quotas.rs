//! 📏 Resource quotas and the fallback rules that fill the gaps.
//!
//! Each microservice declares quotas per environment under `resQuotas<env>`
//! (any casing). A quota is an object, or a list whose first element is the quota.
//!
//! Fallback is applied once per microservice and is intentionally lopsided:
//! - only `master` present → `dev` and `qa` copy `master`
//! - only `dev` present → `qa` and `master` copy `dev`
//! - only `qa` present → nothing is copied; `dev` and `master` stay empty
//!
//! An environment that still has no quota afterwards emits no fact row.

use serde_json::{Map, Value};

use crate::environment::Environment;
use crate::keys::{ConfigAccessor, truthy, value_text};

/// 📦 One environment's quota, already flattened to cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
    pub cpu_limits: String,
    pub cpu_request: String,
    pub memory_limits: String,
    pub memory_request: String,
    pub replicas: String,
}

impl Quota {
    fn from_object(object: &Map<String, Value>) -> Self {
        let fields = ConfigAccessor::new(object);
        let cell = |key: &str| fields.get(key).map(value_text).unwrap_or_default();
        let replicas = match fields.get("replicas") {
            None | Some(Value::Null) => "1".to_string(),
            Some(value) => value_text(value),
        };
        Self {
            cpu_limits: cell("cpuLimits"),
            cpu_request: cell("cpuRequest"),
            memory_limits: cell("memoryLimits"),
            memory_request: cell("memoryRequest"),
            replicas,
        }
    }

    /// 🔍 Interpret a raw `resQuotas<env>` value. Falsy values and lists whose
    /// head is not an object count as "no quota".
    pub fn from_value(value: &Value) -> Option<Self> {
        if !truthy(value) {
            return None;
        }
        match value {
            Value::Object(object) => Some(Self::from_object(object)),
            Value::Array(items) => match items.first() {
                Some(Value::Object(object)) => Some(Self::from_object(object)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// 🗂️ Quotas for all three environments of one microservice, after fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaSet {
    slots: [Option<Quota>; 3],
}

impl QuotaSet {
    /// 🔧 Read every `resQuotas<env>` and apply the fallback rules.
    pub fn resolve(config: &ConfigAccessor<'_>) -> Self {
        let mut slots: [Option<Quota>; 3] = Default::default();
        for env in Environment::ALL {
            slots[env.index()] = config
                .get(&format!("resQuotas{}", env.tag()))
                .and_then(Quota::from_value);
        }
        let mut set = Self { slots };
        set.apply_fallback();
        set
    }

    fn apply_fallback(&mut self) {
        let [dev, qa, master] = &mut self.slots;
        match (dev.is_some(), qa.is_some(), master.is_some()) {
            (false, false, true) => {
                *dev = master.clone();
                *qa = master.clone();
            }
            (true, false, false) => {
                *qa = dev.clone();
                *master = dev.clone();
            }
            // -- qa-only keeps its neighbours empty, as it always has
            _ => {}
        }
    }

    pub fn get(&self, env: Environment) -> Option<&Quota> {
        self.slots[env.index()].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(raw: Value) -> QuotaSet {
        QuotaSet::resolve(&ConfigAccessor::of(&raw))
    }

    #[test]
    fn the_one_where_master_lends_its_quota_to_everyone() {
        let set = resolve(json!({
            "resQuotasmaster": [{ "cpuLimits": "500m", "replicas": 2 }]
        }));
        let master = set.get(Environment::Master).expect("master quota").clone();
        assert_eq!(master.cpu_limits, "500m");
        assert_eq!(master.replicas, "2");
        assert_eq!(set.get(Environment::Dev), Some(&master));
        assert_eq!(set.get(Environment::Qa), Some(&master));
    }

    #[test]
    fn the_one_where_dev_lends_its_quota_upstream() {
        let set = resolve(json!({
            "ResQuotasDev": { "cpuRequest": "100m", "memoryLimits": "1Gi" }
        }));
        let dev = set.get(Environment::Dev).expect("dev quota").clone();
        assert_eq!(dev.replicas, "1", "replicas default to 1");
        assert_eq!(set.get(Environment::Qa), Some(&dev));
        assert_eq!(set.get(Environment::Master), Some(&dev));
    }

    #[test]
    fn the_one_where_qa_alone_gets_no_help() {
        let set = resolve(json!({ "resQuotasqa": { "cpuLimits": "1" } }));
        assert!(set.get(Environment::Qa).is_some());
        assert!(set.get(Environment::Dev).is_none());
        assert!(set.get(Environment::Master).is_none());
    }

    #[test]
    fn the_one_where_dev_and_master_both_exist_and_qa_stays_empty() {
        let set = resolve(json!({
            "resQuotasdev": { "cpuLimits": "1" },
            "resQuotasmaster": { "cpuLimits": "2" }
        }));
        assert_eq!(set.get(Environment::Dev).map(|q| q.cpu_limits.as_str()), Some("1"));
        assert!(set.get(Environment::Qa).is_none());
        assert_eq!(set.get(Environment::Master).map(|q| q.cpu_limits.as_str()), Some("2"));
    }

    #[test]
    fn the_one_where_empty_quotas_do_not_count() {
        let set = resolve(json!({
            "resQuotasdev": [],
            "resQuotasqa": {},
            "resQuotasmaster": ["not an object"]
        }));
        assert!(set.is_empty());
    }
}
