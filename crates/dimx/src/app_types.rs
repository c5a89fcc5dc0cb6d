//! 🏷️ App types, inferred from how the input files are named.
//!
//! Input documents follow `<country>-<appType>.json`, e.g. `co-micro_services.json`
//! → `Micro services`. The segment after the first hyphen is the app type,
//! underscores become spaces, and it is capitalised (first letter up, rest down).
//!
//! A general-properties row finds its app type by taking the first word of its
//! project name and picking the first candidate file whose name contains it. 🦆

/// 🔎 App type encoded in a document file name, if the name follows the pattern.
pub fn app_type_from_file_name(file_name: &str) -> Option<String> {
    if !file_name.ends_with(".json") {
        return None;
    }
    let segment = file_name.split('-').nth(1)?;
    let app_type = capitalize(&segment.replace(".json", "").replace('_', " "));
    if app_type.is_empty() { None } else { Some(app_type) }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// 📇 Candidate file names paired with the app type each one encodes, in walk order.
#[derive(Debug, Clone, Default)]
pub struct AppTypeIndex {
    candidates: Vec<(String, Option<String>)>,
}

impl AppTypeIndex {
    pub fn new<I, S>(file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates = file_names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let app_type = app_type_from_file_name(&name);
                (name, app_type)
            })
            .collect();
        Self { candidates }
    }

    /// 📜 Every app type in candidate order, duplicates included. Callers dedupe via ids.
    pub fn app_types(&self) -> impl Iterator<Item = &str> {
        self.candidates
            .iter()
            .filter_map(|(_, app_type)| app_type.as_deref())
    }

    /// 🎯 App type for a project, matched through the first word of its name.
    pub fn for_project(&self, project_name: &str) -> Option<&str> {
        let first_word = project_name.split_whitespace().next()?;
        self.candidates
            .iter()
            .filter(|(name, _)| name.contains(first_word))
            .find_map(|(_, app_type)| app_type.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_file_names_confess_their_app_type() {
        assert_eq!(
            app_type_from_file_name("Argentina-MICROSERVICES.json").as_deref(),
            Some("Microservices")
        );
        assert_eq!(
            app_type_from_file_name("co-batch_jobs.json").as_deref(),
            Some("Batch jobs")
        );
        assert_eq!(
            app_type_from_file_name("co-web-legacy.json").as_deref(),
            Some("Web"),
            "only the segment after the first hyphen counts"
        );
        assert_eq!(app_type_from_file_name("nohyphen.json"), None);
        assert_eq!(app_type_from_file_name("co-web.yaml"), None);
        assert_eq!(app_type_from_file_name("co-.json"), None);
    }

    #[test]
    fn the_one_where_projects_find_their_file_by_first_word() {
        let index = AppTypeIndex::new(["README.json", "Peru-apis.json", "Argentina-MICROSERVICES.json"]);
        assert_eq!(index.for_project("Argentina Payments"), Some("Microservices"));
        assert_eq!(index.for_project("Peru"), Some("Apis"));
        assert_eq!(index.for_project("Chile Core"), None);
        assert_eq!(index.for_project(""), None);
        assert_eq!(index.app_types().collect::<Vec<_>>(), vec!["Apis", "Microservices"]);
    }

    #[test]
    fn the_one_where_a_match_without_an_app_type_keeps_looking() {
        let index = AppTypeIndex::new(["Argentina.json", "Argentina-web.json"]);
        assert_eq!(index.for_project("Argentina"), Some("Web"));
    }
}
