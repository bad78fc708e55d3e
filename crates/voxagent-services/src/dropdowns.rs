//! Option lists for the agent form's dropdowns.

use serde::Serialize;
use voxagent_core::{ApiError, ApiResult, CatalogService, Language, Model, Prompt, Voice};

/// The four catalog lists, each loaded independently.
#[derive(Debug)]
pub struct DropdownOptions {
    pub languages: ApiResult<Vec<Language>>,
    pub voices: ApiResult<Vec<Voice>>,
    pub prompts: ApiResult<Vec<Prompt>>,
    pub models: ApiResult<Vec<Model>>,
}

/// Loaded lists, with failed ones left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadedDropdowns {
    pub languages: Vec<Language>,
    pub voices: Vec<Voice>,
    pub prompts: Vec<Prompt>,
    pub models: Vec<Model>,
}

impl DropdownOptions {
    /// `(list name, error)` for every list that failed to load.
    pub fn failures(&self) -> Vec<(&'static str, &ApiError)> {
        [
            ("languages", self.languages.as_ref().err()),
            ("voices", self.voices.as_ref().err()),
            ("prompts", self.prompts.as_ref().err()),
            ("models", self.models.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(list, err)| err.map(|err| (list, err)))
        .collect()
    }

    pub fn loaded(&self) -> LoadedDropdowns {
        LoadedDropdowns {
            languages: self.languages.clone().unwrap_or_default(),
            voices: self.voices.clone().unwrap_or_default(),
            prompts: self.prompts.clone().unwrap_or_default(),
            models: self.models.clone().unwrap_or_default(),
        }
    }
}

/// Fetch all four lists concurrently.
pub async fn load_dropdowns(catalog: &dyn CatalogService) -> DropdownOptions {
    let (languages, voices, prompts, models) = futures::join!(
        catalog.languages(),
        catalog.voices(),
        catalog.prompts(),
        catalog.models()
    );

    let options = DropdownOptions {
        languages,
        voices,
        prompts,
        models,
    };
    for (list, err) in options.failures() {
        tracing::warn!(list = list, error = %err, "Failed to load dropdown options");
    }
    options
}
