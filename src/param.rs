use crate::error::{PhenopermError, Result};
use crate::randomizer::{PermutationMethod, SeedMode};
use crate::ranked_list::GeneSet;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

// Field definitions and associated default values

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Param {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub template: TemplateDefinition,
    #[serde(default)]
    pub derivation: Derivation,
    #[serde(default)]
    pub permutation: Permutation,
    #[serde(default)]
    pub output: Output,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct General {
    #[serde(default = "seed_default")]
    pub seed: u64,
    #[serde(default = "seed_mode_default")]
    pub seed_mode: SeedMode,
    #[serde(default = "one_default")]
    pub thread_number: usize,
    #[serde(default = "log_base_default")]
    pub log_base: String,
    #[serde(default = "log_suffix_default")]
    pub log_suffix: String,
    #[serde(default = "log_level_default")]
    pub log_level: String,
    #[serde(default = "true_default")]
    pub display_colorful: bool,
}

/// The phenotype to permute. Exactly one of `labels` (with `class_names`), `values` or
/// `sample_groups` (with `column_names`) must be given.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TemplateDefinition {
    #[serde(default = "template_name_default")]
    pub name: String,
    #[serde(default)]
    pub class_names: Vec<String>,
    /// One label per sample, in profile order
    #[serde(default)]
    pub labels: Vec<String>,
    /// One value per sample, in profile order
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub sample_groups: Vec<GeneSet>,
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub class_of_interest: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Derivation {
    #[serde(default = "true_default")]
    pub include_original: bool,
    #[serde(default = "false_default")]
    pub only_forward_ova: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Permutation {
    #[serde(default = "n_permutations_default")]
    pub n_permutations: usize,
    #[serde(default = "permutation_method_default")]
    pub method: PermutationMethod,
    #[serde(default = "true_default")]
    pub balance_first_class: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Output {
    #[serde(default = "true_default")]
    pub print_cls: bool,
    #[serde(default = "false_default")]
    pub use_class_names: bool,
}

impl Default for General {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for TemplateDefinition {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Derivation {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Permutation {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Output {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Default for Param {
    fn default() -> Self {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }
}

impl Param {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn get(param_file: &str) -> Result<Param> {
    let param_file_reader = File::open(param_file)?;
    let param_reader = BufReader::new(param_file_reader);

    let mut config: Param = serde_yaml::from_reader(param_reader)?;

    validate(&mut config)?;

    Ok(config)
}

pub fn validate(param: &mut Param) -> Result<()> {
    if !param.general.log_base.is_empty() {
        param.general.display_colorful = false;
    }

    if param.general.thread_number == 0 {
        return Err(PhenopermError::config("thread_number must be at least 1"));
    }

    if param.permutation.n_permutations == 0 {
        warn!("n_permutations=0: templates will be derived but no null distribution generated.");
    }

    validate_template(&param.template)
}

fn validate_template(template: &TemplateDefinition) -> Result<()> {
    let sources = [
        !template.labels.is_empty(),
        !template.values.is_empty(),
        !template.sample_groups.is_empty(),
    ];
    let defined = sources.iter().filter(|&&s| s).count();
    if defined == 0 {
        return Err(PhenopermError::config(
            "template needs one of labels (with class_names), values \
             or sample_groups (with column_names)",
        ));
    }
    if defined > 1 {
        return Err(PhenopermError::config(
            "labels, values and sample_groups are mutually exclusive, \
             define the template only once",
        ));
    }

    let num_classes = if !template.labels.is_empty() {
        if template.class_names.is_empty() {
            return Err(PhenopermError::config("labels given without class_names"));
        }
        template.class_names.len()
    } else if !template.values.is_empty() {
        template.values.len()
    } else {
        if template.column_names.is_empty() {
            return Err(PhenopermError::config("sample_groups given without column_names"));
        }
        template.sample_groups.len()
    };

    if template.class_of_interest >= num_classes {
        return Err(PhenopermError::config(format!(
            "class_of_interest={} but the template has {} classes",
            template.class_of_interest, num_classes
        )));
    }

    Ok(())
}

fn seed_default() -> u64 {
    4815162342
}
fn seed_mode_default() -> SeedMode {
    SeedMode::Fixed
}
fn one_default() -> usize {
    1
}
fn log_base_default() -> String {
    "".to_string()
}
fn log_suffix_default() -> String {
    "log".to_string()
}
fn log_level_default() -> String {
    "info".to_string()
}
fn template_name_default() -> String {
    "phenotype".to_string()
}
fn n_permutations_default() -> usize {
    1000
}
fn permutation_method_default() -> PermutationMethod {
    PermutationMethod::Unconstrained
}
fn true_default() -> bool {
    true
}
fn false_default() -> bool {
    false
}
