pub mod dataset;
pub mod error;
pub mod param;
pub mod randomizer;
pub mod ranked_list;
pub mod template;
pub mod template_factory;
pub mod utils;

pub use dataset::{AddressedVector, Dataset, DatasetView, Order, ScoredDataset, SortMode};
pub use error::{PhenopermError, Result};
pub use randomizer::{PermutationMethod, RandomSeedGenerator, SeedMode};
pub use ranked_list::{GeneSet, RankedList, ScoreMode, RANK_NOT_FOUND};
pub use template::{Item, Template, TemplateBuilder, TemplateClass, TemplateKind};

use crate::param::{Derivation, Param, TemplateDefinition};
use crate::randomizer::create_random_templates;
use crate::template_factory::{
    create_categorical_template, create_continuous_template, create_template,
    extract_all_ova_templates, extract_all_pairs_templates, extract_all_possible_templates,
    extract_all_uniphasic_templates,
};
use log::{debug, info, warn};
use rayon::ThreadPoolBuilder;

/// A derived template and the random templates generated for it
#[derive(Debug, Clone)]
pub struct DerivedRun {
    pub template: Template,
    pub permutations: Vec<Template>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub template: Template,
    pub seed: u64,
    pub derived: Vec<DerivedRun>,
}

impl RunSummary {
    pub fn num_permutations(&self) -> usize {
        self.derived.iter().map(|d| d.permutations.len()).sum()
    }
}

/// Template described by the `template` section of the parameters
pub fn build_template(definition: &TemplateDefinition) -> Result<Template> {
    let template = if !definition.labels.is_empty() {
        let items = definition
            .labels
            .iter()
            .enumerate()
            .map(|(position, label)| Item::new(label.clone(), position))
            .collect();
        create_template(definition.name.clone(), items, &definition.class_names, false)?
    } else if !definition.values.is_empty() {
        create_continuous_template(definition.name.clone(), &definition.values)?
    } else if !definition.sample_groups.is_empty() {
        create_categorical_template(
            definition.name.clone(),
            &definition.column_names,
            &definition.sample_groups,
        )?
    } else {
        return Err(PhenopermError::config("no template defined"));
    };
    template.with_class_of_interest(definition.class_of_interest)
}

/// Every template to test for `template`, following the `derivation` section
pub fn enumerate_templates(template: &Template, derivation: &Derivation) -> Result<Vec<Template>> {
    if !derivation.only_forward_ova || template.is_continuous() || template.num_classes() <= 2 {
        return extract_all_possible_templates(template, derivation.include_original);
    }

    let mut templates = Vec::new();
    if derivation.include_original {
        templates.push(template.clone());
    }
    templates.extend(extract_all_pairs_templates(template)?);
    templates.extend(extract_all_ova_templates(template, true)?);
    if !template.is_aux() {
        templates.extend(extract_all_uniphasic_templates(template)?);
    }
    Ok(templates)
}

/// Whether `method` can shuffle the labels of `template`
pub fn is_permutable(template: &Template, method: PermutationMethod) -> bool {
    match method {
        PermutationMethod::Unconstrained => template.is_continuous() || template.num_classes() <= 2,
        PermutationMethod::Balanced | PermutationMethod::EqualizedAndBalanced => {
            template.is_categorical() && template.is_biphasic()
        }
    }
}

pub fn run(param: &Param) -> Result<RunSummary> {
    let start = std::time::Instant::now();
    let template = build_template(&param.template)?;
    cinfo!(param.general.display_colorful, "\x1b[2;97m{}\x1b[0m", template);

    let templates = enumerate_templates(&template, &param.derivation)?;
    cinfo!(
        param.general.display_colorful,
        "{} templates to permute from {}",
        templates.len(),
        template.name()
    );

    let mut seeds = RandomSeedGenerator::from_mode(param.general.seed_mode, param.general.seed);
    let seed = seeds.seed();
    let pool = ThreadPoolBuilder::new()
        .num_threads(param.general.thread_number)
        .build()
        .map_err(|e| {
            PhenopermError::config(format!(
                "cannot start {} threads: {}",
                param.general.thread_number, e
            ))
        })?;

    let mut derived = Vec::with_capacity(templates.len());
    for candidate in templates {
        let permutations = if param.permutation.n_permutations == 0 {
            Vec::new()
        } else if !is_permutable(&candidate, param.permutation.method) {
            warn!(
                "{} ({} classes) cannot be permuted with {:?}, skipped",
                candidate.name(),
                candidate.num_classes(),
                param.permutation.method
            );
            Vec::new()
        } else {
            pool.install(|| {
                create_random_templates(
                    param.permutation.n_permutations,
                    &candidate,
                    param.permutation.method,
                    param.permutation.balance_first_class,
                    &mut seeds,
                )
            })?
        };
        debug!("{}: {} permutations", candidate.name(), permutations.len());
        derived.push(DerivedRun {
            template: candidate,
            permutations,
        });
    }

    let summary = RunSummary { template, seed, derived };
    info!(
        "{} permutations over {} templates in {:.2}s (seed {})",
        summary.num_permutations(),
        summary.derived.len(),
        start.elapsed().as_secs_f64(),
        seed
    );
    Ok(summary)
}
