//! Random templates for building permutation null distributions.
//!
//! Nothing here touches a global RNG: every function draws from the [`RandomSeedGenerator`] it is
//! given, so the same seed always produces the same templates.

use crate::error::{PhenopermError, Result};
use crate::template::{Item, Template, TemplateBuilder, TemplateKind};
use crate::template_factory::{rebuild_continuous, require_biphasic};
use crate::utils::{random_split, randomize_without_replacement};
use chrono::Local;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Seed of the standard, reproducible stream
pub const STANDARD_SEED: u64 = 149;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Always [`STANDARD_SEED`]
    Standard,
    /// Seed taken from the clock, not reproducible
    Timestamp,
    /// `general.seed` from the parameters
    Fixed,
}

/// Constraint applied when shuffling class labels
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PermutationMethod {
    Unconstrained,
    Balanced,
    EqualizedAndBalanced,
}

/// Explicit source of randomness for permutations
#[derive(Clone, Debug)]
pub struct RandomSeedGenerator {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RandomSeedGenerator {
    pub fn new(seed: u64) -> RandomSeedGenerator {
        RandomSeedGenerator {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn standard() -> RandomSeedGenerator {
        RandomSeedGenerator::new(STANDARD_SEED)
    }

    pub fn timestamp() -> RandomSeedGenerator {
        let seed = Local::now().timestamp_millis() as u64;
        debug!("Timestamp seed {}", seed);
        RandomSeedGenerator::new(seed)
    }

    pub fn from_mode(mode: SeedMode, seed: u64) -> RandomSeedGenerator {
        match mode {
            SeedMode::Standard => RandomSeedGenerator::standard(),
            SeedMode::Timestamp => RandomSeedGenerator::timestamp(),
            SeedMode::Fixed => RandomSeedGenerator::new(seed),
        }
    }

    /// Seed this stream started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Seed for an independent child stream
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

fn random_name(template: &Template) -> String {
    format!("{}_rnd", template.name())
}

/// Template with the classes, names and flags of `template` but the class members given by
/// `groups[c]` (profile positions of class `c`)
fn relabelled(template: &Template, groups: &[Vec<usize>]) -> Result<Template> {
    let mut builder = TemplateBuilder::new(random_name(template), template.kind().clone())
        .aux(template.is_aux())
        .class_of_interest(template.class_of_interest_index());
    for (class, positions) in template.classes().iter().zip(groups.iter()) {
        let items = positions.iter().map(|&p| Item::new(class.label(), p)).collect();
        builder.add_class_with_items(class.name(), items)?;
    }
    builder.build()
}

/// Uniform permutation of `values`
pub fn randomize_vector(values: &[f64], seeds: &mut RandomSeedGenerator) -> Vec<f64> {
    randomize_without_replacement(values.len(), seeds.rng())
        .into_iter()
        .map(|i| values[i])
        .collect()
}

/// Shuffle the labels of `template` over its fixed profile positions.
///
/// Continuous templates have their values permuted across positions. Categorical templates give
/// the item at each position the class of a randomly drawn item, without replacement, so class
/// sizes are kept. Templates with more than two classes are refused.
pub fn create_random_template(
    template: &Template,
    seeds: &mut RandomSeedGenerator,
) -> Result<Template> {
    let items = template.items_ordered_by_profile_pos();
    match template.kind() {
        TemplateKind::Continuous => {
            let values = randomize_vector(&template.to_vector(), seeds);
            let pairs: Vec<(usize, f64)> = items
                .iter()
                .zip(values.into_iter())
                .map(|(item, value)| (item.profile_position(), value))
                .collect();
            rebuild_continuous(template, random_name(template), &pairs)
        }
        TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => {
            if template.num_classes() > 2 {
                return Err(PhenopermError::wrong_class_count(
                    "create_random_template",
                    "at most 2",
                    template.num_classes(),
                ));
            }
            let labels = items
                .iter()
                .map(|item| template.class_index_of_position(item.profile_position()))
                .collect::<Result<Vec<usize>>>()?;
            let permutation = randomize_without_replacement(items.len(), seeds.rng());

            let mut groups = vec![Vec::new(); template.num_classes()];
            for (item, &drawn) in items.iter().zip(permutation.iter()) {
                groups[labels[drawn]].push(item.profile_position());
            }
            relabelled(template, &groups)
        }
    }
}

/// Split the `kept` class so that half of it moves to the other class, and fill the gap with
/// members of `other`. Returns the new members of both classes; sizes are unchanged.
fn balanced_split(
    kept: &[usize],
    other: &[usize],
    rng: &mut ChaCha8Rng,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let n = kept.len();
    let mut stay = n - n / 2;
    let mut moving = n / 2;
    if moving > other.len() {
        warn!(
            "Class of size {} cannot receive {} members from a class of size {}; split clamped",
            n,
            moving,
            other.len()
        );
        moving = other.len();
        stay = n - moving;
    }
    if stay + moving != n {
        return Err(PhenopermError::UnbalancedSplit {
            expected: n,
            from_kept: stay,
            from_other: moving,
        });
    }

    let (staying, leaving) = random_split(kept, stay, rng);
    let (incoming, remaining) = random_split(other, moving, rng);

    let mut new_kept = staying;
    new_kept.extend(incoming);
    let mut new_other = leaving;
    new_other.extend(remaining);
    Ok((new_kept, new_other))
}

/// Random two-class template where the balanced class (the first one when `balance_first_class`)
/// ends up half made of its own members and half of the other class's
pub fn create_random_aux_balanced_template(
    template: &Template,
    balance_first_class: bool,
    seeds: &mut RandomSeedGenerator,
) -> Result<Template> {
    require_biphasic(template, "create_random_aux_balanced_template")?;
    let (kept, other) = if balance_first_class { (0, 1) } else { (1, 0) };
    let kept_positions = template.class(kept)?.profile_positions();
    let other_positions = template.class(other)?.profile_positions();

    let (new_kept, new_other) = balanced_split(&kept_positions, &other_positions, seeds.rng())?;
    let mut groups = vec![Vec::new(), Vec::new()];
    groups[kept] = new_kept;
    groups[other] = new_other;
    relabelled(template, &groups)
}

/// Subsample both classes to the size of the first one (or of the second when it is smaller),
/// then apply the balanced split to the first class
pub fn create_random_aux_equalized_and_balanced_template(
    template: &Template,
    seeds: &mut RandomSeedGenerator,
) -> Result<Template> {
    require_biphasic(template, "create_random_aux_equalized_and_balanced_template")?;
    let first = template.class(0)?.profile_positions();
    let second = template.class(1)?.profile_positions();

    let mut target = first.len();
    if second.len() < target {
        warn!(
            "Second class of {} has {} members, equalizing to that instead of {}",
            template.name(),
            second.len(),
            target
        );
        target = second.len();
    }

    let rng = seeds.rng();
    let (first, _) = random_split(&first, target, rng);
    let (second, _) = random_split(&second, target, rng);
    let (new_first, new_second) = balanced_split(&first, &second, rng)?;
    relabelled(template, &[new_first, new_second])
}

pub fn create_random_aux_equalized_and_balanced_templates(
    n: usize,
    template: &Template,
    seeds: &mut RandomSeedGenerator,
) -> Result<Vec<Template>> {
    create_random_templates(n, template, PermutationMethod::EqualizedAndBalanced, true, seeds)
}

/// `n` random templates. Child seeds are drawn from `seeds` up front, so the output does not
/// depend on how rayon schedules the work.
pub fn create_random_templates(
    n: usize,
    template: &Template,
    method: PermutationMethod,
    balance_first_class: bool,
    seeds: &mut RandomSeedGenerator,
) -> Result<Vec<Template>> {
    let child_seeds: Vec<u64> = (0..n).map(|_| seeds.next_seed()).collect();
    debug!("Generating {} {:?} permutations of {}", n, method, template.name());

    child_seeds
        .into_par_iter()
        .map(|seed| {
            let mut child = RandomSeedGenerator::new(seed);
            match method {
                PermutationMethod::Unconstrained => create_random_template(template, &mut child),
                PermutationMethod::Balanced => {
                    create_random_aux_balanced_template(template, balance_first_class, &mut child)
                }
                PermutationMethod::EqualizedAndBalanced => {
                    create_random_aux_equalized_and_balanced_template(template, &mut child)
                }
            }
        })
        .collect()
}
