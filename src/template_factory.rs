//! Assembly of templates from parsed labels, and derivation of the auxiliary templates a
//! multi-class phenotype gives rise to. Every function returns freshly built templates that share
//! nothing with their inputs.

use crate::dataset::{Dataset, DatasetView};
use crate::error::{PhenopermError, Result};
use crate::ranked_list::GeneSet;
use crate::template::{Item, Template, TemplateBuilder, TemplateClass, TemplateKind, AUX_SEPARATOR};
use log::{debug, info};
use std::borrow::Cow;
use std::collections::HashMap;

/// Name of the pooled class in one-versus-all templates, unless a class already uses it
pub const REST_CLASS: &str = "REST";

/// Assemble a template from labelled items.
///
/// Categorical: items are sorted by profile position, their distinct ids collected in order of
/// first appearance, and the i-th distinct id bound to the i-th class name. The class order
/// supplied therefore fixes the meaning of each class regardless of the label text.
///
/// Continuous: one class per item, the i-th item by profile position going to the i-th class.
pub fn create_template(
    name: impl Into<String>,
    items: Vec<Item>,
    class_names: &[String],
    continuous: bool,
) -> Result<Template> {
    let name = name.into();
    if items.is_empty() {
        return Err(PhenopermError::empty(format!("items of template {}", name)));
    }
    if class_names.is_empty() {
        return Err(PhenopermError::empty(format!("classes of template {}", name)));
    }

    let mut items = items;
    items.sort_by_key(|item| item.profile_position());
    if let Some(pair) = items
        .windows(2)
        .find(|w| w[0].profile_position() == w[1].profile_position())
    {
        return Err(PhenopermError::DuplicateProfilePosition {
            template: name,
            position: pair[0].profile_position(),
        });
    }

    let aux = name.contains(AUX_SEPARATOR);
    if continuous {
        if items.len() != class_names.len() {
            return Err(PhenopermError::ContinuousMismatch {
                template: name,
                items: items.len(),
                classes: class_names.len(),
            });
        }
        let mut builder = TemplateBuilder::new(name, TemplateKind::Continuous).aux(aux);
        for (item, class_name) in items.into_iter().zip(class_names.iter()) {
            builder.add_class_with_items(class_name.clone(), vec![item])?;
        }
        return builder.build();
    }

    let mut distinct_ids: Vec<String> = Vec::new();
    for item in &items {
        if !distinct_ids.iter().any(|id| id == item.id()) {
            distinct_ids.push(item.id().to_string());
        }
    }
    if distinct_ids.len() != class_names.len() {
        return Err(PhenopermError::ClassCountMismatch {
            template: name,
            distinct_ids: distinct_ids.len(),
            classes: class_names.len(),
        });
    }

    let mut builder = TemplateBuilder::new(name, TemplateKind::Categorical).aux(aux);
    for class_name in class_names {
        builder.add_class(class_name.clone())?;
    }
    let binding: HashMap<&str, usize> = distinct_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();
    for item in &items {
        builder.add_item(binding[item.id()], item.clone())?;
    }
    builder.build()
}

/// One class per sample group; profile positions are the indices of the samples in
/// `all_column_names`
pub fn create_categorical_template(
    name: impl Into<String>,
    all_column_names: &[String],
    sample_groups: &[GeneSet],
) -> Result<Template> {
    let name = name.into();
    if sample_groups.is_empty() {
        return Err(PhenopermError::empty(format!("sample groups of template {}", name)));
    }

    let mut column_index: HashMap<&str, usize> = HashMap::new();
    for (i, column) in all_column_names.iter().enumerate() {
        column_index.entry(column.as_str()).or_insert(i);
    }

    let aux = name.contains(AUX_SEPARATOR);
    let kind = TemplateKind::FromSampleNames {
        column_names: all_column_names.to_vec(),
    };
    let mut builder = TemplateBuilder::new(name, kind).aux(aux);
    for group in sample_groups {
        let class = builder.add_class(group.name())?;
        for sample in group.members() {
            let position = column_index
                .get(sample.as_str())
                .copied()
                .ok_or_else(|| PhenopermError::UnknownSample { name: sample.clone() })?;
            builder.add_item(class, Item::new(group.name(), position))?;
        }
    }
    builder.build()
}

fn continuous_class_name(position: usize, value: f64) -> String {
    format!("{}_{}", value, position)
}

/// One item per value, at the value's index, with the value as id
pub fn create_continuous_template(name: impl Into<String>, vector: &[f64]) -> Result<Template> {
    let name = name.into();
    if vector.is_empty() {
        return Err(PhenopermError::empty(format!("values of continuous template {}", name)));
    }
    if let Some(value) = vector.iter().find(|v| !v.is_finite()) {
        return Err(PhenopermError::NonNumericItem { id: value.to_string() });
    }

    let items: Vec<Item> = vector
        .iter()
        .enumerate()
        .map(|(i, v)| Item::new(v.to_string(), i))
        .collect();
    let class_names: Vec<String> = vector
        .iter()
        .enumerate()
        .map(|(i, &v)| continuous_class_name(i, v))
        .collect();
    create_template(name, items, &class_names, true)
}

/// Continuous template from (profile position, value) pairs, keeping the flags of `source`
pub(crate) fn rebuild_continuous(
    source: &Template,
    name: String,
    values: &[(usize, f64)],
) -> Result<Template> {
    let mut builder = TemplateBuilder::new(name, TemplateKind::Continuous)
        .aux(source.is_aux())
        .class_of_interest(source.class_of_interest_index());
    for &(position, value) in values {
        builder.add_class_with_items(
            continuous_class_name(position, value),
            vec![Item::new(value.to_string(), position)],
        )?;
    }
    builder.build()
}

fn require_categorical(template: &Template, operation: &str) -> Result<()> {
    match template.kind() {
        TemplateKind::Continuous => Err(PhenopermError::continuous_not_supported(format!(
            "{} ({})",
            operation,
            template.name()
        ))),
        TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => Ok(()),
    }
}

pub(crate) fn require_biphasic(template: &Template, operation: &str) -> Result<()> {
    require_categorical(template, operation)?;
    if template.num_classes() != 2 {
        return Err(PhenopermError::wrong_class_count(
            operation,
            "exactly 2",
            template.num_classes(),
        ));
    }
    Ok(())
}

/// Auxiliary template `parent#qualifier` made of the given classes
fn derive(
    parent: &Template,
    qualifier: &str,
    classes: Vec<(String, Vec<Item>)>,
    class_of_interest: usize,
) -> Result<Template> {
    let name = format!("{}{}{}", parent.name(), AUX_SEPARATOR, qualifier);
    let mut builder = TemplateBuilder::new(name, parent.kind().clone())
        .aux(true)
        .class_of_interest(class_of_interest);
    for (class_name, items) in classes {
        builder.add_class_with_items(class_name, items)?;
    }
    let template = builder.build()?;
    debug!("Derived {} ({} items)", template.name(), template.num_items());
    Ok(template)
}

fn versus(first: &str, second: &str) -> String {
    format!("{}_versus_{}", first, second)
}

fn class_entry(class: &TemplateClass) -> (String, Vec<Item>) {
    (class.name().to_string(), class.items().to_vec())
}

/// Renamed copy of a two-class template, same class order
pub fn extract_forward_biphasic_template(template: &Template) -> Result<Template> {
    require_biphasic(template, "extract_forward_biphasic_template")?;
    let (a, b) = (&template.classes()[0], &template.classes()[1]);
    derive(
        template,
        &versus(a.name(), b.name()),
        vec![class_entry(a), class_entry(b)],
        template.class_of_interest_index(),
    )
}

/// Copy of a two-class template with the class order swapped; items and positions are unchanged
pub fn create_reversed_biphasic_template(template: &Template) -> Result<Template> {
    require_biphasic(template, "create_reversed_biphasic_template")?;
    let (a, b) = (&template.classes()[0], &template.classes()[1]);
    derive(template, &versus(b.name(), a.name()), vec![class_entry(b), class_entry(a)], 0)
}

/// [`REST_CLASS`], suffixed until no class of `template` uses it as name or label
fn pooled_class_name(template: &Template) -> String {
    let taken = |candidate: &str| {
        template
            .classes()
            .iter()
            .any(|class| class.name() == candidate || class.label() == candidate)
    };
    let mut candidate = REST_CLASS.to_string();
    let mut suffix = 1;
    while taken(&candidate) {
        candidate = format!("{}_{}", REST_CLASS, suffix);
        suffix += 1;
    }
    candidate
}

/// For each class `c`, the template `c` versus the pooled other classes, and unless `only_forward`
/// the pooled classes versus `c` as well
pub fn extract_all_ova_templates(template: &Template, only_forward: bool) -> Result<Vec<Template>> {
    require_categorical(template, "extract_all_ova_templates")?;
    if template.num_classes() <= 2 {
        return Err(PhenopermError::wrong_class_count(
            "extract_all_ova_templates",
            "more than 2",
            template.num_classes(),
        ));
    }

    let rest_name = pooled_class_name(template);
    let mut templates = Vec::new();
    for (c, class) in template.classes().iter().enumerate() {
        let rest: Vec<Item> = template
            .classes()
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != c)
            .flat_map(|(_, other)| {
                other.items().iter().map(|item| item.relabel(rest_name.as_str()))
            })
            .collect();

        templates.push(derive(
            template,
            &versus(class.name(), &rest_name),
            vec![class_entry(class), (rest_name.clone(), rest.clone())],
            0,
        )?);
        if !only_forward {
            templates.push(derive(
                template,
                &versus(&rest_name, class.name()),
                vec![(rest_name.clone(), rest), class_entry(class)],
                0,
            )?);
        }
    }
    Ok(templates)
}

/// Two-class template for every ordered pair of distinct classes, both directions included
pub fn extract_all_pairs_templates(template: &Template) -> Result<Vec<Template>> {
    require_categorical(template, "extract_all_pairs_templates")?;
    if template.num_classes() < 2 {
        return Err(PhenopermError::wrong_class_count(
            "extract_all_pairs_templates",
            "at least 2",
            template.num_classes(),
        ));
    }

    let classes = template.classes();
    let mut templates = Vec::with_capacity(classes.len() * (classes.len() - 1));
    for (i, a) in classes.iter().enumerate() {
        for (j, b) in classes.iter().enumerate() {
            if i == j {
                continue;
            }
            templates.push(derive(
                template,
                &versus(a.name(), b.name()),
                vec![class_entry(a), class_entry(b)],
                0,
            )?);
        }
    }
    Ok(templates)
}

/// One single-class template per class. Templates that are already auxiliary are refused.
pub fn extract_all_uniphasic_templates(template: &Template) -> Result<Vec<Template>> {
    if template.is_aux() {
        return Err(PhenopermError::AuxNotSupported {
            operation: "extract_all_uniphasic_templates".to_string(),
            template: template.name().to_string(),
        });
    }
    template
        .classes()
        .iter()
        .map(|class| derive(template, class.name(), vec![class_entry(class)], 0))
        .collect()
}

/// Every template worth testing for `template`:
/// more than two classes gives all pairs, all one-versus-all (both directions) and, for
/// non-auxiliary templates, all uniphasic templates; two classes give forward and reversed;
/// a continuous template is only ever itself.
pub fn extract_all_possible_templates(
    template: &Template,
    include_original: bool,
) -> Result<Vec<Template>> {
    match template.kind() {
        TemplateKind::Continuous => return Ok(vec![template.clone()]),
        TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => {}
    }

    let mut templates = Vec::new();
    if include_original {
        templates.push(template.clone());
    }
    match template.num_classes() {
        0 | 1 => {}
        2 => {
            templates.push(extract_forward_biphasic_template(template)?);
            templates.push(create_reversed_biphasic_template(template)?);
        }
        _ => {
            templates.extend(extract_all_pairs_templates(template)?);
            templates.extend(extract_all_ova_templates(template, false)?);
            if !template.is_aux() {
                templates.extend(extract_all_uniphasic_templates(template)?);
            }
        }
    }
    debug!("{} templates enumerated from {}", templates.len(), template.name());
    Ok(templates)
}

/// Reorder the columns of `dataset` to follow the template grouped by class then by profile
/// position. The dataset is returned as is when its columns already follow that order.
pub fn extract<'a>(
    dataset: &'a Dataset,
    template: &Template,
    verbose: bool,
) -> Result<Cow<'a, Dataset>> {
    let ordered = template.items_ordered_by_class_first_and_then_profile_pos();
    let columns: Vec<usize> = match template.kind() {
        TemplateKind::FromSampleNames { column_names } => ordered
            .iter()
            .map(|item| {
                // positions were checked against column_names at build
                let sample = &column_names[item.profile_position()];
                dataset
                    .column_index(sample)
                    .ok_or_else(|| PhenopermError::UnknownSample { name: sample.clone() })
            })
            .collect::<Result<Vec<usize>>>()?,
        TemplateKind::Categorical | TemplateKind::Continuous => {
            ordered.iter().map(|item| item.profile_position()).collect()
        }
    };

    let in_order = columns.iter().enumerate().all(|(i, &c)| i == c);
    if template.num_items() == dataset.num_cols() && template.is_in_profile_order() && in_order {
        debug!("Dataset {} already follows template {}", dataset.name(), template.name());
        return Ok(Cow::Borrowed(dataset));
    }

    let extracted =
        dataset.subset_columns(format!("{}_{}", dataset.name(), template.name()), &columns)?;
    if verbose {
        info!(
            "Extracted {} columns of {} following template {}",
            extracted.num_cols(),
            dataset.name(),
            template.name()
        );
    } else {
        debug!(
            "Extracted {} columns of {} following template {}",
            extracted.num_cols(),
            dataset.name(),
            template.name()
        );
    }
    Ok(Cow::Owned(extracted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_vec;
    use std::collections::HashSet;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn class_positions(template: &Template) -> Vec<(String, Vec<usize>)> {
        template
            .classes()
            .iter()
            .map(|c| (c.name().to_string(), c.profile_positions()))
            .collect()
    }

    #[test]
    fn test_create_template_binds_classes_by_first_appearance() {
        let items = vec![Item::new("0", 3), Item::new("1", 0), Item::new("1", 1), Item::new("0", 2)];
        let template = create_template("cls", items, &names(&["tumor", "normal"]), false).unwrap();
        assert_eq!(template.class(0).unwrap().name(), "tumor");
        assert_eq!(
            template.class(0).unwrap().profile_positions(),
            vec![0, 1],
            "the first label met by profile position goes to the first class, whatever its text"
        );
        assert_eq!(template.class(1).unwrap().profile_positions(), vec![2, 3]);
        assert_eq!(template.class(1).unwrap().label(), "0");
    }

    #[test]
    fn test_create_template_errors() {
        assert!(matches!(
            create_template("empty", vec![], &names(&["a"]), false),
            Err(PhenopermError::EmptyInput { .. })
        ));
        assert!(matches!(
            create_template("noclass", vec![Item::new("a", 0)], &[], false),
            Err(PhenopermError::EmptyInput { .. })
        ));
        assert!(matches!(
            create_template("dup", vec![Item::new("a", 0), Item::new("b", 0)], &names(&["a", "b"]), false),
            Err(PhenopermError::DuplicateProfilePosition { position: 0, .. })
        ));
        assert!(matches!(
            create_template("count", vec![Item::new("a", 0), Item::new("b", 1)], &names(&["a", "b", "c"]), false),
            Err(PhenopermError::ClassCountMismatch { distinct_ids: 2, classes: 3, .. })
        ));
    }

    #[test]
    fn test_create_continuous_template() {
        let template = create_continuous_template("dose", &[0.5, 2.0, 0.5]).unwrap();
        assert!(template.is_continuous());
        assert_eq!(template.num_classes(), 3, "one class per value, repeated values included");
        assert_eq!(template.to_vector(), vec![0.5, 2.0, 0.5]);
        assert!(create_continuous_template("nan", &[1.0, f64::NAN]).is_err());
        assert!(create_continuous_template("none", &[]).is_err());
    }

    #[test]
    fn test_create_categorical_template_from_sample_names() {
        let columns: Vec<String> = string_vec!["s0", "s1", "s2", "s3"];
        let groups = vec![
            GeneSet::new("treated", string_vec!["s3", "s1"]),
            GeneSet::new("control", string_vec!["s0", "s2"]),
        ];
        let template = create_categorical_template("drug", &columns, &groups).unwrap();
        assert_eq!(template.class(0).unwrap().profile_positions(), vec![1, 3]);
        assert_eq!(template.class_name_of_position(0).unwrap(), "control");
        assert!(matches!(template.kind(), TemplateKind::FromSampleNames { .. }));

        let bad = vec![GeneSet::new("treated", string_vec!["s9"])];
        assert!(matches!(
            create_categorical_template("drug", &columns, &bad),
            Err(PhenopermError::UnknownSample { .. })
        ));
    }

    #[test]
    fn test_forward_and_reversed_biphasic() {
        let template = Template::test();
        let forward = extract_forward_biphasic_template(&template).unwrap();
        assert_eq!(forward.name(), "tumor_vs_normal#A_versus_B");
        assert!(forward.is_aux());
        assert_eq!(class_positions(&forward), class_positions(&template));

        let reversed = create_reversed_biphasic_template(&template).unwrap();
        assert_eq!(reversed.name(), "tumor_vs_normal#B_versus_A");
        assert_eq!(reversed.class(0).unwrap().name(), "B");
        assert_eq!(reversed.item_at_position(4).unwrap(), template.item_at_position(4).unwrap(), "items are untouched");

        let twice = create_reversed_biphasic_template(&reversed).unwrap();
        assert_eq!(class_positions(&twice), class_positions(&template), "reversal is an involution on class assignment");
    }

    #[test]
    fn test_biphasic_requires_two_classes() {
        let template = Template::test_multiclass();
        assert!(matches!(
            extract_forward_biphasic_template(&template),
            Err(PhenopermError::WrongClassCount { found: 3, .. })
        ));
        assert!(create_reversed_biphasic_template(&template).is_err());
    }

    #[test]
    fn test_ova_templates() {
        let template = Template::test_multiclass();
        let forward = extract_all_ova_templates(&template, true).unwrap();
        assert_eq!(forward.len(), 3);
        let both = extract_all_ova_templates(&template, false).unwrap();
        assert_eq!(both.len(), 6);

        let all_vs_rest = &forward[0];
        assert_eq!(all_vs_rest.name(), "leukemia#ALL_versus_REST");
        assert_eq!(all_vs_rest.class(0).unwrap().size(), 3);
        assert_eq!(all_vs_rest.class(1).unwrap().name(), REST_CLASS);
        assert_eq!(all_vs_rest.class(1).unwrap().profile_positions(), vec![1, 2, 4, 5, 7]);
        assert!(both.iter().all(|t| t.num_classes() == 2 && t.num_items() == 8));

        assert!(extract_all_ova_templates(&Template::test(), true).is_err(), "two classes are not enough for OVA");
    }

    #[test]
    fn test_ova_pooled_class_avoids_existing_names_and_labels() {
        let template = |labels: [&str; 3], classes: [&str; 3]| {
            let items = (0..6).map(|p| Item::new(labels[p % 3], p)).collect();
            create_template("t", items, &names(&classes), false).unwrap()
        };

        let named_rest = template(["a", "b", "c"], ["REST", "Y", "Z"]);
        let templates = extract_all_possible_templates(&named_rest, true).unwrap();
        assert_eq!(templates.len(), 16, "a class named REST must not break the enumeration");
        let ova = extract_all_ova_templates(&named_rest, true).unwrap();
        assert_eq!(ova[0].name(), "t#REST_versus_REST_1");
        assert_eq!(ova[0].class(1).unwrap().label(), "REST_1");

        let labelled_rest = template(["REST", "y", "z"], ["X", "Y", "Z"]);
        let ova = extract_all_ova_templates(&labelled_rest, false).unwrap();
        assert_eq!(ova.len(), 6);
        assert_eq!(
            ova[0].class(1).unwrap().name(),
            "REST_1",
            "a class labelled REST must not collide with the pool"
        );

        let both = template(["REST_1", "y", "z"], ["REST", "Y", "Z"]);
        let ova = extract_all_ova_templates(&both, true).unwrap();
        assert_eq!(ova[1].class(1).unwrap().name(), "REST_2");
    }

    #[test]
    fn test_pairs_templates() {
        let template = Template::test_multiclass();
        let pairs = extract_all_pairs_templates(&template).unwrap();
        assert_eq!(pairs.len(), 6, "N*(N-1) ordered pairs");
        assert!(pairs.iter().all(|t| t.num_classes() == 2));
        let names: HashSet<&str> = pairs.iter().map(|t| t.name()).collect();
        assert!(names.contains("leukemia#AML_versus_MLL"));
        assert!(names.contains("leukemia#MLL_versus_AML"));
        let aml_mll = pairs.iter().find(|t| t.name() == "leukemia#AML_versus_MLL").unwrap();
        assert_eq!(aml_mll.num_items(), 5, "only the two classes' items are kept");
    }

    #[test]
    fn test_uniphasic_templates() {
        let template = Template::test_multiclass();
        let uniphasic = extract_all_uniphasic_templates(&template).unwrap();
        assert_eq!(uniphasic.len(), 3);
        assert_eq!(uniphasic[1].name(), "leukemia#AML");
        assert_eq!(uniphasic[1].num_items(), 2);

        let aux = &uniphasic[0];
        assert!(matches!(
            extract_all_uniphasic_templates(aux),
            Err(PhenopermError::AuxNotSupported { .. })
        ));
    }

    #[test]
    fn test_all_possible_templates() {
        let multi = Template::test_multiclass();
        assert_eq!(extract_all_possible_templates(&multi, false).unwrap().len(), 6 + 6 + 3);
        let with_original = extract_all_possible_templates(&multi, true).unwrap();
        assert_eq!(with_original.len(), 16);
        assert!(with_original.iter().any(|t| t.name() == multi.name()));

        let biphasic = Template::test();
        let got_names: HashSet<String> = extract_all_possible_templates(&biphasic, false)
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        let expected: HashSet<String> = names(&["tumor_vs_normal#A_versus_B", "tumor_vs_normal#B_versus_A"]).into_iter().collect();
        assert_eq!(got_names, expected);

        let continuous = create_continuous_template("dose", &[1.0, 2.0]).unwrap();
        assert_eq!(extract_all_possible_templates(&continuous, false).unwrap(), vec![continuous.clone()]);
    }

    #[test]
    fn test_all_possible_from_aux_skips_uniphasic() {
        let multi = Template::test_multiclass();
        let mut builder = TemplateBuilder::new("leukemia#subset", TemplateKind::Categorical).aux(true);
        for class in multi.classes() {
            builder.add_class_with_items(class.name(), class.items().to_vec()).unwrap();
        }
        let aux = builder.build().unwrap();
        assert_eq!(extract_all_possible_templates(&aux, false).unwrap().len(), 6 + 6);
    }

    #[test]
    fn test_extract_fast_path_returns_same_dataset() {
        let data = Dataset::new(
            "expr",
            string_vec!["g1"],
            string_vec!["s0", "s1", "s2", "s3", "s4"],
            vec![vec![0.0, 1.0, 2.0, 3.0, 4.0]],
        )
        .unwrap();
        let extracted = extract(&data, &Template::test(), false).unwrap();
        assert!(matches!(extracted, Cow::Borrowed(_)), "already ordered data must not be rebuilt");
    }

    #[test]
    fn test_extract_reorders_columns_by_class() {
        let data = Dataset::new(
            "expr",
            string_vec!["g1"],
            (0..8).map(|i| format!("s{}", i)).collect(),
            vec![(0..8).map(|v| v as f64).collect()],
        )
        .unwrap();
        let extracted = extract(&data, &Template::test_multiclass(), true).unwrap();
        assert!(matches!(extracted, Cow::Owned(_)));
        assert_eq!(extracted.row(0).unwrap(), &[0.0, 3.0, 6.0, 1.0, 4.0, 2.0, 5.0, 7.0]);
    }

    #[test]
    fn test_extract_by_sample_names() {
        let columns: Vec<String> = string_vec!["a", "b", "c"];
        let groups = vec![GeneSet::new("x", string_vec!["c"]), GeneSet::new("y", string_vec!["a"])];
        let template = create_categorical_template("named", &columns, &groups).unwrap();

        // same samples, different column order in the dataset
        let data = Dataset::new("expr", string_vec!["g1"], string_vec!["c", "b", "a"], vec![vec![30.0, 20.0, 10.0]]).unwrap();
        let extracted = extract(&data, &template, false).unwrap();
        assert_eq!(extracted.column_names().to_vec(), vec!["c".to_string(), "a".to_string()]);
        assert_eq!(extracted.row(0).unwrap(), &[30.0, 10.0]);

        let missing = Dataset::new("expr", string_vec!["g1"], string_vec!["a", "b"], vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(extract(&missing, &template, false), Err(PhenopermError::UnknownSample { .. })));
    }
}
