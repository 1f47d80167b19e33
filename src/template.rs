use crate::error::{PhenopermError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Separator between a parent template name and the qualifier of a template derived from it
pub const AUX_SEPARATOR: char = '#';

/// A sample labelled by a template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Label token of the sample (class label, or the numeric value for continuous templates)
    id: String,
    /// Index of the sample in the original, unreordered data
    profile_position: usize,
}

impl Item {
    pub fn new(id: impl Into<String>, profile_position: usize) -> Item {
        Item {
            id: id.into(),
            profile_position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile_position(&self) -> usize {
        self.profile_position
    }

    /// Parse the id as a number, as required for continuous templates
    pub fn float_value(&self) -> Result<f64> {
        match self.id.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(PhenopermError::NonNumericItem { id: self.id.clone() }),
        }
    }

    /// A new item at the same profile position carrying another label
    pub fn relabel(&self, id: impl Into<String>) -> Item {
        Item::new(id, self.profile_position)
    }
}

/// A named group of items
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TemplateClass {
    name: String,
    items: Vec<Item>,
}

impl TemplateClass {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn items_ordered_by_profile_pos(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.iter().collect();
        items.sort_by_key(|item| item.profile_position);
        items
    }

    pub fn profile_positions(&self) -> Vec<usize> {
        self.items_ordered_by_profile_pos()
            .iter()
            .map(|item| item.profile_position)
            .collect()
    }

    /// Item id shared by every member of a categorical class
    pub fn label(&self) -> &str {
        self.items.first().map(|item| item.id()).unwrap_or(&self.name)
    }
}

/// The three ways a template labels its samples
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TemplateKind {
    /// Discrete labels, profile positions index dataset columns directly
    Categorical,
    /// One numeric value per sample, one class per item
    Continuous,
    /// Discrete labels defined from sample names; `column_names[pos]` names the sample at `pos`
    FromSampleNames { column_names: Vec<String> },
}

impl TemplateKind {
    pub fn is_continuous(&self) -> bool {
        matches!(self, TemplateKind::Continuous)
    }
}

/// Phenotype labelling of a fixed set of samples. Built through [`TemplateBuilder`] and never
/// modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Template {
    name: String,
    classes: Vec<TemplateClass>,
    kind: TemplateKind,
    class_of_interest: usize,
    aux: bool,
    /// profile position -> (class index, index within class)
    #[serde(skip)]
    position_index: HashMap<usize, (usize, usize)>,
}

impl Template {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the template this one was derived from (the whole name for non-auxiliary templates)
    pub fn parent_name(&self) -> &str {
        self.name.split(AUX_SEPARATOR).next().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &TemplateKind {
        &self.kind
    }

    pub fn is_continuous(&self) -> bool {
        self.kind.is_continuous()
    }

    pub fn is_categorical(&self) -> bool {
        !self.is_continuous()
    }

    pub fn is_aux(&self) -> bool {
        self.aux
    }

    pub fn is_biphasic(&self) -> bool {
        self.classes.len() == 2
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn num_items(&self) -> usize {
        self.position_index.len()
    }

    pub fn classes(&self) -> &[TemplateClass] {
        &self.classes
    }

    pub fn class(&self, index: usize) -> Result<&TemplateClass> {
        self.classes
            .get(index)
            .ok_or_else(|| {
                PhenopermError::out_of_range(
                    format!("classes of {}", self.name),
                    index,
                    self.classes.len(),
                )
            })
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name()).collect()
    }

    pub fn class_of_interest_index(&self) -> usize {
        self.class_of_interest
    }

    pub fn class_of_interest(&self) -> &TemplateClass {
        // bounds checked at build
        &self.classes[self.class_of_interest]
    }

    /// Copy of this template focused on another class
    pub fn with_class_of_interest(&self, index: usize) -> Result<Template> {
        if index >= self.classes.len() {
            return Err(PhenopermError::out_of_range(
                format!("classes of template {}", self.name),
                index,
                self.classes.len(),
            ));
        }
        let mut template = self.clone();
        template.class_of_interest = index;
        Ok(template)
    }

    pub fn item_at_position(&self, position: usize) -> Result<&Item> {
        let (class, item) = self.locate(position)?;
        Ok(&self.classes[class].items[item])
    }

    pub fn class_index_of_position(&self, position: usize) -> Result<usize> {
        self.locate(position).map(|(class, _)| class)
    }

    pub fn class_name_of_position(&self, position: usize) -> Result<&str> {
        self.locate(position).map(|(class, _)| self.classes[class].name())
    }

    fn locate(&self, position: usize) -> Result<(usize, usize)> {
        self.position_index
            .get(&position)
            .copied()
            .ok_or_else(|| PhenopermError::UnknownProfilePosition {
                template: self.name.clone(),
                position,
            })
    }

    pub fn items_ordered_by_profile_pos(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.classes.iter().flat_map(|c| c.items.iter()).collect();
        items.sort_by_key(|item| item.profile_position);
        items
    }

    pub fn items_ordered_by_class_first_and_then_profile_pos(&self) -> Vec<&Item> {
        self.classes
            .iter()
            .flat_map(|c| c.items_ordered_by_profile_pos())
            .collect()
    }

    /// True when grouping by class does not reorder the samples
    pub fn is_in_profile_order(&self) -> bool {
        self.items_ordered_by_class_first_and_then_profile_pos()
            .windows(2)
            .all(|pair| pair[0].profile_position < pair[1].profile_position)
    }

    /// Continuous: the values in profile order. Categorical: the class index of each item in
    /// profile order.
    pub fn to_vector(&self) -> Vec<f64> {
        self.items_ordered_by_profile_pos()
            .into_iter()
            .map(|item| match self.kind {
                // ids were checked numeric at build
                TemplateKind::Continuous => item.float_value().unwrap_or(f64::NAN),
                TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => {
                    self.position_index[&item.profile_position].0 as f64
                }
            })
            .collect()
    }

    /// Split a per-sample vector (indexed by profile position) into one vector per class
    pub fn split_by_template_class(&self, vector: &[f64]) -> Result<Vec<Vec<f64>>> {
        self.classes
            .iter()
            .map(|class| {
                class
                    .items_ordered_by_profile_pos()
                    .into_iter()
                    .map(|item| {
                        vector
                            .get(item.profile_position)
                            .copied()
                            .ok_or_else(|| {
                                let position = item.profile_position;
                                PhenopermError::out_of_range("vector", position, vector.len())
                            })
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }

    /// CLS-like rendering. Categorical templates list one code per item in profile order, either
    /// the class index or the class name; continuous templates list their values.
    pub fn as_string(&self, use_class_names: bool) -> String {
        match self.kind {
            TemplateKind::Continuous => {
                let values: Vec<String> = self.to_vector().iter().map(|v| v.to_string()).collect();
                format!("#numeric\n#{}\n{}\n", self.name, values.join(" "))
            }
            TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => {
                let codes: Vec<String> = self
                    .items_ordered_by_profile_pos()
                    .into_iter()
                    .map(|item| {
                        let class = self.position_index[&item.profile_position].0;
                        if use_class_names {
                            self.classes[class].name.clone()
                        } else {
                            class.to_string()
                        }
                    })
                    .collect();
                format!(
                    "{} {} 1\n# {}\n{}\n",
                    self.num_items(),
                    self.num_classes(),
                    self.class_names().join(" "),
                    codes.join(" ")
                )
            }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            TemplateKind::Categorical => "categorical",
            TemplateKind::Continuous => "continuous",
            TemplateKind::FromSampleNames { .. } => "from sample names",
        };
        writeln!(
            f,
            "Template {} ({}{})   Items: {}   Classes: {}",
            self.name,
            kind,
            if self.aux { ", aux" } else { "" },
            self.num_items(),
            self.num_classes()
        )?;
        for (i, class) in self.classes.iter().enumerate().take(20) {
            let marker = if i == self.class_of_interest { "*" } else { " " };
            writeln!(f, "{}{:<20} {}", marker, class.name, class.size())?;
        }
        Ok(())
    }
}

/// Open, mutable stage of a template. `build` validates and seals it.
#[derive(Debug)]
pub struct TemplateBuilder {
    name: String,
    kind: TemplateKind,
    aux: bool,
    class_of_interest: usize,
    classes: Vec<TemplateClass>,
}

impl TemplateBuilder {
    pub fn new(name: impl Into<String>, kind: TemplateKind) -> TemplateBuilder {
        TemplateBuilder {
            name: name.into(),
            kind,
            aux: false,
            class_of_interest: 0,
            classes: Vec::new(),
        }
    }

    pub fn aux(mut self, aux: bool) -> Self {
        self.aux = aux;
        self
    }

    pub fn class_of_interest(mut self, index: usize) -> Self {
        self.class_of_interest = index;
        self
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn add_class(&mut self, name: impl Into<String>) -> Result<usize> {
        let name = name.into();
        if self.classes.iter().any(|c| c.name == name) {
            return Err(PhenopermError::DuplicateClassName {
                template: self.name.clone(),
                class: name,
            });
        }
        self.classes.push(TemplateClass { name, items: Vec::new() });
        Ok(self.classes.len() - 1)
    }

    pub fn add_item(&mut self, class: usize, item: Item) -> Result<()> {
        let size = self.classes.len();
        self.classes
            .get_mut(class)
            .ok_or_else(|| PhenopermError::out_of_range("builder classes", class, size))?
            .items
            .push(item);
        Ok(())
    }

    pub fn add_class_with_items(
        &mut self,
        name: impl Into<String>,
        items: Vec<Item>,
    ) -> Result<usize> {
        let class = self.add_class(name)?;
        for item in items {
            self.add_item(class, item)?;
        }
        Ok(class)
    }

    fn run_checks(&self) -> Result<()> {
        let invalid_name = |message: &str| PhenopermError::InvalidName {
            name: self.name.clone(),
            message: message.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid_name("template name is empty"));
        }
        let qualified = self.name.contains(AUX_SEPARATOR);
        if self.aux && !qualified {
            return Err(invalid_name("auxiliary template names must contain '#'"));
        }
        if !self.aux && qualified {
            return Err(invalid_name("only auxiliary template names may contain '#'"));
        }

        if self.classes.is_empty() {
            return Err(PhenopermError::empty(format!("classes of template {}", self.name)));
        }
        if let Some(class) = self.classes.iter().find(|c| c.items.is_empty()) {
            return Err(PhenopermError::EmptyClass {
                template: self.name.clone(),
                class: class.name.clone(),
            });
        }
        if self.class_of_interest >= self.classes.len() {
            return Err(PhenopermError::out_of_range(
                "class of interest",
                self.class_of_interest,
                self.classes.len(),
            ));
        }

        let mut positions: HashSet<usize> = HashSet::new();
        for item in self.classes.iter().flat_map(|c| c.items.iter()) {
            if !positions.insert(item.profile_position) {
                return Err(PhenopermError::DuplicateProfilePosition {
                    template: self.name.clone(),
                    position: item.profile_position,
                });
            }
        }

        match &self.kind {
            TemplateKind::Continuous => {
                let num_items = positions.len();
                if self.classes.iter().any(|c| c.items.len() != 1) {
                    return Err(PhenopermError::ContinuousMismatch {
                        template: self.name.clone(),
                        items: num_items,
                        classes: self.classes.len(),
                    });
                }
                for item in self.classes.iter().flat_map(|c| c.items.iter()) {
                    item.float_value()?;
                }
            }
            TemplateKind::Categorical | TemplateKind::FromSampleNames { .. } => {
                let mut owner: HashMap<&str, usize> = HashMap::new();
                for (i, class) in self.classes.iter().enumerate() {
                    let label = class.items[0].id();
                    if let Some(odd) = class.items.iter().find(|item| item.id() != label) {
                        return Err(PhenopermError::LabelCollision {
                            template: self.name.clone(),
                            id: odd.id.clone(),
                        });
                    }
                    if owner.insert(label, i).is_some() {
                        return Err(PhenopermError::LabelCollision {
                            template: self.name.clone(),
                            id: label.to_string(),
                        });
                    }
                }
            }
        }

        if let TemplateKind::FromSampleNames { column_names } = &self.kind {
            if let Some(&position) = positions.iter().find(|&&p| p >= column_names.len()) {
                return Err(PhenopermError::out_of_range(
                    "sample names",
                    position,
                    column_names.len(),
                ));
            }
        }

        Ok(())
    }

    /// Validate and seal the template
    pub fn build(self) -> Result<Template> {
        self.run_checks()?;

        let mut position_index = HashMap::new();
        for (c, class) in self.classes.iter().enumerate() {
            for (i, item) in class.items.iter().enumerate() {
                position_index.insert(item.profile_position, (c, i));
            }
        }
        debug!(
            "Template {} sealed with {} items in {} classes",
            self.name,
            position_index.len(),
            self.classes.len()
        );

        Ok(Template {
            name: self.name,
            classes: self.classes,
            kind: self.kind,
            class_of_interest: self.class_of_interest,
            aux: self.aux,
            position_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Template {
        /// A = positions 0,1,2 ; B = positions 3,4
        pub fn test() -> Template {
            let mut builder = TemplateBuilder::new("tumor_vs_normal", TemplateKind::Categorical);
            builder.add_class_with_items("A", (0..3).map(|p| Item::new("A", p)).collect()).unwrap();
            builder.add_class_with_items("B", (3..5).map(|p| Item::new("B", p)).collect()).unwrap();
            builder.build().unwrap()
        }

        /// ALL = 0,3,6 ; AML = 1,4 ; MLL = 2,5,7
        pub fn test_multiclass() -> Template {
            let mut builder = TemplateBuilder::new("leukemia", TemplateKind::Categorical);
            builder.add_class_with_items("ALL", [0, 3, 6].iter().map(|&p| Item::new("ALL", p)).collect()).unwrap();
            builder.add_class_with_items("AML", [1, 4].iter().map(|&p| Item::new("AML", p)).collect()).unwrap();
            builder.add_class_with_items("MLL", [2, 5, 7].iter().map(|&p| Item::new("MLL", p)).collect()).unwrap();
            builder.build().unwrap()
        }
    }

    #[test]
    fn test_build_counts_items_and_classes() {
        let template = Template::test();
        assert_eq!(template.num_items(), 5);
        assert_eq!(template.num_classes(), 2);
        let total: usize = template.classes().iter().map(|c| c.size()).sum();
        assert_eq!(total, template.num_items(), "class sizes must add up to the number of items");
        assert!(template.is_biphasic());
        assert!(!template.is_aux());
    }

    #[test]
    fn test_duplicate_profile_position_is_rejected() {
        let mut builder = TemplateBuilder::new("dup", TemplateKind::Categorical);
        builder.add_class_with_items("A", vec![Item::new("A", 0), Item::new("A", 1)]).unwrap();
        builder.add_class_with_items("B", vec![Item::new("B", 1)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::DuplicateProfilePosition { position: 1, .. })));
    }

    #[test]
    fn test_duplicate_class_name_is_rejected() {
        let mut builder = TemplateBuilder::new("dup", TemplateKind::Categorical);
        builder.add_class("A").unwrap();
        assert!(matches!(builder.add_class("A"), Err(PhenopermError::DuplicateClassName { .. })));
        assert_eq!(builder.num_classes(), 1, "a refused class is not added");
    }

    #[test]
    fn test_empty_class_is_rejected() {
        let mut builder = TemplateBuilder::new("empty", TemplateKind::Categorical);
        builder.add_class_with_items("A", vec![Item::new("A", 0)]).unwrap();
        builder.add_class("B").unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::EmptyClass { .. })), "a class without item must fail the checks");
    }

    #[test]
    fn test_label_shared_by_two_classes_is_rejected() {
        let mut builder = TemplateBuilder::new("collide", TemplateKind::Categorical);
        builder.add_class_with_items("A", vec![Item::new("x", 0)]).unwrap();
        builder.add_class_with_items("B", vec![Item::new("x", 1)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::LabelCollision { .. })));

        let mut builder = TemplateBuilder::new("mixed", TemplateKind::Categorical);
        builder.add_class_with_items("A", vec![Item::new("x", 0), Item::new("y", 1)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::LabelCollision { .. })), "a class with two labels must fail");
    }

    #[test]
    fn test_continuous_checks() {
        let mut builder = TemplateBuilder::new("cont", TemplateKind::Continuous);
        builder.add_class_with_items("c0", vec![Item::new("1.5", 0), Item::new("2.5", 1)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::ContinuousMismatch { .. })));

        let mut builder = TemplateBuilder::new("cont", TemplateKind::Continuous);
        builder.add_class_with_items("c0", vec![Item::new("abc", 0)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::NonNumericItem { .. })));
    }

    #[test]
    fn test_aux_naming_rules() {
        let mut builder = TemplateBuilder::new("plain#qualified", TemplateKind::Categorical);
        builder.add_class_with_items("A", vec![Item::new("A", 0)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::InvalidName { .. })), "non aux names cannot contain '#'");

        let mut builder = TemplateBuilder::new("plain", TemplateKind::Categorical).aux(true);
        builder.add_class_with_items("A", vec![Item::new("A", 0)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::InvalidName { .. })), "aux names need '#'");

        let mut builder = TemplateBuilder::new("parent#A", TemplateKind::Categorical).aux(true);
        builder.add_class_with_items("A", vec![Item::new("A", 0)]).unwrap();
        let template = builder.build().unwrap();
        assert!(template.is_aux());
        assert_eq!(template.parent_name(), "parent");
    }

    #[test]
    fn test_class_of_interest_must_exist() {
        let mut builder = TemplateBuilder::new("coi", TemplateKind::Categorical).class_of_interest(2);
        builder.add_class_with_items("A", vec![Item::new("A", 0)]).unwrap();
        builder.add_class_with_items("B", vec![Item::new("B", 1)]).unwrap();
        assert!(matches!(builder.build(), Err(PhenopermError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_items_orderings() {
        let template = Template::test_multiclass();
        let by_pos: Vec<usize> = template.items_ordered_by_profile_pos().iter().map(|i| i.profile_position()).collect();
        assert_eq!(by_pos, (0..8).collect::<Vec<usize>>());
        let by_class: Vec<usize> = template
            .items_ordered_by_class_first_and_then_profile_pos()
            .iter()
            .map(|i| i.profile_position())
            .collect();
        assert_eq!(by_class, vec![0, 3, 6, 1, 4, 2, 5, 7]);
        assert!(!template.is_in_profile_order());
        assert!(Template::test().is_in_profile_order());
    }

    #[test]
    fn test_position_lookups() {
        let template = Template::test_multiclass();
        assert_eq!(template.class_index_of_position(4).unwrap(), 1);
        assert_eq!(template.class_name_of_position(7).unwrap(), "MLL");
        assert_eq!(template.item_at_position(6).unwrap().id(), "ALL");
        assert!(matches!(template.item_at_position(42), Err(PhenopermError::UnknownProfilePosition { .. })));
    }

    #[test]
    fn test_to_vector_and_split() {
        let template = Template::test_multiclass();
        assert_eq!(template.to_vector(), vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 2.0]);

        let values: Vec<f64> = (0..8).map(|v| v as f64 * 10.0).collect();
        let split = template.split_by_template_class(&values).unwrap();
        assert_eq!(split, vec![vec![0.0, 30.0, 60.0], vec![10.0, 40.0], vec![20.0, 50.0, 70.0]]);
        assert!(template.split_by_template_class(&values[..4]).is_err(), "short vectors cannot be split");
    }

    #[test]
    fn test_as_string_categorical() {
        let template = Template::test_multiclass();
        assert_eq!(template.as_string(false), "8 3 1\n# ALL AML MLL\n0 1 2 0 1 2 0 2\n");
        assert_eq!(
            template.as_string(true),
            "8 3 1\n# ALL AML MLL\nALL AML MLL ALL AML MLL ALL MLL\n"
        );
    }

    #[test]
    fn test_as_string_continuous() {
        let mut builder = TemplateBuilder::new("dose", TemplateKind::Continuous);
        builder.add_class_with_items("c1", vec![Item::new("2.5", 1)]).unwrap();
        builder.add_class_with_items("c0", vec![Item::new("1", 0)]).unwrap();
        let template = builder.build().unwrap();
        assert_eq!(template.as_string(false), "#numeric\n#dose\n1 2.5\n");
        assert_eq!(template.to_vector(), vec![1.0, 2.5]);
    }

    #[test]
    fn test_with_class_of_interest() {
        let template = Template::test();
        let focused = template.with_class_of_interest(1).unwrap();
        assert_eq!(focused.class_of_interest().name(), "B");
        assert_eq!(template.class_of_interest_index(), 0, "the source template is left untouched");
        assert!(template.with_class_of_interest(2).is_err());
    }
}
