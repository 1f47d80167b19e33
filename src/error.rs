//! Crate-wide error type.
//!
//! Structural violations are raised while a template, list or dataset is being assembled; policy
//! violations when an operation is asked of an object it does not apply to; lookup errors when a
//! name or position is absent.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhenopermError {
    /// A required input (items, classes, names...) was empty
    #[error("Empty input: {what}")]
    EmptyInput { what: String },

    #[error("Template {template}: profile position {position} is used more than once")]
    DuplicateProfilePosition { template: String, position: usize },

    #[error("Template {template}: class name {class} is used more than once")]
    DuplicateClassName { template: String, class: String },

    #[error("Template {template}: class {class} has no item")]
    EmptyClass { template: String, class: String },

    /// Categorical templates need exactly one distinct item id per class
    #[error("Template {template}: {distinct_ids} distinct item ids for {classes} classes")]
    ClassCountMismatch {
        template: String,
        distinct_ids: usize,
        classes: usize,
    },

    /// An item id found in two classes, or a class whose items do not share one id
    #[error("Template {template}: label {id} does not map to exactly one class")]
    LabelCollision { template: String, id: String },

    #[error(
        "Template {template}: continuous templates need one class per item \
         ({items} items, {classes} classes)"
    )]
    ContinuousMismatch {
        template: String,
        items: usize,
        classes: usize,
    },

    #[error("Item id {id} is not a finite number")]
    NonNumericItem { id: String },

    #[error("Invalid name {name}: {message}")]
    InvalidName { name: String, message: String },

    #[error("Size mismatch for {what}: {left} vs {right}")]
    SizeMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error("Duplicate name {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("{operation} needs {expected} classes but template has {found}")]
    WrongClassCount {
        operation: String,
        expected: String,
        found: usize,
    },

    #[error("{operation} is not supported on continuous templates")]
    ContinuousNotSupported { operation: String },

    #[error("{operation} is not supported on auxiliary template {template}")]
    AuxNotSupported { operation: String, template: String },

    /// The two halves of a balanced split do not add up to the class size
    #[error("Balanced split {from_kept}+{from_other} does not cover class of size {expected}")]
    UnbalancedSplit {
        expected: usize,
        from_kept: usize,
        from_other: usize,
    },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: String },

    #[error("Unknown sample {name}")]
    UnknownSample { name: String },

    #[error("Template {template}: no item at profile position {position}")]
    UnknownProfilePosition { template: String, position: usize },

    #[error("Unknown name {name} in {context}")]
    UnknownName { name: String, context: String },

    #[error("Index {index} out of range for {what} of size {size}")]
    IndexOutOfRange {
        what: String,
        index: usize,
        size: usize,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, PhenopermError>;

impl PhenopermError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    pub fn out_of_range(what: impl Into<String>, index: usize, size: usize) -> Self {
        Self::IndexOutOfRange {
            what: what.into(),
            index,
            size,
        }
    }

    pub fn wrong_class_count(
        operation: impl Into<String>,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::WrongClassCount {
            operation: operation.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn continuous_not_supported(operation: impl Into<String>) -> Self {
        Self::ContinuousNotSupported {
            operation: operation.into(),
        }
    }
}
