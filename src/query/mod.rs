//! Filter fields, validation rules and query serialization shared by every view.

use std::collections::BTreeMap;
use std::fmt;

use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("{label} is required."))]
    MissingField {
        field: &'static str,
        label: &'static str,
    },
    #[snafu(display("{required_label} is required when filtering by {dependent_label}."))]
    MissingDependency {
        dependent: &'static str,
        required: &'static str,
        dependent_label: &'static str,
        required_label: &'static str,
    },
    #[snafu(display("Unknown filter field: {field}"))]
    UnknownField { field: String },
}

/// How a form presents a field. Values are always transmitted as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    /// Closed set of `(value, label)` pairs.
    Choice(&'static [(&'static str, &'static str)]),
    /// Free text with suggested values.
    Suggest(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name used by forms and the filter state, e.g. `driverId`.
    pub name: &'static str,
    /// Name the backend expects, e.g. `driver_id`.
    pub wire: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub required: bool,
    pub initial: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str, wire: &'static str, label: &'static str) -> Self {
        Self {
            name,
            wire,
            label,
            hint: "",
            required: false,
            initial: "",
            kind: FieldKind::Text,
        }
    }

    pub const fn numeric(name: &'static str, wire: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Numeric,
            ..Self::text(name, wire, label)
        }
    }

    pub const fn hint(mut self, hint: &'static str) -> Self {
        self.hint = hint;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn initial(mut self, initial: &'static str) -> Self {
        self.initial = initial;
        self
    }

    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }
}

/// `dependent` may only be set when `required` is set too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRule {
    pub dependent: &'static str,
    pub required: &'static str,
}

impl DependencyRule {
    pub const fn new(dependent: &'static str, required: &'static str) -> Self {
        Self {
            dependent,
            required,
        }
    }
}

/// Current value of every filter field of a view. Unset fields hold an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    values: BTreeMap<&'static str, String>,
}

impl FilterState {
    pub fn for_fields(fields: &[FieldSpec]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| (f.name, f.initial.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(ValidationError::UnknownField {
                field: name.to_string(),
            }),
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut String> {
        self.values.get_mut(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        !self.get(name).trim().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// A filter state that passed its view's validation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFilters(FilterState);

impl ValidFilters {
    pub fn filters(&self) -> &FilterState {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub field: &'static str,
    pub wire: &'static str,
    pub value: String,
}

impl fmt::Debug for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})={:?}", self.wire, self.field, self.value)
    }
}

/// Non-empty filters translated to their wire names, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<QueryParam>,
}

impl QueryParams {
    pub fn get(&self, wire: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.wire == wire)
            .map(|p| p.value.as_str())
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|p| (p.wire, p.value.as_str()))
    }

    pub fn to_map(&self) -> BTreeMap<&'static str, &str> {
        self.pairs().collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Removes a parameter, used for values that travel in the URL path.
    pub fn take(&mut self, wire: &str) -> Option<String> {
        let idx = self.params.iter().position(|p| p.wire == wire)?;
        Some(self.params.remove(idx).value)
    }
}

/// Validation and serialization for one view, driven by its declared fields and rules.
#[derive(Debug, Clone, Copy)]
pub struct QueryModel {
    fields: &'static [FieldSpec],
    rules: &'static [DependencyRule],
}

impl QueryModel {
    pub const fn new(fields: &'static [FieldSpec], rules: &'static [DependencyRule]) -> Self {
        Self { fields, rules }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn empty_filters(&self) -> FilterState {
        FilterState::for_fields(self.fields)
    }

    pub fn validate(&self, filters: &FilterState) -> Result<ValidFilters, ValidationError> {
        for field in self.fields.iter().filter(|f| f.required) {
            if !filters.is_set(field.name) {
                return Err(ValidationError::MissingField {
                    field: field.name,
                    label: field.label,
                });
            }
        }
        for rule in self.rules {
            if filters.is_set(rule.dependent) && !filters.is_set(rule.required) {
                return Err(ValidationError::MissingDependency {
                    dependent: rule.dependent,
                    required: rule.required,
                    dependent_label: self.label(rule.dependent),
                    required_label: self.label(rule.required),
                });
            }
        }
        Ok(ValidFilters(filters.clone()))
    }

    fn label(&self, name: &'static str) -> &'static str {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map_or(name, |field| field.label)
    }

    pub fn serialize(&self, filters: &FilterState) -> QueryParams {
        QueryParams {
            params: self
                .fields
                .iter()
                .filter_map(|field| {
                    let value = filters.get(field.name).trim();
                    (!value.is_empty()).then(|| QueryParam {
                        field: field.name,
                        wire: field.wire,
                        value: value.to_string(),
                    })
                })
                .collect(),
        }
    }
}
