//! Service categories and their per-run lookup table.

use crate::{CategoryId, CoreError, CoreResult};

pub const STANDARD_POST: &str = "standard_post";
pub const PASSPORTS: &str = "passports";
pub const PARCELS: &str = "parcels";

/// PriorityOrder ranking used when no explicit list is configured.  Names
/// that are not configured are skipped.
pub const STOCK_PRECEDENCE: [&str; 3] = [PASSPORTS, PARCELS, STANDARD_POST];

/// One configured service category.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategorySpec {
    pub name: String,
    /// Base service duration in simulated minutes, before jitter.
    pub service_minutes: f64,
}

impl CategorySpec {
    pub fn new(name: impl Into<String>, service_minutes: f64) -> Self {
        Self { name: name.into(), service_minutes }
    }
}

/// Validated, index-addressable view of the configured categories.
///
/// Category order is configuration order; it is the iteration order used by
/// every dispatch policy for tie-breaking and by round-robin for cycling.
#[derive(Clone, Debug)]
pub struct CategoryTable {
    names:           Vec<String>,
    service_minutes: Vec<f64>,
    /// Full PriorityOrder ranking: listed categories first, then the rest in
    /// category order.
    precedence:      Vec<CategoryId>,
}

impl CategoryTable {
    /// Validate `specs` and `priority` and build the table.
    ///
    /// An empty `priority` ranks the stock categories present in `specs` by
    /// [`STOCK_PRECEDENCE`]; explicit entries must all name a configured
    /// category.
    pub fn new(specs: &[CategorySpec], priority: &[String]) -> CoreResult<Self> {
        if specs.is_empty() {
            return Err(CoreError::Config("at least one service category is required".into()));
        }
        if specs.len() > u16::MAX as usize {
            return Err(CoreError::Config(format!("too many service categories: {}", specs.len())));
        }

        let mut names = Vec::with_capacity(specs.len());
        let mut service_minutes = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.name.is_empty() {
                return Err(CoreError::Config("service category name must not be empty".into()));
            }
            if names.contains(&spec.name) {
                return Err(CoreError::Config(format!("duplicate service category `{}`", spec.name)));
            }
            if !(spec.service_minutes.is_finite() && spec.service_minutes > 0.0) {
                return Err(CoreError::Config(format!(
                    "service time for `{}` must be a positive number of minutes, got {}",
                    spec.name, spec.service_minutes
                )));
            }
            names.push(spec.name.clone());
            service_minutes.push(spec.service_minutes);
        }

        let mut precedence: Vec<CategoryId> = Vec::with_capacity(names.len());
        if priority.is_empty() {
            for stock in STOCK_PRECEDENCE {
                if let Some(i) = names.iter().position(|n| n == stock) {
                    precedence.push(CategoryId(i as u16));
                }
            }
        }
        for name in priority {
            let id = names
                .iter()
                .position(|n| n == name)
                .map(|i| CategoryId(i as u16))
                .ok_or_else(|| CoreError::UnknownCategory(name.clone()))?;
            if precedence.contains(&id) {
                return Err(CoreError::Config(format!("category `{name}` listed twice in priority order")));
            }
            precedence.push(id);
        }
        for i in 0..names.len() {
            let id = CategoryId(i as u16);
            if !precedence.contains(&id) {
                precedence.push(id);
            }
        }

        Ok(Self { names, service_minutes, precedence })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<CategoryId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| CategoryId(i as u16))
    }

    /// Like [`lookup`][Self::lookup] but reports an unknown name as an error.
    pub fn resolve(&self, name: &str) -> CoreResult<CategoryId> {
        self.lookup(name)
            .ok_or_else(|| CoreError::UnknownCategory(name.to_owned()))
    }

    #[inline]
    pub fn name(&self, id: CategoryId) -> &str {
        &self.names[id.index()]
    }

    #[inline]
    pub fn service_minutes(&self, id: CategoryId) -> f64 {
        self.service_minutes[id.index()]
    }

    /// All category ids in category order.
    pub fn ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        (0..self.names.len()).map(|i| CategoryId(i as u16))
    }

    pub fn precedence(&self) -> &[CategoryId] {
        &self.precedence
    }
}
