use serde::{Deserialize, Serialize};

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paging<T> {
    pub total: usize,
    pub from: usize,
    pub to: usize,
    pub results: Vec<T>,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl<T> Paging<T> {
    pub fn new(total: usize, from: usize, results: Vec<T>, facets: Vec<Facet>) -> Self {
        Self {
            total,
            from,
            to: from + results.len(),
            results,
            facets,
        }
    }

    pub fn empty(from: usize) -> Self {
        Self::new(0, from, Vec::new(), Vec::new())
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paging<U> {
        Paging {
            total: self.total,
            from: self.from,
            to: self.to,
            results: self.results.into_iter().map(f).collect(),
            facets: self.facets,
        }
    }

    /// Like `map`, stopping at the first error
    pub fn try_map<U, E, F: FnMut(T) -> Result<U, E>>(self, f: F) -> Result<Paging<U>, E> {
        let results = self.results.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Paging {
            total: self.total,
            from: self.from,
            to: self.to,
            results,
            facets: self.facets,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub field: String,
    pub label: String,
    pub values: Vec<FacetValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub label: String,
    pub count: usize,
}

impl Facet {
    /// Facet over `field` with values labelled by themselves
    pub fn new(field: &str, counts: impl IntoIterator<Item = (String, usize)>) -> Self {
        let mut values: Vec<FacetValue> = counts
            .into_iter()
            .map(|(value, count)| FacetValue {
                label: value.clone(),
                value,
                count,
            })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        Self {
            field: field.to_string(),
            label: field_label(field),
            values,
        }
    }
}

/// `resource_organisation` -> `Resource Organisation`
fn field_label(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
