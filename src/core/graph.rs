use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{GrapherError, GrapherResult};

/// Characters the equation editor refuses to accept.
pub const RESTRICTED_CHARACTERS: [char; 5] = ['\u{8}', '\n', '"', '\'', ':'];

const DEFAULT_GRAPH_NAME: &str = "grapher-3d";
const DEFAULT_EQUATION: &str = "f(x)=x";

/// One user-edited equation.
///
/// `index` always equals the entry's position in its [`GraphModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationEntry {
    #[serde(rename = "zIndex")]
    index: usize,
    #[serde(rename = "equation")]
    pub expression: String,
    pub disabled: bool,
}

impl EquationEntry {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// User-facing graph document.
///
/// Owned by the application; the orchestration layer only reads it when a
/// reload is requested. Equation indices stay dense and zero-based across
/// every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraphModel")]
pub struct GraphModel {
    pub name: String,
    pub description: String,
    pub animate: bool,
    equations: Vec<EquationEntry>,
}

#[derive(Deserialize)]
struct RawGraphModel {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    animate: bool,
    #[serde(default)]
    equations: Vec<EquationEntry>,
}

impl TryFrom<RawGraphModel> for GraphModel {
    type Error = GrapherError;

    fn try_from(raw: RawGraphModel) -> GrapherResult<Self> {
        let graph = Self {
            name: raw.name,
            description: raw.description,
            animate: raw.animate,
            equations: raw.equations,
        };
        graph.validate_indices()?;
        Ok(graph)
    }
}

impl Default for GraphModel {
    fn default() -> Self {
        let mut graph = Self::new(DEFAULT_GRAPH_NAME);
        graph.equations.push(EquationEntry {
            index: 0,
            expression: DEFAULT_EQUATION.to_owned(),
            disabled: false,
        });
        graph
    }
}

impl GraphModel {
    /// Creates an empty, non-animated graph.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            animate: false,
            equations: Vec::new(),
        }
    }

    #[must_use]
    pub fn equations(&self) -> &[EquationEntry] {
        &self.equations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.equations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn toggle_animate(&mut self) {
        self.animate = !self.animate;
    }

    /// Appends an equation and returns its index.
    pub fn push_equation(&mut self, expression: impl Into<String>) -> GrapherResult<usize> {
        let expression = expression.into();
        validate_expression(&expression)?;
        let index = self.equations.len();
        self.equations.push(EquationEntry {
            index,
            expression,
            disabled: false,
        });
        trace!(index, "push equation");
        Ok(index)
    }

    /// Inserts an equation at `index`, shifting later entries down.
    pub fn insert_equation(
        &mut self,
        index: usize,
        expression: impl Into<String>,
    ) -> GrapherResult<()> {
        if index > self.equations.len() {
            return Err(self.out_of_bounds(index));
        }
        let expression = expression.into();
        validate_expression(&expression)?;
        self.equations.insert(
            index,
            EquationEntry {
                index,
                expression,
                disabled: false,
            },
        );
        self.reindex_from(index);
        trace!(index, count = self.equations.len(), "insert equation");
        Ok(())
    }

    /// Removes the equation at `index` and re-indexes everything after it.
    pub fn remove_equation(&mut self, index: usize) -> GrapherResult<EquationEntry> {
        if index >= self.equations.len() {
            return Err(self.out_of_bounds(index));
        }
        let removed = self.equations.remove(index);
        self.reindex_from(index);
        trace!(index, count = self.equations.len(), "remove equation");
        Ok(removed)
    }

    /// Flips the disabled flag and returns the new value.
    pub fn toggle_disabled(&mut self, index: usize) -> GrapherResult<bool> {
        let entry = self
            .equations
            .get_mut(index)
            .ok_or_else(|| GrapherError::InvalidData(format!("no equation at index {index}")))?;
        entry.disabled = !entry.disabled;
        Ok(entry.disabled)
    }

    /// Replaces an equation's text. Restricted characters are rejected.
    pub fn set_expression(
        &mut self,
        index: usize,
        expression: impl Into<String>,
    ) -> GrapherResult<()> {
        let expression = expression.into();
        validate_expression(&expression)?;
        if index >= self.equations.len() {
            return Err(self.out_of_bounds(index));
        }
        self.equations[index].expression = expression;
        Ok(())
    }

    /// Checks that every entry's index matches its position.
    pub fn validate_indices(&self) -> GrapherResult<()> {
        for (position, entry) in self.equations.iter().enumerate() {
            if entry.index != position {
                return Err(GrapherError::InvalidData(format!(
                    "equation at position {position} carries index {}",
                    entry.index
                )));
            }
        }
        Ok(())
    }

    fn reindex_from(&mut self, start: usize) {
        for (position, entry) in self.equations.iter_mut().enumerate().skip(start) {
            entry.index = position;
        }
    }

    fn out_of_bounds(&self, index: usize) -> GrapherError {
        GrapherError::InvalidData(format!(
            "equation index {index} out of bounds for {} equations",
            self.equations.len()
        ))
    }
}

fn validate_expression(expression: &str) -> GrapherResult<()> {
    if let Some(ch) = expression
        .chars()
        .find(|ch| RESTRICTED_CHARACTERS.contains(ch))
    {
        return Err(GrapherError::InvalidData(format!(
            "expression contains restricted character {ch:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::GraphModel;
    use crate::error::GrapherError;

    fn indices(graph: &GraphModel) -> Vec<usize> {
        graph.equations().iter().map(|entry| entry.index()).collect()
    }

    #[test]
    fn default_graph_has_single_identity_equation() {
        let graph = GraphModel::default();
        assert_eq!(graph.name, "grapher-3d");
        assert!(!graph.animate);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.equations()[0].expression, "f(x)=x");
        assert!(!graph.equations()[0].disabled);
    }

    #[test]
    fn insert_in_middle_shifts_later_indices() {
        let mut graph = GraphModel::new("g");
        graph.push_equation("a").expect("push a");
        graph.push_equation("c").expect("push c");
        graph.insert_equation(1, "b").expect("insert b");

        assert_eq!(indices(&graph), vec![0, 1, 2]);
        let names: Vec<&str> = graph
            .equations()
            .iter()
            .map(|entry| entry.expression.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_first_reindexes_rest() {
        let mut graph = GraphModel::new("g");
        for expr in ["a", "b", "c"] {
            graph.push_equation(expr).expect("push");
        }
        let removed = graph.remove_equation(0).expect("remove");
        assert_eq!(removed.expression, "a");
        assert_eq!(indices(&graph), vec![0, 1]);
        assert_eq!(graph.equations()[0].expression, "b");
    }

    #[test]
    fn remove_out_of_bounds_is_rejected() {
        let mut graph = GraphModel::new("g");
        let err = graph.remove_equation(0).expect_err("empty graph");
        assert!(matches!(err, GrapherError::InvalidData(_)));
    }

    #[test]
    fn restricted_characters_are_rejected() {
        let mut graph = GraphModel::default();
        for bad in ["f(x)=\"x\"", "a:b", "it's", "x\ny"] {
            let err = graph.set_expression(0, bad).expect_err("restricted");
            assert!(matches!(err, GrapherError::InvalidData(_)));
        }
        assert_eq!(graph.equations()[0].expression, "f(x)=x");
    }

    #[test]
    fn toggle_disabled_flips_flag() {
        let mut graph = GraphModel::default();
        assert!(graph.toggle_disabled(0).expect("toggle"));
        assert!(!graph.toggle_disabled(0).expect("toggle back"));
        assert!(graph.toggle_disabled(3).is_err());
    }

    #[test]
    fn json_uses_backend_field_names() {
        let graph = GraphModel::default();
        let json = serde_json::to_value(&graph).expect("serialize");
        assert_eq!(json["equations"][0]["zIndex"], 0);
        assert_eq!(json["equations"][0]["equation"], "f(x)=x");

        let back: GraphModel = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, graph);
    }

    #[test]
    fn json_with_sparse_indices_is_rejected() {
        let input = r#"{
            "name": "g",
            "description": "",
            "animate": true,
            "equations": [
                { "zIndex": 0, "equation": "x", "disabled": false },
                { "zIndex": 2, "equation": "y", "disabled": false }
            ]
        }"#;
        assert!(serde_json::from_str::<GraphModel>(input).is_err());
    }
}
