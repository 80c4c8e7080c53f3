//! Python bindings

use std::sync::Arc;

use parking_lot::RwLock;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::ParserConfig;
use crate::parser::ExpressionParser;

/// Read parser options from a Python dict; unknown keys are ignored
fn deserialize_config(dict: &Bound<'_, PyDict>) -> PyResult<ParserConfig> {
    let mut config = ParserConfig::default();
    if let Some(value) = dict.get_item("reject_unclosed_braces")? {
        config.reject_unclosed_braces = value.extract()?;
    }
    Ok(config)
}

/// Parse-once, evaluate-many expression parser
#[pyclass(name = "ExpressionParser")]
pub struct PyExpressionParser {
    inner: Arc<RwLock<ExpressionParser>>,
}

#[pymethods]
impl PyExpressionParser {
    /// Create a parser
    ///
    /// # Arguments
    /// * `config` - Optional dict, e.g. {"reject_unclosed_braces": True}
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(config: Option<&Bound<'_, PyDict>>) -> PyResult<Self> {
        let config = match config {
            Some(dict) => deserialize_config(dict)?,
            None => ParserConfig::default(),
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(ExpressionParser::with_config(config))),
        })
    }

    /// Compile an expression
    ///
    /// # Raises
    /// ValueError for malformed input, RuntimeError if already parsed
    fn parse(&self, text: &str) -> PyResult<()> {
        self.inner.write().parse(text)?;
        Ok(())
    }

    fn evaluate(&self, value: i32) -> bool {
        self.inner.read().evaluate(value)
    }

    fn evaluate_many(&self, values: Vec<i32>) -> Vec<bool> {
        self.inner.read().evaluate_many(&values)
    }

    /// Evaluate a batch on a background thread
    ///
    /// # Returns
    /// A Python awaitable resolving to a list of bools
    fn evaluate_async<'py>(&self, py: Python<'py>, values: Vec<i32>) -> PyResult<Bound<'py, PyAny>> {
        // Take the frozen tree before entering async context
        let tree = self.inner.read().tree();

        pyo3_async_runtimes::tokio::future_into_py(py, async move {
            let results = tokio::task::spawn_blocking(move || match tree {
                Some(tree) => tree.evaluate_many(&values),
                None => vec![false; values.len()],
            })
            .await
            .map_err(|e| {
                PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                    "Evaluation task panicked: {}",
                    e
                ))
            })?;

            Ok(results)
        })
    }

    /// Discard the compiled tree so another expression can be parsed
    fn reset(&self) {
        self.inner.write().reset();
    }

    #[getter]
    fn is_parsed(&self) -> bool {
        self.inner.read().is_parsed()
    }

    #[getter]
    fn error_location(&self) -> usize {
        self.inner.read().error_location()
    }

    #[getter]
    fn error_message(&self) -> String {
        self.inner.read().error_message()
    }

    #[getter]
    fn result_code(&self) -> &'static str {
        self.inner.read().result_code().as_str()
    }

    /// Grouped rendering of the compiled tree, or None
    fn describe(&self) -> Option<String> {
        self.inner.read().describe()
    }
}

/// Parse and evaluate in one call
#[pyfunction]
pub fn evaluate_expression(text: &str, value: i32) -> PyResult<bool> {
    let mut parser = ExpressionParser::new();
    parser.parse(text)?;
    Ok(parser.evaluate(value))
}
