//! Python bindings for the Lofi parser.

use lofi_core::{
    parse_element as core_parse_element, parse_section as core_parse_section,
    parse_sections as core_parse_sections, Content as CoreContent, Element as CoreElement,
    KeyPath, TagValue,
};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use pyo3::IntoPyObjectExt;

// ============================================================================
// Content
// ============================================================================

/// Value of a `#key: value` tag: texts interleaved with mentions.
#[pyclass(frozen, get_all, eq, name = "Content")]
#[derive(Clone, PartialEq)]
pub struct PyContent {
    pub texts: Vec<String>,
    pub mentions: Vec<Vec<String>>,
}

#[pymethods]
impl PyContent {
    fn __repr__(&self) -> String {
        format!(
            "Content(texts={:?}, mentions={:?})",
            self.texts, self.mentions
        )
    }
}

impl From<CoreContent<'_>> for PyContent {
    fn from(c: CoreContent<'_>) -> Self {
        PyContent {
            texts: c.texts.into_iter().map(|t| t.into_owned()).collect(),
            mentions: c.mentions.into_iter().map(convert_path).collect(),
        }
    }
}

fn convert_path(path: KeyPath<'_>) -> Vec<String> {
    path.into_iter().map(|s| s.into_owned()).collect()
}

// ============================================================================
// Element
// ============================================================================

/// Parsed structure of one line.
///
/// `tags_hash` maps flag tags to `True` and value tags to `Content`.
#[pyclass(frozen, name = "Element")]
pub struct PyElement {
    #[pyo3(get)]
    pub introducing: Option<String>,
    #[pyo3(get)]
    pub texts: Vec<String>,
    #[pyo3(get)]
    pub mentions: Vec<Vec<String>>,
    #[pyo3(get)]
    pub tags_path: Vec<String>,
    #[pyo3(get)]
    pub tags_hash: PyObject,
    #[pyo3(get)]
    pub children: PyObject,
    /// Detached copy used for structural equality.
    element: CoreElement<'static>,
}

#[pymethods]
impl PyElement {
    fn __repr__(&self, py: Python<'_>) -> String {
        let children: &Bound<'_, PyList> = match self.children.downcast_bound(py) {
            Ok(list) => list,
            Err(_) => return "Element(<invalid>)".to_string(),
        };
        format!(
            "Element(introducing={:?}, texts={:?}, mentions={:?}, tags_path={:?}, children={})",
            self.introducing,
            self.texts,
            self.mentions,
            self.tags_path,
            children.len()
        )
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        match other.downcast::<PyElement>() {
            Ok(other) => self.element == other.get().element,
            Err(_) => false,
        }
    }
}

fn convert_tag_value(py: Python<'_>, value: TagValue<'_>) -> PyResult<PyObject> {
    match value {
        TagValue::Flag => true.into_py_any(py),
        TagValue::Content(content) => PyContent::from(content).into_py_any(py),
    }
}

fn convert_element(py: Python<'_>, element: CoreElement<'_>) -> PyResult<PyElement> {
    let element = element.into_owned();

    let tags_hash = PyDict::new(py);
    for (key, value) in element.tags_hash.clone() {
        tags_hash.set_item(key.into_owned(), convert_tag_value(py, value)?)?;
    }

    let children = convert_elements(py, element.children.clone())?;

    Ok(PyElement {
        introducing: element.introducing.clone().map(|s| s.into_owned()),
        texts: element.texts.iter().map(|t| t.to_string()).collect(),
        mentions: element.mentions.clone().into_iter().map(convert_path).collect(),
        tags_path: element.tags_path.iter().map(|t| t.to_string()).collect(),
        tags_hash: tags_hash.into(),
        children,
        element,
    })
}

fn convert_elements(py: Python<'_>, elements: Vec<CoreElement<'_>>) -> PyResult<PyObject> {
    let list = PyList::empty(py);
    for element in elements {
        list.append(Py::new(py, convert_element(py, element)?)?)?;
    }
    Ok(list.into())
}

// ============================================================================
// Module functions
// ============================================================================

/// Parse a single line.
///
/// Args:
///     line: One line of Lofi text
///
/// Returns:
///     Element: Parsed element (children is always empty)
#[pyfunction]
#[pyo3(text_signature = "(line)")]
fn parse_element(py: Python<'_>, line: &str) -> PyResult<PyElement> {
    convert_element(py, core_parse_element(line))
}

/// Parse one block into a list of top-level elements.
///
/// Args:
///     text: Lines of a single section
///
/// Returns:
///     list[Element]: Top-level elements with their `- item` children
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn parse_section(py: Python<'_>, text: &str) -> PyResult<PyObject> {
    convert_elements(py, core_parse_section(text))
}

/// Parse a whole document; empty lines separate sections.
///
/// Args:
///     text: Document text
///
/// Returns:
///     list[list[Element]]: One list of elements per section
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn parse_sections(py: Python<'_>, text: &str) -> PyResult<PyObject> {
    let sections = PyList::empty(py);
    for section in core_parse_sections(text) {
        sections.append(convert_elements(py, section)?)?;
    }
    Ok(sections.into())
}

// ============================================================================
// Module
// ============================================================================

/// Lofi - mentions, tags and one level of nesting in plain text.
#[pymodule]
fn pylofi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyContent>()?;
    m.add_class::<PyElement>()?;
    m.add_function(wrap_pyfunction!(parse_element, m)?)?;
    m.add_function(wrap_pyfunction!(parse_section, m)?)?;
    m.add_function(wrap_pyfunction!(parse_sections, m)?)?;
    Ok(())
}
