use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use emptydir_fs::{
    EmptyDirError, EnumIgnorePattern, EnumIgnorePatternMode, ReportEmptyDir, SpecEmptyDirOptions,
    compile_ignore_patterns, inspect_dir_sync,
};
use pyo3::exceptions::{
    PyFileNotFoundError, PyNotADirectoryError, PyPermissionError, PyTypeError, PyValueError,
};
use pyo3::prelude::*;
use pyo3::types::{PyList, PyString, PyTuple};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "emptydir.fs.is_empty_dir.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

/// First exception raised by a Python-side ignore callable.
type TypePyErrSlot = Arc<Mutex<Option<PyErr>>>;

#[pyclass(name = "ReportEmptyDir")]
#[derive(Debug, Clone)]
struct PyReportEmptyDir {
    #[pyo3(get)]
    if_empty: bool,
    #[pyo3(get)]
    cnt_scanned: u64,
    #[pyo3(get)]
    cnt_skipped_symlinks: u64,
    #[pyo3(get)]
    cnt_ignored: u64,
    #[pyo3(get)]
    name_first_present: Option<String>,
}

impl From<ReportEmptyDir> for PyReportEmptyDir {
    fn from(report: ReportEmptyDir) -> Self {
        Self {
            if_empty: report.if_empty,
            cnt_scanned: report.cnt_scanned,
            cnt_skipped_symlinks: report.cnt_skipped_symlinks,
            cnt_ignored: report.cnt_ignored,
            name_first_present: report.name_first_present,
        }
    }
}

impl PyReportEmptyDir {
    fn to_report(&self) -> ReportEmptyDir {
        ReportEmptyDir {
            if_empty: self.if_empty,
            cnt_scanned: self.cnt_scanned,
            cnt_skipped_symlinks: self.cnt_skipped_symlinks,
            cnt_ignored: self.cnt_ignored,
            name_first_present: self.name_first_present.clone(),
        }
    }
}

#[pymethods]
impl PyReportEmptyDir {
    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.to_report().to_dict()
    }

    #[pyo3(signature = (prefix = "[EMPTY]"))]
    fn format(&self, prefix: &str) -> String {
        self.to_report().format(prefix)
    }

    fn __str__(&self) -> String {
        self.to_report().to_string()
    }
}

fn parse_rule_pattern(value: &str) -> PyResult<EnumIgnorePatternMode> {
    match value {
        "glob" => Ok(EnumIgnorePatternMode::Glob),
        "regex" => Ok(EnumIgnorePatternMode::Regex),
        "literal" => Ok(EnumIgnorePatternMode::Literal),
        _ => Err(PyValueError::new_err(format!(
            "Invalid pattern strategy: `{value}`. Expected one of: ['glob', 'regex', 'literal']"
        ))),
    }
}

fn parse_dir_path(dir_path: &Bound<'_, PyAny>) -> PyResult<String> {
    if !dir_path.is_instance_of::<PyString>() {
        return Err(PyTypeError::new_err("Expected dir_path to be a string"));
    }
    dir_path.extract::<String>()
}

/// Wrap a Python object as a predicate pattern.
///
/// `if_is_regex` calls `obj.search(name)`; otherwise `obj(name)`.
/// The first exception is parked in `slot_err`; from then on every wrapped
/// predicate reports "ignored" without calling back into Python, so no
/// further user code runs and `should_ignore` stops at the failing pattern.
fn wrap_py_predicate(
    obj: &Bound<'_, PyAny>,
    if_is_regex: bool,
    slot_err: &TypePyErrSlot,
) -> EnumIgnorePattern {
    let obj = obj.clone().unbind();
    let slot_err = Arc::clone(slot_err);
    EnumIgnorePattern::predicate(move |name| {
        if has_py_error(&slot_err) {
            return true;
        }
        Python::with_gil(|py| {
            let obj = obj.bind(py);
            let res = if if_is_regex {
                obj.call_method1("search", (name,)).map(|m| !m.is_none())
            } else {
                obj.call1((name,)).and_then(|v| v.is_truthy())
            };
            res.unwrap_or_else(|e| {
                if let Ok(mut slot) = slot_err.lock() {
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
                true
            })
        })
    })
}

fn has_py_error(slot_err: &TypePyErrSlot) -> bool {
    slot_err.lock().map(|slot| slot.is_some()).unwrap_or(true)
}

/// Convert the dynamic `ignore` argument into typed patterns.
///
/// Anything other than a list/tuple ignores nothing; unsupported items
/// never match.
fn parse_ignore(
    ignore: Option<&Bound<'_, PyAny>>,
    slot_err: &TypePyErrSlot,
) -> PyResult<Vec<EnumIgnorePattern>> {
    let Some(ignore) = ignore else {
        return Ok(Vec::new());
    };
    if !(ignore.is_instance_of::<PyList>() || ignore.is_instance_of::<PyTuple>()) {
        tracing::debug!("`ignore` is not a list or tuple; ignoring nothing");
        return Ok(Vec::new());
    }

    let mut l_patterns = Vec::new();
    for item in ignore.try_iter()? {
        let item = item?;
        if item.is_instance_of::<PyString>() {
            l_patterns.push(EnumIgnorePattern::literal(item.extract::<String>()?));
        } else if item.hasattr("search")? && item.hasattr("pattern")? {
            l_patterns.push(wrap_py_predicate(&item, true, slot_err));
        } else if item.is_callable() {
            l_patterns.push(wrap_py_predicate(&item, false, slot_err));
        } else {
            tracing::debug!("skipping unsupported ignore pattern type");
        }
    }
    Ok(l_patterns)
}

fn map_empty_dir_error(exception: EmptyDirError) -> PyErr {
    match exception {
        EmptyDirError::NotFound(path) => PyFileNotFoundError::new_err((
            2,
            "Directory does not exist",
            path.display().to_string(),
        )),
        EmptyDirError::PermissionDenied(path) => PyPermissionError::new_err((
            13,
            "Permission denied",
            path.display().to_string(),
        )),
        EmptyDirError::NotADirectory(path) => PyNotADirectoryError::new_err((
            20,
            "Path is not a directory",
            path.display().to_string(),
        )),
        err @ EmptyDirError::InvalidPattern { .. } => PyValueError::new_err(err.to_string()),
        EmptyDirError::Io(e) => PyErr::from(e),
    }
}

fn run_inspect(
    py: Python<'_>,
    dir_path: &Bound<'_, PyAny>,
    ignore: Option<&Bound<'_, PyAny>>,
    follow_symlinks: bool,
    patterns_ignore: Option<Vec<String>>,
    rule_pattern: &str,
) -> PyResult<ReportEmptyDir> {
    let dir_path = parse_dir_path(dir_path)?;
    let slot_err: TypePyErrSlot = Arc::new(Mutex::new(None));

    let mut l_ignore = parse_ignore(ignore, &slot_err)?;
    if let Some(patterns_ignore) = patterns_ignore {
        let enum_rule_pattern = parse_rule_pattern(rule_pattern)?;
        let l_compiled = compile_ignore_patterns(&patterns_ignore, enum_rule_pattern)
            .map_err(map_empty_dir_error)?;
        l_ignore.extend(l_compiled);
    }
    let spec_options = SpecEmptyDirOptions {
        ignore: l_ignore,
        if_follow_symlinks: follow_symlinks,
    };

    let report = py.allow_threads(|| inspect_dir_sync(&dir_path, &spec_options));
    if let Some(e) = slot_err.lock().ok().and_then(|mut slot| slot.take()) {
        return Err(e);
    }
    report.map_err(map_empty_dir_error)
}

#[pyfunction(name = "is_empty_dir")]
#[pyo3(signature = (
    dir_path,
    ignore = None,
    follow_symlinks = false,
    patterns_ignore = None,
    rule_pattern = "glob"
))]
fn is_empty_dir_py(
    py: Python<'_>,
    dir_path: &Bound<'_, PyAny>,
    ignore: Option<&Bound<'_, PyAny>>,
    follow_symlinks: bool,
    patterns_ignore: Option<Vec<String>>,
    rule_pattern: &str,
) -> PyResult<bool> {
    run_inspect(
        py,
        dir_path,
        ignore,
        follow_symlinks,
        patterns_ignore,
        rule_pattern,
    )
    .map(|report| report.if_empty)
}

#[pyfunction(name = "inspect_dir")]
#[pyo3(signature = (
    dir_path,
    ignore = None,
    follow_symlinks = false,
    patterns_ignore = None,
    rule_pattern = "glob"
))]
fn inspect_dir_py(
    py: Python<'_>,
    dir_path: &Bound<'_, PyAny>,
    ignore: Option<&Bound<'_, PyAny>>,
    follow_symlinks: bool,
    patterns_ignore: Option<Vec<String>>,
    rule_pattern: &str,
) -> PyResult<PyReportEmptyDir> {
    run_inspect(
        py,
        dir_path,
        ignore,
        follow_symlinks,
        patterns_ignore,
        rule_pattern,
    )
    .map(PyReportEmptyDir::from)
}

#[pymodule]
fn _emptydir_fs_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportEmptyDir>()?;
    module.add_function(wrap_pyfunction!(is_empty_dir_py, module)?)?;
    module.add_function(wrap_pyfunction!(inspect_dir_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
