use notemaker_common::batch::{compile, BodyModel};
use notemaker_common::extract::extract;
use notemaker_common::types::EditOperation;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct GoldenCase {
    name: String,
    page: String,
    expected_body: String,
    expected_ops: Vec<EditOperation>,
}

#[test]
fn html_to_batch_golden_cases() {
    let cases_dir = golden_cases_dir();
    let cases = load_cases(&cases_dir);

    assert!(
        !cases.is_empty(),
        "no golden cases found in {}",
        cases_dir.display()
    );

    let mut failures = Vec::new();
    for case in cases {
        if let Err(message) = run_case(&case) {
            failures.push(message);
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} golden case(s) failed:\n\n{}",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

fn golden_cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tests/golden/cases")
}

fn load_cases(cases_dir: &Path) -> Vec<GoldenCase> {
    let mut case_dirs: Vec<PathBuf> = fs::read_dir(cases_dir)
        .unwrap_or_else(|error| panic!("failed to read {}: {error}", cases_dir.display()))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if path.is_dir() { Some(path) } else { None }
        })
        .collect();
    case_dirs.sort();
    case_dirs.into_iter().map(load_case).collect()
}

fn load_case(case_dir: PathBuf) -> GoldenCase {
    let name = case_dir
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("<unnamed-case>")
        .to_owned();

    let page = read_required(&case_dir.join("page.html"));
    let expected_body = read_required(&case_dir.join("expected_body.txt"));
    let expected_ops_path = case_dir.join("expected_ops.json");
    let expected_ops = serde_json::from_str::<Vec<EditOperation>>(&read_required(&expected_ops_path))
        .unwrap_or_else(|error| {
            panic!(
                "failed to parse expected ops in {}: {error}",
                expected_ops_path.display()
            )
        });

    GoldenCase { name, page, expected_body, expected_ops }
}

fn run_case(case: &GoldenCase) -> Result<(), String> {
    let actual_ops = compile(&extract(&case.page));

    if actual_ops != case.expected_ops {
        return Err(format_ops_mismatch(&case.name, &case.expected_ops, &actual_ops));
    }

    let mut body = BodyModel::new();
    body.apply_batch(&actual_ops)
        .map_err(|error| format!("case `{}` batch rejected: {error}", case.name))?;
    let actual_body = body.body_text();

    if actual_body != case.expected_body {
        return Err(format!(
            "case `{}` final body mismatch.\nexpected: {:?}\nactual:   {:?}",
            case.name, case.expected_body, actual_body
        ));
    }

    Ok(())
}

fn format_ops_mismatch(
    case_name: &str,
    expected: &[EditOperation],
    actual: &[EditOperation],
) -> String {
    let expected_rendered = render_ops(expected);
    let actual_rendered = render_ops(actual);
    let max_len = expected_rendered.len().max(actual_rendered.len());

    let mut diff_lines = Vec::with_capacity(max_len);
    for index in 0..max_len {
        let expected_line = expected_rendered.get(index).map(String::as_str).unwrap_or("<none>");
        let actual_line = actual_rendered.get(index).map(String::as_str).unwrap_or("<none>");
        let marker = if expected_line == actual_line { " " } else { "!" };
        diff_lines.push(format!(
            "{marker} [{index}] expected: {expected_line}\n      actual:   {actual_line}"
        ));
    }

    format!(
        "case `{case_name}` edit ops mismatch.\nExpected ops:\n{}\nActual ops:\n{}\nDiff:\n{}",
        expected_rendered.join("\n"),
        actual_rendered.join("\n"),
        diff_lines.join("\n")
    )
}

fn render_ops(ops: &[EditOperation]) -> Vec<String> {
    ops.iter()
        .map(|op| match op {
            EditOperation::InsertText { text, index } => {
                format!("insert(index={index}, text={text:?})")
            }
            EditOperation::SetParagraphStyle { style, start, end } => {
                format!("paragraph(style={style}, range=[{start}, {end}])")
            }
            EditOperation::SetCharacterStyle { style, start, end } => {
                format!("character(style={}, range=[{start}, {end}])", style.style_field())
            }
        })
        .collect()
}

fn read_required(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|error| panic!("failed to read {}: {error}", path.display()))
}
