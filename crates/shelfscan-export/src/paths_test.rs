use super::*;

fn vars() -> OutputVars<'static> {
    OutputVars {
        retailer: "amazon.de",
        brand: "Philips",
        category: "Baby Bottle",
        date: "2024-03-07",
    }
}

#[test]
fn slugify_collapses_separators() {
    assert_eq!(slugify("Baby Bottle"), "baby_bottle");
    assert_eq!(slugify("  Dr. Brown's / Natural Flow "), "dr._brown_s_natural_flow");
    assert_eq!(slugify("amazon.de"), "amazon.de");
    assert_eq!(slugify("///"), "");
}

#[test]
fn renders_default_template() {
    let path = render_output_path("output/{retailer}_{brand}_{category}_{date}.csv", &vars());
    assert_eq!(
        path,
        PathBuf::from("output/amazon.de_philips_baby_bottle_2024-03-07.csv")
    );
}

#[test]
fn values_cannot_escape_the_template_directory() {
    let v = OutputVars {
        brand: "../../etc",
        ..vars()
    };
    let path = render_output_path("out/{brand}.csv", &v);
    assert_eq!(path, PathBuf::from("out/.._.._etc.csv"));
    assert_eq!(path.parent(), Some(Path::new("out")));
}

#[test]
fn unknown_placeholders_are_kept() {
    let path = render_output_path("{retailer}-{market}.csv", &vars());
    assert_eq!(path, PathBuf::from("amazon.de-{market}.csv"));
}

#[test]
fn unique_path_returns_input_when_free() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    assert_eq!(unique_path(&path), path);
}

#[test]
fn unique_path_appends_counter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    std::fs::write(&path, "a").unwrap();
    assert_eq!(unique_path(&path), dir.path().join("report_1.csv"));

    std::fs::write(dir.path().join("report_1.csv"), "b").unwrap();
    assert_eq!(unique_path(&path), dir.path().join("report_2.csv"));
}

#[test]
fn unique_path_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report");
    std::fs::write(&path, "a").unwrap();
    assert_eq!(unique_path(&path), dir.path().join("report_1"));
}

#[test]
fn archive_copy_never_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("scraped_data.json");
    std::fs::write(&src, "[]").unwrap();
    let dest = dir.path().join("archive").join("amazon.json");

    let first = archive_copy(&src, &dest).unwrap();
    let second = archive_copy(&src, &dest).unwrap();

    assert_eq!(first, dest);
    assert_eq!(second, dir.path().join("archive").join("amazon_1.json"));
    assert_eq!(std::fs::read_to_string(second).unwrap(), "[]");
}

#[test]
fn archive_copy_missing_source_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = archive_copy(&dir.path().join("nope.json"), &dir.path().join("x.json"));
    assert!(matches!(result, Err(ExportError::Io { .. })));
}
