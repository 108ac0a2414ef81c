use std::fs;
use std::path::Path;
use xmljson::{convert, from_xml_str};

fn xml_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, std::io::Error> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "xml") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid"));
    let paths = xml_files(valid_dir)?;
    assert!(!paths.is_empty());

    for path in paths {
        let content = fs::read_to_string(&path)?;
        let expected = fs::read_to_string(path.with_extension("json"))?;
        let output = convert(&content)
            .map_err(|err| std::io::Error::other(format!("{}: {err}", path.display())))?;
        assert_eq!(output, expected.trim_end(), "fixture: {}", path.display());
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid"));
    for path in xml_files(invalid_dir)? {
        let content = fs::read_to_string(&path)?;
        if from_xml_str(&content).is_ok() {
            return Err(std::io::Error::other(format!(
                "Should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}
