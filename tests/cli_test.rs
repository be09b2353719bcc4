use anyhow::Result;
use cogbias::category::Category;
use cogbias::store::BuildingBlockStore;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Helper to run cogbias with an isolated home directory and scripted stdin
fn run_cogbias(home: &Path, args: &[&str], stdin: &str) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cogbias"));
    cmd.args(args);

    // Keep the user's config out of the test and force canned completions
    cmd.env("HOME", home);
    cmd.env("COGBIAS_USE_MOCK", "1");
    cmd.env_remove("RUST_LOG");

    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    if let Some(mut child_stdin) = child.stdin.take() {
        child_stdin.write_all(stdin.as_bytes())?;
    }
    Ok(child.wait_with_output()?)
}

#[test]
fn test_generate_names_and_show() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");
    let store_arg = store.to_str().unwrap();

    let output = run_cogbias(dir.path(), &["--store", store_arg, "names"], "n\n")?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Here is a list of popular Western names:"), "Should echo the prompt");
    assert!(stdout.contains("Sarah, James, Emily, Robert"), "Should preview the cleaned batch");
    assert!(stdout.contains("resample? (y/n)"));
    assert!(stdout.contains("Stored 4 names"));
    assert!(store.exists());

    let output = run_cogbias(dir.path(), &["--store", store_arg, "--show"], "")?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("names (4):"));
    assert!(stdout.contains("  - Robert"));

    Ok(())
}

#[test]
fn test_resample_answer_repeats_the_batch() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");

    let output = run_cogbias(
        dir.path(),
        &["--store", store.to_str().unwrap(), "occupations"],
        "y\ny\nn\n",
    )?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("resample? (y/n)").count(), 3);
    assert_eq!(stdout.matches("nurse, accountant, firefighter, librarian").count(), 3);

    Ok(())
}

#[test]
fn test_descriptions_generate_prerequisites_first() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");
    let store_arg = store.to_str().unwrap();

    // End of input accepts every batch
    let output = run_cogbias(dir.path(), &["--store", store_arg, "descriptions"], "")?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let occupations_at = stdout.find("Need to generate occupations first.").unwrap();
    let hobbies_at = stdout.find("Need to generate hobbies first.").unwrap();
    assert!(occupations_at < hobbies_at);
    assert!(stdout.contains("Stored 4 descriptions"));

    let output = run_cogbias(dir.path(), &["--store", store_arg, "--show"], "")?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("occupations (4):"));
    assert!(stdout.contains("hobbies (4):"));
    assert!(stdout.contains("descriptions (4):"));
    assert!(!stdout.contains("names ("));

    Ok(())
}

#[test]
fn test_render_fills_template() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");
    let store_arg = store.to_str().unwrap();
    let template = dir.path().join("template.txt");
    std::fs::write(&template, "Q: Is {name} a {occupation} who {hobby}?\nignored second line\n")?;

    run_cogbias(dir.path(), &["--store", store_arg, "names", "descriptions"], "")?;
    let output = run_cogbias(
        dir.path(),
        &["--store", store_arg, "--render", "--template", template.to_str().unwrap()],
        "",
    )?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("---BEGIN TRANSCRIPT---"));
    assert!(stdout.contains("Q: Is Sarah a nurse who "));
    assert!(!stdout.contains("ignored second line"));

    Ok(())
}

#[test]
fn test_render_refuses_misaligned_store() -> Result<()> {
    let dir = TempDir::new()?;
    let store_path = dir.path().join("blocks.bin");
    let template = dir.path().join("template.txt");
    std::fs::write(&template, "Is {name} a {occupation} who {hobby}?\n")?;

    let mut store = BuildingBlockStore::new();
    store.set(Category::Names, vec!["Linda".to_string()]);
    store.set(Category::Occupations, vec!["nurse".to_string(), "astronaut".to_string()]);
    store.set(Category::Hobbies, vec!["keeps bees".to_string()]);
    store.set(Category::Descriptions, vec!["41 years old.".to_string()]);
    store.save(&store_path)?;

    let output = run_cogbias(
        dir.path(),
        &[
            "--store",
            store_path.to_str().unwrap(),
            "--render",
            "--template",
            template.to_str().unwrap(),
        ],
        "",
    )?;
    assert!(!output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("astronaut"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot render items"), "stderr: {}", stderr);
    assert!(stderr.contains("hobbies has 1 item(s) but occupations has 2"));

    Ok(())
}

#[test]
fn test_corrupt_store_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");
    std::fs::write(&store, b"not a store")?;

    let output = run_cogbias(dir.path(), &["--store", store.to_str().unwrap(), "--show"], "")?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not open store"), "stderr: {}", stderr);

    Ok(())
}

#[test]
fn test_unknown_category_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let store = dir.path().join("blocks.bin");

    let output = run_cogbias(dir.path(), &["--store", store.to_str().unwrap(), "pets"], "")?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown category 'pets'"));
    assert!(!store.exists());

    Ok(())
}
