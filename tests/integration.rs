use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn vcat_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("vcat");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // No [remote] section: the catalog runs purely locally.
    let config_content = format!(
        r#"[db]
path = "{}/data/catalog.sqlite"

[catalog]
default_category = "General"
sentinel_category = "Welcome"

[credentials.student]
user = "student"
pass = "letmein"

[credentials.admin]
user = "boss"
pass = "secret"
"#,
        root.display()
    );

    let config_path = config_dir.join("vcat.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_vcat(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = vcat_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run vcat binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_vcat(&config_path, &["init"]);
    assert!(success, "init failed: {}", stderr);
    assert!(stdout.contains("Database initialized successfully."));

    // Idempotent.
    let (_, stderr, success) = run_vcat(&config_path, &["init"]);
    assert!(success, "second init failed: {}", stderr);
}

#[test]
fn test_mutations_require_admin_login() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);

    let (_, stderr, success) = run_vcat(
        &config_path,
        &[
            "video", "add", "--title", "Intro", "--link", "https://youtu.be/abc123",
            "--category", "General",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("login required"));

    // Student sessions cannot mutate either.
    let (_, _, success) = run_vcat(
        &config_path,
        &["login", "--role", "student", "--user", "student", "--pass", "letmein"],
    );
    assert!(success);
    let (_, stderr, success) = run_vcat(
        &config_path,
        &[
            "video", "add", "--title", "Intro", "--link", "https://youtu.be/abc123",
            "--category", "General",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("admin session required"));
}

#[test]
fn test_login_rejects_bad_credentials() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);

    let (_, stderr, success) = run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "wrong"],
    );
    assert!(!success);
    assert!(stderr.contains("invalid credentials"));
}

#[test]
fn test_video_crud_roundtrip() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);
    let (stdout, _, success) = run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "secret"],
    );
    assert!(success);
    assert!(stdout.contains("logged in as boss (admin)"));

    let (stdout, stderr, success) = run_vcat(
        &config_path,
        &[
            "video", "add", "--title", "Intro", "--link", "https://youtu.be/abc123",
            "--category", "General",
        ],
    );
    assert!(success, "video add failed: {}", stderr);
    let id = stdout
        .lines()
        .find_map(|l| l.strip_prefix("video added: "))
        .expect("missing id line")
        .trim()
        .to_string();

    // The admin view lists the new entry and its derived category.
    let (stdout, _, _) = run_vcat(&config_path, &["video", "list"]);
    assert!(stdout.contains("Intro"));
    let (stdout, _, _) = run_vcat(&config_path, &["category", "list"]);
    assert!(stdout.contains("General"));

    // Edit keeps the id and replaces fields in place.
    let (stdout, stderr, success) = run_vcat(
        &config_path,
        &["video", "edit", &id, "--title", "Intro (updated)"],
    );
    assert!(success, "video edit failed: {}", stderr);
    assert!(stdout.contains(&format!("video updated: {}", id)));
    let (stdout, _, _) = run_vcat(&config_path, &["video", "list"]);
    assert!(stdout.contains("Intro (updated)"));

    // Deleting an unknown id is a no-op, not an error.
    let (stdout, _, success) = run_vcat(&config_path, &["video", "rm", "missing", "--yes"]);
    assert!(success);
    assert!(stdout.contains("video not found: missing"));

    let (stdout, _, success) = run_vcat(&config_path, &["video", "rm", &id, "--yes"]);
    assert!(success);
    assert!(stdout.contains(&format!("video deleted: {}", id)));
}

#[test]
fn test_csv_export_import_roundtrip() {
    let (tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);
    run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "secret"],
    );
    run_vcat(
        &config_path,
        &[
            "video", "add", "--title", "Exported, with comma", "--link",
            "https://youtu.be/xyz", "--category", "Tutorial",
        ],
    );

    let csv_path = tmp.path().join("out").join("videos.csv");
    let (_, stderr, success) = run_vcat(
        &config_path,
        &["export", "--output", csv_path.to_str().unwrap()],
    );
    assert!(success, "export failed: {}", stderr);
    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("id,title,link,category,thumb,created"));
    assert!(csv.contains("Exported, with comma"));

    // Importing the same rows upserts by id: still one video.
    let (stdout, stderr, success) =
        run_vcat(&config_path, &["import", csv_path.to_str().unwrap()]);
    assert!(success, "import failed: {}", stderr);
    assert!(stdout.contains("imported 1 video(s)"));
    let (stdout, _, _) = run_vcat(&config_path, &["status"]);
    assert!(stdout.contains(&format!("{:<12} {}", "VIDEOS", 1)));
}

#[test]
fn test_faq_lifecycle() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);
    run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "secret"],
    );

    let (stdout, _, success) = run_vcat(
        &config_path,
        &["faq", "add", "--question", "How?", "--answer", "Like this."],
    );
    assert!(success);
    let id = stdout
        .lines()
        .find_map(|l| l.strip_prefix("faq added: "))
        .expect("missing faq id")
        .trim()
        .to_string();

    // Empty question is a silent cancellation, not an error.
    let (stdout, _, success) = run_vcat(&config_path, &["faq", "add", "--question", "  "]);
    assert!(success);
    assert!(stdout.contains("empty question; nothing added"));

    let (stdout, _, success) = run_vcat(
        &config_path,
        &["faq", "edit", &id, "--answer", "Differently."],
    );
    assert!(success);
    assert!(stdout.contains(&format!("faq updated: {}", id)));

    let (stdout, _, _) = run_vcat(&config_path, &["faq", "list"]);
    assert!(stdout.contains("How?"));
    assert!(stdout.contains("Differently."));

    let (stdout, _, success) = run_vcat(&config_path, &["faq", "rm", &id]);
    assert!(success);
    assert!(stdout.contains(&format!("faq deleted: {}", id)));
}

#[test]
fn test_image_batch_is_all_or_nothing() {
    let (tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);
    run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "secret"],
    );

    let good = tmp.path().join("logo.png");
    fs::write(&good, b"fake-png-bytes").unwrap();
    let missing = tmp.path().join("nope.png");

    let (_, stderr, success) = run_vcat(
        &config_path,
        &["image", "add", good.to_str().unwrap(), missing.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("image batch rejected"));

    // Nothing from the failed batch was committed.
    let (stdout, _, _) = run_vcat(&config_path, &["status"]);
    assert!(stdout.contains(&format!("{:<12} {}", "IMAGES", 0)));

    let (stdout, _, success) = run_vcat(&config_path, &["image", "add", good.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("1 image(s) uploaded"));
}

#[test]
fn test_offline_sync_seeds_demo_categories() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);

    let (stdout, _, success) = run_vcat(&config_path, &["sync"]);
    assert!(success);
    assert!(stdout.contains("no remote configured"));

    let (stdout, _, _) = run_vcat(&config_path, &["category", "list"]);
    for cat in ["General", "Tutorial", "Curated", "Induction"] {
        assert!(stdout.contains(cat), "missing demo category {}", cat);
    }
}

#[test]
fn test_onboarding_flow() {
    let (_tmp, config_path) = setup_test_env();
    run_vcat(&config_path, &["init"]);
    run_vcat(
        &config_path,
        &["login", "--role", "admin", "--user", "boss", "--pass", "secret"],
    );
    run_vcat(
        &config_path,
        &[
            "video", "add", "--title", "Welcome tour", "--link", "https://youtu.be/tour",
            "--category", "Welcome",
        ],
    );

    // Students get the onboarding hint until the flag is set.
    let (stdout, _, success) = run_vcat(
        &config_path,
        &["login", "--role", "student", "--user", "student", "--pass", "letmein"],
    );
    assert!(success);
    assert!(stdout.contains("recommended: watch \"Welcome tour\""));

    let (stdout, _, success) = run_vcat(&config_path, &["onboarding", "--complete"]);
    assert!(success);
    assert!(stdout.contains("onboarding video: Welcome tour"));

    let (stdout, _, _) = run_vcat(
        &config_path,
        &["login", "--role", "student", "--user", "student", "--pass", "letmein"],
    );
    assert!(!stdout.contains("recommended: watch"));
}
