use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn roster(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("roster");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("DATABASE_PATH")
        .env_remove("RUST_LOG")
        .args([
            "--db-path",
            temp.path().join("roster.sqlite3").to_str().expect("db path"),
        ]);
    cmd
}

fn run_cmd(temp: &TempDir, args: &[&str]) -> String {
    let output = roster(temp).args(args).output().expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, args: &[&str]) -> Value {
    let output = roster(temp)
        .arg("--json")
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn exit_code(temp: &TempDir, args: &[&str]) -> Option<i32> {
    roster(temp)
        .args(args)
        .output()
        .expect("run command")
        .status
        .code()
}

const REGISTRATION: &[&str] = &[
    "register",
    "--email",
    "Grace@Example.com",
    "--first-name",
    "Grace",
    "--last-name",
    "Ilunga",
    "--gender",
    "Féminin",
    "--phone",
    "0812345678",
    "--degree",
    "Master",
    "--institution",
    "UNIKIN",
    "--graduation-year",
    "2019",
    "--position",
    "Analyste",
    "--how-heard",
    "LinkedIn",
    "--expectation",
    "Networking",
    "--accept-terms",
    "--accept-data-usage",
];

#[test]
fn cli_register_list_show_check_flow() {
    let temp = TempDir::new().expect("temp dir");

    let created = run_cmd_json(&temp, REGISTRATION);
    assert_eq!(created["email"], "grace@example.com");
    assert_eq!(created["phone"], "+243812345678");
    assert_eq!(created["gender"], "F");
    let id = created["id"].as_i64().expect("id").to_string();

    let list = run_cmd_json(&temp, &["list"]);
    let cards = list.as_array().expect("array");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["name"], "Grace Ilunga");

    let registrations = run_cmd_json(&temp, &["list", "--registrations"]);
    assert_eq!(registrations.as_array().expect("array").len(), 1);

    let detail = run_cmd_json(&temp, &["show", &id]);
    assert_eq!(detail["howHeard"], serde_json::json!(["LinkedIn"]));

    let check = run_cmd_json(&temp, &["check", "--phone", "081 234 5678"]);
    assert_eq!(check["isRegistered"], false);
    let check = run_cmd_json(&temp, &["check", "--phone", "81 234 5678"]);
    assert_eq!(check["isRegistered"], true);
    assert_eq!(check["matchedBy"], "phone");

    let count = run_cmd(&temp, &["count"]);
    assert_eq!(count.trim(), "1");

    let found = run_cmd_json(&temp, &["search", "ilunga"]);
    assert_eq!(found.as_array().expect("array").len(), 1);
}

#[test]
fn cli_exit_codes_follow_error_kind() {
    let temp = TempDir::new().expect("temp dir");

    assert_eq!(
        exit_code(&temp, &["register", "--email", "grace@example.com"]),
        Some(3)
    );
    run_cmd(&temp, REGISTRATION);
    assert_eq!(exit_code(&temp, REGISTRATION), Some(3));
    assert_eq!(exit_code(&temp, &["show", "42"]), Some(2));
    assert_eq!(exit_code(&temp, &["show", "abc"]), Some(3));
    assert_eq!(exit_code(&temp, &["check"]), Some(3));
}

#[test]
fn cli_imports_json_with_dry_run() {
    let temp = TempDir::new().expect("temp dir");
    let file = temp.path().join("participants.json");
    fs::write(
        &file,
        r#"[
            {"Nom complet": "Marie Kabila", "Adresse e-mail": "marie@example.com", "Contact number": "0991234567"},
            {"Nom complet": "No Email"},
            {"Nom complet": "Marie Again", "Adresse e-mail": "MARIE@example.com"},
            {"Nom complet": "Jean Mbala", "email": "jean@example.com"}
        ]"#,
    )
    .expect("write json");
    let file = file.to_str().expect("file path");

    let preview = run_cmd_json(&temp, &["import", "json", file, "--dry-run"]);
    assert_eq!(preview["dry_run"], true);
    assert_eq!(preview["created"], 2);
    assert_eq!(preview["skipped"], 2);
    assert_eq!(run_cmd(&temp, &["count"]).trim(), "0");

    let report = run_cmd_json(&temp, &["import", "json", file]);
    assert_eq!(report["created"], 2);

    let again = run_cmd_json(&temp, &["import", "json", file]);
    assert_eq!(again["created"], 0);
    assert_eq!(again["skipped"], 4);
    assert_eq!(run_cmd(&temp, &["count"]).trim(), "2");

    let check = run_cmd_json(&temp, &["check", "--phone", "991234567"]);
    assert_eq!(check["isRegistered"], true);
}

#[test]
fn cli_imports_legacy_payments() {
    let temp = TempDir::new().expect("temp dir");
    let legacy = temp.path().join("form.db");
    rusqlite::Connection::open(&legacy)
        .expect("create legacy db")
        .execute_batch(
            "CREATE TABLE inscriptions (id INTEGER PRIMARY KEY, nom TEXT, prenom TEXT, email TEXT);
             CREATE TABLE paiement (id INTEGER PRIMARY KEY, inscription_id INTEGER, status TEXT,
                                    montant REAL, date_paiement DATETIME);
             INSERT INTO inscriptions (id, nom, prenom, email)
             VALUES (4, 'Kabila', 'Marie', 'marie@example.com');
             INSERT INTO paiement (inscription_id, status, montant, date_paiement)
             VALUES (4, 'paid', 30, '2024-03-01 10:00:00'), (8, 'paid', 30, NULL);",
        )
        .expect("seed legacy db");
    let legacy = legacy.to_str().expect("legacy path");
    let args = [
        "import",
        "legacy",
        legacy,
        "--table",
        "inscriptions",
        "--payments-table",
        "paiement",
    ];

    let mut preview_args = args.to_vec();
    preview_args.push("--dry-run");
    let preview = run_cmd_json(&temp, &preview_args);
    assert_eq!(preview["payments"], 2);
    assert_eq!(run_cmd(&temp, &["count"]).trim(), "0");

    let report = run_cmd_json(&temp, &args);
    assert_eq!(report["created"], 1);
    assert_eq!(report["payments"], 1);
    let warnings = report["warnings"].as_array().expect("warnings");
    assert!(warnings
        .iter()
        .any(|warning| warning.as_str().unwrap_or_default().contains("unknown inscription 8")));

    let check = run_cmd_json(&temp, &["check", "--email", "marie@example.com"]);
    let id = check["participant"]["id"].as_i64().expect("id").to_string();
    let payments = run_cmd_json(&temp, &["payment", "list", &id]);
    assert_eq!(payments[0]["paidAt"], 1_709_287_200);
}

#[test]
fn cli_scans_vcard_and_manual_entry() {
    let temp = TempDir::new().expect("temp dir");
    run_cmd(&temp, REGISTRATION);

    let card = temp.path().join("card.vcf");
    fs::write(
        &card,
        "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Grace Ilunga\r\nTEL;TYPE=CELL:081 234 5678\r\nEND:VCARD\r\n",
    )
    .expect("write card");
    let scanned = run_cmd_json(&temp, &["scan", card.to_str().expect("card path")]);
    assert_eq!(scanned["input"], "vcard");
    assert_eq!(scanned["card"]["name"], "Grace Ilunga");
    assert_eq!(scanned["isRegistered"], true);

    let output = roster(&temp)
        .args(["--json", "scan", "-"])
        .write_stdin("grace@example.com\n")
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let manual: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(manual["input"], "manual");
    assert_eq!(manual["matchedBy"], "email");

    let output = roster(&temp)
        .args(["scan", "-"])
        .write_stdin("not a lookup")
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn cli_scan_finds_local_number_dialed_with_double_zero() {
    let temp = TempDir::new().expect("temp dir");
    let registration: Vec<&str> = REGISTRATION
        .iter()
        .map(|arg| if *arg == "0812345678" { "0991234567" } else { *arg })
        .collect();
    run_cmd(&temp, &registration);

    let output = roster(&temp)
        .args(["--json", "scan", "-"])
        .write_stdin("00 243 99 123 45 67\n")
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    let manual: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(manual["input"], "manual");
    assert_eq!(manual["isRegistered"], true);
    assert_eq!(manual["matchedBy"], "phone");

    let card = temp.path().join("card.vcf");
    fs::write(
        &card,
        "BEGIN:VCARD\nVERSION:3.0\nFN:Grace Ilunga\nTEL:00243991234567\nEND:VCARD\n",
    )
    .expect("write card");
    let scanned = run_cmd_json(&temp, &["scan", card.to_str().expect("card path")]);
    assert_eq!(scanned["input"], "vcard");
    assert_eq!(scanned["isRegistered"], true);
    assert_eq!(scanned["matchedBy"], "phone");
}

#[test]
fn cli_records_payments() {
    let temp = TempDir::new().expect("temp dir");
    let created = run_cmd_json(&temp, REGISTRATION);
    let id = created["id"].as_i64().expect("id").to_string();

    let payment = run_cmd_json(
        &temp,
        &["payment", "record", &id, "--status", "paid", "--amount", "25"],
    );
    assert_eq!(payment["status"], "paid");
    assert!(payment["paidAt"].is_number());

    let payments = run_cmd_json(&temp, &["payment", "list", &id]);
    assert_eq!(payments.as_array().expect("array").len(), 1);

    assert_eq!(
        exit_code(&temp, &["payment", "record", "99", "--status", "paid", "--amount", "5"]),
        Some(2)
    );

    let stats = run_cmd_json(&temp, &["stats"]);
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["payments"][0]["count"], 1);
}

#[test]
fn cli_normalize_uses_phone_policy_from_config() {
    let temp = TempDir::new().expect("temp dir");
    assert_eq!(
        run_cmd(&temp, &["normalize", "phone", "0991234567"]).trim(),
        "+243991234567"
    );
    assert_eq!(
        run_cmd(&temp, &["normalize", "email", " John.Doe@Example.com "]).trim(),
        "john.doe@example.com"
    );
    assert_eq!(
        run_cmd(&temp, &["normalize", "slug", "Adresse e-mail"]).trim(),
        "adresse_e_mail"
    );

    let config_dir = temp.path().join("custom");
    fs::create_dir_all(&config_dir).expect("config dir");
    let config_path = config_dir.join("config.toml");
    fs::write(&config_path, "[phone]\ndefault_country_code = \"33\"\n").expect("write config");
    set_private(&config_path);

    let output = run_cmd(
        &temp,
        &[
            "--config",
            config_path.to_str().expect("config path"),
            "normalize",
            "phone",
            "0612345678",
        ],
    );
    assert_eq!(output.trim(), "+33612345678");
}

#[cfg(unix)]
fn set_private(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).expect("chmod");
}

#[cfg(not(unix))]
fn set_private(_path: &Path) {}
