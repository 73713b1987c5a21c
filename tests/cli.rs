use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STATEMENT: &str = "\
BANCO DE PRUEBA S.A.
SALDO ANTERIOR 10.000,00
FECHA DESCRIPCION DEBITO CREDITO SALDO
15/03/2024 PAGO SERVICIO 1.500,00 8.500,00
16/03/2024 TRANSF RECIB 12345678 JUAN 2.000,00 10.500,00
17/03/2024 SIRCREB RETENCION 20,00 10.480,00
18/03/2024 IVA GRAL COMISION 21,00 10.459,00
SALDO FINAL 10.459,00
";

struct Env {
    home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("extracto").unwrap();
        cmd.env("HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_banks_lists_variants() {
    let env = Env::new();
    env.cmd()
        .arg("banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("galicia"))
        .stdout(predicate::str::contains("santafe"))
        .stdout(predicate::str::contains("santander"))
        .stdout(predicate::str::contains("unknown"));
}

#[test]
fn test_classify_rule_and_fallback() {
    let env = Env::new();
    env.cmd()
        .args(["classify", "SIRCREB RETENCION"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: SIRCREB"));
    env.cmd()
        .args(["classify", "VARIOS", "--credit", "750,00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: Credit"));
}

#[test]
fn test_classify_rejects_bad_amount() {
    let env = Env::new();
    env.cmd()
        .args(["classify", "VARIOS", "--debit", "750.00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid amount"));
}

#[test]
fn test_ledger_table() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    env.cmd()
        .args(["ledger", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("SALDO ANTERIOR"))
        .stdout(predicate::str::contains("PAGO SERVICIO"))
        .stdout(predicate::str::contains("Transfer received"))
        .stdout(predicate::str::contains("10.459,00"))
        .stdout(predicate::str::contains("Reconciled!"));
}

#[test]
fn test_ledger_reports_discrepancy() {
    let env = Env::new();
    let statement = STATEMENT.replace("SALDO FINAL 10.459,00", "SALDO FINAL 10.409,00");
    let file = env.write("extracto.txt", &statement);
    env.cmd()
        .args(["ledger", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("DISCREPANCY: 50,00"));
}

#[test]
fn test_ledger_csv() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    env.cmd()
        .args(["ledger", arg(&file), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("date,description,"))
        .stdout(predicate::str::contains("2024-03-15,PAGO SERVICIO,PAGO SERVICIO,1500.00,0,"));
}

#[test]
fn test_ledger_json() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    let output = env
        .cmd()
        .args(["ledger", arg(&file), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["bank"], "unknown");
    assert_eq!(value["summary"]["reconciled"], true);
    assert_eq!(value["summary"]["transaction_count"], 4);
    assert_eq!(value["records"][0]["category"], "Opening balance");
}

#[test]
fn test_ledger_output_file() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    let out = env.home.path().join("ledger.csv");
    env.cmd()
        .args(["ledger", arg(&file), "--format", "csv", "--output", arg(&out)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("SIRCREB"));
}

#[test]
fn test_ledger_from_json_words() {
    let env = Env::new();
    let json = r#"{"pages":[{"text":"","words":[
        {"text":"15/03/2024","x0":10.0,"top":100.0},
        {"text":"PAGO","x0":80.0,"top":100.4},
        {"text":"1.500,00","x0":300.0,"top":99.9},
        {"text":"8.500,00","x0":400.0,"top":100.0}
    ]}]}"#;
    let file = env.write("extracto.json", json);
    env.cmd()
        .args(["ledger", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.500,00"));
}

#[test]
fn test_ledger_without_transactions() {
    let env = Env::new();
    let file = env.write("vacio.txt", "BANCO\nsin movimientos\n");
    env.cmd()
        .args(["ledger", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found"));
}

#[test]
fn test_ledger_errors() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    env.cmd()
        .args(["ledger", arg(&file), "--bank", "bofa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown bank: bofa"));
    env.cmd()
        .args(["ledger", "/nonexistent/extracto.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
    let blank = env.write("blanco.txt", "   \n");
    env.cmd()
        .args(["ledger", arg(&blank)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No extractable text"));
}

#[test]
fn test_summary() {
    let env = Env::new();
    let file = env.write("extracto.txt", STATEMENT);
    env.cmd()
        .args(["summary", arg(&file)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Statement Summary"))
        .stdout(predicate::str::contains("IVA Operating Summary"))
        .stdout(predicate::str::contains("100,00"))
        .stdout(predicate::str::contains("By Category"));
}

#[test]
fn test_config_roundtrip() {
    let env = Env::new();
    env.cmd()
        .args(["config", "--default-bank", "Galicia", "--sign-tolerance", "0.10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved."))
        .stdout(predicate::str::contains("galicia"));
    assert!(env.home.path().join(".config/extracto/settings.json").exists());
    env.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.10"));
    env.cmd()
        .args(["config", "--default-bank", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown bank"));
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let env = Env::new();
    let dir = env.home.path().join(".config/extracto");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("settings.json"), "{ not json").unwrap();
    env.cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.05"))
        .stdout(predicate::str::contains("unknown"));
}
