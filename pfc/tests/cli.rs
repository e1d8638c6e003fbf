use std::fs;
use std::process::Command;

fn pfc() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pfc"));
    cmd.env_remove("PFC_LOG");
    cmd
}

#[test]
fn compress_writes_decodable_output_and_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.txt");
    let dst = dir.path().join("in.txt.pfc");
    let data = b"pack my box with five dozen liquor jugs\n".repeat(5000);
    fs::write(&src, &data).unwrap();

    let out = pfc()
        .args(["compress", "--level", "5", "--threads", "3", "--chunk-size", "16K"])
        .args(["--no-progress", "--json"])
        .arg(&src)
        .arg(&dst)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["chunks"], 13);
    assert_eq!(report["level"], 5);
    assert_eq!(report["codec"], "zstd");
    assert_eq!(report["schedule"], "strided");

    let compressed = fs::read(&dst).unwrap();
    assert_eq!(report["output_bytes"], compressed.len() as u64);
    assert_eq!(zstd::decode_all(&compressed[..]).unwrap(), data);
}

#[test]
fn level_out_of_range_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("o.pfc");
    let out = pfc()
        .args(["compress", "--level", "23", "--no-progress"])
        .arg(dir.path().join("missing.bin"))
        .arg(&dst)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("compression level"));
    assert!(!dst.exists());
}

#[test]
fn plan_lists_strided_assignment() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.bin");
    fs::write(&src, vec![0u8; 2500]).unwrap();

    let out = pfc()
        .args(["plan", "--threads", "2", "--chunk-size", "1000"])
        .arg(&src)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let rows: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("worker=0") && rows[0].contains("u=1000"));
    assert!(rows[1].contains("worker=1") && rows[1].contains("off=1000"));
    assert!(rows[2].contains("worker=0") && rows[2].contains("u=500"));
}
