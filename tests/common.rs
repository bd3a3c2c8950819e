use assert_cmd::cargo_bin_cmd;

/// Run scenlca with the given arguments and default settings, checking that it succeeds
#[allow(dead_code)]
pub fn assert_scenlca_runs(args: &[&str]) {
    cargo_bin_cmd!("scenlca")
        .env("SCENLCA_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .success();
}

/// Run scenlca with the given arguments and default settings, returning stdout
#[allow(dead_code)]
pub fn get_scenlca_stdout(args: &[&str]) -> String {
    let output = cargo_bin_cmd!("scenlca")
        .env("SCENLCA_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8(output.stdout).unwrap()
}

/// Run scenlca with the given arguments and default settings, checking that it fails
#[allow(dead_code)]
pub fn assert_scenlca_fails(args: &[&str]) {
    cargo_bin_cmd!("scenlca")
        .env("SCENLCA_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .failure();
}

/// Define a regression test for a demo project
#[allow(unused_macros)]
macro_rules! define_regression_test {
    ($example:ident) => {
        #[test]
        fn $example() {
            run_regression_test(stringify!($example));
        }
    };
}
#[allow(unused_imports)]
pub(crate) use define_regression_test;
