/// This is a set of integration tests which run against the job binaries living in
/// `libtripreduce/src/bin/`.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

// This can't be a one-liner because cargo sometimes runs integration tests from
// `target/debug/deps`.
fn get_bin_path(bin_name: &str) -> PathBuf {
    let mut path = env::current_exe().unwrap();
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push(bin_name);
    path
}

fn run_with_input(bin_name: &str, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(get_bin_path(bin_name))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("TRIPREDUCE_STRICT_ORDER")
        .env_remove("TRIPREDUCE_REDUCE_PARTITIONS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();

    child.wait_with_output().unwrap()
}

fn run_with_env(bin_name: &str, args: &[&str], vars: &[(&str, &str)], input: &str) -> Output {
    let mut command = Command::new(get_bin_path(bin_name));
    command
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for &(name, value) in vars {
        command.env(name, value);
    }
    let mut child = command.spawn().unwrap();

    // A command that fails on its configuration may exit before reading stdin.
    let _ = child.stdin.as_mut().unwrap().write_all(input.as_bytes());

    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

// A 22-column row in the layout the jobs read.
fn trip_row(pickup: &str, passengers: &str, distance: &str, total: &str, payment: &str, zone: &str) -> String {
    let mut fields: Vec<String> = (0..22).map(|i| i.to_string()).collect();
    fields[1] = pickup.to_owned();
    fields[3] = passengers.to_owned();
    fields[4] = distance.to_owned();
    fields[12] = total.to_owned();
    fields[19] = payment.to_owned();
    fields[21] = zone.to_owned();
    fields.join(",") + "\n"
}

fn trip_csv() -> String {
    let mut csv = String::from("lpep_pickup_datetime,lpep_dropoff_datetime,total_amount\n");
    csv += &trip_row("2024-01-02 08:15:00", "1", "2.5", "10.0", "1", "74");
    csv += &trip_row("2024-01-01 00:57:55", "2", "5.5", "5.0", "2", "236");
    csv += "\n";
    csv += &trip_row("2024-01-01 13:01:00", "1", "2.5", "3.0", "1", "74");
    csv += &trip_row("not a date", "1", "1.0", "99.0", "1", "74");
    csv += &trip_row("2024-01-02 17:45:10", "", "1.25", "oops", "1", "41");
    csv
}

#[test]
fn run_sanity_check() {
    let output = Command::new(get_bin_path("fare-per-day"))
        .arg("sanity-check")
        .output()
        .unwrap();
    let output_str = String::from_utf8(output.stdout).unwrap();

    assert_eq!("sanity located\n", output_str);
}

#[test]
fn map_fare_per_day() {
    let output = run_with_input("fare-per-day", &["map"], &trip_csv());

    assert!(output.status.success());
    assert_eq!(
        "2024-01-02\t10.0\n2024-01-01\t5.0\n2024-01-01\t3.0\n",
        stdout_of(&output)
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn reduce_fare_per_day() {
    let input = "2024-01-01\t5.0\n2024-01-01\t3.0\n2024-01-02\t10.0\n";

    let output = run_with_input("fare-per-day", &["reduce"], input);

    assert!(output.status.success());
    assert_eq!("2024-01-01\t8.0\n2024-01-02\t10.0\n", stdout_of(&output));
}

#[test]
fn map_passenger_distance_per_day() {
    let output = run_with_input("passenger-distance-per-day", &["map"], &trip_csv());

    assert!(output.status.success());
    assert_eq!(
        "2024-01-02\t1.0,2.5\n2024-01-01\t2.0,5.5\n2024-01-01\t1.0,2.5\n2024-01-02\t0.0,1.25\n",
        stdout_of(&output)
    );
}

#[test]
fn reduce_passenger_distance_per_day() {
    let input = "2024-01-01\t2.0,5.5\n2024-01-01\t1.0,2.5\n";

    let output = run_with_input("passenger-distance-per-day", &["reduce"], input);

    assert!(output.status.success());
    assert_eq!("2024-01-01\t3.0\t8.0\n", stdout_of(&output));
}

#[test]
fn map_and_reduce_trips_per_payment() {
    let mapped = run_with_input("trips-per-payment", &["map"], &trip_csv());
    assert!(mapped.status.success());
    assert_eq!("1\t1\n2\t1\n1\t1\n1\t1\n1\t1\n", stdout_of(&mapped));

    let output = run_with_input("trips-per-payment", &["reduce"], "1\t1\n1\t1\n2\t1\n");

    assert!(output.status.success());
    assert_eq!("1\t2\n2\t1\n", stdout_of(&output));
}

#[test]
fn map_trips_per_pickup_zone() {
    let output = run_with_input("trips-per-pickup-zone", &["map"], &trip_csv());

    assert!(output.status.success());
    assert_eq!("74\t1\n236\t1\n74\t1\n74\t1\n41\t1\n", stdout_of(&output));
}

#[test]
fn reduce_skips_malformed_lines_and_exits_zero() {
    let input = "2024-01-01\t1\nlpep_pickup_datetime,x\n2024-01-01\tone\n\n2024-01-02\t1\n";

    let output = run_with_input("trips-per-day", &["reduce"], input);

    assert!(output.status.success());
    assert_eq!("2024-01-01\t1\n2024-01-02\t1\n", stdout_of(&output));
}

#[test]
fn reduce_empty_input() {
    let output = run_with_input("fare-per-day", &["reduce"], "");

    assert!(output.status.success());
    assert_eq!("", stdout_of(&output));
}

#[test]
fn reduce_unsorted_input_repeats_keys() {
    let output = run_with_input("trips-per-payment", &["reduce"], "1\t1\n2\t1\n1\t1\n");

    assert!(output.status.success());
    assert_eq!("1\t1\n2\t1\n1\t1\n", stdout_of(&output));
}

#[test]
fn strict_order_rejects_unsorted_input() {
    let mut child = Command::new(get_bin_path("trips-per-payment"))
        .arg("reduce")
        .env("TRIPREDUCE_STRICT_ORDER", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"1\t1\n2\t1\n1\t1\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();

    assert_eq!(false, output.status.success());
}

#[test]
fn pipeline_over_stdin() {
    let output = run_with_input("fare-per-day", &["pipeline"], &trip_csv());

    assert!(output.status.success());
    assert_eq!("2024-01-01\t8.0\n2024-01-02\t10.0\n", stdout_of(&output));
}

#[test]
fn pipeline_over_files_is_repeatable() {
    let dir = env::temp_dir().join(format!("tripreduce-e2e-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let first = dir.join("first.csv");
    let second = dir.join("second.csv");
    File::create(&first).unwrap().write_all(trip_csv().as_bytes()).unwrap();
    File::create(&second)
        .unwrap()
        .write_all(trip_row("2024-01-03 10:00:00", "3", "7.0", "20.0", "4", "74").as_bytes())
        .unwrap();
    let args = [
        "pipeline",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
    ];

    let once = run_with_input("trips-per-day", &args, "");
    let twice = run_with_input("trips-per-day", &args, "");

    assert!(once.status.success());
    assert_eq!(
        "2024-01-01\t2\n2024-01-02\t2\n2024-01-03\t1\n",
        stdout_of(&once)
    );
    assert_eq!(once.stdout, twice.stdout);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn pipeline_missing_file_fails() {
    let output = run_with_input(
        "fare-per-day",
        &["pipeline", "/nonexistent/tripreduce/input.csv"],
        "",
    );

    assert_eq!(false, output.status.success());
}

#[test]
fn map_ignores_reduce_configuration() {
    let vars = [
        ("TRIPREDUCE_STRICT_ORDER", "maybe"),
        ("TRIPREDUCE_REDUCE_PARTITIONS", "0"),
    ];

    let mapped = run_with_env("trips-per-payment", &["map"], &vars, "1,2024-01-01 00:00:00\n");
    let sanity = run_with_env("trips-per-payment", &["sanity-check"], &vars, "");
    let reduced = run_with_env("trips-per-payment", &["reduce"], &vars, "1\t1\n");

    assert!(mapped.status.success());
    assert!(sanity.status.success());
    assert_eq!("sanity located\n", stdout_of(&sanity));
    assert_eq!(false, reduced.status.success());
}

#[test]
fn pipeline_rejects_too_many_partitions() {
    let output = run_with_env(
        "trips-per-day",
        &["pipeline"],
        &[("TRIPREDUCE_REDUCE_PARTITIONS", "1099511627776")],
        &trip_csv(),
    );

    assert_eq!(false, output.status.success());
    assert_eq!("", stdout_of(&output));
}
