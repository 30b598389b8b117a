// Exercises the ',' (input) instruction through the bf binary.
use assert_cmd::Command;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

#[test]
fn reads_from_stdin_and_echoes_byte() {
    cargo_bin()
        .args(["-x", ",."])
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z");
}

#[test]
fn end_of_input_yields_zero_byte() {
    cargo_bin()
        .args(["-x", ",."])
        .write_stdin("")
        .assert()
        .success()
        .stdout(vec![0u8]);
}

#[test]
fn cat_copies_binary_input() {
    let input: Vec<u8> = vec![0x01, 0xff, 0x80, b'\n', 0x7f];
    // ",[.,]" stops at the first zero byte, so the input has none
    cargo_bin()
        .args(["-x", ",[.,]"])
        .write_stdin(input.clone())
        .assert()
        .success()
        .stdout(input);
}
