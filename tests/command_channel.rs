//! Byte-level behavior of the command channel against the simulated target.

use bdm332::{Dispatcher, SimTarget};

fn dispatcher() -> Dispatcher<SimTarget> {
    Dispatcher::new(SimTarget::new())
}

/// Feed raw channel bytes and collect every emitted response line.
fn feed(d: &mut Dispatcher<SimTarget>, bytes: &[u8]) -> Vec<String> {
    bytes.iter().filter_map(|b| d.push_byte(*b)).collect()
}

#[test]
fn status_of_a_halted_target() {
    let mut d = dispatcher();
    d.port_mut().force_halted(true);
    assert_eq!(feed(&mut d, b"STATUS\n"), vec!["HALTED\r\n"]);
}

#[test]
fn status_of_a_running_target() {
    let mut d = dispatcher();
    assert_eq!(feed(&mut d, b"STATUS\n"), vec!["RUNNING\r\n"]);
}

#[test]
fn read_reg_reports_the_simulated_register() {
    let mut d = dispatcher();
    d.port_mut().set_register(0x2A, 0xF00D);
    assert_eq!(feed(&mut d, b"READ_REG 2A\n"), vec!["REG 2A = 0xF00D\r\n"]);
}

#[test]
fn unknown_verbs_get_one_error_line() {
    let mut d = dispatcher();
    assert_eq!(
        feed(&mut d, b"FOO\n"),
        vec!["ERROR: Unknown or malformed command\r\n"]
    );
}

#[test]
fn bare_terminators_yield_no_response() {
    let mut d = dispatcher();
    assert!(feed(&mut d, b"\n\n").is_empty());
    assert!(feed(&mut d, b"\r\n\r\n").is_empty());
}

#[test]
fn cr_terminates_a_request_like_lf() {
    let mut d = dispatcher();
    assert_eq!(feed(&mut d, b"STATUS\r"), vec!["RUNNING\r\n"]);
    // The LF of a CRLF pair then lands on an empty buffer and stays silent.
    assert!(feed(&mut d, b"\n").is_empty());
}

#[test]
fn requests_split_across_pushes_still_parse() {
    let mut d = dispatcher();
    assert!(feed(&mut d, b"STA").is_empty());
    assert!(feed(&mut d, b"TUS").is_empty());
    assert_eq!(feed(&mut d, b"\n"), vec!["RUNNING\r\n"]);
}

#[test]
fn one_response_per_request_over_a_session() {
    let mut d = dispatcher();
    let responses = feed(
        &mut d,
        b"STOP\nWRITE_REG 5 1234\nREAD_REG 5\nGO\nSTATUS\n\nBAD CMD\n",
    );
    assert_eq!(
        responses,
        vec![
            "OK: CPU halted in BDM\r\n",
            "REG 5 <- 0x1234\r\n",
            "REG 5 = 0x1234\r\n",
            "OK: CPU resumed\r\n",
            "RUNNING\r\n",
            "ERROR: Unknown or malformed command\r\n",
        ]
    );
}

#[test]
fn a_bad_command_does_not_poison_the_next_one() {
    let mut d = dispatcher();
    let responses = feed(&mut d, b"READ_REG xx\nSTATUS\n");
    assert_eq!(responses[0], "ERROR: Exception invalid hex argument 'xx'\r\n");
    assert_eq!(responses[1], "RUNNING\r\n");
}
