use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::exit;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const READY_WAIT: Duration = Duration::from_secs(5);
const RESPONSE_WAIT: Duration = Duration::from_secs(1);

const HELP_TEXT: &str = "Commands:
  RESET            - Reset and run CPU
  STOP             - Halt CPU (enter BDM)
  GO               - Resume CPU from BDM
  READ_REG <reg>   - Read system register (hex)
  WRITE_REG <reg> <val> - Write register (hex)
  STATUS           - Get CPU status
  QUIT             - Exit program";

#[derive(Parser, Debug)]
#[command(name = "bdm-host")]
#[command(about = "Interactive shell for the BDM probe serial channel", long_about = None)]
struct Args {
    /// Serial device of the probe, e.g. /dev/ttyACM0
    device: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Some(device) = args.device else {
        eprintln!("Usage: bdm-host <serial-device>");
        eprintln!("Example: bdm-host /dev/ttyACM0");
        exit(1);
    };

    let port = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&device)
        .with_context(|| format!("open {}", device.display()))?;
    let mut writer = port
        .try_clone()
        .with_context(|| format!("clone handle for {}", device.display()))?;
    let lines = spawn_reader(port);

    wait_for_ready(&lines);
    interactive_shell(&mut writer, &lines)
}

/// Pump response lines off the channel so the shell can wait with a timeout.
fn spawn_reader(port: File) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    let reader = BufReader::new(port);
    thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.send(line.trim_end_matches('\r').to_string()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Wait up to five seconds for the probe banner, then proceed regardless.
fn wait_for_ready(lines: &Receiver<String>) {
    println!("Waiting for BDM probe...");
    let deadline = Instant::now() + READY_WAIT;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match lines.recv_timeout(deadline - now) {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }
                println!("probe: {line}");
                if line.to_ascii_lowercase().contains("ready") {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    println!("No ready banner received, proceeding anyway...");
    println!("The probe firmware may not be running yet.");
}

/// One request line out, block for exactly one response line back.
fn send_command(writer: &mut File, lines: &Receiver<String>, cmd: &str) -> Result<()> {
    println!(">>> Sending: {cmd}");
    writer
        .write_all(format!("{cmd}\n").as_bytes())
        .context("write command")?;
    writer.flush().context("flush command")?;
    match lines.recv_timeout(RESPONSE_WAIT) {
        Ok(response) => println!("<<< Response: {response}"),
        Err(_) => println!("<<< (no response)"),
    }
    Ok(())
}

fn interactive_shell(writer: &mut File, lines: &Receiver<String>) -> Result<()> {
    println!("Enter commands (HELP for list, QUIT to exit).");
    let stdin = io::stdin();
    loop {
        print!("BDM> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let cmd = input.trim();
        if cmd.is_empty() {
            continue;
        }
        if cmd.eq_ignore_ascii_case("HELP") {
            println!("{HELP_TEXT}");
            continue;
        }
        if cmd.eq_ignore_ascii_case("QUIT") {
            break;
        }
        send_command(writer, lines, cmd)?;
    }
    Ok(())
}
