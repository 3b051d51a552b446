//! ASCII command dispatcher: one request line in, one response line out.

use crate::{parse_hex, target, BdmError, BdmPort, Result};

/// Emitted once on the channel before any command is accepted. The exact
/// bytes are load-bearing: hosts wait for a line containing "ready".
pub const BANNER: &str = "MC68332 BDM MicroPython Interface Ready";

/// Line-accumulating state machine over the byte channel.
///
/// Bytes go in one at a time; LF or CR terminates a request. A non-empty
/// request produces exactly one CRLF-terminated response, an empty one
/// produces nothing. Faults are mapped to `ERROR:` responses at this
/// boundary, so no command ever takes the loop down.
pub struct Dispatcher<P: BdmPort> {
    port: P,
    line: String,
}

impl<P: BdmPort> Dispatcher<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            line: String::new(),
        }
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Feed one channel byte. Returns the full CRLF-terminated response
    /// line when `byte` completes a non-empty request.
    pub fn push_byte(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\n' | b'\r' => {
                if self.line.is_empty() {
                    return None;
                }
                let line = std::mem::take(&mut self.line);
                Some(format!("{}\r\n", self.handle_line(&line)))
            }
            _ => {
                self.line.push(byte as char);
                None
            }
        }
    }

    /// Handle one request line and produce the response text (without the
    /// CRLF terminator).
    pub fn handle_line(&mut self, line: &str) -> String {
        match self.dispatch(line) {
            Ok(response) => response,
            Err(BdmError::UnknownCommand) => "ERROR: Unknown or malformed command".to_string(),
            Err(BdmError::HaltFailed) => "ERROR: Failed to halt CPU".to_string(),
            Err(other) => format!("ERROR: Exception {other}"),
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, args)) = tokens.split_first() else {
            return Err(BdmError::UnknownCommand);
        };
        // Arguments parse completely before any exchange is issued, so a
        // bad argument never leaves a partial transfer in flight.
        match verb.to_ascii_uppercase().as_str() {
            "RESET" => {
                self.port.reset();
                Ok("OK: CPU reset".to_string())
            }
            "STOP" => {
                if self.port.stop() {
                    Ok("OK: CPU halted in BDM".to_string())
                } else {
                    Err(BdmError::HaltFailed)
                }
            }
            "GO" => {
                target::resume(&mut self.port);
                Ok("OK: CPU resumed".to_string())
            }
            "READ_REG" if args.len() == 1 => {
                let index = parse_hex(args[0])?;
                let value = target::read_register(&mut self.port, index as u8);
                Ok(format!("REG {} = 0x{value:04X}", args[0]))
            }
            "WRITE_REG" if args.len() == 2 => {
                let index = parse_hex(args[0])?;
                let value = parse_hex(args[1])?;
                target::write_register(&mut self.port, index as u8, value as u16);
                // Echo the register token as typed and the value as parsed.
                Ok(format!("REG {} <- 0x{value:04X}", args[0]))
            }
            "STATUS" => Ok(if self.port.halted() {
                "HALTED".to_string()
            } else {
                "RUNNING".to_string()
            }),
            _ => Err(BdmError::UnknownCommand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimTarget;

    fn dispatcher() -> Dispatcher<SimTarget> {
        Dispatcher::new(SimTarget::new())
    }

    #[test]
    fn status_reports_running_then_halted() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("STATUS"), "RUNNING");
        d.port_mut().force_halted(true);
        assert_eq!(d.handle_line("STATUS"), "HALTED");
    }

    #[test]
    fn verbs_are_case_insensitive() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("status"), "RUNNING");
        assert_eq!(d.handle_line("Stop"), "OK: CPU halted in BDM");
    }

    #[test]
    fn read_reg_formats_four_uppercase_hex_digits() {
        let mut d = dispatcher();
        d.port_mut().set_register(0x2A, 0x0BAD);
        assert_eq!(d.handle_line("READ_REG 2A"), "REG 2A = 0x0BAD");
    }

    #[test]
    fn write_reg_echoes_the_register_token_as_typed() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("WRITE_REG 2a BEEF"), "REG 2a <- 0xBEEF");
        assert_eq!(d.port_mut().register(0x2A), 0xBEEF);
    }

    #[test]
    fn wrong_arity_is_a_malformed_command() {
        let mut d = dispatcher();
        assert_eq!(
            d.handle_line("READ_REG"),
            "ERROR: Unknown or malformed command"
        );
        assert_eq!(
            d.handle_line("WRITE_REG 1"),
            "ERROR: Unknown or malformed command"
        );
        assert_eq!(
            d.handle_line("WRITE_REG 1 2 3"),
            "ERROR: Unknown or malformed command"
        );
    }

    #[test]
    fn non_hex_arguments_surface_as_exceptions() {
        let mut d = dispatcher();
        assert_eq!(
            d.handle_line("READ_REG ZZ"),
            "ERROR: Exception invalid hex argument 'ZZ'"
        );
        // The parse failure must not have armed a register write.
        assert_eq!(
            d.handle_line("WRITE_REG 1 nope"),
            "ERROR: Exception invalid hex argument 'nope'"
        );
        assert!(d.port_mut().take_exchanges().is_empty());
    }

    #[test]
    fn stop_failure_is_reported_without_killing_the_loop() {
        let mut d = dispatcher();
        d.port_mut().set_fail_halt(true);
        assert_eq!(d.handle_line("STOP"), "ERROR: Failed to halt CPU");
        assert_eq!(d.handle_line("STATUS"), "RUNNING");
    }

    #[test]
    fn run_control_round_trip() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("STOP"), "OK: CPU halted in BDM");
        assert_eq!(d.handle_line("STATUS"), "HALTED");
        assert_eq!(d.handle_line("GO"), "OK: CPU resumed");
        assert_eq!(d.handle_line("STATUS"), "RUNNING");
        assert_eq!(d.handle_line("RESET"), "OK: CPU reset");
    }

    #[test]
    fn run_control_verbs_ignore_trailing_tokens() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("RESET now please"), "OK: CPU reset");
        assert_eq!(d.handle_line("STATUS ?"), "RUNNING");
    }
}
