//! Line oriented configuration shell

use std::io::{self, BufRead, Write};

use uhf_reader18::{
    POWER_MAX_DBM, ReaderInfo, RfidTransport, SCAN_TIME_MAX, SCAN_TIME_MIN, UhfError, UhfReader18,
    WorkMode, khz_to_step,
};

/// A validated shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Info,
    Mode,
    SetFrequency { low_step: u8, high_step: u8 },
    SetPower(u8),
    SetScanTime(u8),
    Help,
    Quit,
}

/// What the caller should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The line was rejected or the reader reported an error
    Failed,
    Quit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub args: &'static str,
    pub arity: usize,
    pub description: &'static str,
    pub parse: fn(&[&str]) -> Option<Action>,
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        format!("{:<16}{}", format!("{} {}", self.name, self.args), self.description)
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "info",
        args: "",
        arity: 0,
        description: "gets reader settings (freq, power, scantime)",
        parse: parse_info,
    },
    CommandSpec {
        name: "mode",
        args: "",
        arity: 0,
        description: "gets reader work mode",
        parse: parse_mode,
    },
    CommandSpec {
        name: "freq",
        args: "LOW HIGH",
        arity: 2,
        description: "set frequency range in kHz",
        parse: parse_freq,
    },
    CommandSpec {
        name: "power",
        args: "0-30",
        arity: 1,
        description: "sets power in dBm",
        parse: parse_power,
    },
    CommandSpec {
        name: "scantime",
        args: "2-255",
        arity: 1,
        description: "sets scan time in 100's of ms",
        parse: parse_scan_time,
    },
    CommandSpec {
        name: "help",
        args: "",
        arity: 0,
        description: "print commands and usage",
        parse: parse_help,
    },
    CommandSpec {
        name: "quit",
        args: "",
        arity: 0,
        description: "terminates this prompt",
        parse: parse_quit,
    },
];

fn parse_info(_: &[&str]) -> Option<Action> {
    Some(Action::Info)
}

fn parse_mode(_: &[&str]) -> Option<Action> {
    Some(Action::Mode)
}

fn parse_help(_: &[&str]) -> Option<Action> {
    Some(Action::Help)
}

fn parse_quit(_: &[&str]) -> Option<Action> {
    Some(Action::Quit)
}

fn parse_freq(args: &[&str]) -> Option<Action> {
    let low = khz_to_step(parse_number(args[0])?)?;
    let high = khz_to_step(parse_number(args[1])?)?;
    (low <= high).then_some(Action::SetFrequency {
        low_step: low,
        high_step: high,
    })
}

fn parse_power(args: &[&str]) -> Option<Action> {
    let power = u8::try_from(parse_number(args[0])?).ok()?;
    (power <= POWER_MAX_DBM).then_some(Action::SetPower(power))
}

fn parse_scan_time(args: &[&str]) -> Option<Action> {
    let scan_time = u8::try_from(parse_number(args[0])?).ok()?;
    (SCAN_TIME_MIN..=SCAN_TIME_MAX)
        .contains(&scan_time)
        .then_some(Action::SetScanTime(scan_time))
}

/// Plain decimal digits only, no sign
fn parse_number(arg: &str) -> Option<u32> {
    if arg.bytes().all(|b| b.is_ascii_digit()) {
        arg.parse().ok()
    } else {
        None
    }
}

/// Reader address as `0x..` hex or decimal
pub fn parse_address(arg: &str) -> Result<u8, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    parsed.map_err(|e| format!("invalid reader address '{}': {}", arg, e))
}

pub fn help_text() -> String {
    let mut commands: Vec<&CommandSpec> = COMMANDS.iter().collect();
    commands.sort_by_key(|c| c.name);
    commands.iter().map(|c| c.usage() + "\n").collect()
}

pub fn render_reader_info(out: &mut impl Write, info: &ReaderInfo) -> io::Result<()> {
    writeln!(out, "address   : {:#x}", info.address)?;
    writeln!(out, "low freq  : {} kHz", info.low_freq_khz)?;
    writeln!(out, "high freq : {} kHz", info.high_freq_khz)?;
    writeln!(out, "power     : {} dBm", info.power_dbm)?;
    writeln!(out, "scan time : {} ms", info.scan_time_ms())
}

pub fn render_work_mode(out: &mut impl Write, mode: &WorkMode) -> io::Result<()> {
    writeln!(out, "mode              : {}", mode.mode)?;
    writeln!(out, "protocol          : {}", mode.protocol)?;
    writeln!(out, "buzzer            : {}", mode.buzzer)?;
    writeln!(out, "addr mode         : {}", mode.addressing)?;
    writeln!(out, "interface         : {}", mode.interface)?;
    writeln!(out, "storage           : {}", mode.storage)?;
    writeln!(out, "offset            : {:#x}", mode.offset)?;
    writeln!(out, "length            : {}", mode.length)?;
    writeln!(out, "filter time       : {} s", mode.filter_time)?;
    writeln!(out, "accuracy EAS      : {}", mode.eas_accuracy)?;
    writeln!(out, "offset time       : {} ms", mode.offset_time)?;
    writeln!(out, "W byte order      : {}", mode.wiegand_byte_order)?;
    writeln!(out, "W mode            : {}", mode.wiegand_format)?;
    writeln!(out, "W output interval : {} ms", mode.wiegand_output_interval_ms())?;
    writeln!(out, "W pulse width     : {} us", mode.wiegand_pulse_width_us())?;
    writeln!(out, "W pulse period    : {} us", mode.wiegand_pulse_period_us())
}

pub struct Shell<T: RfidTransport, W: Write> {
    reader: UhfReader18<T>,
    /// Target of commands that accept one
    address: u8,
    out: W,
}

impl<T: RfidTransport, W: Write> Shell<T, W> {
    pub fn new(reader: UhfReader18<T>, address: u8, out: W) -> Self {
        Self {
            reader,
            address,
            out,
        }
    }

    /// Prompt and handle lines until `quit` or end of input.
    pub fn run(&mut self, input: impl BufRead) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next().transpose()? else {
                writeln!(self.out)?;
                return self.execute(Action::Quit).map(|_| ());
            };
            if self.handle_line(&line)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = words.collect();

        let Some(spec) = COMMANDS.iter().find(|c| c.name == name) else {
            writeln!(self.out, "unknown command '{}', try help", name)?;
            return Ok(Flow::Failed);
        };

        match (args.len() == spec.arity)
            .then(|| (spec.parse)(&args))
            .flatten()
        {
            Some(action) => self.execute(action),
            None => {
                writeln!(self.out, "{}", spec.usage())?;
                Ok(Flow::Failed)
            }
        }
    }

    pub fn execute(&mut self, action: Action) -> io::Result<Flow> {
        let acked = match action {
            Action::Info => {
                return match self.reader.get_reader_info() {
                    Ok(info) => render_reader_info(&mut self.out, &info).map(|_| Flow::Continue),
                    Err(e) => self.report(e),
                };
            }
            Action::Mode => {
                return match self.reader.get_work_mode(self.address) {
                    Ok(mode) => render_work_mode(&mut self.out, &mode).map(|_| Flow::Continue),
                    Err(e) => self.report(e),
                };
            }
            Action::SetFrequency {
                low_step,
                high_step,
            } => self.reader.set_frequency_range(low_step, high_step),
            Action::SetPower(power) => self.reader.set_power(power),
            Action::SetScanTime(scan_time) => self.reader.set_scan_time(scan_time),
            Action::Help => {
                write!(self.out, "{}", help_text())?;
                return Ok(Flow::Continue);
            }
            Action::Quit => {
                writeln!(self.out, "bye")?;
                return Ok(Flow::Quit);
            }
        };

        match acked {
            Ok(address) => {
                writeln!(self.out, "reader {:#x}: OK", address)?;
                Ok(Flow::Continue)
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, e: UhfError) -> io::Result<Flow> {
        writeln!(self.out, "error: {}", e)?;
        Ok(Flow::Failed)
    }
}
