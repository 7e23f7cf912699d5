// SPDX-FileCopyrightText: The midiout authors
// SPDX-License-Identifier: MPL-2.0

use std::io::{stdin, stdout, Write as _};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use midiout::{
    session::NO_DEVICES_ADVISORY, DeviceIndex, MidirConfig, MidirOutputSubsystem, NoteCommand,
    Session, SessionStatus,
};

/// Send test notes to MIDI output devices or reset them.
#[derive(Debug, Parser)]
#[command(name = "midiout", version)]
struct Args {
    /// Client name that is announced to the MIDI backend
    #[arg(long, default_value = MidirConfig::DEFAULT_CLIENT_NAME)]
    client_name: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List the available output devices
    List,

    /// Send a single note on message
    Send {
        /// Index of the output device, see `list`
        #[arg(short, long)]
        device: usize,

        /// MIDI channel (0-15)
        #[arg(short, long, default_value_t = 0)]
        channel: u8,

        /// Note number (0-127)
        #[arg(short, long, default_value_t = NoteCommand::DEFAULT_NOTE_NUMBER)]
        note: u8,

        /// Note velocity (0-127)
        #[arg(short, long, default_value_t = NoteCommand::DEFAULT_VELOCITY)]
        velocity: u8,
    },

    /// Silence a channel and reset its controllers
    ResetChannel {
        /// Index of the output device, see `list`
        #[arg(short, long)]
        device: usize,

        /// MIDI channel (0-15)
        #[arg(short, long)]
        channel: u8,
    },

    /// Reset all channels of a device (slow)
    ResetDevice {
        /// Index of the output device, see `list`
        #[arg(short, long)]
        device: usize,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Line-based interactive session
    Interactive,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let Args {
        client_name,
        action,
    } = Args::parse();
    let subsystem = MidirOutputSubsystem::new(MidirConfig {
        client_name: client_name.into(),
    })
    .context("failed to initialize MIDI output")?;
    let mut session = Session::open(subsystem);

    match action {
        Action::List => print_devices(&session),
        Action::Send {
            device,
            channel,
            note,
            velocity,
        } => {
            session.select(DeviceIndex::new(device))?;
            *session.note_command_mut() = NoteCommand {
                channel,
                note_number: note,
                velocity,
            };
            session.send_note()?;
        }
        Action::ResetChannel { device, channel } => {
            session.select(DeviceIndex::new(device))?;
            session.note_command_mut().channel = channel;
            session.reset_channel()?;
        }
        Action::ResetDevice { device, yes } => {
            session.select(DeviceIndex::new(device))?;
            let confirmed = if yes {
                session.reset_device(&mut |_: &str, _: &str| true)?
            } else {
                session.reset_device(&mut prompt_confirmation)?
            };
            if confirmed {
                println!("Device has been reset");
            }
        }
        Action::Interactive => run_interactive(&mut session)?,
    }
    Ok(())
}

fn print_devices<S>(session: &Session<S>)
where
    S: midiout::MidiOutputSubsystem,
{
    if session.devices().is_empty() {
        println!("{NO_DEVICES_ADVISORY}");
        return;
    }
    let selected = session.selection().index();
    for (index, name) in session.devices().iter_indexed() {
        let marker = if index == selected { '*' } else { ' ' };
        println!("{marker} {index}: {name}");
    }
}

fn prompt_confirmation(title: &str, message: &str) -> bool {
    println!("{title} {message}");
    print!("Yep, do it? [y/N] ");
    let mut input = String::new();
    if stdout().flush().is_err() || stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim(), "y" | "Y" | "yes")
}

const INTERACTIVE_HELP: &str = "\
Commands:
  list | refresh          show or refresh the output devices
  select <index>          select an output device
  channel <0-15>          set the channel
  note <0-127>            set the note number
  velocity <0-127>        set the note velocity
  status                  show the current settings
  send                    send a note on message
  reset-channel           reset the current channel
  reset-device            reset the selected device (asks for confirmation)
  quit";

fn print_status<S>(session: &Session<S>)
where
    S: midiout::MidiOutputSubsystem,
{
    let NoteCommand {
        channel,
        note_number,
        velocity,
    } = *session.note_command();
    match session.status() {
        SessionStatus::NoDevices => println!("{NO_DEVICES_ADVISORY}"),
        SessionStatus::Ready {
            device_index,
            device_name,
        } => println!("Device {device_index}: {device_name}"),
    }
    println!("Channel: {channel}, note number: {note_number}, velocity: {velocity}");
}

fn parse_arg<T>(arg: Option<&str>) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let arg = arg.context("missing argument")?;
    arg.parse().with_context(|| format!("invalid argument \"{arg}\""))
}

fn run_interactive(session: &mut Session<MidirOutputSubsystem>) -> anyhow::Result<()> {
    println!("{INTERACTIVE_HELP}");
    print_devices(session);
    let mut line = String::new();
    loop {
        print!("> ");
        stdout().flush()?;
        line.clear();
        if stdin().read_line(&mut line)? == 0 {
            // EOF
            return Ok(());
        }
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next();
        let result: anyhow::Result<()> = match command {
            "list" => {
                print_devices(session);
                Ok(())
            }
            "refresh" => session
                .refresh()
                .map(|_| print_devices(session))
                .map_err(Into::into),
            "select" => parse_arg(arg)
                .and_then(|index| session.select(DeviceIndex::new(index)).map_err(Into::into)),
            "channel" => parse_arg(arg).map(|channel| session.note_command_mut().channel = channel),
            "note" => parse_arg(arg)
                .map(|note_number| session.note_command_mut().note_number = note_number),
            "velocity" => {
                parse_arg(arg).map(|velocity| session.note_command_mut().velocity = velocity)
            }
            "status" => {
                print_status(session);
                Ok(())
            }
            "send" => session.send_note().map_err(Into::into),
            "reset-channel" => session.reset_channel().map_err(Into::into),
            "reset-device" => session
                .reset_device(&mut prompt_confirmation)
                .map(|_| ())
                .map_err(Into::into),
            "help" => {
                println!("{INTERACTIVE_HELP}");
                Ok(())
            }
            "quit" | "exit" => return Ok(()),
            _ => Err(anyhow::anyhow!("unknown command \"{command}\"")),
        };
        if let Err(err) = result {
            println!("Error: {err:#}");
        }
    }
}
