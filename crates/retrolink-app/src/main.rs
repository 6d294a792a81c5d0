//! retrolink demo entry point.
//!
//! Runs a simulated frontend in a fixed-rate frame loop with the configured
//! command interfaces polled once per frame. Try, from another terminal:
//!
//! ```text
//! retrolink --command "VERSION" --wait-reply
//! retrolink --command "SHOW_MSG hello"
//! retrolink --command "QUIT"
//! ```
//!
//! With `--command` the binary instead sends one command to a running
//! instance and exits.

mod config;
mod demo_frontend;
mod hotkeys;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use config::AppConfig;
use demo_frontend::DemoFrontend;
use hotkeys::Pacing;
use retrolink_command::{CommandSlots, CommandTarget, command_catalog, send_network_command, verify_tables};
use retrolink_net::TransportKind;

const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "retrolink", version, about = "Remote command protocol demo for a frame-loop frontend")]
struct Args {
    /// TOML config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable the UDP command interface on this port.
    #[arg(long)]
    port: Option<u16>,

    /// Read commands from standard input.
    #[arg(long)]
    stdin: bool,

    /// Enable the local socket command interface at this path.
    #[arg(long, value_name = "PATH")]
    local_socket: Option<PathBuf>,

    /// Exit after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Send one command to a running instance and exit.
    #[arg(long, value_name = "CMD;HOST;PORT")]
    command: Option<String>,

    /// With --command, wait for and print the reply.
    #[arg(long, requires = "command")]
    wait_reply: bool,

    /// Print every command token and exit.
    #[arg(long)]
    list_commands: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list_commands {
        for (token, arg_desc) in command_catalog() {
            println!("{token:<22} {arg_desc}");
        }
        return Ok(());
    }

    if let Some(spec) = &args.command {
        return send_command(spec, args.wait_reply);
    }

    verify_tables()?;

    let config = load_config(&args)?;
    run(&config, args.frames)
}

fn send_command(spec: &str, wait_reply: bool) -> Result<()> {
    if !wait_reply {
        send_network_command(spec)?;
        return Ok(());
    }

    let target = CommandTarget::parse(spec)?;
    match target.request(REPLY_TIMEOUT)? {
        Some(reply) => println!("{reply}"),
        None => log::warn!(
            "No reply from {}:{} within {}ms",
            target.host,
            target.port,
            REPLY_TIMEOUT.as_millis()
        ),
    }
    Ok(())
}

/// Config file (or defaults) with command line overrides applied.
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    };

    let cmd = &mut config.command;
    if let Some(port) = args.port {
        cmd.network_enable = true;
        cmd.network_port = port;
    }
    if args.stdin {
        cmd.stdin_enable = true;
    }
    if let Some(path) = &args.local_socket {
        cmd.local_socket_enable = true;
        cmd.local_socket_path = path.clone();
    }
    if !cmd.any_enabled() {
        log::info!("No command interface configured, enabling the network interface");
        cmd.network_enable = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(config: &AppConfig, max_frames: Option<u64>) -> Result<()> {
    let mut frontend = DemoFrontend::from_config(config);

    let (mut slots, failures) = CommandSlots::open_from_config(&config.command);
    if slots.is_empty() {
        let reasons: Vec<String> = failures.iter().map(|(kind, e)| format!("{kind}: {e}")).collect();
        anyhow::bail!("no command interface could be opened ({})", reasons.join("; "));
    }
    let active: Vec<String> = TransportKind::ALL
        .iter()
        .filter(|kind| slots.get(**kind).is_some())
        .map(ToString::to_string)
        .collect();
    log::info!(
        "Running at {} fps with command interfaces: {}",
        config.frontend.frame_rate,
        active.join(", ")
    );

    if frontend.is_paused() {
        log::info!("Starting paused");
    }

    let mut pacing = Pacing::new(config.frontend.frame_rate);
    let mut frames: u64 = 0;

    loop {
        let started = Instant::now();

        let summary = slots.poll_all(&mut frontend);
        if summary.lines > 0 {
            log::debug!("Frame {frames}: {summary:?}");
        }

        let pressed = slots.pressed();
        hotkeys::apply(&pressed, &mut frontend);
        let plan = pacing.update(&pressed);
        frontend.run_frame(plan.advance);
        frames += 1;

        if frontend.quit_requested() {
            log::info!("Quit requested after {frames} frames (core frame {})", frontend.frame());
            break;
        }
        if max_frames.is_some_and(|max| frames >= max) {
            log::info!("Frame limit reached");
            break;
        }

        if let Some(rest) = plan.budget.and_then(|b| b.checked_sub(started.elapsed())) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn wait_reply_requires_command() {
        assert!(Args::try_parse_from(["retrolink", "--wait-reply"]).is_err());
        let args = Args::try_parse_from(["retrolink", "--command", "VERSION", "--wait-reply"]).unwrap();
        assert!(args.wait_reply);
        assert_eq!(args.command.as_deref(), Some("VERSION"));
    }

    #[test]
    fn overrides_enable_transports() {
        let args = Args::try_parse_from([
            "retrolink",
            "--port",
            "4000",
            "--stdin",
            "--local-socket",
            "/tmp/x.sock",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert!(config.command.network_enable);
        assert_eq!(config.command.network_port, 4000);
        assert!(config.command.stdin_enable);
        assert!(config.command.local_socket_enable);
        assert_eq!(config.command.local_socket_path, PathBuf::from("/tmp/x.sock"));
    }

    #[test]
    fn network_is_enabled_when_nothing_is_configured() {
        let args = Args::try_parse_from(["retrolink"]).unwrap();
        let config = load_config(&args).unwrap();
        assert!(config.command.network_enable);
        assert!(!config.command.stdin_enable);
    }

    #[test]
    fn bounded_run_exits() {
        let mut config = AppConfig::default();
        config.command.network_enable = true;
        config.command.network_bind = std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);
        config.command.network_port = 0;
        config.frontend.frame_rate = 1000;
        run(&config, Some(3)).unwrap();
    }
}
