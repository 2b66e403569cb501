//! Terminal front-end
//!
//! Line-oriented stand-in for the join and chat screens. The message list is
//! drawn by a task subscribed to the store, so partner messages show up as
//! they land rather than when the user next presses enter.

use std::io::{self, Write};
use std::sync::Arc;

use parichat_core::{Error, MessageId, Session};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::state::AppState;
use crate::viewmodel::{CallViewModel, ChatViewModel, HeaderView, JoinViewModel, MessageRow, Screen};

type Input = Lines<BufReader<Stdin>>;

const HELP: &str = "\
Commands:
  /attach <uri>   attach an image to the next message
  /detach         remove the attached image
  /status         show the partner's presence
  /history        redraw the conversation
  /call           start a video call
  /mute /camera /minimize /hangup
  /move <dx> <dy> move the minimized call overlay
  /leave          leave the room
  /quit           leave and exit
Anything else is sent as a message.";

/// Drive the join and chat screens until stdin closes or the user quits
pub async fn run(state: Arc<AppState>) -> io::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let renderer = tokio::spawn(render_messages(state.store.subscribe()));

    let mut screen = Screen::Join;
    loop {
        let next = match screen {
            Screen::Join => join_screen(&state, &mut input).await?,
            Screen::Chat => chat_screen(&state, &mut input).await?,
        };

        match next {
            Some(s) => screen = s,
            None => break,
        }
    }

    renderer.abort();
    info!("Exiting");
    Ok(())
}

async fn prompt(input: &mut Input, label: &str) -> io::Result<Option<String>> {
    print!("{}: ", label);
    io::stdout().flush()?;
    input.next_line().await
}

async fn join_screen(state: &Arc<AppState>, input: &mut Input) -> io::Result<Option<Screen>> {
    println!();
    println!("Parichat - private chat for two");
    println!("Only two people can join a room at once.");
    println!("Your messages are not stored on any server.");
    println!();

    let mut vm = JoinViewModel::new(state.clone());
    loop {
        let label = if vm.username.is_empty() {
            "Username".to_string()
        } else {
            format!("Username [{}]", vm.username)
        };

        let Some(username) = prompt(input, &label).await? else {
            return Ok(None);
        };
        // Enter keeps the pre-filled name
        if !username.trim().is_empty() || vm.username.is_empty() {
            vm.username = username;
        }

        let Some(room_code) = prompt(input, "Room code").await? else {
            return Ok(None);
        };
        vm.room_code = room_code;

        match vm.join().await {
            Ok(()) => return Ok(Some(Screen::Chat)),
            Err(errors) => {
                if let Some(e) = &errors.username {
                    println!("  Username: {}", e);
                }
                if let Some(e) = &errors.room_code {
                    println!("  Room code: {}", e);
                }
            }
        }
    }
}

async fn chat_screen(state: &Arc<AppState>, input: &mut Input) -> io::Result<Option<Screen>> {
    let mut vm = match ChatViewModel::enter(state.clone(), state.partner_behavior()) {
        Ok(vm) => vm,
        Err(e) => {
            warn!(error = %e, "Cannot open chat");
            return Ok(Some(Screen::Join));
        }
    };

    println!("Waiting for your partner... (/help for commands)");

    while let Some(line) = input.next_line().await? {
        let (command, arg) = split_command(line.trim_end());

        match command {
            Some("/help") => println!("{}", HELP),
            Some("/attach") if arg.is_empty() => println!("Usage: /attach <uri>"),
            Some("/attach") => {
                vm.compose.attach_image(arg);
                println!("Attached {}", arg);
            }
            Some("/detach") => {
                vm.compose.remove_image();
                println!("Attachment removed");
            }
            Some("/status") if vm.is_loading() => println!("Waiting for your partner..."),
            Some("/status") => print_header(&vm.header()),
            Some("/history") => {
                for row in vm.rows() {
                    println!("{}", format_row(&row));
                }
            }
            Some("/call") => {
                vm.start_call();
                print_call(&vm);
            }
            Some("/mute") | Some("/camera") | Some("/minimize") | Some("/move")
                if !vm.call.visible =>
            {
                println!("No call in progress");
            }
            Some("/mute") => {
                vm.call.toggle_mute();
                print_call(&vm);
            }
            Some("/camera") => {
                vm.call.toggle_camera();
                print_call(&vm);
            }
            Some("/minimize") => {
                vm.call.toggle_minimize();
                print_call(&vm);
            }
            Some("/move") => match parse_offset(arg) {
                Some((dx, dy)) if vm.call.minimized => {
                    vm.call.drag_by(dx, dy);
                    println!("Overlay at {:?}", vm.call.offset);
                }
                Some(_) => println!("Minimize the call first"),
                None => println!("Usage: /move <dx> <dy>"),
            },
            Some("/hangup") => {
                vm.call.close();
                println!("Call ended");
            }
            Some("/leave") => {
                vm.leave();
                return Ok(Some(Screen::Join));
            }
            Some("/quit") => {
                vm.leave();
                return Ok(None);
            }
            Some(other) => println!("Unknown command {} (/help for commands)", other),
            None => {
                vm.compose.set_text(arg);
                match vm.send_composed() {
                    Ok(_) | Err(Error::EmptyMessage) => {}
                    Err(e) => println!("  {}", e),
                }
            }
        }
    }

    vm.leave();
    Ok(None)
}

/// `"/attach x"` -> `(Some("/attach"), "x")`, plain text -> `(None, text)`
fn split_command(line: &str) -> (Option<&str>, &str) {
    if !line.starts_with('/') {
        return (None, line);
    }

    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (Some(cmd), rest.trim()),
        None => (Some(line), ""),
    }
}

fn parse_offset(arg: &str) -> Option<(f32, f32)> {
    let mut parts = arg.split_whitespace();
    let dx = parts.next()?.parse().ok()?;
    let dy = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((dx, dy))
}

async fn render_messages(mut rx: watch::Receiver<Session>) {
    let mut last_rendered: Option<MessageId> = None;

    while rx.changed().await.is_ok() {
        let session = rx.borrow_and_update().clone();

        let start = last_rendered
            .and_then(|id| session.messages.iter().rposition(|m| m.id == id))
            .map_or(0, |i| i + 1);

        let username = session.username();
        for message in &session.messages[start..] {
            println!("{}", format_row(&MessageRow::new(message, username)));
        }

        last_rendered = session.last_message().map(|m| m.id);
    }
}

fn format_row(row: &MessageRow) -> String {
    let mut line = if row.is_own {
        format!("[{}] {} (you):", row.time, row.sender)
    } else {
        format!("[{}] {}:", row.time, row.sender)
    };

    if let Some(url) = &row.image_url {
        line.push_str(&format!(" [image {}]", url));
    }
    if let Some(text) = &row.text {
        line.push(' ');
        line.push_str(text);
    }
    line
}

fn print_header(header: &HeaderView) {
    match (&header.partner_name, &header.partner_status) {
        (Some(name), Some(status)) => println!("{} | {} - {}", header.title, name, status),
        _ => println!("{} | waiting for partner", header.title),
    }
}

fn print_call(vm: &ChatViewModel) {
    let partner = vm.partner();
    let call = &vm.call;
    if call.minimized {
        println!("[call minimized: {}]", CallViewModel::minimized_label(partner.as_ref()));
        return;
    }

    println!(
        "[{} | {}] mic {} | camera {}",
        CallViewModel::partner_video_label(partner.as_ref()),
        CallViewModel::self_video_label(),
        if call.muted { "off" } else { "on" },
        if call.camera_on { "on" } else { "off" },
    );
}
