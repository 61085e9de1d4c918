use crate::app::render::{render, OutputFormat};
use crate::core::address_list::MIN_ADDRESSES;
use crate::core::controller::Msg;
use crate::core::engine::FormEngine;
use crate::core::MetadataCollaborator;
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const HELP: &str = "\
Commands:
  set N URL   replace URL N (1-based)
  add         add another URL field
  remove N    remove URL N (only fields after the first 3)
  submit      fetch metadata for all non-empty URLs
  show        print the form and results
  help        print this message
  quit        leave without waiting for a pending request
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { position: usize, value: String },
    Add,
    Remove { position: usize },
    Submit,
    Show,
    Help,
    Quit,
    Invalid(String),
}

/// 解析一行指令，位置以 1 起算並轉成 0 起算
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let position = |arg: &str| -> Option<usize> {
        arg.parse::<usize>().ok().filter(|p| *p >= 1).map(|p| p - 1)
    };

    match verb.to_ascii_lowercase().as_str() {
        "set" | "edit" => {
            let (index, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            match position(index) {
                Some(position) => Command::Set {
                    position,
                    value: value.trim().to_string(),
                },
                None => Command::Invalid("usage: set N URL".to_string()),
            }
        }
        "add" => Command::Add,
        "remove" | "rm" => match position(rest) {
            Some(position) => Command::Remove { position },
            None => Command::Invalid("usage: remove N".to_string()),
        },
        "submit" => Command::Submit,
        "show" | "" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{}', try 'help'", other)),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Runs the line-command loop until `quit` or end of input.
///
/// Commands keep being accepted while a submission is pending; its settlement
/// is rendered as soon as it arrives. At end of input a pending submission is
/// still awaited so piped scripts see their results.
pub async fn run_session<C, R, W>(
    engine: &mut FormEngine<C>,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    C: MetadataCollaborator + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;

    write_view(engine, output, format).await?;

    loop {
        let loading = engine.state().is_loading();
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => {
                        if let Flow::Quit = handle(engine, parse_command(&line), output, format).await? {
                            if engine.state().is_loading() {
                                tracing::info!("Leaving with a request still pending; its result will be discarded");
                            }
                            break;
                        }
                    }
                    None => {
                        input_open = false;
                        if !engine.state().is_loading() {
                            break;
                        }
                    }
                }
            }
            settled = engine.next_settlement(), if loading => {
                if settled.is_some() {
                    write_view(engine, output, format).await?;
                }
                if !input_open {
                    break;
                }
            }
            else => break,
        }
    }

    output.flush().await?;
    Ok(())
}

async fn handle<C, W>(
    engine: &mut FormEngine<C>,
    command: Command,
    output: &mut W,
    format: OutputFormat,
) -> Result<Flow>
where
    C: MetadataCollaborator + 'static,
    W: AsyncWrite + Unpin,
{
    let len = engine.state().addresses().len();
    match command {
        Command::Set { position, value } if position < len => {
            engine.dispatch(Msg::Edit { position, value });
        }
        Command::Set { position, .. } => {
            write_line(output, &format!("There is no URL {}", position + 1)).await?;
        }
        Command::Add => {
            engine.dispatch(Msg::Append);
            write_view(engine, output, format).await?;
        }
        Command::Remove { position } if position < MIN_ADDRESSES && len > MIN_ADDRESSES => {
            write_line(
                output,
                &format!("URL {} is one of the first {} and cannot be removed", position + 1, MIN_ADDRESSES),
            )
            .await?;
        }
        Command::Remove { position } if position >= len => {
            write_line(output, &format!("There is no URL {}", position + 1)).await?;
        }
        Command::Remove { position } => {
            engine.dispatch(Msg::Remove { position });
            write_view(engine, output, format).await?;
        }
        Command::Submit if engine.state().is_loading() => {
            write_line(output, "Fetching... submit is disabled until the current request settles").await?;
        }
        Command::Submit => {
            engine.dispatch(Msg::Submit);
            write_view(engine, output, format).await?;
        }
        Command::Show => write_view(engine, output, format).await?,
        Command::Help => write_line(output, HELP.trim_end()).await?,
        Command::Quit => return Ok(Flow::Quit),
        Command::Invalid(message) => write_line(output, &message).await?,
    }
    Ok(Flow::Continue)
}

async fn write_view<C, W>(engine: &FormEngine<C>, output: &mut W, format: OutputFormat) -> Result<()>
where
    C: MetadataCollaborator + 'static,
    W: AsyncWrite + Unpin,
{
    let text = render(&engine.view(), format)?;
    write_line(output, text.trim_end()).await
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}
